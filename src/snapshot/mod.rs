// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Dataset snapshots and the two-phase signing protocol.
//!
//! A [`DatasetSnapshot`] is immutable once built. Signing does not mutate
//! it; a verified signature produces a separate [`SignedSnapshot`], so a
//! rejected signature leaves nothing half-attached.
//!
//! ```text
//! build ─► propose_root() ─► (external signer) ─► submit_signature() ─► finalize()
//! ```

use serde::{Deserialize, Serialize};

use crate::config::BuildParams;
use crate::error::{DefinitionError, Result};
use crate::merkle::{build_tree, BuiltTree, MerkleTree};
use crate::proof::{proof_for, InclusionProof};
use crate::signature::{verify_signature, DefinitionSignature, SignerSet};
use crate::types::id::IdentityKey;
use crate::types::record::DefinitionRecord;
use crate::types::{Digest, HashAlgorithm, OddNodePolicy};

/// Tree metadata recorded alongside the records.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    pub timestamp: u32,
    pub hash_algorithm: HashAlgorithm,
    pub odd_node_policy: OddNodePolicy,
    pub leaf_count: usize,
    pub merkle_root: Digest,
}

/// Root handed to the external signer, with everything needed to reproduce it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootForSigning {
    pub root: Digest,
    pub hash_algorithm: HashAlgorithm,
    pub odd_node_policy: OddNodePolicy,
    pub leaf_count: usize,
    pub timestamp: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatasetSnapshot {
    params: BuildParams,
    built: BuiltTree,
}

impl DatasetSnapshot {
    pub fn build<I>(records: I, params: BuildParams) -> Result<Self>
    where
        I: IntoIterator<Item = DefinitionRecord>,
    {
        let built = build_tree(records, &params)?;
        Ok(Self { params, built })
    }

    pub fn root(&self) -> Digest {
        self.built.root()
    }

    pub fn params(&self) -> &BuildParams {
        &self.params
    }

    pub fn hash_algorithm(&self) -> HashAlgorithm {
        self.params.hash_algorithm
    }

    pub fn timestamp(&self) -> u32 {
        self.params.timestamp
    }

    /// Records in leaf order.
    pub fn records(&self) -> &[DefinitionRecord] {
        &self.built.records
    }

    pub fn tree(&self) -> &MerkleTree {
        &self.built.tree
    }

    pub fn len(&self) -> usize {
        self.built.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.built.records.is_empty()
    }

    pub fn metadata(&self) -> SnapshotMetadata {
        SnapshotMetadata {
            timestamp: self.params.timestamp,
            hash_algorithm: self.params.hash_algorithm,
            odd_node_policy: self.params.odd_node_policy,
            leaf_count: self.len(),
            merkle_root: self.root(),
        }
    }

    /// Leaf position of `key`. Records are sorted by identity, so this is a
    /// binary search.
    pub fn position(&self, key: &IdentityKey) -> Option<usize> {
        self.built
            .records
            .binary_search_by(|r| r.identity_key().cmp(key))
            .ok()
    }

    pub fn proof_at(&self, index: usize) -> Result<InclusionProof> {
        proof_for(&self.built.tree, index)
    }

    pub fn prove(&self, key: &IdentityKey) -> Result<(&DefinitionRecord, InclusionProof)> {
        let index = self.position(key).ok_or_else(|| DefinitionError::RecordNotFound {
            identity: key.to_string(),
        })?;
        Ok((&self.built.records[index], self.proof_at(index)?))
    }

    /// Phase one: expose the root for external signing.
    pub fn propose_root(&self) -> RootForSigning {
        let proposal = self.proposal();
        tracing::info!(root = %proposal.root, leaves = proposal.leaf_count, "root proposed for signing");
        proposal
    }

    /// Phase two: accept a signature produced for `proposal`.
    ///
    /// The proposal must describe this snapshot exactly; a signature over a
    /// root proposed from a different record set is a mismatch even if it
    /// verifies against that other root.
    pub fn submit_signature(
        &self,
        proposal: &RootForSigning,
        signature: DefinitionSignature,
        signers: &SignerSet,
    ) -> Result<SignedSnapshot> {
        let current = self.proposal();
        if *proposal != current {
            tracing::warn!(
                proposed = %proposal.root,
                current = %current.root,
                "signature submitted for a stale proposal"
            );
            return Err(DefinitionError::SignatureMismatch {
                root: current.root.to_hex(),
            });
        }
        self.attach_signature(signature, signers)
    }

    /// Binds `signature` to this snapshot if it verifies against the current
    /// root.
    pub fn attach_signature(&self, signature: DefinitionSignature, signers: &SignerSet) -> Result<SignedSnapshot> {
        let root = self.root();
        if !verify_signature(&root, &signature, signers) {
            tracing::warn!(root = %root, sigmask = signature.sigmask, "signature rejected");
            return Err(DefinitionError::SignatureMismatch { root: root.to_hex() });
        }
        tracing::info!(root = %root, signers = signature.signer_count(), "signature attached");
        Ok(SignedSnapshot {
            snapshot: self.clone(),
            signature,
        })
    }

    fn proposal(&self) -> RootForSigning {
        RootForSigning {
            root: self.root(),
            hash_algorithm: self.params.hash_algorithm,
            odd_node_policy: self.params.odd_node_policy,
            leaf_count: self.len(),
            timestamp: self.params.timestamp,
        }
    }
}

/// Snapshot whose root carries a verified signature.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedSnapshot {
    snapshot: DatasetSnapshot,
    signature: DefinitionSignature,
}

impl SignedSnapshot {
    pub fn snapshot(&self) -> &DatasetSnapshot {
        &self.snapshot
    }

    pub fn signature(&self) -> &DefinitionSignature {
        &self.signature
    }

    pub fn root(&self) -> Digest {
        self.snapshot.root()
    }

    pub fn into_parts(self) -> (DatasetSnapshot, DefinitionSignature) {
        (self.snapshot, self.signature)
    }
}
