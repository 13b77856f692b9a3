// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Published artifact and the query index built from it.
//!
//! The artifact is what leaves the build machine: records in leaf order, the
//! policies they were hashed under, the root and its signature. Opening it
//! never trusts the stored root; the tree is rebuilt and compared.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::blob::encode_blob;
use crate::canonical::canonicalize;
use crate::config::{BuildParams, ARTIFACT_FORMAT_VERSION};
use crate::error::{DefinitionError, Result};
use crate::proof::InclusionProof;
use crate::signature::{check_signature, DefinitionSignature, SignerSet};
use crate::snapshot::{DatasetSnapshot, SignedSnapshot};
use crate::types::id::IdentityKey;
use crate::types::record::DefinitionRecord;
use crate::types::{Digest, HashAlgorithm, OddNodePolicy};

/// Serializable form of a signed snapshot.
///
/// Policy identifiers are kept as strings so that an artifact written by a
/// newer build fails with `UnsupportedPolicy` instead of a parse error.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedArtifact {
    pub format_version: u32,
    pub hash_algorithm: String,
    pub odd_node_policy: String,
    pub timestamp: u32,
    pub leaf_count: usize,
    pub merkle_root: Digest,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<DefinitionSignature>,
    pub records: Vec<DefinitionRecord>,
}

impl PublishedArtifact {
    /// Build parameters recorded in the artifact, rejecting unknown versions
    /// and policies.
    pub fn build_params(&self) -> Result<BuildParams> {
        if self.format_version != ARTIFACT_FORMAT_VERSION {
            return Err(DefinitionError::UnsupportedPolicy(format!(
                "artifact format version {}",
                self.format_version
            )));
        }
        Ok(BuildParams {
            timestamp: self.timestamp,
            hash_algorithm: HashAlgorithm::from_id(&self.hash_algorithm)?,
            odd_node_policy: OddNodePolicy::from_id(&self.odd_node_policy)?,
        })
    }
}

/// Turns a signed snapshot into its publishable form.
pub fn finalize(signed: &SignedSnapshot) -> PublishedArtifact {
    let snapshot = signed.snapshot();
    let meta = snapshot.metadata();
    tracing::info!(root = %meta.merkle_root, leaves = meta.leaf_count, "snapshot finalized");
    PublishedArtifact {
        format_version: ARTIFACT_FORMAT_VERSION,
        hash_algorithm: meta.hash_algorithm.id().to_string(),
        odd_node_policy: meta.odd_node_policy.id().to_string(),
        timestamp: meta.timestamp,
        leaf_count: meta.leaf_count,
        merkle_root: meta.merkle_root,
        signature: Some(*signed.signature()),
        records: snapshot.records().to_vec(),
    }
}

impl SignedSnapshot {
    pub fn finalize(&self) -> PublishedArtifact {
        finalize(self)
    }
}

/// One record with everything needed to check it against the signed root.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofBundle {
    pub identity: String,
    pub record: DefinitionRecord,
    pub timestamp: u32,
    pub hash_algorithm: String,
    pub proof: InclusionProof,
    pub root: Digest,
    pub signature: DefinitionSignature,
}

/// Read-only lookup structure over a verified artifact.
#[derive(Debug)]
pub struct ArtifactIndex {
    snapshot: DatasetSnapshot,
    signature: DefinitionSignature,
    positions: FxHashMap<IdentityKey, usize>,
}

impl ArtifactIndex {
    /// Rebuilds the tree from `artifact`, checks the stored root and the
    /// signature over it.
    pub fn open(artifact: PublishedArtifact, signers: &SignerSet) -> Result<Self> {
        let params = artifact.build_params()?;
        let declared_root = artifact.merkle_root;
        let declared_leaves = artifact.leaf_count;

        let snapshot = DatasetSnapshot::build(artifact.records, params)?;
        let computed = snapshot.root();
        if computed != declared_root {
            tracing::warn!(expected = %declared_root, computed = %computed, "artifact root is stale");
            return Err(DefinitionError::RootMismatch {
                expected: declared_root.to_hex(),
                computed: computed.to_hex(),
            });
        }
        if snapshot.len() != declared_leaves {
            return Err(DefinitionError::RootMismatch {
                expected: format!("{declared_root} over {declared_leaves} leaves"),
                computed: format!("{computed} over {} leaves", snapshot.len()),
            });
        }

        let signature = artifact.signature.ok_or_else(|| DefinitionError::InvalidSignature {
            root: computed.to_hex(),
            reason: "artifact is unsigned".to_string(),
        })?;
        check_signature(&computed, &signature, signers)?;

        let positions = snapshot
            .records()
            .iter()
            .enumerate()
            .map(|(i, r)| (r.identity_key(), i))
            .collect();

        tracing::info!(root = %computed, leaves = snapshot.len(), "artifact opened");
        Ok(Self {
            snapshot,
            signature,
            positions,
        })
    }

    pub fn root(&self) -> Digest {
        self.snapshot.root()
    }

    pub fn signature(&self) -> &DefinitionSignature {
        &self.signature
    }

    pub fn hash_algorithm(&self) -> HashAlgorithm {
        self.snapshot.hash_algorithm()
    }

    pub fn timestamp(&self) -> u32 {
        self.snapshot.timestamp()
    }

    pub fn leaf_count(&self) -> usize {
        self.snapshot.len()
    }

    pub fn records(&self) -> &[DefinitionRecord] {
        self.snapshot.records()
    }

    pub fn snapshot(&self) -> &DatasetSnapshot {
        &self.snapshot
    }

    pub fn query(&self, key: &IdentityKey) -> Result<(&DefinitionRecord, InclusionProof)> {
        let index = *self.positions.get(key).ok_or_else(|| DefinitionError::RecordNotFound {
            identity: key.to_string(),
        })?;
        let proof = self.snapshot.proof_at(index)?;
        Ok((&self.snapshot.records()[index], proof))
    }

    pub fn bundle(&self, key: &IdentityKey) -> Result<ProofBundle> {
        let (record, proof) = self.query(key)?;
        Ok(ProofBundle {
            identity: key.to_string(),
            record: record.clone(),
            timestamp: self.timestamp(),
            hash_algorithm: self.hash_algorithm().id().to_string(),
            proof,
            root: self.root(),
            signature: self.signature,
        })
    }

    /// Device blob for `key`: canonical bytes, proof, signature.
    pub fn blob_for(&self, key: &IdentityKey) -> Result<Vec<u8>> {
        let (record, proof) = self.query(key)?;
        let canonical = canonicalize(record, self.timestamp())?;
        Ok(encode_blob(&canonical, &proof, &self.signature))
    }
}
