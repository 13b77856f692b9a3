// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Reference device-side verification.
//!
//! Mirrors what a memory-limited verifier does with one blob: it never sees
//! the dataset, only the record, its proof and the signature.
//!
//! **Checks, in order**:
//! 1. Blob framing (magic, data type, lengths) and record shape.
//! 2. Proof shape against its declared leaf position.
//! 3. Leaf hash folded through the proof into a root.
//! 4. Collective signature over that root.

use serde::Serialize;

use crate::blob::decode_blob;
use crate::canonical::validate;
use crate::error::Result;
use crate::merkle::leaf_hash;
use crate::signature::{check_signature, SignerSet};
use crate::types::record::DefinitionRecord;
use crate::types::{Digest, HashAlgorithm};

/// A definition that passed every check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifiedDefinition {
    pub record: DefinitionRecord,
    pub identity: String,
    pub timestamp: u32,
    pub root: Digest,
    pub leaf_index: u32,
    pub leaf_count: u32,
    pub sigmask: u8,
}

pub fn verify_blob(blob: &[u8], algorithm: HashAlgorithm, signers: &SignerSet) -> Result<VerifiedDefinition> {
    let decoded = decode_blob(blob)?;
    validate(&decoded.record)?;
    decoded.proof.validate()?;

    let leaf = leaf_hash(algorithm, decoded.canonical);
    let root = decoded.proof.compute_root(algorithm, leaf);
    check_signature(&root, &decoded.signature, signers)?;

    tracing::debug!(
        identity = %decoded.record.identity_key(),
        root = %root,
        "definition blob verified"
    );

    Ok(VerifiedDefinition {
        identity: decoded.record.identity_key().to_string(),
        record: decoded.record,
        timestamp: decoded.timestamp,
        root,
        leaf_index: decoded.proof.leaf_index,
        leaf_count: decoded.proof.leaf_count,
        sigmask: decoded.signature.sigmask,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob::encode_blob;
    use crate::canonical::FORMAT_MAGIC;
    use crate::cosi::{dev_signer_set, sign_with_dev_keys};
    use crate::error::DefinitionError;
    use crate::proof::InclusionProof;
    use crate::types::record::{NetworkInfo, DATA_TYPE_NETWORK};

    /// Single-leaf blob over hand-built canonical bytes, signed by the dev keys.
    fn signed_single_leaf(info: &NetworkInfo) -> Vec<u8> {
        let body = bincode::serde::encode_to_vec(info, bincode::config::standard()).unwrap();
        let mut canonical = FORMAT_MAGIC.to_vec();
        canonical.push(DATA_TYPE_NETWORK);
        canonical.extend_from_slice(&7u32.to_le_bytes());
        canonical.extend_from_slice(&(body.len() as u16).to_le_bytes());
        canonical.extend_from_slice(&body);

        let root = leaf_hash(HashAlgorithm::Blake3, &canonical);
        let proof = InclusionProof {
            leaf_index: 0,
            leaf_count: 1,
            steps: Vec::new(),
        };
        encode_blob(&canonical, &proof, &sign_with_dev_keys(&root))
    }

    fn network(symbol: &str, name: &str) -> NetworkInfo {
        NetworkInfo {
            chain_id: 1,
            slip44: 60,
            symbol: symbol.to_string(),
            name: name.to_string(),
        }
    }

    #[test]
    fn test_single_leaf_blob_verifies() {
        let blob = signed_single_leaf(&network("ETH", "Ethereum"));
        let verified = verify_blob(&blob, HashAlgorithm::Blake3, &dev_signer_set()).unwrap();
        assert_eq!(verified.identity, "network:eth/chain-id/1");
        assert_eq!(verified.timestamp, 7);
        assert_eq!(verified.leaf_count, 1);
    }

    #[test]
    fn test_signed_but_malformed_record_rejected() {
        let blob = signed_single_leaf(&network("", "Ethereum"));
        assert!(matches!(
            verify_blob(&blob, HashAlgorithm::Blake3, &dev_signer_set()),
            Err(DefinitionError::MalformedRecord { .. })
        ));

        let blob = signed_single_leaf(&network("ETH", &"x".repeat(300)));
        assert!(matches!(
            verify_blob(&blob, HashAlgorithm::Blake3, &dev_signer_set()),
            Err(DefinitionError::MalformedRecord { .. })
        ));
    }
}
