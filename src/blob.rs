// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Device blob codec.
//!
//! ```text
//! canonical record   HEADER_LEN + body length bytes
//! inclusion proof    9 + 33 * steps bytes
//! signature          65 bytes (sigmask || ed25519)
//! ```
//!
//! Each part is self-delimiting, so the blob carries no outer framing.

use crate::canonical::decode_canonical;
use crate::error::{DefinitionError, Result};
use crate::proof::InclusionProof;
use crate::signature::{DefinitionSignature, SIGNATURE_LEN};
use crate::types::record::DefinitionRecord;

pub fn encode_blob(canonical: &[u8], proof: &InclusionProof, signature: &DefinitionSignature) -> Vec<u8> {
    let mut buf = Vec::with_capacity(canonical.len() + proof.encoded_len() + SIGNATURE_LEN);
    buf.extend_from_slice(canonical);
    buf.extend_from_slice(&proof.encode());
    buf.extend_from_slice(&signature.to_bytes());
    buf
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedBlob<'a> {
    /// Canonical bytes exactly as hashed into the leaf.
    pub canonical: &'a [u8],
    pub record: DefinitionRecord,
    pub timestamp: u32,
    pub proof: InclusionProof,
    pub signature: DefinitionSignature,
}

pub fn decode_blob(data: &[u8]) -> Result<DecodedBlob<'_>> {
    let decoded = decode_canonical(data)?;
    let (canonical, rest) = data.split_at(decoded.consumed);

    let (proof, used) = InclusionProof::decode(rest)?;
    let tail = &rest[used..];
    if tail.len() != SIGNATURE_LEN {
        return Err(DefinitionError::InvalidBlob(format!(
            "expected {SIGNATURE_LEN} signature bytes, found {}",
            tail.len()
        )));
    }
    let signature = DefinitionSignature::from_bytes(tail)?;

    Ok(DecodedBlob {
        canonical,
        record: decoded.record,
        timestamp: decoded.timestamp,
        proof,
        signature,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::canonicalize;
    use crate::proof::{ProofStep, Side};
    use crate::types::Digest;

    fn sample() -> (Vec<u8>, InclusionProof, DefinitionSignature) {
        let record = DefinitionRecord::network(1, 60, "ETH", "Ethereum");
        let canonical = canonicalize(&record, 42).unwrap();
        let proof = InclusionProof {
            leaf_index: 0,
            leaf_count: 2,
            steps: vec![ProofStep {
                side: Side::Right,
                sibling: Digest([0x11; 32]),
            }],
        };
        (canonical, proof, DefinitionSignature::new(0b11, [0x22; 64]))
    }

    #[test]
    fn test_blob_layout() {
        let (canonical, proof, sig) = sample();
        let blob = encode_blob(&canonical, &proof, &sig);
        assert_eq!(blob.len(), canonical.len() + 9 + 33 + 65);

        let decoded = decode_blob(&blob).unwrap();
        assert_eq!(decoded.canonical, &canonical[..]);
        assert_eq!(decoded.proof, proof);
        assert_eq!(decoded.signature, sig);
        assert_eq!(decoded.timestamp, 42);
    }

    #[test]
    fn test_trailing_or_missing_bytes_rejected() {
        let (canonical, proof, sig) = sample();
        let mut blob = encode_blob(&canonical, &proof, &sig);
        blob.push(0);
        assert!(matches!(decode_blob(&blob), Err(DefinitionError::InvalidBlob(_))));
        blob.truncate(blob.len() - 2);
        assert!(matches!(decode_blob(&blob), Err(DefinitionError::InvalidBlob(_))));
    }
}
