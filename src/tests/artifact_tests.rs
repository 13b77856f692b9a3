// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use crate::artifact::{finalize, ArtifactIndex, PublishedArtifact};
use crate::canonical::canonicalize;
use crate::cosi::{dev_signer_set, public_key, sign_with_dev_keys};
use crate::error::DefinitionError;
use crate::merkle::leaf_hash;
use crate::proof::verify_proof;
use crate::signature::SignerSet;
use crate::snapshot::DatasetSnapshot;
use crate::types::id::{DefinitionKind, IdentityKey};
use crate::types::record::DefinitionRecord;

use super::support::*;

fn published() -> PublishedArtifact {
    let snapshot = DatasetSnapshot::build(sample_records(), params()).unwrap();
    let signature = sign_with_dev_keys(&snapshot.root());
    let signed = snapshot.attach_signature(signature, &dev_signer_set()).unwrap();
    finalize(&signed)
}

#[test]
fn test_finalize_then_query_every_record() {
    let artifact = published();
    let root = artifact.merkle_root;
    let index = ArtifactIndex::open(artifact, &dev_signer_set()).unwrap();
    assert_eq!(index.root(), root);

    for record in sample_records() {
        let (found, proof) = index.query(&record.identity_key()).unwrap();
        assert_eq!(*found, record);
        let leaf = leaf_hash(index.hash_algorithm(), &canonicalize(found, index.timestamp()).unwrap());
        assert!(verify_proof(index.hash_algorithm(), &leaf, &proof, &root));
    }
}

#[test]
fn test_artifact_survives_json() {
    let artifact = published();
    let json = serde_json::to_string_pretty(&artifact).unwrap();
    assert!(json.contains("\"hash_algorithm\": \"blake3\""));
    assert!(json.contains("\"odd_node_policy\": \"carry-up\""));

    let back: PublishedArtifact = serde_json::from_str(&json).unwrap();
    assert_eq!(back, artifact);
    assert!(ArtifactIndex::open(back, &dev_signer_set()).is_ok());
}

#[test]
fn test_tampered_record_rejected_at_open() {
    let mut artifact = published();
    let expected = artifact.merkle_root;
    artifact.records[0] = DefinitionRecord::network(1, 60, "ETH", "Ethereum Classic");

    match ArtifactIndex::open(artifact, &dev_signer_set()) {
        Err(DefinitionError::RootMismatch { expected: e, computed }) => {
            assert_eq!(e, expected.to_hex());
            assert_ne!(computed, e);
        }
        other => panic!("expected RootMismatch, got {other:?}"),
    }
}

#[test]
fn test_unsigned_artifact_rejected() {
    let mut artifact = published();
    artifact.signature = None;
    assert!(matches!(
        ArtifactIndex::open(artifact, &dev_signer_set()),
        Err(DefinitionError::InvalidSignature { .. })
    ));
}

#[test]
fn test_untrusted_signers_rejected() {
    let artifact = published();
    let strangers = SignerSet::new(vec![public_key(&[1u8; 32]), public_key(&[2u8; 32]), public_key(&[3u8; 32])], 2).unwrap();
    assert!(matches!(
        ArtifactIndex::open(artifact, &strangers),
        Err(DefinitionError::InvalidSignature { .. })
    ));
}

#[test]
fn test_unknown_policy_rejected() {
    let mut artifact = published();
    artifact.odd_node_policy = "duplicate-last".to_string();
    assert!(matches!(
        ArtifactIndex::open(artifact, &dev_signer_set()),
        Err(DefinitionError::UnsupportedPolicy(_))
    ));

    let mut artifact = published();
    artifact.format_version = 99;
    assert!(matches!(
        ArtifactIndex::open(artifact, &dev_signer_set()),
        Err(DefinitionError::UnsupportedPolicy(_))
    ));
}

#[test]
fn test_query_unknown_identity() {
    let index = ArtifactIndex::open(published(), &dev_signer_set()).unwrap();
    let key = IdentityKey::new(DefinitionKind::Token, "eth/chain-id/1/token-0000000000000000000000000000000000000000");
    assert_eq!(
        index.query(&key).unwrap_err(),
        DefinitionError::RecordNotFound { identity: key.to_string() }
    );
    assert!(index.blob_for(&key).is_err());
}
