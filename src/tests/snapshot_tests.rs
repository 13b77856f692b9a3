// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use crate::cosi::{dev_signer_set, sign_with_dev_keys, sign_with_keys, public_key};
use crate::error::DefinitionError;
use crate::signature::{verify_signature, DefinitionSignature, SignerSet};
use crate::snapshot::DatasetSnapshot;
use crate::types::id::{DefinitionKind, IdentityKey};

use super::support::*;

#[test]
fn test_attach_signature_over_current_root() {
    let snapshot = DatasetSnapshot::build(four_records(), params()).unwrap();
    let r1 = snapshot.root();

    let signature = sign_with_dev_keys(&r1);
    let signed = snapshot.attach_signature(signature, &dev_signer_set()).unwrap();
    assert_eq!(signed.root(), r1);
    assert_eq!(signed.signature(), &signature);
}

#[test]
fn test_signature_does_not_carry_to_grown_set() {
    let snapshot = DatasetSnapshot::build(four_records(), params()).unwrap();
    let signature = sign_with_dev_keys(&snapshot.root());

    // 5th record changes the root
    let mut five = four_records();
    five.push(xdex_token());
    let grown = DatasetSnapshot::build(five, params()).unwrap();
    let r3 = grown.root();
    assert_ne!(r3, snapshot.root());

    let err = grown.attach_signature(signature, &dev_signer_set()).unwrap_err();
    assert_eq!(err, DefinitionError::SignatureMismatch { root: r3.to_hex() });
}

#[test]
fn test_rejected_signature_leaves_snapshot_untouched() {
    let snapshot = DatasetSnapshot::build(four_records(), params()).unwrap();
    let before = snapshot.clone();

    let bogus = DefinitionSignature::new(0b111, [0x55; 64]);
    assert!(snapshot.attach_signature(bogus, &dev_signer_set()).is_err());
    assert_eq!(snapshot, before);
}

#[test]
fn test_attach_succeeds_iff_signature_verifies() {
    let snapshot = DatasetSnapshot::build(four_records(), params()).unwrap();
    let root = snapshot.root();
    let signers = dev_signer_set();

    let good = sign_with_dev_keys(&root);
    let mut flipped = good;
    flipped.signature[10] ^= 0x80;
    let mut narrowed = good;
    narrowed.sigmask = 0b001;
    let other_root = sign_with_dev_keys(&crate::types::Digest([1u8; 32]));

    for candidate in [good, flipped, narrowed, other_root] {
        let expected = verify_signature(&root, &candidate, &signers);
        assert_eq!(snapshot.attach_signature(candidate, &signers).is_ok(), expected);
    }
    assert!(verify_signature(&root, &good, &signers));
}

#[test]
fn test_two_of_three_signers_meet_threshold() {
    let snapshot = DatasetSnapshot::build(four_records(), params()).unwrap();
    let root = snapshot.root();
    let seeds = crate::cosi::DEV_PRIVATE_KEYS;

    // keys 0 and 2 only
    let signature = DefinitionSignature::new(0b101, sign_with_keys(root.as_bytes(), &[seeds[0], seeds[2]]));
    assert!(snapshot.attach_signature(signature, &dev_signer_set()).is_ok());

    // a single key never satisfies a threshold of two
    let single = DefinitionSignature::new(0b010, sign_with_keys(root.as_bytes(), &[seeds[1]]));
    assert!(snapshot.attach_signature(single, &dev_signer_set()).is_err());

    let lenient = SignerSet::new(seeds.iter().map(public_key).collect(), 1).unwrap();
    assert!(snapshot.attach_signature(single, &lenient).is_ok());
}

#[test]
fn test_two_phase_protocol() {
    let snapshot = DatasetSnapshot::build(four_records(), params()).unwrap();
    let proposal = snapshot.propose_root();
    assert_eq!(proposal.root.to_hex().len(), 64);
    assert_eq!(proposal.leaf_count, 4);

    let signature = sign_with_dev_keys(&proposal.root);
    let signed = snapshot.submit_signature(&proposal, signature, &dev_signer_set()).unwrap();
    assert_eq!(signed.root(), proposal.root);
}

#[test]
fn test_stale_proposal_rejected() {
    let old = DatasetSnapshot::build(four_records(), params()).unwrap();
    let proposal = old.propose_root();
    let signature = sign_with_dev_keys(&proposal.root);

    let mut records = four_records();
    records.pop();
    let current = DatasetSnapshot::build(records, params()).unwrap();
    let err = current.submit_signature(&proposal, signature, &dev_signer_set()).unwrap_err();
    assert_eq!(err, DefinitionError::SignatureMismatch { root: current.root().to_hex() });
}

#[test]
fn test_snapshot_lookup() {
    let snapshot = DatasetSnapshot::build(sample_records(), params()).unwrap();
    let key = IdentityKey::new(DefinitionKind::Network, "eth/chain-id/2");
    let (record, proof) = snapshot.prove(&key).unwrap();
    assert_eq!(*record, expanse());
    assert_eq!(proof.leaf_count as usize, snapshot.len());

    let missing = IdentityKey::new(DefinitionKind::Network, "eth/chain-id/999");
    assert!(matches!(snapshot.prove(&missing), Err(DefinitionError::RecordNotFound { .. })));
}
