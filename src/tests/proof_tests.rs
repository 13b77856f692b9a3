// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use crate::canonical::canonicalize;
use crate::error::DefinitionError;
use crate::merkle::{build_tree, leaf_hash};
use crate::proof::{proof_for, verify_proof};
use crate::types::HashAlgorithm;

use super::support::*;

#[test]
fn test_proof_from_record_bytes_verifies() {
    let built = build_tree(sample_records(), &params()).unwrap();
    let root = built.root();

    for (i, record) in built.records.iter().enumerate() {
        let bytes = canonicalize(record, TS).unwrap();
        let leaf = leaf_hash(HashAlgorithm::Blake3, &bytes);
        let proof = proof_for(&built.tree, i).unwrap();
        proof.validate().unwrap();
        assert!(verify_proof(HashAlgorithm::Blake3, &leaf, &proof, &root), "record {}", record.identity_key());
    }
}

#[test]
fn test_proof_rejected_against_other_root() {
    let built = build_tree(four_records(), &params()).unwrap();
    let other = build_tree(sample_records(), &params()).unwrap();
    let proof = proof_for(&built.tree, 0).unwrap();
    assert!(!verify_proof(HashAlgorithm::Blake3, &built.tree.leaves()[0], &proof, &other.root()));
}

#[test]
fn test_proof_index_out_of_range() {
    let built = build_tree(four_records(), &params()).unwrap();
    assert_eq!(
        proof_for(&built.tree, 4).unwrap_err(),
        DefinitionError::IndexOutOfRange { index: 4, leaf_count: 4 }
    );
}

#[test]
fn test_tampered_sibling_fails() {
    let built = build_tree(sample_records(), &params()).unwrap();
    let mut proof = proof_for(&built.tree, 3).unwrap();
    proof.steps[1].sibling.0[0] ^= 0x01;
    assert!(!verify_proof(HashAlgorithm::Blake3, &built.tree.leaves()[3], &proof, &built.root()));
}

#[test]
fn test_proof_depth_is_logarithmic() {
    let built = build_tree(sample_records(), &params()).unwrap();
    // 9 leaves: 4 levels above the leaves
    assert_eq!(built.tree.depth(), 4);
    for i in 0..built.tree.leaf_count() {
        assert!(proof_for(&built.tree, i).unwrap().steps.len() <= 4);
    }
}
