// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use crate::error::DefinitionError;
use crate::merkle::{build_tree, empty_root};
use crate::proof::{proof_for, verify_proof};
use crate::types::id::DefinitionKind;
use crate::config::BuildParams;
use crate::types::record::{DefinitionPayload, DefinitionRecord, NetworkInfo, TokenInfo};
use crate::types::HashAlgorithm;

use super::support::*;

#[test]
fn test_root_independent_of_input_order() {
    let forward = four_records();
    let mut backward = four_records();
    backward.reverse();

    let r1 = build_tree(forward, &params()).unwrap().root();
    let r1_again = build_tree(backward, &params()).unwrap().root();
    assert_eq!(r1, r1_again);
}

#[test]
fn test_removing_record_changes_root() {
    let r1 = build_tree(four_records(), &params()).unwrap().root();

    let without_c: Vec<_> = four_records().into_iter().filter(|r| *r != bid_token()).collect();
    let r2 = build_tree(without_c, &params()).unwrap().root();
    assert_ne!(r1, r2);
}

#[test]
fn test_unpaired_leaf_verifies_under_carry_up() {
    let built = build_tree(vec![ethereum(), expanse(), ropsten()], &params()).unwrap();
    assert_eq!(built.tree.leaf_count(), 3);

    let proof = proof_for(&built.tree, 2).unwrap();
    assert_eq!(proof.steps.len(), 1);
    assert!(verify_proof(HashAlgorithm::Blake3, &built.tree.leaves()[2], &proof, &built.root()));
}

#[test]
fn test_duplicate_identity_rejected() {
    let dup = DefinitionRecord::network(1, 60, "ETH", "Ethereum Mainnet");
    let err = build_tree(vec![ethereum(), expanse(), dup], &params()).unwrap_err();
    assert_eq!(
        err,
        DefinitionError::DuplicateRecord {
            identity: "network:eth/chain-id/1".to_string()
        }
    );
}

#[test]
fn test_malformed_record_aborts_build() {
    let bad = DefinitionRecord::network(5, 1, "", "Goerli");
    let err = build_tree(vec![ethereum(), bad], &params()).unwrap_err();
    assert!(matches!(err, DefinitionError::MalformedRecord { identity, .. } if identity == "network:eth/chain-id/5"));
}

#[test]
fn test_leaves_ordered_by_identity() {
    let built = build_tree(sample_records().into_iter().rev(), &params()).unwrap();
    let keys: Vec<_> = built.records.iter().map(|r| r.identity_key()).collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);

    // networks first, then tokens
    let first_token = keys.iter().position(|k| k.kind == DefinitionKind::Token).unwrap();
    assert!(keys[..first_token].iter().all(|k| k.kind == DefinitionKind::Network));
    assert!(keys[first_token..].iter().all(|k| k.kind == DefinitionKind::Token));
}

#[test]
fn test_every_field_mutation_changes_root() {
    let base = build_tree(four_records(), &params()).unwrap().root();

    let mut mutants = Vec::new();
    for (i, record) in four_records().iter().enumerate() {
        let variants: Vec<DefinitionPayload> = match record.payload().clone() {
            DefinitionPayload::EthereumNetwork(n) => vec![
                DefinitionPayload::EthereumNetwork(NetworkInfo { slip44: n.slip44 + 1, ..n.clone() }),
                DefinitionPayload::EthereumNetwork(NetworkInfo { symbol: format!("{}X", n.symbol), ..n.clone() }),
                DefinitionPayload::EthereumNetwork(NetworkInfo { name: format!("{} 2", n.name), ..n }),
            ],
            DefinitionPayload::EthereumToken(t) => vec![
                DefinitionPayload::EthereumToken(TokenInfo { decimals: t.decimals.wrapping_add(1), ..t.clone() }),
                DefinitionPayload::EthereumToken(TokenInfo { symbol: format!("{}X", t.symbol), ..t.clone() }),
                DefinitionPayload::EthereumToken(TokenInfo { name: format!("{} 2", t.name), ..t }),
            ],
            DefinitionPayload::SolanaToken(_) => unreachable!(),
        };
        for payload in variants {
            let mut records = four_records();
            records[i] = DefinitionRecord::new(payload);
            mutants.push(records);
        }
    }

    for records in mutants {
        assert_ne!(build_tree(records, &params()).unwrap().root(), base);
    }
}

#[test]
fn test_timestamp_changes_root() {
    let a = build_tree(four_records(), &params()).unwrap().root();
    let b = build_tree(four_records(), &BuildParams::new(TS + 1)).unwrap().root();
    assert_ne!(a, b);
}

#[test]
fn test_empty_set_root_is_sentinel() {
    let built = build_tree(Vec::new(), &params()).unwrap();
    assert_eq!(built.root(), empty_root(HashAlgorithm::Blake3));
    assert_eq!(built.root(), HashAlgorithm::Blake3.digest(b""));
}

#[test]
fn test_hash_policy_selects_function() {
    let sha = params().with_hash_algorithm(HashAlgorithm::Sha256);
    let a = build_tree(four_records(), &params()).unwrap().root();
    let b = build_tree(four_records(), &sha).unwrap().root();
    assert_ne!(a, b);
}
