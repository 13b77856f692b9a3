// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Merkle tree over canonical definition records.
//!
//! # Hash Input Structure
//! ```text
//! leaf  = H(0x00 || canonical_bytes(record))
//! node  = H(0x01 || left || right)
//! empty = H("")
//! ```
//!
//! Leaves are ordered by identity key before hashing. A level with an odd
//! number of nodes promotes its last node unchanged (carry-up).

use crate::canonical::canonicalize;
use crate::config::BuildParams;
use crate::error::{DefinitionError, Result};
use crate::types::id::IdentityKey;
use crate::types::record::DefinitionRecord;
use crate::types::{Digest, HashAlgorithm, OddNodePolicy};

pub const LEAF_PREFIX: u8 = 0x00;
pub const NODE_PREFIX: u8 = 0x01;

pub fn leaf_hash(algorithm: HashAlgorithm, canonical: &[u8]) -> Digest {
    algorithm.digest_parts(&[&[LEAF_PREFIX], canonical])
}

pub fn node_hash(algorithm: HashAlgorithm, left: &Digest, right: &Digest) -> Digest {
    algorithm.digest_parts(&[&[NODE_PREFIX], left.as_bytes(), right.as_bytes()])
}

/// Root of a tree with no leaves.
pub fn empty_root(algorithm: HashAlgorithm) -> Digest {
    algorithm.digest(&[])
}

/// Binary hash tree stored level by level, leaves first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MerkleTree {
    algorithm: HashAlgorithm,
    policy: OddNodePolicy,
    levels: Vec<Vec<Digest>>,
}

impl MerkleTree {
    pub fn from_leaves(algorithm: HashAlgorithm, leaves: Vec<Digest>) -> Self {
        let mut levels = vec![leaves];

        while levels[levels.len() - 1].len() > 1 {
            let current = &levels[levels.len() - 1];
            let mut next = Vec::with_capacity(current.len().div_ceil(2));
            for pair in current.chunks(2) {
                match pair {
                    [left, right] => next.push(node_hash(algorithm, left, right)),
                    [single] => next.push(*single),
                    _ => unreachable!("chunks(2) yields one or two items"),
                }
            }
            levels.push(next);
        }

        Self {
            algorithm,
            policy: OddNodePolicy::CarryUp,
            levels,
        }
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    pub fn policy(&self) -> OddNodePolicy {
        self.policy
    }

    pub fn root(&self) -> Digest {
        match self.levels.last().and_then(|top| top.first()) {
            Some(root) => *root,
            None => empty_root(self.algorithm),
        }
    }

    pub fn leaves(&self) -> &[Digest] {
        &self.levels[0]
    }

    pub fn leaf_count(&self) -> usize {
        self.levels[0].len()
    }

    /// Levels from leaves (index 0) up to the root.
    pub fn levels(&self) -> &[Vec<Digest>] {
        &self.levels
    }

    /// Number of hashing levels above the leaves.
    pub fn depth(&self) -> usize {
        self.levels.len() - 1
    }
}

/// Records in leaf order together with the tree built over them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuiltTree {
    pub records: Vec<DefinitionRecord>,
    pub tree: MerkleTree,
}

impl BuiltTree {
    pub fn root(&self) -> Digest {
        self.tree.root()
    }
}

/// Orders, validates and hashes `records`, then builds the tree.
///
/// Input order does not matter. Fails on the first malformed record or the
/// first identity collision; nothing is returned in that case.
pub fn build_tree<I>(records: I, params: &BuildParams) -> Result<BuiltTree>
where
    I: IntoIterator<Item = DefinitionRecord>,
{
    let mut keyed: Vec<(IdentityKey, DefinitionRecord)> =
        records.into_iter().map(|r| (r.identity_key(), r)).collect();
    keyed.sort_by(|a, b| a.0.cmp(&b.0));

    if let Some(dup) = keyed.windows(2).find(|w| w[0].0 == w[1].0) {
        tracing::warn!(identity = %dup[0].0, "duplicate definition rejected");
        return Err(DefinitionError::DuplicateRecord {
            identity: dup[0].0.to_string(),
        });
    }

    tracing::debug!(
        leaves = keyed.len(),
        algorithm = %params.hash_algorithm,
        timestamp = params.timestamp,
        "building merkle tree"
    );

    let mut leaves = Vec::with_capacity(keyed.len());
    let mut ordered = Vec::with_capacity(keyed.len());
    for (_, record) in keyed {
        let bytes = canonicalize(&record, params.timestamp)?;
        leaves.push(leaf_hash(params.hash_algorithm, &bytes));
        ordered.push(record);
    }

    let tree = MerkleTree::from_leaves(params.hash_algorithm, leaves);
    tracing::info!(root = %tree.root(), leaves = tree.leaf_count(), "merkle root computed");

    Ok(BuiltTree { records: ordered, tree })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digests(n: u8) -> Vec<Digest> {
        (0..n).map(|i| HashAlgorithm::Blake3.digest(&[i])).collect()
    }

    #[test]
    fn test_single_leaf_is_root() {
        let leaves = digests(1);
        let tree = MerkleTree::from_leaves(HashAlgorithm::Blake3, leaves.clone());
        assert_eq!(tree.root(), leaves[0]);
        assert_eq!(tree.depth(), 0);
    }

    #[test]
    fn test_empty_tree_uses_sentinel() {
        let tree = MerkleTree::from_leaves(HashAlgorithm::Sha256, Vec::new());
        assert_eq!(tree.root(), HashAlgorithm::Sha256.digest(b""));
        assert_eq!(tree.leaf_count(), 0);
    }

    #[test]
    fn test_three_leaves_carry_up() {
        let alg = HashAlgorithm::Blake3;
        let l = digests(3);
        let tree = MerkleTree::from_leaves(alg, l.clone());

        let expected = node_hash(alg, &node_hash(alg, &l[0], &l[1]), &l[2]);
        assert_eq!(tree.root(), expected);
        assert_eq!(tree.levels()[1], vec![node_hash(alg, &l[0], &l[1]), l[2]]);
    }

    #[test]
    fn test_leaf_and_node_domains_differ() {
        let alg = HashAlgorithm::Blake3;
        let a = digests(2);
        let mut concat = Vec::new();
        concat.extend_from_slice(a[0].as_bytes());
        concat.extend_from_slice(a[1].as_bytes());
        assert_ne!(leaf_hash(alg, &concat), node_hash(alg, &a[0], &a[1]));
    }
}
