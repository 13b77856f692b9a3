// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Inclusion proofs.
//!
//! A proof is the list of sibling hashes met on the way from a leaf to the
//! root, each tagged with the side the sibling sits on. Levels where the
//! node was carried up have no sibling and contribute no step, so a verifier
//! needs nothing beyond the steps themselves to fold back to the root.
//!
//! # Binary Layout
//! ```text
//! leaf_index   u32 LE
//! leaf_count   u32 LE
//! step_count   u8
//! steps        step_count x (side u8 [0 = left, 1 = right], sibling 32 bytes)
//! ```

use std::io::{Cursor, Read};

use byteorder::{LittleEndian, ReadBytesExt};
use serde::{Deserialize, Serialize};

use crate::config::MAX_PROOF_DEPTH;
use crate::error::{DefinitionError, Result};
use crate::merkle::{node_hash, MerkleTree};
use crate::types::{Digest, HashAlgorithm, DIGEST_LEN};

/// Position of a sibling relative to the node being folded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    fn to_byte(self) -> u8 {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }

    fn from_byte(b: u8) -> Option<Self> {
        match b {
            0 => Some(Side::Left),
            1 => Some(Side::Right),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofStep {
    pub side: Side,
    pub sibling: Digest,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InclusionProof {
    pub leaf_index: u32,
    pub leaf_count: u32,
    pub steps: Vec<ProofStep>,
}

/// Sides a valid proof for `index` in a tree of `count` leaves must carry.
fn expected_sides(mut index: usize, mut count: usize) -> Vec<Side> {
    let mut sides = Vec::new();
    while count > 1 {
        if index % 2 == 1 {
            sides.push(Side::Left);
        } else if index + 1 < count {
            sides.push(Side::Right);
        }
        index /= 2;
        count = count.div_ceil(2);
    }
    sides
}

impl InclusionProof {
    /// Folds `leaf` through every step.
    pub fn compute_root(&self, algorithm: HashAlgorithm, leaf: Digest) -> Digest {
        self.steps.iter().fold(leaf, |acc, step| match step.side {
            Side::Left => node_hash(algorithm, &step.sibling, &acc),
            Side::Right => node_hash(algorithm, &acc, &step.sibling),
        })
    }

    /// Structural checks for proofs received from outside.
    pub fn validate(&self) -> Result<()> {
        if self.steps.len() > MAX_PROOF_DEPTH {
            return Err(DefinitionError::InvalidBlob(format!(
                "proof depth {} exceeds {MAX_PROOF_DEPTH}",
                self.steps.len()
            )));
        }
        if self.leaf_index >= self.leaf_count {
            return Err(DefinitionError::IndexOutOfRange {
                index: self.leaf_index as usize,
                leaf_count: self.leaf_count as usize,
            });
        }
        let sides: Vec<Side> = self.steps.iter().map(|s| s.side).collect();
        if sides != expected_sides(self.leaf_index as usize, self.leaf_count as usize) {
            return Err(DefinitionError::InvalidBlob(format!(
                "proof path does not fit leaf {} of {}",
                self.leaf_index, self.leaf_count
            )));
        }
        Ok(())
    }

    pub fn encoded_len(&self) -> usize {
        4 + 4 + 1 + self.steps.len() * (1 + DIGEST_LEN)
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.encoded_len());
        buf.extend_from_slice(&self.leaf_index.to_le_bytes());
        buf.extend_from_slice(&self.leaf_count.to_le_bytes());
        // depth is bounded by MAX_PROOF_DEPTH for any tree we build
        buf.push(self.steps.len() as u8);
        for step in &self.steps {
            buf.push(step.side.to_byte());
            buf.extend_from_slice(step.sibling.as_bytes());
        }
        buf
    }

    /// Decodes a proof from the start of `data`, returning the bytes used.
    pub fn decode(data: &[u8]) -> Result<(Self, usize)> {
        let truncated = |e: std::io::Error| DefinitionError::InvalidBlob(format!("truncated proof: {e}"));
        let mut cursor = Cursor::new(data);

        let leaf_index = cursor.read_u32::<LittleEndian>().map_err(truncated)?;
        let leaf_count = cursor.read_u32::<LittleEndian>().map_err(truncated)?;
        let step_count = cursor.read_u8().map_err(truncated)? as usize;
        if step_count > MAX_PROOF_DEPTH {
            return Err(DefinitionError::InvalidBlob(format!("proof depth {step_count} exceeds {MAX_PROOF_DEPTH}")));
        }

        let mut steps = Vec::with_capacity(step_count);
        for _ in 0..step_count {
            let side_byte = cursor.read_u8().map_err(truncated)?;
            let side = Side::from_byte(side_byte)
                .ok_or_else(|| DefinitionError::InvalidBlob(format!("bad proof side {side_byte}")))?;
            let mut sibling = [0u8; DIGEST_LEN];
            cursor.read_exact(&mut sibling).map_err(truncated)?;
            steps.push(ProofStep {
                side,
                sibling: Digest(sibling),
            });
        }

        let proof = Self {
            leaf_index,
            leaf_count,
            steps,
        };
        Ok((proof, cursor.position() as usize))
    }
}

/// Collects the sibling path for the leaf at `index`.
pub fn proof_for(tree: &MerkleTree, index: usize) -> Result<InclusionProof> {
    let leaf_count = tree.leaf_count();
    if index >= leaf_count {
        return Err(DefinitionError::IndexOutOfRange { index, leaf_count });
    }

    let mut steps = Vec::with_capacity(tree.depth());
    let mut idx = index;
    for level in &tree.levels()[..tree.depth()] {
        let sibling_idx = idx ^ 1;
        if let Some(sibling) = level.get(sibling_idx) {
            let side = if idx % 2 == 0 { Side::Right } else { Side::Left };
            steps.push(ProofStep {
                side,
                sibling: *sibling,
            });
        }
        idx /= 2;
    }

    Ok(InclusionProof {
        leaf_index: index as u32,
        leaf_count: leaf_count as u32,
        steps,
    })
}

/// Checks that `leaf` folds through `proof` to `root`.
///
/// Needs only the proof's own steps; no tree, no record set.
pub fn verify_proof(algorithm: HashAlgorithm, leaf: &Digest, proof: &InclusionProof, root: &Digest) -> bool {
    proof.steps.len() <= MAX_PROOF_DEPTH && proof.compute_root(algorithm, *leaf) == *root
}
