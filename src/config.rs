// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Configuration constants and build parameters.

use serde::{Deserialize, Serialize};

use crate::types::{HashAlgorithm, OddNodePolicy};

/// Version of the published artifact layout.
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

/// Maximum proof depth; supports up to 2^32 leaves.
pub const MAX_PROOF_DEPTH: usize = 32;

/// Device-side size budget for one blob (record + proof + signature).
pub const MAX_BLOB_LEN: usize = 1024;

/// Minimum number of trusted keys that must co-sign a root.
pub const DEFAULT_SIGNER_THRESHOLD: usize = 2;

/// Parameters fixed for one signing cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildParams {
    /// Unix timestamp embedded in every canonical record of the cycle.
    pub timestamp: u32,
    pub hash_algorithm: HashAlgorithm,
    pub odd_node_policy: OddNodePolicy,
}

impl BuildParams {
    pub fn new(timestamp: u32) -> Self {
        Self {
            timestamp,
            hash_algorithm: HashAlgorithm::default(),
            odd_node_policy: OddNodePolicy::default(),
        }
    }

    pub fn with_hash_algorithm(mut self, hash_algorithm: HashAlgorithm) -> Self {
        self.hash_algorithm = hash_algorithm;
        self
    }
}
