// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use defsign_kernel::{DefinitionSignature, Digest};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub leaf_count: usize,
}

/// Currently served root and what a verifier needs to reproduce it.
#[derive(Debug, Serialize, Deserialize)]
pub struct RootResponse {
    pub root: Digest,
    pub hash_algorithm: String,
    pub odd_node_policy: String,
    pub leaf_count: usize,
    pub timestamp: u32,
    pub signature: DefinitionSignature,
}
