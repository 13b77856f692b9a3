// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Definitions source file.
//!
//! Upstream collectors write `networks`, `erc20_tokens` and `solana_tokens`;
//! the signing workflow adds a `metadata` block recording the proposed root
//! and, once signed, its signature.

use crate::atomic::write_json_atomic;
use crate::error::{PersistenceError, Result};
use defsign_kernel::types::source::DefinitionsData;
use defsign_kernel::{BuildParams, DatasetSnapshot, DefinitionSignature, Digest, HashAlgorithm};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefinitionsMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datetime: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unix_timestamp: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash_algorithm: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merkle_root: Option<Digest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<DefinitionSignature>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefinitionsFile {
    #[serde(default)]
    pub metadata: DefinitionsMetadata,
    #[serde(flatten)]
    pub data: DefinitionsData,
}

impl DefinitionsFile {
    pub fn new(data: DefinitionsData) -> Self {
        Self {
            metadata: DefinitionsMetadata::default(),
            data,
        }
    }

    /// Build parameters of the recorded proposal.
    pub fn build_params(&self) -> Result<BuildParams> {
        let timestamp = self
            .metadata
            .unix_timestamp
            .ok_or(PersistenceError::MissingMetadata("unix_timestamp"))?;
        let algorithm = match &self.metadata.hash_algorithm {
            Some(id) => HashAlgorithm::from_id(id)?,
            None => HashAlgorithm::default(),
        };
        Ok(BuildParams::new(timestamp).with_hash_algorithm(algorithm))
    }

    pub fn recorded_root(&self) -> Result<Digest> {
        self.metadata
            .merkle_root
            .ok_or(PersistenceError::MissingMetadata("merkle_root"))
    }

    /// Rebuilds the snapshot described by the data and recorded parameters.
    pub fn snapshot(&self) -> Result<DatasetSnapshot> {
        let params = self.build_params()?;
        Ok(DatasetSnapshot::build(self.data.to_records()?, params)?)
    }

    /// Records a new proposal. Any signature over an earlier root is dropped.
    pub fn record_proposal(&mut self, snapshot: &DatasetSnapshot, datetime: String) {
        self.metadata = DefinitionsMetadata {
            datetime: Some(datetime),
            unix_timestamp: Some(snapshot.timestamp()),
            hash_algorithm: Some(snapshot.hash_algorithm().id().to_string()),
            merkle_root: Some(snapshot.root()),
            signature: None,
        };
    }
}

pub fn load_definitions(path: impl AsRef<Path>) -> Result<DefinitionsFile> {
    let raw = fs::read(path.as_ref())?;
    let file: DefinitionsFile = serde_json::from_slice(&raw)?;
    tracing::debug!(
        path = %path.as_ref().display(),
        entries = file.data.len(),
        "loaded definitions file"
    );
    Ok(file)
}

pub fn store_definitions(path: impl AsRef<Path>, file: &DefinitionsFile) -> Result<()> {
    write_json_atomic(path, file)
}
