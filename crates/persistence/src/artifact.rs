// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use crate::atomic::write_json_atomic;
use crate::error::Result;
use defsign_kernel::PublishedArtifact;
use std::fs;
use std::path::Path;

pub const ARTIFACT_FILE_NAME: &str = "artifact.json";

pub fn write_artifact(path: impl AsRef<Path>, artifact: &PublishedArtifact) -> Result<()> {
    write_json_atomic(path, artifact)
}

pub fn read_artifact(path: impl AsRef<Path>) -> Result<PublishedArtifact> {
    let raw = fs::read(path)?;
    Ok(serde_json::from_slice(&raw)?)
}
