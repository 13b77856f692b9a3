// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use crate::atomic::write_json_atomic;
use crate::error::Result;
use defsign_kernel::SignerSet;
use std::fs;
use std::path::Path;

/// Loads a signer set: `{"threshold": 2, "public_keys": ["<hex>", ...]}`.
pub fn load_signers(path: impl AsRef<Path>) -> Result<SignerSet> {
    let raw = fs::read(path)?;
    Ok(serde_json::from_slice(&raw)?)
}

pub fn write_signers(path: impl AsRef<Path>, signers: &SignerSet) -> Result<()> {
    write_json_atomic(path, signers)
}
