// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use anyhow::Context;
use defsign_kernel::{BuildParams, DatasetSnapshot, Digest, HashAlgorithm};
use defsign_persistence::definitions_file::{load_definitions, store_definitions};
use std::path::Path;

/// Computes the root of the definitions file and records it for signing.
///
/// Any signature over an earlier root is discarded.
pub fn run(definitions: &Path, timestamp: Option<u32>, algorithm: HashAlgorithm) -> anyhow::Result<Digest> {
    let mut file = load_definitions(definitions)
        .with_context(|| format!("reading definitions {}", definitions.display()))?;

    let now = chrono::Utc::now();
    let timestamp = match timestamp {
        Some(ts) => ts,
        None => u32::try_from(now.timestamp()).context("current time does not fit a u32 timestamp")?,
    };
    let params = BuildParams::new(timestamp).with_hash_algorithm(algorithm);

    let records = file.data.to_records()?;
    let snapshot = DatasetSnapshot::build(records, params)?;
    let proposal = snapshot.propose_root();

    let datetime = chrono::DateTime::from_timestamp(timestamp as i64, 0)
        .unwrap_or(now)
        .to_rfc3339();
    file.record_proposal(&snapshot, datetime);
    store_definitions(definitions, &file)?;

    println!("Merkle root: {}", proposal.root);
    println!("Leaves:      {}", proposal.leaf_count);
    println!("Timestamp:   {} ({})", proposal.timestamp, super::format_timestamp(proposal.timestamp));
    println!("Hash:        {}", proposal.hash_algorithm);
    Ok(proposal.root)
}
