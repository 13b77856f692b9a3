// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Per-record blob tree served to devices.
//!
//! ```text
//! eth/chain-id/<chain_id>/network.dat
//! eth/slip44/<slip44>/network.dat          lowest chain id wins
//! eth/chain-id/<chain_id>/token-<address>.dat
//! solana/token/<mint>.dat
//! artifact.json
//! ```
//!
//! A published directory always holds exactly one snapshot: [`publish`]
//! builds the whole tree beside the target and swaps it in.

use crate::artifact::{write_artifact, ARTIFACT_FILE_NAME};
use crate::atomic::write_atomic;
use crate::error::{PersistenceError, Result};
use defsign_kernel::config::MAX_BLOB_LEN;
use defsign_kernel::types::record::DefinitionPayload;
use defsign_kernel::{ArtifactIndex, DefinitionRecord, PublishedArtifact};
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub files_written: usize,
    /// Blobs above the device size budget, relative to the output directory.
    pub oversized: Vec<PathBuf>,
}

/// Path of the primary blob for `record`, relative to the export root.
pub fn blob_path(record: &DefinitionRecord) -> PathBuf {
    match record.payload() {
        DefinitionPayload::EthereumNetwork(n) => PathBuf::from(format!("eth/chain-id/{}/network.dat", n.chain_id)),
        DefinitionPayload::EthereumToken(t) => {
            PathBuf::from(format!("eth/chain-id/{}/token-{}.dat", t.chain_id, t.address.to_hex()))
        }
        DefinitionPayload::SolanaToken(s) => PathBuf::from(format!("solana/token/{}.dat", s.mint)),
    }
}

pub fn slip44_path(slip44: u32) -> PathBuf {
    PathBuf::from(format!("eth/slip44/{slip44}/network.dat"))
}

/// Writes every record's device blob under `out_dir`.
pub fn export_blobs(index: &ArtifactIndex, out_dir: impl AsRef<Path>) -> Result<ExportReport> {
    let out_dir = out_dir.as_ref();
    let mut report = ExportReport::default();

    // slip44 -> (chain_id, blob)
    let mut by_slip44: BTreeMap<u32, (u64, Vec<u8>)> = BTreeMap::new();

    for record in index.records() {
        let blob = index.blob_for(&record.identity_key())?;
        let rel = blob_path(record);
        write_blob(out_dir, &rel, &blob, &mut report)?;

        if let DefinitionPayload::EthereumNetwork(n) = record.payload() {
            let replace = by_slip44.get(&n.slip44).map_or(true, |(chain_id, _)| n.chain_id < *chain_id);
            if replace {
                by_slip44.insert(n.slip44, (n.chain_id, blob));
            }
        }
    }

    for (slip44, (_, blob)) in &by_slip44 {
        write_blob(out_dir, &slip44_path(*slip44), blob, &mut report)?;
    }

    tracing::info!(
        out_dir = %out_dir.display(),
        files = report.files_written,
        oversized = report.oversized.len(),
        "exported definition blobs"
    );
    Ok(report)
}

fn write_blob(out_dir: &Path, rel: &Path, blob: &[u8], report: &mut ExportReport) -> Result<()> {
    if blob.len() > MAX_BLOB_LEN {
        tracing::warn!(path = %rel.display(), len = blob.len(), limit = MAX_BLOB_LEN, "blob exceeds device size budget");
        report.oversized.push(rel.to_path_buf());
    }
    write_atomic(out_dir.join(rel), blob)?;
    report.files_written += 1;
    Ok(())
}

fn sibling(dir: &Path, suffix: &str) -> Result<PathBuf> {
    let name = dir
        .file_name()
        .ok_or_else(|| PersistenceError::InvalidFormat(format!("cannot publish into {}", dir.display())))?;
    let mut sibling = OsString::from(".");
    sibling.push(name);
    sibling.push(suffix);
    Ok(dir.with_file_name(sibling))
}

/// Replaces `out_dir` with `artifact.json` plus the blob tree of `index`.
///
/// Everything is written to a staging directory first; `out_dir` is only
/// touched once the new tree is complete, so files of a previous snapshot
/// never survive next to the new one.
pub fn publish(artifact: &PublishedArtifact, index: &ArtifactIndex, out_dir: impl AsRef<Path>) -> Result<ExportReport> {
    let out_dir = out_dir.as_ref();
    if artifact.merkle_root != index.root() {
        return Err(PersistenceError::InvalidFormat(format!(
            "artifact root {} does not match index root {}",
            artifact.merkle_root,
            index.root()
        )));
    }

    let staging = sibling(out_dir, ".staging")?;
    let retired = sibling(out_dir, ".old")?;
    if staging.exists() {
        fs::remove_dir_all(&staging)?;
    }
    fs::create_dir_all(&staging)?;

    let staged = write_artifact(staging.join(ARTIFACT_FILE_NAME), artifact).and_then(|_| export_blobs(index, &staging));
    let report = match staged {
        Ok(report) => report,
        Err(e) => {
            if let Err(cleanup) = fs::remove_dir_all(&staging) {
                tracing::warn!(path = %staging.display(), error = %cleanup, "failed to remove staging directory");
            }
            return Err(e);
        }
    };

    if out_dir.exists() {
        if retired.exists() {
            fs::remove_dir_all(&retired)?;
        }
        fs::rename(out_dir, &retired)?;
        fs::rename(&staging, out_dir)?;
        fs::remove_dir_all(&retired)?;
    } else {
        fs::rename(&staging, out_dir)?;
    }

    tracing::info!(out_dir = %out_dir.display(), root = %index.root(), "published snapshot");
    Ok(report)
}
