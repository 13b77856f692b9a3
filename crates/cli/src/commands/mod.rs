// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
pub mod diff;
pub mod generate;
pub mod inspect;
pub mod propose;
pub mod query;
pub mod sign;

use anyhow::{anyhow, Context};
use defsign_kernel::cosi::dev_signer_set;
use defsign_kernel::{DefinitionKind, IdentityKey, SignerSet};
use defsign_persistence::signers::load_signers;
use std::path::Path;

/// Trusted keys from `--signers <file>`, or the development set with `--dev`.
pub fn resolve_signers(signers: Option<&Path>, dev: bool) -> anyhow::Result<SignerSet> {
    match (signers, dev) {
        (Some(path), _) => load_signers(path).with_context(|| format!("loading signer set {}", path.display())),
        (None, true) => {
            tracing::warn!("trusting development keys");
            Ok(dev_signer_set())
        }
        (None, false) => Err(anyhow!("no signer set given; pass --signers <file> or --dev")),
    }
}

pub fn parse_identity(kind: &str, identifier: &str) -> anyhow::Result<IdentityKey> {
    let kind = DefinitionKind::parse(kind).ok_or_else(|| anyhow!("unknown definition kind {kind:?}"))?;
    Ok(IdentityKey::new(kind, identifier))
}

pub fn format_timestamp(ts: u32) -> String {
    chrono::DateTime::from_timestamp(ts as i64, 0)
        .unwrap_or_default()
        .to_rfc3339()
}
