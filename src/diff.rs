// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Record-level difference between two snapshots.
//!
//! Reviewers sign a whole root, so the diff is how they see what a new
//! cycle actually changes. A changed symbol or decimals count can make a
//! device display wrong amounts and is flagged as sensitive.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::types::id::IdentityKey;
use crate::types::record::{DefinitionPayload, DefinitionRecord};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModifiedRecord {
    pub identity: IdentityKey,
    pub old: DefinitionRecord,
    pub new: DefinitionRecord,
    pub changed_fields: Vec<&'static str>,
    pub sensitive: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SnapshotDiff {
    pub added: Vec<DefinitionRecord>,
    pub removed: Vec<DefinitionRecord>,
    pub modified: Vec<ModifiedRecord>,
}

impl SnapshotDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.modified.is_empty()
    }

    pub fn sensitive(&self) -> impl Iterator<Item = &ModifiedRecord> {
        self.modified.iter().filter(|m| m.sensitive)
    }
}

fn changed_fields(old: &DefinitionRecord, new: &DefinitionRecord) -> Vec<&'static str> {
    let mut fields = Vec::new();
    if old.symbol() != new.symbol() {
        fields.push("symbol");
    }
    if old.name() != new.name() {
        fields.push("name");
    }
    if old.decimals() != new.decimals() {
        fields.push("decimals");
    }
    if let (DefinitionPayload::EthereumNetwork(a), DefinitionPayload::EthereumNetwork(b)) = (old.payload(), new.payload())
    {
        if a.slip44 != b.slip44 {
            fields.push("slip44");
        }
    }
    fields
}

/// Compares two record sets by identity. Output is ordered by identity key.
pub fn diff_records(old: &[DefinitionRecord], new: &[DefinitionRecord]) -> SnapshotDiff {
    let old_map: BTreeMap<IdentityKey, &DefinitionRecord> = old.iter().map(|r| (r.identity_key(), r)).collect();
    let new_map: BTreeMap<IdentityKey, &DefinitionRecord> = new.iter().map(|r| (r.identity_key(), r)).collect();

    let mut diff = SnapshotDiff::default();
    for (key, old_rec) in &old_map {
        match new_map.get(key) {
            None => diff.removed.push((*old_rec).clone()),
            Some(new_rec) if new_rec != old_rec => {
                let changed_fields = changed_fields(old_rec, new_rec);
                let sensitive = changed_fields.iter().any(|f| *f == "symbol" || *f == "decimals");
                diff.modified.push(ModifiedRecord {
                    identity: key.clone(),
                    old: (*old_rec).clone(),
                    new: (*new_rec).clone(),
                    changed_fields,
                    sensitive,
                });
            }
            Some(_) => {}
        }
    }
    diff.added = new_map
        .iter()
        .filter(|(key, _)| !old_map.contains_key(*key))
        .map(|(_, r)| (*r).clone())
        .collect();

    tracing::debug!(
        added = diff.added.len(),
        removed = diff.removed.len(),
        modified = diff.modified.len(),
        "snapshot diff computed"
    );
    diff
}
