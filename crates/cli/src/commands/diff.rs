// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use anyhow::Context;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use defsign_kernel::diff::{diff_records, SnapshotDiff};
use defsign_kernel::{DefinitionRecord, PublishedArtifact};
use defsign_persistence::definitions_file::DefinitionsFile;
use std::fs;
use std::path::Path;

fn load_records(path: &Path) -> anyhow::Result<Vec<DefinitionRecord>> {
    let raw = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_slice(&raw)?;
    if value.get("format_version").is_some() {
        let artifact: PublishedArtifact = serde_json::from_value(value)?;
        Ok(artifact.records)
    } else {
        let file: DefinitionsFile = serde_json::from_value(value)?;
        Ok(file.data.to_records()?)
    }
}

/// Record-level comparison of two definitions files or artifacts.
pub fn run(old: &Path, new: &Path) -> anyhow::Result<SnapshotDiff> {
    let diff = diff_records(&load_records(old)?, &load_records(new)?);

    let mut summary = Table::new();
    summary
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Change", "Count"]);
    summary.add_row(vec!["Added", &diff.added.len().to_string()]);
    summary.add_row(vec!["Removed", &diff.removed.len().to_string()]);
    summary.add_row(vec!["Modified", &diff.modified.len().to_string()]);
    summary.add_row(vec!["Sensitive", &diff.sensitive().count().to_string()]);

    println!("\nDefinitions Diff");
    println!("----------------");
    println!("{summary}\n");

    if diff.is_empty() {
        println!("No changes.");
        return Ok(diff);
    }

    let mut details = Table::new();
    details
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Change", "Identity", "Symbol", "Details"]);
    for record in &diff.added {
        details.add_row(vec![
            "ADDED".to_string(),
            record.identity_key().to_string(),
            record.symbol().to_string(),
            record.name().to_string(),
        ]);
    }
    for record in &diff.removed {
        details.add_row(vec![
            "REMOVED".to_string(),
            record.identity_key().to_string(),
            record.symbol().to_string(),
            record.name().to_string(),
        ]);
    }
    for m in &diff.modified {
        let label = if m.sensitive { "MODIFIED (!)" } else { "MODIFIED" };
        let changes: Vec<String> = m
            .changed_fields
            .iter()
            .map(|field| match *field {
                "symbol" => format!("symbol {} -> {}", m.old.symbol(), m.new.symbol()),
                "decimals" => format!(
                    "decimals {} -> {}",
                    m.old.decimals().unwrap_or_default(),
                    m.new.decimals().unwrap_or_default()
                ),
                "name" => format!("name {:?} -> {:?}", m.old.name(), m.new.name()),
                other => other.to_string(),
            })
            .collect();
        details.add_row(vec![
            label.to_string(),
            m.identity.to_string(),
            m.new.symbol().to_string(),
            changes.join(", "),
        ]);
    }
    println!("{details}\n");

    for m in diff.sensitive() {
        println!("WARNING: {} changes symbol or decimals; review before signing", m.identity);
    }
    Ok(diff)
}
