// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use defsign_kernel::{DefinitionKind, PublishedArtifact};
use defsign_persistence::definitions_file::DefinitionsFile;
use std::fs;
use std::path::Path;

/// Summarizes a published artifact or a definitions file.
pub fn run(path: &Path) -> anyhow::Result<()> {
    let raw = fs::read(path)?;
    let value: serde_json::Value = serde_json::from_slice(&raw)?;

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Property", "Value"]);

    if value.get("format_version").is_some() {
        let artifact: PublishedArtifact = serde_json::from_value(value)?;
        let networks = artifact.records.iter().filter(|r| r.kind() == DefinitionKind::Network).count();

        table.add_row(vec!["Type", "Published artifact"]);
        table.add_row(vec!["Format Version", &artifact.format_version.to_string()]);
        table.add_row(vec!["Hash Algorithm", &artifact.hash_algorithm]);
        table.add_row(vec!["Odd-Node Policy", &artifact.odd_node_policy]);
        table.add_row(vec![
            "Timestamp",
            &format!("{} ({})", artifact.timestamp, super::format_timestamp(artifact.timestamp)),
        ]);
        table.add_row(vec!["Leaves", &artifact.leaf_count.to_string()]);
        table.add_row(vec!["Networks", &networks.to_string()]);
        table.add_row(vec!["Tokens", &(artifact.records.len() - networks).to_string()]);
        table.add_row(vec!["Merkle Root", &artifact.merkle_root.to_hex()]);
        table.add_row(vec!["Signature", &signature_summary(artifact.signature.map(|s| s.sigmask))]);
    } else {
        let file: DefinitionsFile = serde_json::from_value(value)?;
        let live = file.data.to_records().map(|r| r.len().to_string()).unwrap_or_else(|e| format!("invalid: {e}"));
        let meta = &file.metadata;

        table.add_row(vec!["Type", "Definitions file"]);
        table.add_row(vec!["Networks", &file.data.networks.len().to_string()]);
        table.add_row(vec!["ERC-20 Tokens", &file.data.erc20_tokens.len().to_string()]);
        table.add_row(vec!["Solana Tokens", &file.data.solana_tokens.len().to_string()]);
        table.add_row(vec!["Signable Records", &live]);
        table.add_row(vec!["Proposed At", meta.datetime.as_deref().unwrap_or("-")]);
        table.add_row(vec![
            "Hash Algorithm",
            meta.hash_algorithm.as_deref().unwrap_or("-"),
        ]);
        table.add_row(vec![
            "Merkle Root",
            &meta.merkle_root.map(|r| r.to_hex()).unwrap_or_else(|| "-".to_string()),
        ]);
        table.add_row(vec!["Signature", &signature_summary(meta.signature.map(|s| s.sigmask))]);
    }

    println!("\n{}", path.display());
    println!("{table}\n");
    Ok(())
}

fn signature_summary(sigmask: Option<u8>) -> String {
    match sigmask {
        Some(mask) => format!("present, {} signers (sigmask {mask:#010b})", mask.count_ones()),
        None => "MISSING".to_string(),
    }
}
