// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use anyhow::Context;
use defsign_kernel::{finalize, ArtifactIndex, DefinitionError};
use defsign_persistence::artifact::ARTIFACT_FILE_NAME;
use defsign_persistence::definitions_file::load_definitions;
use defsign_persistence::export::{publish, ExportReport};
use std::path::Path;

/// Rebuilds the signed snapshot and replaces `out_dir` with its
/// `artifact.json` and blob tree.
pub fn run(definitions: &Path, out_dir: &Path, signers: Option<&Path>, dev: bool) -> anyhow::Result<ExportReport> {
    let file = load_definitions(definitions)
        .with_context(|| format!("reading definitions {}", definitions.display()))?;
    let signers = super::resolve_signers(signers, dev)?;

    let recorded = file.recorded_root()?;
    let snapshot = file.snapshot()?;
    if snapshot.root() != recorded {
        return Err(DefinitionError::RootMismatch {
            expected: recorded.to_hex(),
            computed: snapshot.root().to_hex(),
        }
        .into());
    }

    let signature = file
        .metadata
        .signature
        .context("definitions are not signed; run `defsign sign` first")?;
    let signed = snapshot.attach_signature(signature, &signers)?;
    let artifact = finalize(&signed);

    let index = ArtifactIndex::open(artifact.clone(), &signers)?;
    let report = publish(&artifact, &index, out_dir)
        .with_context(|| format!("publishing into {}", out_dir.display()))?;
    let artifact_path = out_dir.join(ARTIFACT_FILE_NAME);

    println!("Artifact: {}", artifact_path.display());
    println!("Root:     {}", index.root());
    println!("Blobs:    {}", report.files_written);
    for path in &report.oversized {
        println!("WARNING: {} exceeds the device size budget", path.display());
    }
    Ok(report)
}
