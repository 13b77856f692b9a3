// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use anyhow::Context;
use defsign_kernel::{ArtifactIndex, ProofBundle};
use defsign_persistence::artifact::read_artifact;
use std::fs;
use std::path::Path;

/// Looks up one definition in a published artifact and prints its proof
/// bundle as JSON. With `blob_out`, also writes the device blob.
pub fn run(
    artifact: &Path,
    kind: &str,
    identifier: &str,
    signers: Option<&Path>,
    dev: bool,
    blob_out: Option<&Path>,
) -> anyhow::Result<ProofBundle> {
    let signers = super::resolve_signers(signers, dev)?;
    let artifact = read_artifact(artifact).with_context(|| format!("reading artifact {}", artifact.display()))?;
    let index = ArtifactIndex::open(artifact, &signers)?;

    let key = super::parse_identity(kind, identifier)?;
    let bundle = index.bundle(&key)?;
    println!("{}", serde_json::to_string_pretty(&bundle)?);

    if let Some(path) = blob_out {
        let blob = index.blob_for(&key)?;
        fs::write(path, &blob).with_context(|| format!("writing blob {}", path.display()))?;
        eprintln!("Wrote {} bytes to {}", blob.len(), path.display());
    }
    Ok(bundle)
}
