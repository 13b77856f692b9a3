// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::sync::Arc;

use anyhow::Context;
use defsign_kernel::cosi::dev_signer_set;
use defsign_kernel::ArtifactIndex;
use defsign_node::config::NodeConfig;
use defsign_node::server::build_router;
use defsign_node::telemetry::init_telemetry;
use defsign_persistence::artifact::read_artifact;
use defsign_persistence::signers::load_signers;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_telemetry()?;

    let cfg = NodeConfig::from_env()?;
    tracing::info!("Initializing defsign node with config: {:?}", cfg);

    let signers = match (&cfg.signers_path, cfg.dev_keys) {
        (_, true) => {
            tracing::warn!("verifying against development signer keys");
            dev_signer_set()
        }
        (Some(path), false) => load_signers(path).with_context(|| format!("loading signers from {}", path.display()))?,
        (None, false) => anyhow::bail!("no signer set configured"),
    };

    let artifact = read_artifact(&cfg.artifact_path)
        .with_context(|| format!("reading artifact {}", cfg.artifact_path.display()))?;
    let index = ArtifactIndex::open(artifact, &signers).context("artifact failed verification")?;

    let app = build_router(Arc::new(index));

    tracing::info!("Listening on {}", cfg.bind_addr);
    let listener = TcpListener::bind(cfg.bind_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
