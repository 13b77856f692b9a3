// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::sync::OnceLock;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

static PROM_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

pub const QUERIES_TOTAL: &str = "defsign_queries_total";
pub const QUERY_MISSES_TOTAL: &str = "defsign_query_misses_total";
pub const ARTIFACT_LEAVES: &str = "defsign_artifact_leaves";

/// Installs the log subscriber and the Prometheus recorder.
pub fn init_telemetry() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "defsign_node=debug,defsign_kernel=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let handle = PrometheusBuilder::new().install_recorder()?;
    if PROM_HANDLE.set(handle).is_err() {
        tracing::warn!("Prometheus handle already set");
    }

    metrics::describe_counter!(QUERIES_TOTAL, "Definition queries answered, by route");
    metrics::describe_counter!(QUERY_MISSES_TOTAL, "Queries for identities absent from the artifact");
    metrics::describe_gauge!(ARTIFACT_LEAVES, "Leaf count of the served artifact");
    Ok(())
}

pub fn get_metrics() -> String {
    match PROM_HANDLE.get() {
        Some(handle) => handle.render(),
        None => "# metrics not initialized".to_string(),
    }
}
