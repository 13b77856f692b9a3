// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use defsign_kernel::{ArtifactIndex, DefinitionError, DefinitionKind, IdentityKey, ProofBundle};

use crate::api::{HealthResponse, RootResponse};
use crate::errors::NodeError;
use crate::telemetry::{ARTIFACT_LEAVES, QUERIES_TOTAL, QUERY_MISSES_TOTAL};

/// Artifacts are immutable once opened, so handlers share one without locking.
pub type SharedIndex = Arc<ArtifactIndex>;

pub fn build_router(index: SharedIndex) -> Router {
    metrics::gauge!(ARTIFACT_LEAVES, index.leaf_count() as f64);
    tracing::info!(root = %index.root(), leaves = index.leaf_count(), "serving artifact");

    Router::new()
        .route("/health", get(health))
        .route("/v1/root", get(root))
        // Identifiers contain slashes, hence the wildcard.
        .route("/v1/definitions/:kind/*identifier", get(definition))
        .route("/v1/blobs/:kind/*identifier", get(blob))
        .route("/metrics", get(metrics_handler))
        .with_state(index)
}

fn parse_key(kind: &str, identifier: &str) -> Result<IdentityKey, NodeError> {
    let kind = DefinitionKind::parse(kind).ok_or_else(|| NodeError::UnknownKind(kind.to_string()))?;
    let identifier = identifier.trim_start_matches('/');
    if identifier.is_empty() {
        return Err(NodeError::EmptyIdentifier);
    }
    Ok(IdentityKey::new(kind, identifier))
}

fn record_query<T>(route: &'static str, result: &Result<T, DefinitionError>) {
    metrics::increment_counter!(QUERIES_TOTAL, "route" => route);
    if let Err(DefinitionError::RecordNotFound { identity }) = result {
        metrics::increment_counter!(QUERY_MISSES_TOTAL, "route" => route);
        tracing::debug!(%identity, route, "query miss");
    }
}

async fn health(State(index): State<SharedIndex>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        leaf_count: index.leaf_count(),
    })
}

async fn root(State(index): State<SharedIndex>) -> Json<RootResponse> {
    let params = index.snapshot().params();
    Json(RootResponse {
        root: index.root(),
        hash_algorithm: params.hash_algorithm.id().to_string(),
        odd_node_policy: params.odd_node_policy.id().to_string(),
        leaf_count: index.leaf_count(),
        timestamp: index.timestamp(),
        signature: *index.signature(),
    })
}

async fn definition(
    State(index): State<SharedIndex>,
    Path((kind, identifier)): Path<(String, String)>,
) -> Result<Json<ProofBundle>, NodeError> {
    let key = parse_key(&kind, &identifier)?;
    let result = index.bundle(&key);
    record_query("definitions", &result);
    Ok(Json(result?))
}

async fn blob(
    State(index): State<SharedIndex>,
    Path((kind, identifier)): Path<(String, String)>,
) -> Result<Response, NodeError> {
    let key = parse_key(&kind, &identifier)?;
    let result = index.blob_for(&key);
    record_query("blobs", &result);
    Ok(([(CONTENT_TYPE, "application/octet-stream")], result?).into_response())
}

async fn metrics_handler() -> String {
    crate::telemetry::get_metrics()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key() {
        let key = parse_key("network", "eth/chain-id/1").unwrap();
        assert_eq!(key.to_string(), "network:eth/chain-id/1");
        assert_eq!(parse_key("token", "/solana/token/x").unwrap().identifier, "solana/token/x");

        assert!(matches!(parse_key("coin", "eth/chain-id/1"), Err(NodeError::UnknownKind(_))));
        assert!(matches!(parse_key("network", "/"), Err(NodeError::EmptyIdentifier)));
    }
}
