// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use defsign_kernel::DefinitionError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NodeError {
    #[error(transparent)]
    Definition(#[from] DefinitionError),
    #[error("unknown definition kind {0:?}")]
    UnknownKind(String),
    #[error("empty identifier")]
    EmptyIdentifier,
}

impl NodeError {
    pub fn status(&self) -> StatusCode {
        match self {
            NodeError::Definition(DefinitionError::RecordNotFound { .. }) => StatusCode::NOT_FOUND,
            NodeError::UnknownKind(_) | NodeError::EmptyIdentifier => StatusCode::BAD_REQUEST,
            NodeError::Definition(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for NodeError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "query failed");
        }

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}
