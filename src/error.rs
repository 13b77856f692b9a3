// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Error types.
//!
//! Every failure names the offending record identity or the roots involved,
//! so operators can act on it without re-running the build with extra logging.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DefinitionError {
    /// Record failed shape validation before hashing.
    #[error("malformed record {identity}: {reason}")]
    MalformedRecord { identity: String, reason: String },

    /// Two records share the same `(kind, identifier)`.
    #[error("duplicate record {identity}")]
    DuplicateRecord { identity: String },

    #[error("leaf index {index} out of range for {leaf_count} leaves")]
    IndexOutOfRange { index: usize, leaf_count: usize },

    #[error("record {identity} not found in snapshot")]
    RecordNotFound { identity: String },

    /// Signature could not be parsed or did not verify.
    #[error("invalid signature for root {root}: {reason}")]
    InvalidSignature { root: String, reason: String },

    /// Signature does not belong to the snapshot's current root.
    #[error("signature does not match current root {root}")]
    SignatureMismatch { root: String },

    /// A persisted root disagrees with the root recomputed from its records.
    #[error("root mismatch: expected {expected}, computed {computed}")]
    RootMismatch { expected: String, computed: String },

    #[error("unsupported policy: {0}")]
    UnsupportedPolicy(String),

    #[error("invalid definition blob: {0}")]
    InvalidBlob(String),
}

pub type DefinitionResult<T> = core::result::Result<T, DefinitionError>;
pub type Result<T> = DefinitionResult<T>;
