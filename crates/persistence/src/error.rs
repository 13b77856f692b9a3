// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use defsign_kernel::DefinitionError;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error(transparent)]
    Definition(#[from] DefinitionError),
    #[error("Missing metadata field: {0}")]
    MissingMetadata(&'static str),
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),
}

pub type Result<T> = std::result::Result<T, PersistenceError>;
