// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
pub mod artifact;
pub mod atomic;
pub mod definitions_file;
pub mod error;
pub mod export;
pub mod fixtures;
pub mod signers;

pub use error::{PersistenceError, Result};
