// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.

//! defsign-kernel: signed, content-addressed distribution of token and
//! network definitions.
//!
//! Records are canonicalized, ordered and hashed into a Merkle tree whose
//! root is signed externally. Each record is then served with an inclusion
//! proof and the root signature, so a device holding only trusted public
//! keys can verify one definition without the rest of the dataset.

pub mod artifact;
pub mod blob;
pub mod canonical;
pub mod config;
pub mod cosi;
pub mod diff;
pub mod error;
pub mod merkle;
pub mod proof;
pub mod signature;
pub mod snapshot;
pub mod types;
pub mod verify;

pub use artifact::{finalize, ArtifactIndex, ProofBundle, PublishedArtifact};
pub use config::BuildParams;
pub use error::{DefinitionError, Result};
pub use proof::{proof_for, verify_proof, InclusionProof};
pub use signature::{verify_signature, DefinitionSignature, SignerSet};
pub use snapshot::{DatasetSnapshot, RootForSigning, SignedSnapshot};
pub use types::id::{DefinitionKind, IdentityKey};
pub use types::record::DefinitionRecord;
pub use types::{Digest, HashAlgorithm, OddNodePolicy};

#[cfg(test)]
pub mod tests;
