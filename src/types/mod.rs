// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Hash and policy types shared by the tree, proofs and artifacts.
//!
//! Digests travel as raw 32-byte arrays internally and as lowercase hex in
//! every external surface (artifact JSON, CLI output, HTTP responses).

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::Digest as _;

use crate::error::{DefinitionError, Result};

pub mod id;
pub mod record;
pub mod source;

/// Length of every digest produced by a [`HashAlgorithm`].
pub const DIGEST_LEN: usize = 32;

/// Fixed-length hash value (leaf, node or root).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct Digest(pub [u8; DIGEST_LEN]);

impl Digest {
    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}

impl FromStr for Digest {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        let mut buf = [0u8; DIGEST_LEN];
        hex::decode_to_slice(s.trim(), &mut buf)?;
        Ok(Digest(buf))
    }
}

impl Serialize for Digest {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Digest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> core::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Hash function used for leaves, nodes and the empty-set sentinel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    #[default]
    Blake3,
    Sha256,
}

impl HashAlgorithm {
    pub const fn id(&self) -> &'static str {
        match self {
            HashAlgorithm::Blake3 => "blake3",
            HashAlgorithm::Sha256 => "sha256",
        }
    }

    pub fn from_id(id: &str) -> Result<Self> {
        match id {
            "blake3" => Ok(HashAlgorithm::Blake3),
            "sha256" => Ok(HashAlgorithm::Sha256),
            other => Err(DefinitionError::UnsupportedPolicy(format!("hash algorithm {other}"))),
        }
    }

    pub fn digest(&self, data: &[u8]) -> Digest {
        self.digest_parts(&[data])
    }

    /// Hashes the concatenation of `parts` without allocating it.
    pub fn digest_parts(&self, parts: &[&[u8]]) -> Digest {
        match self {
            HashAlgorithm::Blake3 => {
                let mut hasher = blake3::Hasher::new();
                for part in parts {
                    hasher.update(part);
                }
                Digest(*hasher.finalize().as_bytes())
            }
            HashAlgorithm::Sha256 => {
                let mut hasher = sha2::Sha256::new();
                for part in parts {
                    hasher.update(part);
                }
                Digest(hasher.finalize().into())
            }
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Rule for a level with an odd number of nodes.
///
/// `CarryUp` promotes the unpaired last node to the next level unchanged;
/// proofs simply have no step for that level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OddNodePolicy {
    #[default]
    #[serde(rename = "carry-up")]
    CarryUp,
}

impl OddNodePolicy {
    pub const fn id(&self) -> &'static str {
        match self {
            OddNodePolicy::CarryUp => "carry-up",
        }
    }

    pub fn from_id(id: &str) -> Result<Self> {
        match id {
            "carry-up" => Ok(OddNodePolicy::CarryUp),
            other => Err(DefinitionError::UnsupportedPolicy(format!("odd-node policy {other}"))),
        }
    }
}

impl fmt::Display for OddNodePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}
