// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Identity types.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Broad category of a definition. Orders networks before tokens.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefinitionKind {
    Network,
    Token,
}

impl DefinitionKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            DefinitionKind::Network => "network",
            DefinitionKind::Token => "token",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "network" => Some(DefinitionKind::Network),
            "token" => Some(DefinitionKind::Token),
            _ => None,
        }
    }
}

/// `(kind, identifier)` pair; unique within a snapshot and the leaf sort key.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct IdentityKey {
    pub kind: DefinitionKind,
    pub identifier: String,
}

impl IdentityKey {
    pub fn new(kind: DefinitionKind, identifier: impl Into<String>) -> Self {
        Self {
            kind,
            identifier: identifier.into(),
        }
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind.as_str(), self.identifier)
    }
}
