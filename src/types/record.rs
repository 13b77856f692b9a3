// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Definition records.
//!
//! A record's kind and identifier are derived from its payload, so the
//! identity used for ordering can never drift from the bytes being hashed.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::id::{DefinitionKind, IdentityKey};

/// Length of an EVM contract address.
pub const ADDRESS_LEN: usize = 20;

/// Data type tags written into canonical bytes.
pub const DATA_TYPE_NETWORK: u8 = 0;
pub const DATA_TYPE_TOKEN: u8 = 1;
pub const DATA_TYPE_SOLANA_TOKEN: u8 = 2;

/// EVM contract address.
///
/// Human-readable formats (JSON) carry `0x`-prefixed lowercase hex; binary
/// formats carry the raw 20 bytes.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenAddress(pub [u8; ADDRESS_LEN]);

impl TokenAddress {
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for TokenAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}

impl fmt::Debug for TokenAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TokenAddress(0x{})", self.to_hex())
    }
}

impl FromStr for TokenAddress {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .ok_or_else(|| format!("address {s:?} lacks 0x prefix"))?;
        let mut buf = [0u8; ADDRESS_LEN];
        hex::decode_to_slice(digits, &mut buf).map_err(|e| format!("address {s:?}: {e}"))?;
        Ok(TokenAddress(buf))
    }
}

impl Serialize for TokenAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_string())
        } else {
            self.0.serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for TokenAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            s.parse().map_err(serde::de::Error::custom)
        } else {
            <[u8; ADDRESS_LEN]>::deserialize(deserializer).map(TokenAddress)
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkInfo {
    pub chain_id: u64,
    pub slip44: u32,
    pub symbol: String,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub chain_id: u64,
    pub address: TokenAddress,
    pub symbol: String,
    pub decimals: u8,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolanaTokenInfo {
    /// Base58 mint address.
    pub mint: String,
    pub symbol: String,
    pub name: String,
}

/// Typed payload of a definition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DefinitionPayload {
    EthereumNetwork(NetworkInfo),
    EthereumToken(TokenInfo),
    SolanaToken(SolanaTokenInfo),
}

/// One token or network definition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DefinitionRecord {
    payload: DefinitionPayload,
}

impl DefinitionRecord {
    pub fn new(payload: DefinitionPayload) -> Self {
        Self { payload }
    }

    pub fn network(chain_id: u64, slip44: u32, symbol: &str, name: &str) -> Self {
        Self::new(DefinitionPayload::EthereumNetwork(NetworkInfo {
            chain_id,
            slip44,
            symbol: symbol.to_string(),
            name: name.to_string(),
        }))
    }

    pub fn token(chain_id: u64, address: TokenAddress, symbol: &str, decimals: u8, name: &str) -> Self {
        Self::new(DefinitionPayload::EthereumToken(TokenInfo {
            chain_id,
            address,
            symbol: symbol.to_string(),
            decimals,
            name: name.to_string(),
        }))
    }

    pub fn solana_token(mint: &str, symbol: &str, name: &str) -> Self {
        Self::new(DefinitionPayload::SolanaToken(SolanaTokenInfo {
            mint: mint.to_string(),
            symbol: symbol.to_string(),
            name: name.to_string(),
        }))
    }

    pub fn payload(&self) -> &DefinitionPayload {
        &self.payload
    }

    pub fn into_payload(self) -> DefinitionPayload {
        self.payload
    }

    pub fn kind(&self) -> DefinitionKind {
        match self.payload {
            DefinitionPayload::EthereumNetwork(_) => DefinitionKind::Network,
            DefinitionPayload::EthereumToken(_) | DefinitionPayload::SolanaToken(_) => DefinitionKind::Token,
        }
    }

    pub fn identifier(&self) -> String {
        match &self.payload {
            DefinitionPayload::EthereumNetwork(n) => format!("eth/chain-id/{}", n.chain_id),
            DefinitionPayload::EthereumToken(t) => {
                format!("eth/chain-id/{}/token-{}", t.chain_id, t.address.to_hex())
            }
            DefinitionPayload::SolanaToken(s) => format!("solana/token/{}", s.mint),
        }
    }

    pub fn identity_key(&self) -> IdentityKey {
        IdentityKey::new(self.kind(), self.identifier())
    }

    pub fn data_type(&self) -> u8 {
        match self.payload {
            DefinitionPayload::EthereumNetwork(_) => DATA_TYPE_NETWORK,
            DefinitionPayload::EthereumToken(_) => DATA_TYPE_TOKEN,
            DefinitionPayload::SolanaToken(_) => DATA_TYPE_SOLANA_TOKEN,
        }
    }

    pub fn symbol(&self) -> &str {
        match &self.payload {
            DefinitionPayload::EthereumNetwork(n) => &n.symbol,
            DefinitionPayload::EthereumToken(t) => &t.symbol,
            DefinitionPayload::SolanaToken(s) => &s.symbol,
        }
    }

    pub fn name(&self) -> &str {
        match &self.payload {
            DefinitionPayload::EthereumNetwork(n) => &n.name,
            DefinitionPayload::EthereumToken(t) => &t.name,
            DefinitionPayload::SolanaToken(s) => &s.name,
        }
    }

    /// Decimals for tokens that declare them.
    pub fn decimals(&self) -> Option<u8> {
        match &self.payload {
            DefinitionPayload::EthereumToken(t) => Some(t.decimals),
            _ => None,
        }
    }
}
