// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Source entries as supplied by the upstream data collectors.
//!
//! These mirror the definitions source file: loosely typed, carrying
//! bookkeeping fields (coingecko ids, ranks, `deleted` markers) that never
//! reach the signed set. Conversion into [`DefinitionRecord`] is where shape
//! errors surface as [`DefinitionError::MalformedRecord`].

use serde::{Deserialize, Serialize};

use super::record::{DefinitionRecord, TokenAddress};
use crate::error::{DefinitionError, Result};

fn is_false(v: &bool) -> bool {
    !*v
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkEntry {
    pub chain: String,
    pub chain_id: u64,
    #[serde(default)]
    pub is_testnet: bool,
    pub name: String,
    pub shortcut: String,
    pub slip44: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coingecko_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coingecko_network_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coingecko_rank: Option<u32>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub deleted: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Erc20TokenEntry {
    pub address: String,
    pub chain: String,
    pub chain_id: u64,
    pub decimals: u32,
    pub name: String,
    pub shortcut: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coingecko_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coingecko_rank: Option<u32>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub deleted: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolanaTokenEntry {
    pub mint: String,
    pub name: String,
    pub shortcut: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coingecko_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coingecko_rank: Option<u32>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub deleted: bool,
}

impl TryFrom<&NetworkEntry> for DefinitionRecord {
    type Error = DefinitionError;

    fn try_from(entry: &NetworkEntry) -> Result<Self> {
        if entry.chain_id == 0 {
            return Err(DefinitionError::MalformedRecord {
                identity: format!("network:{}", entry.chain),
                reason: "chain_id must be non-zero".to_string(),
            });
        }
        Ok(DefinitionRecord::network(entry.chain_id, entry.slip44, &entry.shortcut, &entry.name))
    }
}

impl TryFrom<&Erc20TokenEntry> for DefinitionRecord {
    type Error = DefinitionError;

    fn try_from(entry: &Erc20TokenEntry) -> Result<Self> {
        let malformed = |reason: String| DefinitionError::MalformedRecord {
            identity: format!("token:eth/chain-id/{}/token-{}", entry.chain_id, entry.address),
            reason,
        };
        if entry.chain_id == 0 {
            return Err(malformed("chain_id must be non-zero".to_string()));
        }
        let address: TokenAddress = entry.address.parse().map_err(malformed)?;
        let decimals = u8::try_from(entry.decimals)
            .map_err(|_| malformed(format!("decimals {} do not fit in a byte", entry.decimals)))?;
        Ok(DefinitionRecord::token(entry.chain_id, address, &entry.shortcut, decimals, &entry.name))
    }
}

impl TryFrom<&SolanaTokenEntry> for DefinitionRecord {
    type Error = DefinitionError;

    fn try_from(entry: &SolanaTokenEntry) -> Result<Self> {
        Ok(DefinitionRecord::solana_token(&entry.mint, &entry.shortcut, &entry.name))
    }
}

/// Full source dataset, grouped the way upstream delivers it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefinitionsData {
    #[serde(default)]
    pub networks: Vec<NetworkEntry>,
    #[serde(default)]
    pub erc20_tokens: Vec<Erc20TokenEntry>,
    #[serde(default)]
    pub solana_tokens: Vec<SolanaTokenEntry>,
}

impl DefinitionsData {
    /// Number of entries, including those marked deleted.
    pub fn len(&self) -> usize {
        self.networks.len() + self.erc20_tokens.len() + self.solana_tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Converts every live entry into a record. Deleted entries are skipped.
    pub fn to_records(&self) -> Result<Vec<DefinitionRecord>> {
        let mut records = Vec::with_capacity(self.len());
        let mut skipped = 0usize;

        for entry in &self.networks {
            if entry.deleted {
                skipped += 1;
                continue;
            }
            records.push(DefinitionRecord::try_from(entry)?);
        }
        for entry in &self.erc20_tokens {
            if entry.deleted {
                skipped += 1;
                continue;
            }
            records.push(DefinitionRecord::try_from(entry)?);
        }
        for entry in &self.solana_tokens {
            if entry.deleted {
                skipped += 1;
                continue;
            }
            records.push(DefinitionRecord::try_from(entry)?);
        }

        if skipped > 0 {
            tracing::debug!(skipped, "skipping definitions marked deleted");
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_entry(address: &str, decimals: u32) -> Erc20TokenEntry {
        Erc20TokenEntry {
            address: address.to_string(),
            chain: "eth".to_string(),
            chain_id: 1,
            decimals,
            name: "TrueUSD".to_string(),
            shortcut: "TUSD".to_string(),
            coingecko_id: Some("true-usd".to_string()),
            coingecko_rank: None,
            deleted: false,
        }
    }

    #[test]
    fn test_token_entry_converts() {
        let entry = token_entry("0x0000000000085d4780b73119b644ae5ecd22b376", 18);
        let record = DefinitionRecord::try_from(&entry).unwrap();
        assert_eq!(record.identifier(), "eth/chain-id/1/token-0000000000085d4780b73119b644ae5ecd22b376");
    }

    #[test]
    fn test_bad_address_is_malformed() {
        let entry = token_entry("0xnothex", 18);
        let err = DefinitionRecord::try_from(&entry).unwrap_err();
        match err {
            DefinitionError::MalformedRecord { identity, .. } => assert!(identity.contains("0xnothex")),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_decimals_overflow_is_malformed() {
        let entry = token_entry("0x0000000000085d4780b73119b644ae5ecd22b376", 300);
        assert!(matches!(
            DefinitionRecord::try_from(&entry),
            Err(DefinitionError::MalformedRecord { .. })
        ));
    }

    #[test]
    fn test_deleted_entries_skipped() {
        let mut gone = token_entry("0x0000000000004946c0e9f43f4dee607b0ef1fa1c", 0);
        gone.deleted = true;
        let data = DefinitionsData {
            networks: vec![],
            erc20_tokens: vec![token_entry("0x0000000000085d4780b73119b644ae5ecd22b376", 18), gone],
            solana_tokens: vec![],
        };
        assert_eq!(data.len(), 2);
        assert_eq!(data.to_records().unwrap().len(), 1);
    }

    #[test]
    fn test_source_json_defaults() {
        let json = r#"{"networks":[{"chain":"eth","chain_id":1,"name":"Ethereum","shortcut":"ETH","slip44":60}]}"#;
        let data: DefinitionsData = serde_json::from_str(json).unwrap();
        assert_eq!(data.networks.len(), 1);
        assert!(!data.networks[0].is_testnet);
        assert!(data.erc20_tokens.is_empty());
    }
}
