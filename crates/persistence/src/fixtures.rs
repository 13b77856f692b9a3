// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use crate::definitions_file::{store_definitions, DefinitionsFile};
use crate::error::Result;
use crate::signers::write_signers;
use defsign_kernel::cosi::dev_signer_set;
use defsign_kernel::types::source::{DefinitionsData, Erc20TokenEntry, NetworkEntry, SolanaTokenEntry};

use std::fs;
use std::path::{Path, PathBuf};

pub struct TestPaths {
    pub definitions: PathBuf,
    pub signers: PathBuf,
}

fn network(chain: &str, chain_id: u64, name: &str, shortcut: &str, slip44: u32, is_testnet: bool) -> NetworkEntry {
    NetworkEntry {
        chain: chain.to_string(),
        chain_id,
        is_testnet,
        name: name.to_string(),
        shortcut: shortcut.to_string(),
        slip44,
        coingecko_id: None,
        coingecko_network_id: None,
        coingecko_rank: None,
        deleted: false,
    }
}

fn erc20(address: &str, decimals: u32, name: &str, shortcut: &str) -> Erc20TokenEntry {
    Erc20TokenEntry {
        address: address.to_string(),
        chain: "eth".to_string(),
        chain_id: 1,
        decimals,
        name: name.to_string(),
        shortcut: shortcut.to_string(),
        coingecko_id: None,
        coingecko_rank: None,
        deleted: false,
    }
}

/// Small dataset: four networks (two sharing slip44 1), four ERC-20 tokens,
/// one Solana token and one deleted token.
pub fn sample_definitions() -> DefinitionsData {
    let mut deleted = erc20("0x00000000000000000000000000000000deadbeef", 18, "Gone", "GONE");
    deleted.deleted = true;

    DefinitionsData {
        networks: vec![
            network("eth", 1, "Ethereum", "ETH", 60, false),
            network("exp", 2, "Expanse", "EXP", 40, false),
            network("rop", 3, "Ethereum Testnet Ropsten", "tROP", 1, true),
            network("rin", 4, "Ethereum Testnet Rinkeby", "tRIN", 1, true),
        ],
        erc20_tokens: vec![
            erc20("0x00000000000045166c45af0fc6e4cf31d9e14b9a", 18, "TopBidder", "BID"),
            erc20("0x0000000000004946c0e9f43f4dee607b0ef1fa1c", 0, "Chi Gastoken by 1inch", "CHI"),
            erc20("0x000000000000d0151e748d25b766e77efe2a6c83", 18, "XDEFI Governance Token", "XDEX"),
            erc20("0x0000000000085d4780b73119b644ae5ecd22b376", 18, "TrueUSD", "TUSD"),
            deleted,
        ],
        solana_tokens: vec![SolanaTokenEntry {
            mint: "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v".to_string(),
            name: "USD Coin".to_string(),
            shortcut: "USDC".to_string(),
            coingecko_id: None,
            coingecko_rank: None,
            deleted: false,
        }],
    }
}

/// Writes an unsigned definitions file and the development signer set.
pub fn generate_test_scenario(dir: &Path) -> Result<TestPaths> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }

    let definitions = dir.join("definitions.json");
    store_definitions(&definitions, &DefinitionsFile::new(sample_definitions()))?;

    let signers = dir.join("signers.json");
    write_signers(&signers, &dev_signer_set())?;

    Ok(TestPaths { definitions, signers })
}
