// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Shared sample data for kernel tests.

use crate::config::BuildParams;
use crate::types::record::{DefinitionRecord, TokenAddress};

pub const TS: u32 = 1_700_000_000;

pub fn params() -> BuildParams {
    BuildParams::new(TS)
}

pub fn address(hex: &str) -> TokenAddress {
    hex.parse().unwrap()
}

pub fn ethereum() -> DefinitionRecord {
    DefinitionRecord::network(1, 60, "ETH", "Ethereum")
}

pub fn expanse() -> DefinitionRecord {
    DefinitionRecord::network(2, 40, "EXP", "Expanse")
}

pub fn ropsten() -> DefinitionRecord {
    DefinitionRecord::network(3, 1, "tROP", "Ropsten")
}

pub fn rinkeby() -> DefinitionRecord {
    DefinitionRecord::network(4, 1, "tRIN", "Rinkeby")
}

pub fn bid_token() -> DefinitionRecord {
    DefinitionRecord::token(1, address("0x00000000000045166c45af0fc6e4cf31d9e14b9a"), "BID", 18, "TopBidder")
}

pub fn chi_token() -> DefinitionRecord {
    DefinitionRecord::token(1, address("0x0000000000004946c0e9f43f4dee607b0ef1fa1c"), "CHI", 0, "Chi Gastoken by 1inch")
}

pub fn xdex_token() -> DefinitionRecord {
    DefinitionRecord::token(1, address("0x000000000000d0151e748d25b766e77efe2a6c83"), "XDEX", 18, "XDEFI Governance Token")
}

pub fn tusd_token() -> DefinitionRecord {
    DefinitionRecord::token(1, address("0x0000000000085d4780b73119b644ae5ecd22b376"), "TUSD", 18, "TrueUSD")
}

pub fn usdc_solana() -> DefinitionRecord {
    DefinitionRecord::solana_token("EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v", "USDC", "USD Coin")
}

/// Records `[A, B, C, D]` of the ordering scenarios.
pub fn four_records() -> Vec<DefinitionRecord> {
    vec![ethereum(), expanse(), bid_token(), chi_token()]
}

/// A mixed set of networks, ERC-20 and Solana tokens.
pub fn sample_records() -> Vec<DefinitionRecord> {
    vec![
        ethereum(),
        expanse(),
        ropsten(),
        rinkeby(),
        bid_token(),
        chi_token(),
        xdex_token(),
        tusd_token(),
        usdc_solana(),
    ]
}
