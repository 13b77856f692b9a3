// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use anyhow::{Context, Result};
use clap::Parser;
use defsign_kernel::cosi::dev_signer_set;
use defsign_kernel::verify::verify_blob;
use defsign_kernel::{HashAlgorithm, SignerSet};
use std::fs;
use std::path::PathBuf;

/// Checks one definition blob the way a device does: record, proof and
/// root signature, with nothing but the trusted keys.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the device blob (e.g. eth/chain-id/1/network.dat)
    blob: PathBuf,

    /// Signer set JSON: {"threshold": 2, "public_keys": ["<hex>", ...]}
    #[arg(long, conflicts_with = "dev", required_unless_present = "dev")]
    signers: Option<PathBuf>,

    /// Trust the development keys instead of a signer set.
    #[arg(long)]
    dev: bool,

    /// Hash policy the dataset was built with.
    #[arg(long, default_value = "blake3")]
    hash: String,

    /// Reject definitions older than this unix timestamp.
    #[arg(long)]
    min_timestamp: Option<u32>,
}

fn load_signers(args: &Args) -> Result<SignerSet> {
    match &args.signers {
        Some(path) => {
            let raw = fs::read(path).with_context(|| format!("Failed to read signer set {}", path.display()))?;
            serde_json::from_slice(&raw).context("Failed to parse signer set JSON")
        }
        None => Ok(dev_signer_set()),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    eprintln!("defsign verifier v{}", env!("CARGO_PKG_VERSION"));

    let algorithm = HashAlgorithm::from_id(&args.hash)?;
    let signers = load_signers(&args)?;
    if args.dev {
        eprintln!("WARNING: trusting development keys");
    }

    let blob = fs::read(&args.blob).with_context(|| format!("Failed to read blob {}", args.blob.display()))?;
    let verified = verify_blob(&blob, algorithm, &signers).context("Definition rejected")?;

    if let Some(min) = args.min_timestamp {
        if verified.timestamp < min {
            anyhow::bail!(
                "Definition rejected: timestamp {} is older than {}",
                verified.timestamp,
                min
            );
        }
    }

    println!("{}", serde_json::to_string_pretty(&verified)?);
    Ok(())
}
