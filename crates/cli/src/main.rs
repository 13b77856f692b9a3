// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use clap::{Parser, Subcommand, ValueEnum};
use defsign_cli::commands::{diff, generate, inspect, propose, query, sign};
use defsign_kernel::HashAlgorithm;
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "defsign")]
#[command(about = "Build, sign and publish Merkle-signed token and network definitions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum HashArg {
    Blake3,
    Sha256,
}

impl From<HashArg> for HashAlgorithm {
    fn from(arg: HashArg) -> Self {
        match arg {
            HashArg::Blake3 => HashAlgorithm::Blake3,
            HashArg::Sha256 => HashAlgorithm::Sha256,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the Merkle root of a definitions file and record it for signing.
    Propose {
        #[arg(long, short, default_value = "definitions.json")]
        definitions: PathBuf,

        /// Unix timestamp to embed in every record (defaults to now).
        #[arg(long)]
        timestamp: Option<u32>,

        #[arg(long, value_enum, default_value = "blake3")]
        hash: HashArg,
    },
    /// Verify a signature over the proposed root and store it.
    Sign {
        /// 65-byte hex signature (sigmask followed by the Ed25519 signature).
        signature: Option<String>,

        #[arg(long, short, default_value = "definitions.json")]
        definitions: PathBuf,

        /// Recompute the root before accepting the signature.
        #[arg(long, short)]
        verify: bool,

        /// Sign with the development keys. Local testing only.
        #[arg(long)]
        dev_sign: bool,

        /// Signer set JSON file.
        #[arg(long)]
        signers: Option<PathBuf>,
    },
    /// Write the published artifact and the per-record blob tree.
    Generate {
        #[arg(long, short, default_value = "definitions.json")]
        definitions: PathBuf,

        #[arg(long, short, default_value = "definitions-latest")]
        out_dir: PathBuf,

        #[arg(long)]
        signers: Option<PathBuf>,

        /// Trust the development keys.
        #[arg(long)]
        dev: bool,
    },
    /// Print the proof bundle for one definition.
    Query {
        artifact: PathBuf,

        /// `network` or `token`.
        kind: String,

        /// e.g. `eth/chain-id/1` or `eth/chain-id/1/token-<address>`.
        identifier: String,

        #[arg(long)]
        signers: Option<PathBuf>,

        #[arg(long)]
        dev: bool,

        /// Also write the device blob to this file.
        #[arg(long)]
        blob_out: Option<PathBuf>,
    },
    /// Summarize an artifact or a definitions file.
    Inspect { path: PathBuf },
    /// Compare two definitions files or artifacts record by record.
    Diff { old: PathBuf, new: PathBuf },
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "defsign=info".into());
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Propose {
            definitions,
            timestamp,
            hash,
        } => propose::run(&definitions, timestamp, hash.into()).map(|_| ()),
        Commands::Sign {
            signature,
            definitions,
            verify,
            dev_sign,
            signers,
        } => sign::run(
            &definitions,
            sign::SignArgs {
                signature,
                dev_sign,
                verify,
                signers: signers.as_deref(),
            },
        )
        .map(|_| ()),
        Commands::Generate {
            definitions,
            out_dir,
            signers,
            dev,
        } => generate::run(&definitions, &out_dir, signers.as_deref(), dev).map(|_| ()),
        Commands::Query {
            artifact,
            kind,
            identifier,
            signers,
            dev,
            blob_out,
        } => query::run(&artifact, &kind, &identifier, signers.as_deref(), dev, blob_out.as_deref()).map(|_| ()),
        Commands::Inspect { path } => inspect::run(&path),
        Commands::Diff { old, new } => diff::run(&old, &new).map(|_| ()),
    }
}
