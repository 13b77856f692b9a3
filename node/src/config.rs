// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeConfig {
    pub bind_addr: SocketAddr,
    /// Published artifact served by this node.
    pub artifact_path: PathBuf,
    /// Signer set file. Ignored when `dev_keys` is set.
    pub signers_path: Option<PathBuf>,
    pub dev_keys: bool,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            artifact_path: PathBuf::from("artifact.json"),
            signers_path: None,
            dev_keys: false,
        }
    }
}

impl NodeConfig {
    /// Defaults overridden by `DEFSIGN_*` environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mut cfg = Self::default();

        if let Some(addr) = lookup("DEFSIGN_BIND_ADDR") {
            cfg.bind_addr = addr
                .parse()
                .with_context(|| format!("DEFSIGN_BIND_ADDR is not a socket address: {addr:?}"))?;
        }
        if let Some(path) = lookup("DEFSIGN_ARTIFACT") {
            cfg.artifact_path = PathBuf::from(path);
        }
        if let Some(path) = lookup("DEFSIGN_SIGNERS") {
            cfg.signers_path = Some(PathBuf::from(path));
        }
        if let Some(flag) = lookup("DEFSIGN_DEV_KEYS") {
            cfg.dev_keys = matches!(flag.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes");
        }

        if !cfg.dev_keys && cfg.signers_path.is_none() {
            anyhow::bail!("no signer set configured: set DEFSIGN_SIGNERS or DEFSIGN_DEV_KEYS=1");
        }
        Ok(cfg)
    }
}
