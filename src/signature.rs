// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Signature binder.
//!
//! A definitions signature is 65 bytes: a sigmask byte followed by a 64-byte
//! Ed25519 signature over the raw 32-byte Merkle root. Bit `i` of the
//! sigmask selects trusted key `i`; the signature must verify against the
//! sum of the selected keys (a collective, CoSi-style signature).
//!
//! Verification fails closed: unknown sigmask bits, too few signers,
//! undecodable keys and bad signatures all yield `false`.

use core::fmt;

use curve25519_dalek::edwards::{CompressedEdwardsY, EdwardsPoint};
use ed25519_dalek::{Verifier, VerifyingKey};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::config::DEFAULT_SIGNER_THRESHOLD;
use crate::error::{DefinitionError, Result};
use crate::types::Digest;

pub const ED25519_SIGNATURE_LEN: usize = 64;
pub const SIGNATURE_LEN: usize = 1 + ED25519_SIGNATURE_LEN;
pub const PUBLIC_KEY_LEN: usize = 32;

/// Largest signer set a one-byte sigmask can address.
pub const MAX_SIGNERS: usize = 8;

/// Root placeholder used when a signature is rejected before being bound.
const UNBOUND_ROOT: &str = "(unbound)";

fn invalid(root: &str, reason: impl Into<String>) -> DefinitionError {
    DefinitionError::InvalidSignature {
        root: root.to_string(),
        reason: reason.into(),
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub struct DefinitionSignature {
    pub sigmask: u8,
    pub signature: [u8; ED25519_SIGNATURE_LEN],
}

impl DefinitionSignature {
    pub fn new(sigmask: u8, signature: [u8; ED25519_SIGNATURE_LEN]) -> Self {
        Self { sigmask, signature }
    }

    pub fn to_bytes(&self) -> [u8; SIGNATURE_LEN] {
        let mut buf = [0u8; SIGNATURE_LEN];
        buf[0] = self.sigmask;
        buf[1..].copy_from_slice(&self.signature);
        buf
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != SIGNATURE_LEN {
            return Err(invalid(
                UNBOUND_ROOT,
                format!("expected {SIGNATURE_LEN} bytes, got {}", bytes.len()),
            ));
        }
        let mut signature = [0u8; ED25519_SIGNATURE_LEN];
        signature.copy_from_slice(&bytes[1..]);
        Ok(Self {
            sigmask: bytes[0],
            signature,
        })
    }

    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s.trim()).map_err(|e| invalid(UNBOUND_ROOT, format!("not hex: {e}")))?;
        Self::from_bytes(&bytes)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Number of keys the sigmask selects.
    pub fn signer_count(&self) -> u32 {
        self.sigmask.count_ones()
    }
}

impl fmt::Debug for DefinitionSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DefinitionSignature({})", self.to_hex())
    }
}

impl Serialize for DefinitionSignature {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for DefinitionSignature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> core::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        DefinitionSignature::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// On-disk form of a [`SignerSet`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignerSetConfig {
    #[serde(default = "default_threshold")]
    pub threshold: usize,
    /// Hex-encoded Ed25519 public keys, in sigmask bit order.
    pub public_keys: Vec<String>,
}

fn default_threshold() -> usize {
    DEFAULT_SIGNER_THRESHOLD
}

/// Trusted public keys and the minimum number that must co-sign.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SignerSetConfig", into = "SignerSetConfig")]
pub struct SignerSet {
    keys: Vec<[u8; PUBLIC_KEY_LEN]>,
    threshold: usize,
}

impl SignerSet {
    pub fn new(keys: Vec<[u8; PUBLIC_KEY_LEN]>, threshold: usize) -> Result<Self> {
        if keys.is_empty() || keys.len() > MAX_SIGNERS {
            return Err(DefinitionError::UnsupportedPolicy(format!(
                "signer set needs 1 to {MAX_SIGNERS} keys, got {}",
                keys.len()
            )));
        }
        if threshold == 0 || threshold > keys.len() {
            return Err(DefinitionError::UnsupportedPolicy(format!(
                "threshold {threshold} not satisfiable by {} keys",
                keys.len()
            )));
        }
        Ok(Self { keys, threshold })
    }

    pub fn from_hex_keys<S: AsRef<str>>(keys: &[S], threshold: usize) -> Result<Self> {
        let mut parsed = Vec::with_capacity(keys.len());
        for key in keys {
            let mut buf = [0u8; PUBLIC_KEY_LEN];
            hex::decode_to_slice(key.as_ref().trim(), &mut buf)
                .map_err(|e| DefinitionError::UnsupportedPolicy(format!("public key {:?}: {e}", key.as_ref())))?;
            parsed.push(buf);
        }
        Self::new(parsed, threshold)
    }

    pub fn keys(&self) -> &[[u8; PUBLIC_KEY_LEN]] {
        &self.keys
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Aggregate verifying key for the keys selected by `sigmask`.
    pub fn combine(&self, sigmask: u8) -> core::result::Result<VerifyingKey, String> {
        let selected = sigmask.count_ones() as usize;
        if (sigmask as u32) >> self.keys.len() != 0 {
            return Err(format!("sigmask {sigmask:#010b} selects unknown keys"));
        }
        if selected < self.threshold {
            return Err(format!("{selected} signers below threshold {}", self.threshold));
        }

        let mut points = Vec::with_capacity(selected);
        for (i, key) in self.keys.iter().enumerate() {
            if sigmask & (1 << i) == 0 {
                continue;
            }
            let point = CompressedEdwardsY(*key)
                .decompress()
                .ok_or_else(|| format!("public key {i} is not a curve point"))?;
            points.push(point);
        }

        let aggregate: EdwardsPoint = points.iter().sum();
        if aggregate.is_small_order() {
            return Err("aggregate key has small order".to_string());
        }
        VerifyingKey::from_bytes(&aggregate.compress().to_bytes()).map_err(|e| format!("aggregate key: {e}"))
    }
}

impl TryFrom<SignerSetConfig> for SignerSet {
    type Error = DefinitionError;

    fn try_from(cfg: SignerSetConfig) -> Result<Self> {
        SignerSet::from_hex_keys(&cfg.public_keys, cfg.threshold)
    }
}

impl From<SignerSet> for SignerSetConfig {
    fn from(set: SignerSet) -> Self {
        SignerSetConfig {
            threshold: set.threshold,
            public_keys: set.keys.iter().map(hex::encode).collect(),
        }
    }
}

/// Verifies `signature` over the raw bytes of `root`, naming the reason on
/// failure.
pub fn check_signature(root: &Digest, signature: &DefinitionSignature, signers: &SignerSet) -> Result<()> {
    let root_hex = root.to_hex();
    let key = signers
        .combine(signature.sigmask)
        .map_err(|reason| invalid(&root_hex, reason))?;
    let sig = ed25519_dalek::Signature::from_bytes(&signature.signature);
    key.verify(root.as_bytes(), &sig)
        .map_err(|_| invalid(&root_hex, "signature does not verify"))
}

/// Pure boolean form of [`check_signature`].
pub fn verify_signature(root: &Digest, signature: &DefinitionSignature, signers: &SignerSet) -> bool {
    check_signature(root, signature, signers).is_ok()
}

/// Parses and verifies a hex signature; malformed input is simply `false`.
pub fn verify_signature_hex(root: &Digest, signature_hex: &str, signers: &SignerSet) -> bool {
    DefinitionSignature::from_hex(signature_hex)
        .map(|sig| verify_signature(root, &sig, signers))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex_length_check() {
        let short = "00".repeat(64);
        let err = DefinitionSignature::from_hex(&short).unwrap_err();
        assert!(matches!(err, DefinitionError::InvalidSignature { .. }));

        let ok = format!("07{}", "ab".repeat(64));
        let sig = DefinitionSignature::from_hex(&ok).unwrap();
        assert_eq!(sig.sigmask, 0b111);
        assert_eq!(sig.signer_count(), 3);
        assert_eq!(sig.to_hex(), ok);
    }

    #[test]
    fn test_signer_set_bounds() {
        assert!(SignerSet::new(vec![], 1).is_err());
        assert!(SignerSet::new(vec![[1u8; 32]], 2).is_err());
        assert!(SignerSet::new(vec![[1u8; 32]; 9], 1).is_err());
    }

    #[test]
    fn test_garbage_hex_fails_closed() {
        let set = crate::cosi::dev_signer_set();
        let root = Digest([0u8; 32]);
        assert!(!verify_signature_hex(&root, "zz", &set));
        assert!(!verify_signature_hex(&root, &"00".repeat(65), &set));
    }
}
