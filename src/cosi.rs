// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Collective (CoSi-style) Ed25519 signing for development keys.
//!
//! Production roots are signed out of band. This module exists so local
//! builds and tests can produce a signature the binder accepts, using a
//! fixed, publicly known development key set.
//!
//! Each signer contributes `R_i = r_i·B` and `s_i = r_i + k·a_i`, where
//! `k = SHA-512(R || A || M)` over the aggregate commitment `R = ΣR_i` and
//! aggregate key `A = ΣA_i`. `(R, Σs_i)` is then an ordinary Ed25519
//! signature under `A`.

use curve25519_dalek::edwards::EdwardsPoint;
use curve25519_dalek::scalar::Scalar;
use sha2::{Digest as _, Sha512};

use crate::config::DEFAULT_SIGNER_THRESHOLD;
use crate::signature::{DefinitionSignature, SignerSet, ED25519_SIGNATURE_LEN, PUBLIC_KEY_LEN};
use crate::types::Digest;

/// Development seeds. Never trusted by production devices.
pub const DEV_PRIVATE_KEYS: [[u8; 32]; 3] = [[0xdd; 32], [0xde; 32], [0xdf; 32]];

/// Sigmask selecting all three development keys.
pub const DEV_SIGMASK: u8 = 0b111;

struct ExpandedKey {
    scalar: Scalar,
    prefix: [u8; 32],
    public: EdwardsPoint,
}

fn sha512(parts: &[&[u8]]) -> [u8; 64] {
    let mut hasher = Sha512::new();
    for part in parts {
        hasher.update(part);
    }
    let mut out = [0u8; 64];
    out.copy_from_slice(&hasher.finalize());
    out
}

fn expand(seed: &[u8; 32]) -> ExpandedKey {
    let h = sha512(&[seed]);

    let mut lower = [0u8; 32];
    lower.copy_from_slice(&h[..32]);
    lower[0] &= 248;
    lower[31] &= 127;
    lower[31] |= 64;

    let mut prefix = [0u8; 32];
    prefix.copy_from_slice(&h[32..]);

    let scalar = Scalar::from_bytes_mod_order(lower);
    ExpandedKey {
        scalar,
        prefix,
        public: EdwardsPoint::mul_base(&scalar),
    }
}

/// Ed25519 public key for a 32-byte seed.
pub fn public_key(seed: &[u8; 32]) -> [u8; PUBLIC_KEY_LEN] {
    expand(seed).public.compress().to_bytes()
}

/// Produces one collective signature over `message` from every seed.
pub fn sign_with_keys(message: &[u8], seeds: &[[u8; 32]]) -> [u8; ED25519_SIGNATURE_LEN] {
    let keys: Vec<ExpandedKey> = seeds.iter().map(expand).collect();

    let nonces: Vec<Scalar> = keys
        .iter()
        .enumerate()
        .map(|(i, key)| Scalar::from_bytes_mod_order_wide(&sha512(&[&key.prefix, message, &[i as u8]])))
        .collect();

    let global_r: EdwardsPoint = nonces.iter().map(EdwardsPoint::mul_base).sum();
    let global_pk: EdwardsPoint = keys.iter().map(|k| k.public).sum();

    let r_bytes = global_r.compress().to_bytes();
    let pk_bytes = global_pk.compress().to_bytes();
    let k = Scalar::from_bytes_mod_order_wide(&sha512(&[&r_bytes, &pk_bytes, message]));

    let s: Scalar = keys
        .iter()
        .zip(&nonces)
        .map(|(key, r)| r + k * key.scalar)
        .sum();

    let mut signature = [0u8; ED25519_SIGNATURE_LEN];
    signature[..32].copy_from_slice(&r_bytes);
    signature[32..].copy_from_slice(s.as_bytes());
    signature
}

/// Signer set trusting the development keys.
pub fn dev_signer_set() -> SignerSet {
    let keys = DEV_PRIVATE_KEYS.iter().map(public_key).collect();
    match SignerSet::new(keys, DEFAULT_SIGNER_THRESHOLD) {
        Ok(set) => set,
        Err(e) => unreachable!("development signer set is statically valid: {e}"),
    }
}

/// Signs a Merkle root with all development keys.
pub fn sign_with_dev_keys(root: &Digest) -> DefinitionSignature {
    tracing::warn!(root = %root, "signing root with development keys");
    DefinitionSignature::new(DEV_SIGMASK, sign_with_keys(root.as_bytes(), &DEV_PRIVATE_KEYS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::{check_signature, verify_signature};
    use ed25519_dalek::{Signer, SigningKey};

    #[test]
    fn test_public_key_matches_ed25519() {
        for seed in &DEV_PRIVATE_KEYS {
            let expected = SigningKey::from_bytes(seed).verifying_key().to_bytes();
            assert_eq!(public_key(seed), expected);
        }
    }

    #[test]
    fn test_single_signer_matches_ed25519_verification() {
        let seed = [0x42u8; 32];
        let msg = b"merkle root bytes";
        let sig = sign_with_keys(msg, &[seed]);
        let key = SigningKey::from_bytes(&seed).verifying_key();
        let sig = ed25519_dalek::Signature::from_bytes(&sig);
        assert!(ed25519_dalek::Verifier::verify(&key, msg, &sig).is_ok());

        // a dalek-produced signature also verifies through the binder
        let set = SignerSet::new(vec![public_key(&seed)], 1).unwrap();
        let root = Digest([9u8; 32]);
        let dalek_sig = SigningKey::from_bytes(&seed).sign(root.as_bytes());
        let bound = DefinitionSignature::new(0b1, dalek_sig.to_bytes());
        assert!(verify_signature(&root, &bound, &set));
    }

    #[test]
    fn test_dev_signature_verifies() {
        let root = Digest([3u8; 32]);
        let sig = sign_with_dev_keys(&root);
        assert_eq!(sig.sigmask, DEV_SIGMASK);
        check_signature(&root, &sig, &dev_signer_set()).unwrap();
    }

    #[test]
    fn test_dev_signature_bound_to_root() {
        let sig = sign_with_dev_keys(&Digest([3u8; 32]));
        assert!(!verify_signature(&Digest([4u8; 32]), &sig, &dev_signer_set()));
    }

    #[test]
    fn test_wrong_sigmask_rejected() {
        let root = Digest([5u8; 32]);
        let mut sig = sign_with_dev_keys(&root);
        sig.sigmask = 0b011;
        assert!(!verify_signature(&root, &sig, &dev_signer_set()));
        sig.sigmask = 0b1111;
        assert!(!verify_signature(&root, &sig, &dev_signer_set()));
    }
}
