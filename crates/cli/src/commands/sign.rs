// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use anyhow::{anyhow, bail, Context};
use defsign_kernel::cosi::sign_with_dev_keys;
use defsign_kernel::signature::check_signature;
use defsign_kernel::{DefinitionError, DefinitionSignature};
use defsign_persistence::definitions_file::{load_definitions, store_definitions};
use std::path::Path;

pub struct SignArgs<'a> {
    pub signature: Option<String>,
    pub dev_sign: bool,
    /// Rebuild the tree and check it still matches the recorded root.
    pub verify: bool,
    pub signers: Option<&'a Path>,
}

/// Checks a signature against the proposed root and stores it.
pub fn run(definitions: &Path, args: SignArgs<'_>) -> anyhow::Result<DefinitionSignature> {
    let mut file = load_definitions(definitions)
        .with_context(|| format!("reading definitions {}", definitions.display()))?;
    let root = file
        .recorded_root()
        .context("no proposed root; run `defsign propose` first")?;

    if args.verify {
        let computed = file.snapshot()?.root();
        if computed != root {
            return Err(DefinitionError::RootMismatch {
                expected: root.to_hex(),
                computed: computed.to_hex(),
            }
            .into());
        }
        println!("Recorded root matches the current definitions.");
    }

    let signature = match (&args.signature, args.dev_sign) {
        (Some(_), true) => bail!("pass either a signature or --dev-sign, not both"),
        (Some(hex), false) => DefinitionSignature::from_hex(hex)?,
        (None, true) => sign_with_dev_keys(&root),
        (None, false) => return Err(anyhow!("missing signature")),
    };

    let signers = super::resolve_signers(args.signers, args.dev_sign)?;
    check_signature(&root, &signature, &signers)?;

    file.metadata.signature = Some(signature);
    store_definitions(definitions, &file)?;

    println!("Signature accepted for root {root}");
    println!("Signers: {} (sigmask {:#010b})", signature.signer_count(), signature.sigmask);
    Ok(signature)
}
