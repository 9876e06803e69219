// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Seedelf Wallet Tool
//!
//! Entry point for the `seedelf` binary. Parses CLI arguments, initializes
//! logging and dispatches to the protocol library.
//!
//! - `keygen`      — create an identity
//! - `rerandomize` — mint fresh registers for a recipient
//! - `prove`       — prove ownership of a register for a spend
//! - `verify`      — check a spend proof
//! - `scan`        — find owned records
//! - `encrypt`     — seal a note to a register's owner
//! - `decrypt`     — open a sealed note

mod cli;
mod logging;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::json;
use std::path::Path;

use seedelf_protocol::crypto::scalar::decode_scalar_hex;
use seedelf_protocol::crypto::SealedMessage;
use seedelf_protocol::datum::{cbor, PlutusData};
use seedelf_protocol::scan::{scan_json, ScanOptions};
use seedelf_protocol::zkp::{prove_register, verify_register};
use seedelf_protocol::{ChallengeContext, Identity, Proof, Register, SeedelfError};

use cli::{Commands, DatumFormat, SeedelfCli};

fn main() -> Result<()> {
    let cli = SeedelfCli::parse();
    logging::init_logging("seedelf=info,seedelf_protocol=info", cli.log_format);

    match cli.command {
        Commands::Keygen(args) => keygen(args),
        Commands::Rerandomize(args) => rerandomize(args),
        Commands::Prove(args) => prove(args),
        Commands::Verify(args) => verify(args),
        Commands::Scan(args) => scan(args),
        Commands::Encrypt(args) => encrypt(args),
        Commands::Decrypt(args) => decrypt(args),
    }
}

// ---------------------------------------------------------------------------
// Input files
// ---------------------------------------------------------------------------

/// The shapes a register or proof travels in.
enum WireShape {
    /// CBOR hex of the datum or redeemer, as a bare JSON string.
    Cbor(String),
    /// Detailed-schema constructor JSON.
    Datum(PlutusData),
    /// The plain hex-field object.
    Fields(serde_json::Value),
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

fn read_shape(path: &Path) -> Result<WireShape> {
    let shape = match read_json::<serde_json::Value>(path)? {
        serde_json::Value::String(hex) => WireShape::Cbor(hex),
        value if value.get("constructor").is_some() => {
            let data = serde_json::from_value(value)
                .with_context(|| format!("invalid datum in {}", path.display()))?;
            WireShape::Datum(data)
        }
        value => WireShape::Fields(value),
    };
    Ok(shape)
}

fn read_register(path: &Path) -> Result<Register> {
    let register = match read_shape(path)? {
        WireShape::Cbor(hex) => Register::from_datum(&cbor::decode_hex(&hex)?)?,
        WireShape::Datum(data) => Register::from_datum(&data)?,
        WireShape::Fields(value) => serde_json::from_value(value)
            .with_context(|| format!("invalid register in {}", path.display()))?,
    };
    if !register.is_valid() {
        bail!("register in {} contains the identity point", path.display());
    }
    Ok(register)
}

fn read_proof(path: &Path) -> Result<Proof> {
    let proof = match read_shape(path)? {
        WireShape::Cbor(hex) => Proof::from_redeemer(&cbor::decode_hex(&hex)?)?,
        WireShape::Datum(data) => Proof::from_redeemer(&data)?,
        WireShape::Fields(value) => serde_json::from_value(value)
            .with_context(|| format!("invalid proof in {}", path.display()))?,
    };
    Ok(proof)
}

fn identity_from(secret: &str) -> Result<Identity> {
    Identity::from_secret_hex(secret).context("invalid wallet secret")
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn encode_register(register: &Register, format: DatumFormat) -> Result<serde_json::Value> {
    let value = match format {
        DatumFormat::Hex => serde_json::to_value(register)?,
        DatumFormat::Json => serde_json::to_value(register.to_datum())?,
        DatumFormat::Cbor => json!(cbor::encode_hex(&register.to_datum())?),
    };
    Ok(value)
}

// ---------------------------------------------------------------------------
// Subcommands
// ---------------------------------------------------------------------------

/// Creates an identity. With `--out`, the secret goes to a file readable
/// only by the owner and stdout carries just the register.
fn keygen(args: cli::KeygenArgs) -> Result<()> {
    let identity = Identity::generate()?;
    let register = identity.register();
    let datum_cbor = cbor::encode_hex(&register.to_datum())?;

    let Some(path) = args.out else {
        return print_json(&json!({
            "secret": identity.secret_hex(),
            "register": register,
            "datum_cbor": datum_cbor,
        }));
    };

    std::fs::write(&path, identity.secret_hex())
        .with_context(|| format!("failed to write secret to {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600))
            .with_context(|| format!("failed to restrict permissions on {}", path.display()))?;
    }

    tracing::info!(path = %path.display(), "identity generated");
    print_json(&json!({
        "register": register,
        "datum_cbor": datum_cbor,
    }))
}

fn rerandomize(args: cli::RerandomizeArgs) -> Result<()> {
    let base = read_register(&args.register)?;
    let fresh = (0..args.count)
        .map(|_| {
            let register = base.rerandomize_random()?;
            encode_register(&register, args.format)
        })
        .collect::<Result<Vec<_>>>()?;

    tracing::info!(count = fresh.len(), "registers minted");
    print_json(&fresh)
}

fn prove(args: cli::ProveArgs) -> Result<()> {
    let identity = identity_from(&args.secret)?;
    let register = read_register(&args.register)?;
    if !identity.owns(&register) {
        bail!("the wallet secret does not own {}", args.register.display());
    }
    let context = ChallengeContext::from_hex(&args.context).context("invalid --context")?;

    let proof = prove_register(identity.secret(), &register, &context)?;
    let redeemer = proof.to_redeemer();
    print_json(&json!({
        "proof": proof,
        "redeemer": redeemer,
        "redeemer_cbor": cbor::encode_hex(&redeemer)?,
    }))
}

fn verify(args: cli::VerifyArgs) -> Result<()> {
    let register = read_register(&args.register)?;
    let proof = read_proof(&args.proof)?;
    let context = ChallengeContext::from_hex(&args.context).context("invalid --context")?;

    match verify_register(&register, &proof, &context) {
        Ok(()) => print_json(&json!({ "valid": true })),
        Err(SeedelfError::ProofRejected) => {
            print_json(&json!({ "valid": false }))?;
            Err(SeedelfError::ProofRejected.into())
        }
        Err(err) => Err(err.into()),
    }
}

fn scan(args: cli::ScanArgs) -> Result<()> {
    let records: Vec<serde_json::Value> = read_json(&args.records)?;
    let secrets = args
        .secrets
        .iter()
        .enumerate()
        .map(|(i, s)| decode_scalar_hex(s).with_context(|| format!("invalid secret #{i}")))
        .collect::<Result<Vec<_>>>()?;

    let base = if args.wallet { ScanOptions::wallet() } else { ScanOptions::default() };
    let options = ScanOptions {
        workers: args.workers.unwrap_or_else(default_workers).max(1),
        limit: args.limit.or(base.limit),
    };
    tracing::debug!(records = records.len(), secrets = secrets.len(), ?options, "scanning");

    let report = scan_json(&records, &secrets, &options);
    print_json(&report)
}

fn default_workers() -> usize {
    std::thread::available_parallelism().map_or(1, |n| n.get())
}

fn encrypt(args: cli::EncryptArgs) -> Result<()> {
    let register = read_register(&args.register)?;
    let sealed = SealedMessage::seal(&args.message, &register)?;
    print_json(&sealed)
}

fn decrypt(args: cli::DecryptArgs) -> Result<()> {
    let identity = identity_from(&args.secret)?;
    let register = read_register(&args.register)?;
    let sealed: SealedMessage = read_json(&args.sealed)?;

    match sealed.open(identity.secret(), &register)? {
        Some(message) => print_json(&json!({ "message": message })),
        None => bail!("note was not sealed to this register under the given secret"),
    }
}
