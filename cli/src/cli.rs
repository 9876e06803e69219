//! # CLI Interface
//!
//! Defines the command-line argument structure for `seedelf` using `clap`
//! derive. Every subcommand reads JSON files and writes JSON to stdout;
//! logs go to stderr.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::logging::LogFormat;

/// Stealth-register wallet tooling.
///
/// Generates identities, mints fresh registers for a recipient, scans
/// published records for owned outputs, and creates or checks spend proofs.
#[derive(Parser, Debug)]
#[command(
    name = "seedelf",
    about = "Seedelf stealth wallet tooling",
    version,
    propagate_version = true
)]
pub struct SeedelfCli {
    /// Log output format.
    #[arg(
        long,
        global = true,
        env = "SEEDELF_LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Pretty
    )]
    pub log_format: LogFormat,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a new identity and print its secret and base register.
    Keygen(KeygenArgs),
    /// Mint a fresh, unlinkable register for a recipient.
    Rerandomize(RerandomizeArgs),
    /// Prove ownership of a register for a spend.
    Prove(ProveArgs),
    /// Check a spend proof against a register.
    Verify(VerifyArgs),
    /// Find the records owned by one or more secrets.
    Scan(ScanArgs),
    /// Seal a short note to the owner of a register.
    Encrypt(EncryptArgs),
    /// Open a sealed note with the owner's secret.
    Decrypt(DecryptArgs),
}

/// Datum output encoding.
#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DatumFormat {
    /// `{ "generator", "public_value" }` hex fields.
    Hex,
    /// Detailed-schema constructor JSON.
    Json,
    /// CBOR bytes, hex encoded.
    Cbor,
}

/// Arguments for the `keygen` subcommand.
#[derive(Args, Debug)]
pub struct KeygenArgs {
    /// Write the secret hex to this file (mode 0600 on Unix) instead of
    /// printing it.
    #[arg(long, short = 'o')]
    pub out: Option<PathBuf>,
}

/// Arguments for the `rerandomize` subcommand.
#[derive(Args, Debug)]
pub struct RerandomizeArgs {
    /// Recipient register file (hex fields or datum JSON).
    #[arg(long, short = 'r')]
    pub register: PathBuf,

    /// How many fresh registers to mint.
    #[arg(long, short = 'n', default_value_t = 1)]
    pub count: usize,

    /// Output encoding.
    #[arg(long, value_enum, default_value_t = DatumFormat::Hex)]
    pub format: DatumFormat,
}

/// Arguments for the `prove` subcommand.
#[derive(Args, Debug)]
pub struct ProveArgs {
    /// Hex-encoded wallet secret.
    ///
    /// Prefer the environment variable: command-line arguments are visible
    /// to other users of the machine.
    #[arg(long, env = "SEEDELF_SECRET", hide_env_values = true)]
    pub secret: String,

    /// Register being spent.
    #[arg(long, short = 'r')]
    pub register: PathBuf,

    /// Hex transaction context the proof is bound to. Odd lengths are
    /// zero-padded on the left.
    #[arg(long, short = 'c', default_value = "")]
    pub context: String,
}

/// Arguments for the `verify` subcommand.
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Register being spent.
    #[arg(long, short = 'r')]
    pub register: PathBuf,

    /// Proof file: `{ "z", "commitment" }` or a redeemer in datum JSON.
    #[arg(long, short = 'p')]
    pub proof: PathBuf,

    /// Hex transaction context the proof must be bound to.
    #[arg(long, short = 'c', default_value = "")]
    pub context: String,
}

/// Arguments for the `scan` subcommand.
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// JSON array of `{ "id", "datum" | "cbor" | "a" + "b" }` records.
    #[arg(long)]
    pub records: PathBuf,

    /// Hex-encoded wallet secrets, comma separated when read from the
    /// environment. The first owning secret wins.
    #[arg(
        long = "secret",
        env = "SEEDELF_SECRET",
        hide_env_values = true,
        value_delimiter = ',',
        required = true
    )]
    pub secrets: Vec<String>,

    /// Worker threads for matching. Defaults to the available parallelism.
    #[arg(long, env = "SEEDELF_SCAN_WORKERS")]
    pub workers: Option<usize>,

    /// Report at most this many owned records.
    #[arg(long)]
    pub limit: Option<usize>,

    /// Cap the report at the wallet's per-transaction output count.
    #[arg(long, conflicts_with = "limit")]
    pub wallet: bool,
}

/// Arguments for the `encrypt` subcommand.
#[derive(Args, Debug)]
pub struct EncryptArgs {
    /// Register the note is sealed to.
    #[arg(long, short = 'r')]
    pub register: PathBuf,

    /// The note itself.
    #[arg(long, short = 'm')]
    pub message: String,
}

/// Arguments for the `decrypt` subcommand.
#[derive(Args, Debug)]
pub struct DecryptArgs {
    /// Hex-encoded wallet secret.
    #[arg(long, env = "SEEDELF_SECRET", hide_env_values = true)]
    pub secret: String,

    /// Register the note was sealed to.
    #[arg(long, short = 'r')]
    pub register: PathBuf,

    /// Sealed note file: `{ "r_hex", "c_hex" }`.
    #[arg(long)]
    pub sealed: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli_structure() {
        // Ensures the derive macros produce a valid CLI definition.
        SeedelfCli::command().debug_assert();
    }

    #[test]
    fn scan_accepts_repeated_and_delimited_secrets() {
        let cli = SeedelfCli::try_parse_from([
            "seedelf", "scan", "--records", "r.json", "--secret", "01,02", "--secret", "03",
        ])
        .unwrap();
        match cli.command {
            Commands::Scan(args) => assert_eq!(args.secrets, vec!["01", "02", "03"]),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn wallet_and_limit_conflict() {
        let parsed = SeedelfCli::try_parse_from([
            "seedelf", "scan", "--records", "r.json", "--secret", "01", "--limit", "3", "--wallet",
        ]);
        assert!(parsed.is_err());
    }
}
