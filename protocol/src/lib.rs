// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # seedelf — Core Library
//!
//! Stealth ownership for UTXO chains. A holder keeps one secret scalar and
//! receives funds at registers that look unrelated to each other and to the
//! holder, then spends them by proving knowledge of the secret with a
//! Schnorr proof the on-chain validator can check with its BLS12-381
//! builtins.
//!
//! ## Architecture
//!
//! - **crypto** — Scalars, G1 points, hashes, sealed messages.
//! - **identity** — The secret, its register, and rerandomization.
//! - **scan** — "Which of these registers are mine?"
//! - **zkp** — Fiat-Shamir Schnorr spend proofs.
//! - **datum** — The on-chain records (JSON and CBOR).
//! - **config** — Protocol constants.
//! - **error** — One error type for all of the above.
//!
//! ## Design Philosophy
//!
//! 1. Byte-exact with the chain. If a datum, redeemer or challenge differs
//!    by one bit from what the validator computes, nothing else matters.
//! 2. No panics on hostile input. Everything that decodes returns `Result`.
//! 3. Secrets stay out of logs, errors and `Debug` output.
//! 4. No global state. Randomness comes from the OS or from the caller.

pub mod config;
pub mod crypto;
pub mod datum;
pub mod error;
pub mod identity;
pub mod scan;
pub mod zkp;

pub use error::{Result, SeedelfError};
pub use identity::{generate_identity, Identity, Register};
pub use scan::{find_owned, find_owned_parallel, scan_records, ScanOptions, ScanReport};
pub use zkp::{create_proof, verify, verify_proof, ChallengeContext, Proof};
