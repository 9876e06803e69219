//! Terminal walkthrough of a seedelf output's lifecycle.
//!
//! Creates two wallets, mints unlinkable registers for one of them, scans a
//! block of published datums, proves ownership for a spend, and seals a
//! note to the recipient.
//!
//! Run with:
//!   cargo run --example demo --release

use std::time::Instant;

use seedelf_protocol::crypto::SealedMessage;
use seedelf_protocol::datum::cbor;
use seedelf_protocol::scan::{scan_json, ScanOptions};
use seedelf_protocol::zkp::{prove_register, verify_register};
use seedelf_protocol::{ChallengeContext, Identity, Register, SeedelfError};

// ---------------------------------------------------------------------------
// ANSI color constants
// ---------------------------------------------------------------------------

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const BLUE: &str = "\x1b[34m";
const MAGENTA: &str = "\x1b[35m";
const CYAN: &str = "\x1b[36m";
const WHITE: &str = "\x1b[37m";
const RED: &str = "\x1b[31m";

const BG_BLUE: &str = "\x1b[44m";

// ---------------------------------------------------------------------------
// Display helpers
// ---------------------------------------------------------------------------

fn banner() {
    println!();
    println!("{BG_BLUE}{BOLD}{WHITE}                                                                    {RESET}");
    println!("{BG_BLUE}{BOLD}{WHITE}    SEEDELF  --  Stealth Register Lifecycle Demo                    {RESET}");
    println!("{BG_BLUE}{BOLD}{WHITE}    BLS12-381 G1  |  Schnorr + BLAKE2b-224  |  AES-256-GCM          {RESET}");
    println!("{BG_BLUE}{BOLD}{WHITE}                                                                    {RESET}");
    println!();
}

fn section(num: u32, title: &str) {
    println!();
    println!("{BOLD}{CYAN}===[{YELLOW} Step {num} {CYAN}]=============================================================={RESET}");
    println!("{BOLD}{WHITE}  {title}{RESET}");
    println!("{CYAN}------------------------------------------------------------------------{RESET}");
}

fn subsection(text: &str) {
    println!("{DIM}{CYAN}  >> {text}{RESET}");
}

fn success(text: &str) {
    println!("{GREEN}  [OK] {text}{RESET}");
}

fn rejected(text: &str) {
    println!("{RED}  [REJECTED] {text}{RESET}");
}

fn info(label: &str, value: &str) {
    println!("{WHITE}  {BOLD}{label}:{RESET} {YELLOW}{value}{RESET}");
}

fn timing(label: &str, elapsed: std::time::Duration) {
    let ms = elapsed.as_secs_f64() * 1000.0;
    println!("{DIM}{MAGENTA}  [{label}: {ms:.2} ms]{RESET}");
}

fn register_display(name: &str, register: &Register, color: &str) {
    let u = register.public_value_hex();
    println!(
        "  {color}{BOLD}{name}{RESET}  {DIM}U = {}...{}{RESET}",
        &u[..10],
        &u[u.len() - 8..]
    );
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<(), SeedelfError> {
    let demo_start = Instant::now();

    banner();

    // -----------------------------------------------------------------------
    // Step 1: Identities
    // -----------------------------------------------------------------------

    section(1, "Wallet Identities");
    subsection("Sampling secrets and deriving base registers (G, x*G)...");

    let t = Instant::now();
    let alice = Identity::generate()?;
    let bob = Identity::generate()?;
    timing("keygen x2", t.elapsed());

    println!();
    register_display("Alice", alice.register(), BLUE);
    register_display("Bob  ", bob.register(), GREEN);
    success("Base registers published");

    // -----------------------------------------------------------------------
    // Step 2: Rerandomization
    // -----------------------------------------------------------------------

    section(2, "Unlinkable Outputs");
    subsection("Three senders each mint a fresh register for Alice...");

    let t = Instant::now();
    let minted = (0..3)
        .map(|_| alice.register().rerandomize_random())
        .collect::<Result<Vec<_>, _>>()?;
    timing("rerandomize x3", t.elapsed());

    for (i, register) in minted.iter().enumerate() {
        register_display(&format!("out#{i}"), register, BLUE);
    }
    success("No two outputs share a point, yet all belong to Alice");

    // -----------------------------------------------------------------------
    // Step 3: Scanning
    // -----------------------------------------------------------------------

    section(3, "Ownership Scan");
    subsection("A block holds Alice's outputs, one of Bob's, and a broken datum...");

    let mut records = minted
        .iter()
        .enumerate()
        .map(|(i, r)| -> Result<serde_json::Value, SeedelfError> {
            let datum = cbor::encode_hex(&r.to_datum())?;
            Ok(serde_json::json!({ "id": format!("alice#{i}"), "cbor": datum }))
        })
        .collect::<Result<Vec<_>, SeedelfError>>()?;
    let bobs = bob.fresh_register()?;
    let bob_datum = cbor::encode_hex(&bobs.to_datum())?;
    records.push(serde_json::json!({ "id": "bob#0", "cbor": bob_datum }));
    records.push(serde_json::json!({ "id": "junk#0", "cbor": "d87980" }));

    let t = Instant::now();
    let report = scan_json(&records, &[*alice.secret()], &ScanOptions::default());
    timing("scan", t.elapsed());

    info("Scanned", &report.scanned.to_string());
    info("Malformed", &report.malformed.to_string());
    info(
        "Owned",
        &report.owned.keys().cloned().collect::<Vec<_>>().join(", "),
    );
    success("Alice finds exactly her three outputs");

    // -----------------------------------------------------------------------
    // Step 4: Spend proof
    // -----------------------------------------------------------------------

    section(4, "Spend Authorization");
    subsection("Alice proves she knows x for out#1, bound to the spending transaction...");

    let spent = &minted[1];
    let ctx = ChallengeContext::from_hex("acabfacecafebabe")?;

    let t = Instant::now();
    let proof = prove_register(alice.secret(), spent, &ctx)?;
    timing("prove", t.elapsed());

    let redeemer = cbor::encode_hex(&proof.to_redeemer())?;
    info("Redeemer", &format!("{}... ({} bytes)", &redeemer[..24], redeemer.len() / 2));

    let t = Instant::now();
    verify_register(spent, &proof, &ctx)?;
    timing("verify", t.elapsed());
    success("Validator accepts Alice's proof");

    let replay = ChallengeContext::from_hex("deadbeef")?;
    if verify_register(spent, &proof, &replay).is_err() {
        rejected("The same proof replayed in another transaction");
    }
    let forged = prove_register(bob.secret(), spent, &ctx)?;
    if verify_register(spent, &forged, &ctx).is_err() {
        rejected("Bob's proof for Alice's output");
    }

    // -----------------------------------------------------------------------
    // Step 5: Sealed note
    // -----------------------------------------------------------------------

    section(5, "Sealed Note");
    subsection("A sender attaches an encrypted memo to out#2...");

    let note = SealedMessage::seal("thanks for lunch", &minted[2])?;
    info("Ciphertext", &format!("{}...", &note.c_hex[..24]));

    match note.open(alice.secret(), &minted[2])? {
        Some(text) => success(&format!("Alice reads: \"{text}\"")),
        None => rejected("Alice could not open her own note"),
    }
    if note.open(bob.secret(), &minted[2])?.is_none() {
        rejected("Bob tries to open it");
    }

    println!();
    timing("total", demo_start.elapsed());
    println!();
    Ok(())
}
