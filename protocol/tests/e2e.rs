//! End-to-end integration tests for the seedelf protocol core.
//!
//! These walk an output through its whole life as the outside world sees
//! it: an identity is created, a sender mints a fresh register for it and
//! publishes the datum, the wallet finds it again by scanning, proves
//! ownership against the spending transaction, and the validator side
//! checks the redeemer it is handed.
//!
//! Everything crosses the same wire encodings the chain uses (CBOR hex,
//! detailed-schema JSON, compressed point hex), so a break in any encoding
//! shows up here even if the unit tests for that module still pass.

use ark_std::rand::{rngs::StdRng, SeedableRng};
use serde_json::json;

use seedelf_protocol::crypto::scalar::Scalar;
use seedelf_protocol::crypto::SealedMessage;
use seedelf_protocol::datum::{cbor, PlutusData};
use seedelf_protocol::scan::{scan_json, ScanOptions};
use seedelf_protocol::zkp::{create_proof_with_rng, verify_hex, verify_register};
use seedelf_protocol::{ChallengeContext, Identity, Proof, Register, SeedelfError};

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

/// A sender minting `n` fresh outputs for `recipient`, as CBOR datum hex.
fn publish(rng: &mut StdRng, recipient: &Register, n: usize) -> Vec<String> {
    (0..n)
        .map(|_| {
            let fresh = recipient.rerandomize_random_with(rng).unwrap();
            cbor::encode_hex(&fresh.to_datum()).unwrap()
        })
        .collect()
}

/// Index records the way a chain indexer would hand them over.
fn index(datums: &[String], prefix: &str) -> Vec<serde_json::Value> {
    datums
        .iter()
        .enumerate()
        .map(|(i, d)| json!({ "id": format!("{prefix}#{i}"), "cbor": d }))
        .collect()
}

// ---------------------------------------------------------------------------
// Full lifecycle
// ---------------------------------------------------------------------------

#[test]
fn receive_scan_prove_verify() {
    let mut rng = StdRng::seed_from_u64(2026);
    let alice = Identity::generate_with(&mut rng).unwrap();
    let bob = Identity::generate_with(&mut rng).unwrap();

    // Senders publish outputs for both wallets into the same block.
    let mut records = index(&publish(&mut rng, alice.register(), 3), "aa");
    records.extend(index(&publish(&mut rng, bob.register(), 2), "bb"));
    records.push(json!({ "id": "junk#0", "cbor": "d87980" }));

    // Alice scans and finds exactly her three outputs.
    let report = scan_json(&records, &[*alice.secret()], &ScanOptions::default());
    assert_eq!(report.scanned, 6);
    assert_eq!(report.malformed, 1);
    let owned: Vec<&String> = report.owned.keys().collect();
    assert_eq!(owned, vec!["aa#0", "aa#1", "aa#2"]);

    // She spends aa#1 in a transaction whose inputs hash to `ctx`.
    let datum_hex = records[1]["cbor"].as_str().unwrap();
    let register = Register::from_datum(&cbor::decode_hex(datum_hex).unwrap()).unwrap();
    let ctx = ChallengeContext::from_hex("acabfacecafe").unwrap();
    let proof = create_proof_with_rng(
        &mut rng,
        alice.secret(),
        &register.generator,
        &register.public_value,
        &ctx,
    )
    .unwrap();

    // The redeemer travels as CBOR; the validator decodes and checks it.
    let redeemer_hex = cbor::encode_hex(&proof.to_redeemer()).unwrap();
    let received = Proof::from_redeemer(&cbor::decode_hex(&redeemer_hex).unwrap()).unwrap();
    assert_eq!(received, proof);
    assert!(verify_register(&register, &received, &ctx).is_ok());

    // Bob cannot produce a proof for Alice's output.
    let forged = create_proof_with_rng(
        &mut rng,
        bob.secret(),
        &register.generator,
        &register.public_value,
        &ctx,
    )
    .unwrap();
    assert_eq!(
        verify_register(&register, &forged, &ctx),
        Err(SeedelfError::ProofRejected)
    );
}

#[test]
fn hex_wire_verification_matches_typed_verification() {
    let mut rng = StdRng::seed_from_u64(7);
    let id = Identity::generate_with(&mut rng).unwrap();
    let reg = id.fresh_register().unwrap();
    let ctx = ChallengeContext::from_hex("abc").unwrap();
    let (g, u) = (reg.generator, reg.public_value);
    let proof = create_proof_with_rng(&mut rng, id.secret(), &g, &u, &ctx).unwrap();

    let redeemer = serde_json::to_value(proof.to_redeemer()).unwrap();
    let z_hex = redeemer["fields"][0]["bytes"].as_str().unwrap();
    let r_hex = redeemer["fields"][1]["bytes"].as_str().unwrap();

    // Odd-length context on the wire is the same bytes as its padded form.
    let (g_hex, u_hex) = (reg.generator_hex(), reg.public_value_hex());
    assert!(verify_hex(&g_hex, &u_hex, z_hex, r_hex, "abc").unwrap());
    assert!(verify_hex(&g_hex, &u_hex, z_hex, r_hex, "0abc").unwrap());
    assert!(!verify_hex(&g_hex, &u_hex, z_hex, r_hex, "abcd").unwrap());
}

#[test]
fn datum_json_and_cbor_agree() {
    let id = Identity::from_secret(Scalar::from(18_446_744_073_709_551_606u64)).unwrap();
    let datum = id.register().to_datum();

    let json = datum.to_json().unwrap();
    let from_json = PlutusData::from_json(&json).unwrap();
    let from_cbor = cbor::decode(&cbor::encode(&datum).unwrap()).unwrap();
    assert_eq!(from_json, from_cbor);
    assert_eq!(Register::from_datum(&from_cbor).unwrap(), *id.register());
}

#[test]
fn sealed_note_reaches_only_the_owner() {
    let mut rng = StdRng::seed_from_u64(99);
    let alice = Identity::generate_with(&mut rng).unwrap();
    let bob = Identity::generate_with(&mut rng).unwrap();
    let output = alice.register().rerandomize_random_with(&mut rng).unwrap();

    let note = SealedMessage::seal_with(&mut rng, "invoice #42", &output).unwrap();
    let wire = serde_json::to_string(&note).unwrap();
    let received: SealedMessage = serde_json::from_str(&wire).unwrap();

    assert_eq!(received.open(alice.secret(), &output).unwrap().as_deref(), Some("invoice #42"));
    assert_eq!(received.open(bob.secret(), &output).unwrap(), None);
}

#[test]
fn wallet_scan_respects_output_cap() {
    let mut rng = StdRng::seed_from_u64(5);
    let id = Identity::generate_with(&mut rng).unwrap();
    let records = index(&publish(&mut rng, id.register(), 25), "tx");

    let report = scan_json(&records, &[*id.secret()], &ScanOptions::wallet());
    assert_eq!(report.owned.len(), 20);
    assert!(report.truncated);
}
