//! # Ownership Scanning
//!
//! Registers on chain are unlinkable, which means a wallet cannot
//! look its outputs up by address. It has to ask every published register
//! "are you mine?" by checking `x·G' == U'` for each of its secrets. That is
//! one scalar multiplication per `(register, secret)` pair, with no index
//! and no shortcut.
//!
//! ## Matching policy
//!
//! For each register, secrets are tried in ascending index order and the
//! first match wins. Under the discrete-log assumption two different
//! secrets never both own a register, so the policy only matters for
//! duplicated secrets, but it makes the output deterministic either way.
//! The parallel scanner splits the register list, never the secret list,
//! so it inherits the same policy and returns exactly what
//! [`find_owned`] returns.
//!
//! ## Malformed input
//!
//! Indexers hand us whatever someone put on chain. A record that does not
//! decode to a valid register is counted, logged at `debug`, and treated as
//! "not owned". One bad record never aborts a scan.

use std::collections::BTreeMap;
use std::thread;

use serde::{Deserialize, Serialize};

use crate::config::{MAXIMUM_WALLET_OUTPUTS, MIN_COMMITMENTS_PER_WORKER};
use crate::crypto::scalar::Scalar;
use crate::datum::cbor;
use crate::datum::plutus::PlutusData;
use crate::error::Result;
use crate::identity::register::{Register, StealthCommitment};

// ---------------------------------------------------------------------------
// Core matching
// ---------------------------------------------------------------------------

/// Index of the first secret that owns `commitment`, if any.
fn first_owner(commitment: &StealthCommitment, secrets: &[Scalar]) -> Option<usize> {
    if !commitment.is_valid() {
        return None;
    }
    secrets.iter().position(|x| commitment.is_owned(x))
}

/// `(commitment index, secret index)` for every owned commitment in a
/// slice that starts at `offset` in the full list.
fn match_chunk(
    commitments: &[StealthCommitment],
    secrets: &[Scalar],
    offset: usize,
) -> Vec<(usize, usize)> {
    commitments
        .iter()
        .enumerate()
        .filter_map(|(i, c)| first_owner(c, secrets).map(|j| (offset + i, j)))
        .collect()
}

/// Find every commitment owned by one of `secrets`.
///
/// Returns `commitment index → owning secret`. Registers with an identity
/// point are never owned.
pub fn find_owned(
    commitments: &[StealthCommitment],
    secrets: &[Scalar],
) -> BTreeMap<usize, Scalar> {
    match_chunk(commitments, secrets, 0)
        .into_iter()
        .map(|(i, j)| (i, secrets[j]))
        .collect()
}

/// [`find_owned`] spread over up to `workers` scoped threads.
///
/// Small inputs are scanned on the calling thread. The result is identical
/// to [`find_owned`] for any worker count.
pub fn find_owned_parallel(
    commitments: &[StealthCommitment],
    secrets: &[Scalar],
    workers: usize,
) -> BTreeMap<usize, Scalar> {
    match_parallel(commitments, secrets, workers)
        .into_iter()
        .map(|(i, j)| (i, secrets[j]))
        .collect()
}

fn match_parallel(
    commitments: &[StealthCommitment],
    secrets: &[Scalar],
    workers: usize,
) -> Vec<(usize, usize)> {
    let workers = effective_workers(commitments.len(), workers);
    if workers <= 1 {
        return match_chunk(commitments, secrets, 0);
    }

    let chunk_len = commitments.len().div_ceil(workers);
    thread::scope(|scope| {
        let handles: Vec<_> = commitments
            .chunks(chunk_len)
            .enumerate()
            .map(|(n, part)| scope.spawn(move || match_chunk(part, secrets, n * chunk_len)))
            .collect();

        // Chunks are joined in order, so the output stays sorted by index.
        handles
            .into_iter()
            .flat_map(|handle| match handle.join() {
                Ok(found) => found,
                Err(panic) => std::panic::resume_unwind(panic),
            })
            .collect()
    })
}

fn effective_workers(items: usize, requested: usize) -> usize {
    requested.min(items / MIN_COMMITMENTS_PER_WORKER).max(1)
}

// ---------------------------------------------------------------------------
// Record scanning
// ---------------------------------------------------------------------------

/// A published output as handed over by an indexer: an opaque identifier
/// plus the register in one of the wire forms.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanRecord {
    /// Opaque identifier, typically `tx_hash#index`.
    pub id: String,
    /// The undecoded register.
    #[serde(flatten)]
    pub payload: RecordPayload,
}

/// The wire forms a register can arrive in. Decoding is deferred so a bad
/// payload only fails its own record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordPayload {
    /// `{"datum": {"constructor": 0, "fields": [...]}}`
    Datum { datum: serde_json::Value },
    /// `{"cbor": "d8799f..."}`
    Cbor { cbor: String },
    /// `{"a": "<hex G'>", "b": "<hex U'>"}`
    Hex { a: String, b: String },
}

impl ScanRecord {
    /// Decode the payload into a register.
    pub fn register(&self) -> Result<Register> {
        let register = match &self.payload {
            RecordPayload::Datum { datum } => {
                let data: PlutusData = serde_json::from_value(datum.clone())?;
                Register::from_datum(&data)?
            }
            RecordPayload::Cbor { cbor: hex } => Register::from_datum(&cbor::decode_hex(hex)?)?,
            RecordPayload::Hex { a, b } => Register::from_hex(a, b)?,
        };
        Ok(register)
    }
}

/// Knobs for [`scan_records`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScanOptions {
    /// Worker threads for the matching phase. `1` scans inline.
    pub workers: usize,
    /// Stop reporting after this many owned records, in input order.
    pub limit: Option<usize>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            workers: 1,
            limit: None,
        }
    }
}

impl ScanOptions {
    /// Options for assembling one spend: capped at the number of outputs a
    /// wallet pulls into a single transaction.
    pub fn wallet() -> Self {
        Self {
            limit: Some(MAXIMUM_WALLET_OUTPUTS),
            ..Self::default()
        }
    }
}

/// One owned record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct OwnedMatch {
    /// Position of the owning secret in the input secret list.
    pub secret_index: usize,
    /// The owning secret. Never serialized.
    #[serde(skip)]
    pub secret: Scalar,
}

/// Result of a record scan.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    /// `record id → owning secret`.
    pub owned: BTreeMap<String, OwnedMatch>,
    /// Records looked at.
    pub scanned: usize,
    /// Records skipped because they did not decode to a valid register.
    pub malformed: usize,
    /// Whether owned records were dropped because of the limit.
    pub truncated: bool,
}

/// Decode and scan a batch of records.
///
/// Malformed records are skipped and counted. When the same id appears more
/// than once, the first owned occurrence wins.
pub fn scan_records(
    records: &[ScanRecord],
    secrets: &[Scalar],
    options: &ScanOptions,
) -> ScanReport {
    let mut report = ScanReport {
        scanned: records.len(),
        ..ScanReport::default()
    };

    let mut ids = Vec::with_capacity(records.len());
    let mut registers = Vec::with_capacity(records.len());
    for record in records {
        match record.register() {
            Ok(register) if register.is_valid() => {
                ids.push(record.id.as_str());
                registers.push(register);
            }
            Ok(_) => {
                report.malformed += 1;
                tracing::debug!(id = %record.id, "skipping record: degenerate register");
            }
            Err(err) => {
                report.malformed += 1;
                tracing::debug!(id = %record.id, error = %err, "skipping record");
            }
        }
    }

    for (i, j) in match_parallel(&registers, secrets, options.workers) {
        if options.limit.is_some_and(|limit| report.owned.len() >= limit) {
            report.truncated = true;
            break;
        }
        report.owned.entry(ids[i].to_owned()).or_insert(OwnedMatch {
            secret_index: j,
            secret: secrets[j],
        });
    }

    tracing::info!(
        scanned = report.scanned,
        owned = report.owned.len(),
        malformed = report.malformed,
        truncated = report.truncated,
        "ownership scan complete"
    );
    report
}

/// Parse loosely typed JSON records one by one and scan them.
///
/// Elements that are not even shaped like a record (missing `id`, unknown
/// payload) count as malformed instead of failing the whole batch.
pub fn scan_json(
    values: &[serde_json::Value],
    secrets: &[Scalar],
    options: &ScanOptions,
) -> ScanReport {
    let mut unparsed = 0;
    let records: Vec<ScanRecord> = values
        .iter()
        .filter_map(|value| match serde_json::from_value(value.clone()) {
            Ok(record) => Some(record),
            Err(err) => {
                unparsed += 1;
                tracing::debug!(error = %err, "skipping unparseable record");
                None
            }
        })
        .collect();

    let mut report = scan_records(&records, secrets, options);
    report.scanned += unparsed;
    report.malformed += unparsed;
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::group::{generator, identity, scalar_mul};
    use crate::datum::cbor::encode_hex;
    use ark_std::rand::{rngs::StdRng, SeedableRng};
    use serde_json::json;

    fn register_for(x: u64, d: u64) -> Register {
        let g = generator();
        Register::new(g, scalar_mul(&g, &Scalar::from(x)))
            .rerandomize(&Scalar::from(d))
            .unwrap()
    }

    #[test]
    fn test_find_owned_basic() {
        let commitments = vec![register_for(3, 10), register_for(4, 11), register_for(3, 12)];
        let secrets = vec![Scalar::from(3u64), Scalar::from(9u64)];
        let owned = find_owned(&commitments, &secrets);
        assert_eq!(owned.len(), 2);
        assert_eq!(owned[&0], Scalar::from(3u64));
        assert_eq!(owned[&2], Scalar::from(3u64));
        assert!(!owned.contains_key(&1));
    }

    #[test]
    fn test_find_owned_empty_inputs() {
        assert!(find_owned(&[], &[Scalar::from(1u64)]).is_empty());
        assert!(find_owned(&[register_for(1, 2)], &[]).is_empty());
    }

    #[test]
    fn test_first_secret_wins_on_duplicates() {
        let commitments = vec![register_for(5, 2)];
        let secrets = vec![Scalar::from(1u64), Scalar::from(5u64), Scalar::from(5u64)];
        let records = vec![ScanRecord {
            id: "a#0".into(),
            payload: RecordPayload::Hex {
                a: commitments[0].generator_hex(),
                b: commitments[0].public_value_hex(),
            },
        }];
        let report = scan_records(&records, &secrets, &ScanOptions::default());
        assert_eq!(report.owned["a#0"].secret_index, 1);
    }

    #[test]
    fn test_degenerate_register_not_owned() {
        let commitments = vec![Register::new(identity(), identity())];
        assert!(find_owned(&commitments, &[Scalar::from(1u64)]).is_empty());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let mut rng = StdRng::seed_from_u64(8);
        let secrets = vec![Scalar::from(21u64), Scalar::from(22u64)];
        let g = generator();
        let commitments: Vec<Register> = (0..200u64)
            .map(|i| {
                let x = if i % 3 == 0 { 21 } else if i % 7 == 0 { 22 } else { 1000 + i };
                Register::new(g, scalar_mul(&g, &Scalar::from(x)))
                    .rerandomize_random_with(&mut rng)
                    .unwrap()
            })
            .collect();

        let sequential = find_owned(&commitments, &secrets);
        for workers in [1, 2, 3, 8] {
            assert_eq!(find_owned_parallel(&commitments, &secrets, workers), sequential);
        }
    }

    #[test]
    fn test_effective_workers() {
        assert_eq!(effective_workers(10, 8), 1);
        assert_eq!(effective_workers(MIN_COMMITMENTS_PER_WORKER * 4, 8), 4);
        assert_eq!(effective_workers(MIN_COMMITMENTS_PER_WORKER * 100, 8), 8);
        assert_eq!(effective_workers(1000, 0), 1);
    }

    #[test]
    fn test_scan_json_mixed_forms_and_garbage() {
        let mine = register_for(77, 5);
        let other = register_for(78, 5);
        let fresh = mine.rerandomize(&Scalar::from(3u64)).unwrap();
        let values = vec![
            json!({ "id": "tx1#0", "datum": mine.to_datum() }),
            json!({ "id": "tx2#0", "cbor": encode_hex(&fresh.to_datum()).unwrap() }),
            json!({ "id": "tx3#1", "a": other.generator_hex(), "b": other.public_value_hex() }),
            json!({ "id": "tx4#0", "a": "00", "b": "zz" }),
            json!({ "id": "tx5#0", "cbor": "d87980" }),
            json!({ "no_id": true }),
            json!(42),
        ];

        let report = scan_json(&values, &[Scalar::from(77u64)], &ScanOptions::default());
        assert_eq!(report.scanned, 7);
        assert_eq!(report.malformed, 4);
        assert_eq!(report.owned.keys().collect::<Vec<_>>(), vec!["tx1#0", "tx2#0"]);
        assert!(!report.truncated);
    }

    #[test]
    fn test_limit_truncates_in_input_order() {
        let records: Vec<ScanRecord> = (0..5u64)
            .map(|i| {
                let reg = register_for(9, i + 1);
                ScanRecord {
                    id: format!("tx{i}"),
                    payload: RecordPayload::Hex {
                        a: reg.generator_hex(),
                        b: reg.public_value_hex(),
                    },
                }
            })
            .collect();
        let options = ScanOptions {
            limit: Some(2),
            ..ScanOptions::default()
        };
        let report = scan_records(&records, &[Scalar::from(9u64)], &options);
        assert_eq!(report.owned.keys().collect::<Vec<_>>(), vec!["tx0", "tx1"]);
        assert!(report.truncated);
    }

    #[test]
    fn test_report_never_serializes_secrets() {
        let reg = register_for(0xabcdef, 2);
        let records = vec![ScanRecord {
            id: "x".into(),
            payload: RecordPayload::Hex {
                a: reg.generator_hex(),
                b: reg.public_value_hex(),
            },
        }];
        let report = scan_records(&records, &[Scalar::from(0xabcdefu64)], &ScanOptions::wallet());
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("secret_index"));
        assert!(!json.contains("abcdef"));
    }
}
