//! # Fiat-Shamir Challenge
//!
//! Turns the interactive Schnorr protocol into a non-interactive one by
//! letting a hash play the verifier:
//!
//! ```text
//! c = BLAKE2b-224( enc(G) ‖ enc(R) ‖ enc(U) ‖ context )
//! ```
//!
//! `enc` is the 48-byte compressed point encoding and `context` is
//! transaction-specific bytes (on chain, the hash of the inputs being
//! spent), which pins a proof to one transaction so it cannot be replayed
//! on another.
//!
//! The 28-byte digest is read as a big-endian integer and used as the
//! scalar directly. 224 bits is below the 255-bit field order, so there is
//! nothing to reduce, and the on-chain side does the same integer read.

use crate::config::{CHALLENGE_DIGEST_LENGTH, SCALAR_MODULUS_BITS};
use crate::crypto::group::{encode_point, GroupElement};
use crate::crypto::hash::blake2b_224_multi;
use crate::crypto::scalar::Scalar;
use crate::error::{Result, SeedelfError};
use ark_ff::PrimeField;

// A wider digest would need an explicit reduction mod r.
const _: () = assert!(CHALLENGE_DIGEST_LENGTH * 8 < SCALAR_MODULUS_BITS as usize);

/// Transaction-binding bytes appended to the challenge preimage.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChallengeContext(Vec<u8>);

impl ChallengeContext {
    /// An empty context. Proofs made with it bind to nothing but the
    /// register and commitment.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Wrap raw bytes.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Parse hex. An odd number of digits gets one leading `0` nibble,
    /// so `"abc"` is the two bytes `0a bc`.
    ///
    /// # Errors
    ///
    /// [`SeedelfError::MalformedContext`] for non-hex input.
    pub fn from_hex(input: &str) -> Result<Self> {
        let input = input.trim();
        let decoded = if input.len() % 2 == 1 {
            hex::decode(format!("0{input}"))
        } else {
            hex::decode(input)
        };
        decoded
            .map(Self)
            .map_err(|e| SeedelfError::MalformedContext(e.to_string()))
    }

    /// The raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Lowercase hex of the bytes.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

/// Raw BLAKE2b-224 over the concatenation of `parts`.
pub fn challenge_digest(parts: &[&[u8]]) -> [u8; CHALLENGE_DIGEST_LENGTH] {
    blake2b_224_multi(parts)
}

/// Derive the challenge scalar for `(G, R, U, context)`.
pub fn challenge(
    g: &GroupElement,
    r: &GroupElement,
    u: &GroupElement,
    context: &ChallengeContext,
) -> Scalar {
    let digest = challenge_digest(&[
        &encode_point(g),
        &encode_point(r),
        &encode_point(u),
        context.as_bytes(),
    ]);
    // Below r by construction, so this never actually reduces.
    Scalar::from_be_bytes_mod_order(&digest)
}
