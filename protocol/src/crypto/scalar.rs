//! # Scalar Field Utilities
//!
//! Everything in seedelf that is secret is a scalar of the BLS12-381 scalar
//! field `Fr`, whose order is
//!
//! ```text
//! r = 0x73eda753299d7d483339d80809a1d80553bda402fffe5bfeffffffff00000001
//! ```
//!
//! That is a 255-bit prime. This module samples scalars and moves them in
//! and out of bytes.
//!
//! ## Sampling
//!
//! [`sample_scalar`] draws exactly `bit_length` bits from the CSPRNG and
//! rejects anything `>= r`. It never reduces modulo `r`, because a 256-bit
//! value reduced mod a 255-bit prime lands on the low half of the field
//! almost twice as often as the high half. Rejection costs about one extra
//! draw on average at the full width, which is nothing next to a scalar
//! multiplication.
//!
//! At the default width of 255 bits the output is uniform on `[0, r)`.
//! Narrower widths are accepted and are uniform on `[0, 2^bits)`.
//!
//! ## Encoding
//!
//! On the wire a scalar is big-endian, minimal length, and at least one byte
//! long (zero is `00`). Key storage uses the fixed 32-byte form instead. The
//! decoder accepts both, tolerating leading zero bytes, and refuses anything
//! that is not already reduced.

use ark_bls12_381::Fr;
use ark_ff::{BigInt, BigInteger, PrimeField, Zero};
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroize;

use crate::config::{DEFAULT_SCALAR_BITS, MAX_SCALAR_BITS, SCALAR_LENGTH};
use crate::error::{Result, SeedelfError};

/// A secret or public scalar: an element of the BLS12-381 scalar field.
pub type Scalar = Fr;

// ---------------------------------------------------------------------------
// Sampling
// ---------------------------------------------------------------------------

/// Sample a uniformly random scalar of at most `bit_length` bits from the OS
/// CSPRNG.
///
/// # Arguments
///
/// * `bit_length` — Number of random bits to draw, `1..=256`. Use
///   [`DEFAULT_SCALAR_BITS`] unless you are reproducing a legacy parameter.
///
/// # Errors
///
/// * [`SeedelfError::UnsupportedBitLength`] for a width outside `1..=256`.
/// * [`SeedelfError::EntropyUnavailable`] if the OS RNG fails. There is no
///   fallback source.
pub fn sample_scalar(bit_length: u32) -> Result<Scalar> {
    sample_scalar_with(&mut OsRng, bit_length)
}

/// Same as [`sample_scalar`] but with a caller-supplied RNG.
///
/// Tests and benches pass a seeded `StdRng` here. Production code should go
/// through [`sample_scalar`].
pub fn sample_scalar_with<R: RngCore + ?Sized>(rng: &mut R, bit_length: u32) -> Result<Scalar> {
    if bit_length == 0 || bit_length > MAX_SCALAR_BITS {
        return Err(SeedelfError::UnsupportedBitLength {
            requested: bit_length,
            max: MAX_SCALAR_BITS,
        });
    }

    let byte_len = bit_length.div_ceil(8) as usize;
    let excess_bits = (byte_len as u32) * 8 - bit_length;
    let offset = SCALAR_LENGTH - byte_len;

    let mut buf = [0u8; SCALAR_LENGTH];
    loop {
        rng.try_fill_bytes(&mut buf[offset..])
            .map_err(|e| SeedelfError::EntropyUnavailable(e.to_string()))?;
        buf[offset] &= 0xffu8 >> excess_bits;

        let candidate = scalar_from_be_array(&buf);
        if let Some(scalar) = candidate {
            buf.zeroize();
            return Ok(scalar);
        }
    }
}

/// Sample a nonzero scalar at the default width.
///
/// Secrets, proof nonces and rerandomizers all come from here. Zero would
/// leak a secret (`z = c·x`), reveal the nonce (`R = O`), or collapse a
/// register to the identity point, so it is resampled.
pub fn sample_nonzero_scalar() -> Result<Scalar> {
    sample_nonzero_scalar_with(&mut OsRng)
}

/// [`sample_nonzero_scalar`] with a caller-supplied RNG.
pub fn sample_nonzero_scalar_with<R: RngCore + ?Sized>(rng: &mut R) -> Result<Scalar> {
    loop {
        let scalar = sample_scalar_with(rng, DEFAULT_SCALAR_BITS)?;
        if !scalar.is_zero() {
            return Ok(scalar);
        }
    }
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Encode a scalar as minimal-length big-endian bytes. Zero encodes as a
/// single `0x00` byte.
pub fn encode_scalar(scalar: &Scalar) -> Vec<u8> {
    let fixed = encode_scalar_fixed(scalar);
    let first = fixed
        .iter()
        .position(|&b| b != 0)
        .unwrap_or(SCALAR_LENGTH - 1);
    fixed[first..].to_vec()
}

/// Lowercase, even-length hex of [`encode_scalar`].
pub fn encode_scalar_hex(scalar: &Scalar) -> String {
    hex::encode(encode_scalar(scalar))
}

/// Encode a scalar as exactly 32 big-endian bytes.
pub fn encode_scalar_fixed(scalar: &Scalar) -> [u8; SCALAR_LENGTH] {
    let bytes = scalar.into_bigint().to_bytes_be();
    let mut out = [0u8; SCALAR_LENGTH];
    out[SCALAR_LENGTH - bytes.len()..].copy_from_slice(&bytes);
    out
}

/// Decode big-endian scalar bytes.
///
/// Leading zero bytes are ignored, so both the minimal and the fixed-width
/// forms decode. At most 32 significant bytes are accepted and the value
/// must be strictly below `r`.
///
/// # Errors
///
/// [`SeedelfError::MalformedScalar`] for empty input, more than 32
/// significant bytes, or a value `>= r`.
pub fn decode_scalar(bytes: &[u8]) -> Result<Scalar> {
    if bytes.is_empty() {
        return Err(SeedelfError::MalformedScalar("empty input".into()));
    }

    let first = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    let significant = &bytes[first..];
    if significant.len() > SCALAR_LENGTH {
        return Err(SeedelfError::MalformedScalar(format!(
            "{} significant bytes, at most {SCALAR_LENGTH} allowed",
            significant.len()
        )));
    }

    let mut buf = [0u8; SCALAR_LENGTH];
    buf[SCALAR_LENGTH - significant.len()..].copy_from_slice(significant);
    let scalar = scalar_from_be_array(&buf);
    buf.zeroize();

    scalar.ok_or_else(|| SeedelfError::MalformedScalar("value not below field order".into()))
}

/// Decode a hex scalar. An odd number of digits is read as if it had a
/// leading `0`.
///
/// # Errors
///
/// [`SeedelfError::MalformedScalar`] for empty or non-hex input, plus every
/// failure of [`decode_scalar`].
pub fn decode_scalar_hex(input: &str) -> Result<Scalar> {
    let input = input.trim();
    if input.is_empty() {
        return Err(SeedelfError::MalformedScalar("empty input".into()));
    }

    let bytes = if input.len() % 2 == 1 {
        hex::decode(format!("0{input}"))
    } else {
        hex::decode(input)
    }
    .map_err(|e| SeedelfError::MalformedScalar(format!("invalid hex: {e}")))?;

    decode_scalar(&bytes)
}

/// Serde adapter for scalars as minimal big-endian hex. Use with
/// `#[serde(with = "scalar_hex")]`.
pub mod scalar_hex {
    use super::{decode_scalar_hex, encode_scalar_hex, Scalar};
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(scalar: &Scalar, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&encode_scalar_hex(scalar))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Scalar, D::Error> {
        let s = String::deserialize(deserializer)?;
        decode_scalar_hex(&s).map_err(D::Error::custom)
    }
}

/// Interpret 32 big-endian bytes as a field element, or `None` if the value
/// is not below `r`.
fn scalar_from_be_array(bytes: &[u8; SCALAR_LENGTH]) -> Option<Scalar> {
    let mut limbs = [0u64; 4];
    for (i, limb) in limbs.iter_mut().enumerate() {
        let end = SCALAR_LENGTH - i * 8;
        let mut word = [0u8; 8];
        word.copy_from_slice(&bytes[end - 8..end]);
        *limb = u64::from_be_bytes(word);
    }
    Fr::from_bigint(BigInt::new(limbs))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
