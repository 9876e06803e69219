//! # Group Arithmetic over BLS12-381 G1
//!
//! A thin adapter over arkworks so the rest of the crate only speaks in
//! terms of "a group element", "a scalar" and "48 bytes on the wire".
//!
//! Points are held in projective form ([`GroupElement`]) because every
//! operation here is either a scalar multiplication or an addition, and
//! projective coordinates skip the field inversion those would otherwise
//! need. Conversion to affine only happens at the encoding boundary.
//!
//! The wire format is the 48-byte compressed zcash/IETF encoding: big-endian
//! `x`, with the compression, infinity and `y`-sign flags in the top three
//! bits of the first byte. This is the same encoding the chain's BLS12-381
//! builtins consume, so a point we emit is a point the validator can read.
//!
//! Decoding validates both that the point is on the curve and that it lies
//! in the prime-order subgroup. A small-subgroup point smuggled into a
//! register or a proof would otherwise let an attacker play games with the
//! verification equation.

use ark_bls12_381::{G1Affine, G1Projective};
use ark_ec::{AffineRepr, CurveGroup, Group};
use ark_ff::Zero;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};

use crate::config::POINT_LENGTH;
use crate::crypto::scalar::Scalar;
use crate::error::{Result, SeedelfError};

/// A point of the BLS12-381 G1 prime-order subgroup.
pub type GroupElement = G1Projective;

const INFINITY_FLAG: u8 = 0x40;
const IDENTITY_PREFIX: u8 = 0xc0;

/// The standard G1 generator.
pub fn generator() -> GroupElement {
    G1Projective::generator()
}

/// The identity element (point at infinity).
pub fn identity() -> GroupElement {
    G1Projective::zero()
}

/// Whether `point` is the identity element.
pub fn is_identity(point: &GroupElement) -> bool {
    point.is_zero()
}

/// `k·P`.
pub fn scalar_mul(point: &GroupElement, k: &Scalar) -> GroupElement {
    *point * k
}

/// `P + Q`.
pub fn add(p: &GroupElement, q: &GroupElement) -> GroupElement {
    *p + q
}

/// `-P`.
pub fn negate(point: &GroupElement) -> GroupElement {
    -*point
}

/// Encode a point in the 48-byte compressed form.
pub fn encode_point(point: &GroupElement) -> [u8; POINT_LENGTH] {
    let mut out = [0u8; POINT_LENGTH];
    point
        .into_affine()
        .serialize_compressed(&mut out[..])
        .expect("compressed G1 serialization always fits in 48 bytes");
    out
}

/// Lowercase hex of [`encode_point`].
pub fn encode_point_hex(point: &GroupElement) -> String {
    hex::encode(encode_point(point))
}

/// Decode a compressed point, checking curve and subgroup membership.
///
/// # Errors
///
/// [`SeedelfError::InvalidCurvePoint`] if the input is not exactly 48 bytes,
/// has inconsistent flag bits, has an `x` with no matching `y`, or decodes
/// to a point outside the prime-order subgroup.
pub fn decode_point(bytes: &[u8]) -> Result<GroupElement> {
    if bytes.len() != POINT_LENGTH {
        return Err(SeedelfError::InvalidCurvePoint(format!(
            "expected {POINT_LENGTH} bytes, got {}",
            bytes.len()
        )));
    }

    // arkworks ignores everything after an infinity flag; the chain does not.
    let canonical_identity = bytes[0] == IDENTITY_PREFIX && bytes[1..].iter().all(|&b| b == 0);
    if bytes[0] & INFINITY_FLAG != 0 && !canonical_identity {
        return Err(SeedelfError::InvalidCurvePoint(
            "non-canonical identity encoding".into(),
        ));
    }

    let affine = G1Affine::deserialize_compressed(bytes)
        .map_err(|e| SeedelfError::InvalidCurvePoint(e.to_string()))?;
    Ok(affine.into_group())
}

/// Decode a hex point. Case-insensitive.
pub fn decode_point_hex(input: &str) -> Result<GroupElement> {
    let bytes = hex::decode(input.trim())
        .map_err(|e| SeedelfError::InvalidCurvePoint(format!("invalid hex: {e}")))?;
    decode_point(&bytes)
}

/// Serde adapter that writes a [`GroupElement`] as compressed hex and
/// validates it on the way back in. Use with `#[serde(with = "point_hex")]`.
pub mod point_hex {
    use super::{decode_point_hex, encode_point_hex, GroupElement};
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        point: &GroupElement,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&encode_point_hex(point))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<GroupElement, D::Error> {
        let s = String::deserialize(deserializer)?;
        decode_point_hex(&s).map_err(D::Error::custom)
    }
}
