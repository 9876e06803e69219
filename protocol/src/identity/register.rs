//! # Registers and Rerandomization
//!
//! A register is the public half of a seedelf identity: a pair of points
//! `(G', U')` with the hidden relation `U' = x·G'`. The canonical register
//! of an identity is `(G, x·G)`. Everything that goes on chain is a
//! rerandomized copy of it:
//!
//! ```text
//! (G', U') = (d·G, d·x·G)      for a fresh nonzero d
//! ```
//!
//! Anyone can rerandomize any register, so a sender can mint a fresh,
//! unlinkable address for the recipient without the recipient being online.
//! Only the holder of `x` can tell which registers are theirs, by checking
//! `x·G' == U'`.
//!
//! A register where either point is the identity element is malformed: it
//! satisfies `x·O == O` for every `x`, so it would look "owned" by everyone.

use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::crypto::group::{
    decode_point_hex, encode_point_hex, is_identity, point_hex, scalar_mul, GroupElement,
};
use crate::crypto::scalar::{sample_nonzero_scalar_with, Scalar};
use crate::error::{Result, SeedelfError};
use ark_ff::Zero;

/// A public register `(G', U')`, also called a stealth commitment once it
/// has been rerandomized and published.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Register {
    /// The base point `G'`.
    #[serde(with = "point_hex")]
    pub generator: GroupElement,
    /// The public value `U' = x·G'`.
    #[serde(with = "point_hex")]
    pub public_value: GroupElement,
}

/// A register as it appears on chain. Same data, different role.
pub type StealthCommitment = Register;

impl Register {
    /// Wrap two points. No validation; see [`Register::is_valid`].
    pub fn new(generator: GroupElement, public_value: GroupElement) -> Self {
        Self {
            generator,
            public_value,
        }
    }

    /// Decode a register from the two compressed hex points.
    pub fn from_hex(generator: &str, public_value: &str) -> Result<Self> {
        Ok(Self::new(
            decode_point_hex(generator)?,
            decode_point_hex(public_value)?,
        ))
    }

    /// Compressed hex of `G'`.
    pub fn generator_hex(&self) -> String {
        encode_point_hex(&self.generator)
    }

    /// Compressed hex of `U'`.
    pub fn public_value_hex(&self) -> String {
        encode_point_hex(&self.public_value)
    }

    /// Rerandomize with a caller-chosen `d`. See [`rerandomize`].
    pub fn rerandomize(&self, d: &Scalar) -> Result<Self> {
        let (generator, public_value) = rerandomize(&self.generator, &self.public_value, d)?;
        Ok(Self::new(generator, public_value))
    }

    /// Rerandomize with a fresh nonzero `d` from the OS RNG.
    pub fn rerandomize_random(&self) -> Result<Self> {
        self.rerandomize_random_with(&mut OsRng)
    }

    /// [`Register::rerandomize_random`] with a caller-supplied RNG.
    pub fn rerandomize_random_with<R: RngCore + ?Sized>(&self, rng: &mut R) -> Result<Self> {
        let d = sample_nonzero_scalar_with(rng)?;
        self.rerandomize(&d)
    }

    /// Whether `secret` owns this register, i.e. `secret·G' == U'`.
    ///
    /// Always `false` for a malformed register.
    pub fn is_owned(&self, secret: &Scalar) -> bool {
        self.is_valid() && scalar_mul(&self.generator, secret) == self.public_value
    }

    /// Neither point is the identity element.
    pub fn is_valid(&self) -> bool {
        !is_identity(&self.generator) && !is_identity(&self.public_value)
    }
}

/// Rerandomize a register: `(A, B) ↦ (d·A, d·B)`.
///
/// Preserves ownership: if `B = x·A` then `d·B = x·(d·A)`.
///
/// # Errors
///
/// [`SeedelfError::InvalidRandomizer`] when `d` is zero.
pub fn rerandomize(
    a: &GroupElement,
    b: &GroupElement,
    d: &Scalar,
) -> Result<(GroupElement, GroupElement)> {
    if d.is_zero() {
        return Err(SeedelfError::InvalidRandomizer);
    }
    Ok((scalar_mul(a, d), scalar_mul(b, d)))
}
