//! # Spend Proof Generation
//!
//! A Schnorr proof of knowledge of `x` such that `U = x·G`, made
//! non-interactive with the Fiat-Shamir challenge from
//! [`super::challenge`]:
//!
//! ```text
//! r ← random nonzero scalar        (nonce)
//! R = r·G                          (commitment)
//! c = H(G ‖ R ‖ U ‖ context)       (challenge)
//! z = r + c·x  mod q               (response)
//! proof = (z, R)
//! ```
//!
//! The protocol steps are modeled as a small typestate so the nonce can
//! only be consumed once: [`Committed`] owns `r`, turns into a
//! [`Challenged`] once the context is fixed, and the response step consumes
//! it. Reusing a nonce across two challenges leaks `x` with one
//! subtraction, so there is no way to clone either state.

use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use ark_ff::Zero;

use crate::crypto::group::{point_hex, scalar_mul, GroupElement};
use crate::crypto::scalar::{sample_nonzero_scalar_with, scalar_hex, Scalar};
use crate::error::{Result, SeedelfError};
use crate::identity::register::Register;
use crate::zkp::challenge::{challenge, ChallengeContext};

/// A spend proof `(z, R)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proof {
    /// Response `z = r + c·x`.
    #[serde(with = "scalar_hex")]
    pub z: Scalar,
    /// Commitment `R = r·G`.
    #[serde(with = "point_hex")]
    pub commitment: GroupElement,
}

// ---------------------------------------------------------------------------
// Protocol states
// ---------------------------------------------------------------------------

/// First move: the nonce is chosen and `R = r·G` is fixed.
pub struct Committed {
    nonce: Scalar,
    generator: GroupElement,
    public_value: GroupElement,
    commitment: GroupElement,
}

/// Second move: the challenge has been derived from the transcript.
pub struct Challenged {
    nonce: Scalar,
    commitment: GroupElement,
    challenge: Scalar,
}

impl Committed {
    /// Commit with a fresh nonce from `rng`.
    pub fn new<R: RngCore + ?Sized>(
        rng: &mut R,
        generator: &GroupElement,
        public_value: &GroupElement,
    ) -> Result<Self> {
        let nonce = sample_nonzero_scalar_with(rng)?;
        Self::with_nonce(nonce, generator, public_value)
    }

    /// Commit with a caller-chosen nonce.
    pub fn with_nonce(
        nonce: Scalar,
        generator: &GroupElement,
        public_value: &GroupElement,
    ) -> Result<Self> {
        if nonce.is_zero() {
            return Err(SeedelfError::MalformedScalar("proof nonce must be nonzero".into()));
        }
        Ok(Self {
            nonce,
            generator: *generator,
            public_value: *public_value,
            commitment: scalar_mul(generator, &nonce),
        })
    }

    /// The commitment `R`.
    pub fn commitment(&self) -> &GroupElement {
        &self.commitment
    }

    /// Fix the context and derive the challenge.
    pub fn challenge(self, context: &ChallengeContext) -> Challenged {
        let c = challenge(
            &self.generator,
            &self.commitment,
            &self.public_value,
            context,
        );
        Challenged {
            nonce: self.nonce,
            commitment: self.commitment,
            challenge: c,
        }
    }
}

impl Challenged {
    /// The challenge `c`.
    pub fn challenge(&self) -> &Scalar {
        &self.challenge
    }

    /// Answer the challenge with the secret and finish the proof.
    pub fn respond(self, secret: &Scalar) -> Proof {
        Proof {
            z: self.nonce + self.challenge * secret,
            commitment: self.commitment,
        }
    }
}

impl Drop for Committed {
    fn drop(&mut self) {
        self.nonce.zeroize();
    }
}

impl Drop for Challenged {
    fn drop(&mut self) {
        self.nonce.zeroize();
    }
}

// ---------------------------------------------------------------------------
// One-shot API
// ---------------------------------------------------------------------------

/// Prove knowledge of `secret` with `public_value = secret·generator`,
/// bound to `context`.
///
/// If `secret` does not actually own the pair the call still succeeds; the
/// resulting proof simply fails verification.
///
/// # Errors
///
/// [`SeedelfError::EntropyUnavailable`] if no nonce could be sampled.
pub fn create_proof(
    secret: &Scalar,
    generator: &GroupElement,
    public_value: &GroupElement,
    context: &ChallengeContext,
) -> Result<Proof> {
    create_proof_with_rng(&mut OsRng, secret, generator, public_value, context)
}

/// [`create_proof`] with a caller-supplied RNG for the nonce.
pub fn create_proof_with_rng<R: RngCore + ?Sized>(
    rng: &mut R,
    secret: &Scalar,
    generator: &GroupElement,
    public_value: &GroupElement,
    context: &ChallengeContext,
) -> Result<Proof> {
    let proof = Committed::new(rng, generator, public_value)?
        .challenge(context)
        .respond(secret);
    tracing::debug!(context_len = context.as_bytes().len(), "spend proof created");
    Ok(proof)
}

/// [`create_proof`] with a caller-chosen nonce.
///
/// **Never reuse a nonce.** Two proofs under the same nonce and different
/// challenges reveal the secret. This exists for reproducible vectors and
/// benchmarks.
pub fn create_proof_with_nonce(
    secret: &Scalar,
    generator: &GroupElement,
    public_value: &GroupElement,
    context: &ChallengeContext,
    nonce: Scalar,
) -> Result<Proof> {
    Ok(Committed::with_nonce(nonce, generator, public_value)?
        .challenge(context)
        .respond(secret))
}

/// Prove ownership of a register.
pub fn prove_register(
    secret: &Scalar,
    register: &Register,
    context: &ChallengeContext,
) -> Result<Proof> {
    create_proof(secret, &register.generator, &register.public_value, context)
}
