//! # Identity Key Material
//!
//! A seedelf identity is one long-term secret scalar `x` plus its canonical
//! register `(G, x·G)`. There is no address derivation tree and no chain
//! code: every on-chain address of the holder is a rerandomization of that
//! one register, and the one secret both recognizes and spends all of them.
//!
//! ## Handling the secret
//!
//! - The scalar is zeroized when the [`Identity`] is dropped.
//! - `Debug` prints the public register only.
//! - `Identity` is not `Serialize`. Exporting a secret is done on purpose
//!   through [`Identity::secret_hex`], never by accident through a JSON
//!   response.
//!
//! None of this survives a determined attacker with a memory dump, but it
//! keeps secrets out of logs, panics and core files in the common case.

use std::fmt;

use ark_ff::Zero;
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroize;

use crate::crypto::group::{generator, scalar_mul};
use crate::crypto::scalar::{
    decode_scalar_hex, encode_scalar_fixed, sample_nonzero_scalar_with, Scalar,
};
use crate::error::{Result, SeedelfError};
use crate::identity::register::Register;

/// A holder's secret scalar and canonical register.
pub struct Identity {
    secret: Scalar,
    register: Register,
}

impl Identity {
    /// Generate a fresh identity from the OS RNG.
    ///
    /// # Errors
    ///
    /// [`SeedelfError::EntropyUnavailable`] if the OS RNG fails.
    pub fn generate() -> Result<Self> {
        Self::generate_with(&mut OsRng)
    }

    /// Generate an identity from a caller-supplied RNG.
    pub fn generate_with<R: RngCore + ?Sized>(rng: &mut R) -> Result<Self> {
        let secret = sample_nonzero_scalar_with(rng)?;
        Self::from_secret(secret)
    }

    /// Rebuild an identity from its secret.
    ///
    /// # Errors
    ///
    /// [`SeedelfError::MalformedScalar`] for a zero secret, whose register
    /// would be `(G, O)`.
    pub fn from_secret(secret: Scalar) -> Result<Self> {
        if secret.is_zero() {
            return Err(SeedelfError::MalformedScalar("secret must be nonzero".into()));
        }
        let g = generator();
        let register = Register::new(g, scalar_mul(&g, &secret));
        Ok(Self { secret, register })
    }

    /// Rebuild an identity from a hex secret.
    pub fn from_secret_hex(input: &str) -> Result<Self> {
        Self::from_secret(decode_scalar_hex(input)?)
    }

    /// The secret scalar `x`.
    pub fn secret(&self) -> &Scalar {
        &self.secret
    }

    /// The secret as 64 hex digits, for key storage.
    pub fn secret_hex(&self) -> String {
        let mut fixed = encode_scalar_fixed(&self.secret);
        let out = hex::encode(fixed);
        fixed.zeroize();
        out
    }

    /// The canonical register `(G, x·G)`.
    pub fn register(&self) -> &Register {
        &self.register
    }

    /// A fresh unlinkable register for this identity.
    pub fn fresh_register(&self) -> Result<Register> {
        self.register.rerandomize_random()
    }

    /// Whether this identity owns `register`.
    pub fn owns(&self, register: &Register) -> bool {
        register.is_owned(&self.secret)
    }
}

impl Drop for Identity {
    fn drop(&mut self) {
        self.secret.zeroize();
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("secret", &"<redacted>")
            .field("generator", &self.register.generator_hex())
            .field("public_value", &self.register.public_value_hex())
            .finish()
    }
}

/// Generate a fresh identity. Shorthand for [`Identity::generate`].
pub fn generate_identity() -> Result<Identity> {
    Identity::generate()
}
