//! # Sealed Messages to a Register
//!
//! Lets anyone encrypt a short note to the owner of a register `(g, u)`
//! without knowing who that owner is. Hashed ElGamal-style ECIES on G1 with
//! AES-256-GCM as the data encapsulation:
//!
//! ```text
//! sender:  d ← nonzero scalar
//!          R = d·g,  S = d·u                 (S = d·x·g)
//!          k = BLAKE3-derive_key(ctx, S ‖ R)
//!          c = AES-256-GCM(k, nonce, msg, aad = g ‖ u ‖ R)
//! owner:   S = x·R,  same k, open c
//! ```
//!
//! Only `R` and `nonce ‖ c` travel. Binding `g ‖ u ‖ R` into the AAD means a
//! sealed message cannot be lifted onto another register or another `R`.
//!
//! ## Nonce management
//!
//! Every message gets a fresh `d`, hence a fresh key, so the random 96-bit
//! GCM nonce never meets the same key twice in practice. It is still random
//! rather than fixed so that an accidental `d` reuse does not degrade into
//! a two-time pad.
//!
//! ## Not for me vs. broken
//!
//! [`SealedMessage::open`] returns `Ok(None)` when authentication fails,
//! which is what a wallet sees when it tries a message addressed to someone
//! else. Malformed hex, a bad `R` or a truncated blob are `Err`.

use aes_gcm::{
    aead::{Aead, KeyInit, Payload},
    Aes256Gcm, Nonce,
};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::config::{AES_KEY_LENGTH, AES_NONCE_LENGTH, ECIES_KDF_CONTEXT, POINT_LENGTH};
use crate::crypto::group::{decode_point_hex, encode_point, encode_point_hex, scalar_mul};
use crate::crypto::hash::derive_key;
use crate::crypto::scalar::{sample_nonzero_scalar_with, Scalar};
use crate::error::{Result, SeedelfError};
use crate::identity::register::Register;

/// AES-GCM authentication tag length in bytes.
pub const AES_TAG_LENGTH: usize = 16;

/// An encrypted note: the ephemeral point `R` and `nonce ‖ ciphertext`,
/// both hex.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealedMessage {
    /// `R = d·g`, compressed hex.
    pub r_hex: String,
    /// `nonce ‖ ciphertext ‖ tag`, hex.
    pub c_hex: String,
}

impl SealedMessage {
    /// Seal `message` to the owner of `recipient`.
    ///
    /// # Errors
    ///
    /// * [`SeedelfError::InvalidCurvePoint`] for a degenerate register.
    /// * [`SeedelfError::EntropyUnavailable`] if the OS RNG fails.
    pub fn seal(message: &str, recipient: &Register) -> Result<Self> {
        Self::seal_with(&mut OsRng, message, recipient)
    }

    /// [`SealedMessage::seal`] with a caller-supplied RNG.
    pub fn seal_with<R: RngCore + ?Sized>(
        rng: &mut R,
        message: &str,
        recipient: &Register,
    ) -> Result<Self> {
        if !recipient.is_valid() {
            return Err(SeedelfError::InvalidCurvePoint(
                "cannot seal to a register with an identity point".into(),
            ));
        }

        let mut d = sample_nonzero_scalar_with(rng)?;
        let r = scalar_mul(&recipient.generator, &d);
        let s = scalar_mul(&recipient.public_value, &d);
        d.zeroize();

        let r_bytes = encode_point(&r);
        let mut key = session_key(&encode_point(&s), &r_bytes);
        let aad = associated_data(recipient, &r_bytes);

        let mut nonce = [0u8; AES_NONCE_LENGTH];
        rng.try_fill_bytes(&mut nonce)
            .map_err(|e| SeedelfError::EntropyUnavailable(e.to_string()))?;

        let sealed = encrypt_with_aad(&key, &nonce, message.as_bytes(), &aad);
        key.zeroize();
        let ciphertext = sealed?;

        let mut blob = Vec::with_capacity(AES_NONCE_LENGTH + ciphertext.len());
        blob.extend_from_slice(&nonce);
        blob.extend_from_slice(&ciphertext);

        Ok(Self {
            r_hex: encode_point_hex(&r),
            c_hex: hex::encode(blob),
        })
    }

    /// Try to open with the owner's secret.
    ///
    /// Returns `Ok(Some(text))` on success and `Ok(None)` when the message
    /// was not sealed to `recipient` under `secret` (or was tampered with).
    ///
    /// # Errors
    ///
    /// * [`SeedelfError::InvalidCurvePoint`] for a bad `R`.
    /// * [`SeedelfError::MalformedRecord`] for bad hex.
    /// * [`SeedelfError::EncryptionFailed`] for a truncated blob or a
    ///   plaintext that is not UTF-8.
    pub fn open(&self, secret: &Scalar, recipient: &Register) -> Result<Option<String>> {
        let r = decode_point_hex(&self.r_hex)?;
        let blob = hex::decode(self.c_hex.trim())?;
        if blob.len() < AES_NONCE_LENGTH + AES_TAG_LENGTH {
            return Err(SeedelfError::EncryptionFailed("ciphertext too short".into()));
        }
        let (nonce, ciphertext) = blob.split_at(AES_NONCE_LENGTH);
        let mut nonce_bytes = [0u8; AES_NONCE_LENGTH];
        nonce_bytes.copy_from_slice(nonce);

        let r_bytes = encode_point(&r);
        let s = scalar_mul(&r, secret);
        let mut key = session_key(&encode_point(&s), &r_bytes);
        let aad = associated_data(recipient, &r_bytes);

        let opened = decrypt_with_aad(&key, &nonce_bytes, ciphertext, &aad);
        key.zeroize();

        match opened {
            Ok(plaintext) => String::from_utf8(plaintext)
                .map(Some)
                .map_err(|_| SeedelfError::EncryptionFailed("plaintext is not UTF-8".into())),
            Err(_) => Ok(None),
        }
    }
}

fn session_key(shared: &[u8; POINT_LENGTH], r: &[u8; POINT_LENGTH]) -> [u8; AES_KEY_LENGTH] {
    derive_key(ECIES_KDF_CONTEXT, &[shared, r])
}

fn associated_data(recipient: &Register, r: &[u8; POINT_LENGTH]) -> Vec<u8> {
    let mut aad = Vec::with_capacity(3 * POINT_LENGTH);
    aad.extend_from_slice(&encode_point(&recipient.generator));
    aad.extend_from_slice(&encode_point(&recipient.public_value));
    aad.extend_from_slice(r);
    aad
}

// ---------------------------------------------------------------------------
// AEAD building blocks
// ---------------------------------------------------------------------------

/// AES-256-GCM encrypt with associated data. Returns `ciphertext ‖ tag`.
///
/// The AAD is authenticated but not encrypted, and must be supplied again
/// verbatim at decryption time.
pub fn encrypt_with_aad(
    key: &[u8; AES_KEY_LENGTH],
    nonce: &[u8; AES_NONCE_LENGTH],
    plaintext: &[u8],
    aad: &[u8],
) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|_| SeedelfError::EncryptionFailed("bad key length".into()))?;
    cipher
        .encrypt(
            Nonce::from_slice(nonce),
            Payload {
                msg: plaintext,
                aad,
            },
        )
        .map_err(|_| SeedelfError::EncryptionFailed("encryption failed".into()))
}

/// AES-256-GCM decrypt with associated data.
///
/// Wrong key, wrong AAD and a modified ciphertext all produce the same
/// error. Telling them apart would only help an attacker.
pub fn decrypt_with_aad(
    key: &[u8; AES_KEY_LENGTH],
    nonce: &[u8; AES_NONCE_LENGTH],
    ciphertext: &[u8],
    aad: &[u8],
) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|_| SeedelfError::EncryptionFailed("bad key length".into()))?;
    cipher
        .decrypt(
            Nonce::from_slice(nonce),
            Payload {
                msg: ciphertext,
                aad,
            },
        )
        .map_err(|_| SeedelfError::EncryptionFailed("authentication failed".into()))
}
