//! # Hashing Utilities
//!
//! Two hash families, each with one job:
//!
//! - **BLAKE2b** — the chain's native hash. BLAKE2b-224 drives the
//!   Fiat-Shamir challenge because it is what the on-chain validator can
//!   compute, and 224 bits happens to sit comfortably below the 255-bit
//!   scalar modulus.
//!
//! - **BLAKE3** — strictly off-chain. Used as the key derivation function
//!   for sealed messages, where nobody on chain ever has to recompute it.
//!
//! Multi-part variants feed slices straight into the hasher so callers can
//! hash `G ‖ R ‖ U ‖ context` without building the concatenation first.

use blake2b_simd::Params;

use crate::config::CHALLENGE_DIGEST_LENGTH;

/// BLAKE2b-224 of the concatenation of `parts`.
///
/// # Example
///
/// ```
/// use seedelf_protocol::crypto::hash::blake2b_224_multi;
///
/// let whole = blake2b_224_multi(&[b"seed", b"elf"]);
/// let joined = blake2b_224_multi(&[b"seedelf"]);
/// assert_eq!(whole, joined);
/// ```
pub fn blake2b_224_multi(parts: &[&[u8]]) -> [u8; CHALLENGE_DIGEST_LENGTH] {
    let mut state = Params::new().hash_length(CHALLENGE_DIGEST_LENGTH).to_state();
    for part in parts {
        state.update(part);
    }
    let mut out = [0u8; CHALLENGE_DIGEST_LENGTH];
    out.copy_from_slice(state.finalize().as_bytes());
    out
}

/// BLAKE2b-224 of `data`.
pub fn blake2b_224(data: &[u8]) -> [u8; CHALLENGE_DIGEST_LENGTH] {
    blake2b_224_multi(&[data])
}

/// Derive a 32-byte key from `parts` under a BLAKE3 `derive_key` context.
///
/// The context string picks a different internal IV, so keys derived for
/// one purpose never collide with keys derived for another even from the
/// same input material.
pub fn derive_key(context: &str, parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new_derive_key(context);
    for part in parts {
        hasher.update(part);
    }
    *hasher.finalize().as_bytes()
}
