//! # Protocol Configuration & Constants
//!
//! Every magic number in seedelf lives here. These values are part of the
//! wire contract with the on-chain validator: a register datum, a spend
//! redeemer and a Fiat-Shamir challenge produced with different constants
//! simply will not verify on chain. Changing any of them is a protocol
//! version bump, not a refactor.

// ---------------------------------------------------------------------------
// Curve Parameters
// ---------------------------------------------------------------------------

/// Compressed G1 point length in bytes (zcash/IETF encoding).
pub const POINT_LENGTH: usize = 48;

/// Scalar length in bytes when stored at fixed width.
pub const SCALAR_LENGTH: usize = 32;

/// Bit width of the scalar field modulus `r`.
pub const SCALAR_MODULUS_BITS: u32 = 255;

/// Default sampling width for secrets, nonces and randomizers.
///
/// Sampling the full modulus width with rejection is the only setting that
/// is uniform on `[0, r)`. The old 254-bit parameter only ever produced
/// values below `2^254`.
pub const DEFAULT_SCALAR_BITS: u32 = SCALAR_MODULUS_BITS;

/// Widest sampling width accepted by [`crate::crypto::scalar::sample_scalar`].
/// Anything wider only burns entropy on rejections.
pub const MAX_SCALAR_BITS: u32 = 256;

/// Compressed encoding of the standard G1 generator, as hex. Every fresh
/// register starts from this point.
pub const G1_GENERATOR_HEX: &str = "97f1d3a73197d7942695638c4fa9ac0fc3688c4f9774b905a14e3a3f171bac586c55e83ff97a1aeffb3af00adb22c6bb";

// ---------------------------------------------------------------------------
// Fiat-Shamir
// ---------------------------------------------------------------------------

/// BLAKE2b-224 challenge digest length in bytes. 28 bytes = 224 bits, strictly below the
/// 255-bit scalar modulus, which is why the digest needs no reduction.
pub const CHALLENGE_DIGEST_LENGTH: usize = 28;

// ---------------------------------------------------------------------------
// Wire Records
// ---------------------------------------------------------------------------

/// CBOR tag for constructor 0 of a tagged data record.
pub const CONSTR_0_TAG: u64 = 121;

/// Number of fields in a register datum: `[generator, public_value]`.
pub const REGISTER_FIELDS: usize = 2;

/// Number of fields in a spend redeemer: `[z, g_r, reserved]`.
pub const REDEEMER_FIELDS: usize = 3;

// ---------------------------------------------------------------------------
// Ownership Scanning
// ---------------------------------------------------------------------------

/// How many owned outputs a wallet is willing to pull into one spend.
/// Callers that want everything pass `limit: None` to the scanner.
pub const MAXIMUM_WALLET_OUTPUTS: usize = 20;

/// Commitments per worker below which a parallel scan is not worth the
/// thread spawn.
pub const MIN_COMMITMENTS_PER_WORKER: usize = 64;

// ---------------------------------------------------------------------------
// Sealed messages
// ---------------------------------------------------------------------------

/// AES-256-GCM key length in bytes.
pub const AES_KEY_LENGTH: usize = 32;

/// AES-256-GCM nonce length in bytes.
pub const AES_NONCE_LENGTH: usize = 12;

/// BLAKE3 `derive_key` context for sealed-message keys.
pub const ECIES_KDF_CONTEXT: &str = "seedelf 2026-01-01 ecies bls12-381 aes-256-gcm v1";
