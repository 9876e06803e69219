//! Error types for the seedelf protocol core.
//!
//! Every fallible operation in this crate returns a [`SeedelfError`]. The
//! variants are deliberately coarse: a message like "scalar out of range"
//! is useful to a developer, while "scalar 0x1c3f… out of range" is useful
//! to an attacker. Secret material never ends up in an error string.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, SeedelfError>;

/// Errors that can occur anywhere in the protocol core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeedelfError {
    /// Scalar bytes were empty, not hex, too long, or not below the field
    /// order.
    #[error("malformed scalar: {0}")]
    MalformedScalar(String),

    /// Bytes did not decode to a point of the prime-order G1 subgroup.
    #[error("invalid curve point: {0}")]
    InvalidCurvePoint(String),

    /// A randomizer of zero would collapse a register to the identity.
    #[error("invalid randomizer: zero is not allowed")]
    InvalidRandomizer,

    /// A spend proof failed the verification equation.
    #[error("proof rejected")]
    ProofRejected,

    /// The operating system RNG could not produce bytes. There is no
    /// fallback source.
    #[error("entropy source unavailable: {0}")]
    EntropyUnavailable(String),

    /// Requested sampling width is outside the supported range.
    #[error("unsupported bit length {requested}: expected 1..={max}")]
    UnsupportedBitLength {
        /// The width the caller asked for.
        requested: u32,
        /// The widest width we support.
        max: u32,
    },

    /// Challenge context was not valid hex.
    #[error("malformed challenge context: {0}")]
    MalformedContext(String),

    /// A wire record (CBOR or JSON data) did not have the expected shape.
    #[error("malformed record: {0}")]
    MalformedRecord(String),

    /// Sealing or opening a message failed for a reason other than "this
    /// message is not for you".
    #[error("encryption failed: {0}")]
    EncryptionFailed(String),
}

impl From<hex::FromHexError> for SeedelfError {
    fn from(err: hex::FromHexError) -> Self {
        SeedelfError::MalformedRecord(format!("invalid hex: {err}"))
    }
}

impl From<serde_json::Error> for SeedelfError {
    fn from(err: serde_json::Error) -> Self {
        SeedelfError::MalformedRecord(format!("invalid json: {err}"))
    }
}
