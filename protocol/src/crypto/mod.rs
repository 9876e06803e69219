//! # Cryptographic Primitives for seedelf
//!
//! Everything the protocol does bottoms out in four modules:
//!
//! - **scalar** — the BLS12-381 scalar field: sampling and byte encoding.
//! - **group** — BLS12-381 G1: arithmetic and the 48-byte point encoding.
//! - **hash** — BLAKE2b-224 for anything the chain must recompute,
//!   BLAKE3 for off-chain key derivation.
//! - **encryption** — sealed notes to a register (ECIES with AES-256-GCM).
//!
//! ## A note on "rolling your own crypto"
//!
//! We don't. The curve, the field, the hashes and the cipher are all
//! arkworks and RustCrypto. What lives here is glue: encodings that have to
//! match the chain byte for byte, and sampling that has to be unbiased.

pub mod encryption;
pub mod group;
pub mod hash;
pub mod scalar;

pub use encryption::SealedMessage;
pub use group::{
    add, decode_point, decode_point_hex, encode_point, encode_point_hex, generator, identity,
    negate, scalar_mul, GroupElement,
};
pub use hash::blake2b_224;
pub use scalar::{
    decode_scalar, decode_scalar_hex, encode_scalar, encode_scalar_fixed, encode_scalar_hex,
    sample_nonzero_scalar, sample_scalar, Scalar,
};
