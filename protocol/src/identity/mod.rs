//! # Identity Module
//!
//! One secret, unlimited addresses. A seedelf identity is a scalar `x` and
//! the register `(G, x·G)`; every address it ever receives at is a
//! rerandomized copy `(d·G, d·x·G)` that nobody but the holder of `x` can
//! connect back to it.
//!
//! 1. **keypair** — [`Identity`]: the secret and its canonical register.
//! 2. **register** — [`Register`]: public pairs, rerandomization and the
//!    ownership check.

pub mod keypair;
pub mod register;

pub use keypair::{generate_identity, Identity};
pub use register::{rerandomize, Register, StealthCommitment};
