//! # Zero-Knowledge Spend Proofs
//!
//! Spending a seedelf output means proving you know the `x` behind its
//! register `(G, U)` without revealing it. This module is a plain Schnorr
//! proof of discrete-log knowledge, made non-interactive with Fiat-Shamir
//! and bound to the spending transaction through the challenge context.
//!
//! ```text
//! challenge.rs — Fiat-Shamir challenge over (G, R, U, context)
//! prover.rs    — nonce, commitment, response; the Proof type
//! verifier.rs  — z·G == R + c·U, with c always recomputed
//! ```
//!
//! ## Security Model
//!
//! - **Completeness**: an honest prover with `U = x·G` is always accepted.
//! - **Soundness**: special soundness of Schnorr plus the random-oracle
//!   model for BLAKE2b-224. Two accepting proofs with the same `R` and
//!   different challenges extract `x`.
//! - **Zero knowledge**: honest-verifier ZK, simulated by programming the
//!   random oracle. `(z, R)` reveals nothing about `x` beyond `U = x·G`.
//! - **Binding**: the context is hashed into `c`, so a proof for one
//!   transaction is useless for any other.

pub mod challenge;
pub mod prover;
pub mod verifier;

pub use challenge::{challenge, challenge_digest, ChallengeContext};
pub use prover::{
    create_proof, create_proof_with_nonce, create_proof_with_rng, prove_register, Proof,
};
pub use verifier::{verify, verify_hex, verify_proof, verify_register};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::keypair::Identity;
    use ark_std::rand::{rngs::StdRng, SeedableRng};

    /// Identity -> fresh register -> prove -> verify.
    #[test]
    fn end_to_end_spend_proof() {
        let mut rng = StdRng::seed_from_u64(42);

        let id = Identity::generate_with(&mut rng).unwrap();
        let reg = id.register().rerandomize_random_with(&mut rng).unwrap();
        let ctx = ChallengeContext::from_hex("deadbeef").unwrap();

        let proof = create_proof_with_rng(
            &mut rng,
            id.secret(),
            &reg.generator,
            &reg.public_value,
            &ctx,
        )
        .expect("proof generation must succeed");

        assert!(
            verify_register(&reg, &proof, &ctx).is_ok(),
            "valid proof must verify"
        );
    }

    /// A proof replayed under another transaction context must not verify.
    #[test]
    fn proof_does_not_transfer_between_contexts() {
        let mut rng = StdRng::seed_from_u64(43);
        let id = Identity::generate_with(&mut rng).unwrap();
        let reg = *id.register();

        let proof =
            prove_register(id.secret(), &reg, &ChallengeContext::from_bytes(vec![1])).unwrap();
        assert!(
            verify_register(&reg, &proof, &ChallengeContext::from_bytes(vec![2])).is_err(),
            "replayed proof must be rejected"
        );
    }
}
