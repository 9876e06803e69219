//! # Spend Proof Verification
//!
//! Accept a proof `(z, R)` for the register `(G, U)` iff
//!
//! ```text
//! z·G == R + c·U        where c = H(G ‖ R ‖ U ‖ context)
//! ```
//!
//! The verifier always derives `c` itself. A challenge handed in alongside
//! the proof is a challenge the prover got to choose, and a prover who
//! picks `c` can forge `R = z·G - c·U` for any `z` without knowing `x`.
//! [`verify_proof`] takes `c` as an argument only because it is the raw
//! equation; everything a caller should reach for goes through [`verify`].

use crate::crypto::group::{add, decode_point_hex, scalar_mul, GroupElement};
use crate::crypto::scalar::{decode_scalar_hex, Scalar};
use crate::error::{Result, SeedelfError};
use crate::identity::register::Register;
use crate::zkp::challenge::{challenge, ChallengeContext};
use crate::zkp::prover::Proof;

/// The bare verification equation `z·G == R + c·U`.
pub fn verify_proof(
    generator: &GroupElement,
    public_value: &GroupElement,
    commitment: &GroupElement,
    c: &Scalar,
    z: &Scalar,
) -> bool {
    scalar_mul(generator, z) == add(commitment, &scalar_mul(public_value, c))
}

/// Verify a proof against `(generator, public_value)` and `context`.
///
/// A register with an identity point is rejected outright, since the
/// equation holds for every `z` when `G = U = R = O`.
///
/// # Errors
///
/// [`SeedelfError::ProofRejected`] when the proof does not verify.
pub fn verify(
    generator: &GroupElement,
    public_value: &GroupElement,
    proof: &Proof,
    context: &ChallengeContext,
) -> Result<()> {
    if !Register::new(*generator, *public_value).is_valid() {
        tracing::debug!("proof rejected: degenerate register");
        return Err(SeedelfError::ProofRejected);
    }

    let c = challenge(generator, &proof.commitment, public_value, context);
    if verify_proof(generator, public_value, &proof.commitment, &c, &proof.z) {
        Ok(())
    } else {
        tracing::debug!("proof rejected: equation does not hold");
        Err(SeedelfError::ProofRejected)
    }
}

/// Verify a proof against a register.
pub fn verify_register(
    register: &Register,
    proof: &Proof,
    context: &ChallengeContext,
) -> Result<()> {
    verify(&register.generator, &register.public_value, proof, context)
}

/// Verify hex inputs exactly as they travel on the wire.
///
/// Returns `Ok(false)` for a well-formed proof that does not verify and
/// `Err` when any input fails to decode.
///
/// # Errors
///
/// * [`SeedelfError::InvalidCurvePoint`] for a bad `generator`,
///   `public_value` or `commitment`.
/// * [`SeedelfError::MalformedScalar`] for a bad `z`.
/// * [`SeedelfError::MalformedContext`] for a bad `context`.
pub fn verify_hex(
    generator: &str,
    public_value: &str,
    z: &str,
    commitment: &str,
    context: &str,
) -> Result<bool> {
    let g = decode_point_hex(generator)?;
    let u = decode_point_hex(public_value)?;
    let proof = Proof {
        z: decode_scalar_hex(z)?,
        commitment: decode_point_hex(commitment)?,
    };
    let ctx = ChallengeContext::from_hex(context)?;

    match verify(&g, &u, &proof, &ctx) {
        Ok(()) => Ok(true),
        Err(SeedelfError::ProofRejected) => Ok(false),
        Err(other) => Err(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::G1_GENERATOR_HEX;
    use crate::crypto::group::{generator, identity, negate};
    use crate::zkp::prover::{create_proof, create_proof_with_nonce};
    use ark_ff::{One, Zero};

    // Proofs recorded from spends that were accepted on chain.
    const U1: &str = "8AE45D4463406206D4DDD77212FA559FDD26B776B35E238E1ECB2E35ED890797F0CE64C757F70C90E567E81F802352AC";
    const Z1: &str = "6ABFE8229317598960FD20B5A88510EDC4CD03D56D085F82665A01584CF01161";
    const R1: &str = "B8E67784C43E083B7ABCBA10D32066720865105FEFC1F669EF76613E2E4D8BB0D883DA2498C4833B970B949A2C688F81";

    const G2: &str = "8EC0018F7CDDAFFCF3F2F3E2DFE75C3EE3E4F6FB87D62037416EC3037F20323C6823D289D4F31662969D18F373F95D51";
    const U2: &str = "A6AE4DA5029996FF5F9B825D8A1A3E6295ED914389E7E7A40EECE2C111984C3EFBA34F8DC97B2FBFEBAC48AA5829E5AC";
    const Z2: &str = "30156C22A3978DDE6462D8DD7C6EB10B125DCCCD44ECD011E9EC3C08C4E8A546";
    const R2: &str = "94F0F8C17140E92D7F4635F2B8A7FF6038A041CD1B04974CAFA6B668BFA0E0C372B540F4684E69F70AC974028BDA5486";

    #[test]
    fn test_recorded_proof_with_standard_generator() {
        let g = G1_GENERATOR_HEX.to_uppercase();
        assert!(verify_hex(&g, U1, Z1, R1, "ACAB").unwrap());
    }

    #[test]
    fn test_recorded_proof_with_rerandomized_register() {
        assert!(verify_hex(G2, U2, Z2, R2, "ACABFACE").unwrap());
    }

    #[test]
    fn test_recorded_proof_fails_under_other_context() {
        assert!(!verify_hex(G2, U2, Z2, R2, "ACAB").unwrap());
        assert!(!verify_hex(&G1_GENERATOR_HEX.to_uppercase(), U1, Z1, R1, "").unwrap());
    }

    #[test]
    fn test_recorded_proof_fails_for_other_register() {
        assert!(!verify_hex(G2, U1, Z2, R2, "ACABFACE").unwrap());
    }

    #[test]
    fn test_malformed_inputs_are_errors_not_false() {
        assert!(matches!(
            verify_hex("00", U2, Z2, R2, "ACABFACE"),
            Err(SeedelfError::InvalidCurvePoint(_))
        ));
        assert!(matches!(
            verify_hex(G2, U2, "zz", R2, "ACABFACE"),
            Err(SeedelfError::MalformedScalar(_))
        ));
        assert!(matches!(
            verify_hex(G2, U2, Z2, R2, "nothex"),
            Err(SeedelfError::MalformedContext(_))
        ));
    }

    #[test]
    fn test_roundtrip_and_tampering() {
        let x = Scalar::from(18_446_744_073_709_551_606u64);
        let g = generator();
        let u = scalar_mul(&g, &x);
        let ctx = ChallengeContext::from_hex("acab").unwrap();
        let proof = create_proof(&x, &g, &u, &ctx).unwrap();
        assert!(verify(&g, &u, &proof, &ctx).is_ok());

        let bumped = Proof {
            z: proof.z + Scalar::one(),
            ..proof
        };
        assert_eq!(verify(&g, &u, &bumped, &ctx), Err(SeedelfError::ProofRejected));

        let flipped = Proof {
            commitment: negate(&proof.commitment),
            ..proof
        };
        assert_eq!(verify(&g, &u, &flipped, &ctx), Err(SeedelfError::ProofRejected));
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let g = generator();
        let u = scalar_mul(&g, &Scalar::from(10u64));
        let ctx = ChallengeContext::empty();
        let proof = create_proof(&Scalar::from(11u64), &g, &u, &ctx).unwrap();
        assert!(verify(&g, &u, &proof, &ctx).is_err());
    }

    #[test]
    fn test_chosen_challenge_forgery_is_rejected() {
        // With a free choice of c, R = z·G - c·U satisfies the bare equation
        // without knowledge of x. The full verifier recomputes c.
        let g = generator();
        let u = scalar_mul(&g, &Scalar::from(31337u64));
        let z = Scalar::from(5u64);
        let c = Scalar::from(7u64);
        let r = add(&scalar_mul(&g, &z), &negate(&scalar_mul(&u, &c)));
        assert!(verify_proof(&g, &u, &r, &c, &z));

        let forged = Proof { z, commitment: r };
        assert!(verify(&g, &u, &forged, &ChallengeContext::empty()).is_err());
    }

    #[test]
    fn test_degenerate_register_is_rejected() {
        let o = identity();
        let proof = Proof {
            z: Scalar::zero(),
            commitment: o,
        };
        assert!(verify_proof(&o, &o, &o, &Scalar::one(), &Scalar::zero()));
        assert_eq!(
            verify(&o, &o, &proof, &ChallengeContext::empty()),
            Err(SeedelfError::ProofRejected)
        );
    }

    #[test]
    fn test_register_wrapper() {
        let x = Scalar::from(2u64);
        let reg = Register::new(generator(), scalar_mul(&generator(), &x))
            .rerandomize(&Scalar::from(9u64))
            .unwrap();
        let ctx = ChallengeContext::from_bytes(b"tx".to_vec());
        let proof = create_proof_with_nonce(
            &x,
            &reg.generator,
            &reg.public_value,
            &ctx,
            Scalar::from(4u64),
        )
        .unwrap();
        assert!(verify_register(&reg, &proof, &ctx).is_ok());
    }
}
