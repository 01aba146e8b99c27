//! Property-based tests for the invariants the curve arithmetic must
//! hold for arbitrary in-range scalars, in the style of the teacher
//! crate's `proptest`-based arithmetic tests.

use p256_engine::{decode_point, ecdh, encode_compressed, encode_uncompressed, keygen, sign, verify, Scalar};
use proptest::prelude::*;

/// Maps an arbitrary `u64` into a nonzero scalar. Using small integers
/// as the random domain (rather than full 256-bit strings) keeps every
/// generated value trivially in range without a rejection loop.
fn nonzero_scalar() -> impl Strategy<Value = Scalar> {
    (1u64..=u64::MAX).prop_map(|v| {
        let mut bytes = [0u8; 32];
        bytes[24..32].copy_from_slice(&v.to_be_bytes());
        Scalar::from_bytes_checked(&bytes).unwrap()
    })
}

proptest! {
    /// Every signature this crate produces must verify against its own
    /// public key and hash.
    #[test]
    fn sign_verify_round_trips(d in nonzero_scalar(), k in nonzero_scalar(), z in nonzero_scalar()) {
        let q = keygen(&d);
        if let Ok((r, s)) = sign(&d, &k, &z) {
            prop_assert!(verify(&q, &z, &r, &s).is_ok());
        }
    }

    /// A signature must not verify under a different hash.
    #[test]
    fn sign_verify_rejects_mismatched_hash(d in nonzero_scalar(), k in nonzero_scalar(), z in nonzero_scalar(), other_z in nonzero_scalar()) {
        prop_assume!(z.to_bytes() != other_z.to_bytes());
        let q = keygen(&d);
        if let Ok((r, s)) = sign(&d, &k, &z) {
            prop_assert!(verify(&q, &other_z, &r, &s).is_err());
        }
    }

    /// ECDH must agree regardless of which side computes it.
    #[test]
    fn ecdh_is_symmetric(da in nonzero_scalar(), db in nonzero_scalar()) {
        let qa = keygen(&da);
        let qb = keygen(&db);
        let shared_a = ecdh(&da, &qb).unwrap();
        let shared_b = ecdh(&db, &qa).unwrap();
        prop_assert_eq!(shared_a, shared_b);
    }

    /// Every point this crate produces via `keygen` round-trips through
    /// both the uncompressed and compressed SEC1 encodings.
    #[test]
    fn point_encoding_round_trips(d in nonzero_scalar()) {
        let q = keygen(&d);

        let uncompressed = encode_uncompressed(&q);
        let decoded = decode_point(&uncompressed).unwrap();
        prop_assert_eq!(encode_uncompressed(&decoded), uncompressed);

        let compressed = encode_compressed(&q);
        let decoded = decode_point(&compressed).unwrap();
        prop_assert_eq!(encode_uncompressed(&decoded), uncompressed);
    }

    /// `keygen` is a pure function of its input: the same private
    /// scalar always derives the same public key.
    #[test]
    fn keygen_is_deterministic(d in nonzero_scalar()) {
        let q1 = keygen(&d);
        let q2 = keygen(&d);
        prop_assert_eq!(encode_uncompressed(&q1), encode_uncompressed(&q2));
    }
}
