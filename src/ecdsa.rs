//! ECDSA sign/verify.
//!
//! `sign` and the `sign_step1`/`sign_step2` split mirror the reference
//! implementation's `p256_sign`/`p256_sign_step1`/`p256_sign_step2`: the
//! split exists so a caller can precompute the expensive, secret-`k`-only
//! half of a signature (the scalar multiplication and inversion) ahead
//! of the message becoming available, then finish cheaply once it does.
//! `verify` mirrors `p256_verify`.

use crate::affine::AffinePoint;
use crate::error::{Error, Result};
use crate::ladder;
use crate::safegcd;
use crate::scalar::Scalar;
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

/// The secret-dependent, message-independent half of an ECDSA
/// signature: `r` and `k^-1 mod n`, computed from the nonce `k` alone.
/// Zeroized on drop since both fields are derived from the secret nonce.
pub struct SignPrecomp {
    r: Scalar,
    k_inv: Scalar,
}

impl Drop for SignPrecomp {
    fn drop(&mut self) {
        self.r.zeroize();
        self.k_inv.zeroize();
    }
}

/// Computes the nonce-dependent half of a signature: `r = (k*G).x mod n`
/// and `k^-1 mod n`. `k` must be a uniformly random secret in `[1,
/// n-1)`; generating it is the caller's responsibility (see the crate's
/// non-goals).
pub fn sign_step1(k: &Scalar) -> SignPrecomp {
    let r_point = ladder::scalarmult_base(k).to_affine();
    let r_bytes = r_point.x().to_raw();
    let r = Scalar::from_raw_limbs_reduced(r_bytes);
    let k_inv = safegcd::invert_mod_n(k);
    SignPrecomp { r, k_inv }
}

/// Completes a signature given the precomputed nonce half and the
/// private key `d` and hash `z`. Returns `(r, s)`. Fails (vanishingly
/// rarely) if either output component is zero, in which case the
/// caller must retry with a fresh nonce.
pub fn sign_step2(precomp: &SignPrecomp, d: &Scalar, z: &Scalar) -> Result<(Scalar, Scalar)> {
    if precomp.r.is_zero().unwrap_u8() == 1 {
        return Err(Error);
    }
    let rd = precomp.r.mul(d);
    let s = precomp.k_inv.mul(&z.add(&rd));
    if s.is_zero().unwrap_u8() == 1 {
        return Err(Error);
    }
    Ok((precomp.r, s))
}

/// One-shot signing: `sign_step1` followed by `sign_step2`.
pub fn sign(d: &Scalar, k: &Scalar, z: &Scalar) -> Result<(Scalar, Scalar)> {
    let precomp = sign_step1(k);
    sign_step2(&precomp, d, z)
}

/// Verifies `(r, s)` against hash `z` and public key `q`. Variable-time:
/// every input here is public.
pub fn verify(q: &AffinePoint, z: &Scalar, r: &Scalar, s: &Scalar) -> Result<()> {
    if r.is_zero().unwrap_u8() == 1 || s.is_zero().unwrap_u8() == 1 {
        return Err(Error);
    }
    let w = s.invert_vartime();
    let u1 = z.mul(&w);
    let u2 = r.mul(&w);

    let point = ladder::scalarmult_dual_vartime(&u1, &u2, q);
    let affine = point.to_affine();
    if affine.is_identity().unwrap_u8() == 1 {
        return Err(Error);
    }

    let x_bytes = affine.x().to_raw();
    let v = Scalar::from_raw_limbs_reduced(x_bytes);
    if v.ct_eq(r).unwrap_u8() == 1 {
        Ok(())
    } else {
        Err(Error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scalar_from_u64(v: u64) -> Scalar {
        let mut bytes = [0u8; 32];
        bytes[24..32].copy_from_slice(&v.to_be_bytes());
        Scalar::from_bytes_checked(&bytes).unwrap()
    }

    #[test]
    fn sign_then_verify_round_trips() {
        let d = scalar_from_u64(12345);
        let k = scalar_from_u64(6789);
        let z = scalar_from_u64(42);

        let q = ladder::scalarmult_base(&d).to_affine();
        let (r, s) = sign(&d, &k, &z).unwrap();
        assert!(verify(&q, &z, &r, &s).is_ok());
    }

    #[test]
    fn verify_rejects_wrong_hash() {
        let d = scalar_from_u64(12345);
        let k = scalar_from_u64(6789);
        let z = scalar_from_u64(42);
        let wrong_z = scalar_from_u64(43);

        let q = ladder::scalarmult_base(&d).to_affine();
        let (r, s) = sign(&d, &k, &z).unwrap();
        assert!(verify(&q, &wrong_z, &r, &s).is_err());
    }

    #[test]
    fn split_signing_matches_one_shot() {
        let d = scalar_from_u64(999);
        let k = scalar_from_u64(111);
        let z = scalar_from_u64(7);

        let one_shot = sign(&d, &k, &z).unwrap();
        let precomp = sign_step1(&k);
        let split = sign_step2(&precomp, &d, &z).unwrap();
        assert_eq!(one_shot.0.to_bytes(), split.0.to_bytes());
        assert_eq!(one_shot.1.to_bytes(), split.1.to_bytes());
    }
}
