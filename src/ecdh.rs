//! ECDH shared-secret derivation.
//!
//! Mirrors `p256_ecdh_calc_shared_secret`: the shared secret is the raw
//! x-coordinate of `d * Q`, with no KDF applied (left to the caller, as
//! for the hash function this crate never touches).

use crate::affine::AffinePoint;
use crate::error::{Error, Result};
use crate::ladder;
use crate::scalar::Scalar;
use crate::util;

/// Computes the ECDH shared secret `x(d * Q)`.
///
/// Unlike `sign`/`keygen`, this does not range-check `d` against `[1,
/// n-1)`: the reference implementation's `p256_ecdh_calc_shared_secret`
/// likewise takes its private scalar on faith, leaving range validation
/// to whatever produced the key (see the open question recorded in
/// `DESIGN.md`). `Q` is still required to be a valid, on-curve point.
pub fn ecdh(d: &Scalar, q: &AffinePoint) -> Result<[u8; 32]> {
    if q.is_on_curve().unwrap_u8() == 0 || q.is_identity().unwrap_u8() == 1 {
        return Err(Error);
    }
    let shared = ladder::scalarmult_variable_base(d, q).to_affine();
    if shared.is_identity().unwrap_u8() == 1 {
        return Err(Error);
    }
    Ok(util::limbs_to_be_bytes(&shared.x().to_raw()))
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
    fn shared_secret_is_symmetric() {
        let da = scalar_from_u64(11);
        let db = scalar_from_u64(222);

        let qa = ladder::scalarmult_base(&da).to_affine();
        let qb = ladder::scalarmult_base(&db).to_affine();

        let shared_a = ecdh(&da, &qb).unwrap();
        let shared_b = ecdh(&db, &qa).unwrap();
        assert_eq!(shared_a, shared_b);
    }
}
