//! Scalar-multiplication ladders.
//!
//! `scalarmult_base` (fixed-base) and `scalarmult_variable_base` share a
//! single constant-time "comb" core: recode the scalar into 64 signed,
//! always-odd 4-bit digits (so the digit is never zero, removing a
//! branch the table lookup would otherwise need), then Horner-evaluate
//! `sum(d_i * 16^i) * P` by repeated quadrupling and a single
//! table-assisted addition per digit. This mirrors the reference
//! implementation's `scalarmult_variable_base`, which recodes into the
//! same 64 four-bit signed digits (`e[0..63]`) and corrects an even
//! input scalar by negating the table index rather than the scalar
//! itself; `scalarmult_base` reuses the identical recoding against the
//! precomputed generator-multiple table in `tables.rs` instead of a
//! table built from doublings of a runtime point. The reference's
//! separate doubled-table ("fast basemult") path is not reproduced here
//! — see `DESIGN.md`.
//!
//! The verify ladder (`scalarmult_dual`) is explicitly variable-time
//! (its inputs — a signature and a public key — are already public), so
//! it uses a plain simultaneous double-and-add over both scalars rather
//! than a windowed recoding: there is no secret-dependent timing to
//! protect.

use crate::affine::AffinePoint;
use crate::projective::ProjectivePoint;
use crate::scalar::Scalar;
use crate::tables;
use crate::util::{self, mask_from_bool};
use subtle::Choice;
use zeroize::Zeroize;

/// `a - b` for 8-limb values known to satisfy `a >= b`.
fn plain_sub8(a: &[u32; 8], b: &[u32; 8]) -> [u32; 8] {
    let mut out = [0u32; 8];
    let mut borrow = 0u32;
    for i in 0..8 {
        let (d, bo) = util::sbb(a[i], b[i], borrow);
        out[i] = d;
        borrow = bo;
    }
    out
}

/// `k -= d`, for `k` a secret remaining-scalar value and `d` a signed
/// digit derived from it. Both the subtract-magnitude and add-magnitude
/// paths run unconditionally and are mask-selected on `d`'s sign, since
/// branching on `d >= 0` here would brach on a value derived from the
/// secret scalar being recoded.
fn sub_small_signed(k: &mut [u32; 8], d: i32) {
    let mag = d.unsigned_abs();

    let mut sub_result = *k;
    let mut borrow = 0u32;
    let (r0, b0) = util::sbb(sub_result[0], mag, 0);
    sub_result[0] = r0;
    borrow = b0;
    for limb in sub_result.iter_mut().skip(1) {
        let (r, b) = util::sbb(*limb, 0, borrow);
        *limb = r;
        borrow = b;
    }

    let mut add_result = *k;
    let mut carry = 0u32;
    let (r0, c0) = util::adc(add_result[0], mag, 0);
    add_result[0] = r0;
    carry = c0;
    for limb in add_result.iter_mut().skip(1) {
        let (r, c) = util::adc(*limb, 0, carry);
        *limb = r;
        carry = c;
    }

    let neg_mask = mask_from_bool(d < 0);
    *k = util::select(&sub_result, &add_result, neg_mask);
}

fn shr4(k: &mut [u32; 8]) {
    let mut carry = 0u32;
    for limb in k.iter_mut().rev() {
        let new_carry = *limb & 0xF;
        *limb = (*limb >> 4) | (carry << 28);
        carry = new_carry;
    }
}

/// Recodes a scalar (given by its raw, non-Montgomery limbs, which the
/// caller guarantees lies in `(0, n)`) into 64 signed, odd, base-16
/// digits in `{-15, -13, ..., -1, 1, ..., 15}`, plus a flag indicating
/// whether the scalar needed to be replaced by `n - k` to make it odd
/// (in which case the resulting point must be negated by the caller).
fn recode_64_digits(scalar_raw: [u32; 8]) -> ([i8; 64], bool) {
    let is_even = scalar_raw[0] & 1 == 0;
    let is_even_mask = mask_from_bool(is_even);
    let complement = plain_sub8(&crate::scalar::ORDER, &scalar_raw);
    let mut k = util::select(&scalar_raw, &complement, is_even_mask);

    let mut digits = [0i8; 64];
    for digit in digits.iter_mut() {
        // `k` is odd on entry to every iteration (true initially by the
        // even/complement correction above, and preserved inductively:
        // `k - d = k - window + 16` is `(a multiple of 32) + 16`, so
        // shifting it right by 4 bits always lands on an odd value). So
        // `window = k mod 32` is always odd, and `window - 16` is always
        // odd and nonzero — no conditional wraparound needed, unlike a
        // generic (non-oddness-preserving) windowed digit extraction.
        let window = (k[0] & 0x1F) as i32;
        let d = window - 16;
        *digit = d as i8;
        sub_small_signed(&mut k, d);
        shr4(&mut k);
    }
    k.zeroize();
    (digits, is_even)
}

/// Horner-evaluates the recoded digits against a table lookup of
/// `(2*idx+1) * P` for `idx` in `0..8`.
fn comb_multiply(digits: &[i8; 64], negate_final: bool, lookup: impl Fn(u32) -> AffinePoint) -> ProjectivePoint {
    let mut acc = ProjectivePoint::IDENTITY;
    for &d in digits.iter().rev() {
        acc = acc.double().double().double().double();
        let magnitude = d.unsigned_abs() as u32;
        let idx = (magnitude - 1) / 2;
        let mut entry = lookup(idx);
        let mut signed_y = entry.y().negate_if(Choice::from((d < 0) as u8));
        let mut entry_signed = AffinePoint::from_coordinates_unchecked(entry.x(), signed_y);
        acc = acc.add_mixed(&entry_signed, Choice::from(0));
        entry.zeroize();
        signed_y.zeroize();
        entry_signed.zeroize();
    }
    let corrected_y = acc.y.negate_if(Choice::from(negate_final as u8));
    let result = ProjectivePoint { x: acc.x, y: corrected_y, z: acc.z };
    acc.zeroize();
    result
}

/// `k * G`, constant-time in `k`. Used by `keygen` and by `sign` for
/// `R = k * G`, both of which treat `k` as secret.
pub(crate) fn scalarmult_base(k: &Scalar) -> ProjectivePoint {
    let (mut digits, negate_final) = recode_64_digits(k.to_raw_limbs());
    let result = comb_multiply(&digits, negate_final, tables::select_base_multiple);
    digits.zeroize();
    result
}

/// Builds the odd-multiples table `1*P, 3*P, ..., 15*P` used by
/// [`scalarmult_variable_base`], the runtime analogue of
/// `tables::BASE_MULTIPLES`.
fn build_odd_multiples(p: &AffinePoint) -> [AffinePoint; 8] {
    let double_p = ProjectivePoint::from_affine(p).double().to_affine();
    let mut table = [*p; 8];
    let mut acc = ProjectivePoint::from_affine(p);
    for entry in table.iter_mut().skip(1) {
        acc = acc.add_mixed(&double_p, Choice::from(0));
        *entry = acc.to_affine();
    }
    table
}

/// `k * P` for an arbitrary point `P`, constant-time in `k`. Used by
/// `ecdh` and the raw scalar-multiplication entry point, both of which
/// treat `k` as secret; `P` (a peer's public key) is not.
pub(crate) fn scalarmult_variable_base(k: &Scalar, p: &AffinePoint) -> ProjectivePoint {
    let table = build_odd_multiples(p);
    let (mut digits, negate_final) = recode_64_digits(k.to_raw_limbs());
    let result = comb_multiply(&digits, negate_final, |idx| tables::select_from_8(&table, idx));
    digits.zeroize();
    result
}

/// `u1 * G + u2 * Q`, variable-time. Used only by `verify`, where `u1`,
/// `u2` (derived from a signature and a message hash) and `Q` (a public
/// key) are all public.
pub(crate) fn scalarmult_dual_vartime(u1: &Scalar, u2: &Scalar, q: &AffinePoint) -> ProjectivePoint {
    let generator = AffinePoint::generator();
    let mut acc = ProjectivePoint::IDENTITY;
    for i in (0..256).rev() {
        acc = acc.double();
        if u1.bit(i) == 1 {
            acc = acc.add_mixed(&generator, Choice::from(0));
        }
        if u2.bit(i) == 1 {
            acc = acc.add_mixed(q, Choice::from(0));
        }
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::*;
    use subtle::ConstantTimeEq;

    #[test]
    fn base_mult_by_one_is_generator() {
        let mut bytes = [0u8; 32];
        bytes[31] = 1;
        let k = Scalar::from_bytes_checked(&bytes).unwrap();
        let r = scalarmult_base(&k).to_affine();
        assert_eq!(r.ct_eq(&AffinePoint::generator()).unwrap_u8(), 1);
    }

    #[test]
    fn base_and_variable_base_agree() {
        let mut bytes = [0u8; 32];
        bytes[30] = 0x12;
        bytes[31] = 0x34;
        let k = Scalar::from_bytes_checked(&bytes).unwrap();
        let via_base = scalarmult_base(&k).to_affine();
        let via_variable = scalarmult_variable_base(&k, &AffinePoint::generator()).to_affine();
        assert_eq!(via_base.ct_eq(&via_variable).unwrap_u8(), 1);
    }

    #[test]
    fn dual_scalarmult_matches_sum_of_parts() {
        let mut b1 = [0u8; 32];
        b1[31] = 5;
        let mut b2 = [0u8; 32];
        b2[31] = 9;
        let u1 = Scalar::from_bytes_checked(&b1).unwrap();
        let u2 = Scalar::from_bytes_checked(&b2).unwrap();
        let q = AffinePoint::generator();

        let combined = scalarmult_dual_vartime(&u1, &u2, &q);
        let expected = scalarmult_base(&u1).add_mixed(&scalarmult_base(&u2).to_affine(), Choice::from(0));
        assert_eq!(combined.to_affine().ct_eq(&expected.to_affine()).unwrap_u8(), 1);
    }
}
