//! Fp: arithmetic modulo the NIST P-256 base field prime
//!
//! `p = 2^256 - 2^224 + 2^192 + 2^96 - 1`
//!
//! Elements are carried internally in Montgomery form (`a*R mod p`,
//! `R = 2^256`) the way `p256/src/arithmetic/field/field32.rs` carries
//! its `Fe` type; `to_montgomery`/`from_montgomery` bridge to the plain
//! representation at the API boundary.

use crate::util::{self, mask_from_bool, mont_mul, neg_inv_mod_32};
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};
use zeroize::DefaultIsZeroes;

/// `p` in little-endian 32-bit limbs.
pub(crate) const MODULUS: [u32; 8] = [
    0xffff_ffff,
    0xffff_ffff,
    0xffff_ffff,
    0x0000_0000,
    0x0000_0000,
    0x0000_0000,
    0x0000_0001,
    0xffff_ffff,
];

/// `R mod p` where `R = 2^256`, i.e. the Montgomery representation of 1.
/// Taken from the reference implementation's `one_montgomery` constant,
/// which is pure curve domain data (not creative expression).
const ONE_MONT: [u32; 8] = [
    1, 0, 0, 0xffff_ffff, 0xffff_ffff, 0xffff_ffff, 0xffff_fffe, 0,
];

/// `-p^-1 mod 2^32`, the Montgomery reduction constant for this modulus.
const MINV0: u32 = neg_inv_mod_32(MODULUS[0]);

/// `b` coefficient of the curve equation `y^2 = x^3 - 3x + b`, in plain
/// (non-Montgomery) form.
pub(crate) const EQUATION_B: [u32; 8] = [
    0x27d2_604b,
    0x3bce_3c3e,
    0xcc53_b0f6,
    0x651d_06b0,
    0x7698_86bc,
    0xb3eb_bd55,
    0xaa3a_93e7,
    0x5ac6_35d8,
];

/// An element of the NIST P-256 base field, always stored in Montgomery
/// form. `0 <= inner < p` is an invariant maintained by every operation.
#[derive(Copy, Clone, Debug, Default)]
pub struct FieldElement(pub(crate) [u32; 8]);

impl FieldElement {
    /// The additive identity.
    pub const ZERO: Self = Self([0; 8]);

    /// The multiplicative identity (Montgomery form of 1).
    pub const ONE: Self = Self(ONE_MONT);

    /// Builds a field element directly from its Montgomery-form limbs,
    /// without a range check. Used internally for curve constants.
    pub(crate) const fn from_montgomery_unchecked(limbs: [u32; 8]) -> Self {
        Self(limbs)
    }

    /// Parses a little-endian limb array as a plain (non-Montgomery)
    /// integer, checks it lies in `[0, p)`, and converts it into
    /// Montgomery form.
    pub fn from_raw(limbs: [u32; 8]) -> Option<Self> {
        if !check_range_p(&limbs) {
            return None;
        }
        Some(Self(to_montgomery(&limbs)))
    }

    /// Returns the plain (non-Montgomery) little-endian limb
    /// representation.
    pub fn to_raw(self) -> [u32; 8] {
        from_montgomery(&self.0)
    }

    /// The curve's `b` coefficient, converted to Montgomery form.
    ///
    /// Computed on demand rather than hard-coded: `to_montgomery` needs
    /// no precomputed `R^2 mod p` constant (see its doc comment), so
    /// there's nothing gained by also memorizing `b`'s Montgomery image.
    pub(crate) fn equation_b() -> Self {
        Self(to_montgomery(&EQUATION_B))
    }

    /// `a + b mod p`.
    pub fn add(&self, other: &Self) -> Self {
        Self(add_mod_p(&self.0, &other.0))
    }

    /// `a - b mod p`.
    pub fn sub(&self, other: &Self) -> Self {
        Self(sub_mod_p(&self.0, &other.0))
    }

    /// `-a mod p`.
    pub fn neg(&self) -> Self {
        Self::ZERO.sub(self)
    }

    /// `a * b * R^-1 mod p` (Montgomery multiplication).
    pub fn mul(&self, other: &Self) -> Self {
        Self(mont_mul(&self.0, &other.0, &MODULUS, MINV0))
    }

    /// `a^2 * R^-1 mod p`.
    pub fn square(&self) -> Self {
        self.mul(self)
    }

    /// `a * 3` (three additions; exposed separately since it is used
    /// heavily by the doubling formula).
    pub fn mul3(&self) -> Self {
        self.add(self).add(self)
    }

    /// `a * 4`.
    pub fn mul4(&self) -> Self {
        self.add(self).add(self).add(self).add(self)
    }

    /// `a * 8`.
    pub fn mul8(&self) -> Self {
        self.mul4().add(self).add(self).add(self).add(self)
    }

    /// `-a mod p` if `flag` is true, else `a`. Constant-time in `flag`.
    pub fn negate_if(&self, flag: Choice) -> Self {
        let negated = sub_mod_p(&MODULUS, &self.0);
        let negated = util::select(&negated, &self.0, mask_from_bool(is_zero_limbs(&self.0)));
        let mask = mask_from_bool(flag.into());
        Self(util::select(&self.0, &negated, mask))
    }

    /// Fermat inversion `a^(p-2) mod p` via fixed square-and-multiply.
    /// The exponent is a public constant, so this is constant-time in
    /// the secret base regardless of whether a shorter addition chain
    /// is used; we take the simple fixed-window path over an optimized
    /// chain for auditability.
    pub fn invert(&self) -> Self {
        // p - 2 in little-endian limbs.
        let mut exp = MODULUS;
        exp[0] = exp[0].wrapping_sub(2);

        let mut result = Self::ONE;
        for limb_idx in (0..8).rev() {
            let limb = exp[limb_idx];
            for bit_idx in (0..32).rev() {
                result = result.square();
                if (limb >> bit_idx) & 1 == 1 {
                    result = result.mul(self);
                }
            }
        }
        result
    }

    /// `a^((p+1)/4) mod p`, a candidate square root since `p ≡ 3 (mod 4)`.
    pub fn sqrt_candidate(&self) -> Self {
        // (p+1)/4 in little-endian limbs.
        let mut exp = MODULUS;
        add_one(&mut exp);
        shr1(&mut exp);
        shr1(&mut exp);

        let mut result = Self::ONE;
        for limb_idx in (0..8).rev() {
            let limb = exp[limb_idx];
            for bit_idx in (0..32).rev() {
                result = result.square();
                if (limb >> bit_idx) & 1 == 1 {
                    result = result.mul(self);
                }
            }
        }
        result
    }

    /// `0` iff this element is zero.
    pub fn is_zero(&self) -> Choice {
        Choice::from(is_zero_limbs(&self.0) as u8)
    }

    /// Least significant bit of the plain (non-Montgomery) value; used to
    /// select a SEC1 compression tag or a square-root parity.
    pub fn is_odd(&self) -> Choice {
        let raw = self.to_raw();
        Choice::from((raw[0] & 1) as u8)
    }
}

impl ConstantTimeEq for FieldElement {
    fn ct_eq(&self, other: &Self) -> Choice {
        let mut acc = 0u32;
        for i in 0..8 {
            acc |= self.0[i] ^ other.0[i];
        }
        Choice::from((acc == 0) as u8)
    }
}

impl ConditionallySelectable for FieldElement {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        let mask = mask_from_bool(choice.into());
        Self(util::select(&a.0, &b.0, mask))
    }
}

impl DefaultIsZeroes for FieldElement {}

fn add_one(limbs: &mut [u32; 8]) {
    let mut carry = 1u32;
    for limb in limbs.iter_mut() {
        let (s, c) = util::adc(*limb, 0, carry);
        *limb = s;
        carry = c;
    }
}

fn shr1(limbs: &mut [u32; 8]) {
    let mut carry = 0u32;
    for limb in limbs.iter_mut().rev() {
        let new_carry = *limb & 1;
        *limb = (*limb >> 1) | (carry << 31);
        carry = new_carry;
    }
}

fn is_zero_limbs(a: &[u32; 8]) -> bool {
    util::is_zero(a)
}

/// Checks `0 <= a < p`.
pub(crate) fn check_range_p(a: &[u32; 8]) -> bool {
    util::is_less_than(a, &MODULUS) != 0
}

pub(crate) fn add_mod_p(a: &[u32; 8], b: &[u32; 8]) -> [u32; 8] {
    let mut sum = [0u32; 8];
    let mut carry = 0u32;
    for i in 0..8 {
        let (s, c) = util::adc(a[i], b[i], carry);
        sum[i] = s;
        carry = c;
    }
    util::reduce_once_with_carry(sum, carry, &MODULUS)
}

pub(crate) fn sub_mod_p(a: &[u32; 8], b: &[u32; 8]) -> [u32; 8] {
    let mut diff = [0u32; 8];
    let mut borrow = 0u32;
    for i in 0..8 {
        let (d, bo) = util::sbb(a[i], b[i], borrow);
        diff[i] = d;
        borrow = bo;
    }
    // If a < b, diff underflowed by 2^256; add p back to correct.
    let mask = borrow;
    let mut corrected = diff;
    let mut carry = 0u32;
    for i in 0..8 {
        let (s, c) = util::adc(corrected[i], MODULUS[i] & mask, carry);
        corrected[i] = s;
        carry = c;
    }
    corrected
}

/// `a * R mod p` via 256 conditional doublings: this is exactly
/// `a << 256 mod p`, computed as `a` doubled (mod p) 256 times. It needs
/// no precomputed `R^2 mod p` constant, unlike the usual
/// `mont_mul(a, R^2)` shortcut.
fn to_montgomery(a: &[u32; 8]) -> [u32; 8] {
    let mut acc = *a;
    for _ in 0..256 {
        acc = add_mod_p(&acc, &acc);
    }
    acc
}

/// `aR * R^-1 mod p`, i.e. a single Montgomery reduction of a value
/// already scaled by `R`, exactly as `field32.rs`'s `fe_from_montgomery`
/// zero-extends its input and calls the reduction routine once.
fn from_montgomery(a: &[u32; 8]) -> [u32; 8] {
    mont_mul(a, &ONE_RAW, &MODULUS, MINV0)
}

/// The plain integer `1`, used as the multiplicand that turns
/// `mont_mul` into a bare Montgomery reduction.
const ONE_RAW: [u32; 8] = [1, 0, 0, 0, 0, 0, 0, 0];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn montgomery_round_trip() {
        let a = [1u32, 2, 3, 4, 5, 6, 7, 8];
        let fe = FieldElement::from_raw(a).unwrap();
        assert_eq!(fe.to_raw(), a);
    }

    #[test]
    fn one_is_montgomery_one() {
        let one = FieldElement::from_raw(ONE_RAW).unwrap();
        assert_eq!(one.0, ONE_MONT);
    }

    #[test]
    fn add_sub_inverse() {
        let a = FieldElement::from_raw([11, 0, 0, 0, 0, 0, 0, 0]).unwrap();
        let b = FieldElement::from_raw([5, 0, 0, 0, 0, 0, 0, 0]).unwrap();
        let c = a.add(&b).sub(&b);
        assert_eq!(c.to_raw(), a.to_raw());
    }

    #[test]
    fn invert_round_trip() {
        let a = FieldElement::from_raw([123456789, 0, 0, 0, 0, 0, 0, 0]).unwrap();
        let inv = a.invert();
        let prod = a.mul(&inv);
        assert_eq!(prod.to_raw(), ONE_RAW);
    }
}
