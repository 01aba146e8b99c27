//! Fn: arithmetic modulo the NIST P-256 group order `n`
//!
//! Scalars are carried in Montgomery form for the same reason field
//! elements are (see `field32.rs`'s rationale, which this mirrors one
//! layer up): every multiplication the ladder and the safegcd inverter
//! perform is in this domain, so converting once at the boundary beats
//! converting on every limb operation.

use crate::util::{self, mask_from_bool, mont_mul, neg_inv_mod_32};
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};
use zeroize::DefaultIsZeroes;

/// `n`, the order of the P-256 base point, in little-endian 32-bit limbs.
pub(crate) const ORDER: [u32; 8] = [
    0xfc63_2551,
    0xf3b9_cac2,
    0xa717_9e84,
    0xbce6_faad,
    0xffff_ffff,
    0xffff_ffff,
    0x0000_0000,
    0xffff_ffff,
];

const MINV0: u32 = neg_inv_mod_32(ORDER[0]);

/// A residue modulo the group order, always stored in Montgomery form.
/// Used for ECDSA's `d`, `k`, `r`, `s` and the ladder's scalar input.
#[derive(Copy, Clone, Debug, Default)]
pub struct Scalar(pub(crate) [u32; 8]);

impl Scalar {
    /// The additive identity.
    pub const ZERO: Self = Self([0; 8]);

    /// Parses a big-endian 32-byte string, reduces it mod `n` (rather
    /// than rejecting out-of-range input), and converts to Montgomery
    /// form. This is the operation ECDSA's `z = hash mod n` step needs:
    /// the digest is a 256-bit string that is not already an `Fn`
    /// element.
    pub fn from_bytes_reduced(bytes: &[u8; 32]) -> Self {
        let mut limbs = util::be_bytes_to_limbs(bytes);
        util::conditional_sub(&mut limbs, &ORDER);
        Self(to_montgomery(&limbs))
    }

    /// Parses a big-endian 32-byte string as an element of `[0, n)`,
    /// rejecting values outside that range. Used for scalars that must
    /// be exact residues: private keys, ECDSA nonces and signature
    /// components.
    pub fn from_bytes_checked(bytes: &[u8; 32]) -> Option<Self> {
        let limbs = util::be_bytes_to_limbs(bytes);
        if !check_range_n(&limbs) {
            return None;
        }
        Some(Self(to_montgomery(&limbs)))
    }

    /// Serializes as a big-endian 32-byte string.
    pub fn to_bytes(self) -> [u8; 32] {
        util::limbs_to_be_bytes(&from_montgomery(&self.0))
    }

    /// `a + b mod n`.
    pub fn add(&self, other: &Self) -> Self {
        Self(add_mod_n(&self.0, &other.0))
    }

    /// `a - b mod n`.
    pub fn sub(&self, other: &Self) -> Self {
        Self(sub_mod_n(&self.0, &other.0))
    }

    /// `a * b * R^-1 mod n` (Montgomery multiplication).
    pub fn mul(&self, other: &Self) -> Self {
        Self(mont_mul(&self.0, &other.0, &ORDER, MINV0))
    }

    /// `-a mod n` if `flag` is true, else `a`.
    pub fn negate_if(&self, flag: Choice) -> Self {
        let negated = sub_mod_n(&ORDER, &self.0);
        let negated = util::select(&negated, &self.0, mask_from_bool(util::is_zero(&self.0)));
        let mask = mask_from_bool(flag.into());
        Self(util::select(&self.0, &negated, mask))
    }

    /// Variable-time Fermat inversion `a^(n-2) mod n`, for use only in
    /// `verify` where the scalar being inverted (`s` from a public
    /// signature) carries no secrecy requirement. Signing uses the
    /// constant-time safegcd inverter in `safegcd.rs` instead.
    pub fn invert_vartime(&self) -> Self {
        let mut exp = ORDER;
        exp[0] = exp[0].wrapping_sub(2);

        let mut result = montgomery_one();
        for limb_idx in (0..8).rev() {
            let limb = exp[limb_idx];
            for bit_idx in (0..32).rev() {
                result = Self(mont_mul(&result.0, &result.0, &ORDER, MINV0));
                if (limb >> bit_idx) & 1 == 1 {
                    result = Self(mont_mul(&result.0, &self.0, &ORDER, MINV0));
                }
            }
        }
        result
    }

    /// `0` iff this scalar is zero.
    pub fn is_zero(&self) -> Choice {
        Choice::from(util::is_zero(&self.0) as u8)
    }

    /// The i-th bit (0 = least significant) of the plain (non-Montgomery)
    /// value; used by the scalar-multiplication ladders' digit recoders.
    pub(crate) fn bit(&self, i: usize) -> u32 {
        let raw = from_montgomery(&self.0);
        (raw[i / 32] >> (i % 32)) & 1
    }

    /// Plain (non-Montgomery) little-endian limbs, for `safegcd.rs`'s
    /// inverter, which operates on ordinary integers rather than the
    /// Montgomery domain.
    pub(crate) fn to_raw_limbs(self) -> [u32; 8] {
        from_montgomery(&self.0)
    }

    /// Wraps plain little-endian limbs already known to lie in `[0, n)`
    /// back into Montgomery form.
    pub(crate) fn from_raw_limbs(limbs: [u32; 8]) -> Self {
        Self(to_montgomery(&limbs))
    }

    /// Reduces plain little-endian limbs (known to be `< 2^256`, as any
    /// field element's raw form is) mod `n` and wraps into Montgomery
    /// form. Used to turn a curve point's x-coordinate into `r` during
    /// signing/verification.
    pub(crate) fn from_raw_limbs_reduced(mut limbs: [u32; 8]) -> Self {
        util::conditional_sub(&mut limbs, &ORDER);
        Self(to_montgomery(&limbs))
    }
}

impl ConstantTimeEq for Scalar {
    fn ct_eq(&self, other: &Self) -> Choice {
        let mut acc = 0u32;
        for i in 0..8 {
            acc |= self.0[i] ^ other.0[i];
        }
        Choice::from((acc == 0) as u8)
    }
}

impl ConditionallySelectable for Scalar {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        let mask = mask_from_bool(choice.into());
        Self(util::select(&a.0, &b.0, mask))
    }
}

impl DefaultIsZeroes for Scalar {}

/// Checks `0 <= a < n`.
pub(crate) fn check_range_n(a: &[u32; 8]) -> bool {
    util::is_less_than(a, &ORDER) != 0
}

pub(crate) fn add_mod_n(a: &[u32; 8], b: &[u32; 8]) -> [u32; 8] {
    let mut sum = [0u32; 8];
    let mut carry = 0u32;
    for i in 0..8 {
        let (s, c) = util::adc(a[i], b[i], carry);
        sum[i] = s;
        carry = c;
    }
    util::reduce_once_with_carry(sum, carry, &ORDER)
}

pub(crate) fn sub_mod_n(a: &[u32; 8], b: &[u32; 8]) -> [u32; 8] {
    let mut diff = [0u32; 8];
    let mut borrow = 0u32;
    for i in 0..8 {
        let (d, bo) = util::sbb(a[i], b[i], borrow);
        diff[i] = d;
        borrow = bo;
    }
    let mask = borrow;
    let mut corrected = diff;
    let mut carry = 0u32;
    for i in 0..8 {
        let (s, c) = util::adc(corrected[i], ORDER[i] & mask, carry);
        corrected[i] = s;
        carry = c;
    }
    corrected
}

/// `a * R mod n` via 256 conditional doublings, mirroring `field.rs`'s
/// `to_montgomery`: no precomputed `R^2 mod n` constant is needed.
fn to_montgomery(a: &[u32; 8]) -> [u32; 8] {
    let mut acc = *a;
    for _ in 0..256 {
        acc = add_mod_n(&acc, &acc);
    }
    acc
}

fn from_montgomery(a: &[u32; 8]) -> [u32; 8] {
    mont_mul(a, &ONE_RAW, &ORDER, MINV0)
}

fn montgomery_one() -> Scalar {
    Scalar(to_montgomery(&ONE_RAW))
}

const ONE_RAW: [u32; 8] = [1, 0, 0, 0, 0, 0, 0, 0];
