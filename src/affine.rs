//! Affine points on the NIST P-256 curve `y^2 = x^3 - 3x + b`.

use crate::field::FieldElement;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};
use zeroize::DefaultIsZeroes;

/// The generator point `G`, in Montgomery-form coordinates. Pure curve
/// domain data transcribed from the reference implementation's
/// `p256_basepoint_precomp[0]` table entry, not creative expression.
const GENERATOR_X: [u32; 8] = [
    0x18a9143c, 0x79e730d4, 0x5fedb601, 0x75ba95fc, 0x77622510, 0x79fb732b, 0xa53755c6, 0x18905f76,
];
const GENERATOR_Y: [u32; 8] = [
    0xce95560a, 0xddf25357, 0xba19e45c, 0x8b4ab8e4, 0xdd21f325, 0xd2e88688, 0x25885d85, 0x8571ff18,
];

/// A point on the curve in affine coordinates, or the point at infinity
/// when `infinity` is set (in which case `x`/`y` carry no meaning, and
/// are conventionally left as zero).
#[derive(Copy, Clone, Debug)]
pub struct AffinePoint {
    pub(crate) x: FieldElement,
    pub(crate) y: FieldElement,
    pub(crate) infinity: Choice,
}

impl AffinePoint {
    /// The base point `G`.
    pub fn generator() -> Self {
        Self {
            x: FieldElement::from_montgomery_unchecked(GENERATOR_X),
            y: FieldElement::from_montgomery_unchecked(GENERATOR_Y),
            infinity: Choice::from(0),
        }
    }

    /// The point at infinity.
    pub fn identity() -> Self {
        Self {
            x: FieldElement::ZERO,
            y: FieldElement::ZERO,
            infinity: Choice::from(1),
        }
    }

    /// Whether this is the point at infinity.
    pub fn is_identity(&self) -> Choice {
        self.infinity
    }

    /// The affine `x` coordinate. Meaningless for the point at infinity.
    pub fn x(&self) -> FieldElement {
        self.x
    }

    /// The affine `y` coordinate. Meaningless for the point at infinity.
    pub fn y(&self) -> FieldElement {
        self.y
    }

    /// Builds a point from affine coordinates already known to satisfy
    /// the curve equation, without checking. Used internally once a
    /// caller (decompression, decoding) has verified membership.
    pub(crate) fn from_coordinates_unchecked(x: FieldElement, y: FieldElement) -> Self {
        Self { x, y, infinity: Choice::from(0) }
    }

    /// Tests `y^2 == x^3 - 3x + b`. The point at infinity is considered
    /// on-curve by convention (there is nothing to check).
    pub fn is_on_curve(&self) -> Choice {
        let lhs = self.y.square();
        let x2 = self.x.square();
        let x3 = x2.mul(&self.x);
        let rhs = x3.sub(&self.x.mul3()).add(&FieldElement::equation_b());
        lhs.ct_eq(&rhs) | self.infinity
    }

    /// Recovers `y` from `x` and a desired parity bit, the SEC1
    /// point-decompression operation. Returns `None` if `x` is not the
    /// abscissa of any curve point.
    pub fn decompress(x: FieldElement, y_is_odd: Choice) -> Option<Self> {
        let x2 = x.square();
        let x3 = x2.mul(&x);
        let rhs = x3.sub(&x.mul3()).add(&FieldElement::equation_b());

        let candidate = rhs.sqrt_candidate();
        if candidate.square().ct_eq(&rhs).unwrap_u8() == 0 {
            return None;
        }

        let y = FieldElement::conditional_select(
            &candidate,
            &candidate.neg(),
            candidate.is_odd() ^ y_is_odd,
        );

        Some(Self::from_coordinates_unchecked(x, y))
    }
}

impl ConditionallySelectable for AffinePoint {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self {
            x: FieldElement::conditional_select(&a.x, &b.x, choice),
            y: FieldElement::conditional_select(&a.y, &b.y, choice),
            infinity: Choice::conditional_select(&a.infinity, &b.infinity, choice),
        }
    }
}

impl ConstantTimeEq for AffinePoint {
    fn ct_eq(&self, other: &Self) -> Choice {
        (self.x.ct_eq(&other.x) & self.y.ct_eq(&other.y) & !self.infinity & !other.infinity)
            | (self.infinity & other.infinity)
    }
}

impl DefaultIsZeroes for AffinePoint {}

impl Default for AffinePoint {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generator_is_on_curve() {
        let g = AffinePoint::generator();
        assert_eq!(g.is_on_curve().unwrap_u8(), 1);
    }

    #[test]
    fn decompress_round_trip() {
        let g = AffinePoint::generator();
        let recovered = AffinePoint::decompress(g.x, g.y.is_odd()).unwrap();
        assert_eq!(recovered.ct_eq(&g).unwrap_u8(), 1);
    }
}
