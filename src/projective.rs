//! Jacobian projective group law.
//!
//! Formulas are `dbl-2007-bl` (doubling, general `a`) and `madd-2007-bl`
//! / `add-2007-bl` (mixed / full addition) from the Explicit-Formulas
//! Database, the same family the reference implementation's
//! `P256_double_j`/`P256_add_sub_j` implement in hand-written assembly.
//! `dbl-2007-bl` is used, rather than a formula specialized to `a = -3`,
//! because it is the one that visibly preserves the `Z = 0 -> Z = 0`
//! invariant the point-at-infinity representation relies on: `Z3 =
//! (Y1+Z1)^2 - YY - ZZ` is identically zero whenever `Z1` is zero.

use crate::affine::AffinePoint;
use crate::field::FieldElement;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};
use zeroize::DefaultIsZeroes;

/// A point in Jacobian coordinates `(X : Y : Z)`, representing the
/// affine point `(X/Z^2, Y/Z^3)`. `Z = 0` represents the point at
/// infinity.
#[derive(Copy, Clone, Debug)]
pub struct ProjectivePoint {
    pub(crate) x: FieldElement,
    pub(crate) y: FieldElement,
    pub(crate) z: FieldElement,
}

impl ProjectivePoint {
    /// The point at infinity, `Z = 0`.
    pub const IDENTITY: Self = Self {
        x: FieldElement::ONE,
        y: FieldElement::ONE,
        z: FieldElement::ZERO,
    };

    /// Lifts an affine point into Jacobian coordinates.
    pub fn from_affine(p: &AffinePoint) -> Self {
        Self {
            x: p.x,
            y: p.y,
            z: FieldElement::conditional_select(&FieldElement::ONE, &FieldElement::ZERO, p.infinity),
        }
    }

    /// Whether this is the point at infinity.
    pub fn is_identity(&self) -> Choice {
        self.z.is_zero()
    }

    /// `2*P`, via `dbl-2007-bl`.
    pub fn double(&self) -> Self {
        let x1 = &self.x;
        let y1 = &self.y;
        let z1 = &self.z;

        let xx = x1.square();
        let yy = y1.square();
        let yyyy = yy.square();
        let zz = z1.square();
        let s_half = x1.add(&yy).square().sub(&xx).sub(&yyyy);
        let s = s_half.add(&s_half);
        let a_zz2 = zz.square().mul3().neg(); // a = -3
        let m = xx.mul3().add(&a_zz2);
        let t = m.square().sub(&s).sub(&s);
        let x3 = t;
        let y3 = m.mul(&s.sub(&t)).sub(&yyyy.mul8());
        let z3 = y1.add(z1).square().sub(&yy).sub(&zz);

        Self { x: x3, y: y3, z: z3 }
    }

    /// `P + Q` if `is_sub` is false, `P - Q` if true. `Q` is given in
    /// affine coordinates (the ladders only ever add table entries,
    /// which are affine or made affine ahead of time), so this is always
    /// the mixed-addition (`Z2 = 1`) formula, `madd-2007-bl`.
    ///
    /// Exceptional when `Q == ±P`; the ladders that call this are built
    /// so that case never arises during the main loop (see `ladder.rs`).
    pub fn add_mixed(&self, q: &AffinePoint, is_sub: Choice) -> Self {
        let q_y = q.y.negate_if(is_sub);

        let z1z1 = self.z.square();
        let u2 = q.x.mul(&z1z1);
        let s2 = q_y.mul(&self.z).mul(&z1z1);
        let h = u2.sub(&self.x);
        let hh = h.square();
        let i = hh.mul4();
        let j = h.mul(&i);
        let r = s2.sub(&self.y).add(&s2.sub(&self.y));
        let v = self.x.mul(&i);
        let x3 = r.square().sub(&j).sub(&v).sub(&v);
        let y3 = r.mul(&v.sub(&x3)).sub(&self.y.mul(&j)).sub(&self.y.mul(&j));
        let z3 = self.z.add(&h).square().sub(&z1z1).sub(&hh);

        let sum = Self { x: x3, y: y3, z: z3 };

        // If self is the identity, the formula above is meaningless;
        // the sum is simply Q (negated if is_sub).
        Self::conditional_select(&sum, &Self::from_affine(&AffinePoint { x: q.x, y: q_y, infinity: q.infinity }), self.is_identity())
    }

    /// Converts to affine coordinates. Returns the point at infinity
    /// (both coordinates zero, `infinity` set) when `self` is the
    /// identity.
    pub fn to_affine(&self) -> AffinePoint {
        let is_identity = self.is_identity();
        let z_inv = self.z.invert();
        let z_inv2 = z_inv.square();
        let z_inv3 = z_inv2.mul(&z_inv);
        let x = self.x.mul(&z_inv2);
        let y = self.y.mul(&z_inv3);
        AffinePoint {
            x: FieldElement::conditional_select(&x, &FieldElement::ZERO, is_identity),
            y: FieldElement::conditional_select(&y, &FieldElement::ZERO, is_identity),
            infinity: is_identity,
        }
    }
}

impl ConditionallySelectable for ProjectivePoint {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self {
            x: FieldElement::conditional_select(&a.x, &b.x, choice),
            y: FieldElement::conditional_select(&a.y, &b.y, choice),
            z: FieldElement::conditional_select(&a.z, &b.z, choice),
        }
    }
}

impl ConstantTimeEq for ProjectivePoint {
    fn ct_eq(&self, other: &Self) -> Choice {
        // Cross-multiply to compare without inverting: (X1*Z2^2, Y1*Z2^3)
        // == (X2*Z1^2, Y2*Z1^3).
        let z1z1 = self.z.square();
        let z2z2 = other.z.square();
        let u1 = self.x.mul(&z2z2);
        let u2 = other.x.mul(&z1z1);
        let s1 = self.y.mul(&other.z).mul(&z2z2);
        let s2 = other.y.mul(&self.z).mul(&z1z1);
        (u1.ct_eq(&u2) & s1.ct_eq(&s2)) | (self.is_identity() & other.is_identity())
    }
}

impl DefaultIsZeroes for ProjectivePoint {}

impl Default for ProjectivePoint {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::affine::AffinePoint;

    #[test]
    fn double_identity_stays_identity() {
        let p = ProjectivePoint::IDENTITY;
        let d = p.double();
        assert_eq!(d.is_identity().unwrap_u8(), 1);
    }

    #[test]
    fn add_identity_is_noop() {
        let g = AffinePoint::generator();
        let p = ProjectivePoint::from_affine(&g);
        let sum = ProjectivePoint::IDENTITY.add_mixed(&g, Choice::from(0));
        assert_eq!(sum.ct_eq(&p).unwrap_u8(), 1);
    }
}
