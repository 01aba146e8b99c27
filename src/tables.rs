//! Precomputed odd multiples of the generator, used by the verify
//! ladder's signed sliding-window recoding.
//!
//! Transcribed verbatim from the reference implementation's
//! `p256_basepoint_precomp` table (curve domain data, not creative
//! expression): affine, Montgomery-form `(x, y)` pairs for
//! `1*G, 3*G, 5*G, ..., 15*G`.

use crate::affine::AffinePoint;
use crate::field::FieldElement;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

const BASE_MULTIPLES: [([u32; 8], [u32; 8]); 8] = [
    (
        [0x18a9143c, 0x79e730d4, 0x5fedb601, 0x75ba95fc, 0x77622510, 0x79fb732b, 0xa53755c6, 0x18905f76],
        [0xce95560a, 0xddf25357, 0xba19e45c, 0x8b4ab8e4, 0xdd21f325, 0xd2e88688, 0x25885d85, 0x8571ff18],
    ),
    (
        [0x4eebc127, 0xffac3f90, 0x087d81fb, 0xb027f84a, 0x87cbbc98, 0x66ad77dd, 0xb6ff747e, 0x26936a3f],
        [0xc983a7eb, 0xb04c5c1f, 0x0861fe1a, 0x583e47ad, 0x1a2ee98e, 0x78820831, 0xe587cc07, 0xd5f06a29],
    ),
    (
        [0xc45c61f5, 0xbe1b8aae, 0x94b9537d, 0x90ec649a, 0xd076c20c, 0x941cb5aa, 0x890523c8, 0xc9079605],
        [0xe7ba4f10, 0xeb309b4a, 0xe5eb882b, 0x73c568ef, 0x7e7a1f68, 0x3540a987, 0x2dd1e916, 0x73a076bb],
    ),
    (
        [0xa0173b4f, 0x0746354e, 0xd23c00f7, 0x2bd20213, 0x0c23bb08, 0xf43eaab5, 0xc3123e03, 0x13ba5119],
        [0x3f5b9d4d, 0x2847d030, 0x5da67bdd, 0x6742f2f2, 0x77c94195, 0xef933bdc, 0x6e240867, 0xeaedd915],
    ),
    (
        [0x264e20e8, 0x75c96e8f, 0x59a7a841, 0xabe6bfed, 0x44c8eb00, 0x2cc09c04, 0xf0c4e16b, 0xe05b3080],
        [0xa45f3314, 0x1eb7777a, 0xce5d45e3, 0x56af7bed, 0x88b12f1a, 0x2b6e019a, 0xfd835f9b, 0x086659cd],
    ),
    (
        [0x6245e404, 0xea7d260a, 0x6e7fdfe0, 0x9de40795, 0x8dac1ab5, 0x1ff3a415, 0x649c9073, 0x3e7090f1],
        [0x2b944e88, 0x1a768561, 0xe57f61c8, 0x250f939e, 0x1ead643d, 0x0c0daa89, 0xe125b88e, 0x68930023],
    ),
    (
        [0x4b2ed709, 0xccc42563, 0x856fd30d, 0x0e356769, 0x559e9811, 0xbcbcd43f, 0x5395b759, 0x738477ac],
        [0xc00ee17f, 0x35752b90, 0x742ed2e3, 0x68748390, 0xbd1f5bc1, 0x7cd06422, 0xc9e7b797, 0xfbc08769],
    ),
    (
        [0xbc60055b, 0x72bcd8b7, 0x56e27e4b, 0x03cc23ee, 0xe4819370, 0xee337424, 0x0ad3da09, 0xe2aa0e43],
        [0x6383c45d, 0x40b8524f, 0x42a41b25, 0xd7663554, 0x778a4797, 0x64efa6de, 0x7079adf4, 0x2042170a],
    ),
];

/// Returns `(2*k+1)*G` for `k` in `0..8`, selected in constant time
/// regardless of `k`: every table entry is read and masked on every
/// call, so the access pattern does not depend on the secret index.
pub(crate) fn select_base_multiple(k: u32) -> AffinePoint {
    let mut x = FieldElement::ZERO;
    let mut y = FieldElement::ZERO;
    for (i, (xi, yi)) in BASE_MULTIPLES.iter().enumerate() {
        let hit = Choice::from((i as u32).ct_eq(&k).unwrap_u8());
        let entry_x = FieldElement::from_montgomery_unchecked(*xi);
        let entry_y = FieldElement::from_montgomery_unchecked(*yi);
        x = FieldElement::conditional_select(&x, &entry_x, hit);
        y = FieldElement::conditional_select(&y, &entry_y, hit);
    }
    AffinePoint::from_coordinates_unchecked(x, y)
}

/// Constant-time select of `table[idx]` out of an 8-entry runtime table,
/// the same access pattern as [`select_base_multiple`] but over a table
/// built at runtime (odd multiples of a variable base point rather than
/// the fixed generator). Mirrors the table-scan idiom in
/// `primeorder/src/lookup_table.rs`.
pub(crate) fn select_from_8(table: &[AffinePoint; 8], idx: u32) -> AffinePoint {
    let mut out = AffinePoint::identity();
    for (i, entry) in table.iter().enumerate() {
        let hit = Choice::from((i as u32).ct_eq(&idx).unwrap_u8());
        out = AffinePoint::conditional_select(&out, entry, hit);
    }
    out
}
