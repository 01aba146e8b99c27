//! SEC1 point encoding/decoding and endianness conversion.
//!
//! Grounded on the reference implementation's
//! `p256_point_to_octet_string_{uncompressed,compressed,hybrid}` and
//! `p256_octet_string_to_point`, which implement exactly this tag byte
//! + coordinate layout.

use crate::affine::AffinePoint;
use crate::error::{Error, Result};
use crate::field::FieldElement;
use crate::util;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

const TAG_EVEN: u8 = 0x02;
const TAG_ODD: u8 = 0x03;
const TAG_UNCOMPRESSED: u8 = 0x04;
const TAG_HYBRID_EVEN: u8 = 0x06;
const TAG_HYBRID_ODD: u8 = 0x07;

/// 65-byte uncompressed SEC1 encoding: `0x04 || X || Y`.
pub fn encode_uncompressed(p: &AffinePoint) -> [u8; 65] {
    let mut out = [0u8; 65];
    out[0] = TAG_UNCOMPRESSED;
    out[1..33].copy_from_slice(&field_to_be_bytes(&p.x()));
    out[33..65].copy_from_slice(&field_to_be_bytes(&p.y()));
    out
}

/// 33-byte compressed SEC1 encoding: `(0x02 | y_parity) || X`.
pub fn encode_compressed(p: &AffinePoint) -> [u8; 33] {
    let mut out = [0u8; 33];
    let tag = u8::conditional_select(&TAG_EVEN, &TAG_ODD, p.y().is_odd());
    out[0] = tag;
    out[1..33].copy_from_slice(&field_to_be_bytes(&p.x()));
    out
}

/// 65-byte hybrid SEC1 encoding: like uncompressed, but the tag also
/// carries `Y`'s parity so a decoder can validate without a square
/// root.
pub fn encode_hybrid(p: &AffinePoint) -> [u8; 65] {
    let mut out = encode_uncompressed(p);
    out[0] = u8::conditional_select(&TAG_HYBRID_EVEN, &TAG_HYBRID_ODD, p.y().is_odd());
    out
}

/// Decodes any of the uncompressed, compressed, or hybrid SEC1 forms.
pub fn decode_point(bytes: &[u8]) -> Result<AffinePoint> {
    match bytes.first().copied() {
        Some(TAG_UNCOMPRESSED) if bytes.len() == 65 => {
            let x = field_from_be_bytes(bytes[1..33].try_into().unwrap()).ok_or(Error)?;
            let y = field_from_be_bytes(bytes[33..65].try_into().unwrap()).ok_or(Error)?;
            let p = AffinePoint::from_coordinates_unchecked(x, y);
            if p.is_on_curve().unwrap_u8() == 1 {
                Ok(p)
            } else {
                Err(Error)
            }
        }
        Some(tag @ (TAG_HYBRID_EVEN | TAG_HYBRID_ODD)) if bytes.len() == 65 => {
            let x = field_from_be_bytes(bytes[1..33].try_into().unwrap()).ok_or(Error)?;
            let y = field_from_be_bytes(bytes[33..65].try_into().unwrap()).ok_or(Error)?;
            let expected_odd = tag == TAG_HYBRID_ODD;
            if (y.is_odd().unwrap_u8() == 1) != expected_odd {
                return Err(Error);
            }
            let p = AffinePoint::from_coordinates_unchecked(x, y);
            if p.is_on_curve().unwrap_u8() == 1 {
                Ok(p)
            } else {
                Err(Error)
            }
        }
        Some(tag @ (TAG_EVEN | TAG_ODD)) if bytes.len() == 33 => {
            let x = field_from_be_bytes(bytes[1..33].try_into().unwrap()).ok_or(Error)?;
            let y_is_odd = Choice::from((tag == TAG_ODD) as u8);
            AffinePoint::decompress(x, y_is_odd).ok_or(Error)
        }
        _ => Err(Error),
    }
}

/// Reverses the byte order of a 32-byte buffer (big-endian <-> little-endian).
pub fn convert_endianness(input: &[u8; 32]) -> [u8; 32] {
    util::convert_endianness_32(input)
}

fn field_to_be_bytes(fe: &FieldElement) -> [u8; 32] {
    util::limbs_to_be_bytes(&fe.to_raw())
}

fn field_from_be_bytes(bytes: [u8; 32]) -> Option<FieldElement> {
    FieldElement::from_raw(util::be_bytes_to_limbs(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uncompressed_round_trip() {
        let g = AffinePoint::generator();
        let encoded = encode_uncompressed(&g);
        let decoded = decode_point(&encoded).unwrap();
        assert_eq!(decoded.ct_eq(&g).unwrap_u8(), 1);
    }

    #[test]
    fn compressed_round_trip() {
        let g = AffinePoint::generator();
        let encoded = encode_compressed(&g);
        let decoded = decode_point(&encoded).unwrap();
        assert_eq!(decoded.ct_eq(&g).unwrap_u8(), 1);
    }

    #[test]
    fn hybrid_round_trip() {
        let g = AffinePoint::generator();
        let encoded = encode_hybrid(&g);
        let decoded = decode_point(&encoded).unwrap();
        assert_eq!(decoded.ct_eq(&g).unwrap_u8(), 1);
    }

    #[test]
    fn rejects_bad_tag() {
        let mut bytes = [0u8; 65];
        bytes[0] = 0x05;
        assert!(decode_point(&bytes).is_err());
    }

    #[test]
    fn endianness_round_trips() {
        let mut input = [0u8; 32];
        for (i, b) in input.iter_mut().enumerate() {
            *b = i as u8;
        }
        let reversed = convert_endianness(&input);
        let back = convert_endianness(&reversed);
        assert_eq!(input, back);
    }
}
