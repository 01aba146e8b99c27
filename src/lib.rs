#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]
#![doc = include_str!("../README.md")]

//! Pure Rust, from-scratch NIST P-256 (secp256r1) elliptic-curve
//! arithmetic engine.
//!
//! This crate supplies curve arithmetic only: callers bring their own
//! hash function (to produce ECDSA's `z`) and their own randomness (to
//! produce private keys and nonces). See the module docs below for
//! where each piece lives.

mod affine;
mod error;
mod field;
mod projective;
mod safegcd;
mod scalar;
mod tables;
mod util;

#[cfg(any(feature = "sign", feature = "verify", feature = "keygen", feature = "ecdh", feature = "raw-scalarmult"))]
mod ladder;

#[cfg(any(feature = "sign", feature = "verify"))]
mod ecdsa;

#[cfg(feature = "ecdh")]
mod ecdh;

mod encoding;

pub use affine::AffinePoint;
pub use error::{Error, Result};
pub use field::FieldElement;
pub use projective::ProjectivePoint;
pub use scalar::Scalar;

#[cfg(feature = "sign")]
pub use ecdsa::{sign, sign_step1, sign_step2, SignPrecomp};

#[cfg(feature = "verify")]
pub use ecdsa::verify;

#[cfg(feature = "ecdh")]
pub use ecdh::ecdh;

#[cfg(feature = "to-octet-string")]
pub use encoding::{encode_compressed, encode_hybrid, encode_uncompressed};

#[cfg(feature = "decode-point")]
pub use encoding::decode_point;

pub use encoding::convert_endianness;

/// Derives a public key from a private scalar: `Q = d * G`.
#[cfg(feature = "keygen")]
pub fn keygen(d: &Scalar) -> AffinePoint {
    ladder::scalarmult_base(d).to_affine()
}

/// Raw scalar multiplication `k * P`, constant-time in `k`. `P` must be
/// a valid, non-identity curve point.
#[cfg(feature = "raw-scalarmult")]
pub fn scalarmult(k: &Scalar, p: &AffinePoint) -> Result<AffinePoint> {
    if p.is_on_curve().unwrap_u8() == 0 || p.is_identity().unwrap_u8() == 1 {
        return Err(Error);
    }
    Ok(ladder::scalarmult_variable_base(k, p).to_affine())
}

/// Decompresses `x` and a desired `y` parity into a full curve point.
#[cfg(feature = "decompress-point")]
pub fn decompress_point(x: FieldElement, y_is_odd: subtle::Choice) -> Option<AffinePoint> {
    AffinePoint::decompress(x, y_is_odd)
}
