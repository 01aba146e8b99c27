//! Error type.

use core::fmt::{self, Display};

/// Opaque error returned by every fallible operation in this crate.
///
/// Carries no detail on purpose: whether a failure came from a
/// range check, a curve-membership check, or an ECDSA `r = 0`/`s = 0`
/// outcome must never be distinguishable by a caller, since the inputs
/// that trigger each are themselves data an attacker may control.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Error;

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("p256 operation failed")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Convenience alias for this crate's `Result` type.
pub type Result<T> = core::result::Result<T, Error>;
