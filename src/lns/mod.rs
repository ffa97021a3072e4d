//! Logarithmic number system.
//!
//! This module implements signed base-2 logarithmic numbers with
//! [`LnsContext`]. The associated storage type is [`Lns`]: a sign bit
//! followed by a two's-complement fixed-point exponent field `L` with
//! `rbits` fractional bits, representing `(-1)^s * 2^(L / 2^rbits)`.
//!
//! Multiplication and division are exact log-field adds and subtracts
//! (up to saturation); addition and subtraction have no closed form in
//! the log domain and route through the unbounded intermediate with
//! MPFR's base-2 exponential and logarithm under round-to-odd.
//!
//! Two encodings are reserved: `{sign=0, L=minint}` is the number
//! zero and `{sign=1, L=minint}` is NaN. There is no infinity; the
//! range tapers symmetrically by construction.

mod number;
mod ops;
mod round;

pub use number::Lns;
pub use round::LnsContext;
