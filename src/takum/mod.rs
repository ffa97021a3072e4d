//! Takum tapered floating-point numbers.
//!
//! This module implements takums with [`TakumContext`]. The
//! associated storage type is [`Takum`]: a sign bit, a direction bit,
//! a fixed three-bit regime, a regime-dependent exponent field of
//! `r = D ? R : 7 - R` bits, and fraction bits in whatever is left.
//! The fixed-width regime caps the exponent range at `2^±254` while
//! keeping the taper much flatter than a posit's.
//!
//! Zero is the all-zeros pattern and NaR is the sign bit alone, and
//! negation is a two's complement of the whole word, exactly as with
//! posits. Arithmetic has no legacy to lean on: operands convert
//! exactly into the unbounded interchange format, the operation
//! happens there, and the result rounds back through the encoding's
//! bit stream.

mod number;
mod ops;
mod round;

pub use number::Takum;
pub use round::TakumContext;
