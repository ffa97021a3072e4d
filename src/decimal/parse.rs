// uninum: a universal numbers library in Rust
//
// decimal/parse.rs
//
// Decimal scientific-notation parsing into the exact intermediate

use rug::ops::Pow;
use rug::Integer;

use crate::error::{ParseError, ParseErrorKind};
use crate::math;
use crate::rfloat::RFloat;
use crate::Real;

/// Largest decimal exponent magnitude accepted by the parser.
/// Enough for every format in this crate with margin; anything larger
/// reports [`ParseErrorKind::ExponentOverflow`].
const MAX_DEC_EXP: i64 = 100_000;

/// Parses `[sign] digits [.digits] [eE [sign] digits]` into an
/// [`RFloat`].
///
/// The mantissa accumulates exactly as an integer. A non-negative net
/// decimal exponent applies as an exact integer power of ten; a
/// negative one applies as a single round-to-odd division at `prec`
/// binary digits, so rounding into any target with at most `prec - 2`
/// bits of precision reproduces the correctly-rounded value with no
/// double-precision contamination.
pub fn parse_rfloat(s: &str, prec: usize) -> Result<RFloat, ParseError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(ParseError::new(ParseErrorKind::Empty, 0));
    }

    let bytes = trimmed.as_bytes();
    let mut pos = 0usize;
    let mut negative = false;

    if bytes[pos] == b'+' || bytes[pos] == b'-' {
        negative = bytes[pos] == b'-';
        pos += 1;
    }

    let mut mantissa = Integer::from(0);
    let mut found_digit = false;
    let mut decimal_seen = false;
    let mut decimal_digits: i64 = 0;
    let mut exponent: i64 = 0;
    let mut in_exponent = false;

    while pos < bytes.len() {
        let c = bytes[pos];
        if c.is_ascii_digit() {
            found_digit = true;
            mantissa *= 10u32;
            mantissa += (c - b'0') as u32;
            if decimal_seen {
                decimal_digits += 1;
            }
        } else if c == b'.' && !decimal_seen && !in_exponent {
            decimal_seen = true;
        } else if (c == b'e' || c == b'E') && found_digit {
            pos += 1;
            in_exponent = true;
            break;
        } else {
            return Err(ParseError::new(ParseErrorKind::BadChar, pos));
        }
        pos += 1;
    }

    if !found_digit {
        return Err(ParseError::new(ParseErrorKind::MissingDigits, pos));
    }

    if in_exponent {
        let mut exp_negative = false;
        if pos < bytes.len() && (bytes[pos] == b'+' || bytes[pos] == b'-') {
            exp_negative = bytes[pos] == b'-';
            pos += 1;
        }
        let start = pos;
        while pos < bytes.len() && bytes[pos].is_ascii_digit() {
            exponent = exponent * 10 + (bytes[pos] - b'0') as i64;
            if exponent > MAX_DEC_EXP {
                return Err(ParseError::new(ParseErrorKind::ExponentOverflow, pos));
            }
            pos += 1;
        }
        if pos == start {
            return Err(ParseError::new(ParseErrorKind::MissingExponent, pos));
        }
        if pos != bytes.len() {
            return Err(ParseError::new(ParseErrorKind::BadChar, pos));
        }
        if exp_negative {
            exponent = -exponent;
        }
    }

    let net_exp = exponent - decimal_digits;
    if negative {
        mantissa = -mantissa;
    }
    let m = RFloat::Real(mantissa < 0, 0, mantissa.abs()).canonicalize();

    let val = if net_exp == 0 || m.is_zero() {
        m
    } else if net_exp > 0 {
        // exact scaling by 10^net_exp
        let pow10 = Integer::from(10).pow(net_exp as u32);
        m.mul_exact(&RFloat::Real(false, 0, pow10))
    } else {
        // one rounded operation: divide by the exact power of ten
        let pow10 = Integer::from(10).pow((-net_exp) as u32);
        math::div_rto(&m, &RFloat::Real(false, 0, pow10), prec)
    };

    Ok(val)
}
