use std::cmp::Ordering;
use std::fmt;

use rug::Integer;

use crate::decimal::FormatOptions;
use crate::eft;
use crate::error::{ArithError, ParseError, ParseErrorKind};
use crate::native::{self, FloatClass};
use crate::real::FormatTag;
use crate::rfloat::RFloat;
use crate::Real;

/// Default number of limbs (about 127 decimal digits).
pub(crate) const DEFAULT_LIMBS: usize = 8;

/// An adaptive-precision expansion.
///
/// The represented value is the exact sum of the limbs, stored in
/// decreasing magnitude order with the non-overlap invariant of
/// [`FloatCascade`][crate::cascade::FloatCascade]. The limb vector
/// always holds at least one limb; special values (NaN, infinity)
/// live in a single leading limb.
#[derive(Clone, Debug)]
pub struct EReal {
    pub(crate) limbs: Vec<f64>,
    pub(crate) max_limbs: usize,
}

impl EReal {
    /// Constructs zero with the default limb bound.
    pub fn new() -> Self {
        Self {
            limbs: vec![0.0],
            max_limbs: DEFAULT_LIMBS,
        }
    }

    /// Constructs zero with a custom limb bound.
    ///
    /// # Panics
    ///
    /// Panics if `max_limbs` is zero or exceeds
    /// [`eft::MAX_LIMBS`].
    pub fn with_max_limbs(max_limbs: usize) -> Self {
        assert!(
            (1..=eft::MAX_LIMBS).contains(&max_limbs),
            "max_limbs must be between 1 and {}: the last limb would \
             underflow below the normal range and break the \
             non-overlapping invariant",
            eft::MAX_LIMBS
        );
        Self {
            limbs: vec![0.0],
            max_limbs,
        }
    }

    /// Constructs an expansion holding a native double.
    pub fn from_f64(x: f64) -> Self {
        let mut r = Self::new();
        r.limbs[0] = x;
        r
    }

    /// The limb bound of this expansion.
    pub fn max_limbs(&self) -> usize {
        self.max_limbs
    }

    /// Borrows the limbs in decreasing magnitude order.
    pub fn limbs(&self) -> &[f64] {
        &self.limbs
    }

    /// Rounds the represented value to the nearest `f64`.
    pub fn to_f64(&self) -> f64 {
        let mut acc = 0.0;
        for &x in self.limbs.iter().rev() {
            acc += x;
        }
        acc
    }

    /// Converts the exact sum of limbs into an unbounded float.
    pub fn to_rfloat(&self) -> RFloat {
        if self.is_nan() {
            return RFloat::Nan;
        }
        if self.is_infinite() {
            return if self.limbs[0] > 0.0 {
                RFloat::PosInfinity
            } else {
                RFloat::NegInfinity
            };
        }
        let mut acc = RFloat::zero();
        for &x in self.limbs.iter() {
            acc = acc.add_exact(&RFloat::from(x));
        }
        acc
    }

    /// Replaces the limb vector, renormalizing and truncating to the
    /// limb bound.
    pub(crate) fn assign_expansion(&mut self, xs: Vec<f64>) {
        let mut norm = eft::renormalize(&xs);
        norm.truncate(self.max_limbs);
        if norm.is_empty() {
            norm.push(0.0);
        }
        self.limbs = norm;
    }

    /// Sets this expansion to zero.
    pub fn set_zero(&mut self) {
        self.limbs.clear();
        self.limbs.push(0.0);
    }

    /// Sets this expansion to quiet NaN.
    pub fn set_nan(&mut self) {
        self.limbs.clear();
        self.limbs.push(f64::NAN);
    }

    /// Sets this expansion to a signed infinity.
    pub fn set_infinity(&mut self, sign: bool) {
        self.limbs.clear();
        self.limbs.push(if sign {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    /// Returns true if the value is zero.
    pub fn is_zero(&self) -> bool {
        self.limbs[0] == 0.0
    }

    /// Returns true if the value is one.
    pub fn is_one(&self) -> bool {
        self.limbs[0] == 1.0 && self.limbs.len() == 1
    }

    /// Returns true if the value is strictly positive.
    pub fn is_pos(&self) -> bool {
        self.limbs[0] > 0.0
    }

    /// Returns true if the value is strictly negative.
    pub fn is_neg(&self) -> bool {
        self.limbs[0] < 0.0
    }

    /// Returns true if the leading limb is NaN.
    pub fn is_nan(&self) -> bool {
        self.limbs[0].is_nan()
    }

    /// Returns true if the leading limb is infinite.
    pub fn is_infinite(&self) -> bool {
        self.limbs[0].is_infinite()
    }

    /// Returns true if the value is finite.
    pub fn is_finite(&self) -> bool {
        self.limbs[0].is_finite()
    }

    /// Compares two expansions: signs decide first, then the aligned
    /// limbs lexicographically.
    pub fn compare_adaptive(&self, other: &Self) -> Option<Ordering> {
        if self.is_nan() || other.is_nan() {
            return None;
        }

        // signs decide first
        let sa = self.limbs[0];
        let sb = other.limbs[0];
        if sa < 0.0 && sb >= 0.0 {
            return Some(Ordering::Less);
        }
        if sa >= 0.0 && sb < 0.0 {
            return Some(Ordering::Greater);
        }

        // lexicographic comparison of aligned limbs
        let n = self.limbs.len().max(other.limbs.len());
        for i in 0..n {
            let a = self.limbs.get(i).copied().unwrap_or(0.0);
            let b = other.limbs.get(i).copied().unwrap_or(0.0);
            match a.partial_cmp(&b) {
                Some(Ordering::Equal) => continue,
                ord => return ord,
            }
        }
        Some(Ordering::Equal)
    }

    /// Parses a decimal scientific-notation string, accumulating
    /// digits in the expansion's own arithmetic so no double-precision
    /// contamination occurs.
    pub fn parse(s: &str) -> Result<Self, ParseError> {
        let s_trim = s.trim();
        if s_trim.is_empty() {
            return Err(ParseError::new(ParseErrorKind::Empty, 0));
        }

        let bytes = s_trim.as_bytes();
        let mut pos = 0usize;
        let mut negative = false;

        if bytes[pos] == b'+' || bytes[pos] == b'-' {
            negative = bytes[pos] == b'-';
            pos += 1;
        }

        let mut result = Self::new();
        let ten = Self::from_f64(10.0);
        let mut found_digit = false;
        let mut decimal_seen = false;
        let mut decimal_digits: i64 = 0;
        let mut exponent: i64 = 0;
        let mut in_exponent = false;

        while pos < bytes.len() {
            let c = bytes[pos];
            if c.is_ascii_digit() {
                found_digit = true;
                // result = result * 10 + digit
                result = result.mul(&ten);
                result = result.add(&Self::from_f64((c - b'0') as f64));
                if decimal_seen {
                    decimal_digits += 1;
                }
            } else if c == b'.' && !decimal_seen {
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
            let mut found_exp_digit = false;
            while pos < bytes.len() && bytes[pos].is_ascii_digit() {
                found_exp_digit = true;
                exponent = exponent
                    .checked_mul(10)
                    .and_then(|e| e.checked_add((bytes[pos] - b'0') as i64))
                    .ok_or(ParseError::new(ParseErrorKind::ExponentOverflow, pos))?;
                if exponent > 400 {
                    return Err(ParseError::new(ParseErrorKind::ExponentOverflow, pos));
                }
                pos += 1;
            }
            if !found_exp_digit {
                return Err(ParseError::new(ParseErrorKind::MissingExponent, pos));
            }
            if pos != bytes.len() {
                return Err(ParseError::new(ParseErrorKind::BadChar, pos));
            }
            if exp_negative {
                exponent = -exponent;
            }
        }

        exponent -= decimal_digits;

        // apply the decimal exponent with pown(10, exp):
        // repeated squaring in the target's own arithmetic
        if exponent != 0 {
            result = result.mul(&Self::pown(&ten, exponent));
        }

        if negative {
            result = result.neg();
        }

        Ok(result)
    }

    /// Throwing-mode parse.
    pub fn checked_parse(s: &str) -> Result<Self, ArithError> {
        Self::parse(s).map_err(ArithError::from)
    }

    /// Integer power by repeated squaring, exact up to the limb bound.
    pub fn pown(base: &Self, exp: i64) -> Self {
        if exp == 0 {
            return Self::from_f64(1.0);
        }
        let mut e = exp.unsigned_abs();
        let mut base = base.clone();
        let mut acc = Self::from_f64(1.0);
        while e > 0 {
            if e & 1 == 1 {
                acc = acc.mul(&base);
            }
            e >>= 1;
            if e > 0 {
                base = base.mul(&base);
            }
        }
        if exp < 0 {
            Self::from_f64(1.0).div(&acc)
        } else {
            acc
        }
    }

    /// Formats the represented value in decimal.
    pub fn format(&self, opts: &FormatOptions) -> String {
        crate::decimal::format_rfloat(&self.to_rfloat(), 53 * self.max_limbs, opts)
    }
}

impl Default for EReal {
    fn default() -> Self {
        Self::new()
    }
}

impl From<f64> for EReal {
    fn from(x: f64) -> Self {
        Self::from_f64(x)
    }
}

impl PartialEq for EReal {
    fn eq(&self, other: &Self) -> bool {
        self.compare_adaptive(other) == Some(Ordering::Equal)
    }
}

impl PartialOrd for EReal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare_adaptive(other)
    }
}

impl Real for EReal {
    fn radix() -> usize {
        2
    }

    fn sign(&self) -> bool {
        self.limbs[0].is_sign_negative()
    }

    fn exp(&self) -> Option<isize> {
        self.to_rfloat().exp()
    }

    fn e(&self) -> Option<isize> {
        self.to_rfloat().e()
    }

    fn n(&self) -> Option<isize> {
        self.to_rfloat().n()
    }

    fn c(&self) -> Option<Integer> {
        self.to_rfloat().c()
    }

    fn p(&self) -> usize {
        self.to_rfloat().p()
    }

    fn is_nar(&self) -> bool {
        self.is_nan() || self.is_infinite()
    }

    fn is_finite(&self) -> bool {
        EReal::is_finite(self)
    }

    fn is_infinite(&self) -> bool {
        EReal::is_infinite(self)
    }

    fn is_zero(&self) -> bool {
        EReal::is_zero(self)
    }

    fn is_negative(&self) -> Option<bool> {
        if self.is_nan() || self.is_zero() {
            None
        } else {
            Some(self.limbs[0] < 0.0)
        }
    }

    fn is_numerical(&self) -> bool {
        !self.is_nan()
    }
}

impl FormatTag for EReal {
    const TAG: &'static str = "ereal";

    fn classify(&self) -> FloatClass {
        native::decode_f64(self.limbs[0]).classify()
    }
}

impl fmt::Display for EReal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let opts = FormatOptions::new().with_precision(f.precision().unwrap_or(32));
        write!(f, "{}", self.format(&opts))
    }
}
