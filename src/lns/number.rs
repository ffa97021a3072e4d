use std::cmp::Ordering;
use std::fmt;

use rug::Integer;

use crate::bitblock::BitBlock;
use crate::decimal::{self, FormatOptions};
use crate::error::ParseError;
use crate::lns::LnsContext;
use crate::math;
use crate::native::FloatClass;
use crate::real::FormatTag;
use crate::rfloat::RFloat;
use crate::{Real, RoundingContext};

/// A logarithmic number.
///
/// Bit `nbits - 1` is the sign; the remaining `nbits - 1` bits are a
/// two's-complement fixed-point field `L` with `rbits` fractional
/// bits. The represented value is `(-1)^sign * 2^(L / 2^rbits)`.
/// `L = minint` is reserved: with a clear sign bit it encodes zero,
/// with a set sign bit it encodes NaN.
#[derive(Clone, Debug)]
pub struct Lns {
    pub(crate) ctx: LnsContext,
    pub(crate) bits: BitBlock,
}

impl Lns {
    /// Wraps a raw bit pattern in a context.
    pub fn from_bits(ctx: LnsContext, bits: BitBlock) -> Self {
        assert_eq!(bits.width(), ctx.nbits(), "encoding width mismatch");
        Self { ctx, bits }
    }

    /// Wraps the low bits of a `u64` pattern.
    pub fn from_u64_bits(ctx: LnsContext, bits: u64) -> Self {
        let width = ctx.nbits();
        Self::from_bits(ctx, BitBlock::from_u64(width, bits))
    }

    /// The rounding context this number was created under.
    pub fn ctx(&self) -> &LnsContext {
        &self.ctx
    }

    /// Borrows the raw encoding.
    pub fn bits(&self) -> &BitBlock {
        &self.bits
    }

    /// The raw encoding as an [`Integer`] bit pattern.
    pub fn into_bits(self) -> Integer {
        self.bits.to_integer()
    }

    /// The sign bit.
    pub fn sign_bit(&self) -> bool {
        self.bits.get(self.ctx.nbits() - 1)
    }

    /// The signed log field `L` scaled by `2^rbits`
    /// (i.e. the raw two's-complement field as an integer).
    pub fn log_field(&self) -> isize {
        let lbits = self.ctx.nbits() - 1;
        let raw = self.bits.to_integer() & crate::util::bitmask(lbits);
        let raw = raw.to_isize().unwrap();
        if raw >= 1 << (lbits - 1) {
            raw - (1 << lbits)
        } else {
            raw
        }
    }

    /// Returns true if this is the reserved zero encoding.
    pub fn is_zero(&self) -> bool {
        !self.sign_bit() && self.log_field() == self.ctx.log_min()
    }

    /// Returns true if this is the reserved NaN encoding.
    pub fn is_nan(&self) -> bool {
        self.sign_bit() && self.log_field() == self.ctx.log_min()
    }

    /// Approximates the represented value in the unbounded
    /// interchange format with `prec` bits, round-to-odd. Values whose
    /// log is an integer convert exactly.
    pub fn to_rfloat(&self, prec: usize) -> RFloat {
        if self.is_zero() {
            return RFloat::zero();
        }
        if self.is_nan() {
            return RFloat::Nan;
        }

        let l = self.log_field();
        let rbits = self.ctx.rbits();
        // exact when the fractional part of the log is empty
        let magnitude = if l % (1 << rbits) == 0 {
            RFloat::pow2(l >> rbits)
        } else {
            let log = RFloat::Real(l < 0, -(rbits as isize), Integer::from(l.unsigned_abs()));
            math::exp2_rto(&log, prec)
        };
        if self.sign_bit() {
            -magnitude
        } else {
            magnitude
        }
    }

    /// Rounds the value to the nearest `f64`.
    pub fn to_f64(&self) -> f64 {
        self.to_rfloat(64).to_f64()
    }

    /// Rounds an `f64` into this format.
    pub fn from_f64(ctx: LnsContext, x: f64) -> Self {
        ctx.round(&RFloat::from(x))
    }

    /// Parses a decimal scientific-notation string into this format.
    pub fn parse(ctx: LnsContext, s: &str) -> Result<Self, ParseError> {
        let prec = ctx.nbits() + 32;
        let val = decimal::parse_rfloat(s, prec)?;
        Ok(ctx.round(&val))
    }

    /// Formats the value in decimal.
    pub fn format(&self, opts: &FormatOptions) -> String {
        decimal::format_rfloat(&self.to_rfloat(self.ctx.working_prec()), self.ctx.nbits(), opts)
    }
}

impl Real for Lns {
    fn radix() -> usize {
        2
    }

    fn sign(&self) -> bool {
        !self.is_nan() && self.sign_bit()
    }

    fn exp(&self) -> Option<isize> {
        self.to_rfloat(self.ctx.working_prec()).exp()
    }

    fn e(&self) -> Option<isize> {
        self.to_rfloat(self.ctx.working_prec()).e()
    }

    fn n(&self) -> Option<isize> {
        self.to_rfloat(self.ctx.working_prec()).n()
    }

    fn c(&self) -> Option<Integer> {
        self.to_rfloat(self.ctx.working_prec()).c()
    }

    fn p(&self) -> usize {
        self.to_rfloat(self.ctx.working_prec()).p()
    }

    fn is_nar(&self) -> bool {
        self.is_nan()
    }

    fn is_finite(&self) -> bool {
        !self.is_nan()
    }

    fn is_infinite(&self) -> bool {
        false
    }

    fn is_zero(&self) -> bool {
        Lns::is_zero(self)
    }

    fn is_negative(&self) -> Option<bool> {
        if self.is_nan() || self.is_zero() {
            None
        } else {
            Some(self.sign_bit())
        }
    }

    fn is_numerical(&self) -> bool {
        !self.is_nan()
    }
}

impl FormatTag for Lns {
    const TAG: &'static str = "lns";

    fn classify(&self) -> FloatClass {
        if self.is_nan() {
            FloatClass::Nan
        } else if self.is_zero() {
            FloatClass::Zero
        } else {
            FloatClass::Normal
        }
    }
}

impl PartialEq for Lns {
    fn eq(&self, other: &Self) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

impl PartialOrd for Lns {
    /// Sign first, then the log fields; monotone in the value.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.is_nan() || other.is_nan() {
            return None;
        }
        let key = |x: &Lns| -> (i8, isize) {
            if x.is_zero() {
                (0, 0)
            } else if x.sign_bit() {
                (-1, -x.log_field())
            } else {
                (1, x.log_field())
            }
        };
        let (sa, la) = key(self);
        let (sb, lb) = key(other);
        Some(sa.cmp(&sb).then(la.cmp(&lb)))
    }
}

impl fmt::Display for Lns {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.ctx.nbits() / 3 + 2;
        let opts = FormatOptions::new().with_precision(f.precision().unwrap_or(digits));
        write!(f, "{}", self.format(&opts))
    }
}
