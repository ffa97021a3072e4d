use std::cmp::Ordering;
use std::fmt;

use rug::Integer;

use crate::bitblock::BitBlock;
use crate::decimal::{self, FormatOptions};
use crate::error::ParseError;
use crate::native::FloatClass;
use crate::real::FormatTag;
use crate::rfloat::RFloat;
use crate::takum::TakumContext;
use crate::{Real, RoundingContext};

/// A takum number.
///
/// The storage is the raw `nbits`-wide encoding, decoded on demand by
/// the regime schedule: msb to lsb the fields are sign, direction
/// `D`, a three-bit regime `R`, an exponent field of `r = D ? R : 7 - R`
/// bits, and fraction. With `A` the exponent field value,
/// `a = 2^r - 1 + A`, `b = D ? 0 : 3 * 2^r - 2`, and `s` the sign,
/// the value is `((1 - 3s) + f) * 2^e` where `e = (1 - 2s)(a - b + s)`
/// and `f` is the fraction read as `0.ffff...`.
#[derive(Clone, Debug)]
pub struct Takum {
    pub(crate) ctx: TakumContext,
    pub(crate) bits: BitBlock,
}

impl Takum {
    /// Wraps a raw bit pattern in a context.
    pub fn from_bits(ctx: TakumContext, bits: BitBlock) -> Self {
        assert_eq!(bits.width(), ctx.nbits(), "encoding width mismatch");
        Self { ctx, bits }
    }

    /// Wraps the low bits of a `u64` pattern.
    pub fn from_u64_bits(ctx: TakumContext, bits: u64) -> Self {
        let width = ctx.nbits();
        Self::from_bits(ctx, BitBlock::from_u64(width, bits))
    }

    /// The rounding context this number was created under.
    pub fn ctx(&self) -> &TakumContext {
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

    /// Returns true if this takum is the zero encoding
    /// (all bits clear).
    pub fn is_zero(&self) -> bool {
        self.bits.is_zero()
    }

    /// Returns true if this takum is NaR
    /// (sign bit set, all others clear).
    pub fn is_nar(&self) -> bool {
        let nbits = self.ctx.nbits();
        self.bits.get(nbits - 1) && !self.bits.any_below(nbits - 1)
    }

    /// Decodes the represented value exactly into the unbounded
    /// interchange format.
    pub fn to_rfloat(&self) -> RFloat {
        if self.is_zero() {
            return RFloat::zero();
        }
        if self.is_nar() {
            return RFloat::Nan;
        }

        let nbits = self.ctx.nbits();
        let word = &self.bits;

        let s = word.get(nbits - 1);
        let d = word.get(nbits - 2);

        // three-bit regime
        let mut regime = 0usize;
        for i in 0..3 {
            regime <<= 1;
            if word.get(nbits - 3 - i) {
                regime |= 1;
            }
        }
        let r = if d { regime } else { 7 - regime };

        // exponent field: r bits, truncated by the width if needed
        let mut a_field = 0isize;
        let mut idx = nbits as isize - 6;
        for _ in 0..r {
            a_field <<= 1;
            if idx >= 0 {
                if word.get(idx as usize) {
                    a_field |= 1;
                }
                idx -= 1;
            }
        }

        let a = ((1isize << r) - 1) + a_field;
        let b = if d { 0 } else { 3 * (1isize << r) - 2 };
        let sgn = if s { 1isize } else { 0 };
        let e = (1 - 2 * sgn) * (a - b + sgn);

        // fraction: whatever is left
        let fbits = (idx + 1).max(0) as usize;
        let frac = if fbits > 0 {
            word.to_integer() & crate::util::bitmask(fbits)
        } else {
            Integer::from(0)
        };

        // value = ((1 - 3s) + f) * 2^e, with f = frac / 2^fbits
        // significand = (1 - 3s) * 2^fbits + frac, signed
        let lead = Integer::from(1 - 3 * sgn) << fbits as u32;
        let m = lead + frac;
        let negative = m < 0;
        let c = m.abs();
        RFloat::Real(negative, e - fbits as isize, c).canonicalize()
    }

    /// Rounds the value to the nearest `f64`.
    pub fn to_f64(&self) -> f64 {
        if self.is_nar() {
            return f64::NAN;
        }
        self.to_rfloat().to_f64()
    }

    /// Rounds an `f64` into this format.
    pub fn from_f64(ctx: TakumContext, x: f64) -> Self {
        ctx.round(&RFloat::from(x))
    }

    /// Parses a decimal scientific-notation string into this format.
    pub fn parse(ctx: TakumContext, s: &str) -> Result<Self, ParseError> {
        let prec = ctx.nbits() + 32;
        let val = decimal::parse_rfloat(s, prec)?;
        Ok(ctx.round(&val))
    }

    /// Formats the value in decimal.
    pub fn format(&self, opts: &FormatOptions) -> String {
        decimal::format_rfloat(&self.to_rfloat(), self.ctx.nbits(), opts)
    }
}

impl Real for Takum {
    fn radix() -> usize {
        2
    }

    fn sign(&self) -> bool {
        !self.is_zero() && !self.is_nar() && self.bits.get(self.ctx.nbits() - 1)
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
        Takum::is_nar(self)
    }

    fn is_finite(&self) -> bool {
        !Takum::is_nar(self)
    }

    fn is_infinite(&self) -> bool {
        false
    }

    fn is_zero(&self) -> bool {
        Takum::is_zero(self)
    }

    fn is_negative(&self) -> Option<bool> {
        if Takum::is_zero(self) || Takum::is_nar(self) {
            None
        } else {
            Some(self.bits.get(self.ctx.nbits() - 1))
        }
    }

    fn is_numerical(&self) -> bool {
        !Takum::is_nar(self)
    }
}

impl FormatTag for Takum {
    const TAG: &'static str = "takum";

    fn classify(&self) -> FloatClass {
        if self.is_nar() {
            FloatClass::Nan
        } else if self.is_zero() {
            FloatClass::Zero
        } else {
            FloatClass::Normal
        }
    }
}

impl PartialEq for Takum {
    fn eq(&self, other: &Self) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

impl PartialOrd for Takum {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.is_nar() || other.is_nar() {
            return None;
        }
        self.to_rfloat().partial_cmp(&other.to_rfloat())
    }
}

impl fmt::Display for Takum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.ctx.nbits() / 3 + 2;
        let opts = FormatOptions::new().with_precision(f.precision().unwrap_or(digits));
        write!(f, "{}", self.format(&opts))
    }
}
