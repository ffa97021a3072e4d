use std::cmp::Ordering;
use std::fmt;
use std::ops::Neg;

use num_traits::Zero;
use rug::Integer;

use crate::bitblock::BitBlock;
use crate::cfloat::CFloatContext;
use crate::decimal::{self, FormatOptions};
use crate::error::ParseError;
use crate::native::FloatClass;
use crate::real::FormatTag;
use crate::rfloat::RFloat;
use crate::triple::TripleOp;
use crate::{Real, RoundingContext};

/// A classic parameterized floating-point value.
///
/// The encoding is a [`BitBlock`] of `nbits` bits laid out msb to lsb
/// as 1 sign bit, `es` exponent bits, and `nbits - 1 - es` fraction
/// bits; bit 0 is the fraction lsb. Storage limbs are little-endian.
/// Encoding classes:
///
/// - all-zero exponent: zero (fraction 0) or subnormal,
/// - all-ones exponent: infinity/NaN when the context reserves
///   supernormals, otherwise extended normal range (with the single
///   all-ones pattern kept as NaN),
/// - anything else: a normal value with a hidden significand bit and
///   bias `2^(es-1) - 1`.
#[derive(Clone, Debug)]
pub struct CFloat {
    pub(crate) ctx: CFloatContext,
    pub(crate) bits: BitBlock,
}

impl CFloat {
    /// Wraps a raw bit pattern in a context.
    pub fn from_bits(ctx: CFloatContext, bits: BitBlock) -> Self {
        assert_eq!(bits.width(), ctx.nbits(), "encoding width mismatch");
        Self { ctx, bits }
    }

    /// Wraps the low bits of a `u64` pattern.
    pub fn from_u64_bits(ctx: CFloatContext, bits: u64) -> Self {
        let width = ctx.nbits();
        Self::from_bits(ctx, BitBlock::from_u64(width, bits))
    }

    /// Builds an encoding from a sign, a pre-shifted exponent field,
    /// and a fraction field.
    pub(crate) fn from_fields(
        ctx: CFloatContext,
        sign: bool,
        efield: &Integer,
        frac: &Integer,
    ) -> Self {
        let nbits = ctx.nbits();
        let mut composed = efield.clone() | frac.clone();
        if sign {
            composed |= Integer::from(1) << (nbits - 1) as u32;
        }
        Self::from_bits(ctx, BitBlock::from_integer(nbits, &composed))
    }

    /// The rounding context this value was created under.
    pub fn ctx(&self) -> &CFloatContext {
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
    pub fn sign_field(&self) -> bool {
        self.bits.get(self.ctx.nbits() - 1)
    }

    /// The (biased) exponent field value.
    pub fn exp_field(&self) -> isize {
        let fbits = self.ctx.fbits();
        let mask = crate::util::bitmask(self.ctx.es());
        let field = (self.bits.to_integer() >> fbits as u32) & mask;
        field.to_isize().unwrap()
    }

    /// The fraction field value.
    pub fn frac_field(&self) -> Integer {
        self.bits.to_integer() & crate::util::bitmask(self.ctx.fbits())
    }

    /// Decodes into the unbounded interchange format.
    pub fn to_rfloat(&self) -> RFloat {
        self.ctx.decode(self, TripleOp::Add).to_rfloat()
    }

    /// Rounds the value to the nearest `f64`.
    pub fn to_f64(&self) -> f64 {
        self.to_rfloat().to_f64()
    }

    /// Rounds an `f64` into this format.
    pub fn from_f64(ctx: CFloatContext, x: f64) -> Self {
        ctx.round(&RFloat::from(x))
    }

    /// Returns true if this value is NaN.
    pub fn is_nan(&self) -> bool {
        let top = (1isize << self.ctx.es()) - 1;
        if self.exp_field() != top {
            return false;
        }
        if self.ctx.has_supernormals() {
            !self.frac_field().is_zero()
        } else {
            self.frac_field() == crate::util::bitmask(self.ctx.fbits())
        }
    }

    /// Returns true if this value is an infinity encoding.
    pub fn is_infinite(&self) -> bool {
        let top = (1isize << self.ctx.es()) - 1;
        self.ctx.has_supernormals() && self.exp_field() == top && self.frac_field().is_zero()
    }

    /// Returns true if this value is a signed zero.
    pub fn is_zero(&self) -> bool {
        self.exp_field() == 0 && self.frac_field().is_zero()
    }

    /// Returns true if this value is a subnormal encoding.
    pub fn is_subnormal(&self) -> bool {
        self.exp_field() == 0 && !self.frac_field().is_zero()
    }

    /// Returns true if this value is finite.
    pub fn is_finite(&self) -> bool {
        !self.is_nan() && !self.is_infinite()
    }

    /// Parses a decimal scientific-notation string into this format.
    pub fn parse(ctx: CFloatContext, s: &str) -> Result<Self, ParseError> {
        let prec = ctx.fbits() + 32;
        let val = decimal::parse_rfloat(s, prec)?;
        Ok(ctx.round(&val))
    }

    /// Formats the value in decimal.
    pub fn format(&self, opts: &FormatOptions) -> String {
        decimal::format_rfloat(&self.to_rfloat(), self.ctx.fbits() + 1, opts)
    }
}

impl Neg for CFloat {
    type Output = CFloat;

    fn neg(self) -> CFloat {
        let mut r = self;
        let top = r.ctx.nbits() - 1;
        let s = r.bits.get(top);
        r.bits.set(top, !s);
        r
    }
}

impl Real for CFloat {
    fn radix() -> usize {
        2
    }

    fn sign(&self) -> bool {
        self.sign_field()
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
        CFloat::is_finite(self)
    }

    fn is_infinite(&self) -> bool {
        CFloat::is_infinite(self)
    }

    fn is_zero(&self) -> bool {
        CFloat::is_zero(self)
    }

    fn is_negative(&self) -> Option<bool> {
        if self.is_nan() || self.is_zero() {
            None
        } else {
            Some(self.sign_field())
        }
    }

    fn is_numerical(&self) -> bool {
        !self.is_nan()
    }
}

impl FormatTag for CFloat {
    const TAG: &'static str = "cfloat";

    fn classify(&self) -> FloatClass {
        if self.is_nan() {
            FloatClass::Nan
        } else if self.is_infinite() {
            FloatClass::Infinite
        } else if self.is_zero() {
            FloatClass::Zero
        } else if self.is_subnormal() {
            FloatClass::Subnormal
        } else {
            FloatClass::Normal
        }
    }
}

impl PartialEq for CFloat {
    fn eq(&self, other: &Self) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

impl PartialOrd for CFloat {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.is_nan() || other.is_nan() {
            return None;
        }
        self.to_rfloat().partial_cmp(&other.to_rfloat())
    }
}

impl fmt::Display for CFloat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = (self.ctx.fbits() + 1) / 3 + 2;
        let opts = FormatOptions::new().with_precision(f.precision().unwrap_or(digits));
        write!(f, "{}", self.format(&opts))
    }
}
