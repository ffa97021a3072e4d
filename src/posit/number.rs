use std::cmp::Ordering;
use std::fmt;

use rug::Integer;

use crate::bitblock::BitBlock;
use crate::decimal::{self, FormatOptions};
use crate::error::ParseError;
use crate::native::FloatClass;
use crate::posit::PositContext;
use crate::real::FormatTag;
use crate::rfloat::RFloat;
use crate::{Real, RoundingContext};

/// Posit number encoding viewed as an enumeration.
/// Unlike [`Posit`], [`PositVal`] represents only numerical data:
/// the sign, the regime `k`, the exponent `e` in `[0, 2^es)`, and the
/// significand `c` with its hidden bit.
#[derive(Clone, Debug)]
pub(crate) enum PositVal {
    /// Exact zero
    Zero,
    /// Finite, non-zero value `(-1)^s * (c / 2^(p-1)) * 2^(k * 2^es + e)`
    NonZero(bool, isize, isize, Integer),
    /// Not a real or undefined
    Nar,
}

/// Posit number format.
///
/// The storage is the raw `nbits`-wide encoding; all numerical
/// interpretation goes through [`Posit::decode`]. The associated
/// [`RoundingContext`][crate::RoundingContext] implementation is
/// [`PositContext`].
#[derive(Clone, Debug)]
pub struct Posit {
    pub(crate) ctx: PositContext,
    pub(crate) bits: BitBlock,
}

impl Posit {
    /// Wraps a raw bit pattern in a context.
    pub fn from_bits(ctx: PositContext, bits: BitBlock) -> Self {
        assert_eq!(bits.width(), ctx.nbits(), "encoding width mismatch");
        Self { ctx, bits }
    }

    /// Wraps the low bits of a `u64` pattern.
    pub fn from_u64_bits(ctx: PositContext, bits: u64) -> Self {
        let width = ctx.nbits();
        Self::from_bits(ctx, BitBlock::from_u64(width, bits))
    }

    /// The rounding context this number was created under.
    pub fn ctx(&self) -> &PositContext {
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

    /// Returns true if this posit is the zero encoding.
    pub fn is_zero(&self) -> bool {
        self.bits.is_zero()
    }

    /// Returns true if this posit is NaR.
    pub fn is_nar(&self) -> bool {
        let nbits = self.ctx.nbits();
        self.bits.get(nbits - 1) && !self.bits.any_below(nbits - 1)
    }

    /// Splits the encoding into its numerical fields: strips the sign
    /// by two's-complementing a negative pattern, counts the regime
    /// run, then takes up to `es` exponent bits (zero-padded on the
    /// right when the run truncates them) and the remaining fraction.
    pub(crate) fn decode(&self) -> PositVal {
        let nbits = self.ctx.nbits();
        let es = self.ctx.es();

        if self.is_zero() {
            return PositVal::Zero;
        }
        if self.is_nar() {
            return PositVal::Nar;
        }

        let sign = self.bits.get(nbits - 1);
        let word = if sign {
            // two's complement of the whole word
            let (compl, _) = BitBlock::zero(nbits).sub_borrow(&self.bits);
            compl
        } else {
            self.bits.clone()
        };

        // count the regime run below the sign position
        let run_bit = word.get(nbits - 2);
        let mut runlen = 1usize;
        let mut idx = nbits as isize - 3;
        while idx >= 0 && word.get(idx as usize) == run_bit {
            runlen += 1;
            idx -= 1;
        }
        let k = if run_bit {
            runlen as isize - 1
        } else {
            -(runlen as isize)
        };
        // skip the terminator bit, if the run did not hit the end
        if idx >= 0 {
            idx -= 1;
        }

        // exponent bits, zero-padded on the right if truncated
        let mut e = 0isize;
        for _ in 0..es {
            e <<= 1;
            if idx >= 0 {
                if word.get(idx as usize) {
                    e |= 1;
                }
                idx -= 1;
            }
        }

        // remaining bits are the fraction; prepend the hidden bit
        let mbits = (idx + 1).max(0) as usize;
        let frac = if mbits > 0 {
            word.to_integer() & crate::util::bitmask(mbits)
        } else {
            Integer::from(0)
        };
        let c = frac + (Integer::from(1) << mbits as u32);

        PositVal::NonZero(sign, k, e, c)
    }

    /// Decodes into the unbounded interchange format.
    pub fn to_rfloat(&self) -> RFloat {
        match self.decode() {
            PositVal::Zero => RFloat::zero(),
            PositVal::Nar => RFloat::Nan,
            PositVal::NonZero(s, k, e, c) => {
                let p = c.significant_bits() as isize;
                let scale = k * self.ctx.rscale() + e;
                // c carries p-1 fraction bits below the hidden bit
                RFloat::Real(s, scale - (p - 1), c)
            }
        }
    }

    /// Rounds the value to the nearest `f64`.
    pub fn to_f64(&self) -> f64 {
        if self.is_nar() {
            return f64::NAN;
        }
        self.to_rfloat().to_f64()
    }

    /// Rounds an `f64` into this format.
    pub fn from_f64(ctx: PositContext, x: f64) -> Self {
        ctx.round(&RFloat::from(x))
    }

    /// Parses a decimal scientific-notation string into this format.
    pub fn parse(ctx: PositContext, s: &str) -> Result<Self, ParseError> {
        let prec = ctx.nbits() + 32;
        let val = decimal::parse_rfloat(s, prec)?;
        Ok(ctx.round(&val))
    }

    /// Formats the value in decimal.
    pub fn format(&self, opts: &FormatOptions) -> String {
        decimal::format_rfloat(&self.to_rfloat(), self.ctx.nbits(), opts)
    }
}

impl Real for Posit {
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
        Posit::is_nar(self)
    }

    fn is_finite(&self) -> bool {
        !Posit::is_nar(self)
    }

    fn is_infinite(&self) -> bool {
        false
    }

    fn is_zero(&self) -> bool {
        Posit::is_zero(self)
    }

    fn is_negative(&self) -> Option<bool> {
        if Posit::is_zero(self) || Posit::is_nar(self) {
            None
        } else {
            Some(self.bits.get(self.ctx.nbits() - 1))
        }
    }

    fn is_numerical(&self) -> bool {
        !Posit::is_nar(self)
    }
}

impl FormatTag for Posit {
    const TAG: &'static str = "posit";

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

impl PartialEq for Posit {
    fn eq(&self, other: &Self) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

impl PartialOrd for Posit {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.is_nar() || other.is_nar() {
            return None;
        }
        self.to_rfloat().partial_cmp(&other.to_rfloat())
    }
}

impl fmt::Display for Posit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.ctx.nbits() / 3 + 2;
        let opts = FormatOptions::new().with_precision(f.precision().unwrap_or(digits));
        write!(f, "{}", self.format(&opts))
    }
}
