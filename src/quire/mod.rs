/*!
Wide fixed-point accumulators for exact dot products.

A [`Quire`] is a two's-complement fixed-point register wide enough to
accumulate every product of two values of its source format without
rounding. Its width splits into three regions: `capacity` guard bits
on top (room for `2^capacity` accumulations), an `upper` integer
region, and a `lower` fraction region; one more bit carries the sign.

Repeated `+=` into a quire is associative up to the register width,
which is the property that makes exact dot products possible: the
single rounding happens when the accumulated value leaves the quire.

Products or values whose scale falls outside the fixed-point range
reject with [`ArithError::OperandTooLarge`] or
[`ArithError::OperandTooSmall`]; the quire has no silent mode.
*/

use rug::Integer;

use crate::bitblock::BitBlock;
use crate::cfloat::CFloatContext;
use crate::error::ArithError;
use crate::posit::PositContext;
use crate::rfloat::RFloat;
use crate::triple::{BlockTriple, TripleOp};
use crate::{Real, RoundingContext};

/// Geometry of a quire register.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuireContext {
    /// guard bits above the integer region
    capacity: usize,
    /// bits on either side of the fixed point
    half_range: usize,
}

impl QuireContext {
    /// Default capacity: room for `2^30` accumulations.
    pub const DEFAULT_CAPACITY: usize = 30;

    /// Constructs a quire geometry for values whose scale stays in
    /// `[-max_scale, max_scale]` with `sig_bits` significand bits.
    /// A product of two such values needs twice that range.
    pub fn new(max_scale: usize, sig_bits: usize, capacity: usize) -> Self {
        let half_range = 2 * (max_scale + sig_bits + 1);
        Self {
            capacity,
            half_range,
        }
    }

    /// Quire geometry matching a [`CFloatContext`].
    pub fn for_cfloat(ctx: &CFloatContext, capacity: usize) -> Self {
        let max_scale = ctx.emax().unsigned_abs().max(ctx.emin().unsigned_abs());
        Self::new(max_scale, ctx.fbits() + 1, capacity)
    }

    /// Quire geometry matching a [`PositContext`].
    pub fn for_posit(ctx: &PositContext, capacity: usize) -> Self {
        let max_scale = ctx.emax().unsigned_abs();
        Self::new(max_scale, ctx.nbits(), capacity)
    }

    /// Guard bits above the integer region.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bits on either side of the fixed point.
    pub fn half_range(&self) -> usize {
        self.half_range
    }

    /// Total register width: sign + capacity + upper + lower.
    pub fn width(&self) -> usize {
        1 + self.capacity + 2 * self.half_range
    }

    /// A cleared quire of this geometry.
    pub fn quire(&self) -> Quire {
        Quire {
            ctx: self.clone(),
            bits: BitBlock::zero(self.width()),
        }
    }
}

/// A wide fixed-point accumulator.
///
/// The register is two's complement; bit `i` carries weight
/// `2^(i - half_range)`. The value is the exact sum of everything
/// accumulated so far.
#[derive(Clone, Debug)]
pub struct Quire {
    ctx: QuireContext,
    bits: BitBlock,
}

impl Quire {
    /// The geometry of this quire.
    pub fn ctx(&self) -> &QuireContext {
        &self.ctx
    }

    /// Borrows the raw register.
    pub fn bits(&self) -> &BitBlock {
        &self.bits
    }

    /// Returns true if the accumulated value is zero.
    pub fn is_zero(&self) -> bool {
        self.bits.is_zero()
    }

    /// Clears the accumulator.
    pub fn clear(&mut self) {
        self.bits = BitBlock::zero(self.ctx.width());
    }

    /// Accumulates a value: aligns its significand at the fixed-point
    /// position given by its scale and ripple-adds, with carries
    /// propagating into the capacity region.
    pub fn add_assign<T: Real>(&mut self, val: &T) -> Result<(), ArithError> {
        self.accumulate(val, false)
    }

    /// Accumulates the negation of a value.
    pub fn sub_assign<T: Real>(&mut self, val: &T) -> Result<(), ArithError> {
        self.accumulate(val, true)
    }

    /// Accumulates the product of two values of the source format.
    /// The multiply is exact; only the quire range is checked.
    pub fn mul_add_assign<T: Real, U: Real>(
        &mut self,
        lhs: &T,
        rhs: &U,
    ) -> Result<(), ArithError> {
        if lhs.is_nar() || rhs.is_nar() {
            return Err(ArithError::InvalidOperation(
                "non-real operand in quire accumulation",
            ));
        }
        let prod = RFloat::from_number(lhs).mul_exact(&RFloat::from_number(rhs));
        self.accumulate(&prod, false)
    }

    fn accumulate<T: Real>(&mut self, val: &T, negate: bool) -> Result<(), ArithError> {
        if val.is_nar() {
            return Err(ArithError::InvalidOperation(
                "non-real operand in quire accumulation",
            ));
        }
        if val.is_zero() {
            return Ok(());
        }

        let c = val.c().unwrap();
        let exp = val.exp().unwrap();
        let width = self.ctx.width();
        let half_range = self.ctx.half_range() as isize;

        // lsb of the significand lands at `exp` above the fixed point
        let lsb = exp + half_range;
        if lsb < 0 {
            return Err(ArithError::OperandTooSmall);
        }
        let msb = lsb + c.significant_bits() as isize - 1;
        if msb >= (self.ctx.half_range() * 2 + self.ctx.capacity()) as isize {
            return Err(ArithError::OperandTooLarge);
        }

        let shifted = c << lsb as u32;
        let addend = BitBlock::from_integer(width, &shifted);

        let negative = val.sign() != negate;
        if negative {
            // two's-complement subtraction wraps modulo the width
            let (diff, _) = self.bits.sub_borrow(&addend);
            self.bits = diff;
        } else {
            let (sum, _) = self.bits.add_carry(&addend);
            self.bits = sum;
        }
        Ok(())
    }

    /// Reads the accumulated value out exactly.
    pub fn to_rfloat(&self) -> RFloat {
        if self.bits.is_zero() {
            return RFloat::zero();
        }
        let width = self.ctx.width();
        let half_range = self.ctx.half_range() as isize;
        let raw = self.bits.to_integer();
        if self.bits.get(width - 1) {
            // negative in two's complement
            let c = (Integer::from(1) << width as u32) - raw;
            RFloat::Real(true, -half_range, c).canonicalize()
        } else {
            RFloat::Real(false, -half_range, raw).canonicalize()
        }
    }

    /// Renormalizes the accumulated value into a blocktriple with a
    /// `1 + fbits` significand; dropped digits collapse into a sticky
    /// odd bit so a following round is faithful.
    pub fn to_triple(&self, fbits: usize, op: TripleOp) -> BlockTriple {
        let val = self.to_rfloat();
        if val.is_zero() {
            return BlockTriple::zero(false, fbits, op);
        }

        let rounded = crate::rfloat::RFloatContext::new()
            .with_max_p(fbits + 1)
            .with_rounding_mode(crate::RoundingMode::ToOdd)
            .round(&val);

        let mut c = rounded.c().unwrap();
        let mut exp = rounded.exp().unwrap();
        // widen short significands up to the canonical width
        let p = c.significant_bits() as usize;
        if p < fbits + 1 {
            let shift = fbits + 1 - p;
            c <<= shift as u32;
            exp -= shift as isize;
        }
        let scale = exp + fbits as isize;
        BlockTriple::from_parts(rounded.sign(), scale, &c, fbits, op)
    }

    /// Rounds the accumulated value into any format.
    pub fn round_into<C: RoundingContext>(&self, ctx: &C) -> C::Format {
        ctx.round(&self.to_rfloat())
    }
}
