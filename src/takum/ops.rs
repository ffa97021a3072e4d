// uninum: a universal numbers library in Rust
//
// takum/ops.rs
//
// Takum arithmetic: exact intermediates, one rounding at the end

use std::ops::{Add, Div, Mul, Neg, Sub};

use crate::bitblock::BitBlock;
use crate::error::ArithError;
use crate::math;
use crate::takum::Takum;
use crate::{Real, RoundingContext};

impl Takum {
    /// Adds two takums of the same format exactly, then rounds once.
    pub fn add(&self, rhs: &Self) -> Self {
        assert_eq!(self.ctx, rhs.ctx, "operands must share a format");
        if self.is_nar() || rhs.is_nar() {
            return self.ctx.nar();
        }
        let sum = self.to_rfloat().add_exact(&rhs.to_rfloat());
        self.ctx.round(&sum)
    }

    /// Subtracts two takums of the same format.
    pub fn sub(&self, rhs: &Self) -> Self {
        self.add(&rhs.clone().neg())
    }

    /// Multiplies two takums of the same format exactly, then rounds.
    pub fn mul(&self, rhs: &Self) -> Self {
        assert_eq!(self.ctx, rhs.ctx, "operands must share a format");
        if self.is_nar() || rhs.is_nar() {
            return self.ctx.nar();
        }
        let prod = self.to_rfloat().mul_exact(&rhs.to_rfloat());
        self.ctx.round(&prod)
    }

    /// Divides two takums of the same format with a round-to-odd
    /// quotient at working precision. Division by zero yields NaR.
    pub fn div(&self, rhs: &Self) -> Self {
        assert_eq!(self.ctx, rhs.ctx, "operands must share a format");
        if self.is_nar() || rhs.is_nar() || rhs.is_zero() {
            return self.ctx.nar();
        }
        if self.is_zero() {
            return self.ctx.zero();
        }
        let p = self.ctx.nbits() + 2;
        let quot = math::div_rto(&self.to_rfloat(), &rhs.to_rfloat(), p);
        self.ctx.round(&quot)
    }

    /// Division in throwing mode.
    pub fn checked_div(&self, rhs: &Self) -> Result<Self, ArithError> {
        if rhs.is_zero() {
            if self.is_zero() {
                return Err(ArithError::InvalidOperation("0 / 0"));
            }
            return Err(ArithError::DivideByZero);
        }
        Ok(self.div(rhs))
    }

    /// Square root: NaR for negative arguments.
    pub fn sqrt(&self) -> Self {
        if self.is_nar() || self.is_negative() == Some(true) {
            return self.ctx.nar();
        }
        if self.is_zero() {
            return self.ctx.zero();
        }
        let p = self.ctx.nbits() + 2;
        let root = math::sqrt_rto(&self.to_rfloat(), p);
        self.ctx.round(&root)
    }
}

impl Neg for Takum {
    type Output = Takum;

    /// Takum negation is exact: the encoding two's-complements.
    fn neg(self) -> Takum {
        if self.is_zero() || self.is_nar() {
            return self;
        }
        let nbits = self.ctx.nbits();
        let (compl, _) = BitBlock::zero(nbits).sub_borrow(&self.bits);
        Takum::from_bits(self.ctx, compl)
    }
}

impl Add for Takum {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Takum::add(&self, &rhs)
    }
}

impl Sub for Takum {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Takum::sub(&self, &rhs)
    }
}

impl Mul for Takum {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Takum::mul(&self, &rhs)
    }
}

impl Div for Takum {
    type Output = Self;

    fn div(self, rhs: Self) -> Self {
        Takum::div(&self, &rhs)
    }
}
