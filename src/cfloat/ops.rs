// uninum: a universal numbers library in Rust
//
// cfloat/ops.rs
//
// Arithmetic through the blocktriple funnel

use std::ops::{Add, Div, Mul, Sub};

use crate::cfloat::CFloat;
use crate::error::ArithError;
use crate::triple::TripleOp;

impl CFloat {
    /// Adds two values of the same format: decode to `Add`-layout
    /// triples, add exactly, round back.
    pub fn add(&self, rhs: &Self) -> Self {
        assert_eq!(self.ctx, rhs.ctx, "operands must share a format");
        let a = self.ctx.decode(self, TripleOp::Add);
        let b = self.ctx.decode(rhs, TripleOp::Add);
        self.ctx.round_triple(&a.add(&b))
    }

    /// Subtracts two values of the same format.
    pub fn sub(&self, rhs: &Self) -> Self {
        assert_eq!(self.ctx, rhs.ctx, "operands must share a format");
        let a = self.ctx.decode(self, TripleOp::Add);
        let b = self.ctx.decode(rhs, TripleOp::Add);
        self.ctx.round_triple(&a.sub(&b))
    }

    /// Multiplies two values of the same format through the
    /// double-width `Mul` layout.
    pub fn mul(&self, rhs: &Self) -> Self {
        assert_eq!(self.ctx, rhs.ctx, "operands must share a format");
        let a = self.ctx.decode(self, TripleOp::Mul);
        let b = self.ctx.decode(rhs, TripleOp::Mul);
        self.ctx.round_triple(&a.mul(&b))
    }

    /// Divides two values of the same format through the guarded
    /// `Div` layout.
    pub fn div(&self, rhs: &Self) -> Self {
        assert_eq!(self.ctx, rhs.ctx, "operands must share a format");
        let a = self.ctx.decode(self, TripleOp::Div);
        let b = self.ctx.decode(rhs, TripleOp::Div);
        self.ctx.round_triple(&a.div(&b))
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
}

impl Add for CFloat {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        CFloat::add(&self, &rhs)
    }
}

impl Sub for CFloat {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        CFloat::sub(&self, &rhs)
    }
}

impl Mul for CFloat {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        CFloat::mul(&self, &rhs)
    }
}

impl Div for CFloat {
    type Output = Self;

    fn div(self, rhs: Self) -> Self {
        CFloat::div(&self, &rhs)
    }
}
