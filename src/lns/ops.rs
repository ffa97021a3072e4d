// uninum: a universal numbers library in Rust
//
// lns/ops.rs
//
// Logarithmic arithmetic: exact log-domain mul/div,
// linear-domain add/sub through the unbounded intermediate

use std::ops::{Add, Div, Mul, Neg, Sub};

use rug::Integer;

use crate::error::ArithError;
use crate::lns::Lns;
use crate::RoundingContext;

impl Lns {
    /// Multiplies two logarithmic numbers: the log fields add,
    /// exact up to the field's resolution, saturating at the range
    /// edges.
    pub fn mul(&self, rhs: &Self) -> Self {
        assert_eq!(self.ctx, rhs.ctx, "operands must share a format");
        if self.is_nan() || rhs.is_nan() {
            return self.ctx.nan();
        }
        if self.is_zero() || rhs.is_zero() {
            return self.ctx.zero();
        }
        let sign = self.sign_bit() != rhs.sign_bit();
        let l = Integer::from(self.log_field() as i64) + Integer::from(rhs.log_field() as i64);
        self.ctx.from_log(sign, self.ctx.clamp_log(&l))
    }

    /// Divides two logarithmic numbers: the log fields subtract.
    /// `x / 0` is NaN (there is no infinity encoding).
    pub fn div(&self, rhs: &Self) -> Self {
        assert_eq!(self.ctx, rhs.ctx, "operands must share a format");
        if self.is_nan() || rhs.is_nan() || rhs.is_zero() {
            return self.ctx.nan();
        }
        if self.is_zero() {
            return self.ctx.zero();
        }
        let sign = self.sign_bit() != rhs.sign_bit();
        let l = Integer::from(self.log_field() as i64) - Integer::from(rhs.log_field() as i64);
        self.ctx.from_log(sign, self.ctx.clamp_log(&l))
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

    /// Adds two logarithmic numbers. Addition is not a log-domain
    /// primitive: both operands convert out through `2^x` at working
    /// precision, the sum is taken exactly, and the result re-rounds
    /// through `log2`.
    pub fn add(&self, rhs: &Self) -> Self {
        assert_eq!(self.ctx, rhs.ctx, "operands must share a format");
        if self.is_nan() || rhs.is_nan() {
            return self.ctx.nan();
        }
        let prec = self.ctx.working_prec();
        let sum = self.to_rfloat(prec).add_exact(&rhs.to_rfloat(prec));
        self.ctx.round(&sum)
    }

    /// Subtracts two logarithmic numbers.
    pub fn sub(&self, rhs: &Self) -> Self {
        self.add(&rhs.clone().neg())
    }
}

impl Neg for Lns {
    type Output = Lns;

    /// Negation just flips the sign bit; zero and NaN are unchanged.
    fn neg(self) -> Lns {
        if self.is_zero() || self.is_nan() {
            return self;
        }
        let mut r = self;
        let top = r.ctx.nbits() - 1;
        let s = r.bits.get(top);
        r.bits.set(top, !s);
        r
    }
}

impl Add for Lns {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Lns::add(&self, &rhs)
    }
}

impl Sub for Lns {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Lns::sub(&self, &rhs)
    }
}

impl Mul for Lns {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Lns::mul(&self, &rhs)
    }
}

impl Div for Lns {
    type Output = Self;

    fn div(self, rhs: Self) -> Self {
        Lns::div(&self, &rhs)
    }
}
