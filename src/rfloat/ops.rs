// uninum: a universal numbers library in Rust
//
// rfloat/ops.rs
//
// Exact operators on unbounded floats

use std::cmp::min;
use std::ops::{Add, Mul, Neg, Sub};

use num_traits::{Signed, Zero};
use rug::Integer;

use crate::rfloat::RFloat;

impl RFloat {
    /// Adds two numbers of type [`RFloat`] exactly.
    /// Addition of non-real values follows the usual IEEE 754 rules:
    /// NaN is contagious and `Inf + -Inf` is NaN.
    pub fn add_exact(&self, other: &Self) -> Self {
        match (&self, other) {
            // invalid arguments means invalid result
            (Self::Nan, _) => Self::Nan,
            (_, Self::Nan) => Self::Nan,
            // infinities
            (Self::PosInfinity, Self::NegInfinity) => Self::Nan,
            (Self::NegInfinity, Self::PosInfinity) => Self::Nan,
            (Self::PosInfinity, _) | (_, Self::PosInfinity) => Self::PosInfinity,
            (Self::NegInfinity, _) | (_, Self::NegInfinity) => Self::NegInfinity,
            // finite
            (Self::Real(s1, exp1, c1), Self::Real(s2, exp2, c2)) => {
                if c2.is_zero() {
                    // x + 0 = x
                    Self::Real(*s1, *exp1, c1.clone()).canonicalize()
                } else if c1.is_zero() {
                    // 0 + y = y
                    Self::Real(*s2, *exp2, c2.clone()).canonicalize()
                } else {
                    // need to normalize significands:
                    // resulting exponent is the minimum of the
                    // exponent of the arguments
                    let exp = min(*exp1, *exp2);
                    let c1 = Integer::from(c1 << (*exp1 - exp) as u32);
                    let c2 = Integer::from(c2 << (*exp2 - exp) as u32);

                    // add signed integers
                    let m = match (*s1, *s2) {
                        (false, false) => c1 + c2,
                        (false, true) => c1 - c2,
                        (true, false) => c2 - c1,
                        (true, true) => -(c1 + c2),
                    };

                    // compose result
                    Self::Real(m.is_negative(), exp, m.abs()).canonicalize()
                }
            }
        }
    }

    /// Multiplies two numbers of type [`RFloat`] exactly.
    /// Multiplication of non-real values follows the usual
    /// IEEE 754 rules: NaN is contagious and `Inf * 0` is NaN.
    pub fn mul_exact(&self, other: &Self) -> Self {
        match (&self, other) {
            // invalid arguments means invalid result
            (Self::Nan, _) => Self::Nan,
            (_, Self::Nan) => Self::Nan,
            // infinities
            (Self::PosInfinity, Self::PosInfinity) => Self::PosInfinity,
            (Self::NegInfinity, Self::NegInfinity) => Self::PosInfinity,
            (Self::PosInfinity, Self::NegInfinity) => Self::NegInfinity,
            (Self::NegInfinity, Self::PosInfinity) => Self::NegInfinity,
            (Self::PosInfinity, Self::Real(s, _, c))
            | (Self::Real(s, _, c), Self::PosInfinity) => {
                if c.is_zero() {
                    // Inf * 0 is undefined
                    Self::Nan
                } else if *s {
                    Self::NegInfinity
                } else {
                    Self::PosInfinity
                }
            }
            (Self::NegInfinity, Self::Real(s, _, c))
            | (Self::Real(s, _, c), Self::NegInfinity) => {
                if c.is_zero() {
                    Self::Nan
                } else if *s {
                    Self::PosInfinity
                } else {
                    Self::NegInfinity
                }
            }
            // finite values
            (Self::Real(s1, exp1, c1), Self::Real(s2, exp2, c2)) => {
                if c1.is_zero() || c2.is_zero() {
                    // finite * zero is zero
                    Self::zero()
                } else {
                    // non-zero * non-zero is non-zero
                    Self::Real(s1 != s2, exp1 + exp2, Integer::from(c1 * c2))
                }
            }
        }
    }
}

impl Neg for RFloat {
    type Output = RFloat;

    fn neg(self) -> Self::Output {
        match &self {
            Self::Nan => Self::Nan,
            Self::PosInfinity => Self::NegInfinity,
            Self::NegInfinity => Self::PosInfinity,
            Self::Real(s, exp, c) => Self::Real(!s, *exp, c.clone()).canonicalize(),
        }
    }
}

impl Add for RFloat {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        self.add_exact(&rhs)
    }
}

impl Sub for RFloat {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        self.add_exact(&-rhs)
    }
}

impl Mul for RFloat {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        self.mul_exact(&rhs)
    }
}
