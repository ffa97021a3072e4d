// uninum: a universal numbers library in Rust
//
// ereal/ops.rs
//
// Expansion arithmetic operators

use std::ops::{Add, Div, Mul, Neg, Sub};

use crate::eft::{expansion_product, linear_expansion_sum, renormalize};
use crate::ereal::EReal;
use crate::error::ArithError;

impl EReal {
    /// Adds two expansions with the linear expansion sum;
    /// no compression beyond the limb bound.
    pub fn add(&self, rhs: &Self) -> Self {
        if self.is_nan() || rhs.is_nan() {
            let mut r = self.clone();
            r.set_nan();
            return r;
        }
        if self.is_infinite() || rhs.is_infinite() {
            let mut r = self.clone();
            let v = self.limbs[0] + rhs.limbs[0];
            if v.is_nan() {
                r.set_nan();
            } else {
                r.set_infinity(v < 0.0);
            }
            return r;
        }

        let mut r = self.clone();
        r.assign_expansion(linear_expansion_sum(&self.limbs, &rhs.limbs));
        r
    }

    /// Subtracts two expansions.
    pub fn sub(&self, rhs: &Self) -> Self {
        let mut neg = rhs.clone();
        for v in neg.limbs.iter_mut() {
            *v = -*v;
        }
        self.add(&neg)
    }

    /// Multiplies two expansions: each limb of the right operand
    /// scales the left expansion, the partial expansions are
    /// sum-merged, and the result is renormalized.
    pub fn mul(&self, rhs: &Self) -> Self {
        if self.is_nan() || rhs.is_nan() {
            let mut r = self.clone();
            r.set_nan();
            return r;
        }
        if self.is_infinite() || rhs.is_infinite() {
            let mut r = self.clone();
            let v = self.limbs[0] * rhs.limbs[0];
            if v.is_nan() {
                r.set_nan();
            } else {
                r.set_infinity(v < 0.0);
            }
            return r;
        }

        let mut r = self.clone();
        r.assign_expansion(expansion_product(&self.limbs, &rhs.limbs));
        r
    }

    /// Divides two expansions by Newton refinement against the
    /// leading limb of the divisor, one quotient term per limb.
    pub fn div(&self, rhs: &Self) -> Self {
        let mut r = self.clone();
        if self.is_nan() || rhs.is_nan() {
            r.set_nan();
            return r;
        }
        if rhs.is_zero() {
            if self.is_zero() {
                r.set_nan();
            } else {
                r.set_infinity(self.is_neg() != rhs.limbs[0].is_sign_negative());
            }
            return r;
        }
        if self.is_zero() {
            r.set_zero();
            return r;
        }
        if self.is_infinite() || rhs.is_infinite() {
            let v = self.limbs[0] / rhs.limbs[0];
            if v.is_nan() {
                r.set_nan();
            } else if v == 0.0 {
                r.set_zero();
            } else {
                r.set_infinity(v < 0.0);
            }
            return r;
        }

        let terms = self.max_limbs + 1;
        let mut q = Vec::with_capacity(terms);
        q.push(self.limbs[0] / rhs.limbs[0]);

        let mut residual = self.sub(&rhs.mul(&EReal::from_f64(q[0])));
        for _ in 1..terms {
            let qi = residual.limbs[0] / rhs.limbs[0];
            q.push(qi);
            residual = residual.sub(rhs.mul(&EReal::from_f64(qi)));
        }

        r.assign_expansion(renormalize(&q));
        r
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

    /// Negation.
    pub fn neg(&self) -> Self {
        let mut r = self.clone();
        for v in r.limbs.iter_mut() {
            *v = -*v;
        }
        r
    }

    /// Square root by Heron iteration, like the cascades.
    pub fn sqrt(&self) -> Self {
        let mut r = self.clone();
        if self.is_nan() || self.is_neg() {
            r.set_nan();
            return r;
        }
        if self.is_zero() || self.is_infinite() {
            return r;
        }

        let mut x = EReal::with_max_limbs(self.max_limbs);
        x.limbs[0] = self.limbs[0].sqrt();
        let half = EReal::from_f64(0.5);
        for _ in 0..self.max_limbs + 1 {
            let quot = self.div(&x);
            x = x.add(quot).mul(half.clone());
        }
        x
    }
}

impl Add for EReal {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        EReal::add(&self, &rhs)
    }
}

impl Sub for EReal {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        EReal::sub(&self, &rhs)
    }
}

impl Mul for EReal {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        EReal::mul(&self, &rhs)
    }
}

impl Div for EReal {
    type Output = Self;

    fn div(self, rhs: Self) -> Self {
        EReal::div(&self, &rhs)
    }
}

impl Neg for EReal {
    type Output = Self;

    fn neg(self) -> Self {
        EReal::neg(&self)
    }
}
