// uninum: a universal numbers library in Rust
//
// cascade/ops.rs
//
// Cascade arithmetic: expansion add with proven compression,
// diagonal-partitioned multiply, Newton division and square root

use std::ops::{Add, Div, Mul, Neg, Sub};

use crate::cascade::FloatCascade;
use crate::eft::{self, fast_two_sum, linear_expansion_sum, renormalize, two_product, two_sum};
use crate::error::ArithError;

impl<const N: usize> Neg for FloatCascade<N> {
    type Output = Self;

    fn neg(self) -> Self {
        let mut r = self;
        for limb in r.limbs.iter_mut() {
            *limb = -*limb;
        }
        r
    }
}

/// Accumulates `c` into the double-length pair `(a, b)`, returning a
/// finished component once one separates out (Hida-Li-Bailey).
fn quick_three_accum(a: &mut f64, b: &mut f64, c: f64) -> f64 {
    let (s1, e1) = two_sum(*b, c);
    let (s2, e2) = two_sum(*a, s1);
    *b = e1;
    *a = e2;

    let za = *a != 0.0;
    let zb = *b != 0.0;
    if za && zb {
        return s2;
    }
    if !zb {
        *b = *a;
        *a = s2;
    } else {
        *a = s2;
    }
    0.0
}

/// Compresses a magnitude-sorted collection of doubles into `N`
/// non-overlapping limbs. This is the Hida-Li-Bailey accumulation
/// schedule (8-to-4 for quad-double, 6-to-3 for triple-double,
/// two two-sums for double-double) generalized over the limb count.
/// Every result limb is always written.
fn compress<const N: usize>(sorted: &[f64]) -> FloatCascade<N> {
    let mut c = vec![0.0; N];
    let mut u = 0.0;
    let mut v = 0.0;
    let mut k = 0;
    let mut i = 0;

    while k < N && i < sorted.len() {
        let s = quick_three_accum(&mut u, &mut v, sorted[i]);
        i += 1;
        if s != 0.0 {
            c[k] = s;
            k += 1;
        }
    }

    // take care of the leftover double-length accumulator
    if k + 1 < N {
        c[k + 1] = v;
    }
    if k < N {
        c[k] = u;
    }

    FloatCascade::from_expansion(&renormalize(&c))
}

impl<const N: usize> FloatCascade<N> {
    /// Adds two cascades: the operand expansions are merged with a
    /// linear expansion sum (2N limbs) and compressed back to N.
    pub fn add(&self, rhs: &Self) -> Self {
        if self.is_nan() || rhs.is_nan() {
            return Self::nan();
        }
        if self.is_infinite() || rhs.is_infinite() {
            return Self::from_f64(self.limbs[0] + rhs.limbs[0]);
        }

        let merged = linear_expansion_sum(&self.limbs, &rhs.limbs);
        let r = compress::<N>(&sort_desc(&merged));
        r.debug_check_invariant();
        r
    }

    /// Subtracts two cascades.
    pub fn sub(&self, rhs: &Self) -> Self {
        self.add(&rhs.neg_ref())
    }

    /// Multiplies two cascades by partitioning the `N x N` product
    /// matrix along diagonals `k = i + j`. Each diagonal accumulates
    /// its products and the error terms of the previous diagonal
    /// through a stable two-sum chain; the diagonal sums and errors
    /// are then sorted by magnitude and compressed to N limbs.
    pub fn mul(&self, rhs: &Self) -> Self {
        if self.is_nan() || rhs.is_nan() {
            return Self::nan();
        }
        if self.is_infinite() || rhs.is_infinite() {
            return Self::from_f64(self.limbs[0] * rhs.limbs[0]);
        }
        if self.is_zero() || rhs.is_zero() {
            return Self::zero();
        }

        // partial products and their error terms
        let mut products = [[0.0; 32]; 32];
        let mut errors = [[0.0; 32]; 32];
        for i in 0..N {
            for j in 0..N {
                let (p, e) = two_product(self.limbs[i], rhs.limbs[j]);
                products[i][j] = p;
                errors[i][j] = e;
            }
        }

        let ndiag = 2 * N - 1;
        let mut diagonal_sums = vec![0.0; ndiag];
        let mut diagonal_errors = vec![0.0; ndiag];
        // second-order errors spill into the next diagonal
        let mut carried: Vec<Vec<f64>> = vec![Vec::new(); ndiag + 1];

        for diag in 0..ndiag {
            let mut sum = 0.0;
            let mut err = 0.0;

            let mut accumulate = |t: f64, carried_next: &mut Vec<f64>| {
                if t == 0.0 {
                    return;
                }
                let (s1, e1) = two_sum(sum, t);
                sum = s1;
                let (s2, e2) = two_sum(err, e1);
                err = s2;
                if e2 != 0.0 {
                    carried_next.push(e2);
                }
            };

            // split the carried vector off so the closure can borrow it
            let mut carried_next = std::mem::take(&mut carried[diag + 1]);

            // products on this diagonal
            for i in 0..N.min(diag + 1) {
                let j = diag - i;
                if j < N {
                    accumulate(products[i][j], &mut carried_next);
                }
            }
            // error terms from the previous diagonal
            if diag > 0 {
                for i in 0..N.min(diag) {
                    let j = diag - 1 - i;
                    if j < N {
                        accumulate(errors[i][j], &mut carried_next);
                    }
                }
            }
            // second-order errors carried from the previous diagonal
            let terms = std::mem::take(&mut carried[diag]);
            for t in terms {
                accumulate(t, &mut carried_next);
            }

            carried[diag + 1] = carried_next;
            diagonal_sums[diag] = sum;
            diagonal_errors[diag] = err;
        }

        // extract the top N components with a two-sum cascade
        let mut all = Vec::with_capacity(2 * ndiag);
        all.extend_from_slice(&diagonal_sums);
        all.extend_from_slice(&diagonal_errors);
        all.extend(carried[ndiag].iter().copied());

        let r = compress::<N>(&sort_desc(&all));
        r.debug_check_invariant();
        r
    }

    /// Divides two cascades by iterative Newton refinement:
    /// `q_{i+1} = q_i + residual / b[0]`, with the residual recomputed
    /// in cascade arithmetic, for `N + 1` quotient terms. Division by
    /// zero yields a signed infinity, or NaN if the dividend is also
    /// zero.
    pub fn div(&self, rhs: &Self) -> Self {
        if self.is_nan() {
            return *self;
        }
        if rhs.is_nan() {
            return *rhs;
        }
        if rhs.is_zero() {
            if self.is_zero() {
                return Self::nan();
            }
            return Self::infinity(self.sign_bit() != rhs.sign_bit());
        }
        if self.is_zero() {
            return Self::zero();
        }
        if self.is_infinite() || rhs.is_infinite() {
            return Self::from_f64(self.limbs[0] / rhs.limbs[0]);
        }

        let mut q = vec![0.0; N + 1];
        q[0] = self.limbs[0] / rhs.limbs[0];

        let mut residual = self.sub(&rhs.mul(&Self::from_f64(q[0])));
        for qi in q.iter_mut().take(N + 1).skip(1) {
            *qi = residual.limbs[0] / rhs.limbs[0];
            residual = residual.sub(rhs.mul(&Self::from_f64(*qi)));
        }

        let r = Self::from_expansion(&renormalize(&q));
        r.debug_check_invariant();
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

    /// Square root by Heron iteration seeded with a native sqrt of
    /// the leading limb; `sqrt(-x)` with `x > 0` is NaN.
    pub fn sqrt(&self) -> Self {
        if self.is_nan() || self.is_neg() {
            return if self.is_zero() { *self } else { Self::nan() };
        }
        if self.is_zero() {
            return *self;
        }
        if self.is_infinite() {
            return *self;
        }

        let mut x = Self::from_f64(self.limbs[0].sqrt());
        let half = Self::from_f64(0.5);
        // each iteration roughly doubles the number of correct limbs
        for _ in 0..N + 1 {
            let quot = self.div(&x);
            x = x.add(quot).mul(half);
        }
        x.debug_check_invariant();
        x
    }

    /// Square root in throwing mode.
    pub fn checked_sqrt(&self) -> Result<Self, ArithError> {
        if self.is_neg() {
            return Err(ArithError::InvalidOperation("sqrt of a negative value"));
        }
        Ok(self.sqrt())
    }

    fn neg_ref(&self) -> Self {
        -*self
    }
}

// sort a collection of doubles by decreasing magnitude,
// dropping exact zeros
fn sort_desc(xs: &[f64]) -> Vec<f64> {
    let mut v: Vec<f64> = xs.iter().copied().filter(|&x| x != 0.0).collect();
    v.sort_by(|a, b| b.abs().partial_cmp(&a.abs()).unwrap());
    v
}

impl<const N: usize> Add for FloatCascade<N> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        FloatCascade::add(&self, &rhs)
    }
}

impl<const N: usize> Sub for FloatCascade<N> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        FloatCascade::sub(&self, &rhs)
    }
}

impl<const N: usize> Mul for FloatCascade<N> {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        FloatCascade::mul(&self, &rhs)
    }
}

impl<const N: usize> Div for FloatCascade<N> {
    type Output = Self;

    fn div(self, rhs: Self) -> Self {
        FloatCascade::div(&self, &rhs)
    }
}

impl<const N: usize> Add<f64> for FloatCascade<N> {
    type Output = Self;

    fn add(self, rhs: f64) -> Self {
        FloatCascade::add(&self, &Self::from_f64(rhs))
    }
}

impl<const N: usize> Sub<f64> for FloatCascade<N> {
    type Output = Self;

    fn sub(self, rhs: f64) -> Self {
        FloatCascade::sub(&self, &Self::from_f64(rhs))
    }
}

impl<const N: usize> Mul<f64> for FloatCascade<N> {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        // scaling by a double stays inside the expansion algebra
        let scaled = eft::scale_expansion(&self.limbs, rhs);
        let r = Self::from_expansion(&renormalize(&scaled));
        r.debug_check_invariant();
        r
    }
}

impl<const N: usize> Div<f64> for FloatCascade<N> {
    type Output = Self;

    fn div(self, rhs: f64) -> Self {
        FloatCascade::div(&self, &Self::from_f64(rhs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cascade::{DoubleDouble, QuadDouble};

    #[test]
    fn dd_add_keeps_half_ulp() {
        // 1 + eps/2 cancels against -1 leaving exactly eps/2
        let a = DoubleDouble::from_limbs([1.0, f64::EPSILON / 2.0]);
        let b = DoubleDouble::from_f64(-1.0);
        let sum = (&a).add(&b);
        assert_eq!(sum.limb(0), f64::EPSILON / 2.0);
        assert_eq!(sum.limb(0).to_bits(), 0x3CA0000000000000);
        assert_eq!(sum.limb(1), 0.0);
    }

    #[test]
    fn qd_add_is_exact_past_double() {
        let a = QuadDouble::from_f64(9007199254740992.0); // 2^53
        let b = QuadDouble::from_f64(1.0);
        let sum = (&a).add(&b);
        assert_eq!(sum.limb(0), 9007199254740992.0);
        assert_eq!(sum.limb(1), 1.0);
        let back = (&sum).sub(&a);
        assert_eq!(back.to_f64(), 1.0);
    }

    #[test]
    fn mul_initializes_every_limb() {
        // overlapping inputs exercise the diagonal accumulator
        let a = QuadDouble::from_limbs([1.0, 0.1, 0.01, 0.001]);
        let b = QuadDouble::from_limbs([2.0, 0.2, 0.02, 0.002]);
        let p = (&a).mul(&b);
        for i in 0..4 {
            assert!(p.limb(i).is_finite());
        }
        let approx = p.to_f64();
        assert!((approx - 1.111 * 2.222).abs() < 1e-12);
    }

    #[test]
    fn div_round_trips() {
        let a = QuadDouble::from_f64(3.0);
        let b = QuadDouble::from_f64(7.0);
        let q = (&a).div(&b);
        let back = (&q).mul(&b);
        let diff = (&back).sub(&a);
        assert!(diff.to_f64().abs() < 1e-60);
    }

    #[test]
    fn div_by_zero_is_signed_infinity() {
        let a = DoubleDouble::from_f64(2.0);
        let z = DoubleDouble::zero();
        assert!((&a).div(&z).is_infinite());
        assert!((&a.neg_ref()).div(&z).limb(0).is_sign_negative());
        assert!((&z).div(&z).is_nan());
        assert_eq!(a.checked_div(&z), Err(ArithError::DivideByZero));
    }

    #[test]
    fn sqrt_of_two_squares_back() {
        let two = QuadDouble::from_f64(2.0);
        let r = two.sqrt();
        let sq = (&r).mul(&r);
        let diff = (&sq).sub(&two);
        assert!(diff.to_f64().abs() < 1e-60);
    }
}
