use std::cmp::Ordering;
use std::cmp::{max, min};

use num_traits::{Signed, Zero};
use rug::{Float, Integer};

use gmp_mpfr_sys::gmp::mpz_t;
use gmp_mpfr_sys::mpfr;

use crate::native::FloatClass;
use crate::real::FormatTag;
use crate::Real;

/// The unbounded floating-point format.
///
/// This type defines a binary floating-point number
/// `(-1)^s * c * 2^exp` where `c` is a binary-encoded non-negative
/// integer and `exp` is theoretically unbounded and may be as large or
/// small as needed. `RFloat` values may encode non-real numbers:
/// signed infinity and NaN. All operations canonicalize -0 to +0
/// (no sign bit for zero).
#[derive(Debug, Clone)]
pub enum RFloat {
    /// A finite (real) number specified by the canonical triple
    /// of sign, exponent, significand.
    Real(bool, isize, Integer),
    /// Positive infinity.
    PosInfinity,
    /// Negative infinity.
    NegInfinity,
    /// Not a real number; either an undefined or infinite result.
    Nan,
}

// Implements the `Real` trait for `RFloat`.
impl Real for RFloat {
    fn radix() -> usize {
        2
    }

    fn sign(&self) -> bool {
        match self {
            RFloat::Real(s, _, _) => *s,
            RFloat::PosInfinity => false,
            RFloat::NegInfinity => true,
            RFloat::Nan => false,
        }
    }

    fn exp(&self) -> Option<isize> {
        match self {
            RFloat::Real(_, exp, c) => {
                if c.is_zero() {
                    None
                } else {
                    Some(*exp)
                }
            }
            _ => None,
        }
    }

    fn e(&self) -> Option<isize> {
        // (exp - 1) + len(c)
        match self {
            RFloat::Real(_, exp, c) => {
                if c.is_zero() {
                    None
                } else {
                    Some((exp - 1) + c.significant_bits() as isize)
                }
            }
            _ => None,
        }
    }

    fn n(&self) -> Option<isize> {
        match self {
            RFloat::Real(_, exp, c) => {
                if c.is_zero() {
                    None
                } else {
                    Some(exp - 1)
                }
            }
            _ => None,
        }
    }

    fn c(&self) -> Option<Integer> {
        match self {
            RFloat::Real(_, _, c) => Some(c.clone()),
            _ => None,
        }
    }

    fn p(&self) -> usize {
        match self {
            RFloat::Real(_, _, c) => c.significant_bits() as usize,
            _ => 0,
        }
    }

    fn is_nar(&self) -> bool {
        !matches!(self, RFloat::Real(_, _, _))
    }

    fn is_finite(&self) -> bool {
        matches!(self, RFloat::Real(_, _, _))
    }

    fn is_infinite(&self) -> bool {
        matches!(self, RFloat::PosInfinity | RFloat::NegInfinity)
    }

    fn is_zero(&self) -> bool {
        match self {
            RFloat::Real(_, _, c) => c.is_zero(),
            _ => false,
        }
    }

    fn is_negative(&self) -> Option<bool> {
        match self {
            RFloat::Real(s, _, c) => {
                if c.is_zero() {
                    None
                } else {
                    Some(*s)
                }
            }
            RFloat::PosInfinity => Some(false),
            RFloat::NegInfinity => Some(true),
            RFloat::Nan => None,
        }
    }

    fn is_numerical(&self) -> bool {
        !matches!(self, RFloat::Nan)
    }
}

impl FormatTag for RFloat {
    const TAG: &'static str = "rfloat";

    fn classify(&self) -> FloatClass {
        match self {
            RFloat::Real(_, _, c) if c.is_zero() => FloatClass::Zero,
            RFloat::Real(_, _, _) => FloatClass::Normal,
            RFloat::PosInfinity | RFloat::NegInfinity => FloatClass::Infinite,
            RFloat::Nan => FloatClass::Nan,
        }
    }
}

impl RFloat {
    /// Constructs the canonical zero for this format.
    pub fn zero() -> Self {
        RFloat::Real(false, 0, Integer::zero())
    }

    /// Constructs the canonical +1 for this format.
    pub fn one() -> Self {
        RFloat::Real(false, 0, Integer::from(1))
    }

    /// Constructs a power of two `2^exp`.
    pub fn pow2(exp: isize) -> Self {
        RFloat::Real(false, exp, Integer::from(1))
    }

    /// Returns true if the number is NaN.
    pub fn is_nan(&self) -> bool {
        matches!(self, RFloat::Nan)
    }

    /// Canonicalizes this number.
    /// All zeros are mapped to `Real(false, 0, 0)`.
    pub fn canonicalize(&self) -> Self {
        if self.is_zero() {
            RFloat::zero()
        } else {
            self.clone()
        }
    }

    /// Returns the `n`th absolute binary digit.
    pub fn get_bit(&self, n: isize) -> bool {
        match self {
            RFloat::Real(_, _, c) if c.is_zero() => false,
            RFloat::Real(_, exp, c) => {
                let e = self.e().unwrap();
                let exp = *exp;
                if n < exp || n > e {
                    // below the least significant digit or above
                    // the most significant digit
                    false
                } else {
                    c.get_bit((n - exp) as u32)
                }
            }
            _ => false,
        }
    }

    /// Constructs an [`RFloat`] value from a [`Real`].
    /// This is the default conversion function from
    /// any implementation of the [`Real`] trait.
    pub fn from_number<N: Real>(val: &N) -> Self {
        if !val.is_numerical() {
            Self::Nan
        } else if val.is_infinite() {
            if val.sign() {
                Self::NegInfinity
            } else {
                Self::PosInfinity
            }
        } else if val.is_zero() {
            Self::zero()
        } else {
            Self::Real(val.sign(), val.exp().unwrap(), val.c().unwrap())
        }
    }

    /// Rounds this value to the nearest `f64`, ties to even.
    pub fn to_f64(&self) -> f64 {
        match self {
            RFloat::Nan => f64::NAN,
            RFloat::PosInfinity => f64::INFINITY,
            RFloat::NegInfinity => f64::NEG_INFINITY,
            RFloat::Real(_, _, c) if c.is_zero() => 0.0,
            _ => Float::from(self.clone()).to_f64(),
        }
    }
}

impl PartialOrd for RFloat {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (RFloat::Nan, _) => None,
            (_, RFloat::Nan) => None,
            (RFloat::PosInfinity, RFloat::PosInfinity) => Some(Ordering::Equal),
            (RFloat::NegInfinity, RFloat::NegInfinity) => Some(Ordering::Equal),
            (RFloat::PosInfinity, _) => Some(Ordering::Greater),
            (_, RFloat::PosInfinity) => Some(Ordering::Less),
            (RFloat::NegInfinity, _) => Some(Ordering::Less),
            (_, RFloat::NegInfinity) => Some(Ordering::Greater),
            (RFloat::Real(s1, exp1, c1), RFloat::Real(s2, exp2, c2)) => {
                // check for zero
                if c1.is_zero() && c2.is_zero() {
                    Some(Ordering::Equal)
                } else if c1.is_zero() {
                    if *s2 {
                        Some(Ordering::Greater)
                    } else {
                        Some(Ordering::Less)
                    }
                } else if c2.is_zero() {
                    if *s1 {
                        Some(Ordering::Less)
                    } else {
                        Some(Ordering::Greater)
                    }
                } else {
                    // non-zero, finite <?> non-zero, finite:
                    // align both significands at the smaller `n`
                    // and compare the signed ordinals
                    let n1 = exp1 - 1;
                    let n2 = exp2 - 1;
                    let n = min(n1, n2);

                    let mut ord1 = Integer::from(c1 << (n1 - n) as u32);
                    let mut ord2 = Integer::from(c2 << (n2 - n) as u32);

                    if *s1 {
                        ord1 = -ord1;
                    }

                    if *s2 {
                        ord2 = -ord2;
                    }

                    Some(ord1.cmp(&ord2))
                }
            }
        }
    }
}

impl PartialEq for RFloat {
    fn eq(&self, other: &Self) -> bool {
        matches!(self.partial_cmp(other), Some(Ordering::Equal))
    }
}

impl From<f64> for RFloat {
    fn from(val: f64) -> Self {
        if val.is_nan() {
            Self::Nan
        } else if val.is_infinite() {
            if val.is_sign_negative() {
                Self::NegInfinity
            } else {
                Self::PosInfinity
            }
        } else if val == 0.0 {
            Self::zero()
        } else {
            let (frac, exp) = crate::native::integer_decode_f64(val);
            Self::Real(val.is_sign_negative(), exp as isize, Integer::from(frac)).canonicalize()
        }
    }
}

impl From<f32> for RFloat {
    fn from(val: f32) -> Self {
        RFloat::from(val as f64)
    }
}

impl From<RFloat> for Float {
    fn from(val: RFloat) -> Self {
        use rug::float::*;
        match val {
            RFloat::Nan => Float::with_val(prec_min(), Special::Nan),
            RFloat::PosInfinity => Float::with_val(prec_min(), Special::Infinity),
            RFloat::NegInfinity => Float::with_val(prec_min(), Special::NegInfinity),
            RFloat::Real(s, exp, c) => {
                if c.is_zero() {
                    Float::with_val(prec_min(), 0.0)
                } else {
                    let mut f = Float::new(max(1, c.significant_bits()));
                    let rnd = mpfr::rnd_t::RNDN;
                    let exp = exp as i64;
                    let m = if s { -c } else { c };

                    unsafe {
                        // set `f` to `m * 2^exp`
                        let src_ptr = m.as_raw() as *const mpz_t;
                        let dest_ptr = f.as_raw_mut();
                        let t = mpfr::set_z_2exp(dest_ptr, src_ptr, exp, rnd);
                        assert_eq!(t, 0, "should have been exact");
                    }

                    f
                }
            }
        }
    }
}

impl From<Float> for RFloat {
    fn from(val: Float) -> Self {
        if val.is_nan() {
            Self::Nan
        } else if val.is_infinite() {
            if val.is_sign_negative() {
                Self::NegInfinity
            } else {
                Self::PosInfinity
            }
        } else if val.is_zero() {
            Self::zero()
        } else {
            let mut m = Integer::zero();
            let exp: isize;

            unsafe {
                let ptr = m.as_raw_mut() as *mut mpz_t;
                exp = mpfr::get_z_2exp(ptr, val.as_raw()) as isize;
            }

            Self::Real(m.is_negative(), exp, m.abs()).canonicalize()
        }
    }
}
