/*!
The mathematical escape hatch of this crate:
round-to-odd arithmetic using MPFR.

Round-to-odd is a special rounding mode that supports safe re-rounding
at slightly lower precision in any of the standard rounding modes: an
operation computed with round-to-odd at `p + 2` bits re-rounds to `p`
bits exactly as if computed once at `p` bits. MPFR does not support
round-to-odd natively, but it can be emulated: compute at `p - 1` bits
with round-to-zero and force the last bit to the inexactness of the
result.

All computation is done on [`RFloat`] values. These kernels back the
operations that have no exact finite-precision form: division and
square root for the tapered formats, and the base-2 exponential and
logarithm inside [`lns`][crate::lns] rounding.
*/

use gmp_mpfr_sys::mpfr;
use rug::Float;

use crate::rfloat::RFloat;

// translates a `p - 1` bit round-to-zero result and its ternary value
// into a `p` bit round-to-odd result
fn with_ternary(val: RFloat, t: i32) -> RFloat {
    match val {
        RFloat::Real(s, exp, mut c) => {
            if c == 0 {
                return RFloat::Real(s, exp, c);
            }
            c <<= 1;
            if t != 0 {
                // the result was inexact: force the odd bit
                c += 1;
            }
            RFloat::Real(s, exp - 1, c)
        }
        other => other,
    }
}

macro_rules! mpfr_1ary {
    ($name:ident, $mpfr:ident, $cname:expr) => {
        #[doc = "Given an [`RFloat`] value, computes `"]
        #[doc = $cname]
        #[doc = "` using MPFR to produce the round-to-odd result with `p` binary digits of precision."]
        pub fn $name(src: &RFloat, p: usize) -> RFloat {
            use mpfr::{rnd_t::RNDZ, PREC_MAX, PREC_MIN};
            assert!(
                p as i64 > PREC_MIN && p as i64 <= PREC_MAX,
                "precision must be between {} and {}",
                PREC_MIN + 1,
                PREC_MAX
            );

            // compute with `p - 1` bits
            let mut dst = Float::new((p - 1) as u32);
            let src = Float::from(src.clone());
            let t = unsafe { mpfr::$mpfr(dst.as_raw_mut(), src.as_raw(), RNDZ) };

            // apply the correction to get the last bit
            with_ternary(RFloat::from(dst), t)
        }
    };
}

macro_rules! mpfr_2ary {
    ($name:ident, $mpfr:ident, $cname:expr) => {
        #[doc = "Given two [`RFloat`] values, computes `"]
        #[doc = $cname]
        #[doc = "` using MPFR to produce the round-to-odd result with `p` binary digits of precision."]
        pub fn $name(src1: &RFloat, src2: &RFloat, p: usize) -> RFloat {
            use mpfr::{rnd_t::RNDZ, PREC_MAX, PREC_MIN};
            assert!(
                p as i64 > PREC_MIN && p as i64 <= PREC_MAX,
                "precision must be between {} and {}",
                PREC_MIN + 1,
                PREC_MAX
            );

            // compute with `p - 1` bits
            let mut dst = Float::new((p - 1) as u32);
            let src1 = Float::from(src1.clone());
            let src2 = Float::from(src2.clone());
            let t =
                unsafe { mpfr::$mpfr(dst.as_raw_mut(), src1.as_raw(), src2.as_raw(), RNDZ) };

            // apply the correction to get the last bit
            with_ternary(RFloat::from(dst), t)
        }
    };
}

// Unary round-to-odd kernels
mpfr_1ary!(sqrt_rto, sqrt, "sqrt(x)");
mpfr_1ary!(exp2_rto, exp2, "2^x");
mpfr_1ary!(log2_rto, log2, "log2(x)");

// Binary round-to-odd kernels
mpfr_2ary!(add_rto, add, "x + y");
mpfr_2ary!(sub_rto, sub, "x - y");
mpfr_2ary!(mul_rto, mul, "x * y");
mpfr_2ary!(div_rto, div, "x / y");
mpfr_2ary!(pow_rto, pow, "x ^ y");
