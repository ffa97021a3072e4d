// uninum: a universal numbers library in Rust
//
// rfloat.rs
//
// Tests for the rfloat module

use rug::Integer;

use uninum::rfloat::{RFloat, RFloatContext};
use uninum::{Real, RoundingContext, RoundingMode};

/// Testing all the required methods from [`uninum::Real`].
#[test]
fn traits() {
    assert_eq!(RFloat::radix(), 2, "RFloat is a binary format");

    let vals = [
        RFloat::zero(),                             // 0
        RFloat::one(),                              // 1
        RFloat::Real(true, -4, Integer::from(7)),   // -7 * 2^-4
        RFloat::PosInfinity,                        // +Inf
        RFloat::NegInfinity,                        // -Inf
        RFloat::Nan,                                // NaN
    ];

    // RFloat::sign
    let expected = [false, false, true, false, true, false];
    for (val, &expected) in vals.iter().zip(expected.iter()) {
        let actual = val.sign();
        assert_eq!(
            actual, expected,
            "{:?} has unexpected sign; expected {}, actual {}",
            val, expected, actual
        );
    }

    // RFloat::exp
    let expected = [None, Some(0), Some(-4), None, None, None];
    for (val, &expected) in vals.iter().zip(expected.iter()) {
        let actual = val.exp();
        assert_eq!(
            actual, expected,
            "{:?} has unexpected exponent (exp); expected {:?}, actual {:?}",
            val, expected, actual
        );
    }

    // RFloat::e
    let expected = [None, Some(0), Some(-2), None, None, None];
    for (val, &expected) in vals.iter().zip(expected.iter()) {
        let actual = val.e();
        assert_eq!(
            actual, expected,
            "{:?} has unexpected exponent (e); expected {:?}, actual {:?}",
            val, expected, actual
        );
    }

    // RFloat::n
    let expected = [None, Some(-1), Some(-5), None, None, None];
    for (val, expected) in vals.iter().zip(expected.iter()) {
        let actual = val.n();
        assert_eq!(
            actual,
            expected.clone(),
            "{:?} has unexpected least significant exponent (n); expected {:?}, actual {:?}",
            val,
            expected,
            actual
        );
    }

    // RFloat::c
    let expected = [
        Some(Integer::from(0)),
        Some(Integer::from(1)),
        Some(Integer::from(7)),
        None,
        None,
        None,
    ];
    for (val, expected) in vals.iter().zip(expected.iter()) {
        let actual = val.c();
        assert_eq!(
            actual,
            expected.clone(),
            "{:?} has unexpected significand (c): expected {:?}, actual {:?}",
            val,
            expected,
            actual
        );
    }

    // RFloat::m
    let expected = [
        Some(Integer::from(0)),
        Some(Integer::from(1)),
        Some(Integer::from(-7)),
        None,
        None,
        None,
    ];
    for (val, expected) in vals.iter().zip(expected.iter()) {
        let actual = val.m();
        assert_eq!(
            actual,
            expected.clone(),
            "{:?} has unexpected significand (m): expected {:?}, actual {:?}",
            val,
            expected,
            actual
        );
    }

    // RFloat::p
    let expected = [0, 1, 3, 0, 0, 0];
    for (val, expected) in vals.iter().zip(expected.iter()) {
        let actual = val.p();
        assert_eq!(
            actual,
            expected.clone(),
            "{:?} has unexpected precision (p): expected {:?}, actual {:?}",
            val,
            expected,
            actual
        );
    }

    // RFloat::is_nar
    let expected = [false, false, false, true, true, true];
    for (val, expected) in vals.iter().zip(expected.iter()) {
        let actual = val.is_nar();
        assert_eq!(
            actual,
            expected.clone(),
            "{:?} is unexpectedly not-a-real (NAR): expected {:?}, actual {:?}",
            val,
            expected,
            actual
        );
    }

    // RFloat::is_finite
    let expected = [true, true, true, false, false, false];
    for (val, expected) in vals.iter().zip(expected.iter()) {
        let actual = val.is_finite();
        assert_eq!(
            actual,
            expected.clone(),
            "{:?} is unexpectedly finite: expected {:?}, actual {:?}",
            val,
            expected,
            actual
        );
    }

    // RFloat::is_infinite
    let expected = [false, false, false, true, true, false];
    for (val, expected) in vals.iter().zip(expected.iter()) {
        let actual = val.is_infinite();
        assert_eq!(
            actual,
            expected.clone(),
            "{:?} is unexpectedly infinite: expected {:?}, actual {:?}",
            val,
            expected,
            actual
        );
    }

    // RFloat::is_zero
    let expected = [true, false, false, false, false, false];
    for (val, expected) in vals.iter().zip(expected.iter()) {
        let actual = val.is_zero();
        assert_eq!(
            actual,
            expected.clone(),
            "{:?} is unexpectedly zero: expected {:?}, actual {:?}",
            val,
            expected,
            actual
        );
    }

    // RFloat::is_negative
    let expected = [None, Some(false), Some(true), Some(false), Some(true), None];
    for (val, expected) in vals.iter().zip(expected.iter()) {
        let actual = val.is_negative();
        assert_eq!(
            actual,
            expected.clone(),
            "{:?} has unexpected signedness: expected {:?}, actual {:?}",
            val,
            expected,
            actual
        );
    }
}

/// Testing rounding for easy cases
#[test]
fn round_trivial() {
    // rounding context
    let ctx = RFloatContext::new().with_max_p(1);

    // round(zero) = zero
    let (rounded_zero, err) = ctx.round_residual(&RFloat::zero());
    assert!(rounded_zero.is_zero(), "round(0) = 0");
    assert!(err.is_zero(), "rounding 0 should have no residual");

    // round(+Inf) = +Inf
    let (rounded_pos_inf, err) = ctx.round_residual(&RFloat::PosInfinity);
    assert!(rounded_pos_inf.is_infinite(), "round(+Inf) = +Inf");
    assert!(err.is_zero(), "rounding +Inf should have no residual");

    // round(-Inf) = -Inf
    let (rounded_neg_inf, err) = ctx.round_residual(&RFloat::NegInfinity);
    assert!(rounded_neg_inf.is_infinite(), "round(-Inf) = -Inf");
    assert!(err.is_zero(), "rounding -Inf should have no residual");

    // round(Nan) = Nan
    let (rounded_nan, err) = ctx.round_residual(&RFloat::Nan);
    assert!(rounded_nan.is_nar(), "round(Nan) = Nan");
    assert!(err.is_zero(), "rounding Nan should have no residual");
}

/// Testing rounding using fixed-point rounding
#[test]
fn round_fixed() {
    // 1 (min_n == -1)
    let ctx = RFloatContext::new().with_min_n(-1);
    let one = RFloat::Real(false, -2, Integer::from(4));
    let rounded_one = ctx.round(&one);
    assert_eq!(rounded_one, one, "rounding should not have lost bits");

    // 1 (min_n == 0): a tie between 0 and 2, and 0 is even
    let ctx = RFloatContext::new().with_min_n(0);
    let one = RFloat::Real(false, -2, Integer::from(4));
    let rounded_one = ctx.round(&one);
    assert_eq!(
        rounded_one,
        RFloat::zero(),
        "rounding should have truncated to 0"
    );

    // 3 (min_n == 0): rounds up to 4
    let three = RFloat::Real(false, 0, Integer::from(3));
    let rounded_three = ctx.round(&three);
    assert_eq!(
        rounded_three,
        RFloat::Real(false, 2, Integer::from(1)),
        "rounding should have rounded away from the odd candidate"
    );
}

/// Testing rounding limited by precision
#[test]
fn round_precision() {
    // 7 at 2 bits of precision: the tie at 0b11|1 breaks upward
    // and the carry shifts the significand down one place
    let ctx = RFloatContext::new().with_max_p(2);
    let seven = RFloat::Real(false, 0, Integer::from(7));
    let rounded = ctx.round(&seven);
    assert_eq!(rounded, RFloat::Real(false, 3, Integer::from(1)), "7 -> 8");

    // 5 at 2 bits: the tie at 0b10|1 keeps the even candidate
    let five = RFloat::Real(false, 0, Integer::from(5));
    let rounded = ctx.round(&five);
    assert_eq!(rounded, RFloat::Real(false, 2, Integer::from(1)), "5 -> 4");

    // directed rounding to odd marks any inexactness in the last bit
    let ctx = RFloatContext::new()
        .with_max_p(3)
        .with_rounding_mode(RoundingMode::ToOdd);
    let rounded = ctx.round(&RFloat::Real(false, 0, Integer::from(9)));
    assert_eq!(rounded, RFloat::Real(false, 1, Integer::from(5)), "9 -> 10");

    // both parameters: min_n takes precedence below the precision,
    // pinning the result lsb at halves
    let ctx = RFloatContext::new().with_max_p(10).with_min_n(-2);
    let v = RFloat::Real(false, -3, Integer::from(0b1011));
    let rounded = ctx.round(&v);
    assert_eq!(
        rounded,
        RFloat::Real(false, -1, Integer::from(3)),
        "1.375 -> 1.5 at halves"
    );
}

/// The residual returned next to a rounded value recomposes the input
#[test]
fn round_residual_recomposes() {
    let ctx = RFloatContext::new().with_max_p(3);
    for c in [3u32, 7, 9, 21, 173, 255] {
        for exp in [-7isize, -2, 0, 5] {
            let val = RFloat::Real(false, exp, Integer::from(c));
            let (rounded, lost) = ctx.round_residual(&val);
            // the split itself is exact: high + low == input
            let truncated = rounded.clone().add_exact(&lost) == val;
            // or the increment pushed the rounded value one ulp past it
            let above = rounded > val;
            assert!(
                truncated || above,
                "{:?} split into {:?} + {:?}",
                val,
                rounded,
                lost
            );
        }
    }
}

/// Exact addition, including the IEEE special-value rules
#[test]
fn add_exactness() {
    // misaligned significands combine without loss
    let a = RFloat::Real(false, 0, Integer::from(1));
    let b = RFloat::Real(false, -60, Integer::from(1));
    let sum = a.add_exact(&b);
    assert_eq!(
        sum,
        RFloat::Real(false, -60, (Integer::from(1) << 60u32) + 1),
        "1 + 2^-60 keeps every bit"
    );

    // commutative
    assert_eq!(sum, b.add_exact(&a));

    // cancellation is exact and canonicalizes to +0
    let neg = RFloat::Real(true, 0, Integer::from(1));
    let zero = a.add_exact(&neg);
    assert!(zero.is_zero());
    assert_eq!(zero.sign(), false);

    // infinities
    assert_eq!(
        RFloat::PosInfinity.add_exact(&RFloat::Real(false, 0, Integer::from(3))),
        RFloat::PosInfinity
    );
    assert!(RFloat::PosInfinity.add_exact(&RFloat::NegInfinity).is_nan());
    assert!(RFloat::Nan.add_exact(&a).is_nan());
}

/// Exact multiplication, including the IEEE special-value rules
#[test]
fn mul_exactness() {
    let a = RFloat::Real(false, -4, Integer::from(7)); // 7/16
    let b = RFloat::Real(true, 2, Integer::from(5)); // -20
    let prod = a.mul_exact(&b);
    assert_eq!(
        prod,
        RFloat::Real(true, -2, Integer::from(35)),
        "significands multiply, exponents add"
    );
    assert_eq!(prod, b.mul_exact(&a));

    // zero absorbs finite values
    assert!(a.mul_exact(&RFloat::zero()).is_zero());

    // Inf * 0 is undefined, Inf * finite keeps the sign rule
    assert!(RFloat::PosInfinity.mul_exact(&RFloat::zero()).is_nan());
    assert_eq!(RFloat::PosInfinity.mul_exact(&b), RFloat::NegInfinity);
    assert_eq!(RFloat::NegInfinity.mul_exact(&b), RFloat::PosInfinity);
    assert!(RFloat::Nan.mul_exact(&b).is_nan());
}

/// Conversions to and from native doubles
#[test]
fn native_conversions() {
    for x in [0.0f64, 1.0, -1.5, 0.1, 5e-324, 1.7976931348623157e308] {
        let v = RFloat::from(x);
        assert_eq!(v.to_f64().to_bits(), x.to_bits(), "{} round-trips", x);
    }
    // -0 canonicalizes to +0
    assert!(RFloat::from(-0.0).is_zero());
    assert_eq!(RFloat::from(-0.0).sign(), false);
    // values beyond 53 bits round to nearest on the way out
    let wide = RFloat::Real(false, 0, (Integer::from(1) << 53u32) + 1);
    assert_eq!(wide.to_f64(), 9007199254740992.0);
}
