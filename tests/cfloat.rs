// uninum: a universal numbers library in Rust
//
// cfloat.rs
//
// Tests for the parameterized floating-point format and its
// blocktriple rounding funnel

use uninum::cfloat::{CFloat, CFloatContext};
use uninum::real::FormatTag;
use uninum::rfloat::RFloat;
use uninum::triple::TripleOp;
use uninum::{FloatClass, RoundingContext};

fn all_patterns(ctx: &CFloatContext) -> impl Iterator<Item = CFloat> + '_ {
    (0u64..(1 << ctx.nbits())).map(move |bits| CFloat::from_u64_bits(ctx.clone(), bits))
}

#[test]
fn saturating_overflow_without_supernormals() {
    // maxpos + maxpos stays at maxpos, not infinity
    let ctx = CFloatContext::new(2, 8).with_supernormals(false);
    let a = CFloat::from_u64_bits(ctx.clone(), 0b01111110);
    assert_eq!(a.to_f64(), 7.75);
    let sum = a.clone() + a.clone();
    assert_eq!(sum.bits().to_u64(), 0b01111110);
    assert_eq!(sum, ctx.maxpos());
    assert!(!sum.is_infinite());
}

#[test]
fn decode_and_round_trip_small_normals() {
    // 3.5 under the standard es = 2 layout is 0b01011
    let ctx = CFloatContext::new(2, 5);
    let x = CFloat::from_u64_bits(ctx.clone(), 0b01011);
    let t = ctx.decode(&x, TripleOp::Add);
    assert!(!t.sign_bit());
    assert_eq!(t.scale(), 1);
    assert_eq!(x.to_f64(), 3.5);
    let back = ctx.round_triple(&t);
    assert_eq!(back.bits().to_u64(), 0b01011);

    // the same value under a one-bit exponent with extended range
    // lands on 0b01110
    let ctx = CFloatContext::new(1, 5).with_supernormals(false);
    let y = CFloat::from_u64_bits(ctx.clone(), 0b01110);
    assert_eq!(y.to_f64(), 3.5);
    let t = ctx.decode(&y, TripleOp::Add);
    assert_eq!(t.scale(), 1);
    assert_eq!(ctx.round_triple(&t).bits().to_u64(), 0b01110);
}

#[test]
fn every_pattern_round_trips_through_the_funnel() {
    // decode-then-round reproduces the encoding for every pattern
    // and every op layout
    for ctx in [
        CFloatContext::new(2, 8),
        CFloatContext::new(3, 8),
        CFloatContext::new(2, 8).with_supernormals(false),
        CFloatContext::new(4, 10),
    ] {
        for x in all_patterns(&ctx) {
            for op in [TripleOp::Add, TripleOp::Mul, TripleOp::Div] {
                let t = ctx.decode(&x, op);
                let back = ctx.round_triple(&t);
                if x.is_nan() {
                    assert!(back.is_nan());
                } else if x.is_zero() {
                    assert!(back.is_zero());
                    assert_eq!(back.sign_field(), x.sign_field());
                } else {
                    assert_eq!(
                        back.bits(),
                        x.bits(),
                        "pattern {} in cfloat<{},{}>",
                        x.bits(),
                        ctx.nbits(),
                        ctx.es()
                    );
                }
            }
        }
    }
}

#[test]
fn addition_matches_the_exact_oracle() {
    // every pair in a small format: the funnel must agree with
    // exact addition rounded once
    let ctx = CFloatContext::new(2, 6);
    for a in all_patterns(&ctx) {
        for b in all_patterns(&ctx) {
            if a.is_nan() || b.is_nan() {
                assert!((a.clone() + b.clone()).is_nan());
                continue;
            }
            let sum = a.clone() + b.clone();
            let oracle = ctx.round(&a.to_rfloat().add_exact(&b.to_rfloat()));
            if sum.is_zero() {
                // the interchange format folds signed zeros together
                assert!(oracle.is_zero());
                continue;
            }
            assert_eq!(
                sum.bits(),
                oracle.bits(),
                "{} + {} -> {} vs oracle {}",
                a.bits(),
                b.bits(),
                sum.bits(),
                oracle.bits()
            );
        }
    }
}

#[test]
fn multiplication_matches_the_exact_oracle() {
    let ctx = CFloatContext::new(2, 6);
    for a in all_patterns(&ctx) {
        for b in all_patterns(&ctx) {
            if a.is_nan() || b.is_nan() {
                continue;
            }
            if a.is_infinite() && b.is_zero() || a.is_zero() && b.is_infinite() {
                assert!((a.clone() * b.clone()).is_nan());
                continue;
            }
            let prod = a.clone() * b.clone();
            let oracle = ctx.round(&a.to_rfloat().mul_exact(&b.to_rfloat()));
            if prod.is_zero() {
                assert!(oracle.is_zero());
                continue;
            }
            assert_eq!(prod.bits(), oracle.bits());
        }
    }
}

#[test]
fn monotone_decode_in_the_positive_range() {
    // bit-pattern order matches numeric order for positive
    // finite encodings
    let ctx = CFloatContext::new(2, 8);
    let mut prev: Option<CFloat> = None;
    for bits in 0u64..(1 << 7) {
        let x = CFloat::from_u64_bits(ctx.clone(), bits);
        if !x.is_finite() {
            continue;
        }
        if let Some(p) = prev {
            assert!(p < x || (p.is_zero() && x.is_zero()));
        }
        prev = Some(x);
    }
}

#[test]
fn subnormal_rounding_and_flush() {
    let ctx = CFloatContext::new(3, 8);
    // halfway below minpos-subnormal rounds to even (zero)
    let tiny = RFloat::pow2(ctx.emin() - 1);
    assert!(ctx.round(&tiny).is_zero());
    // three quarters of minpos rounds up to minpos
    let three_q = tiny.mul_exact(&RFloat::Real(false, -1, rug::Integer::from(3)));
    assert_eq!(ctx.round(&three_q), ctx.minpos());

    // without subnormals the whole region collapses to zero/minpos
    let ctx = CFloatContext::new(3, 8).with_subnormals(false);
    let just_below = RFloat::pow2(ctx.emin() - 1);
    assert!(ctx.round(&just_below).is_zero());
}

#[test]
fn signed_zero_and_nan_rules() {
    let ctx = CFloatContext::new(2, 8);
    let pz = ctx.zero(false);
    let nz = ctx.zero(true);
    assert_eq!((pz.clone() + nz.clone()).sign_field(), false);
    assert_eq!((nz.clone() + nz.clone()).sign_field(), true);

    let inf = ctx.infinity(false);
    let ninf = ctx.infinity(true);
    assert!((inf.clone() + ninf.clone()).is_nan());
    assert!((inf.clone() * pz.clone()).is_nan());
    assert!((pz / nz).is_nan());

    assert_eq!(ctx.nan().classify(), FloatClass::Nan);
}

#[test]
fn throwing_mode_reports_division_errors() {
    use uninum::ArithError;
    let ctx = CFloatContext::new(2, 8);
    let one = CFloat::from_f64(ctx.clone(), 1.0);
    let zero = ctx.zero(false);
    assert_eq!(one.checked_div(&zero), Err(ArithError::DivideByZero));
    assert!(matches!(
        zero.clone().checked_div(&zero),
        Err(ArithError::InvalidOperation(_))
    ));
}

#[test]
fn configuration_errors_are_reported() {
    assert!(CFloatContext::try_new(0, 8).is_err());
    assert!(CFloatContext::try_new(3, 4).is_err());
    let r = std::panic::catch_unwind(|| {
        CFloatContext::new(1, 5)
            .with_subnormals(false)
            .with_supernormals(false)
    });
    assert!(r.is_err());
}

#[test]
fn extreme_values_match_the_flag_table() {
    // supernormals reserved: maxpos has an all-ones-minus-one exponent
    let ctx = CFloatContext::new(2, 8);
    let m = ctx.maxpos();
    assert_eq!(m.exp_field(), 0b10);
    assert_eq!(m.frac_field(), rug::Integer::from(0b11111));

    // supernormals reclaimed: the exponent reaches all ones and only
    // the one NaN pattern sits above maxpos
    let ctx = CFloatContext::new(2, 8).with_supernormals(false);
    let m = ctx.maxpos();
    assert_eq!(m.exp_field(), 0b11);
    assert_eq!(m.frac_field(), rug::Integer::from(0b11110));
}
