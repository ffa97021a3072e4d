// uninum: a universal numbers library in Rust
//
// lns.rs
//
// Tests for the logarithmic number system

use uninum::lns::{Lns, LnsContext};
use uninum::rfloat::RFloat;
use uninum::RoundingContext;

#[test]
fn decode_quarter_log_steps() {
    // the log field of lns<5,2> steps in quarters: L = 5 encodes
    // 2^(1 + 0.25)
    let ctx = LnsContext::new(5, 2);
    let x = Lns::from_u64_bits(ctx, 0b00101);
    let v = x.to_f64();
    assert!((v - 2.378414).abs() < 1e-5, "{}", v);
}

#[test]
fn integer_logs_decode_exactly() {
    let ctx = LnsContext::new(8, 2);
    // L = 8 -> log 2 -> value 4
    let x = Lns::from_u64_bits(ctx.clone(), 8);
    assert_eq!(x.to_rfloat(64), RFloat::from(4.0));
    // pattern 0 encodes log 0, the value 1
    let one = Lns::from_u64_bits(ctx.clone(), 0);
    assert_eq!(one.to_rfloat(64), RFloat::from(1.0));
    // negative logs reach below one
    let neg = ctx.round(&RFloat::from(0.25));
    assert_eq!(neg.log_field(), -8);
}

#[test]
fn reserved_encodings() {
    let ctx = LnsContext::new(6, 2);
    assert!(ctx.zero().is_zero());
    assert!(ctx.nan().is_nan());
    assert!(ctx.round(&RFloat::zero()).is_zero());
    assert!(ctx.round(&RFloat::Nan).is_nan());
    // zero times anything is zero; NaN is contagious
    let two = Lns::from_f64(ctx.clone(), 2.0);
    assert!(ctx.zero().mul(&two).is_zero());
    assert!(ctx.nan().mul(&two).is_nan());
    assert!(two.div(&ctx.zero()).is_nan());
}

#[test]
fn mul_is_log_add() {
    let ctx = LnsContext::new(8, 2);
    let a = Lns::from_f64(ctx.clone(), 2.0);
    let b = Lns::from_f64(ctx.clone(), 4.0);
    let p = a.mul(&b);
    assert_eq!(p.log_field(), a.log_field() + b.log_field());
    assert_eq!(p.to_rfloat(64), RFloat::from(8.0));

    // signs multiply through
    let na = -a.clone();
    assert_eq!(na.mul(&b).to_rfloat(64), RFloat::from(-8.0));

    // saturation at the top of the log range
    let m = ctx.maxpos();
    assert_eq!(m.mul(&m).log_field(), ctx.log_max());
}

#[test]
fn div_is_log_sub() {
    let ctx = LnsContext::new(8, 3);
    let a = Lns::from_f64(ctx.clone(), 8.0);
    let b = Lns::from_f64(ctx.clone(), 2.0);
    let q = a.div(&b);
    assert_eq!(q.log_field(), a.log_field() - b.log_field());
    assert_eq!(q.to_rfloat(64), RFloat::from(4.0));
}

#[test]
fn add_routes_through_the_linear_domain() {
    let ctx = LnsContext::new(10, 3);
    let a = Lns::from_f64(ctx.clone(), 2.0);
    let b = Lns::from_f64(ctx.clone(), 2.0);
    let sum = a.add(&b);
    // 2 + 2 = 4 is exactly representable (log 2)
    assert_eq!(sum.to_rfloat(64), RFloat::from(4.0));

    // 2 + 1 rounds to the nearest log point of 3
    let one = Lns::from_f64(ctx.clone(), 1.0);
    let three = Lns::from_f64(ctx.clone(), 3.0);
    assert_eq!(a.add(&one).bits(), three.bits());

    // x + (-x) cancels to the reserved zero
    let na = -a.clone();
    assert!(a.add(&na).is_zero());
}

#[test]
fn round_trip_every_encoding() {
    // encode(decode(bits)) == bits over the whole space
    let ctx = LnsContext::new(7, 2);
    for bits in 0u64..(1 << 7) {
        let x = Lns::from_u64_bits(ctx.clone(), bits);
        let back = ctx.round(&x);
        assert_eq!(back.bits(), x.bits(), "pattern {:#09b}", bits);
    }
}

#[test]
fn ordering_is_monotone_in_the_log_field() {
    let ctx = LnsContext::new(6, 2);
    let vals: Vec<Lns> = (ctx.log_min()..=ctx.log_max())
        .map(|l| {
            // positive encodings in increasing log order
            Lns::from_u64_bits(ctx.clone(), (l as i64 & 0x1f) as u64)
        })
        .collect();
    for pair in vals.windows(2) {
        assert!(pair[0] < pair[1]);
    }
    // negatives mirror below zero
    let neg_small = Lns::from_f64(ctx.clone(), -0.5);
    let neg_big = Lns::from_f64(ctx.clone(), -4.0);
    assert!(neg_big < neg_small);
    assert!(neg_small < Lns::from_f64(ctx, 0.25));
}

#[test]
fn conversion_clamps_to_the_representable_range() {
    let ctx = LnsContext::new(5, 2);
    assert_eq!(ctx.round(&RFloat::from(1e30)).bits(), ctx.maxpos().bits());
    assert_eq!(ctx.round(&RFloat::from(1e-30)).bits(), ctx.minpos().bits());
}
