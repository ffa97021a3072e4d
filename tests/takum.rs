// uninum: a universal numbers library in Rust
//
// takum.rs
//
// Tests for the takum module

use uninum::rfloat::RFloat;
use uninum::takum::{Takum, TakumContext};
use uninum::RoundingContext;

#[test]
fn unit_pattern_decodes_to_one() {
    // sign=0, D=1, R=0, no exponent bits, zero fraction is 1.0
    let ctx = TakumContext::new(12);
    let one = Takum::from_u64_bits(ctx, 0b0100_0000_0000);
    assert_eq!(one.to_rfloat(), RFloat::from(1.0));
}

#[test]
fn reserved_patterns() {
    let ctx = TakumContext::new(12);
    assert!(ctx.zero().is_zero());
    assert!(ctx.nar().is_nar());
    assert_eq!(ctx.zero().bits().to_u64(), 0);
    assert_eq!(ctx.nar().bits().to_u64(), 1 << 11);
}

#[test]
fn every_pattern_round_trips() {
    // over the full 12-bit space: decode is exact, so re-rounding
    // the decoded value must reproduce the pattern
    let ctx = TakumContext::new(12);
    for bits in 0u64..(1 << 12) {
        let t = Takum::from_u64_bits(ctx.clone(), bits);
        let back = ctx.round(&t.to_rfloat());
        assert_eq!(back.bits(), t.bits(), "pattern {:#014b}", bits);
    }
}

#[test]
fn patterns_order_like_values() {
    let ctx = TakumContext::new(10);
    let signed = |bits: u64| -> i64 {
        let raw = bits as i64;
        if raw >= 512 {
            raw - 1024
        } else {
            raw
        }
    };
    let mut reals: Vec<(i64, Takum)> = (0u64..1024)
        .map(|b| Takum::from_u64_bits(ctx.clone(), b))
        .filter(|t| !t.is_nar())
        .map(|t| (signed(t.bits().to_u64()), t))
        .collect();
    reals.sort_by_key(|(k, _)| *k);
    for pair in reals.windows(2) {
        assert!(
            pair[0].1 < pair[1].1,
            "{} !< {}",
            pair[0].0,
            pair[1].0
        );
    }
}

#[test]
fn negation_is_twos_complement() {
    let ctx = TakumContext::new(12);
    for bits in [1u64, 0x400, 0x7ff, 0x123, 0xabc] {
        let t = Takum::from_u64_bits(ctx.clone(), bits);
        if t.is_nar() || t.is_zero() {
            continue;
        }
        let n = -t.clone();
        assert_eq!(n.to_rfloat(), -t.to_rfloat());
        let expected = (1u64 << 12) - bits;
        assert_eq!(n.bits().to_u64(), expected & 0xfff);
    }
}

#[test]
fn small_integer_arithmetic_is_exact() {
    let ctx = TakumContext::new(16);
    let one = Takum::from_f64(ctx.clone(), 1.0);
    let two = Takum::from_f64(ctx.clone(), 2.0);
    let three = Takum::from_f64(ctx.clone(), 3.0);
    let six = Takum::from_f64(ctx.clone(), 6.0);

    assert_eq!(one.add(&one).bits(), two.bits());
    assert_eq!(two.mul(&three).bits(), six.bits());
    assert_eq!(six.div(&three).bits(), two.bits());
    assert_eq!(six.sub(&three).bits(), three.bits());
    assert_eq!(Takum::from_f64(ctx, 4.0).sqrt().bits(), two.bits());
}

#[test]
fn saturation_at_the_regime_limits() {
    let ctx = TakumContext::new(12);
    let huge = RFloat::Real(false, 300, rug::Integer::from(1));
    assert_eq!(ctx.round(&huge).bits(), ctx.maxpos().bits());
    let tiny = RFloat::Real(false, -300, rug::Integer::from(1));
    assert_eq!(ctx.round(&tiny).bits(), ctx.minpos().bits());
    let neg_huge = RFloat::Real(true, 300, rug::Integer::from(1));
    assert_eq!(ctx.round(&neg_huge).bits(), ctx.maxneg().bits());
}

#[test]
fn nar_is_contagious() {
    let ctx = TakumContext::new(12);
    let one = Takum::from_f64(ctx.clone(), 1.0);
    assert!(ctx.nar().add(&one).is_nar());
    assert!(one.div(&ctx.zero()).is_nar());
    assert!(Takum::from_f64(ctx, -1.0).sqrt().is_nar());
}

#[test]
fn width_extremes() {
    // the narrowest takum still carries sign, direction, regime
    let ctx = TakumContext::new(5);
    for bits in 0u64..32 {
        let t = Takum::from_u64_bits(ctx.clone(), bits);
        let back = ctx.round(&t.to_rfloat());
        assert_eq!(back.bits(), t.bits(), "pattern {:#07b}", bits);
    }
    assert!(TakumContext::try_new(4).is_err());
}
