// uninum: a universal numbers library in Rust
//
// quire.rs
//
// Tests for the wide fixed-point accumulator

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use uninum::cfloat::{CFloat, CFloatContext};
use uninum::posit::{Posit, PositContext};
use uninum::quire::QuireContext;
use uninum::rfloat::RFloat;
use uninum::ArithError;

#[test]
fn accumulation_is_exact_against_the_oracle() {
    let ctx = CFloatContext::new(4, 12);
    let qctx = QuireContext::for_cfloat(&ctx, QuireContext::DEFAULT_CAPACITY);
    let mut q = qctx.quire();
    let mut oracle = RFloat::zero();

    let mut rng = StdRng::seed_from_u64(0xacc);
    for _ in 0..200 {
        let x = CFloat::from_f64(ctx.clone(), rng.gen_range(-100.0..100.0));
        q.add_assign(&x).unwrap();
        oracle = oracle.add_exact(&x.to_rfloat());
    }
    assert_eq!(q.to_rfloat(), oracle);
}

#[test]
fn accumulation_order_does_not_matter() {
    // the quire is associative and commutative up to its width
    let ctx = PositContext::new(1, 12);
    let qctx = QuireContext::for_posit(&ctx, 20);

    let mut rng = StdRng::seed_from_u64(0xc0);
    let values: Vec<Posit> = (0..100)
        .map(|_| Posit::from_u64_bits(ctx.clone(), rng.gen_range(1..4096)))
        .filter(|p| !p.is_nar())
        .collect();

    let mut fwd = qctx.quire();
    for v in &values {
        fwd.add_assign(v).unwrap();
    }
    let mut rev = qctx.quire();
    for v in values.iter().rev() {
        rev.add_assign(v).unwrap();
    }
    assert_eq!(fwd.bits(), rev.bits());
}

#[test]
fn exact_dot_product() {
    // the canonical quire use: sum of products with one rounding
    let ctx = PositContext::new(0, 8);
    let qctx = QuireContext::for_posit(&ctx, 20);
    let mut q = qctx.quire();
    let mut oracle = RFloat::zero();

    let mut rng = StdRng::seed_from_u64(0xd07);
    for _ in 0..50 {
        let a = Posit::from_u64_bits(ctx.clone(), rng.gen_range(1..256));
        let b = Posit::from_u64_bits(ctx.clone(), rng.gen_range(1..256));
        if a.is_nar() || b.is_nar() {
            continue;
        }
        q.mul_add_assign(&a, &b).unwrap();
        oracle = oracle.add_exact(&a.to_rfloat().mul_exact(&b.to_rfloat()));
    }
    assert_eq!(q.to_rfloat(), oracle);

    // rounding out of the quire equals rounding the exact sum
    use uninum::RoundingContext;
    let out = q.round_into(&ctx);
    assert_eq!(out.bits(), ctx.round(&oracle).bits());
}

#[test]
fn subtraction_cancels_exactly() {
    let ctx = CFloatContext::new(3, 10);
    let qctx = QuireContext::for_cfloat(&ctx, 10);
    let mut q = qctx.quire();

    let x = CFloat::from_f64(ctx.clone(), 3.25);
    let y = CFloat::from_f64(ctx.clone(), 0.5);
    q.add_assign(&x).unwrap();
    q.add_assign(&y).unwrap();
    q.sub_assign(&x).unwrap();
    assert_eq!(q.to_rfloat(), RFloat::from(0.5));
    q.sub_assign(&y).unwrap();
    assert!(q.is_zero());
}

#[test]
fn range_violations_raise() {
    let ctx = CFloatContext::new(3, 10);
    let qctx = QuireContext::for_cfloat(&ctx, 4);
    let mut q = qctx.quire();

    // far above the upper range plus capacity
    let huge = RFloat::Real(false, 10_000, rug::Integer::from(1));
    assert_eq!(q.add_assign(&huge), Err(ArithError::OperandTooLarge));

    // below the lower range
    let tiny = RFloat::Real(false, -10_000, rug::Integer::from(1));
    assert_eq!(q.add_assign(&tiny), Err(ArithError::OperandTooSmall));

    // non-real operands are invalid
    assert!(matches!(
        q.add_assign(&RFloat::Nan),
        Err(ArithError::InvalidOperation(_))
    ));

    // the failed inserts left the accumulator untouched
    assert!(q.is_zero());
}

#[test]
fn to_triple_renormalizes_with_sticky() {
    use uninum::triple::TripleOp;
    let ctx = CFloatContext::new(3, 10);
    let qctx = QuireContext::for_cfloat(&ctx, 8);
    let mut q = qctx.quire();

    q.add_assign(&RFloat::from(6.5)).unwrap();
    let t = q.to_triple(ctx.fbits(), TripleOp::Add);
    assert!(!t.sign_bit());
    assert_eq!(t.scale(), 2);
    assert_eq!(t.to_rfloat(), RFloat::from(6.5));
}
