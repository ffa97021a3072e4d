// uninum: a universal numbers library in Rust
//
// cascade.rs
//
// Tests for the fixed-width cascade formats (dd/td/qd)

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use uninum::cascade::{DoubleDouble, QuadDouble, TripleDouble};
use uninum::decimal::FormatOptions;
use uninum::eft::is_nonoverlapping;
use uninum::rfloat::RFloat;
use uninum::Real;

fn random_cascade<const N: usize>(
    rng: &mut StdRng,
) -> uninum::cascade::FloatCascade<N> {
    let mantissa: f64 = rng.gen_range(-1.0..1.0);
    let exp: i32 = rng.gen_range(-100..100);
    let hi = mantissa * 2.0f64.powi(exp);
    let lo = rng.gen_range(-1.0..1.0) * 2.0f64.powi(exp - 55);
    uninum::cascade::FloatCascade::<N>::from_f64(hi) + lo
}

#[test]
fn dd_cancellation_keeps_the_half_ulp() {
    // (1 + ulp/2) - 1 == ulp/2, bit for bit
    let a = DoubleDouble::from_limbs([1.0, f64::EPSILON / 2.0]);
    let b = DoubleDouble::from_f64(-1.0);
    let sum = a + b;
    assert_eq!(sum.limb(0).to_bits(), 0x3CA0000000000000);
    assert_eq!(sum.limb(1), 0.0);
}

#[test]
fn qd_holds_2_53_plus_one_exactly() {
    // 2^53 + 1 does not fit a double but fits a quad-double
    let a = QuadDouble::from_f64(9007199254740992.0);
    let b = QuadDouble::from_f64(1.0);
    let sum = a + b;
    assert_eq!(sum.limbs(), &[9007199254740992.0, 1.0, 0.0, 0.0]);
    assert_eq!((sum - a).to_f64(), 1.0);
    assert_eq!(sum.to_rfloat(), RFloat::from(9007199254740992.0).add_exact(&RFloat::from(1.0)));
}

#[test]
fn add_commutes_and_stays_nonoverlapping() {
    let mut rng = StdRng::seed_from_u64(0xadd);
    for _ in 0..300 {
        let a = random_cascade::<4>(&mut rng);
        let b = random_cascade::<4>(&mut rng);
        let ab = a + b;
        let ba = b + a;
        assert_eq!(ab, ba);
        assert!(is_nonoverlapping(ab.limbs()));
    }
}

#[test]
fn mul_commutes_and_stays_nonoverlapping() {
    let mut rng = StdRng::seed_from_u64(0x301);
    for _ in 0..300 {
        let a = random_cascade::<3>(&mut rng);
        let b = random_cascade::<3>(&mut rng);
        let ab = a * b;
        let ba = b * a;
        assert_eq!(ab, ba);
        assert!(is_nonoverlapping(ab.limbs()));
    }
}

#[test]
fn td_mul_matches_exact_product_to_working_precision() {
    let mut rng = StdRng::seed_from_u64(0x7d);
    for _ in 0..100 {
        let a = random_cascade::<3>(&mut rng);
        let b = random_cascade::<3>(&mut rng);
        let p = a * b;
        let exact = a.to_rfloat().mul_exact(&b.to_rfloat());
        let err = p.to_rfloat().add_exact(&-exact.clone());
        if exact.is_zero() {
            continue;
        }
        // relative error below 2^-150 for a 159-bit format
        let bound = exact.mul_exact(&RFloat::pow2(-150));
        assert!(
            err.clone().abs_cmp_le(&bound),
            "err {:?} bound {:?}",
            err,
            bound
        );
    }
}

// |a| <= |b| helper on exact values
trait AbsCmp {
    fn abs_cmp_le(&self, other: &Self) -> bool;
}

impl AbsCmp for RFloat {
    fn abs_cmp_le(&self, other: &Self) -> bool {
        let a = if self.sign() { -self.clone() } else { self.clone() };
        let b = if other.sign() {
            -other.clone()
        } else {
            other.clone()
        };
        a <= b
    }
}

#[test]
fn division_round_trips_against_multiplication() {
    let mut rng = StdRng::seed_from_u64(0xd1f);
    for _ in 0..100 {
        let a = random_cascade::<2>(&mut rng);
        let b = random_cascade::<2>(&mut rng);
        if b.is_zero() {
            continue;
        }
        let q = a / b;
        let back = q * b;
        let err = (back - a).to_rfloat();
        if a.is_zero() {
            continue;
        }
        let bound = a.to_rfloat().mul_exact(&RFloat::pow2(-95));
        assert!(err.abs_cmp_le(&bound));
    }
}

#[test]
fn special_values_follow_ieee() {
    let inf = TripleDouble::infinity(false);
    let ninf = TripleDouble::infinity(true);
    assert!((inf + ninf).is_nan());
    assert!((inf * TripleDouble::zero()).is_nan());
    assert!((TripleDouble::from_f64(1.0) / TripleDouble::zero()).is_infinite());
    assert!((TripleDouble::zero() / TripleDouble::zero()).is_nan());
    assert!(TripleDouble::from_f64(-4.0).sqrt().is_nan());
}

#[test]
fn ordering_is_lexicographic_on_limbs() {
    let one = QuadDouble::from_f64(1.0);
    let one_eps = QuadDouble::from_limbs([1.0, 1e-40, 0.0, 0.0]);
    assert!(one < one_eps);
    assert!(one_eps > one);
    assert!(one == QuadDouble::from_f64(1.0));
    assert!(QuadDouble::nan().partial_cmp(&one).is_none());
}

#[test]
fn parse_format_round_trip() {
    let mut rng = StdRng::seed_from_u64(0xf04);
    let opts = FormatOptions::new();
    for _ in 0..50 {
        let v = random_cascade::<2>(&mut rng);
        let s = v.format(&opts);
        let back = DoubleDouble::parse(&s).unwrap();
        assert_eq!(back, v, "{}", s);
    }
    // and a plain decimal sanity check
    let x = DoubleDouble::parse("0.484375e2").unwrap();
    assert_eq!(x.to_f64(), 48.4375);
}

#[test]
fn maxpos_and_ulp_are_consistent() {
    let m = QuadDouble::maxpos();
    assert!(m.is_finite());
    assert!(m > QuadDouble::from_f64(1e308));
    let u = QuadDouble::from_f64(1.0).ulp();
    assert_eq!(u.to_f64(), 2.0f64.powi(-211));
}
