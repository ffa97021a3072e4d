// uninum: a universal numbers library in Rust
//
// eft.rs
//
// Exactness tests for the error-free transformations,
// verified against big-integer arithmetic

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use uninum::eft::{
    fast_two_sum, is_nonoverlapping, linear_expansion_sum, renormalize, scale_expansion, two_product,
    two_product_dekker, two_sum, veltkamp_split,
};
use uninum::rfloat::RFloat;
use uninum::Real;

fn exact(x: f64) -> RFloat {
    RFloat::from(x)
}

fn random_double(rng: &mut StdRng) -> f64 {
    // spread the exponents so the pairs are badly conditioned,
    // while keeping products and error terms in the normal range
    let mantissa: f64 = rng.gen_range(-1.0..1.0);
    let exp: i32 = rng.gen_range(-150..150);
    mantissa * 2.0f64.powi(exp)
}

#[test]
fn two_sum_is_error_free() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for _ in 0..2000 {
        let a = random_double(&mut rng);
        let b = random_double(&mut rng);
        let (s, e) = two_sum(a, b);
        // s + e == a + b in exact arithmetic
        let lhs = exact(s).add_exact(&exact(e));
        let rhs = exact(a).add_exact(&exact(b));
        assert_eq!(lhs, rhs, "two_sum({}, {})", a, b);
    }
}

#[test]
fn fast_two_sum_is_error_free_when_ordered() {
    let mut rng = StdRng::seed_from_u64(0xfa57);
    for _ in 0..2000 {
        let x = random_double(&mut rng);
        let y = random_double(&mut rng);
        let (a, b) = if x.abs() >= y.abs() { (x, y) } else { (y, x) };
        let (s, e) = fast_two_sum(a, b);
        let lhs = exact(s).add_exact(&exact(e));
        let rhs = exact(a).add_exact(&exact(b));
        assert_eq!(lhs, rhs);
    }
}

#[test]
fn two_product_is_error_free() {
    let mut rng = StdRng::seed_from_u64(0x960d);
    for _ in 0..2000 {
        let a = random_double(&mut rng);
        let b = random_double(&mut rng);
        let (p, e) = two_product(a, b);
        let lhs = exact(p).add_exact(&exact(e));
        let rhs = exact(a).mul_exact(&exact(b));
        assert_eq!(lhs, rhs, "two_product({}, {})", a, b);
        assert_eq!((p, e), two_product_dekker(a, b));
    }
}

#[test]
fn veltkamp_split_is_exact_at_27_bits() {
    let mut rng = StdRng::seed_from_u64(0x5011);
    for _ in 0..500 {
        let a = random_double(&mut rng);
        let (hi, lo) = veltkamp_split(a);
        assert_eq!(exact(hi).add_exact(&exact(lo)), exact(a));
        // both halves must fit in 26 bits of significand
        assert!(hi == 0.0 || exact(hi).p() <= 27);
        assert!(lo == 0.0 || exact(lo).p() <= 27);
    }
}

#[test]
fn scale_expansion_is_exact() {
    let mut rng = StdRng::seed_from_u64(0x5ca1e);
    for _ in 0..200 {
        let x = random_double(&mut rng);
        let e = two_sum(x, random_double(&mut rng));
        let expansion = renormalize(&[e.0, e.1]);
        let s = rng.gen_range(-1000.0..1000.0);

        let scaled = scale_expansion(&expansion, s);
        let mut lhs = RFloat::zero();
        for &v in &scaled {
            lhs = lhs.add_exact(&exact(v));
        }
        let mut rhs = RFloat::zero();
        for &v in &expansion {
            rhs = rhs.add_exact(&exact(v));
        }
        assert_eq!(lhs, rhs.mul_exact(&exact(s)));
        assert!(is_nonoverlapping(&scaled));
    }
}

#[test]
fn linear_expansion_sum_is_exact_and_nonoverlapping() {
    let mut rng = StdRng::seed_from_u64(0x11ea5);
    for _ in 0..500 {
        let (a1, a2) = two_sum(random_double(&mut rng), random_double(&mut rng));
        let (b1, b2) = two_sum(random_double(&mut rng), random_double(&mut rng));
        let a = [a1, a2];
        let b = [b1, b2];
        let z = linear_expansion_sum(&a, &b);

        let mut lhs = RFloat::zero();
        for &v in &z {
            lhs = lhs.add_exact(&exact(v));
        }
        let rhs = exact(a1)
            .add_exact(&exact(a2))
            .add_exact(&exact(b1))
            .add_exact(&exact(b2));
        assert_eq!(lhs, rhs);
        assert!(is_nonoverlapping(&z), "{:?}", z);
    }
}

#[test]
fn renormalize_idempotent_on_random_expansions() {
    let mut rng = StdRng::seed_from_u64(0x4e40);
    for _ in 0..500 {
        let xs: Vec<f64> = (0..6).map(|_| random_double(&mut rng)).collect();
        let mut sorted = xs.clone();
        sorted.sort_by(|a, b| b.abs().partial_cmp(&a.abs()).unwrap());
        let once = renormalize(&sorted);
        let twice = renormalize(&once);
        assert_eq!(once, twice);
        assert!(is_nonoverlapping(&once));
    }
}
