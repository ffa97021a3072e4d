// uninum: a universal numbers library in Rust
//
// decimal.rs
//
// Tests for decimal formatting and parsing

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use uninum::decimal::{
    format_f32_shortest, format_f64_shortest, format_rfloat, parse_rfloat, Alignment,
    FormatOptions,
};
use uninum::rfloat::RFloat;

#[test]
fn shortest_f64_round_trips_over_random_bits() {
    let mut rng = StdRng::seed_from_u64(0x64);
    for _ in 0..2000 {
        let bits: u64 = rng.gen();
        let x = f64::from_bits(bits);
        if !x.is_finite() {
            continue;
        }
        let s = format_f64_shortest(x);
        let back: f64 = s.parse().unwrap();
        assert_eq!(back.to_bits(), x.to_bits(), "{} -> {}", x, s);
    }
}

#[test]
fn shortest_f32_round_trips_over_random_bits() {
    let mut rng = StdRng::seed_from_u64(0x32);
    for _ in 0..2000 {
        let bits: u32 = rng.gen();
        let x = f32::from_bits(bits);
        if !x.is_finite() {
            continue;
        }
        let s = format_f32_shortest(x);
        let back: f32 = s.parse().unwrap();
        assert_eq!(back.to_bits(), x.to_bits(), "{} -> {}", x, s);
    }
}

#[test]
fn format_then_parse_is_identity_at_full_precision() {
    // the full round-trip contract through this crate's own parser
    let mut rng = StdRng::seed_from_u64(0xf0);
    let opts = FormatOptions::new();
    for _ in 0..500 {
        let x = rng.gen_range(-1.0f64..1.0) * 2.0f64.powi(rng.gen_range(-300..300));
        let v = RFloat::from(x);
        let s = format_rfloat(&v, 53, &opts);
        let back = parse_rfloat(&s, 64).unwrap();
        assert_eq!(back.to_f64().to_bits(), x.to_bits(), "{}", s);
    }
}

#[test]
fn precision_truncates_and_rounds() {
    let opts = FormatOptions::new().with_precision(3);
    assert_eq!(format_rfloat(&RFloat::from(1.0 / 3.0), 53, &opts), "0.333");
    assert_eq!(format_rfloat(&RFloat::from(2.0 / 3.0), 53, &opts), "0.667");
    assert_eq!(format_rfloat(&RFloat::from(9.996), 53, &opts), "10");
}

#[test]
fn layout_flags() {
    let v = RFloat::from(-1234.5);

    let sci = FormatOptions::new().with_precision(5).with_scientific(true);
    assert_eq!(format_rfloat(&v, 53, &sci), "-1.2345e3");

    let up = FormatOptions::new()
        .with_precision(5)
        .with_scientific(true)
        .with_uppercase(true);
    assert_eq!(format_rfloat(&v, 53, &up), "-1.2345E3");

    let plus = FormatOptions::new().with_precision(3).with_sign(true);
    assert_eq!(format_rfloat(&RFloat::from(2.5), 53, &plus), "+2.5");

    let padded = FormatOptions::new()
        .with_precision(3)
        .with_width(8)
        .with_fill('*')
        .with_alignment(Alignment::Right);
    assert_eq!(format_rfloat(&RFloat::from(2.5), 53, &padded), "*****2.5");

    let centered = FormatOptions::new()
        .with_precision(3)
        .with_width(7)
        .with_alignment(Alignment::Center);
    assert_eq!(format_rfloat(&RFloat::from(2.5), 53, &centered), "  2.5  ");

    assert_eq!(
        format_rfloat(&RFloat::Nan, 53, &FormatOptions::new().with_uppercase(true)),
        "NAN"
    );
}

#[test]
fn tiny_and_huge_magnitudes_switch_to_scientific() {
    let opts = FormatOptions::new().with_precision(4);
    let tiny = RFloat::from(1.25e-9);
    assert_eq!(format_rfloat(&tiny, 53, &opts), "1.25e-9");
    let big = RFloat::from(1e25);
    assert_eq!(format_rfloat(&big, 53, &opts), "1e25");
}

#[test]
fn parser_error_positions() {
    use uninum::error::ParseErrorKind;
    assert_eq!(parse_rfloat("  ", 64).unwrap_err().kind, ParseErrorKind::Empty);
    let e = parse_rfloat("12x4", 64).unwrap_err();
    assert_eq!(e.kind, ParseErrorKind::BadChar);
    assert_eq!(e.at, 2);
    assert_eq!(
        parse_rfloat("-.e4", 64).unwrap_err().kind,
        ParseErrorKind::BadChar
    );
}
