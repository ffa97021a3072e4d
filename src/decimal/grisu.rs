// uninum: a universal numbers library in Rust
//
// decimal/grisu.rs
//
// Grisu3 shortest-digit generation for native IEEE 754 floats
// (Loitsch, 2010: "Printing Floating-Point Numbers Quickly and
// Accurately with Integers"), with a Dragon4 fallback for the rare
// inputs the fast path cannot certify.

use crate::decimal::dragon;
use crate::decimal::FormatOptions;
use crate::native;
use crate::rfloat::RFloat;

/// A floating-point number as (significand, exponent):
/// value = `f * 2^e` with a 64-bit unsigned significand.
#[derive(Clone, Copy, Debug)]
struct DiyFp {
    f: u64,
    e: i32,
}

impl DiyFp {
    fn new(f: u64, e: i32) -> Self {
        Self { f, e }
    }

    /// Multiplies two DiyFp values, keeping the upper 64 bits of the
    /// 128-bit product with round-to-nearest on the cut.
    fn mul(self, rhs: DiyFp) -> DiyFp {
        let a = self.f >> 32;
        let b = self.f & 0xFFFF_FFFF;
        let c = rhs.f >> 32;
        let d = rhs.f & 0xFFFF_FFFF;

        let ac = a * c;
        let bc = b * c;
        let ad = a * d;
        let bd = b * d;

        let mut tmp = (bd >> 32) + (ad & 0xFFFF_FFFF) + (bc & 0xFFFF_FFFF);
        tmp += 1u64 << 31; // round to nearest

        DiyFp::new(
            ac + (ad >> 32) + (bc >> 32) + (tmp >> 32),
            self.e + rhs.e + 64,
        )
    }

    /// Shifts the significand up until its top bit is set.
    fn normalize(mut self) -> DiyFp {
        while self.f & 0xF000_0000_0000_0000 == 0 {
            self.f <<= 4;
            self.e -= 4;
        }
        while self.f & 0x8000_0000_0000_0000 == 0 {
            self.f <<= 1;
            self.e -= 1;
        }
        self
    }
}

// Cached powers of ten, every eighth decimal exponent:
// 10^k ~= significand * 2^binary_exponent
struct CachedPower {
    significand: u64,
    binary_exponent: i32,
    decimal_exponent: i32,
}

#[rustfmt::skip]
static CACHED_POWERS: [CachedPower; 87] = [
    CachedPower { significand: 0xfa8fd5a0081c0288, binary_exponent: -1220, decimal_exponent: -348 },
    CachedPower { significand: 0xbaaee17fa23ebf76, binary_exponent: -1193, decimal_exponent: -340 },
    CachedPower { significand: 0x8b16fb203055ac76, binary_exponent: -1166, decimal_exponent: -332 },
    CachedPower { significand: 0xcf42894a5dce35ea, binary_exponent: -1140, decimal_exponent: -324 },
    CachedPower { significand: 0x9a6bb0aa55653b2d, binary_exponent: -1113, decimal_exponent: -316 },
    CachedPower { significand: 0xe61acf033d1a45df, binary_exponent: -1087, decimal_exponent: -308 },
    CachedPower { significand: 0xab70fe17c79ac6ca, binary_exponent: -1060, decimal_exponent: -300 },
    CachedPower { significand: 0xff77b1fcbebcdc4f, binary_exponent: -1034, decimal_exponent: -292 },
    CachedPower { significand: 0xbe5691ef416bd60c, binary_exponent: -1007, decimal_exponent: -284 },
    CachedPower { significand: 0x8dd01fad907ffc3c, binary_exponent: -980, decimal_exponent: -276 },
    CachedPower { significand: 0xd3515c2831559a83, binary_exponent: -954, decimal_exponent: -268 },
    CachedPower { significand: 0x9d71ac8fada6c9b5, binary_exponent: -927, decimal_exponent: -260 },
    CachedPower { significand: 0xea9c227723ee8bcb, binary_exponent: -901, decimal_exponent: -252 },
    CachedPower { significand: 0xaecc49914078536d, binary_exponent: -874, decimal_exponent: -244 },
    CachedPower { significand: 0x823c12795db6ce57, binary_exponent: -847, decimal_exponent: -236 },
    CachedPower { significand: 0xc21094364dfb5637, binary_exponent: -821, decimal_exponent: -228 },
    CachedPower { significand: 0x9096ea6f3848984f, binary_exponent: -794, decimal_exponent: -220 },
    CachedPower { significand: 0xd77485cb25823ac7, binary_exponent: -768, decimal_exponent: -212 },
    CachedPower { significand: 0xa086cfcd97bf97f4, binary_exponent: -741, decimal_exponent: -204 },
    CachedPower { significand: 0xef340a98172aace5, binary_exponent: -715, decimal_exponent: -196 },
    CachedPower { significand: 0xb23867fb2a35b28e, binary_exponent: -688, decimal_exponent: -188 },
    CachedPower { significand: 0x84c8d4dfd2c63f3b, binary_exponent: -661, decimal_exponent: -180 },
    CachedPower { significand: 0xc5dd44271ad3cdba, binary_exponent: -635, decimal_exponent: -172 },
    CachedPower { significand: 0x936b9fcebb25c996, binary_exponent: -608, decimal_exponent: -164 },
    CachedPower { significand: 0xdbac6c247d62a584, binary_exponent: -582, decimal_exponent: -156 },
    CachedPower { significand: 0xa3ab66580d5fdaf6, binary_exponent: -555, decimal_exponent: -148 },
    CachedPower { significand: 0xf3e2f893dec3f126, binary_exponent: -529, decimal_exponent: -140 },
    CachedPower { significand: 0xb5b5ada8aaff80b8, binary_exponent: -502, decimal_exponent: -132 },
    CachedPower { significand: 0x87625f056c7c4a8b, binary_exponent: -475, decimal_exponent: -124 },
    CachedPower { significand: 0xc9bcff6034c13053, binary_exponent: -449, decimal_exponent: -116 },
    CachedPower { significand: 0x964e858c91ba2655, binary_exponent: -422, decimal_exponent: -108 },
    CachedPower { significand: 0xdff9772470297ebd, binary_exponent: -396, decimal_exponent: -100 },
    CachedPower { significand: 0xa6dfbd9fb8e5b88f, binary_exponent: -369, decimal_exponent: -92 },
    CachedPower { significand: 0xf8a95fcf88747d94, binary_exponent: -343, decimal_exponent: -84 },
    CachedPower { significand: 0xb94470938fa89bcf, binary_exponent: -316, decimal_exponent: -76 },
    CachedPower { significand: 0x8a08f0f8bf0f156b, binary_exponent: -289, decimal_exponent: -68 },
    CachedPower { significand: 0xcdb02555653131b6, binary_exponent: -263, decimal_exponent: -60 },
    CachedPower { significand: 0x993fe2c6d07b7fac, binary_exponent: -236, decimal_exponent: -52 },
    CachedPower { significand: 0xe45c10c42a2b3b06, binary_exponent: -210, decimal_exponent: -44 },
    CachedPower { significand: 0xaa242499697392d3, binary_exponent: -183, decimal_exponent: -36 },
    CachedPower { significand: 0xfd87b5f28300ca0e, binary_exponent: -157, decimal_exponent: -28 },
    CachedPower { significand: 0xbce5086492111aeb, binary_exponent: -130, decimal_exponent: -20 },
    CachedPower { significand: 0x8cbccc096f5088cc, binary_exponent: -103, decimal_exponent: -12 },
    CachedPower { significand: 0xd1b71758e219652c, binary_exponent: -77, decimal_exponent: -4 },
    CachedPower { significand: 0x9c40000000000000, binary_exponent: -50, decimal_exponent: 4 },
    CachedPower { significand: 0xe8d4a51000000000, binary_exponent: -24, decimal_exponent: 12 },
    CachedPower { significand: 0xad78ebc5ac620000, binary_exponent: 3, decimal_exponent: 20 },
    CachedPower { significand: 0x813f3978f8940984, binary_exponent: 30, decimal_exponent: 28 },
    CachedPower { significand: 0xc097ce7bc90715b3, binary_exponent: 56, decimal_exponent: 36 },
    CachedPower { significand: 0x8f7e32ce7bea5c70, binary_exponent: 83, decimal_exponent: 44 },
    CachedPower { significand: 0xd5d238a4abe98068, binary_exponent: 109, decimal_exponent: 52 },
    CachedPower { significand: 0x9f4f2726179a2245, binary_exponent: 136, decimal_exponent: 60 },
    CachedPower { significand: 0xed63a231d4c4fb27, binary_exponent: 162, decimal_exponent: 68 },
    CachedPower { significand: 0xb0de65388cc8ada8, binary_exponent: 189, decimal_exponent: 76 },
    CachedPower { significand: 0x83c7088e1aab65db, binary_exponent: 216, decimal_exponent: 84 },
    CachedPower { significand: 0xc45d1df942711d9a, binary_exponent: 242, decimal_exponent: 92 },
    CachedPower { significand: 0x924d692ca61be758, binary_exponent: 269, decimal_exponent: 100 },
    CachedPower { significand: 0xda01ee641a708dea, binary_exponent: 295, decimal_exponent: 108 },
    CachedPower { significand: 0xa26da3999aef774a, binary_exponent: 322, decimal_exponent: 116 },
    CachedPower { significand: 0xf209787bb47d6b85, binary_exponent: 348, decimal_exponent: 124 },
    CachedPower { significand: 0xb454e4a179dd1877, binary_exponent: 375, decimal_exponent: 132 },
    CachedPower { significand: 0x865b86925b9bc5c2, binary_exponent: 402, decimal_exponent: 140 },
    CachedPower { significand: 0xc83553c5c8965d3d, binary_exponent: 428, decimal_exponent: 148 },
    CachedPower { significand: 0x952ab45cfa97a0b3, binary_exponent: 455, decimal_exponent: 156 },
    CachedPower { significand: 0xde469fbd99a05fe3, binary_exponent: 481, decimal_exponent: 164 },
    CachedPower { significand: 0xa59bc234db398c25, binary_exponent: 508, decimal_exponent: 172 },
    CachedPower { significand: 0xf6c69a72a3989f5c, binary_exponent: 534, decimal_exponent: 180 },
    CachedPower { significand: 0xb7dcbf5354e9bece, binary_exponent: 561, decimal_exponent: 188 },
    CachedPower { significand: 0x88fcf317f22241e2, binary_exponent: 588, decimal_exponent: 196 },
    CachedPower { significand: 0xcc20ce9bd35c78a5, binary_exponent: 614, decimal_exponent: 204 },
    CachedPower { significand: 0x98165af37b2153df, binary_exponent: 641, decimal_exponent: 212 },
    CachedPower { significand: 0xe2a0b5dc971f303a, binary_exponent: 667, decimal_exponent: 220 },
    CachedPower { significand: 0xa8d9d1535ce3b396, binary_exponent: 694, decimal_exponent: 228 },
    CachedPower { significand: 0xfb9b7cd9a4a7443c, binary_exponent: 720, decimal_exponent: 236 },
    CachedPower { significand: 0xbb764c4ca7a44410, binary_exponent: 747, decimal_exponent: 244 },
    CachedPower { significand: 0x8bab8eefb6409c1a, binary_exponent: 774, decimal_exponent: 252 },
    CachedPower { significand: 0xd01fef10a657842c, binary_exponent: 800, decimal_exponent: 260 },
    CachedPower { significand: 0x9b10a4e5e9913129, binary_exponent: 827, decimal_exponent: 268 },
    CachedPower { significand: 0xe7109bfba19c0c9d, binary_exponent: 853, decimal_exponent: 276 },
    CachedPower { significand: 0xac2820d9623bf429, binary_exponent: 880, decimal_exponent: 284 },
    CachedPower { significand: 0x80444b5e7aa7cf85, binary_exponent: 907, decimal_exponent: 292 },
    CachedPower { significand: 0xbf21e44003acdd2d, binary_exponent: 933, decimal_exponent: 300 },
    CachedPower { significand: 0x8e679c2f5e44ff8f, binary_exponent: 960, decimal_exponent: 308 },
    CachedPower { significand: 0xd433179d9c8cb841, binary_exponent: 986, decimal_exponent: 316 },
    CachedPower { significand: 0x9e19db92b4e31ba9, binary_exponent: 1013, decimal_exponent: 324 },
    CachedPower { significand: 0xeb96bf6ebadf77d9, binary_exponent: 1039, decimal_exponent: 332 },
    CachedPower { significand: 0xaf87023b9bf0ee6b, binary_exponent: 1066, decimal_exponent: 340 },
];

// finds a cached power that scales exponent `e` into the digit
// generator's working band; returns the power and its decimal
// exponent contribution
fn cached_power(e: i32) -> (&'static CachedPower, i32) {
    // k = ceil((-61 - e) * log10(2)) + 347, stride 8
    let dk = (-61 - e) as f64 * 0.301_029_995_663_981_14 + 347.0;
    let mut k = dk as i32;
    if dk - k as f64 > 0.0 {
        k += 1;
    }
    let index = ((k >> 3) + 1) as usize;
    let power = &CACHED_POWERS[index];
    (power, -(-348 + ((index as i32) << 3)))
}

const POW10_U32: [u32; 10] = [
    1,
    10,
    100,
    1000,
    10_000,
    100_000,
    1_000_000,
    10_000_000,
    100_000_000,
    1_000_000_000,
];

// digit generation: emits the decimal digits of the (inward-adjusted)
// upper boundary and stops as soon as the remainder fits inside the
// certification margin. Every truncation stays strictly between the
// operand's neighbors, so the digits round-trip by construction.
// Returns None when the working band or the integer range is
// exhausted, signalling the Dragon4 fallback.
fn digit_gen(mp: DiyFp, mut delta: u64) -> Option<(Vec<u8>, i32)> {
    // the scaled exponent must sit in the band where the integer part
    // fits 32 bits and the fractional shifts stay inside 64
    if !(-63..=-32).contains(&mp.e) {
        return None;
    }
    let one = DiyFp::new(1u64 << -mp.e, mp.e);
    let mut p1 = (mp.f >> -one.e) as u32;
    let mut p2 = mp.f & (one.f - 1);

    let mut buffer: Vec<u8> = Vec::with_capacity(20);
    let mut kappa: i32 = 10;

    // integer part
    while kappa > 0 {
        let pow = POW10_U32[(kappa - 1) as usize];
        let d = (p1 / pow) as u8;
        p1 %= pow;

        if d > 0 || !buffer.is_empty() {
            buffer.push(d);
        }
        kappa -= 1;

        let rest = ((p1 as u64) << -one.e) + p2;
        if rest <= delta {
            if buffer.is_empty() {
                return None;
            }
            return Some((buffer, kappa));
        }
    }

    // fractional part
    loop {
        p2 = p2.checked_mul(10)?;
        delta = delta.checked_mul(10)?;
        let d = (p2 >> -one.e) as u8;
        if d > 0 || !buffer.is_empty() {
            buffer.push(d);
        }
        p2 &= one.f - 1;
        kappa -= 1;
        if p2 < delta {
            if buffer.is_empty() {
                return None;
            }
            return Some((buffer, kappa));
        }
    }
}

// the half-ulp neighborhood of `f * 2^e`, both ends normalized to a
// common exponent; the lower gap narrows at powers of two
fn normalized_boundaries(f: u64, e: i32) -> (DiyFp, DiyFp) {
    let m_plus = DiyFp::new((f << 1) + 1, e - 1).normalize();
    let m_minus = if f == 1u64 << 52 {
        DiyFp::new((f << 2) - 1, e - 2)
    } else {
        DiyFp::new((f << 1) - 1, e - 1)
    };
    let m_minus = DiyFp::new(m_minus.f << (m_minus.e - m_plus.e), m_plus.e);
    (m_minus, m_plus)
}

// the Grisu3 pipeline: pick the half-ulp boundaries, scale by a
// cached power of ten, generate digits inside the margin
fn grisu3(significand: u64, exponent: i32) -> Option<(Vec<u8>, i32)> {
    let (w_minus, w_plus) = normalized_boundaries(significand, exponent);

    let (cached, k) = cached_power(w_plus.e);
    let c = DiyFp::new(cached.significand, cached.binary_exponent);

    let mut wp = w_plus.mul(c);
    let mut wm = w_minus.mul(c);
    wm.f += 1;
    wp.f -= 1;

    let delta = wp.f.checked_sub(wm.f)?;
    let (digits, kappa) = digit_gen(wp, delta)?;
    Some((digits, k + kappa))
}

/// Shortest-round-trip decimal rendering of an `f64`.
pub fn format_f64_shortest(x: f64) -> String {
    let opts = FormatOptions::new();
    if x.is_nan() {
        return "nan".to_string();
    }
    if x.is_infinite() {
        return if x < 0.0 { "-inf" } else { "inf" }.to_string();
    }
    if x == 0.0 {
        return if x.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    let (c, exp) = native::integer_decode_f64(x.abs());
    match grisu3(c, exp) {
        Some((digits, k)) => {
            // digit_gen yields value = digits * 10^k
            let k_frac = k + digits.len() as i32 - 1;
            let body = dragon::assemble(&digits, k_frac as isize, &opts);
            if x < 0.0 {
                format!("-{}", body)
            } else {
                body
            }
        }
        None => {
            // fallback: 17 significant digits always round-trip
            let fallback = FormatOptions::new().with_precision(17);
            dragon::format_rfloat(&RFloat::from(x), 53, &fallback)
        }
    }
}

/// Shortest-round-trip decimal rendering of an `f32`.
pub fn format_f32_shortest(x: f32) -> String {
    if x.is_nan() || x.is_infinite() || x == 0.0 {
        return format_f64_shortest(x as f64);
    }
    // a float's shortest digits: try increasing precision until the
    // rendering parses back bit-identically
    for prec in 1..=9 {
        let opts = FormatOptions::new().with_precision(prec);
        let s = dragon::format_rfloat(&RFloat::from(x), 24, &opts);
        if let Ok(back) = s.parse::<f32>() {
            if back == x {
                return s;
            }
        }
    }
    let opts = FormatOptions::new().with_precision(9);
    dragon::format_rfloat(&RFloat::from(x), 24, &opts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shortest_digits_round_trip() {
        for &x in &[
            1.0f64,
            0.1,
            1.0 / 3.0,
            5e-324,
            1.7976931348623157e308,
            2.2250738585072014e-308,
            std::f64::consts::PI,
            -123456.789e-30,
        ] {
            let s = format_f64_shortest(x);
            let back: f64 = s.parse().unwrap();
            assert_eq!(back, x, "{} -> {} -> {}", x, s, back);
        }
    }

    #[test]
    fn well_known_renderings() {
        assert_eq!(format_f64_shortest(0.0), "0");
        assert_eq!(format_f64_shortest(-0.0), "-0");
        assert_eq!(format_f64_shortest(f64::INFINITY), "inf");
        assert_eq!(format_f64_shortest(f64::NAN), "nan");
    }

    #[test]
    fn f32_shortest_round_trips() {
        for &x in &[0.1f32, 3.4028235e38, 1.1754944e-38, 16777216.0] {
            let s = format_f32_shortest(x);
            let back: f32 = s.parse().unwrap();
            assert_eq!(back, x);
        }
    }
}
