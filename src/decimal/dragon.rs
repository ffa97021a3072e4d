// uninum: a universal numbers library in Rust
//
// decimal/dragon.rs
//
// Dragon4-style big-integer digit generation for arbitrary precision

use num_traits::Zero;
use rug::Integer;

use crate::decimal::FormatOptions;
use crate::rfloat::RFloat;

/// Correctly-rounded significant decimal digits of a positive value
/// `c * 2^exp`: returns `(digits, k)` with the value equal to
/// `0.d₁d₂… * 10^(k+1)`, rounded half-to-even at `ndigits`.
pub(crate) fn digits(c: &Integer, exp: isize, ndigits: usize) -> (Vec<u8>, isize) {
    debug_assert!(!c.is_zero());

    // v = num / den, exactly
    let mut num = c.clone();
    let mut den = Integer::from(1);
    if exp >= 0 {
        num <<= exp as u32;
    } else {
        den <<= (-exp) as u32;
    }

    // scale until num/den is in [1, 10); k tracks the decimal exponent
    let mut k: isize = 0;
    let ten = Integer::from(10);
    while num >= Integer::from(&den * &ten) {
        den *= &ten;
        k += 1;
    }
    while num < den {
        num *= &ten;
        k -= 1;
    }

    // long division, one decimal digit at a time
    let mut out = Vec::with_capacity(ndigits);
    for _ in 0..ndigits {
        let (d, rem) = num.div_rem(den.clone());
        out.push(d.to_u8().unwrap());
        num = rem * &ten;
    }

    // round half-to-even on the remainder (already scaled by ten)
    let twice = Integer::from(&num * 2u32);
    let round_up = match twice.cmp(&Integer::from(&den * &ten)) {
        std::cmp::Ordering::Greater => true,
        std::cmp::Ordering::Less => false,
        std::cmp::Ordering::Equal => out.last().is_some_and(|d| d % 2 == 1),
    };

    if round_up {
        let mut i = out.len();
        loop {
            if i == 0 {
                // carry out of the leading digit
                out.insert(0, 1);
                out.pop();
                k += 1;
                break;
            }
            i -= 1;
            if out[i] == 9 {
                out[i] = 0;
            } else {
                out[i] += 1;
                break;
            }
        }
    }

    (out, k)
}

/// Formats an [`RFloat`] with up to `sig_bits` bits of significance
/// according to the given options. This is the formatting entry point
/// shared by every arbitrary-precision format in the crate.
pub fn format_rfloat(val: &RFloat, sig_bits: usize, opts: &FormatOptions) -> String {
    let body = match val {
        RFloat::Nan => special("nan", opts),
        RFloat::PosInfinity => special("inf", opts),
        RFloat::NegInfinity => format!("-{}", special("inf", opts)),
        RFloat::Real(_, _, c) if c.is_zero() => {
            let zero = if opts.scientific { "0e0" } else { "0" };
            decorate(false, zero.to_string(), opts)
        }
        RFloat::Real(sign, exp, c) => {
            // enough digits to reproduce sig_bits exactly, unless the
            // caller asked for fewer
            let max_digits = sig_bits * 30103 / 100000 + 3;
            let ndigits = opts.precision.unwrap_or(max_digits).min(max_digits).max(1);
            let (digits, k) = digits(c, *exp, ndigits);
            decorate(*sign, assemble(&digits, k, opts), opts)
        }
    };
    opts.pad(body)
}

// renders digits (value = 0.ddd * 10^(k+1)) as fixed or scientific
pub(crate) fn assemble(digits: &[u8], k: isize, opts: &FormatOptions) -> String {
    // trim trailing zeros, keeping at least one digit
    let mut digs: Vec<u8> = digits.to_vec();
    while digs.len() > 1 && *digs.last().unwrap() == 0 {
        digs.pop();
    }

    let to_char = |d: &u8| (b'0' + d) as char;

    // fall back to scientific when fixed notation would be unwieldy
    let use_scientific = opts.scientific || k > 20 || k < -5;
    if use_scientific {
        let e_mark = if opts.uppercase { 'E' } else { 'e' };
        let head = to_char(&digs[0]);
        let tail: String = digs[1..].iter().map(to_char).collect();
        if tail.is_empty() {
            format!("{}{}{}", head, e_mark, k)
        } else {
            format!("{}.{}{}{}", head, tail, e_mark, k)
        }
    } else if k >= 0 {
        let k = k as usize;
        if digs.len() > k + 1 {
            let int: String = digs[..=k].iter().map(to_char).collect();
            let frac: String = digs[k + 1..].iter().map(to_char).collect();
            format!("{}.{}", int, frac)
        } else {
            let int: String = digs.iter().map(to_char).collect();
            let zeros: String = "0".repeat(k + 1 - digs.len());
            format!("{}{}", int, zeros)
        }
    } else {
        let zeros: String = "0".repeat((-k - 1) as usize);
        let frac: String = digs.iter().map(to_char).collect();
        format!("0.{}{}", zeros, frac)
    }
}

fn decorate(sign: bool, body: String, opts: &FormatOptions) -> String {
    if sign {
        format!("-{}", body)
    } else if opts.show_sign {
        format!("+{}", body)
    } else {
        body
    }
}

fn special(name: &str, opts: &FormatOptions) -> String {
    if opts.uppercase {
        name.to_uppercase()
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digit_generation_rounds_half_even() {
        // 0.125 at two digits: "12" stays (tie, even)
        let (d, k) = digits(&Integer::from(1), -3, 2);
        assert_eq!((d, k), (vec![1, 2], -1));
        // 0.375 at two digits: "38" (tie, odd rounds up)
        let (d, k) = digits(&Integer::from(3), -3, 2);
        assert_eq!((d, k), (vec![3, 8], -1));
    }

    #[test]
    fn carry_ripples_through_nines() {
        // 0.999999... of 1 - 2^-20 rounds to 1.0 at 3 digits
        let c = Integer::from((1u64 << 20) - 1);
        let (d, k) = digits(&c, -20, 3);
        assert_eq!((d, k), (vec![1, 0, 0], 0));
    }

    #[test]
    fn fixed_and_scientific_layouts() {
        let opts = FormatOptions::new().with_precision(4);
        let v = RFloat::from(1536.0);
        assert_eq!(format_rfloat(&v, 53, &opts), "1536");

        let sci = FormatOptions::new().with_precision(4).with_scientific(true);
        assert_eq!(format_rfloat(&v, 53, &sci), "1.536e3");

        let up = FormatOptions::new()
            .with_precision(2)
            .with_scientific(true)
            .with_uppercase(true);
        assert_eq!(format_rfloat(&RFloat::from(-0.5), 53, &up), "-5E-1");
    }
}
