use std::cmp::Ordering;
use std::fmt;

use rug::Integer;

use crate::decimal::{self, FormatOptions};
use crate::eft;
use crate::error::ParseError;
use crate::native::{self, FloatClass};
use crate::real::FormatTag;
use crate::rfloat::RFloat;
use crate::Real;

/// An `N`-component floating-point cascade.
///
/// The represented value is the exact sum of the limbs. A normalized
/// cascade keeps its limbs non-overlapping and ordered by decreasing
/// magnitude (Priest): `|x[i+1]| <= ulp(x[i]) / 2`. Every limb and
/// every intermediate error term must stay a *normal* `f64` for the
/// expansion algebra to be exact, which bounds `N` at 19
/// (`2^(-53 * 19) >= 2^-1022`); larger `N` fails to compile.
///
/// Special values follow the leading limb: a cascade is NaN, infinite,
/// or zero exactly when `x[0]` is, with the remaining limbs zero.
#[derive(Clone, Copy, Debug)]
pub struct FloatCascade<const N: usize> {
    pub(crate) limbs: [f64; N],
}

impl<const N: usize> FloatCascade<N> {
    pub(crate) const VALID: () = assert!(
        N >= 1 && N <= eft::MAX_LIMBS,
        "a float cascade supports between 1 and 19 limbs"
    );

    /// Constructs the zero cascade.
    pub fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let _ = Self::VALID;
        Self { limbs: [0.0; N] }
    }

    /// Constructs a cascade from a native double in the leading limb.
    pub fn from_f64(x: f64) -> Self {
        let mut r = Self::new();
        r.limbs[0] = x;
        r
    }

    /// Constructs a cascade from raw limbs.
    /// The limbs are not checked for the non-overlap invariant;
    /// use [`FloatCascade::renormalized`] for unchecked inputs.
    pub fn from_limbs(limbs: [f64; N]) -> Self {
        #[allow(clippy::let_unit_value)]
        let _ = Self::VALID;
        Self { limbs }
    }

    /// Constructs a cascade from arbitrary limbs, restoring
    /// the non-overlap invariant.
    pub fn renormalized(limbs: [f64; N]) -> Self {
        Self::from_expansion(&eft::renormalize(&limbs))
    }

    // truncates a decreasing expansion into N limbs
    pub(crate) fn from_expansion(xs: &[f64]) -> Self {
        let mut r = Self::new();
        for (i, &x) in xs.iter().take(N).enumerate() {
            r.limbs[i] = x;
        }
        r
    }

    /// Reads limb `i` (0 is the most significant).
    pub fn limb(&self, i: usize) -> f64 {
        self.limbs[i]
    }

    /// Borrows all limbs in decreasing magnitude order.
    pub fn limbs(&self) -> &[f64; N] {
        &self.limbs
    }

    /// Rounds the represented value to the nearest `f64`.
    /// For a normalized cascade this is the leading limb.
    pub fn to_f64(&self) -> f64 {
        // sum from the smallest limb up
        let mut acc = 0.0;
        for &x in self.limbs.iter().rev() {
            acc += x;
        }
        acc
    }

    /// Converts the represented value (the exact sum of limbs)
    /// into an unbounded float.
    pub fn to_rfloat(&self) -> RFloat {
        if self.is_nan() {
            return RFloat::Nan;
        }
        if self.is_infinite() {
            return if self.limbs[0] > 0.0 {
                RFloat::PosInfinity
            } else {
                RFloat::NegInfinity
            };
        }
        let mut acc = RFloat::zero();
        for &x in self.limbs.iter() {
            acc = acc.add_exact(&RFloat::from(x));
        }
        acc
    }

    /// Rounds an unbounded float into a cascade by peeling off
    /// one double at a time.
    pub fn from_rfloat(val: &RFloat) -> Self {
        match val {
            RFloat::Nan => Self::nan(),
            RFloat::PosInfinity => Self::infinity(false),
            RFloat::NegInfinity => Self::infinity(true),
            RFloat::Real(_, _, _) => {
                let mut limbs = [0.0; N];
                let mut rest = val.clone();
                for limb in limbs.iter_mut() {
                    let x = rest.to_f64();
                    *limb = x;
                    if x == 0.0 || !x.is_finite() {
                        break;
                    }
                    rest = rest - RFloat::from(x);
                }
                Self::renormalized(limbs)
            }
        }
    }

    /// The zero cascade.
    pub fn zero() -> Self {
        Self::new()
    }

    /// The unit cascade.
    pub fn one() -> Self {
        Self::from_f64(1.0)
    }

    /// A signed infinity.
    pub fn infinity(sign: bool) -> Self {
        Self::from_f64(if sign {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        })
    }

    /// The quiet NaN cascade.
    pub fn nan() -> Self {
        Self::from_f64(f64::NAN)
    }

    /// Largest finite value: `DBL_MAX` with each following limb
    /// scaled down by `2^-53` as far as the configuration carries.
    pub fn maxpos() -> Self {
        let mut r = Self::new();
        let tail = [
            1.79769313486231570815e+308,
            9.97920154767359795037e+291,
            5.53956966280111259858e+275,
            3.07507899888268538887e+259,
        ];
        for i in 0..N.min(4) {
            r.limbs[i] = tail[i];
        }
        r
    }

    /// Smallest positive normal value.
    pub fn minpos() -> Self {
        Self::from_f64(f64::MIN_POSITIVE)
    }

    /// Largest negative finite value (`-maxpos`).
    pub fn maxneg() -> Self {
        -Self::maxpos()
    }

    /// Smallest negative normal value.
    pub fn minneg() -> Self {
        Self::from_f64(-f64::MIN_POSITIVE)
    }

    /// Returns true if this cascade is zero.
    pub fn is_zero(&self) -> bool {
        self.limbs[0] == 0.0
    }

    /// Returns true if this cascade is one.
    pub fn is_one(&self) -> bool {
        self.limbs[0] == 1.0 && self.limbs[1..].iter().all(|&x| x == 0.0)
    }

    /// Returns true if the value is strictly positive.
    pub fn is_pos(&self) -> bool {
        self.limbs[0] > 0.0
    }

    /// Returns true if the value is strictly negative.
    pub fn is_neg(&self) -> bool {
        self.limbs[0] < 0.0
    }

    /// Returns true if the leading limb is NaN.
    pub fn is_nan(&self) -> bool {
        self.limbs[0].is_nan()
    }

    /// Returns true if the leading limb is infinite.
    pub fn is_infinite(&self) -> bool {
        self.limbs[0].is_infinite()
    }

    /// Returns true if the value is finite.
    pub fn is_finite(&self) -> bool {
        self.limbs[0].is_finite()
    }

    /// Sign bit of the leading limb.
    pub fn sign_bit(&self) -> bool {
        self.limbs[0].is_sign_negative()
    }

    /// Binary exponent of the leading significand bit.
    pub fn scale(&self) -> Option<i32> {
        if self.is_zero() || !self.is_finite() {
            None
        } else {
            Some(native::scale_f64(self.limbs[0]))
        }
    }

    /// The unit in the last place of this cascade's format:
    /// `2^(scale - (53 * N - 1))`.
    pub fn ulp(&self) -> Self {
        match self.scale() {
            None => Self::nan(),
            Some(s) => {
                let e = s - (53 * N as i32 - 1);
                Self::from_f64(exp2i(e))
            }
        }
    }

    /// Parses a decimal scientific-notation string, rounding to
    /// this cascade format.
    pub fn parse(s: &str) -> Result<Self, ParseError> {
        let val = decimal::parse_rfloat(s, 53 * N + 32)?;
        Ok(Self::from_rfloat(&val))
    }

    /// Formats the represented value in decimal.
    pub fn format(&self, opts: &FormatOptions) -> String {
        decimal::format_rfloat(&self.to_rfloat(), 53 * N, opts)
    }

    // the non-overlap invariant, checked after public ops in debug builds
    pub(crate) fn debug_check_invariant(&self) {
        if self.is_finite() {
            debug_assert!(
                eft::is_nonoverlapping(&self.limbs),
                "cascade limbs overlap: {:?}",
                self.limbs
            );
        }
    }
}

// 2^k as f64, exact down to the subnormal floor
fn exp2i(k: i32) -> f64 {
    if (-1022..=1023).contains(&k) {
        f64::from_bits(((k + 1023) as u64) << 52)
    } else if (-1074..-1022).contains(&k) {
        f64::from_bits(1u64 << (k + 1074))
    } else if k < -1074 {
        0.0
    } else {
        f64::INFINITY
    }
}

impl<const N: usize> Default for FloatCascade<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> From<f64> for FloatCascade<N> {
    fn from(x: f64) -> Self {
        Self::from_f64(x)
    }
}

impl<const N: usize> PartialEq for FloatCascade<N> {
    fn eq(&self, other: &Self) -> bool {
        if self.is_nan() || other.is_nan() {
            return false;
        }
        self.limbs == other.limbs
    }
}

impl<const N: usize> PartialOrd for FloatCascade<N> {
    /// Lexicographic comparison on limbs: valid for normalized
    /// cascades since limbs are aligned by magnitude.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.is_nan() || other.is_nan() {
            return None;
        }
        for (a, b) in self.limbs.iter().zip(other.limbs.iter()) {
            match a.partial_cmp(b) {
                Some(Ordering::Equal) => continue,
                ord => return ord,
            }
        }
        Some(Ordering::Equal)
    }
}

impl<const N: usize> Real for FloatCascade<N> {
    fn radix() -> usize {
        2
    }

    fn sign(&self) -> bool {
        self.sign_bit()
    }

    fn exp(&self) -> Option<isize> {
        self.to_rfloat().exp()
    }

    fn e(&self) -> Option<isize> {
        self.to_rfloat().e()
    }

    fn n(&self) -> Option<isize> {
        self.to_rfloat().n()
    }

    fn c(&self) -> Option<Integer> {
        self.to_rfloat().c()
    }

    fn p(&self) -> usize {
        self.to_rfloat().p()
    }

    fn is_nar(&self) -> bool {
        self.is_nan() || self.is_infinite()
    }

    fn is_finite(&self) -> bool {
        FloatCascade::is_finite(self)
    }

    fn is_infinite(&self) -> bool {
        FloatCascade::is_infinite(self)
    }

    fn is_zero(&self) -> bool {
        FloatCascade::is_zero(self)
    }

    fn is_negative(&self) -> Option<bool> {
        if self.is_nan() || self.is_zero() {
            None
        } else {
            Some(self.limbs[0] < 0.0)
        }
    }

    fn is_numerical(&self) -> bool {
        !self.is_nan()
    }
}

impl<const N: usize> FormatTag for FloatCascade<N> {
    const TAG: &'static str = "cascade";

    fn classify(&self) -> FloatClass {
        native::decode_f64(self.limbs[0]).classify()
    }
}

impl<const N: usize> fmt::Display for FloatCascade<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let opts = FormatOptions::new().with_precision(f.precision().unwrap_or(N * 16));
        write!(f, "{}", self.format(&opts))
    }
}
