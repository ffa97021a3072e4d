use num_traits::Zero;
use rug::Integer;

use crate::bitblock::BitBlock;
use crate::error::ArithError;
use crate::posit::Posit;
use crate::util::bitmask;
use crate::{Real, RoundingContext};

/// Rounding contexts for posit numbers.
///
/// The associated storage type is [`Posit`].
///
/// Values rounded under this context are posit numbers as described
/// by the 2022 Posit Standard: base-2 scientific numbers
/// `(-1)^s * c * 2^e * (2^2^es)^k` where `c` is the significand,
/// `k` is the regime, and `e` is an exponent in `[0, 2^es)`. The key
/// property of posit numbers is that the precision of `c` and `e`
/// changes with `k`: both are widest when `k` is near 0 and shrink as
/// the regime run grows. In posit terminology, `2^2^es` is `useed`.
///
/// Rounding is to nearest with ties to the even encoding, sticky bits
/// included. Overflow clamps to `maxpos` and underflow of non-zero
/// values clamps to `minpos`; only exact zero rounds to zero, and
/// non-numerical values round to NaR.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PositContext {
    es: usize,
    nbits: usize,
}

impl PositContext {
    /// Implementation limit: maximum exponent size
    pub const ES_MAX: usize = 32;
    /// Minimum total bitwidth: sign, regime run, terminator
    pub const NBITS_MIN: usize = 3;

    /// Constructs a new posit context.
    ///
    /// # Panics
    ///
    /// Panics when the configuration is outside implementation
    /// limits; use [`PositContext::try_new`] to handle that case.
    pub fn new(es: usize, nbits: usize) -> Self {
        match Self::try_new(es, nbits) {
            Ok(ctx) => ctx,
            Err(e) => panic!("{}", e),
        }
    }

    /// Fallible constructor.
    pub fn try_new(es: usize, nbits: usize) -> Result<Self, ArithError> {
        if es > Self::ES_MAX {
            return Err(ArithError::Configuration(format!(
                "posit exponent width needs to be at most {} bits, given {}",
                Self::ES_MAX,
                es
            )));
        }
        if nbits < Self::NBITS_MIN {
            return Err(ArithError::Configuration(format!(
                "posit total width needs to be at least {} bits, given {}",
                Self::NBITS_MIN,
                nbits
            )));
        }
        Ok(Self { es, nbits })
    }

    /// Returns the exponent bitwidth of the format.
    pub fn es(&self) -> usize {
        self.es
    }

    /// Returns the total bitwidth of the format.
    pub fn nbits(&self) -> usize {
        self.nbits
    }

    /// Posit terminology for `2^2^es`.
    pub fn useed_scale(&self) -> isize {
        1 << self.es
    }

    /// The exponent scale `2^es` contributed by one regime step.
    pub fn rscale(&self) -> isize {
        1 << self.es
    }

    /// Largest representable regime.
    pub fn rmax(&self) -> isize {
        self.nbits as isize - 2
    }

    /// Largest representable (normalized) exponent:
    /// the format with only regime bits.
    pub fn emax(&self) -> isize {
        self.rscale() * self.rmax()
    }

    /// Smallest representable (normalized) exponent.
    pub fn emin(&self) -> isize {
        -self.emax()
    }

    /// Maximum representable value.
    pub fn maxpos(&self) -> Posit {
        // 0111...1
        let mut bits = BitBlock::ones(self.nbits);
        bits.set(self.nbits - 1, false);
        Posit::from_bits(self.clone(), bits)
    }

    /// Minimum positive representable value.
    pub fn minpos(&self) -> Posit {
        Posit::from_bits(self.clone(), BitBlock::from_u64(self.nbits, 1))
    }

    /// Maximum-magnitude negative value (`-maxpos`).
    pub fn maxneg(&self) -> Posit {
        // 1000...01
        let mut bits = BitBlock::zero(self.nbits);
        bits.set(self.nbits - 1, true);
        bits.set(0, true);
        Posit::from_bits(self.clone(), bits)
    }

    /// Minimum-magnitude negative value (`-minpos`).
    pub fn minneg(&self) -> Posit {
        Posit::from_bits(self.clone(), BitBlock::ones(self.nbits))
    }

    /// Constructs zero in this format.
    pub fn zero(&self) -> Posit {
        Posit::from_bits(self.clone(), BitBlock::zero(self.nbits))
    }

    /// Constructs NaR in this format.
    pub fn nar(&self) -> Posit {
        let mut bits = BitBlock::zero(self.nbits);
        bits.set(self.nbits - 1, true);
        Posit::from_bits(self.clone(), bits)
    }

    /// Encodes the magnitude fields of a finite non-zero value as an
    /// unbounded bit stream (regime, exponent, fraction), msb first,
    /// returning the stream and its length. `e` is the normalized
    /// binary exponent and `c` the significand with hidden bit.
    fn ideal_magnitude(&self, e: isize, c: &Integer) -> (Integer, usize) {
        let es = self.es;
        let rscale = self.rscale();
        let k = e.div_euclid(rscale);
        let ee = e.rem_euclid(rscale) as usize;

        // regime: k+1 ones then a zero, or -k zeros then a one
        let (rfield, rbits) = if k >= 0 {
            let rbits = k as usize + 2;
            (bitmask(rbits) - Integer::from(1), rbits)
        } else {
            (Integer::from(1), (-k) as usize + 1)
        };

        // exponent: es bits of ee
        let efield = Integer::from(ee);

        // fraction: significand without the hidden bit
        let p = c.significant_bits() as usize;
        let fbits = p - 1;
        let frac = c.clone() & bitmask(fbits);

        let len = rbits + es + fbits;
        let stream = (rfield << (es + fbits) as u32) | (efield << fbits as u32) | frac;
        (stream, len)
    }

    /// Internal rounding of a finite non-zero `(sign, e, c)`.
    fn round_finite(&self, sign: bool, e: isize, c: &Integer) -> Posit {
        let nbits = self.nbits;

        // clamp at the regime limits: posits saturate at maxpos and
        // never round a non-zero value down to zero
        if e > self.emax() {
            return self.with_sign(self.maxpos(), sign);
        }
        if e < self.emin() {
            return self.with_sign(self.minpos(), sign);
        }

        let (stream, len) = self.ideal_magnitude(e, c);
        let avail = nbits - 1;

        let mut pattern = if len <= avail {
            // everything fits: exact
            stream << (avail - len) as u32
        } else {
            let drop = len - avail;
            let kept: Integer = stream.clone() >> drop as u32;
            let guard = stream.get_bit((drop - 1) as u32);
            let sticky = !(stream & bitmask(drop - 1)).is_zero();

            // round to nearest, ties to the even encoding
            let lsb = kept.get_bit(0);
            if guard && (sticky || lsb) {
                kept + Integer::from(1)
            } else {
                kept
            }
        };

        // an increment past maxpos would land on NaR: clamp
        if pattern.significant_bits() as usize > avail {
            pattern = self.maxpos().into_bits();
        }

        let magnitude = Posit::from_bits(self.clone(), BitBlock::from_integer(nbits, &pattern));
        self.with_sign(magnitude, sign)
    }

    // applies a sign by two's-complementing the encoding
    fn with_sign(&self, magnitude: Posit, sign: bool) -> Posit {
        if !sign {
            return magnitude;
        }
        let (compl, _) = BitBlock::zero(self.nbits).sub_borrow(&magnitude.bits);
        Posit::from_bits(self.clone(), compl)
    }
}

impl RoundingContext for PositContext {
    type Format = Posit;

    fn round<T: Real>(&self, val: &T) -> Self::Format {
        if val.is_zero() {
            self.zero()
        } else if val.is_nar() {
            // posits fold every non-real into NaR
            self.nar()
        } else {
            let e = val.e().unwrap();
            let c = val.c().unwrap();
            self.round_finite(val.sign(), e, &c)
        }
    }
}
