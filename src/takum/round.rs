use num_traits::Zero;
use rug::Integer;

use crate::bitblock::BitBlock;
use crate::error::ArithError;
use crate::takum::Takum;
use crate::util::bitmask;
use crate::{Real, RoundingContext};

/// Rounding contexts for takum numbers.
///
/// A [`TakumContext`] is parameterized only by `nbits`, the total
/// width. The fixed three-bit regime caps the exponent range at
/// `[-255, 254]` independently of the width; narrower formats lose
/// exponent and fraction bits to the taper instead.
///
/// Rounding is to nearest, ties to the even encoding. Overflow
/// saturates at `maxpos`, and a non-zero value never rounds to zero:
/// the smallest magnitudes clamp at `minpos`. Non-numerical values
/// round to NaR.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TakumContext {
    nbits: usize,
}

impl TakumContext {
    /// Smallest width with a full sign/direction/regime prefix.
    pub const NBITS_MIN: usize = 5;

    /// Largest exponent of a takum value.
    pub const E_MAX: isize = 254;
    /// Smallest exponent of a takum value.
    pub const E_MIN: isize = -255;

    /// Constructs a new takum context.
    ///
    /// # Panics
    ///
    /// Panics when `nbits` is below [`TakumContext::NBITS_MIN`];
    /// use [`TakumContext::try_new`] for a fallible constructor.
    pub fn new(nbits: usize) -> Self {
        match Self::try_new(nbits) {
            Ok(ctx) => ctx,
            Err(e) => panic!("{}", e),
        }
    }

    /// Fallible constructor.
    pub fn try_new(nbits: usize) -> Result<Self, ArithError> {
        if nbits < Self::NBITS_MIN {
            return Err(ArithError::Configuration(format!(
                "takum total width needs to be at least {} bits, given {}",
                Self::NBITS_MIN,
                nbits
            )));
        }
        Ok(Self { nbits })
    }

    /// Total encoding width.
    pub fn nbits(&self) -> usize {
        self.nbits
    }

    /// Maximum representable value.
    pub fn maxpos(&self) -> Takum {
        let mut bits = BitBlock::ones(self.nbits);
        bits.set(self.nbits - 1, false);
        Takum::from_bits(self.clone(), bits)
    }

    /// Minimum positive representable value.
    pub fn minpos(&self) -> Takum {
        Takum::from_bits(self.clone(), BitBlock::from_u64(self.nbits, 1))
    }

    /// Maximum-magnitude negative value (`-maxpos`).
    pub fn maxneg(&self) -> Takum {
        let mut bits = BitBlock::zero(self.nbits);
        bits.set(self.nbits - 1, true);
        bits.set(0, true);
        Takum::from_bits(self.clone(), bits)
    }

    /// Minimum-magnitude negative value (`-minpos`).
    pub fn minneg(&self) -> Takum {
        Takum::from_bits(self.clone(), BitBlock::ones(self.nbits))
    }

    /// The zero encoding.
    pub fn zero(&self) -> Takum {
        Takum::from_bits(self.clone(), BitBlock::zero(self.nbits))
    }

    /// The NaR encoding.
    pub fn nar(&self) -> Takum {
        let mut bits = BitBlock::zero(self.nbits);
        bits.set(self.nbits - 1, true);
        Takum::from_bits(self.clone(), bits)
    }

    /// Encodes the magnitude fields of a finite non-zero value as an
    /// unbounded bit stream (direction, regime, exponent, fraction),
    /// msb first, returning the stream and its length.
    fn ideal_magnitude(&self, e: isize, c: &Integer) -> (Integer, usize) {
        // split the exponent into the regime schedule
        let (d, r, a_field) = if e >= 0 {
            let r = (63 - ((e + 1) as u64).leading_zeros()) as usize;
            (true, r, e - ((1 << r) - 1))
        } else {
            let r = (63 - ((-e) as u64).leading_zeros()) as usize;
            (false, r, e + (1 << (r + 1)) - 1)
        };
        debug_assert!(r <= 7);
        debug_assert!((0..(1 << r)).contains(&a_field));

        let regime = if d { r } else { 7 - r };

        let p = c.significant_bits() as usize;
        let fbits = p - 1;
        let frac = c.clone() & bitmask(fbits);

        let mut stream = Integer::from(if d { 1 } else { 0 });
        stream = (stream << 3) | Integer::from(regime);
        stream = (stream << r as u32) | Integer::from(a_field);
        stream = (stream << fbits as u32) | frac;
        (stream, 4 + r + fbits)
    }

    /// Internal rounding of a finite non-zero `(sign, e, c)`.
    fn round_finite(&self, sign: bool, e: isize, c: &Integer) -> Takum {
        // the fixed regime caps the dynamic range
        if e > Self::E_MAX {
            return self.with_sign(self.maxpos(), sign);
        }
        if e < Self::E_MIN {
            return self.with_sign(self.minpos(), sign);
        }

        let (stream, len) = self.ideal_magnitude(e, c);
        let avail = self.nbits - 1;

        let mut pattern = if len <= avail {
            stream << (avail - len) as u32
        } else {
            let drop = len - avail;
            let kept: Integer = stream.clone() >> drop as u32;
            let guard = stream.get_bit((drop - 1) as u32);
            let sticky = !(stream & bitmask(drop - 1)).is_zero();

            let lsb = kept.get_bit(0);
            if guard && (sticky || lsb) {
                kept + Integer::from(1)
            } else {
                kept
            }
        };

        if pattern.is_zero() {
            // a non-zero value never rounds to the zero encoding
            pattern = Integer::from(1);
        }
        if pattern.significant_bits() as usize > avail {
            pattern = self.maxpos().into_bits();
        }

        let magnitude = Takum::from_bits(self.clone(), BitBlock::from_integer(self.nbits, &pattern));
        self.with_sign(magnitude, sign)
    }

    // applies a sign by two's-complementing the encoding
    fn with_sign(&self, magnitude: Takum, sign: bool) -> Takum {
        if !sign {
            return magnitude;
        }
        let (compl, _) = BitBlock::zero(self.nbits).sub_borrow(&magnitude.bits);
        Takum::from_bits(self.clone(), compl)
    }
}

impl RoundingContext for TakumContext {
    type Format = Takum;

    fn round<T: Real>(&self, val: &T) -> Self::Format {
        if val.is_zero() {
            self.zero()
        } else if val.is_nar() {
            self.nar()
        } else {
            let e = val.e().unwrap();
            let c = val.c().unwrap();
            self.round_finite(val.sign(), e, &c)
        }
    }
}
