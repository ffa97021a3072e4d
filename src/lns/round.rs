use num_traits::Zero;

use crate::bitblock::BitBlock;
use crate::error::ArithError;
use crate::lns::Lns;
use crate::math;
use crate::rfloat::{RFloat, RFloatContext};
use crate::{Real, RoundingContext};

/// Rounding contexts for logarithmic numbers.
///
/// A [`LnsContext`] is parameterized by `nbits`, the total width of
/// the encoding, and `rbits`, the number of fractional bits in the
/// log field. Conversion from a real `r` computes
/// `L = round(2^rbits * log2|r|)` with MPFR round-to-odd at working
/// precision, then clamps `L` to the representable range: there are
/// no subnormals or infinities, the range simply tapers at both ends.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LnsContext {
    nbits: usize,
    rbits: usize,
}

impl LnsContext {
    /// Constructs a new logarithmic context.
    ///
    /// # Panics
    ///
    /// Panics if the log field cannot hold the fractional bits;
    /// use [`LnsContext::try_new`] for a fallible constructor.
    pub fn new(nbits: usize, rbits: usize) -> Self {
        match Self::try_new(nbits, rbits) {
            Ok(ctx) => ctx,
            Err(e) => panic!("{}", e),
        }
    }

    /// Fallible constructor.
    pub fn try_new(nbits: usize, rbits: usize) -> Result<Self, ArithError> {
        if nbits < 2 {
            return Err(ArithError::Configuration(
                "lns needs a sign bit and at least one log bit".to_string(),
            ));
        }
        if rbits >= nbits - 1 {
            return Err(ArithError::Configuration(format!(
                "lns<{},{}> leaves no integer bit in the log field",
                nbits, rbits
            )));
        }
        Ok(Self { nbits, rbits })
    }

    /// Total encoding width.
    pub fn nbits(&self) -> usize {
        self.nbits
    }

    /// Fractional bits of the log field.
    pub fn rbits(&self) -> usize {
        self.rbits
    }

    /// The reserved (most negative) raw log-field value.
    pub fn log_min(&self) -> isize {
        -(1 << (self.nbits - 2))
    }

    /// The largest raw log-field value.
    pub fn log_max(&self) -> isize {
        (1 << (self.nbits - 2)) - 1
    }

    /// Working precision for conversions through the log domain.
    pub(crate) fn working_prec(&self) -> usize {
        self.nbits + self.rbits + 32
    }

    /// The largest representable value: `2^(log_max / 2^rbits)`.
    pub fn maxpos(&self) -> Lns {
        self.from_log(false, self.log_max())
    }

    /// The smallest positive representable value.
    pub fn minpos(&self) -> Lns {
        self.from_log(false, self.log_min() + 1)
    }

    /// The largest-magnitude negative value.
    pub fn maxneg(&self) -> Lns {
        self.from_log(true, self.log_max())
    }

    /// The smallest-magnitude negative value.
    pub fn minneg(&self) -> Lns {
        self.from_log(true, self.log_min() + 1)
    }

    /// The reserved zero encoding.
    pub fn zero(&self) -> Lns {
        self.from_log(false, self.log_min())
    }

    /// The reserved NaN encoding.
    pub fn nan(&self) -> Lns {
        self.from_log(true, self.log_min())
    }

    /// Builds an encoding from a sign and raw log field.
    pub(crate) fn from_log(&self, sign: bool, l: isize) -> Lns {
        let lbits = self.nbits - 1;
        let raw = (l & ((1 << lbits) - 1)) as u64;
        let mut bits = BitBlock::from_u64(self.nbits, raw);
        bits.set(self.nbits - 1, sign);
        Lns::from_bits(self.clone(), bits)
    }

    /// Rounds a raw (unclamped) log value into the field, saturating
    /// at the range edges.
    pub(crate) fn clamp_log(&self, l: &rug::Integer) -> isize {
        if *l > self.log_max() as i64 {
            self.log_max()
        } else if *l <= self.log_min() as i64 {
            // the reserved encoding is not a number; saturate above it
            self.log_min() + 1
        } else {
            l.to_isize().unwrap()
        }
    }
}

impl RoundingContext for LnsContext {
    type Format = Lns;

    fn round<T: Real>(&self, val: &T) -> Self::Format {
        if val.is_zero() {
            return self.zero();
        }
        if !val.is_numerical() {
            return self.nan();
        }
        if val.is_infinite() {
            // no infinity in the log domain: taper to the extremes
            return if val.sign() { self.maxneg() } else { self.maxpos() };
        }

        let sign = val.sign();
        let magnitude = RFloat::Real(false, val.exp().unwrap(), val.c().unwrap());

        // L = round(2^rbits * log2|r|)
        let log = math::log2_rto(&magnitude, self.working_prec());
        let scaled = log.mul_exact(&RFloat::pow2(self.rbits as isize));
        let rounded = RFloatContext::new().with_min_n(-1).round(&scaled);

        let l = match rounded {
            RFloat::Real(s, exp, c) => {
                debug_assert!(exp >= 0);
                let mut v = c << exp as u32;
                if s {
                    v = -v;
                }
                v
            }
            _ => rug::Integer::zero(),
        };

        self.from_log(sign, self.clamp_log(&l))
    }
}
