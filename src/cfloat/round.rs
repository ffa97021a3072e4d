use num_traits::Zero;
use rug::Integer;

use crate::bitblock::BitBlock;
use crate::cfloat::CFloat;
use crate::error::ArithError;
use crate::round::RoundingDirection;
use crate::triple::{BlockTriple, TripleClass, TripleOp};
use crate::util::bitmask;
use crate::{Real, RoundingContext, RoundingMode};

/// Rounding contexts for classic parameterized floating-point numbers.
///
/// Must define format parameters `es` and `nbits` (see
/// [`CFloat`] for a description of the encoding). The remaining
/// parameters select the behavior at the edges of the encoding space:
/// `subnormals` enables gradual underflow, `supernormals` reserves the
/// all-ones exponent region for infinity and NaN, and `saturating`
/// clamps overflow at the largest finite value. The rounding mode
/// affects the rounding direction; the default is round to nearest,
/// ties to even.
///
/// Whatever the flags, one encoding is always reserved for NaN so the
/// silent error-signaling mode has a value to propagate. Without
/// supernormals that encoding is the all-ones pattern, which is why
/// `maxpos` of such formats carries an all-ones exponent and an
/// all-ones-minus-one fraction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CFloatContext {
    es: usize,
    nbits: usize,
    subnormals: bool,
    supernormals: bool,
    saturating: bool,
    rm: RoundingMode,
}

impl CFloatContext {
    /// Constructs a new rounding context with the given format
    /// parameters, IEEE-style edge behavior (subnormals and
    /// supernormals on, saturation off), and round-nearest-even.
    ///
    /// # Panics
    ///
    /// Panics if the configuration has no valid value range;
    /// use [`CFloatContext::try_new`] for a fallible constructor.
    pub fn new(es: usize, nbits: usize) -> Self {
        match Self::try_new(es, nbits) {
            Ok(ctx) => ctx,
            Err(e) => panic!("{}", e),
        }
    }

    /// Fallible constructor.
    pub fn try_new(es: usize, nbits: usize) -> Result<Self, ArithError> {
        if es < 1 {
            return Err(ArithError::Configuration(
                "cfloat requires at least one exponent bit".to_string(),
            ));
        }
        if nbits < es + 2 {
            return Err(ArithError::Configuration(format!(
                "cfloat<{},{}> leaves no fraction bit",
                nbits, es
            )));
        }
        Ok(Self {
            es,
            nbits,
            subnormals: true,
            supernormals: true,
            saturating: false,
            rm: RoundingMode::NearestTiesToEven,
        })
    }

    /// Sets whether all-zero-exponent encodings denote subnormals.
    pub fn with_subnormals(mut self, enable: bool) -> Self {
        self.subnormals = enable;
        self.validate()
    }

    /// Sets whether the all-ones exponent region encodes infinity and
    /// NaN (IEEE behavior) or extra normal range.
    pub fn with_supernormals(mut self, enable: bool) -> Self {
        self.supernormals = enable;
        self.validate()
    }

    /// Sets overflow saturation.
    pub fn with_saturating(mut self, enable: bool) -> Self {
        self.saturating = enable;
        self
    }

    /// Sets the rounding mode.
    pub fn with_rounding_mode(mut self, rm: RoundingMode) -> Self {
        self.rm = rm;
        self
    }

    fn validate(self) -> Self {
        // a one-bit exponent without sub- or supernormals leaves
        // no normal binade at all
        assert!(
            self.es >= 2 || self.subnormals || self.supernormals,
            "cfloat with es = 1 needs subnormals or supernormals to \
             have a normal range"
        );
        self
    }

    /// Exponent field width.
    pub fn es(&self) -> usize {
        self.es
    }

    /// Total encoding width.
    pub fn nbits(&self) -> usize {
        self.nbits
    }

    /// Fraction field width: `nbits - 1 - es`.
    pub fn fbits(&self) -> usize {
        self.nbits - 1 - self.es
    }

    /// Whether this format has subnormal encodings.
    pub fn has_subnormals(&self) -> bool {
        self.subnormals
    }

    /// Whether this format reserves the all-ones exponent region.
    pub fn has_supernormals(&self) -> bool {
        self.supernormals
    }

    /// Whether overflow saturates.
    pub fn is_saturating(&self) -> bool {
        self.saturating
    }

    /// The exponent bias: `2^(es - 1) - 1`.
    pub fn bias(&self) -> isize {
        (1isize << (self.es - 1)) - 1
    }

    /// Exponent of the largest finite value.
    pub fn emax(&self) -> isize {
        let top_field = (1isize << self.es) - 1;
        if self.supernormals {
            // the all-ones field is reserved
            (top_field - 1) - self.bias()
        } else {
            top_field - self.bias()
        }
    }

    /// Exponent of the smallest normal value.
    pub fn emin_normal(&self) -> isize {
        1 - self.bias()
    }

    /// Exponent of the smallest representable value: the scale of
    /// `minpos`, `1 - bias - fbits` with subnormals and `1 - bias`
    /// without.
    pub fn emin(&self) -> isize {
        if self.subnormals {
            1 - self.bias() - self.fbits() as isize
        } else {
            self.emin_normal()
        }
    }

    /// The largest finite value.
    pub fn maxpos(&self) -> CFloat {
        let fbits = self.fbits();
        let top_field = bitmask(self.es) << fbits as u32;
        let frac = if self.supernormals {
            // exponent all-ones-minus-one, fraction all ones
            bitmask(fbits)
        } else {
            // one below the reserved all-ones NaN pattern
            bitmask(fbits) - Integer::from(1)
        };
        let efield = if self.supernormals {
            top_field - (Integer::from(1) << fbits as u32)
        } else {
            top_field
        };
        CFloat::from_fields(self.clone(), false, &efield, &frac)
    }

    /// The smallest positive value (subnormal if enabled).
    pub fn minpos(&self) -> CFloat {
        if self.subnormals {
            CFloat::from_fields(self.clone(), false, &Integer::zero(), &Integer::from(1))
        } else {
            let efield = Integer::from(1) << self.fbits() as u32;
            CFloat::from_fields(self.clone(), false, &efield, &Integer::zero())
        }
    }

    /// The largest-magnitude negative value.
    pub fn maxneg(&self) -> CFloat {
        -self.maxpos()
    }

    /// The smallest-magnitude negative value.
    pub fn minneg(&self) -> CFloat {
        -self.minpos()
    }

    /// A signed zero.
    pub fn zero(&self, sign: bool) -> CFloat {
        let mut bits = BitBlock::zero(self.nbits);
        if sign {
            bits.set(self.nbits - 1, true);
        }
        CFloat::from_bits(self.clone(), bits)
    }

    /// The signed infinity, or `maxpos`/`maxneg` if the format has no
    /// infinity encoding.
    pub fn infinity(&self, sign: bool) -> CFloat {
        if self.supernormals {
            let efield = bitmask(self.es) << self.fbits() as u32;
            CFloat::from_fields(self.clone(), sign, &efield, &Integer::zero())
        } else if sign {
            self.maxneg()
        } else {
            self.maxpos()
        }
    }

    /// The quiet NaN encoding.
    pub fn nan(&self) -> CFloat {
        let fbits = self.fbits();
        let efield = bitmask(self.es) << fbits as u32;
        let frac = if self.supernormals {
            // quiet bit only
            Integer::from(1) << (fbits - 1) as u32
        } else {
            // the single reserved pattern
            bitmask(fbits)
        };
        CFloat::from_fields(self.clone(), false, &efield, &frac)
    }

    /// Decodes an encoded value into a blocktriple laid out for `op`.
    ///
    /// The four branches: zero; subnormal (normalize by shifting the
    /// fraction up to the hidden position, adjusting the scale);
    /// all-ones exponent (infinity, NaN, or extended normal range
    /// depending on `supernormals`); and normal (hidden bit inserted,
    /// exponent unbiased).
    pub fn decode(&self, x: &CFloat, op: TripleOp) -> BlockTriple {
        debug_assert_eq!(x.ctx(), self);
        let fbits = self.fbits();
        let sign = x.sign_field();
        let efield = x.exp_field();
        let frac = x.frac_field();

        let top_field = ((1u64 << self.es) - 1) as isize;
        if efield == 0 {
            if frac.is_zero() {
                return BlockTriple::zero(sign, fbits, op);
            }
            // subnormal: shift the leading fraction bit up to the
            // hidden position
            let msb = frac.significant_bits() as usize - 1;
            let shift = fbits - msb;
            let c = frac << shift as u32;
            let scale = (1 - self.bias()) - shift as isize;
            return BlockTriple::from_parts(sign, scale, &c, fbits, op);
        }
        if efield == top_field {
            if self.supernormals {
                return if frac.is_zero() {
                    BlockTriple::infinity(sign, fbits, op)
                } else {
                    BlockTriple::nan(fbits, op)
                };
            }
            if frac == bitmask(fbits) {
                // the reserved NaN pattern
                return BlockTriple::nan(fbits, op);
            }
            // extended normal range
        }

        let scale = efield - self.bias();
        let c = frac + (Integer::from(1) << fbits as u32);
        BlockTriple::from_parts(sign, scale, &c, fbits, op)
    }

    /// The rounding funnel: rounds a blocktriple into this format. The triple's op-specific layout decides where the
    /// guard, round, and sticky bits come from.
    pub fn round_triple(&self, t: &BlockTriple) -> CFloat {
        match t.class() {
            TripleClass::Nan => self.nan(),
            // a true infinity operand propagates; saturation only
            // applies to finite overflow
            TripleClass::Inf => self.infinity(t.sign_bit()),
            TripleClass::Zero => self.zero(t.sign_bit()),
            TripleClass::Normal => {
                // the significand is exact including any sticky
                // folded into its lowest bit
                let c = t.significand().to_integer();
                let exp = t.scale() - t.radix() as isize;
                self.round_exact(t.sign_bit(), c, exp)
            }
        }
    }

    // overflow result per the (saturating, supernormals) table
    fn overflow(&self, sign: bool) -> CFloat {
        if self.saturating || !self.supernormals {
            if sign {
                self.maxneg()
            } else {
                self.maxpos()
            }
        } else {
            self.infinity(sign)
        }
    }

    /// Rounds the exact value `(-1)^sign * c * 2^exp` into this format.
    fn round_exact(&self, sign: bool, c: Integer, exp: isize) -> CFloat {
        debug_assert!(!c.is_zero());
        let fbits = self.fbits();

        // scale-extract: the exponent of the leading significand bit
        let s = exp + c.significant_bits() as isize - 1;

        // overflow before rounding
        if s > self.emax() {
            return self.overflow(sign);
        }

        // pick the target lsb exponent; subnormals pin it at the
        // bottom of the format
        let mut lsb_exp = s - fbits as isize;
        let subnormal_floor = self.emin_normal() - fbits as isize;
        if s < self.emin_normal() {
            if self.subnormals {
                lsb_exp = subnormal_floor;
            } else {
                // underflow to zero or minpos by the round bit
                return self.underflow(sign, &c, exp);
            }
        }

        // guard/round/sticky extraction at the target lsb
        let drop = lsb_exp - exp;
        let (mut frac_c, guard, sticky) = if drop <= 0 {
            (c << (-drop) as u32, false, false)
        } else {
            let drop = drop as usize;
            let kept = c.clone() >> drop as u32;
            let guard = c.get_bit((drop - 1) as u32);
            let below = c & bitmask(drop - 1);
            (kept, guard, !below.is_zero())
        };

        // underflow to zero: everything rounded away
        if frac_c.is_zero() && !guard && !sticky {
            return self.zero(sign);
        }

        // round-to-nearest-even (or the context's mode)
        if self.round_up(sign, &frac_c, guard, sticky) {
            frac_c += 1;
        }

        // post-round carry: renormalize and re-check overflow
        let mut s = lsb_exp + fbits as isize;
        if frac_c.significant_bits() as isize > fbits as isize + 1 {
            frac_c >>= 1;
            s += 1;
            if s > self.emax() {
                return self.overflow(sign);
            }
        }

        if frac_c.is_zero() {
            return self.zero(sign);
        }

        // re-encode
        if frac_c.clone() >> fbits as u32 == 0 {
            // stayed below the hidden bit: subnormal encoding
            return CFloat::from_fields(self.clone(), sign, &Integer::zero(), &frac_c);
        }

        let frac = frac_c - (Integer::from(1) << fbits as u32);
        let efield = Integer::from(s + self.bias()) << fbits as u32;
        let encoded = CFloat::from_fields(self.clone(), sign, &efield, &frac);

        // never round onto the reserved NaN pattern
        if !self.supernormals && encoded.is_nan() {
            return self.overflow(sign);
        }
        encoded
    }

    // |v| below the smallest representable: round to zero or minpos
    fn underflow(&self, sign: bool, c: &Integer, exp: isize) -> CFloat {
        // compare against half of minpos
        let minpos_exp = self.emin();
        let v = crate::rfloat::RFloat::Real(false, exp, c.clone());
        let half = crate::rfloat::RFloat::Real(false, minpos_exp - 1, Integer::from(1));
        let cmp = v.partial_cmp(&half).unwrap();
        let up = match cmp {
            std::cmp::Ordering::Greater => true,
            std::cmp::Ordering::Less => false,
            // a tie rounds to the even neighbor, which is zero
            std::cmp::Ordering::Equal => false,
        };
        if up {
            if sign {
                self.minneg()
            } else {
                self.minpos()
            }
        } else {
            self.zero(sign)
        }
    }

    // increment decision for the context's rounding mode
    fn round_up(&self, sign: bool, c: &Integer, guard: bool, sticky: bool) -> bool {
        let (is_nearest, rd) = self.rm.to_direction(sign);
        match (is_nearest, guard, sticky, rd) {
            (_, false, false, _) => false,
            (true, false, _, _) => false,
            (true, true, true, _) => true,
            (true, true, false, RoundingDirection::ToZero) => false,
            (true, true, false, RoundingDirection::AwayZero) => true,
            (true, true, false, RoundingDirection::ToEven) => c.is_odd(),
            (true, true, false, RoundingDirection::ToOdd) => c.is_even(),
            (false, _, _, RoundingDirection::ToZero) => false,
            (false, _, _, RoundingDirection::AwayZero) => true,
            (false, _, _, RoundingDirection::ToEven) => c.is_odd(),
            (false, _, _, RoundingDirection::ToOdd) => c.is_even(),
        }
    }
}

impl RoundingContext for CFloatContext {
    type Format = CFloat;

    fn round<T: Real>(&self, num: &T) -> Self::Format {
        if num.is_zero() {
            self.zero(num.sign())
        } else if num.is_infinite() {
            self.infinity(num.sign())
        } else if num.is_nar() {
            self.nan()
        } else {
            self.round_exact(num.sign(), num.c().unwrap(), num.exp().unwrap())
        }
    }
}
