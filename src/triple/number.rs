use std::fmt;

use num_traits::Zero;
use rug::Integer;

use crate::bitblock::BitBlock;
use crate::native::FloatClass;
use crate::real::FormatTag;
use crate::rfloat::RFloat;
use crate::Real;

/// The operation a triple feeds; decides the radix-point layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TripleOp {
    Add,
    Mul,
    Div,
}

/// Special-value classification of a triple.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TripleClass {
    Normal,
    Zero,
    Inf,
    Nan,
}

/// Sign, scale, and fixed-point significand of a value in flight
/// between decode and round.
///
/// When `class` is `Normal`, the represented value is
/// `(-1)^sign * sig * 2^(scale - radix)` and the significand is
/// normalized: the most significant set bit sits at position `radix`
/// (the hidden bit), or at `radix + 1` for a triple representing an
/// addition overflow (carry bit set).
#[derive(Clone, Debug)]
pub struct BlockTriple {
    pub(crate) sign: bool,
    pub(crate) scale: isize,
    pub(crate) sig: BitBlock,
    /// bits below the radix point in `sig`
    pub(crate) radix: usize,
    /// fraction width of the source format
    pub(crate) fbits: usize,
    pub(crate) op: TripleOp,
    pub(crate) class: TripleClass,
}

impl BlockTriple {
    /// Working width of the `op`-specific layout for a format with
    /// `fbits` fraction bits.
    fn layout(fbits: usize, op: TripleOp) -> (usize, usize) {
        // (width, radix)
        match op {
            // 0ii.fff + three guard positions
            TripleOp::Add => (fbits + 6, fbits + 3),
            // inputs arrive canonical; the product widens to 2*fbits
            TripleOp::Mul => (2 * fbits + 2, fbits),
            // canonical input; the quotient carries four guard bits
            TripleOp::Div => (fbits + 6, fbits),
        }
    }

    /// Builds a normal triple from a canonical `1 + fbits` bit
    /// significand `c` with `value = (-1)^sign * c * 2^(scale - fbits)`.
    pub fn from_parts(sign: bool, scale: isize, c: &Integer, fbits: usize, op: TripleOp) -> Self {
        debug_assert!(!c.is_zero(), "normal triples have a non-zero significand");
        let (width, radix) = Self::layout(fbits, op);
        let sig = BitBlock::from_integer(width, c).shl(radix - fbits);
        let mut t = Self {
            sign,
            scale,
            sig,
            radix,
            fbits,
            op,
            class: TripleClass::Normal,
        };
        t.normalize();
        t
    }

    /// A zero triple.
    pub fn zero(sign: bool, fbits: usize, op: TripleOp) -> Self {
        let (width, radix) = Self::layout(fbits, op);
        Self {
            sign,
            scale: 0,
            sig: BitBlock::zero(width),
            radix,
            fbits,
            op,
            class: TripleClass::Zero,
        }
    }

    /// A signed infinity triple.
    pub fn infinity(sign: bool, fbits: usize, op: TripleOp) -> Self {
        let mut t = Self::zero(sign, fbits, op);
        t.class = TripleClass::Inf;
        t
    }

    /// A NaN triple.
    pub fn nan(fbits: usize, op: TripleOp) -> Self {
        let mut t = Self::zero(false, fbits, op);
        t.class = TripleClass::Nan;
        t
    }

    /// The sign bit.
    pub fn sign_bit(&self) -> bool {
        self.sign
    }

    /// The scale: the binary exponent of the hidden bit.
    pub fn scale(&self) -> isize {
        self.scale
    }

    /// The fixed-point significand.
    pub fn significand(&self) -> &BitBlock {
        &self.sig
    }

    /// Bits below the radix point in the significand.
    pub fn radix(&self) -> usize {
        self.radix
    }

    /// Fraction width of the source format.
    pub fn fbits(&self) -> usize {
        self.fbits
    }

    /// The operation tag.
    pub fn op(&self) -> TripleOp {
        self.op
    }

    /// The special-value class.
    pub fn class(&self) -> TripleClass {
        self.class
    }

    /// Returns true if this triple is a normal value.
    pub fn is_normal(&self) -> bool {
        self.class == TripleClass::Normal
    }

    /// Returns true if the carry bit (one above the hidden bit) is
    /// set, i.e. the triple represents an overflow out of an add.
    pub fn carry_set(&self) -> bool {
        self.sig.msb() == Some(self.radix + 1)
    }

    /// Restores the normalization invariant: shifts the significand so
    /// the most significant set bit lands on the hidden-bit position,
    /// adjusting the scale. A carry out of an add (msb one past the
    /// hidden bit) is left in place; the rounding funnel accounts for
    /// it. A significand that cancels to zero demotes the class.
    pub(crate) fn normalize(&mut self) {
        if self.class != TripleClass::Normal {
            return;
        }
        match self.sig.msb() {
            None => {
                self.class = TripleClass::Zero;
                self.scale = 0;
            }
            Some(msb) if msb == self.radix => {}
            Some(msb) if msb == self.radix + 1 => {
                // the second integer bit: an addition carry or a
                // product in [2, 4); the rounding funnel absorbs it
            }
            Some(msb) if msb < self.radix => {
                // cancellation: shift the leading bit back up
                let shift = self.radix - msb;
                self.sig = self.sig.shl(shift);
                self.scale -= shift as isize;
            }
            Some(msb) => {
                // product overflow beyond the carry position
                let shift = msb - self.radix;
                self.sig = self.sig.shr_sticky(shift);
                self.scale += shift as isize;
            }
        }
    }

    /// Converts this triple to the unbounded interchange format,
    /// exactly.
    pub fn to_rfloat(&self) -> RFloat {
        match self.class {
            TripleClass::Nan => RFloat::Nan,
            TripleClass::Inf => {
                if self.sign {
                    RFloat::NegInfinity
                } else {
                    RFloat::PosInfinity
                }
            }
            TripleClass::Zero => RFloat::zero(),
            TripleClass::Normal => RFloat::Real(
                self.sign,
                self.scale - self.radix as isize,
                self.sig.to_integer(),
            ),
        }
    }
}

impl Real for BlockTriple {
    fn radix() -> usize {
        2
    }

    fn sign(&self) -> bool {
        self.sign
    }

    fn exp(&self) -> Option<isize> {
        match self.class {
            TripleClass::Normal => Some(self.scale - self.radix as isize),
            _ => None,
        }
    }

    fn e(&self) -> Option<isize> {
        self.to_rfloat().e()
    }

    fn n(&self) -> Option<isize> {
        self.exp().map(|x| x - 1)
    }

    fn c(&self) -> Option<Integer> {
        match self.class {
            TripleClass::Normal => Some(self.sig.to_integer()),
            TripleClass::Zero => Some(Integer::zero()),
            _ => None,
        }
    }

    fn p(&self) -> usize {
        match self.class {
            TripleClass::Normal => self.sig.msb().map_or(0, |m| m + 1),
            _ => 0,
        }
    }

    fn is_nar(&self) -> bool {
        matches!(self.class, TripleClass::Inf | TripleClass::Nan)
    }

    fn is_finite(&self) -> bool {
        matches!(self.class, TripleClass::Normal | TripleClass::Zero)
    }

    fn is_infinite(&self) -> bool {
        self.class == TripleClass::Inf
    }

    fn is_zero(&self) -> bool {
        self.class == TripleClass::Zero
    }

    fn is_negative(&self) -> Option<bool> {
        match self.class {
            TripleClass::Normal | TripleClass::Inf => Some(self.sign),
            _ => None,
        }
    }

    fn is_numerical(&self) -> bool {
        self.class != TripleClass::Nan
    }
}

impl FormatTag for BlockTriple {
    const TAG: &'static str = "blocktriple";

    fn classify(&self) -> FloatClass {
        match self.class {
            TripleClass::Zero => FloatClass::Zero,
            TripleClass::Normal => FloatClass::Normal,
            TripleClass::Inf => FloatClass::Infinite,
            TripleClass::Nan => FloatClass::Nan,
        }
    }
}

impl fmt::Display for BlockTriple {
    /// Rendered as `(sign, scale, ii.ffff)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.class {
            TripleClass::Nan => write!(f, "(nan)"),
            TripleClass::Inf => write!(f, "({}inf)", if self.sign { '-' } else { '+' }),
            TripleClass::Zero => write!(f, "({}0)", if self.sign { '-' } else { '+' }),
            TripleClass::Normal => {
                write!(f, "({}, {}, ", if self.sign { '-' } else { '+' }, self.scale)?;
                for i in (0..self.sig.width()).rev() {
                    write!(f, "{}", if self.sig.get(i) { '1' } else { '0' })?;
                    if i == self.radix && i != 0 {
                        write!(f, ".")?;
                    }
                }
                write!(f, ")")
            }
        }
    }
}
