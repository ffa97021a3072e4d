// uninum: a universal numbers library in Rust
//
// triple/ops.rs
//
// Fixed-point arithmetic on blocktriples

use std::cmp::Ordering;

use num_traits::Zero;

use crate::triple::{BlockTriple, TripleClass, TripleOp};

impl BlockTriple {
    /// Adds two `Add`-layout triples of the same fraction width:
    /// aligns by scale (shifting the smaller operand right with a
    /// sticky OR into the guard region), adds or subtracts the
    /// significands, and renormalizes.
    pub fn add(&self, rhs: &Self) -> Self {
        debug_assert_eq!(self.op, TripleOp::Add);
        debug_assert_eq!(rhs.op, TripleOp::Add);
        debug_assert_eq!(self.fbits, rhs.fbits);

        // special operands
        match (self.class, rhs.class) {
            (TripleClass::Nan, _) | (_, TripleClass::Nan) => {
                return Self::nan(self.fbits, TripleOp::Add)
            }
            (TripleClass::Inf, TripleClass::Inf) => {
                // Inf + -Inf is undefined
                return if self.sign == rhs.sign {
                    Self::infinity(self.sign, self.fbits, TripleOp::Add)
                } else {
                    Self::nan(self.fbits, TripleOp::Add)
                };
            }
            (TripleClass::Inf, _) => return self.clone(),
            (_, TripleClass::Inf) => return rhs.clone(),
            (TripleClass::Zero, TripleClass::Zero) => {
                // -0 + -0 = -0, otherwise +0
                return Self::zero(self.sign && rhs.sign, self.fbits, TripleOp::Add);
            }
            (TripleClass::Zero, _) => return rhs.clone(),
            (_, TripleClass::Zero) => return self.clone(),
            (TripleClass::Normal, TripleClass::Normal) => {}
        }

        // align at the larger scale
        let scale = self.scale.max(rhs.scale);
        let a = self.sig.shr_sticky((scale - self.scale) as usize);
        let b = rhs.sig.shr_sticky((scale - rhs.scale) as usize);

        // signed add of the aligned magnitudes
        let (sign, sig) = if self.sign == rhs.sign {
            let (sum, carry) = a.add_carry(&b);
            debug_assert!(!carry, "add layout reserves headroom for the carry");
            (self.sign, sum)
        } else {
            match a.cmp(&b) {
                Ordering::Equal => {
                    return Self::zero(false, self.fbits, TripleOp::Add);
                }
                Ordering::Greater => {
                    let (diff, _) = a.sub_borrow(&b);
                    (self.sign, diff)
                }
                Ordering::Less => {
                    let (diff, _) = b.sub_borrow(&a);
                    (rhs.sign, diff)
                }
            }
        };

        let mut r = Self {
            sign,
            scale,
            sig,
            radix: self.radix,
            fbits: self.fbits,
            op: TripleOp::Add,
            class: TripleClass::Normal,
        };
        r.normalize();
        r
    }

    /// Subtracts two `Add`-layout triples.
    pub fn sub(&self, rhs: &Self) -> Self {
        self.add(&rhs.neg())
    }

    /// Multiplies two `Mul`-layout triples: the scales add and the
    /// significands multiply into a double-width fraction field.
    pub fn mul(&self, rhs: &Self) -> Self {
        debug_assert_eq!(self.op, TripleOp::Mul);
        debug_assert_eq!(rhs.op, TripleOp::Mul);
        debug_assert_eq!(self.fbits, rhs.fbits);

        let sign = self.sign != rhs.sign;
        match (self.class, rhs.class) {
            (TripleClass::Nan, _) | (_, TripleClass::Nan) => {
                return Self::nan(self.fbits, TripleOp::Mul)
            }
            (TripleClass::Inf, TripleClass::Zero) | (TripleClass::Zero, TripleClass::Inf) => {
                // Inf * 0 is undefined
                return Self::nan(self.fbits, TripleOp::Mul);
            }
            (TripleClass::Inf, _) | (_, TripleClass::Inf) => {
                return Self::infinity(sign, self.fbits, TripleOp::Mul)
            }
            (TripleClass::Zero, _) | (_, TripleClass::Zero) => {
                return Self::zero(sign, self.fbits, TripleOp::Mul)
            }
            (TripleClass::Normal, TripleClass::Normal) => {}
        }

        let fbits = self.fbits;
        let product = self.sig.to_integer() * rhs.sig.to_integer();
        let mut r = Self {
            sign,
            scale: self.scale + rhs.scale,
            sig: crate::bitblock::BitBlock::from_integer(2 * fbits + 2, &product),
            radix: self.radix + rhs.radix,
            fbits,
            op: TripleOp::Mul,
            class: TripleClass::Normal,
        };
        r.normalize();
        r
    }

    /// Divides two `Div`-layout triples by restoring long division,
    /// producing a quotient with four guard bits; the remainder
    /// collapses into the sticky position.
    pub fn div(&self, rhs: &Self) -> Self {
        debug_assert_eq!(self.op, TripleOp::Div);
        debug_assert_eq!(rhs.op, TripleOp::Div);
        debug_assert_eq!(self.fbits, rhs.fbits);

        let sign = self.sign != rhs.sign;
        match (self.class, rhs.class) {
            (TripleClass::Nan, _) | (_, TripleClass::Nan) => {
                return Self::nan(self.fbits, TripleOp::Div)
            }
            (TripleClass::Inf, TripleClass::Inf) => return Self::nan(self.fbits, TripleOp::Div),
            (TripleClass::Inf, _) => return Self::infinity(sign, self.fbits, TripleOp::Div),
            (_, TripleClass::Inf) => return Self::zero(sign, self.fbits, TripleOp::Div),
            (TripleClass::Zero, TripleClass::Zero) => {
                // 0 / 0 is undefined
                return Self::nan(self.fbits, TripleOp::Div);
            }
            (TripleClass::Zero, _) => return Self::zero(sign, self.fbits, TripleOp::Div),
            (_, TripleClass::Zero) => return Self::infinity(sign, self.fbits, TripleOp::Div),
            (TripleClass::Normal, TripleClass::Normal) => {}
        }

        let fbits = self.fbits;
        let guard = 4usize;
        let ca = self.sig.to_integer() << (fbits + guard) as u32;
        let cb = rhs.sig.to_integer();
        let (q, rem) = ca.div_rem(cb);

        let mut sig = crate::bitblock::BitBlock::from_integer(fbits + 6, &q);
        if !rem.is_zero() {
            // fold the remainder into the sticky position
            sig.set(0, true);
        }

        let mut r = Self {
            sign,
            scale: self.scale - rhs.scale,
            sig,
            radix: self.radix + guard,
            fbits,
            op: TripleOp::Div,
            class: TripleClass::Normal,
        };
        r.normalize();
        r
    }

    /// Flips the sign.
    pub fn neg(&self) -> Self {
        let mut r = self.clone();
        if r.class != TripleClass::Nan {
            r.sign = !r.sign;
        }
        r
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::real::Real;
    use rug::Integer;

    fn triple(sign: bool, scale: isize, c: u64, fbits: usize, op: TripleOp) -> BlockTriple {
        BlockTriple::from_parts(sign, scale, &Integer::from(c), fbits, op)
    }

    #[test]
    fn add_aligns_and_carries() {
        // 1.75 + 1.75 = 3.5: carry bit set, scale bumps at rounding
        let a = triple(false, 0, 0b111, 2, TripleOp::Add);
        let sum = a.add(&a);
        assert!(sum.carry_set());
        assert_eq!(sum.to_rfloat(), crate::rfloat::RFloat::from(3.5));
    }

    #[test]
    fn add_cancellation_renormalizes() {
        // 1.5 - 1.25 = 0.25: msb walks down two positions
        let a = triple(false, 0, 0b110, 2, TripleOp::Add);
        let b = triple(true, 0, 0b101, 2, TripleOp::Add);
        let sum = a.add(&b);
        assert_eq!(sum.to_rfloat(), crate::rfloat::RFloat::from(0.25));
        assert_eq!(sum.scale(), -2);
    }

    #[test]
    fn add_exact_cancellation_is_zero() {
        let a = triple(false, 3, 0b101, 2, TripleOp::Add);
        let b = a.neg();
        assert!(a.add(&b).is_zero());
    }

    #[test]
    fn mul_widens_fraction() {
        // 1.5 * 1.5 = 2.25
        let a = triple(false, 0, 0b11, 1, TripleOp::Mul);
        let p = a.mul(&a);
        assert_eq!(p.to_rfloat(), crate::rfloat::RFloat::from(2.25));
    }

    #[test]
    fn div_folds_remainder_into_sticky() {
        // 1.0 / 1.5 = 0.1010...01(sticky)
        let a = triple(false, 0, 0b100, 2, TripleOp::Div);
        let b = triple(false, 0, 0b110, 2, TripleOp::Div);
        let q = a.div(&b);
        assert_eq!(q.scale(), -1);
        // quotient must be inexact: the guard region is non-empty
        assert!(q.significand().any_below(q.radix() - q.fbits()));
    }

    #[test]
    fn inf_and_nan_propagate() {
        let inf = BlockTriple::infinity(false, 2, TripleOp::Add);
        let ninf = BlockTriple::infinity(true, 2, TripleOp::Add);
        assert_eq!(inf.add(&ninf).class(), TripleClass::Nan);

        let zero = BlockTriple::zero(false, 2, TripleOp::Mul);
        let inf = BlockTriple::infinity(false, 2, TripleOp::Mul);
        assert_eq!(inf.mul(&zero).class(), TripleClass::Nan);
    }
}
