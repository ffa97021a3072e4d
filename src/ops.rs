/*!
Traits for rounded mathematical operations.

Implementations of these traits operate on [`Real`] types,
rounding the result according to a given
[`RoundingContext`]. The `rounded_*` methods take operands already in
the context's format; the methods prefixed by `mpmf_` accept any
[`Real`] mix and round once at the end.
*/

use crate::math;
use crate::rfloat::RFloat;
use crate::{Real, RoundingContext};

macro_rules! rounded_1ary {
    ($trait:ident, $imp:ident, $mpmf:ident, $descr:expr) => {
        #[doc = "Rounded "]
        #[doc = $descr]
        #[doc = " for rounding contexts."]
        pub trait $trait: RoundingContext {
            #[doc = "Performs rounded `"]
            #[doc = $descr]
            #[doc = "`. Argument is the same format as the output.
            Use the method prefixed by `mpmf_` if the input type differs."]
            fn $imp(&self, src: &Self::Format) -> Self::Format;

            #[doc = "Performs rounded `"]
            #[doc = $descr]
            #[doc = "`."]
            fn $mpmf<N: Real>(&self, src: &N) -> Self::Format;
        }
    };
}

// Traits for 1-ary operators
rounded_1ary!(RoundedNeg, neg, mpmf_neg, "-x");
rounded_1ary!(RoundedSqrt, sqrt, mpmf_sqrt, "sqrt(x)");

macro_rules! rounded_2ary {
    ($trait:ident, $imp:ident, $mpmf:ident, $descr:expr) => {
        #[doc = "Rounded "]
        #[doc = $descr]
        #[doc = " for rounding contexts."]
        pub trait $trait: RoundingContext {
            #[doc = "Performs rounded `"]
            #[doc = $descr]
            #[doc = "`. Arguments are the same format as the output.
            Use the method prefixed by `mpmf_` if the input types differ."]
            fn $imp(&self, src1: &Self::Format, src2: &Self::Format) -> Self::Format;

            #[doc = "Performs rounded `"]
            #[doc = $descr]
            #[doc = "`."]
            fn $mpmf<N1, N2>(&self, src1: &N1, src2: &N2) -> Self::Format
            where
                N1: Real,
                N2: Real;
        }
    };
}

// Traits for 2-ary operators
rounded_2ary!(RoundedAdd, add, mpmf_add, "x + y");
rounded_2ary!(RoundedSub, sub, mpmf_sub, "x - y");
rounded_2ary!(RoundedMul, mul, mpmf_mul, "x * y");
rounded_2ary!(RoundedDiv, div, mpmf_div, "x / y");

// working precision for a context-independent faithful quotient
fn mixed_prec<N1: Real, N2: Real>(a: &N1, b: &N2) -> usize {
    a.p().max(b.p()).max(53) + 8
}

/// Blanket mixed-format operations for any rounding context:
/// the exact intermediate does the work, the context rounds once.
macro_rules! impl_rounded_for_ctx {
    ($ctx:ty) => {
        impl RoundedAdd for $ctx {
            fn add(&self, src1: &Self::Format, src2: &Self::Format) -> Self::Format {
                self.mpmf_add(src1, src2)
            }

            fn mpmf_add<N1: Real, N2: Real>(&self, src1: &N1, src2: &N2) -> Self::Format {
                let sum = RFloat::from_number(src1).add_exact(&RFloat::from_number(src2));
                self.round(&sum)
            }
        }

        impl RoundedSub for $ctx {
            fn sub(&self, src1: &Self::Format, src2: &Self::Format) -> Self::Format {
                self.mpmf_sub(src1, src2)
            }

            fn mpmf_sub<N1: Real, N2: Real>(&self, src1: &N1, src2: &N2) -> Self::Format {
                let diff = RFloat::from_number(src1).add_exact(&-RFloat::from_number(src2));
                self.round(&diff)
            }
        }

        impl RoundedMul for $ctx {
            fn mul(&self, src1: &Self::Format, src2: &Self::Format) -> Self::Format {
                self.mpmf_mul(src1, src2)
            }

            fn mpmf_mul<N1: Real, N2: Real>(&self, src1: &N1, src2: &N2) -> Self::Format {
                let prod = RFloat::from_number(src1).mul_exact(&RFloat::from_number(src2));
                self.round(&prod)
            }
        }

        impl RoundedDiv for $ctx {
            fn div(&self, src1: &Self::Format, src2: &Self::Format) -> Self::Format {
                self.mpmf_div(src1, src2)
            }

            fn mpmf_div<N1: Real, N2: Real>(&self, src1: &N1, src2: &N2) -> Self::Format {
                let a = RFloat::from_number(src1);
                let b = RFloat::from_number(src2);
                if b.is_zero() {
                    // 0/0 is invalid; x/0 diverges with the operand signs
                    let quot = if a.is_zero() {
                        RFloat::Nan
                    } else if a.sign() == b.sign() {
                        RFloat::PosInfinity
                    } else {
                        RFloat::NegInfinity
                    };
                    return self.round(&quot);
                }
                let quot = math::div_rto(&a, &b, mixed_prec(src1, src2));
                self.round(&quot)
            }
        }

        impl RoundedNeg for $ctx {
            fn neg(&self, src: &Self::Format) -> Self::Format {
                self.mpmf_neg(src)
            }

            fn mpmf_neg<N: Real>(&self, src: &N) -> Self::Format {
                self.round(&-RFloat::from_number(src))
            }
        }

        impl RoundedSqrt for $ctx {
            fn sqrt(&self, src: &Self::Format) -> Self::Format {
                self.mpmf_sqrt(src)
            }

            fn mpmf_sqrt<N: Real>(&self, src: &N) -> Self::Format {
                let root = math::sqrt_rto(&RFloat::from_number(src), src.p().max(53) + 8);
                self.round(&root)
            }
        }
    };
}

impl_rounded_for_ctx!(crate::cfloat::CFloatContext);
impl_rounded_for_ctx!(crate::posit::PositContext);
impl_rounded_for_ctx!(crate::takum::TakumContext);
impl_rounded_for_ctx!(crate::lns::LnsContext);
impl_rounded_for_ctx!(crate::rfloat::RFloatContext);
