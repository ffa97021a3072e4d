/*!
`uninum` is a universal numbers library: arithmetic engines for a family
of non-standard floating-point number systems whose value is bit-exact
representational fidelity and error-free transformations. Unlike
arbitrary-precision libraries such as
[Rug](https://docs.rs/rug/latest/rug/) (MPFR), this library emphasizes
a clean abstraction of computer number systems and exact control over
their encodings and rounding behavior.

This is the API documentation.

The library defines a universal trait for all number types [`Real`],
and a universal trait for "rounding contexts" [`RoundingContext`].
Supported number systems include
  multi-component floating-point cascades
  [`FloatCascade`][crate::cascade::FloatCascade] (double-double,
  triple-double, quad-double),
  adaptive-precision expansions [`EReal`][crate::ereal::EReal],
  classic parameterized floating-point [`CFloat`][crate::cfloat::CFloat],
  tapered posits [`Posit`][crate::posit::Posit],
  logarithmic numbers [`Lns`][crate::lns::Lns],
  and takums [`Takum`][crate::takum::Takum].

Every bounded format decodes into one of two exact intermediates:
the [`BlockTriple`][crate::triple::BlockTriple] fixed-point triple
(the funnel for `CFloat` arithmetic) or the floating-point cascade
(the funnel for dd/td/qd). The [`RFloat`][crate::rfloat::RFloat] type
is the unbounded interchange format between all of them. Exact dot
products are supported through the [`Quire`][crate::quire::Quire]
wide accumulator.
*/

pub mod bitblock;
pub mod cascade;
pub mod cfloat;
pub mod decimal;
pub mod eft;
pub mod ereal;
pub mod error;
pub mod lns;
pub mod math;
pub mod native;
pub mod ops;
pub mod posit;
pub mod quire;
pub mod real;
pub mod rfloat;
pub mod round;
pub mod takum;
pub mod triple;

mod split;
mod util;

pub use crate::error::{ArithError, ParseError};
pub use crate::native::FloatClass;
pub use crate::real::{FormatTag, Real};
pub use crate::round::RoundingContext;
pub use crate::round::RoundingMode;
pub(crate) use crate::split::Split;
