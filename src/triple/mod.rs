/*!
The blocktriple intermediate representation.

A [`BlockTriple`] is a `(sign, scale, significand)` triple with a
fixed-point [`BitBlock`][crate::bitblock::BitBlock] significand,
tagged with the operation it feeds ([`TripleOp`]). The tag fixes the
radix-point convention of the working layout:

 - `Add`: `0ii.fffff` — two integer bits (carry and hidden) above the
   target fraction, three guard positions below for alignment sticky.
 - `Mul`: `ii.fffff` — two integer bits above a full product fraction
   of `2 * fbits` bits.
 - `Div`: a quotient with four guard bits, enough for faithful
   rounding.

Triples are created by decoding an encoded value
(see [`CFloatContext::decode`][crate::cfloat::CFloatContext::decode])
or by one of the operators here, and consumed by the rounding funnel
(see [`CFloatContext::round_triple`][crate::cfloat::CFloatContext::round_triple]).
*/

mod number;
mod ops;

pub use number::{BlockTriple, TripleClass, TripleOp};
