/*!
Multi-component floating-point cascades.

A [`FloatCascade<N>`] represents a real number as the exact sum of `N`
non-overlapping `f64` limbs ordered by decreasing magnitude, giving
`N * 53` bits of significand with the exponent range of a native
double. The classic configurations have aliases: [`DoubleDouble`]
(`N = 2`), [`TripleDouble`] (`N = 3`), and [`QuadDouble`] (`N = 4`).

Arithmetic runs entirely through the error-free transformations in
[`eft`][crate::eft]: addition merges the operand expansions with a
linear expansion sum and compresses back to `N` limbs with the proven
accumulation schedule; multiplication partitions the `N x N` product
matrix by diagonals; division and square root refine with Newton
iterations.

The non-overlap invariant `|x[i+1]| <= ulp(x[i]) / 2` is checked after
every public operation in debug builds.
*/

mod number;
mod ops;

pub use number::FloatCascade;

/// Double-double: two-limb cascade, ~106 significand bits.
pub type DoubleDouble = FloatCascade<2>;

/// Triple-double: three-limb cascade, ~159 significand bits.
pub type TripleDouble = FloatCascade<3>;

/// Quad-double: four-limb cascade, ~212 significand bits.
pub type QuadDouble = FloatCascade<4>;
