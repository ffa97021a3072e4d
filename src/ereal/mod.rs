/*!
Adaptive-precision multi-component expansions.

An [`EReal`] stores a value as a variable-length vector of
non-overlapping `f64` limbs (Shewchuk's expansion arithmetic). The
length grows as operations demand, up to a configurable bound, and
shrinks through renormalization when limbs cancel to zero.

Unlike the fixed-width cascades in [`cascade`][crate::cascade],
addition and subtraction here use the linear expansion sum directly
without compression, so results stay exact until the limb bound
truncates them. The limb bound may not exceed 19: past that the
smallest correction terms underflow below the normal range and the
expansion algebra silently breaks (see [`eft`][crate::eft]).
*/

mod number;
mod ops;

pub use number::EReal;
