/*!
Error taxonomy of the arithmetic core.

Every arithmetic type in this crate operates in one of two signaling
modes. In the default _silent_ mode, invalid operations propagate
through encoded special values (NaN, infinity, NaR) so that chained
expressions compose. The _throwing_ mode is opt-in per operation via
`checked_*` methods that return `Result<_, ArithError>` instead.
*/

use thiserror::Error;

/// Errors raised by checked arithmetic operations.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ArithError {
    /// Division of a non-zero value by zero.
    #[error("division by zero")]
    DivideByZero,

    /// An operation with no useful definable result,
    /// such as `0/0`, `Inf - Inf`, or `sqrt(-x)` with `x > 0`.
    #[error("invalid operation: {0}")]
    InvalidOperation(&'static str),

    /// A quire insertion above the accumulator's dynamic range.
    #[error("operand too large for quire")]
    OperandTooLarge,

    /// A quire insertion below the accumulator's dynamic range.
    #[error("operand too small for quire")]
    OperandTooSmall,

    /// A decimal string could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A format configuration with no valid value range.
    #[error("invalid configuration: {0}")]
    Configuration(String),
}

/// The kinds of failure [`ParseError`] can report.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// The input string was empty (or all whitespace).
    Empty,
    /// A character outside `[sign] digits [.digits] [eE [sign] digits]`.
    BadChar,
    /// No digits in the mantissa.
    MissingDigits,
    /// No digits after the exponent marker.
    MissingExponent,
    /// The decimal exponent does not fit the implementation range.
    ExponentOverflow,
}

/// Error produced when parsing a decimal string fails.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("parse error at byte {at}: {kind:?}")]
pub struct ParseError {
    /// What went wrong.
    pub kind: ParseErrorKind,
    /// Byte offset of the offending character.
    pub at: usize,
}

impl ParseError {
    pub(crate) fn new(kind: ParseErrorKind, at: usize) -> Self {
        Self { kind, at }
    }
}
