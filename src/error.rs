//! Error types for dualexpr.
//!
//! By default the crate follows IEEE floating-point semantics: `ln` of a
//! negative number quietly produces NaN and propagates through the rest
//! of the computation. The `try_*` variants on [`Dual`](crate::Dual) opt
//! into strict checking and report these cases as errors instead.
//!
//! Dimension mismatches have no error variant at all: the number of
//! independent variables `N` is a const generic parameter, so combining
//! duals of different dimension is rejected by the compiler.

use thiserror::Error;

/// Result type alias using dualexpr's [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors reported by checked accessors and strict-domain operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// A derivative index at or past the number of independent variables.
    #[error("derivative index {index} out of range for {n} independent variables")]
    IndexOutOfRange {
        /// The requested index
        index: usize,
        /// The number of independent variables
        n: usize,
    },

    /// Logarithm of a non-positive value.
    #[error("logarithm of a non-positive value")]
    LogDomain,

    /// Square root of a negative value.
    #[error("square root of a negative value")]
    SqrtDomain,

    /// Power of a non-positive base with a non-constant exponent.
    ///
    /// The general power rule contains a `ln(base)` term, so it is only
    /// defined for positive bases. A constant exponent (all derivative
    /// components zero) never triggers this: its logarithm term is
    /// skipped entirely.
    #[error("power of a non-positive base with a non-constant exponent")]
    PowDomain,
}
