//! Forward-mode automatic differentiation with a choice of evaluation
//! strategy.
//!
//! This crate computes exact first-order partial derivatives of
//! multivariate scalar functions alongside their values. Each
//! elementary operation propagates a value and a fixed-length
//! derivative vector; the chain rule emerges from composition, with no
//! symbolic manipulation and no finite-difference error. The number of
//! independent variables is a const generic parameter, so mixing
//! dimensions is a compile-time error.
//!
//! Two models cover the same arithmetic:
//!
//! - **Eager** ([`Dual`]): every operator returns a fully materialized
//!   `(value, [T; N])` pair. Simple and direct; a chain of K operators
//!   fills K derivative arrays.
//! - **Lazy** ([`expr`]): operators build a tree of typed, stack-held
//!   nodes that borrow their leaves; value and derivatives are computed
//!   only when the tree is bound to a [`Dual`], paying the O(N) cost
//!   exactly once per bound result.
//!
//! # Eager
//!
//! ```
//! use dualexpr::Dual;
//!
//! // f(x, y) = x·exp(y) at (2, 0)
//! let x = Dual::<f64, 2>::variable(2.0, 0);
//! let y = Dual::<f64, 2>::variable(0.0, 1);
//!
//! let f = x * y.exp();
//!
//! assert_eq!(f.value, 2.0);
//! assert_eq!(f.derivs[0], 1.0); // exp(y)
//! assert_eq!(f.derivs[1], 2.0); // x·exp(y)
//! ```
//!
//! # Lazy
//!
//! ```
//! use dualexpr::Dual;
//!
//! let x = Dual::<f64, 2>::variable(2.0, 0);
//! let y = Dual::<f64, 2>::variable(0.0, 1);
//!
//! // No derivative array exists until `eval`.
//! let f: Dual<f64, 2> = (x.expr() * y.expr().exp()).eval();
//!
//! assert_eq!(f.value, 2.0);
//! assert_eq!(f.derivs, [1.0, 2.0]);
//! ```
//!
//! # Gradients in one call
//!
//! ```
//! use dualexpr::{gradient, Dual};
//!
//! // f(x, y) = x² + y² at (3, 4)
//! let (value, grad) = gradient(
//!     |[x, y]: [Dual<f64, 2>; 2]| x * x + y * y,
//!     [3.0, 4.0],
//! );
//!
//! assert_eq!(value, 25.0);
//! assert_eq!(grad, [6.0, 8.0]);
//! ```

pub mod dual;
pub mod error;
pub mod expr;

pub use dual::{gradient, Dual};
pub use error::{Error, Result};
pub use expr::{constant, Eval, Expr};
