//! Lazy expression trees for forward-mode automatic differentiation.
//!
//! Every operator in the eager model ([`Dual`]) materializes a fresh
//! derivative array, so a chain of K operators costs O(K·N). The types
//! in this module defer all of that work instead: combining expressions
//! builds a tree of small typed nodes on the stack, each holding its
//! operands by value and borrowing the dual numbers at the leaves.
//! Nothing is evaluated and no array is filled until the tree is bound
//! to a concrete [`Dual`] — at which point `value()` runs once and
//! `deriv(i)` runs once per index, paying the O(N) cost a single time.
//!
//! # Example
//!
//! ```
//! use dualexpr::Dual;
//!
//! let x = Dual::<f64, 2>::variable(3.0, 0);
//! let y = Dual::<f64, 2>::variable(4.0, 1);
//!
//! // Builds a tree of typed nodes; allocates no derivative array.
//! let tree = x.expr() * y.expr() + x.expr();
//!
//! // Materialization: value once, each derivative once.
//! let f: Dual<f64, 2> = tree.eval();
//!
//! assert_eq!(f.value, 15.0);
//! assert_eq!(f.derivs, [5.0, 3.0]); // [y + 1, x]
//! ```
//!
//! # Evaluation cost
//!
//! Nodes are pure: `value()` and `deriv(i)` recompute from their
//! operands on every call, with no caching. A product's derivative
//! needs both operands' values, so a subtree sitting under a [`Mul`] or
//! [`Div`] node has its value recomputed for each of the N derivative
//! queries of one materialization. For deep trees over many variables
//! this is the price of zero-allocation composition. Wrapping a subtree
//! in [`Expr::cache_value`] memoizes its value for the lifetime of the
//! tree (i.e. for the single pass it participates in) and restores
//! linear cost where it matters.
//!
//! # Leaf lifetimes
//!
//! A [`Leaf`] borrows the dual it wraps, and every composite node owns
//! its operands, so a tree holds shared borrows of all its leaves for
//! as long as it lives. Storing a tree past a mutation of one of its
//! leaves is rejected at compile time:
//!
//! ```compile_fail
//! use dualexpr::Dual;
//!
//! let mut x = Dual::<f64, 1>::variable(2.0, 0);
//! let tree = x.expr() * x.expr();
//! x.seed(0); // error: cannot mutate `x` while `tree` borrows it
//! let _ = tree.eval::<f64, 1>();
//! ```

use std::array;
use std::cell::Cell;
use std::ops;

use num_traits::{Float, Zero};

use crate::dual::Dual;

/// The evaluation contract every expression node satisfies.
///
/// `value()` returns the node's scalar value; `deriv(index)` returns
/// its partial derivative with respect to independent variable
/// `index`. Both are pure functions of the node's operands: calling
/// them any number of times, in any order, gives the same results.
pub trait Eval<T, const N: usize> {
    /// The scalar value of this (sub)expression.
    fn value(&self) -> T;

    /// The partial derivative with respect to variable `index`.
    ///
    /// Indices at or past N read as zero for constants and panic for
    /// leaves; [`Expr::eval`] only ever asks for indices in [0, N).
    fn deriv(&self, index: usize) -> T;
}

/// A literal wrapped into an expression without promoting it to a full
/// dual number. Its derivative is zero everywhere.
#[derive(Debug, Clone, Copy)]
pub struct Constant<T>(T);

impl<T, const N: usize> Eval<T, N> for Constant<T>
where
    T: Zero + Copy,
{
    fn value(&self) -> T {
        self.0
    }

    fn deriv(&self, _index: usize) -> T {
        T::zero()
    }
}

/// A borrowed [`Dual`] at the bottom of an expression tree.
#[derive(Debug, Clone, Copy)]
pub struct Leaf<'a, T, const N: usize>(&'a Dual<T, N>);

impl<T, const N: usize> Eval<T, N> for Leaf<'_, T, N>
where
    T: Copy,
{
    fn value(&self) -> T {
        self.0.value
    }

    fn deriv(&self, index: usize) -> T {
        self.0.derivs[index]
    }
}

/// Sum node: derivatives add component-wise.
#[derive(Debug, Clone, Copy)]
pub struct Add<L, R> {
    l: L,
    r: R,
}

impl<T, const N: usize, L, R> Eval<T, N> for Add<L, R>
where
    T: ops::Add<Output = T>,
    L: Eval<T, N>,
    R: Eval<T, N>,
{
    fn value(&self) -> T {
        self.l.value() + self.r.value()
    }

    fn deriv(&self, index: usize) -> T {
        self.l.deriv(index) + self.r.deriv(index)
    }
}

/// Difference node: derivatives subtract component-wise.
#[derive(Debug, Clone, Copy)]
pub struct Sub<L, R> {
    l: L,
    r: R,
}

impl<T, const N: usize, L, R> Eval<T, N> for Sub<L, R>
where
    T: ops::Sub<Output = T>,
    L: Eval<T, N>,
    R: Eval<T, N>,
{
    fn value(&self) -> T {
        self.l.value() - self.r.value()
    }

    fn deriv(&self, index: usize) -> T {
        self.l.deriv(index) - self.r.deriv(index)
    }
}

/// Product node, applying the product rule on demand.
#[derive(Debug, Clone, Copy)]
pub struct Mul<L, R> {
    l: L,
    r: R,
}

impl<T, const N: usize, L, R> Eval<T, N> for Mul<L, R>
where
    T: ops::Mul<Output = T> + ops::Add<Output = T>,
    L: Eval<T, N>,
    R: Eval<T, N>,
{
    fn value(&self) -> T {
        self.l.value() * self.r.value()
    }

    fn deriv(&self, index: usize) -> T {
        // Both operand values are recomputed here for every index; see
        // the module docs and `Expr::cache_value`.
        self.l.deriv(index) * self.r.value() + self.l.value() * self.r.deriv(index)
    }
}

/// Quotient node, applying the quotient rule on demand.
#[derive(Debug, Clone, Copy)]
pub struct Div<L, R> {
    l: L,
    r: R,
}

impl<T, const N: usize, L, R> Eval<T, N> for Div<L, R>
where
    T: Float,
    L: Eval<T, N>,
    R: Eval<T, N>,
{
    fn value(&self) -> T {
        self.l.value() / self.r.value()
    }

    fn deriv(&self, index: usize) -> T {
        let rv = self.r.value();
        (self.l.deriv(index) * rv - self.l.value() * self.r.deriv(index)) / (rv * rv)
    }
}

/// Negation node.
#[derive(Debug, Clone, Copy)]
pub struct Neg<E> {
    arg: E,
}

impl<T, const N: usize, E> Eval<T, N> for Neg<E>
where
    T: ops::Neg<Output = T>,
    E: Eval<T, N>,
{
    fn value(&self) -> T {
        -self.arg.value()
    }

    fn deriv(&self, index: usize) -> T {
        -self.arg.deriv(index)
    }
}

/// Exponential node: `d/dxᵢ(exp(u)) = u′ᵢ · exp(u)`.
#[derive(Debug, Clone, Copy)]
pub struct Exp<E> {
    arg: E,
}

impl<T, const N: usize, E> Eval<T, N> for Exp<E>
where
    T: Float,
    E: Eval<T, N>,
{
    fn value(&self) -> T {
        self.arg.value().exp()
    }

    fn deriv(&self, index: usize) -> T {
        self.arg.deriv(index) * self.arg.value().exp()
    }
}

/// Natural-logarithm node: `d/dxᵢ(ln(u)) = u′ᵢ / u`.
///
/// For a non-positive argument this follows IEEE semantics (NaN/-∞).
#[derive(Debug, Clone, Copy)]
pub struct Ln<E> {
    arg: E,
}

impl<T, const N: usize, E> Eval<T, N> for Ln<E>
where
    T: Float,
    E: Eval<T, N>,
{
    fn value(&self) -> T {
        self.arg.value().ln()
    }

    fn deriv(&self, index: usize) -> T {
        self.arg.deriv(index) / self.arg.value()
    }
}

/// Power node: `d/dxᵢ(u^v) = v′ᵢ·ln(u)·u^v + v·u′ᵢ·u^(v-1)`.
///
/// The `ln(u)` term is only evaluated for indices where the exponent's
/// derivative is nonzero, so a constant exponent never requires a
/// positive base.
#[derive(Debug, Clone, Copy)]
pub struct Pow<L, R> {
    base: L,
    exponent: R,
}

impl<T, const N: usize, L, R> Eval<T, N> for Pow<L, R>
where
    T: Float,
    L: Eval<T, N>,
    R: Eval<T, N>,
{
    fn value(&self) -> T {
        self.base.value().powf(self.exponent.value())
    }

    fn deriv(&self, index: usize) -> T {
        let base = self.base.value();
        let exponent = self.exponent.value();
        let d = exponent * self.base.deriv(index) * base.powf(exponent - T::one());

        let exponent_deriv = self.exponent.deriv(index);
        if exponent_deriv.is_zero() {
            d
        } else {
            d + exponent_deriv * base.ln() * base.powf(exponent)
        }
    }
}

/// A node that memoizes its value for the lifetime of the tree.
///
/// The first `value()` call evaluates the inner subtree and stores the
/// result; later calls — in particular the ones issued by the product
/// and quotient rules during the N derivative queries of one
/// materialization — reuse it. Derivative queries are not cached.
///
/// The cache cannot go stale: the tree borrows its leaves, so no leaf
/// can be mutated while this node is alive.
#[derive(Debug, Clone)]
pub struct Cached<E, T: Copy> {
    inner: E,
    value: Cell<Option<T>>,
}

impl<T, const N: usize, E> Eval<T, N> for Cached<E, T>
where
    T: Copy,
    E: Eval<T, N>,
{
    fn value(&self) -> T {
        if let Some(v) = self.value.get() {
            return v;
        }
        let v = self.inner.value();
        self.value.set(Some(v));
        v
    }

    fn deriv(&self, index: usize) -> T {
        self.inner.deriv(index)
    }
}

/// An expression under construction.
///
/// `Expr` is a thin wrapper that scopes the operator overloads: only
/// values explicitly lifted into an expression — via [`Dual::expr`],
/// [`constant`], or a mixed operand — participate in lazy composition,
/// so the lazy operators never shadow ordinary float arithmetic.
///
/// Combining two `Expr`s moves both operand trees into a new node;
/// nothing is evaluated and nothing is allocated on the heap.
#[derive(Debug, Clone, Copy)]
pub struct Expr<E>(E);

/// Lift a literal into an expression.
///
/// # Examples
///
/// ```
/// use dualexpr::{constant, Dual};
///
/// let x = Dual::<f64, 1>::variable(3.0, 0);
/// let f: Dual<f64, 1> = (x.expr() * constant(2.0)).eval();
///
/// assert_eq!(f.value, 6.0);
/// assert_eq!(f.derivs, [2.0]);
/// ```
pub fn constant<T>(value: T) -> Expr<Constant<T>> {
    Expr(Constant(value))
}

impl<E> Expr<E> {
    /// Evaluate the tree's value, recursively and without caching.
    pub fn value<T, const N: usize>(&self) -> T
    where
        E: Eval<T, N>,
    {
        self.0.value()
    }

    /// Evaluate one partial derivative, recursively and without caching.
    pub fn deriv<T, const N: usize>(&self, index: usize) -> T
    where
        E: Eval<T, N>,
    {
        self.0.deriv(index)
    }

    /// Materialize the tree into a concrete [`Dual`].
    ///
    /// This is the single point where the O(N) storage cost is paid:
    /// `value()` is evaluated once and `deriv(i)` once for each i in
    /// [0, N).
    ///
    /// # Examples
    ///
    /// ```
    /// use dualexpr::Dual;
    ///
    /// let a = Dual::<f64, 2>::variable(2.0, 0);
    /// let b = Dual::<f64, 2>::variable(3.0, 1);
    ///
    /// let f: Dual<f64, 2> = (a.expr() * b.expr()).eval();
    /// assert_eq!(f.value, 6.0);
    /// assert_eq!(f.derivs, [3.0, 2.0]);
    /// ```
    pub fn eval<T, const N: usize>(&self) -> Dual<T, N>
    where
        E: Eval<T, N>,
        T: Copy,
    {
        Dual::new(self.0.value(), array::from_fn(|i| self.0.deriv(i)))
    }

    /// Exponential of this expression.
    pub fn exp(self) -> Expr<Exp<E>> {
        Expr(Exp { arg: self.0 })
    }

    /// Natural logarithm of this expression.
    pub fn ln(self) -> Expr<Ln<E>> {
        Expr(Ln { arg: self.0 })
    }

    /// This expression raised to an expression power.
    pub fn pow<R>(self, exponent: Expr<R>) -> Expr<Pow<E, R>> {
        Expr(Pow {
            base: self.0,
            exponent: exponent.0,
        })
    }

    /// This expression raised to a constant power.
    ///
    /// The exponent's derivative is identically zero, so the logarithm
    /// term of the power rule is skipped and negative bases stay finite.
    ///
    /// # Examples
    ///
    /// ```
    /// use dualexpr::Dual;
    ///
    /// let x = Dual::<f64, 1>::variable(-2.0, 0);
    /// let f: Dual<f64, 1> = x.expr().powf(2.0).eval();
    ///
    /// assert_eq!(f.value, 4.0);
    /// assert_eq!(f.derivs, [-4.0]);
    /// ```
    pub fn powf<T>(self, exponent: T) -> Expr<Pow<E, Constant<T>>> {
        Expr(Pow {
            base: self.0,
            exponent: Constant(exponent),
        })
    }

    /// Memoize this subtree's value for the lifetime of the tree.
    ///
    /// Useful under a product or quotient, whose derivative rule
    /// re-reads operand values for every index; see the module docs.
    ///
    /// # Examples
    ///
    /// ```
    /// use dualexpr::Dual;
    ///
    /// let x = Dual::<f64, 3>::variable(1.5, 0);
    /// let y = Dual::<f64, 3>::variable(2.5, 1);
    ///
    /// // (x·y) sits under another product: cache its value so the three
    /// // derivative queries don't each re-multiply it.
    /// let shared = (x.expr() * y.expr()).cache_value();
    /// let f: Dual<f64, 3> = (shared * y.expr()).eval();
    ///
    /// assert_eq!(f.value, 1.5 * 2.5 * 2.5);
    /// ```
    pub fn cache_value<T: Copy>(self) -> Expr<Cached<E, T>> {
        Expr(Cached {
            inner: self.0,
            value: Cell::new(None),
        })
    }
}

impl<T, const N: usize> Dual<T, N> {
    /// Lift this dual into a lazy expression leaf, borrowing it.
    ///
    /// The resulting tree is valid only while `self` is alive and not
    /// mutably borrowed; the compiler enforces both.
    ///
    /// # Examples
    ///
    /// ```
    /// use dualexpr::Dual;
    ///
    /// let x = Dual::<f64, 2>::variable(3.0, 0);
    /// let y = Dual::<f64, 2>::variable(4.0, 1);
    ///
    /// let f: Dual<f64, 2> = (x.expr() + y.expr()).eval();
    /// assert_eq!(f.value, 7.0);
    /// assert_eq!(f.derivs, [1.0, 1.0]);
    /// ```
    pub fn expr(&self) -> Expr<Leaf<'_, T, N>> {
        Expr(Leaf(self))
    }
}

impl<T, const N: usize> Dual<T, N>
where
    T: Copy,
{
    /// Overwrite this dual with the materialized result of a tree.
    ///
    /// Equivalent to `*self = tree.eval()` without the intermediate.
    /// A tree that borrows `self` among its leaves cannot be assigned
    /// back into it — the compiler rejects the aliasing — so the result
    /// can never observe a half-updated leaf.
    ///
    /// # Examples
    ///
    /// ```
    /// use dualexpr::Dual;
    ///
    /// let x = Dual::<f64, 2>::variable(3.0, 0);
    /// let y = Dual::<f64, 2>::variable(4.0, 1);
    /// let mut out = Dual::constant(0.0);
    ///
    /// out.assign(x.expr() * y.expr());
    /// assert_eq!(out.value, 12.0);
    /// assert_eq!(out.derivs, [4.0, 3.0]);
    /// ```
    pub fn assign<E>(&mut self, tree: Expr<E>)
    where
        E: Eval<T, N>,
    {
        self.value = tree.0.value();
        for (i, deriv) in self.derivs.iter_mut().enumerate() {
            *deriv = tree.0.deriv(i);
        }
    }
}

/// Materialization via `From`/`Into`.
impl<T, const N: usize, E> From<Expr<E>> for Dual<T, N>
where
    T: Copy,
    E: Eval<T, N>,
{
    fn from(tree: Expr<E>) -> Self {
        tree.eval()
    }
}

/// Binary operators over expression trees.
///
/// Three operand shapes per operator: `Expr ⊕ Expr`, `Expr ⊕ &Dual`,
/// and `&Dual ⊕ Expr`. Each constructs a node by value; no evaluation
/// happens.
macro_rules! impl_expr_binary_op {
    ($op:ident, $method:ident, $node:ident) => {
        impl<L, R> ops::$op<Expr<R>> for Expr<L> {
            type Output = Expr<$node<L, R>>;

            fn $method(self, rhs: Expr<R>) -> Self::Output {
                Expr($node {
                    l: self.0,
                    r: rhs.0,
                })
            }
        }

        impl<'a, T, const N: usize, E> ops::$op<&'a Dual<T, N>> for Expr<E> {
            type Output = Expr<$node<E, Leaf<'a, T, N>>>;

            fn $method(self, rhs: &'a Dual<T, N>) -> Self::Output {
                Expr($node {
                    l: self.0,
                    r: Leaf(rhs),
                })
            }
        }

        impl<'a, T, const N: usize, E> ops::$op<Expr<E>> for &'a Dual<T, N> {
            type Output = Expr<$node<Leaf<'a, T, N>, E>>;

            fn $method(self, rhs: Expr<E>) -> Self::Output {
                Expr($node {
                    l: Leaf(self),
                    r: rhs.0,
                })
            }
        }
    };
}

impl_expr_binary_op!(Add, add, Add);
impl_expr_binary_op!(Sub, sub, Sub);
impl_expr_binary_op!(Mul, mul, Mul);
impl_expr_binary_op!(Div, div, Div);

impl<E> ops::Neg for Expr<E> {
    type Output = Expr<Neg<E>>;

    fn neg(self) -> Self::Output {
        Expr(Neg { arg: self.0 })
    }
}

/// Scalar operands on either side, for the primitive float types. The
/// scalar is wrapped in a [`Constant`] node rather than promoted to a
/// dual.
macro_rules! impl_expr_scalar_ops {
    ($($t:ty),*) => {$(
        impl<E> ops::Add<$t> for Expr<E> {
            type Output = Expr<Add<E, Constant<$t>>>;

            fn add(self, rhs: $t) -> Self::Output {
                Expr(Add { l: self.0, r: Constant(rhs) })
            }
        }

        impl<E> ops::Add<Expr<E>> for $t {
            type Output = Expr<Add<Constant<$t>, E>>;

            fn add(self, rhs: Expr<E>) -> Self::Output {
                Expr(Add { l: Constant(self), r: rhs.0 })
            }
        }

        impl<E> ops::Sub<$t> for Expr<E> {
            type Output = Expr<Sub<E, Constant<$t>>>;

            fn sub(self, rhs: $t) -> Self::Output {
                Expr(Sub { l: self.0, r: Constant(rhs) })
            }
        }

        impl<E> ops::Sub<Expr<E>> for $t {
            type Output = Expr<Sub<Constant<$t>, E>>;

            fn sub(self, rhs: Expr<E>) -> Self::Output {
                Expr(Sub { l: Constant(self), r: rhs.0 })
            }
        }

        impl<E> ops::Mul<$t> for Expr<E> {
            type Output = Expr<Mul<E, Constant<$t>>>;

            fn mul(self, rhs: $t) -> Self::Output {
                Expr(Mul { l: self.0, r: Constant(rhs) })
            }
        }

        impl<E> ops::Mul<Expr<E>> for $t {
            type Output = Expr<Mul<Constant<$t>, E>>;

            fn mul(self, rhs: Expr<E>) -> Self::Output {
                Expr(Mul { l: Constant(self), r: rhs.0 })
            }
        }

        impl<E> ops::Div<$t> for Expr<E> {
            type Output = Expr<Div<E, Constant<$t>>>;

            fn div(self, rhs: $t) -> Self::Output {
                Expr(Div { l: self.0, r: Constant(rhs) })
            }
        }

        impl<E> ops::Div<Expr<E>> for $t {
            type Output = Expr<Div<Constant<$t>, E>>;

            fn div(self, rhs: Expr<E>) -> Self::Output {
                Expr(Div { l: Constant(self), r: rhs.0 })
            }
        }
    )*};
}

impl_expr_scalar_ops!(f32, f64);

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    type D3 = Dual<f64, 3>;

    #[test]
    fn leaf_delegates_to_dual() {
        let x = D3::variable(3.0, 0);
        let tree = x.expr();

        assert_eq!(tree.value::<f64, 3>(), 3.0);
        assert_eq!(tree.deriv::<f64, 3>(0), 1.0);
        assert_eq!(tree.deriv::<f64, 3>(2), 0.0);
    }

    #[test]
    fn materialization_of_product() {
        // x seeded as the only variable, y left constant
        let mut x = Dual::<f64, 1>::constant(123.0);
        let y = Dual::<f64, 1>::constant(42.0);
        x.seed(0);

        let f: Dual<f64, 1> = (x.expr() * y.expr()).eval();

        assert_eq!(f.value, 5166.0);
        assert_eq!(f.derivs, [42.0]); // ∂(xy)/∂x = y
    }

    #[test]
    fn lazy_matches_eager() {
        let a = D3::variable(1.0, 0);
        let b = D3::variable(2.0, 1);
        let c = D3::variable(3.0, 2);

        let eager = a * b + b * c.exp() - a / c;
        let lazy: D3 = (a.expr() * b.expr() + b.expr() * c.expr().exp() - a.expr() / c.expr())
            .eval();

        assert_relative_eq!(lazy.value, eager.value, max_relative = 1e-12);
        for i in 0..3 {
            assert_relative_eq!(lazy.derivs[i], eager.derivs[i], max_relative = 1e-12);
        }
    }

    #[test]
    fn evaluation_is_repeatable() {
        let a = Dual::<f64, 2>::variable(2.0, 0);
        let b = Dual::<f64, 2>::variable(5.0, 1);
        let tree = a.expr() * b.expr() + a.expr();

        let first: Dual<f64, 2> = tree.eval();
        let second: Dual<f64, 2> = tree.eval();
        assert_eq!(first, second);
    }

    #[test]
    fn sum_and_negation_scenario() {
        let a = D3::variable(1.0, 0);
        let b = D3::variable(2.0, 1);
        let c = D3::variable(3.0, 2);

        let f: D3 = (a.expr() + b.expr() + c.expr()).eval();
        assert_eq!(f.value, 6.0);
        assert_eq!(f.derivs, [1.0, 1.0, 1.0]);

        let g: D3 = (-(a.expr() + b.expr() + c.expr())).eval();
        assert_eq!(g.value, -6.0);
        assert_eq!(g.derivs, [-1.0, -1.0, -1.0]);
    }

    #[test]
    fn quotient_scenario() {
        let a = D3::variable(1.0, 0);
        let c = D3::variable(3.0, 2);

        let h: D3 = (a.expr() / c.expr()).eval();
        assert_relative_eq!(h.value, 1.0 / 3.0, max_relative = 1e-12);
        assert_relative_eq!(h.derivs[0], 1.0 / 3.0, max_relative = 1e-12);
        assert_eq!(h.derivs[1], 0.0);
        assert_relative_eq!(h.derivs[2], -1.0 / 9.0, max_relative = 1e-12);
    }

    #[test]
    fn chain_rule_through_exp_node() {
        let b = D3::variable(2.0, 1);
        let c = D3::variable(3.0, 2);

        let f: D3 = (b.expr() * c.expr().exp()).eval();

        let e3 = 3.0_f64.exp();
        assert_relative_eq!(f.value, 2.0 * e3, max_relative = 1e-12);
        assert_eq!(f.derivs[0], 0.0);
        assert_relative_eq!(f.derivs[1], e3, max_relative = 1e-12);
        assert_relative_eq!(f.derivs[2], 2.0 * e3, max_relative = 1e-12);
    }

    #[test]
    fn ln_node_derivative() {
        let x = Dual::<f64, 2>::variable(2.0, 0);
        let y = Dual::<f64, 2>::variable(3.0, 1);

        let f: Dual<f64, 2> = (x.expr() * y.expr()).ln().eval();

        assert_relative_eq!(f.value, 6.0_f64.ln(), max_relative = 1e-12);
        assert_relative_eq!(f.derivs[0], 0.5, max_relative = 1e-12); // 1/x
        assert_relative_eq!(f.derivs[1], 1.0 / 3.0, max_relative = 1e-12); // 1/y
    }

    #[test]
    fn pow_node_with_variable_exponent() {
        let x = Dual::<f64, 2>::variable(2.0, 0);
        let y = Dual::<f64, 2>::variable(3.0, 1);

        let f: Dual<f64, 2> = x.expr().pow(y.expr()).eval();

        assert_eq!(f.value, 8.0);
        assert_eq!(f.derivs[0], 12.0); // y·x^(y-1)
        assert_relative_eq!(f.derivs[1], 2.0_f64.ln() * 8.0, max_relative = 1e-12);
    }

    #[test]
    fn pow_node_constant_exponent_allows_negative_base() {
        let x = Dual::<f64, 1>::variable(-2.0, 0);

        let square: Dual<f64, 1> = x.expr().powf(2.0).eval();
        assert_eq!(square.value, 4.0);
        assert_eq!(square.derivs, [-4.0]);

        let cube: Dual<f64, 1> = x.expr().pow(constant(3.0)).eval();
        assert_eq!(cube.value, -8.0);
        assert_eq!(cube.derivs, [12.0]);
    }

    #[test]
    fn scalar_operands_wrap_constants() {
        let a = D3::variable(1.0, 0);
        let b = D3::variable(2.0, 1);
        let c = D3::variable(3.0, 2);

        // j = 2·(a + b - c)/4
        let j: D3 = (2.0_f64 * (a.expr() + b.expr() - c.expr()) / 4.0_f64).eval();
        assert_eq!(j.value, 0.0);
        assert_eq!(j.derivs, [0.5, 0.5, -0.5]);

        let k: D3 = (1.0_f64 / c.expr()).eval();
        assert_relative_eq!(k.value, 1.0 / 3.0, max_relative = 1e-12);
        assert_relative_eq!(k.derivs[2], -1.0 / 9.0, max_relative = 1e-12);
    }

    #[test]
    fn mixed_dual_operands() {
        let x = Dual::<f64, 2>::variable(3.0, 0);
        let y = Dual::<f64, 2>::variable(4.0, 1);

        let left: Dual<f64, 2> = (x.expr() * &y).eval();
        let right: Dual<f64, 2> = (&x * y.expr()).eval();

        assert_eq!(left, x * y);
        assert_eq!(right, x * y);
    }

    #[test]
    fn materialize_via_from() {
        let x = Dual::<f64, 2>::variable(3.0, 0);
        let f = Dual::from(x.expr() + 1.0);

        assert_eq!(f.value, 4.0);
        assert_eq!(f.derivs, [1.0, 0.0]);
    }

    #[test]
    fn assign_overwrites_target() {
        let x = Dual::<f64, 2>::variable(3.0, 0);
        let y = Dual::<f64, 2>::variable(4.0, 1);
        let mut out = Dual::new(9.9, [9.9, 9.9]);

        out.assign(x.expr() * y.expr() + x.expr());

        assert_eq!(out.value, 15.0);
        assert_eq!(out.derivs, [5.0, 3.0]);
    }

    #[test]
    fn cached_subtree_matches_uncached() {
        let a = D3::variable(1.5, 0);
        let b = D3::variable(2.5, 1);
        let c = D3::variable(3.5, 2);

        let plain: D3 = ((a.expr() * b.expr()) * c.expr().exp()).eval();
        let cached: D3 = ((a.expr() * b.expr()).cache_value() * c.expr().exp().cache_value())
            .eval();

        assert_relative_eq!(cached.value, plain.value, max_relative = 1e-12);
        for i in 0..3 {
            assert_relative_eq!(cached.derivs[i], plain.derivs[i], max_relative = 1e-12);
        }
    }

    #[test]
    fn composite_matches_gradient_helper() {
        use crate::dual::gradient;

        let f = |vars: [Dual<f64, 2>; 2]| {
            let [x, y] = vars;
            x * y.exp() + x / y
        };
        let (value, grad) = gradient(f, [2.0, 1.0]);

        let x = Dual::<f64, 2>::variable(2.0, 0);
        let y = Dual::<f64, 2>::variable(1.0, 1);
        let lazy: Dual<f64, 2> = (x.expr() * y.expr().exp() + x.expr() / y.expr()).eval();

        assert_relative_eq!(lazy.value, value, max_relative = 1e-12);
        assert_relative_eq!(lazy.derivs[0], grad[0], max_relative = 1e-12);
        assert_relative_eq!(lazy.derivs[1], grad[1], max_relative = 1e-12);
    }
}
