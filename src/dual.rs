//! Eager dual numbers for forward-mode automatic differentiation.
//!
//! A dual number tracks a value and a fixed number of partial
//! derivatives simultaneously, so evaluating a function once also
//! produces its full gradient.
//!
//! # Mathematical Background
//!
//! For a function f: ℝⁿ → ℝ, `Dual<T, N>` carries a value and the
//! gradient ∇f = [∂f/∂x₁, ..., ∂f/∂xₙ]. Each arithmetic operation
//! updates every derivative component alongside the value:
//!
//! - `(a + ∇a) + (b + ∇b) = (a+b) + (∇a+∇b)`
//! - `(a + ∇a) - (b + ∇b) = (a-b) + (∇a-∇b)`
//! - `(a + ∇a) * (b + ∇b) = ab + (b∇a + a∇b)`
//! - `(a + ∇a) / (b + ∇b) = (a/b) + ((b∇a - a∇b)/b²)`
//!
//! The chain rule emerges from composing these operations—you never
//! write it down explicitly.
//!
//! This model is **eager**: every operator returns a fully materialized
//! dual number, filling a fresh derivative array of length N. A chain
//! of K operators therefore costs O(K·N). The [`expr`](crate::expr)
//! module offers a lazy alternative that defers all evaluation until a
//! result is bound.
//!
//! # Example
//!
//! ```
//! use dualexpr::Dual;
//!
//! // f(x, y) = x² + 2xy at (3, 4)
//! let x = Dual::<f64, 2>::variable(3.0, 0);
//! let y = Dual::<f64, 2>::variable(4.0, 1);
//!
//! let f = x * x + 2.0 * x * y;
//!
//! assert_eq!(f.value, 33.0);     // 9 + 24
//! assert_eq!(f.derivs[0], 14.0); // ∂f/∂x = 2x + 2y
//! assert_eq!(f.derivs[1], 6.0);  // ∂f/∂y = 2x
//! ```

use num_traits::{Float, One, Zero};
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use crate::error::{Error, Result};

/// A dual number holding a value and N partial derivatives.
///
/// `Dual<T, N>` represents a value along with its gradient
/// [∂f/∂x₁, ..., ∂f/∂xₙ] for forward-mode automatic differentiation of
/// multivariable functions. The dimension N is a compile-time constant,
/// so duals of different dimension cannot be mixed in one expression:
/// the compiler rejects it.
///
/// # Type Parameters
///
/// - `T`: The numeric type (typically `f64` or `f32`)
/// - `N`: The number of independent variables (compile-time constant)
///
/// # Examples
///
/// ## Declaring Variables
///
/// ```
/// use dualexpr::Dual;
///
/// // x is the first of three independent variables
/// let x = Dual::<f64, 3>::variable(1.0, 0);
/// assert_eq!(x.value, 1.0);
/// assert_eq!(x.derivs, [1.0, 0.0, 0.0]);
///
/// // A constant is independent of everything
/// let c = Dual::<f64, 3>::constant(2.0);
/// assert_eq!(c.derivs, [0.0, 0.0, 0.0]);
/// ```
///
/// ## Computing Gradients
///
/// ```
/// use dualexpr::Dual;
///
/// let x = Dual::<f64, 2>::variable(3.0, 0);
/// let y = Dual::<f64, 2>::variable(4.0, 1);
///
/// let f = x * y;
///
/// assert_eq!(f.value, 12.0);
/// assert_eq!(f.derivs[0], 4.0); // ∂(xy)/∂x = y
/// assert_eq!(f.derivs[1], 3.0); // ∂(xy)/∂y = x
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dual<T, const N: usize> {
    /// The primal value (function output)
    pub value: T,
    /// The partial derivatives [∂f/∂x₁, ∂f/∂x₂, ..., ∂f/∂xₙ]
    pub derivs: [T; N],
}

impl<T, const N: usize> Dual<T, N>
where
    T: Copy,
{
    /// Create a dual number with explicit value and derivatives.
    ///
    /// # Examples
    ///
    /// ```
    /// use dualexpr::Dual;
    ///
    /// let d = Dual::new(5.0, [1.0, 2.0, 3.0]);
    /// assert_eq!(d.value, 5.0);
    /// assert_eq!(d.derivs, [1.0, 2.0, 3.0]);
    /// ```
    pub fn new(value: T, derivs: [T; N]) -> Self {
        Self { value, derivs }
    }

    /// Create a constant (all partial derivatives are zero).
    ///
    /// # Examples
    ///
    /// ```
    /// use dualexpr::Dual;
    ///
    /// let c = Dual::<f64, 3>::constant(42.0);
    /// assert_eq!(c.value, 42.0);
    /// assert_eq!(c.derivs, [0.0, 0.0, 0.0]);
    /// ```
    pub fn constant(value: T) -> Self
    where
        T: Zero,
    {
        Self {
            value,
            derivs: [T::zero(); N],
        }
    }

    /// Create the i-th independent variable.
    ///
    /// Sets `derivs[index] = 1` and all other derivatives to zero,
    /// representing ∂xᵢ/∂xⱼ = δᵢⱼ (Kronecker delta).
    ///
    /// # Panics
    ///
    /// Panics if `index >= N`.
    ///
    /// # Examples
    ///
    /// ```
    /// use dualexpr::Dual;
    ///
    /// let x = Dual::<f64, 2>::variable(3.0, 0);
    /// assert_eq!(x.derivs, [1.0, 0.0]);
    ///
    /// let y = Dual::<f64, 2>::variable(4.0, 1);
    /// assert_eq!(y.derivs, [0.0, 1.0]);
    /// ```
    pub fn variable(value: T, index: usize) -> Self
    where
        T: Zero + One,
    {
        assert!(
            index < N,
            "variable index {} out of bounds for N={}",
            index,
            N
        );
        let mut derivs = [T::zero(); N];
        derivs[index] = T::one();
        Self { value, derivs }
    }

    /// Declare this dual the i-th independent variable, in place.
    ///
    /// The whole derivative array is reset to zero first, then
    /// `derivs[index]` is set to one. This is an unconditional reset:
    /// whatever gradient the dual carried before is discarded.
    ///
    /// # Panics
    ///
    /// Panics if `index >= N`.
    ///
    /// # Examples
    ///
    /// ```
    /// use dualexpr::Dual;
    ///
    /// let mut a = Dual::new(2.0, [5.0, 7.0]);
    /// a.seed(1);
    /// assert_eq!(a.value, 2.0);
    /// assert_eq!(a.derivs, [0.0, 1.0]);
    /// ```
    pub fn seed(&mut self, index: usize)
    where
        T: Zero + One,
    {
        assert!(
            index < N,
            "variable index {} out of bounds for N={}",
            index,
            N
        );
        self.derivs = [T::zero(); N];
        self.derivs[index] = T::one();
    }

    /// The number of independent variables, N.
    pub const fn dim(&self) -> usize {
        N
    }

    /// The primal value.
    pub fn value(&self) -> T {
        self.value
    }

    /// Mutable access to the primal value.
    pub fn value_mut(&mut self) -> &mut T {
        &mut self.value
    }

    /// The i-th partial derivative.
    ///
    /// # Panics
    ///
    /// Panics if `index >= N`. See [`try_deriv`](Self::try_deriv) for a
    /// checked variant.
    pub fn deriv(&self, index: usize) -> T {
        assert!(
            index < N,
            "derivative index {} out of range for {} independent variables",
            index,
            N
        );
        self.derivs[index]
    }

    /// Mutable access to the i-th partial derivative.
    ///
    /// # Panics
    ///
    /// Panics if `index >= N`.
    pub fn deriv_mut(&mut self, index: usize) -> &mut T {
        assert!(
            index < N,
            "derivative index {} out of range for {} independent variables",
            index,
            N
        );
        &mut self.derivs[index]
    }

    /// The i-th partial derivative, with a checked index.
    ///
    /// # Examples
    ///
    /// ```
    /// use dualexpr::{Dual, Error};
    ///
    /// let x = Dual::<f64, 2>::variable(3.0, 0);
    /// assert_eq!(x.try_deriv(0), Ok(1.0));
    /// assert_eq!(x.try_deriv(5), Err(Error::IndexOutOfRange { index: 5, n: 2 }));
    /// ```
    pub fn try_deriv(&self, index: usize) -> Result<T> {
        if index < N {
            Ok(self.derivs[index])
        } else {
            Err(Error::IndexOutOfRange { index, n: N })
        }
    }
}

impl<T, const N: usize> Dual<T, N>
where
    T: Float,
{
    /// Reciprocal: `1/(b + ∇b) = (1/b) + (-∇b/b²)`
    pub fn recip(self) -> Self {
        let recip_val = self.value.recip();
        let recip_val_sq = recip_val * recip_val;

        let mut derivs = self.derivs;
        for deriv in &mut derivs {
            *deriv = -*deriv * recip_val_sq;
        }

        Self {
            value: recip_val,
            derivs,
        }
    }

    /// Exponential function: `exp(a + ∇a) = exp(a) + (exp(a) · ∇a)`
    ///
    /// # Examples
    ///
    /// ```
    /// use dualexpr::Dual;
    ///
    /// let x = Dual::<f64, 2>::variable(0.0, 0);
    /// let f = x.exp();
    ///
    /// assert_eq!(f.value, 1.0);     // exp(0) = 1
    /// assert_eq!(f.derivs[0], 1.0); // ∂exp(x)/∂x at x=0 is exp(0) = 1
    /// assert_eq!(f.derivs[1], 0.0);
    /// ```
    pub fn exp(self) -> Self {
        let exp_val = self.value.exp();
        let mut derivs = self.derivs;
        for deriv in &mut derivs {
            *deriv = *deriv * exp_val;
        }
        Self {
            value: exp_val,
            derivs,
        }
    }

    /// Natural logarithm: `ln(a + ∇a) = ln(a) + (∇a / a)`
    ///
    /// Outside the domain (a ≤ 0) this follows IEEE semantics and
    /// produces NaN or -∞; see [`try_ln`](Self::try_ln) for strict
    /// checking.
    ///
    /// # Examples
    ///
    /// ```
    /// use dualexpr::Dual;
    ///
    /// let x = Dual::<f64, 2>::variable(1.0, 0);
    /// let f = x.ln();
    ///
    /// assert_eq!(f.value, 0.0);     // ln(1) = 0
    /// assert_eq!(f.derivs[0], 1.0); // ∂ln(x)/∂x at x=1 is 1
    /// ```
    pub fn ln(self) -> Self {
        let ln_val = self.value.ln();
        let mut derivs = self.derivs;
        for deriv in &mut derivs {
            *deriv = *deriv / self.value;
        }
        Self {
            value: ln_val,
            derivs,
        }
    }

    /// Natural logarithm with strict domain checking.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LogDomain`] if the value is not positive.
    ///
    /// # Examples
    ///
    /// ```
    /// use dualexpr::{Dual, Error};
    ///
    /// let x = Dual::<f64, 1>::variable(-1.0, 0);
    /// assert_eq!(x.try_ln(), Err(Error::LogDomain));
    /// ```
    pub fn try_ln(self) -> Result<Self> {
        if self.value <= T::zero() {
            Err(Error::LogDomain)
        } else {
            Ok(self.ln())
        }
    }

    /// Square root: `sqrt(a + ∇a) = sqrt(a) + (∇a / (2·sqrt(a)))`
    pub fn sqrt(self) -> Self {
        let sqrt_val = self.value.sqrt();
        let two_sqrt = sqrt_val + sqrt_val;
        let mut derivs = self.derivs;
        for deriv in &mut derivs {
            *deriv = *deriv / two_sqrt;
        }
        Self {
            value: sqrt_val,
            derivs,
        }
    }

    /// Square root with strict domain checking.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SqrtDomain`] if the value is negative.
    pub fn try_sqrt(self) -> Result<Self> {
        if self.value < T::zero() {
            Err(Error::SqrtDomain)
        } else {
            Ok(self.sqrt())
        }
    }

    /// Sine function: `sin(a + ∇a) = sin(a) + (cos(a) · ∇a)`
    pub fn sin(self) -> Self {
        let sin_val = self.value.sin();
        let cos_val = self.value.cos();
        let mut derivs = self.derivs;
        for deriv in &mut derivs {
            *deriv = *deriv * cos_val;
        }
        Self {
            value: sin_val,
            derivs,
        }
    }

    /// Cosine function: `cos(a + ∇a) = cos(a) + (-sin(a) · ∇a)`
    pub fn cos(self) -> Self {
        let cos_val = self.value.cos();
        let sin_val = self.value.sin();
        let mut derivs = self.derivs;
        for deriv in &mut derivs {
            *deriv = -*deriv * sin_val;
        }
        Self {
            value: cos_val,
            derivs,
        }
    }

    /// Absolute value.
    ///
    /// The derivative at zero is taken from the positive branch.
    pub fn abs(self) -> Self {
        if self.value < T::zero() {
            -self
        } else {
            self
        }
    }

    /// Raise to an integer power: `d/dx(xⁿ) = n·xⁿ⁻¹·x′`
    ///
    /// The exponent is a constant, so no logarithm term appears and
    /// negative bases are fine.
    ///
    /// # Examples
    ///
    /// ```
    /// use dualexpr::Dual;
    ///
    /// let x = Dual::<f64, 1>::variable(2.0, 0);
    /// let f = x.powi(3);
    ///
    /// assert_eq!(f.value, 8.0);
    /// assert_eq!(f.derivs[0], 12.0); // 3·2²
    /// ```
    pub fn powi(self, exponent: i32) -> Self {
        let scale =
            T::from(exponent).expect("i32 exponent must be representable in T") * self.value.powi(exponent - 1);
        let mut derivs = self.derivs;
        for deriv in &mut derivs {
            *deriv = *deriv * scale;
        }
        Self {
            value: self.value.powi(exponent),
            derivs,
        }
    }

    /// Raise to a constant real power: `d/dx(xᵉ) = e·xᵉ⁻¹·x′`
    ///
    /// # Examples
    ///
    /// ```
    /// use dualexpr::Dual;
    ///
    /// let x = Dual::<f64, 1>::variable(4.0, 0);
    /// let f = x.powf(0.5);
    ///
    /// assert_eq!(f.value, 2.0);
    /// assert_eq!(f.derivs[0], 0.25); // 1/(2·√4)
    /// ```
    pub fn powf(self, exponent: T) -> Self {
        let scale = exponent * self.value.powf(exponent - T::one());
        let mut derivs = self.derivs;
        for deriv in &mut derivs {
            *deriv = *deriv * scale;
        }
        Self {
            value: self.value.powf(exponent),
            derivs,
        }
    }

    /// Raise to a dual power: `d/dx(f^g) = g′·ln(f)·f^g + g·f′·f^(g-1)`
    ///
    /// The `ln(f)` term is only evaluated for indices where the
    /// exponent actually varies. A constant exponent (all derivative
    /// components zero) therefore never touches the logarithm, and a
    /// negative base raised to a constant power stays finite instead of
    /// yielding a spurious NaN.
    ///
    /// # Examples
    ///
    /// ```
    /// use dualexpr::Dual;
    ///
    /// // f(x, y) = x^y at (2, 3)
    /// let x = Dual::<f64, 2>::variable(2.0, 0);
    /// let y = Dual::<f64, 2>::variable(3.0, 1);
    /// let f = x.pow(y);
    ///
    /// assert_eq!(f.value, 8.0);
    /// assert_eq!(f.derivs[0], 12.0); // y·x^(y-1) = 3·4
    /// assert!((f.derivs[1] - 2.0_f64.ln() * 8.0).abs() < 1e-12); // ln(x)·x^y
    /// ```
    pub fn pow(self, exponent: Self) -> Self {
        let value = self.value.powf(exponent.value);
        let power_scale = exponent.value * self.value.powf(exponent.value - T::one());
        let mut derivs = [T::zero(); N];
        for i in 0..N {
            let mut d = self.derivs[i] * power_scale;
            if !exponent.derivs[i].is_zero() {
                d = d + exponent.derivs[i] * self.value.ln() * value;
            }
            derivs[i] = d;
        }
        Self { value, derivs }
    }

    /// Dual power with strict domain checking.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PowDomain`] if the base is not positive while
    /// the exponent has any nonzero derivative component (the only case
    /// that needs `ln(base)`).
    ///
    /// # Examples
    ///
    /// ```
    /// use dualexpr::{Dual, Error};
    ///
    /// let x = Dual::<f64, 2>::variable(-2.0, 0);
    /// let y = Dual::<f64, 2>::variable(3.0, 1);
    /// assert_eq!(x.try_pow(y), Err(Error::PowDomain));
    ///
    /// // A constant exponent is fine on a negative base.
    /// let cube = x.try_pow(Dual::constant(3.0)).unwrap();
    /// assert_eq!(cube.value, -8.0);
    /// assert_eq!(cube.derivs[0], 12.0);
    /// ```
    pub fn try_pow(self, exponent: Self) -> Result<Self> {
        let needs_log = exponent.derivs.iter().any(|d| !d.is_zero());
        if needs_log && self.value <= T::zero() {
            Err(Error::PowDomain)
        } else {
            Ok(self.pow(exponent))
        }
    }
}

/// Addition: `(a + ∇a) + (b + ∇b) = (a+b) + (∇a+∇b)`
impl<T, const N: usize> Add for Dual<T, N>
where
    T: Add<Output = T> + Copy,
{
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        let mut derivs = self.derivs;
        for (deriv, rhs_deriv) in derivs.iter_mut().zip(rhs.derivs.iter()) {
            *deriv = *deriv + *rhs_deriv;
        }
        Self {
            value: self.value + rhs.value,
            derivs,
        }
    }
}

/// Subtraction: `(a + ∇a) - (b + ∇b) = (a-b) + (∇a-∇b)`
impl<T, const N: usize> Sub for Dual<T, N>
where
    T: Sub<Output = T> + Copy,
{
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        let mut derivs = self.derivs;
        for (deriv, rhs_deriv) in derivs.iter_mut().zip(rhs.derivs.iter()) {
            *deriv = *deriv - *rhs_deriv;
        }
        Self {
            value: self.value - rhs.value,
            derivs,
        }
    }
}

/// Multiplication: `(a + ∇a) * (b + ∇b) = ab + (b∇a + a∇b)`
///
/// This implements the product rule automatically.
impl<T, const N: usize> Mul for Dual<T, N>
where
    T: Mul<Output = T> + Add<Output = T> + Copy,
{
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let mut derivs = self.derivs;
        for (deriv, rhs_deriv) in derivs.iter_mut().zip(rhs.derivs.iter()) {
            // Product rule: (f·g)' = f'·g + f·g'
            *deriv = *deriv * rhs.value + self.value * *rhs_deriv;
        }
        Self {
            value: self.value * rhs.value,
            derivs,
        }
    }
}

/// Division: `(a + ∇a) / (b + ∇b) = (a + ∇a) * (1/(b + ∇b))`
///
/// The quotient rule emerges from the product rule composed with the
/// reciprocal rule.
#[allow(clippy::suspicious_arithmetic_impl)]
impl<T, const N: usize> Div for Dual<T, N>
where
    T: Float,
{
    type Output = Self;

    fn div(self, rhs: Self) -> Self {
        self * rhs.recip()
    }
}

/// Negation: `-(a + ∇a) = -a + (-∇a)`
impl<T, const N: usize> Neg for Dual<T, N>
where
    T: Neg<Output = T> + Copy,
{
    type Output = Self;

    fn neg(self) -> Self {
        let mut derivs = self.derivs;
        for deriv in &mut derivs {
            *deriv = -*deriv;
        }
        Self {
            value: -self.value,
            derivs,
        }
    }
}

/// Addition of a scalar: only the value moves.
impl<T, const N: usize> Add<T> for Dual<T, N>
where
    T: Add<Output = T> + Copy,
{
    type Output = Self;

    fn add(self, rhs: T) -> Self {
        Self {
            value: self.value + rhs,
            derivs: self.derivs,
        }
    }
}

/// Subtraction of a scalar: only the value moves.
impl<T, const N: usize> Sub<T> for Dual<T, N>
where
    T: Sub<Output = T> + Copy,
{
    type Output = Self;

    fn sub(self, rhs: T) -> Self {
        Self {
            value: self.value - rhs,
            derivs: self.derivs,
        }
    }
}

/// Multiplication by a scalar: value and every derivative scale.
impl<T, const N: usize> Mul<T> for Dual<T, N>
where
    T: Mul<Output = T> + Copy,
{
    type Output = Self;

    fn mul(self, rhs: T) -> Self {
        let mut derivs = self.derivs;
        for deriv in &mut derivs {
            *deriv = *deriv * rhs;
        }
        Self {
            value: self.value * rhs,
            derivs,
        }
    }
}

/// Division by a scalar: value and every derivative scale.
impl<T, const N: usize> Div<T> for Dual<T, N>
where
    T: Div<Output = T> + Copy,
{
    type Output = Self;

    fn div(self, rhs: T) -> Self {
        let mut derivs = self.derivs;
        for deriv in &mut derivs {
            *deriv = *deriv / rhs;
        }
        Self {
            value: self.value / rhs,
            derivs,
        }
    }
}

/// Scalar-on-the-left arithmetic for the primitive float types, so that
/// `2.0 * x` works as well as `x * 2.0`.
macro_rules! impl_scalar_lhs_ops {
    ($($t:ty),*) => {$(
        impl<const N: usize> Add<Dual<$t, N>> for $t {
            type Output = Dual<$t, N>;

            fn add(self, rhs: Dual<$t, N>) -> Dual<$t, N> {
                rhs + self
            }
        }

        impl<const N: usize> Sub<Dual<$t, N>> for $t {
            type Output = Dual<$t, N>;

            fn sub(self, rhs: Dual<$t, N>) -> Dual<$t, N> {
                -rhs + self
            }
        }

        impl<const N: usize> Mul<Dual<$t, N>> for $t {
            type Output = Dual<$t, N>;

            fn mul(self, rhs: Dual<$t, N>) -> Dual<$t, N> {
                rhs * self
            }
        }

        impl<const N: usize> Div<Dual<$t, N>> for $t {
            type Output = Dual<$t, N>;

            fn div(self, rhs: Dual<$t, N>) -> Dual<$t, N> {
                Dual::constant(self) / rhs
            }
        }
    )*};
}

impl_scalar_lhs_ops!(f32, f64);

/// In-place addition.
impl<T, const N: usize> AddAssign for Dual<T, N>
where
    T: Add<Output = T> + Copy,
{
    fn add_assign(&mut self, rhs: Self) {
        for (deriv, rhs_deriv) in self.derivs.iter_mut().zip(rhs.derivs.iter()) {
            *deriv = *deriv + *rhs_deriv;
        }
        self.value = self.value + rhs.value;
    }
}

/// In-place addition of a scalar.
impl<T, const N: usize> AddAssign<T> for Dual<T, N>
where
    T: Add<Output = T> + Copy,
{
    fn add_assign(&mut self, rhs: T) {
        self.value = self.value + rhs;
    }
}

/// In-place subtraction.
impl<T, const N: usize> SubAssign for Dual<T, N>
where
    T: Sub<Output = T> + Copy,
{
    fn sub_assign(&mut self, rhs: Self) {
        for (deriv, rhs_deriv) in self.derivs.iter_mut().zip(rhs.derivs.iter()) {
            *deriv = *deriv - *rhs_deriv;
        }
        self.value = self.value - rhs.value;
    }
}

/// In-place subtraction of a scalar.
impl<T, const N: usize> SubAssign<T> for Dual<T, N>
where
    T: Sub<Output = T> + Copy,
{
    fn sub_assign(&mut self, rhs: T) {
        self.value = self.value - rhs;
    }
}

/// In-place multiplication.
///
/// The product rule reads the pre-update value of the receiver, so the
/// derivative loop must run before the value is overwritten.
impl<T, const N: usize> MulAssign for Dual<T, N>
where
    T: Mul<Output = T> + Add<Output = T> + Copy,
{
    fn mul_assign(&mut self, rhs: Self) {
        for (deriv, rhs_deriv) in self.derivs.iter_mut().zip(rhs.derivs.iter()) {
            *deriv = *deriv * rhs.value + self.value * *rhs_deriv;
        }
        self.value = self.value * rhs.value;
    }
}

/// In-place multiplication by a scalar.
impl<T, const N: usize> MulAssign<T> for Dual<T, N>
where
    T: Mul<Output = T> + Copy,
{
    fn mul_assign(&mut self, rhs: T) {
        for deriv in &mut self.derivs {
            *deriv = *deriv * rhs;
        }
        self.value = self.value * rhs;
    }
}

/// In-place division.
///
/// As with [`MulAssign`], the quotient rule reads the pre-update value,
/// so the derivative loop runs first.
impl<T, const N: usize> DivAssign for Dual<T, N>
where
    T: Float,
{
    fn div_assign(&mut self, rhs: Self) {
        let denom_sq = rhs.value * rhs.value;
        for (deriv, rhs_deriv) in self.derivs.iter_mut().zip(rhs.derivs.iter()) {
            *deriv = (*deriv * rhs.value - self.value * *rhs_deriv) / denom_sq;
        }
        self.value = self.value / rhs.value;
    }
}

/// In-place division by a scalar.
impl<T, const N: usize> DivAssign<T> for Dual<T, N>
where
    T: Div<Output = T> + Copy,
{
    fn div_assign(&mut self, rhs: T) {
        for deriv in &mut self.derivs {
            *deriv = *deriv / rhs;
        }
        self.value = self.value / rhs;
    }
}

/// Compute the gradient of a scalar multivariable function in a single
/// forward pass.
///
/// Given a function `f: ℝⁿ → ℝ` and a point in ℝⁿ, computes both the
/// function value and its gradient ∇f = [∂f/∂x₁, ..., ∂f/∂xₙ] at that
/// point. The input variables are seeded automatically and the function
/// is evaluated once.
///
/// # Examples
///
/// ```
/// use dualexpr::{gradient, Dual};
///
/// // f(x, y) = x² + 2xy + y² at (3, 4)
/// let f = |vars: [Dual<f64, 2>; 2]| {
///     let [x, y] = vars;
///     x * x + 2.0 * x * y + y * y
/// };
///
/// let (value, grad) = gradient(f, [3.0, 4.0]);
///
/// assert_eq!(value, 49.0);   // 9 + 24 + 16
/// assert_eq!(grad[0], 14.0); // ∂f/∂x = 2x + 2y
/// assert_eq!(grad[1], 14.0); // ∂f/∂y = 2x + 2y
/// ```
pub fn gradient<T, F, const N: usize>(f: F, point: [T; N]) -> (T, [T; N])
where
    T: Float,
    F: Fn([Dual<T, N>; N]) -> Dual<T, N>,
{
    // Seed input variables: each gets its value from point with the
    // appropriate unit vector for derivatives
    let vars = std::array::from_fn(|i| Dual::variable(point[i], i));

    // Single forward pass through the computation
    let result = f(vars);

    (result.value, result.derivs)
}
