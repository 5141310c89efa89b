//! gradient — symmetric finite-difference gradient estimation.
//!
//! Purpose
//! -------
//! Turn a black-box cost function into an approximate gradient via
//! coordinate-wise symmetric differences, so the gradient-based optimizers
//! (Adam, RMSProp, QNG) can operate without any analytic derivative from
//! the circuit layer.
//!
//! Key behaviors
//! -------------
//! - Perturb each coordinate by `±epsilon` in place, evaluate the cost at
//!   both points, and restore the coordinate exactly before moving on.
//! - Reject a zero or non-finite `epsilon` at construction
//!   ([`FiniteDiffGradient::new`]); the default is
//!   [`DEFAULT_FD_EPSILON`] (1e-5).
//!
//! Invariants & assumptions
//! ------------------------
//! - Exactly `2 * theta.len()` cost evaluations per [`estimate`] call.
//!   This is the dominant cost driver of the gradient-based optimizers;
//!   callers budgeting evaluations must account for it.
//! - On return — success or error — the caller's vector holds its original
//!   values (restoration also happens on the error path).
//! - No smoothness of the cost is assumed; the estimate is whatever the
//!   symmetric quotient produces, NaN and infinities included. Divergence
//!   is not detected here (documented subsystem limitation).
//!
//! Conventions
//! -----------
//! - `estimate` takes `&mut Theta` so perturbation happens without
//!   allocating a scratch vector per coordinate; the restore discipline is
//!   what makes this safe.
//! - `g[i] = (f(θ + ε e_i) − f(θ − ε e_i)) / (2ε)`.
//!
//! Downstream usage
//! ----------------
//! - Adam, RMSProp, and QNG own a `FiniteDiffGradient` and call
//!   [`estimate`] once per iteration.
//! - SPSA deliberately does NOT use this module: its two-point random
//!   perturbation keeps the per-step evaluation count independent of the
//!   dimension, which is the reason both estimators exist side by side.
//!
//! Testing notes
//! -------------
//! - Unit tests cover exactness on affine costs (independent of epsilon),
//!   the evaluation-count contract, in-place restoration on success and on
//!   a mid-estimate fault, and constructor rejection of zero epsilon.
//!
//! [`estimate`]: FiniteDiffGradient::estimate

use crate::{
    cost::CostFunction,
    errors::OptResult,
    types::{Grad, Theta, DEFAULT_FD_EPSILON},
    validation::verify_fd_epsilon,
};

/// Coordinate-wise symmetric finite-difference gradient estimator.
///
/// Purpose
/// -------
/// Hold a validated perturbation size and produce gradient estimates of a
/// [`CostFunction`] around a parameter vector.
///
/// Notes
/// -----
/// - Each estimate costs `2 * theta.len()` cost evaluations.
/// - The default perturbation is [`DEFAULT_FD_EPSILON`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FiniteDiffGradient {
    epsilon: f64,
}

impl FiniteDiffGradient {
    /// Create an estimator with an explicit perturbation size.
    ///
    /// Errors
    /// ------
    /// - [`OptError::InvalidFdEpsilon`] when `epsilon` is zero or
    ///   non-finite.
    ///
    /// [`OptError::InvalidFdEpsilon`]: crate::errors::OptError::InvalidFdEpsilon
    pub fn new(epsilon: f64) -> OptResult<Self> {
        verify_fd_epsilon(epsilon)?;
        Ok(Self { epsilon })
    }

    /// The configured perturbation size.
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// estimate — symmetric-difference gradient at `theta`.
    ///
    /// Purpose
    /// -------
    /// Approximate the gradient of `cost_fn` at `theta`, one coordinate at
    /// a time, perturbing in place and restoring each coordinate to its
    /// exact original value afterwards.
    ///
    /// Parameters
    /// ----------
    /// - `cost_fn`: objective to differentiate; called exactly
    ///   `2 * theta.len()` times.
    /// - `theta`: evaluation point; mutated transiently, identical to its
    ///   input state on return (also when an error is returned).
    ///
    /// Returns
    /// -------
    /// `OptResult<Grad>` of the same length as `theta`.
    ///
    /// Errors
    /// ------
    /// - Any fault raised by `cost_fn`, forwarded unchanged after the
    ///   perturbed coordinate has been restored.
    ///
    /// Notes
    /// -----
    /// - Non-finite cost values are not faults; they flow into the
    ///   quotient unguarded.
    ///
    /// Examples
    /// --------
    /// ```rust
    /// # use vqa_optim::gradient::FiniteDiffGradient;
    /// # use vqa_optim::cost::from_fn;
    /// # use ndarray::array;
    /// let estimator = FiniteDiffGradient::default();
    /// let mut cost = from_fn(|theta| 3.0 * theta[0] - 2.0 * theta[1] + 7.0);
    /// let mut theta = array![0.5, -0.5];
    ///
    /// let grad = estimator.estimate(&mut cost, &mut theta).unwrap();
    /// assert!((grad[0] - 3.0).abs() < 1e-6);
    /// assert!((grad[1] + 2.0).abs() < 1e-6);
    /// assert_eq!(theta, array![0.5, -0.5]);
    /// ```
    pub fn estimate<C: CostFunction>(
        &self, cost_fn: &mut C, theta: &mut Theta,
    ) -> OptResult<Grad> {
        let mut grad = Grad::zeros(theta.len());
        for i in 0..theta.len() {
            let orig = theta[i];

            theta[i] = orig + self.epsilon;
            let f_plus = match cost_fn.evaluate(theta) {
                Ok(value) => value,
                Err(err) => {
                    theta[i] = orig;
                    return Err(err);
                }
            };

            theta[i] = orig - self.epsilon;
            let f_minus = match cost_fn.evaluate(theta) {
                Ok(value) => value,
                Err(err) => {
                    theta[i] = orig;
                    return Err(err);
                }
            };

            theta[i] = orig;
            grad[i] = (f_plus - f_minus) / (2.0 * self.epsilon);
        }
        Ok(grad)
    }
}

impl Default for FiniteDiffGradient {
    fn default() -> Self {
        Self { epsilon: DEFAULT_FD_EPSILON }
    }
}
