//! optimizers::adam — bias-corrected adaptive-moment descent.
//!
//! Purpose
//! -------
//! Implement the classic Adam update over the symmetric finite-difference
//! gradient: exponential moving averages of the gradient and its square,
//! bias correction by `1 − βᵗ`, and an elementwise adaptive step.
//!
//! Key behaviors
//! -------------
//! - Run exactly `maxiter` iterations; no early stopping and no
//!   convergence check. This is a deliberate simplicity choice of the
//!   subsystem, not an oversight.
//! - After every parameter update, evaluate the cost once and feed the
//!   shared best-so-far record on strict improvement.
//!
//! Invariants & assumptions
//! ------------------------
//! - Evaluation budget: `maxiter * (2n + 1) + 1` cost calls for dimension
//!   `n` (2n for the gradient, 1 post-update, plus the initial
//!   evaluation).
//! - Moment state (`m`, `v`, `t`) is zero-initialized at `run` entry and
//!   discarded at return. When stepped by the hybrid optimizer, the same
//!   state persists across outer iterations and `t` advances only on
//!   iterations where Adam actually ran, so the bias-correction exponents
//!   track Adam's own step count, not the outer index.
//!
//! Conventions
//! -----------
//! - Hyperparameters are validated at construction; `new` returns
//!   `OptResult<Self>` and `run` never re-checks them.
//! - Defaults mirror common practice: `maxiter = 100`, `lr = 0.01`,
//!   `beta1 = 0.9`, `beta2 = 0.999`, `eps = 1e-8`.
//!
//! Downstream usage
//! ----------------
//! - Standalone via [`Optimizer::run`], or stepped one iteration at a time
//!   as the classical child of the hybrid optimizer.
//!
//! Testing notes
//! -------------
//! - Unit tests cover constructor validation, the evaluation budget, and
//!   convergence on the toy quadratic; the integration suite exercises the
//!   trait surface.

use crate::{
    cost::{CostFunction, MeteredCost},
    errors::OptResult,
    gradient::FiniteDiffGradient,
    optimizers::traits::{BestSoFar, Optimizer, RunOutcome},
    types::{Grad, Theta},
    validation::{
        validate_initial_params, verify_decay_rate, verify_learning_rate, verify_maxiter,
        verify_stability_eps,
    },
};

/// Adam optimizer over a finite-difference gradient.
///
/// Purpose
/// -------
/// Minimize a black-box cost with adaptive per-coordinate learning rates
/// derived from first and second moment estimates of the gradient.
///
/// Notes
/// -----
/// - Gradient estimation costs `2n` evaluations per iteration; this, not
///   the update arithmetic, dominates the run time for expensive cost
///   functions.
#[derive(Debug, Clone, PartialEq)]
pub struct Adam {
    maxiter: usize,
    lr: f64,
    beta1: f64,
    beta2: f64,
    eps: f64,
    grad: FiniteDiffGradient,
    expected_dim: Option<usize>,
}

/// Adam accumulators: first/second raw moment estimates and the step
/// counter driving bias correction.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct AdamState {
    m: Grad,
    v: Grad,
    t: u32,
}

impl AdamState {
    pub(crate) fn zeros(dim: usize) -> Self {
        Self { m: Grad::zeros(dim), v: Grad::zeros(dim), t: 0 }
    }
}

impl Adam {
    /// Create an Adam optimizer with explicit hyperparameters.
    ///
    /// Parameters
    /// ----------
    /// - `maxiter`: iteration budget; must be positive.
    /// - `lr`: learning rate; must be positive and finite.
    /// - `beta1`, `beta2`: moment decay rates; must lie in `[0, 1)`.
    /// - `eps`: numerical-stability constant added to the denominator;
    ///   must be positive and finite.
    ///
    /// Errors
    /// ------
    /// - The matching `Invalid*` configuration variant for the first
    ///   hyperparameter that fails its guard; no partial construction.
    pub fn new(maxiter: usize, lr: f64, beta1: f64, beta2: f64, eps: f64) -> OptResult<Self> {
        verify_maxiter(maxiter)?;
        verify_learning_rate("lr", lr)?;
        verify_decay_rate("beta1", beta1)?;
        verify_decay_rate("beta2", beta2)?;
        verify_stability_eps(eps)?;
        Ok(Self {
            maxiter,
            lr,
            beta1,
            beta2,
            eps,
            grad: FiniteDiffGradient::default(),
            expected_dim: None,
        })
    }

    /// Create an optimizer with default hyperparameters except the
    /// iteration budget and learning rate.
    pub fn with_budget(maxiter: usize, lr: f64) -> OptResult<Self> {
        Self::new(maxiter, lr, 0.9, 0.999, 1e-8)
    }

    /// Replace the finite-difference perturbation size.
    ///
    /// Errors
    /// ------
    /// - [`OptError::InvalidFdEpsilon`] for a zero or non-finite epsilon.
    ///
    /// [`OptError::InvalidFdEpsilon`]: crate::errors::OptError::InvalidFdEpsilon
    pub fn with_fd_epsilon(mut self, epsilon: f64) -> OptResult<Self> {
        self.grad = FiniteDiffGradient::new(epsilon)?;
        Ok(self)
    }

    /// Declare the parameter dimensionality this optimizer expects; `run`
    /// rejects mismatching initial vectors before any cost evaluation.
    pub fn with_expected_dim(mut self, dim: usize) -> Self {
        self.expected_dim = Some(dim);
        self
    }

    /// One Adam iteration: gradient estimate, moment updates, bias-corrected
    /// parameter update, and one post-update evaluation into `best`.
    ///
    /// Issues `2 * theta.len() + 1` cost evaluations.
    pub(crate) fn step<C: CostFunction>(
        &self, state: &mut AdamState, cost_fn: &mut C, theta: &mut Theta, best: &mut BestSoFar,
    ) -> OptResult<()> {
        state.t += 1;
        let grad = self.grad.estimate(cost_fn, theta)?;

        state.m = &state.m * self.beta1 + &grad * (1.0 - self.beta1);
        state.v = &state.v * self.beta2 + grad.mapv(|g| g * g) * (1.0 - self.beta2);

        let m_hat = &state.m / (1.0 - self.beta1.powi(state.t as i32));
        let v_hat = &state.v / (1.0 - self.beta2.powi(state.t as i32));

        let update = m_hat * self.lr / (v_hat.mapv(f64::sqrt) + self.eps);
        *theta -= &update;

        let value = cost_fn.evaluate(theta)?;
        best.observe(theta, value);
        Ok(())
    }
}

impl Default for Adam {
    fn default() -> Self {
        Self {
            maxiter: 100,
            lr: 0.01,
            beta1: 0.9,
            beta2: 0.999,
            eps: 1e-8,
            grad: FiniteDiffGradient::default(),
            expected_dim: None,
        }
    }
}

impl Optimizer for Adam {
    /// Minimize `cost_fn` from `initial` over exactly `maxiter` iterations.
    ///
    /// Examples
    /// --------
    /// ```rust
    /// # use vqa_optim::optimizers::{Adam, Optimizer};
    /// # use vqa_optim::cost::from_fn;
    /// # use ndarray::array;
    /// let opt = Adam::with_budget(200, 0.05).unwrap();
    /// let mut cost = from_fn(|theta| (theta[0] - 2.0).powi(2) + 1.0);
    ///
    /// let outcome = opt.run(&mut cost, &array![0.0]).unwrap();
    /// assert!((outcome.best_value - 1.0).abs() < 0.01);
    /// ```
    fn run<C: CostFunction>(&self, cost_fn: &mut C, initial: &Theta) -> OptResult<RunOutcome> {
        validate_initial_params(initial, self.expected_dim)?;
        let mut metered = MeteredCost::new(cost_fn);
        let mut theta = initial.clone();
        let mut best = BestSoFar::init(&mut metered, &theta)?;
        let mut state = AdamState::zeros(theta.len());

        for _ in 0..self.maxiter {
            self.step(&mut state, &mut metered, &mut theta, &mut best)?;
        }

        let cost_evals = metered.evals();
        Ok(best.into_outcome(self.maxiter, cost_evals))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{cost::from_fn, errors::OptError};
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Constructor validation of each hyperparameter.
    // - The exact evaluation budget `maxiter * (2n + 1) + 1`.
    // - Convergence on the reference quadratic.
    // - Best-so-far agreement with the minimum of all observed values.
    //
    // They intentionally DO NOT cover:
    // - Hybrid stepping semantics (hybrid tests) or fault propagation
    //   through `run` (integration tests).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify that each invalid hyperparameter is rejected at construction
    // with its specific error variant.
    //
    // Given
    // -----
    // - A zero budget, a zero learning rate, decay rates at 1.0, and a zero
    //   stability epsilon.
    //
    // Expect
    // ------
    // - Each constructor call fails with the matching variant.
    fn new_rejects_invalid_hyperparameters() {
        assert!(matches!(
            Adam::new(0, 0.01, 0.9, 0.999, 1e-8).unwrap_err(),
            OptError::InvalidMaxIter { .. }
        ));
        assert!(matches!(
            Adam::new(10, 0.0, 0.9, 0.999, 1e-8).unwrap_err(),
            OptError::InvalidLearningRate { name: "lr", .. }
        ));
        assert!(matches!(
            Adam::new(10, 0.01, 1.0, 0.999, 1e-8).unwrap_err(),
            OptError::InvalidDecayRate { name: "beta1", .. }
        ));
        assert!(matches!(
            Adam::new(10, 0.01, 0.9, 1.0, 1e-8).unwrap_err(),
            OptError::InvalidDecayRate { name: "beta2", .. }
        ));
        assert!(matches!(
            Adam::new(10, 0.01, 0.9, 0.999, 0.0).unwrap_err(),
            OptError::InvalidStabilityEps { .. }
        ));
    }

    #[test]
    // Purpose
    // -------
    // Verify the evaluation-budget invariant for a 3-dimensional problem.
    //
    // Given
    // -----
    // - `maxiter = 7`, dimension `n = 3`, a counting quadratic cost.
    //
    // Expect
    // ------
    // - Exactly `7 * (2*3 + 1) + 1 = 50` evaluations, both in the external
    //   counter and in the outcome diagnostics.
    fn run_issues_exact_evaluation_budget() {
        // Arrange
        let opt = Adam::with_budget(7, 0.01).unwrap();
        let mut calls = 0usize;
        let mut cost = from_fn(|t: &Theta| {
            calls += 1;
            t.dot(t)
        });

        // Act
        let outcome = opt.run(&mut cost, &array![1.0, -1.0, 0.5]).unwrap();

        // Assert
        drop(cost);
        assert_eq!(calls, 7 * (2 * 3 + 1) + 1);
        assert_eq!(outcome.cost_evals, calls);
        assert_eq!(outcome.iterations, 7);
    }

    #[test]
    // Purpose
    // -------
    // Verify convergence on the reference shifted quadratic.
    //
    // Given
    // -----
    // - `f(x) = (x - 2)² + 1`, `maxiter = 200`, `lr = 0.05`, start at 0.
    //
    // Expect
    // ------
    // - Best value within 0.01 of the optimum 1.0 and best parameter near
    //   2.0.
    fn run_converges_on_shifted_quadratic() {
        // Arrange
        let opt = Adam::with_budget(200, 0.05).unwrap();
        let mut cost = from_fn(|t: &Theta| (t[0] - 2.0).powi(2) + 1.0);

        // Act
        let outcome = opt.run(&mut cost, &array![0.0]).unwrap();

        // Assert
        assert!(
            (outcome.best_value - 1.0).abs() < 0.01,
            "best value {} should be within 0.01 of 1.0",
            outcome.best_value
        );
        assert!((outcome.best_params[0] - 2.0).abs() < 0.15);
    }

    #[test]
    // Purpose
    // -------
    // Verify that the reported best equals the minimum over every value the
    // cost function ever returned, which is the observable form of the
    // never-regressing best-so-far policy.
    //
    // Given
    // -----
    // - A recording quadratic cost and a short Adam run.
    //
    // Expect
    // ------
    // - `best_value` equals the minimum of all recorded evaluations.
    fn best_value_is_minimum_of_all_observations() {
        // Arrange
        let opt = Adam::with_budget(25, 0.1).unwrap();
        let mut seen: Vec<f64> = Vec::new();
        let mut cost = from_fn(|t: &Theta| {
            let value = (t[0] + 1.0).powi(2);
            seen.push(value);
            value
        });

        // Act
        let outcome = opt.run(&mut cost, &array![2.0]).unwrap();

        // Assert
        drop(cost);
        let min_seen = seen.iter().cloned().fold(f64::INFINITY, f64::min);
        assert_eq!(outcome.best_value, min_seen);
    }

    #[test]
    // Purpose
    // -------
    // Verify that a declared dimensionality rejects mismatching initial
    // vectors before the cost function is ever called.
    //
    // Given
    // -----
    // - An Adam optimizer expecting dimension 2 and a length-3 start.
    //
    // Expect
    // ------
    // - `InitialParamsDimMismatch` and zero cost evaluations.
    fn expected_dim_mismatch_fails_before_any_evaluation() {
        // Arrange
        let opt = Adam::default().with_expected_dim(2);
        let mut calls = 0usize;
        let mut cost = from_fn(|t: &Theta| {
            calls += 1;
            t.sum()
        });

        // Act
        let err = opt.run(&mut cost, &array![0.0, 0.0, 0.0]).unwrap_err();

        // Assert
        assert_eq!(err, OptError::InitialParamsDimMismatch { expected: 2, found: 3 });
        drop(cost);
        assert_eq!(calls, 0);
    }
}
