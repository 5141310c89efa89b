//! optimizers::rmsprop — squared-gradient moving-average descent.
//!
//! Purpose
//! -------
//! Implement RMSProp over the symmetric finite-difference gradient: a
//! single exponential moving average of the squared gradient scales the
//! raw gradient elementwise. No first-moment term and no bias correction —
//! that distinction from Adam is the point of keeping both variants.
//!
//! Key behaviors
//! -------------
//! - Run exactly `maxiter` iterations with no early stopping, evaluating
//!   the cost once after every update for the best-so-far record.
//!
//! Invariants & assumptions
//! ------------------------
//! - Evaluation budget: `maxiter * (2n + 1) + 1` cost calls for dimension
//!   `n`, identical to Adam's.
//! - The squared-gradient average is zero-initialized at `run` entry and
//!   discarded at return.
//!
//! Conventions
//! -----------
//! - Defaults: `maxiter = 100`, `lr = 0.001`, `alpha = 0.9`,
//!   `eps = 1e-8`.
//!
//! Testing notes
//! -------------
//! - Unit tests cover constructor validation, the evaluation budget, and
//!   convergence on a toy quadratic.

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

/// RMSProp optimizer over a finite-difference gradient.
#[derive(Debug, Clone, PartialEq)]
pub struct RmsProp {
    maxiter: usize,
    lr: f64,
    alpha: f64,
    eps: f64,
    grad: FiniteDiffGradient,
    expected_dim: Option<usize>,
}

/// RMSProp accumulator: the running average of the squared gradient.
#[derive(Debug, Clone, PartialEq)]
struct RmsPropState {
    egrad2: Grad,
}

impl RmsProp {
    /// Create an RMSProp optimizer with explicit hyperparameters.
    ///
    /// Parameters
    /// ----------
    /// - `maxiter`: iteration budget; must be positive.
    /// - `lr`: learning rate; must be positive and finite.
    /// - `alpha`: squared-gradient decay rate; must lie in `[0, 1)`.
    /// - `eps`: numerical-stability constant; must be positive and finite.
    ///
    /// Errors
    /// ------
    /// - The matching `Invalid*` configuration variant for the first
    ///   hyperparameter that fails its guard.
    pub fn new(maxiter: usize, lr: f64, alpha: f64, eps: f64) -> OptResult<Self> {
        verify_maxiter(maxiter)?;
        verify_learning_rate("lr", lr)?;
        verify_decay_rate("alpha", alpha)?;
        verify_stability_eps(eps)?;
        Ok(Self {
            maxiter,
            lr,
            alpha,
            eps,
            grad: FiniteDiffGradient::default(),
            expected_dim: None,
        })
    }

    /// Create an optimizer with default decay and stability constants.
    pub fn with_budget(maxiter: usize, lr: f64) -> OptResult<Self> {
        Self::new(maxiter, lr, 0.9, 1e-8)
    }

    /// Replace the finite-difference perturbation size.
    pub fn with_fd_epsilon(mut self, epsilon: f64) -> OptResult<Self> {
        self.grad = FiniteDiffGradient::new(epsilon)?;
        Ok(self)
    }

    /// Declare the parameter dimensionality this optimizer expects.
    pub fn with_expected_dim(mut self, dim: usize) -> Self {
        self.expected_dim = Some(dim);
        self
    }

    /// One RMSProp iteration. Issues `2 * theta.len() + 1` cost
    /// evaluations.
    fn step<C: CostFunction>(
        &self, state: &mut RmsPropState, cost_fn: &mut C, theta: &mut Theta, best: &mut BestSoFar,
    ) -> OptResult<()> {
        let grad = self.grad.estimate(cost_fn, theta)?;

        state.egrad2 = &state.egrad2 * self.alpha + grad.mapv(|g| g * g) * (1.0 - self.alpha);

        let update = &grad * self.lr / (state.egrad2.mapv(f64::sqrt) + self.eps);
        *theta -= &update;

        let value = cost_fn.evaluate(theta)?;
        best.observe(theta, value);
        Ok(())
    }
}

impl Default for RmsProp {
    fn default() -> Self {
        Self {
            maxiter: 100,
            lr: 0.001,
            alpha: 0.9,
            eps: 1e-8,
            grad: FiniteDiffGradient::default(),
            expected_dim: None,
        }
    }
}

impl Optimizer for RmsProp {
    fn run<C: CostFunction>(&self, cost_fn: &mut C, initial: &Theta) -> OptResult<RunOutcome> {
        validate_initial_params(initial, self.expected_dim)?;
        let mut metered = MeteredCost::new(cost_fn);
        let mut theta = initial.clone();
        let mut best = BestSoFar::init(&mut metered, &theta)?;
        let mut state = RmsPropState { egrad2: Grad::zeros(theta.len()) };

        for _ in 0..self.maxiter {
            self.step(&mut state, &mut metered, &mut theta, &mut best)?;
        }

        let cost_evals = metered.evals();
        Ok(best.into_outcome(self.maxiter, cost_evals))
    }
}
