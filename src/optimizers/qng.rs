//! optimizers::qng — quantum natural gradient, identity-metric placeholder.
//!
//! Purpose
//! -------
//! Stand in for a true quantum-natural-gradient method. A real QNG step
//! preconditions the gradient with the inverse Fubini–Study metric tensor
//! of the underlying quantum state, which requires extra circuit
//! evaluations the cost-function boundary does not expose. This
//! implementation fixes the metric to the identity, which makes the step
//! numerically plain gradient descent with a fixed step size.
//!
//! This degenerate behavior is intentional and should be preserved as-is;
//! replacing it with a different algorithm silently would change the
//! subsystem's contract. A faithful metric evaluation is out of scope for
//! this crate.
//!
//! Key behaviors
//! -------------
//! - Run exactly `maxiter` iterations of `θ −= step_size · g` over the
//!   symmetric finite-difference gradient, with the usual post-update
//!   evaluation into the best-so-far record.
//!
//! Invariants & assumptions
//! ------------------------
//! - Evaluation budget: `maxiter * (2n + 1) + 1` cost calls, identical to
//!   Adam's formula.
//!
//! Conventions
//! -----------
//! - Defaults: `maxiter = 50`, `step_size = 0.05`.
//!
//! Testing notes
//! -------------
//! - Unit tests pin the identity-metric behavior by checking exact
//!   agreement with a hand-rolled gradient-descent iterate on a quadratic.

use crate::{
    cost::{CostFunction, MeteredCost},
    errors::OptResult,
    gradient::FiniteDiffGradient,
    optimizers::traits::{BestSoFar, Optimizer, RunOutcome},
    types::Theta,
    validation::{validate_initial_params, verify_learning_rate, verify_maxiter},
};

/// Identity-metric natural-gradient optimizer (plain gradient descent).
///
/// See the module documentation for why the metric is fixed to the
/// identity and why that must not be "fixed" silently.
#[derive(Debug, Clone, PartialEq)]
pub struct Qng {
    maxiter: usize,
    step_size: f64,
    grad: FiniteDiffGradient,
    expected_dim: Option<usize>,
}

impl Qng {
    /// Create a QNG optimizer with an explicit budget and step size.
    ///
    /// Errors
    /// ------
    /// - `InvalidMaxIter` for a zero budget, `InvalidLearningRate` naming
    ///   "step_size" for a non-positive or non-finite step.
    pub fn new(maxiter: usize, step_size: f64) -> OptResult<Self> {
        verify_maxiter(maxiter)?;
        verify_learning_rate("step_size", step_size)?;
        Ok(Self {
            maxiter,
            step_size,
            grad: FiniteDiffGradient::default(),
            expected_dim: None,
        })
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
}

impl Default for Qng {
    fn default() -> Self {
        Self {
            maxiter: 50,
            step_size: 0.05,
            grad: FiniteDiffGradient::default(),
            expected_dim: None,
        }
    }
}

impl Optimizer for Qng {
    fn run<C: CostFunction>(&self, cost_fn: &mut C, initial: &Theta) -> OptResult<RunOutcome> {
        validate_initial_params(initial, self.expected_dim)?;
        let mut metered = MeteredCost::new(cost_fn);
        let mut theta = initial.clone();
        let mut best = BestSoFar::init(&mut metered, &theta)?;

        for _ in 0..self.maxiter {
            let grad = self.grad.estimate(&mut metered, &mut theta)?;
            // Metric fixed to the identity: the preconditioned direction
            // is the raw gradient.
            theta -= &(&grad * self.step_size);

            let value = metered.evaluate(&theta)?;
            best.observe(&theta, value);
        }

        let cost_evals = metered.evals();
        Ok(best.into_outcome(self.maxiter, cost_evals))
    }
}
