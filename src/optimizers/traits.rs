//! optimizers::traits — the `Optimizer` capability and run bookkeeping.
//!
//! Purpose
//! -------
//! Define the single operation every optimizer variant exposes
//! ([`Optimizer::run`]) together with the two pieces of bookkeeping shared
//! by all variants: the best-observed record ([`BestSoFar`]) and the run
//! diagnostics returned to the caller ([`RunOutcome`]).
//!
//! Key behaviors
//! -------------
//! - `run` owns the whole minimization loop: it clones the caller's initial
//!   vector, evaluates the starting cost once, iterates exactly the
//!   configured budget, and returns best parameters and best value by
//!   value.
//! - [`BestSoFar`] updates only on strict improvement, so the sequence of
//!   best values over a run is non-increasing by construction.
//!
//! Invariants & assumptions
//! ------------------------
//! - Optimizer state lives inside `run`: allocated at entry, discarded at
//!   return. Nothing persists across separate `run` invocations.
//! - Best parameters are snapshots (cloned), never aliases of the
//!   in-progress iterate.
//! - A NaN cost never replaces the best (strict `<` is false for NaN);
//!   beyond that, non-finite values are not guarded against anywhere in
//!   the loop.
//!
//! Conventions
//! -----------
//! - `run` borrows the cost function mutably and the initial vector
//!   immutably; faults from the cost function abort the run via `?` with
//!   no partial result.
//! - `RunOutcome.cost_evals` counts every evaluation the run issued,
//!   including the initial one, mirroring how a solver reports its
//!   function-evaluation counters.
//!
//! Downstream usage
//! ----------------
//! - Each variant (Adam, RMSProp, SPSA, QNG, hybrid) implements
//!   [`Optimizer`]; callers generic over the trait can swap variants
//!   freely.
//!
//! Testing notes
//! -------------
//! - `BestSoFar` semantics are unit-tested here; evaluation budgets and
//!   convergence are covered per optimizer and in the integration suite.

use crate::{
    cost::CostFunction,
    errors::OptResult,
    types::{Cost, Theta},
};

/// Capability shared by every optimizer variant in this crate.
///
/// Purpose
/// -------
/// A single entrypoint, `run`, taking the black-box cost function and an
/// initial parameter vector and returning the best parameters and best
/// value observed, with evaluation-count diagnostics.
///
/// Notes
/// -----
/// - All implementations are single-threaded and synchronous; the cost
///   function is never called concurrently.
/// - Configuration is validated at construction, so `run` only fails on
///   invalid initial parameters or a propagated cost-function fault.
pub trait Optimizer {
    /// Minimize `cost_fn` starting from `initial`.
    ///
    /// Errors
    /// ------
    /// - Initial-parameter errors, raised before any cost evaluation.
    /// - Any fault from `cost_fn`, forwarded unchanged.
    fn run<C: CostFunction>(&self, cost_fn: &mut C, initial: &Theta) -> OptResult<RunOutcome>;
}

/// Result of a completed optimizer run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    /// Parameters that produced the lowest observed cost.
    pub best_params: Theta,
    /// Lowest cost observed during the run (including the initial
    /// evaluation).
    pub best_value: Cost,
    /// Iterations executed; always equals the configured budget, since no
    /// optimizer in this crate stops early.
    pub iterations: usize,
    /// Total cost evaluations issued by the run, initial evaluation
    /// included.
    pub cost_evals: usize,
}

/// Running record of the lowest cost observed and the parameters that
/// produced it.
///
/// Initialized from the cost of the starting parameters; updated only on
/// strict improvement, so it never regresses.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct BestSoFar {
    pub(crate) params: Theta,
    pub(crate) value: Cost,
}

impl BestSoFar {
    /// Evaluate the starting parameters once and seed the record with the
    /// result. This is the `+ 1` in every optimizer's evaluation budget.
    pub(crate) fn init<C: CostFunction>(cost_fn: &mut C, theta0: &Theta) -> OptResult<Self> {
        let value = cost_fn.evaluate(theta0)?;
        Ok(Self { params: theta0.clone(), value })
    }

    /// Record `theta`/`value` if `value` strictly improves on the best.
    ///
    /// The snapshot is a clone; the record never aliases the in-progress
    /// iterate. NaN values never pass the strict comparison.
    pub(crate) fn observe(&mut self, theta: &Theta, value: Cost) {
        if value < self.value {
            self.value = value;
            self.params = theta.clone();
        }
    }

    /// Consume the record into a [`RunOutcome`].
    pub(crate) fn into_outcome(self, iterations: usize, cost_evals: usize) -> RunOutcome {
        RunOutcome {
            best_params: self.params,
            best_value: self.value,
            iterations,
            cost_evals,
        }
    }
}
