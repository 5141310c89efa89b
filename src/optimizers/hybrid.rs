//! optimizers::hybrid — latency-adaptive selection between Adam and SPSA.
//!
//! Purpose
//! -------
//! Wrap one classical child (Adam) and one perturbation child (SPSA) and
//! decide, per outer iteration, which of the two executes the next step,
//! based on the observed wall-clock latency of the previous step. Slow
//! steps (typically a congested or noisy execution backend making the
//! O(n) finite-difference gradient expensive) push the policy toward
//! SPSA's dimension-independent 3-evaluation step; fast steps pull it back
//! to Adam.
//!
//! Key behaviors
//! -------------
//! - The first iteration runs the classical child.
//! - After each step: if its elapsed wall-clock time strictly exceeds the
//!   latency threshold, the next iteration's child is the perturbation
//!   one; at or below the threshold, the classical one. The decision is
//!   re-evaluated every iteration — it is never sticky.
//! - Both children report into one shared best-so-far record; the run
//!   returns the overall best across both.
//!
//! Invariants & assumptions
//! ------------------------
//! - Child configurations are fixed at construction (Adam `maxiter = 1`,
//!   `lr = 0.01`; SPSA `maxiter = 1`, `c = 0.1`, `a = 0.01`); child
//!   *state* is allocated once at `run` entry and persists across outer
//!   iterations. Consequently Adam's moment accumulators and step counter
//!   advance only on iterations where Adam actually ran: its
//!   bias-correction exponents track Adam's own selection count, not the
//!   outer iteration index. This coupling is part of the contract; do not
//!   change it without flagging the change.
//! - Latency measurement is observational only: a slow step is never
//!   cancelled or timed out, it merely influences the next selection.
//! - Cost-function faults propagate unchanged from whichever child was
//!   active; there is no retry or recovery.
//!
//! Conventions
//! -----------
//! - Defaults: `maxiter = 100`, latency threshold 1.0 s.
//!
//! Testing notes
//! -------------
//! - The policy function is unit-tested directly; full-run behavior is
//!   pinned through evaluation-count signatures (an Adam step costs
//!   `2n + 1` evaluations, an SPSA step costs 3) with fast and
//!   artificially slow cost functions, and through trajectory equality
//!   with a standalone Adam run when every step is fast.

use std::time::{Duration, Instant};

use crate::{
    cost::{CostFunction, MeteredCost},
    errors::OptResult,
    optimizers::{
        adam::{Adam, AdamState},
        spsa::{Spsa, SpsaState},
        traits::{BestSoFar, Optimizer, RunOutcome},
    },
    types::Theta,
    validation::{validate_initial_params, verify_latency_threshold, verify_maxiter},
};

/// Which child optimizer executes the next outer iteration.
///
/// Exactly one child is active per iteration; the policy re-selects after
/// every step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ActiveChild {
    Classical,
    Perturbation,
}

/// Latency policy: strictly-slow steps hand the next iteration to the
/// perturbation child, everything else to the classical one.
fn next_active(elapsed: Duration, threshold: Duration) -> ActiveChild {
    if elapsed > threshold {
        ActiveChild::Perturbation
    } else {
        ActiveChild::Classical
    }
}

/// Hybrid optimizer switching between an Adam child and an SPSA child on
/// observed per-step latency.
#[derive(Debug, Clone, PartialEq)]
pub struct Hybrid {
    maxiter: usize,
    latency_threshold: Duration,
    adam: Adam,
    spsa: Spsa,
    expected_dim: Option<usize>,
}

impl Hybrid {
    /// Create a hybrid optimizer.
    ///
    /// Parameters
    /// ----------
    /// - `maxiter`: outer-iteration budget; must be positive.
    /// - `latency_threshold_seconds`: per-step wall-clock threshold; must
    ///   be non-negative and finite. Zero pins the policy to the
    ///   perturbation child after the first iteration.
    ///
    /// Errors
    /// ------
    /// - `InvalidMaxIter` or `InvalidLatencyThreshold` for a rejected
    ///   configuration; no partial construction.
    pub fn new(maxiter: usize, latency_threshold_seconds: f64) -> OptResult<Self> {
        verify_maxiter(maxiter)?;
        verify_latency_threshold(latency_threshold_seconds)?;
        Ok(Self {
            maxiter,
            latency_threshold: Duration::from_secs_f64(latency_threshold_seconds),
            adam: Adam::new(1, 0.01, 0.9, 0.999, 1e-8)?,
            spsa: Spsa::new(1, 0.1, 0.01)?,
            expected_dim: None,
        })
    }

    /// Seed the perturbation child's generator, making runs reproducible
    /// for a fixed latency pattern.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.spsa = self.spsa.with_seed(seed);
        self
    }

    /// Declare the parameter dimensionality this optimizer expects.
    pub fn with_expected_dim(mut self, dim: usize) -> Self {
        self.expected_dim = Some(dim);
        self
    }
}

impl Default for Hybrid {
    fn default() -> Self {
        // Both child constructions are infallible for these constants.
        Self::new(100, 1.0).expect("default hybrid configuration is valid")
    }
}

impl Optimizer for Hybrid {
    /// Minimize `cost_fn` over `maxiter` outer iterations, one child step
    /// per iteration.
    ///
    /// Each Adam step issues `2n + 1` cost evaluations, each SPSA step 3;
    /// the total therefore depends on how often each child was selected,
    /// plus the one initial evaluation.
    fn run<C: CostFunction>(&self, cost_fn: &mut C, initial: &Theta) -> OptResult<RunOutcome> {
        validate_initial_params(initial, self.expected_dim)?;
        let mut metered = MeteredCost::new(cost_fn);
        let mut theta = initial.clone();
        let mut best = BestSoFar::init(&mut metered, &theta)?;

        // Child state outlives the outer loop: moments, the SPSA counter,
        // and the sign generator all persist across selections.
        let mut adam_state = AdamState::zeros(theta.len());
        let mut spsa_state = SpsaState::new(self.spsa.seed());
        let mut active = ActiveChild::Classical;

        for _ in 0..self.maxiter {
            let started = Instant::now();
            match active {
                ActiveChild::Classical => {
                    self.adam.step(&mut adam_state, &mut metered, &mut theta, &mut best)?;
                }
                ActiveChild::Perturbation => {
                    self.spsa.step(&mut spsa_state, &mut metered, &mut theta, &mut best)?;
                }
            }
            active = next_active(started.elapsed(), self.latency_threshold);
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
    use std::thread::sleep;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The latency policy function, including the at-threshold boundary.
    // - Evaluation-count signatures for all-fast and all-slow cost
    //   functions (which child ran is visible in the totals).
    // - Child-state persistence via trajectory equality with standalone
    //   Adam.
    // - Fault propagation through a child step.
    //
    // They intentionally DO NOT cover:
    // - Convergence quality of the children themselves (their own tests).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify the policy: strictly above the threshold selects the
    // perturbation child; at or below selects the classical one.
    //
    // Given
    // -----
    // - Elapsed times below, exactly at, and above a 10 ms threshold.
    //
    // Expect
    // ------
    // - Classical, Classical, Perturbation respectively.
    fn policy_switches_only_on_strictly_exceeding_threshold() {
        let threshold = Duration::from_millis(10);

        assert_eq!(next_active(Duration::from_millis(5), threshold), ActiveChild::Classical);
        assert_eq!(next_active(threshold, threshold), ActiveChild::Classical);
        assert_eq!(next_active(Duration::from_millis(11), threshold), ActiveChild::Perturbation);
    }

    #[test]
    // Purpose
    // -------
    // Verify that a fast cost function keeps the classical child active for
    // the whole run, observable as the Adam evaluation signature.
    //
    // Given
    // -----
    // - Dimension 2, `maxiter = 4`, a generous 1 s threshold, an
    //   instantaneous quadratic cost.
    //
    // Expect
    // ------
    // - `1 + 4 * (2*2 + 1) = 21` evaluations (every step was an Adam
    //   step).
    fn fast_steps_keep_classical_child_active() {
        // Arrange
        let opt = Hybrid::new(4, 1.0).unwrap().with_seed(3);
        let mut calls = 0usize;
        let mut cost = from_fn(|t: &Theta| {
            calls += 1;
            t.dot(t)
        });

        // Act
        let outcome = opt.run(&mut cost, &array![0.3, -0.4]).unwrap();

        // Assert
        drop(cost);
        assert_eq!(calls, 1 + 4 * 5);
        assert_eq!(outcome.cost_evals, calls);
        assert_eq!(outcome.iterations, 4);
    }

    #[test]
    // Purpose
    // -------
    // Verify that steps exceeding the threshold hand every subsequent
    // iteration to the perturbation child, observable as one Adam
    // signature followed by SPSA signatures.
    //
    // Given
    // -----
    // - Dimension 2, `maxiter = 4`, a 1 ms threshold, a cost that sleeps
    //   5 ms per call (so any step of ≥ 2 calls is strictly slow).
    //
    // Expect
    // ------
    // - `1 + 5 + 3 * 3 = 15` evaluations: the initial one, one Adam step,
    //   then three SPSA steps.
    fn slow_steps_hand_over_to_perturbation_child() {
        // Arrange
        let opt = Hybrid::new(4, 0.001).unwrap().with_seed(3);
        let mut calls = 0usize;
        let mut cost = from_fn(|t: &Theta| {
            calls += 1;
            sleep(Duration::from_millis(5));
            t.dot(t)
        });

        // Act
        let outcome = opt.run(&mut cost, &array![0.3, -0.4]).unwrap();

        // Assert
        drop(cost);
        assert_eq!(calls, 1 + 5 + 3 * 3);
        assert_eq!(outcome.cost_evals, calls);
    }

    #[test]
    // Purpose
    // -------
    // Verify that the classical child's moment state persists across outer
    // iterations: with a fast cost the hybrid trajectory must be
    // bit-identical to a standalone Adam run with the child's
    // hyperparameters. A per-iteration state reset would change the
    // bias-correction exponents and diverge immediately.
    //
    // Given
    // -----
    // - A fast 2-dimensional quadratic, `maxiter = 30` for both the hybrid
    //   and a standalone Adam with `lr = 0.01`.
    //
    // Expect
    // ------
    // - Identical best parameters, best values, and evaluation counts.
    fn hybrid_with_fast_cost_matches_standalone_adam() {
        // Arrange
        let cost_builder =
            || from_fn(|t: &Theta| (t[0] - 1.0).powi(2) + (t[1] + 0.5).powi(2) + 3.0);
        let initial = array![0.0, 0.0];

        // Act
        let hybrid_outcome = Hybrid::new(30, 1.0)
            .unwrap()
            .run(&mut cost_builder(), &initial)
            .unwrap();
        let adam_outcome = Adam::new(30, 0.01, 0.9, 0.999, 1e-8)
            .unwrap()
            .run(&mut cost_builder(), &initial)
            .unwrap();

        // Assert
        assert_eq!(hybrid_outcome.best_params, adam_outcome.best_params);
        assert_eq!(hybrid_outcome.best_value, adam_outcome.best_value);
        assert_eq!(hybrid_outcome.cost_evals, adam_outcome.cost_evals);
    }

    #[test]
    // Purpose
    // -------
    // Verify fail-fast fault propagation: an error from the cost function
    // mid-run aborts the hybrid run with that exact error.
    //
    // Given
    // -----
    // - A cost that faults on its fourth call (inside the first Adam
    //   step's gradient estimate).
    //
    // Expect
    // ------
    // - `run` returns the fault verbatim.
    fn cost_fault_aborts_run_unchanged() {
        // Arrange
        let opt = Hybrid::new(5, 1.0).unwrap();
        let mut calls = 0usize;
        let mut cost = |t: &Theta| {
            calls += 1;
            if calls == 4 {
                Err(OptError::CostFunctionFault { text: "backend revoked".to_string() })
            } else {
                Ok(t.dot(t))
            }
        };

        // Act
        let err = opt.run(&mut cost, &array![1.0, 2.0]).unwrap_err();

        // Assert
        assert_eq!(err, OptError::CostFunctionFault { text: "backend revoked".to_string() });
    }

    #[test]
    // Purpose
    // -------
    // Verify constructor rejection of invalid outer configuration.
    //
    // Given
    // -----
    // - A zero budget and a negative threshold.
    //
    // Expect
    // ------
    // - `InvalidMaxIter` and `InvalidLatencyThreshold`.
    fn new_rejects_invalid_configuration() {
        assert!(matches!(Hybrid::new(0, 1.0).unwrap_err(), OptError::InvalidMaxIter { .. }));
        assert!(matches!(
            Hybrid::new(10, -1.0).unwrap_err(),
            OptError::InvalidLatencyThreshold { .. }
        ));
    }
}
