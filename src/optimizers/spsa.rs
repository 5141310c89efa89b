//! optimizers::spsa — simultaneous perturbation stochastic approximation.
//!
//! Purpose
//! -------
//! Implement gradient-free descent with a single random-direction two-point
//! cost estimator and decaying step sizes. SPSA's defining property: the
//! per-iteration evaluation count is independent of the parameter
//! dimension, which is why it exists alongside the O(n) finite-difference
//! estimator rather than being unified with it.
//!
//! Key behaviors
//! -------------
//! - At iteration `k` (1-indexed), decay the perturbation size
//!   `ck = c / k^0.2` and the learning rate `ak = a / k^0.6` (fixed
//!   exponents, part of the algorithm definition).
//! - Draw one independent ±1 (Rademacher) sign per coordinate, evaluate
//!   the cost at `θ ± ck·δ` (exactly 2 calls regardless of dimension),
//!   form `g[i] = (f₊ − f₋) / (2·ck·δ[i])`, and step `θ −= ak·g`.
//! - Evaluate once more at the new parameters and feed the best-so-far
//!   record.
//!
//! Invariants & assumptions
//! ------------------------
//! - Evaluation budget: `3 * maxiter + 1` cost calls, independent of
//!   dimension.
//! - The only persistent per-run state is the iteration counter and the
//!   random generator; there are no moment accumulators.
//! - Randomness is injectable: a seeded `StdRng` makes runs fully
//!   reproducible; without a seed the generator is drawn from entropy.
//!
//! Conventions
//! -----------
//! - Defaults: `maxiter = 100`, `c = 0.1`, `a = 0.01`, unseeded.
//!
//! Downstream usage
//! ----------------
//! - Standalone via [`Optimizer::run`], or stepped one iteration at a time
//!   as the perturbation child of the hybrid optimizer (where the counter
//!   and generator persist across outer iterations).
//!
//! Testing notes
//! -------------
//! - Unit tests cover the dimension-independent evaluation budget, seeded
//!   reproducibility, and convergence on the reference quadratic.

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    cost::{CostFunction, MeteredCost},
    errors::OptResult,
    optimizers::traits::{BestSoFar, Optimizer, RunOutcome},
    types::{Grad, Theta, SPSA_PERTURBATION_DECAY, SPSA_STEP_DECAY},
    validation::{
        validate_initial_params, verify_learning_rate, verify_maxiter, verify_perturbation_scale,
    },
};

/// SPSA optimizer with a seedable perturbation-direction generator.
#[derive(Debug, Clone, PartialEq)]
pub struct Spsa {
    maxiter: usize,
    c: f64,
    a: f64,
    seed: Option<u64>,
    expected_dim: Option<usize>,
}

/// SPSA per-run state: the 1-indexed iteration counter driving the decay
/// schedules, and the sign generator.
///
/// When stepped by the hybrid optimizer, this state persists across outer
/// iterations, so the counter advances only on iterations where SPSA
/// actually ran.
#[derive(Debug, Clone)]
pub(crate) struct SpsaState {
    k: u64,
    rng: StdRng,
}

impl SpsaState {
    pub(crate) fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { k: 0, rng }
    }
}

impl Spsa {
    /// Create an SPSA optimizer with explicit scales.
    ///
    /// Parameters
    /// ----------
    /// - `maxiter`: iteration budget; must be positive.
    /// - `c`: perturbation-size scale; must be positive and finite.
    /// - `a`: learning-rate scale; must be positive and finite.
    ///
    /// Errors
    /// ------
    /// - The matching `Invalid*` configuration variant for the first scale
    ///   that fails its guard.
    pub fn new(maxiter: usize, c: f64, a: f64) -> OptResult<Self> {
        verify_maxiter(maxiter)?;
        verify_perturbation_scale(c)?;
        verify_learning_rate("a", a)?;
        Ok(Self { maxiter, c, a, seed: None, expected_dim: None })
    }

    /// Fix the generator seed, making every run of this optimizer fully
    /// reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Declare the parameter dimensionality this optimizer expects.
    pub fn with_expected_dim(mut self, dim: usize) -> Self {
        self.expected_dim = Some(dim);
        self
    }

    pub(crate) fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// One SPSA iteration: decayed scales, one Rademacher direction, two
    /// perturbed evaluations, the two-point gradient estimate, the update,
    /// and one post-update evaluation into `best`.
    ///
    /// Issues exactly 3 cost evaluations regardless of `theta.len()`.
    pub(crate) fn step<C: CostFunction>(
        &self, state: &mut SpsaState, cost_fn: &mut C, theta: &mut Theta, best: &mut BestSoFar,
    ) -> OptResult<()> {
        state.k += 1;
        let k = state.k as f64;
        let ck = self.c / k.powf(SPSA_PERTURBATION_DECAY);
        let ak = self.a / k.powf(SPSA_STEP_DECAY);

        let rng = &mut state.rng;
        let delta =
            Grad::from_shape_fn(theta.len(), |_| if rng.gen_bool(0.5) { 1.0 } else { -1.0 });

        let theta_plus = &*theta + &(&delta * ck);
        let theta_minus = &*theta - &(&delta * ck);
        let f_plus = cost_fn.evaluate(&theta_plus)?;
        let f_minus = cost_fn.evaluate(&theta_minus)?;

        // delta[i] is ±1, so dividing by it is the same as multiplying;
        // written as a division to match the estimator's definition.
        let estimate = delta.mapv(|d| (f_plus - f_minus) / (2.0 * ck * d));
        *theta -= &(&estimate * ak);

        let value = cost_fn.evaluate(theta)?;
        best.observe(theta, value);
        Ok(())
    }
}

impl Default for Spsa {
    fn default() -> Self {
        Self { maxiter: 100, c: 0.1, a: 0.01, seed: None, expected_dim: None }
    }
}

impl Optimizer for Spsa {
    fn run<C: CostFunction>(&self, cost_fn: &mut C, initial: &Theta) -> OptResult<RunOutcome> {
        validate_initial_params(initial, self.expected_dim)?;
        let mut metered = MeteredCost::new(cost_fn);
        let mut theta = initial.clone();
        let mut best = BestSoFar::init(&mut metered, &theta)?;
        let mut state = SpsaState::new(self.seed);

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
    // - Constructor validation of the SPSA scales.
    // - The dimension-independent `3 * maxiter + 1` evaluation budget.
    // - Seeded reproducibility of full runs.
    // - Convergence on the reference quadratic.
    //
    // They intentionally DO NOT cover:
    // - Hybrid stepping semantics (hybrid tests).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify constructor rejection of non-positive scales.
    //
    // Given
    // -----
    // - `c = 0.0` and `a = -0.01`.
    //
    // Expect
    // ------
    // - `InvalidPerturbationScale` and `InvalidLearningRate` naming "a".
    fn new_rejects_nonpositive_scales() {
        assert!(matches!(
            Spsa::new(10, 0.0, 0.01).unwrap_err(),
            OptError::InvalidPerturbationScale { .. }
        ));
        assert!(matches!(
            Spsa::new(10, 0.1, -0.01).unwrap_err(),
            OptError::InvalidLearningRate { name: "a", .. }
        ));
    }

    #[test]
    // Purpose
    // -------
    // Verify the evaluation budget is `3 * maxiter + 1` for two very
    // different dimensions — the property that distinguishes SPSA from the
    // finite-difference estimator.
    //
    // Given
    // -----
    // - `maxiter = 11` over a 1-dimensional and a 4-dimensional quadratic.
    //
    // Expect
    // ------
    // - Exactly 34 evaluations in both cases.
    fn evaluation_budget_is_independent_of_dimension() {
        for initial in [array![1.0], array![1.0, -2.0, 0.5, 3.0]] {
            // Arrange
            let opt = Spsa::new(11, 0.1, 0.01).unwrap().with_seed(7);
            let mut calls = 0usize;
            let mut cost = from_fn(|t: &Theta| {
                calls += 1;
                t.dot(t)
            });

            // Act
            let outcome = opt.run(&mut cost, &initial).unwrap();

            // Assert
            drop(cost);
            assert_eq!(calls, 3 * 11 + 1);
            assert_eq!(outcome.cost_evals, calls);
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify that two runs with the same seed produce bitwise-identical
    // outcomes, and that the seed fully determines the perturbation
    // sequence.
    //
    // Given
    // -----
    // - Two identical seeded optimizers run on the same quadratic.
    //
    // Expect
    // ------
    // - Equal best parameters and best values.
    fn seeded_runs_are_reproducible() {
        // Arrange
        let cost_builder = || from_fn(|t: &Theta| (t[0] - 1.0).powi(2) + (t[1] + 2.0).powi(2));
        let initial = array![0.0, 0.0];

        // Act
        let first = Spsa::new(50, 0.2, 0.1)
            .unwrap()
            .with_seed(1234)
            .run(&mut cost_builder(), &initial)
            .unwrap();
        let second = Spsa::new(50, 0.2, 0.1)
            .unwrap()
            .with_seed(1234)
            .run(&mut cost_builder(), &initial)
            .unwrap();

        // Assert
        assert_eq!(first.best_params, second.best_params);
        assert_eq!(first.best_value, second.best_value);
    }

    #[test]
    // Purpose
    // -------
    // Verify convergence on the reference shifted quadratic from a distant
    // start.
    //
    // Given
    // -----
    // - `f(x) = (x + 3)² + 2`, `maxiter = 300`, `c = 0.2`, `a = 0.1`,
    //   start at 10.
    //
    // Expect
    // ------
    // - Best value below 3 (the optimum is 2 at x = −3).
    fn run_converges_on_shifted_quadratic() {
        // Arrange
        let opt = Spsa::new(300, 0.2, 0.1).unwrap().with_seed(42);
        let mut cost = from_fn(|t: &Theta| (t[0] + 3.0).powi(2) + 2.0);

        // Act
        let outcome = opt.run(&mut cost, &array![10.0]).unwrap();

        // Assert
        assert!(
            outcome.best_value < 3.0,
            "best value {} should be below 3",
            outcome.best_value
        );
        assert!((outcome.best_params[0] + 3.0).abs() < 1.0);
    }
}
