//! validation — shared configuration and input guards.
//!
//! Purpose
//! -------
//! Collect the `verify_*` / `validate_*` guard functions used by optimizer
//! constructors and `run` entrypoints, so each invariant is enforced in one
//! place and every violation maps to a specific [`OptError`] variant.
//!
//! Key behaviors
//! -------------
//! - Verify hyperparameters at construction time (iteration budgets,
//!   learning-rate-like scales, decay rates, stability and perturbation
//!   constants, latency thresholds).
//! - Validate the caller's initial parameter vector at `run` entry, before
//!   the first cost evaluation.
//!
//! Invariants & assumptions
//! ------------------------
//! - Guards are pure: they read their arguments and either return `Ok(())`
//!   or a descriptive error; they never mutate or panic.
//! - A configuration that passes these guards never causes a validation
//!   failure later in the run; everything that can go wrong afterwards is
//!   a cost-function fault or unguarded numerical divergence.
//!
//! Conventions
//! -----------
//! - `verify_*` functions check scalar hyperparameters; `validate_*`
//!   functions check caller-supplied vectors.
//! - `name` arguments identify which hyperparameter was rejected when one
//!   error variant serves several fields (e.g. `lr` vs SPSA `a`).
//!
//! Downstream usage
//! ----------------
//! - Every optimizer's `new` calls the relevant `verify_*` guards and
//!   returns `OptResult<Self>`.
//! - Every optimizer's `run` calls [`validate_initial_params`] before
//!   touching the cost function, which is what guarantees the
//!   "no cost call on invalid input" contract.
//!
//! Testing notes
//! -------------
//! - Unit tests cover each guard's accept and reject paths, including the
//!   boundary values (zero budgets, decay rate exactly 1.0, zero epsilon).

use crate::{
    errors::{OptError, OptResult},
    types::Theta,
};

/// Reject a zero iteration budget.
pub fn verify_maxiter(maxiter: usize) -> OptResult<()> {
    if maxiter == 0 {
        return Err(OptError::InvalidMaxIter {
            maxiter,
            reason: "Iteration budget must be greater than zero.",
        });
    }
    Ok(())
}

/// Reject a non-positive or non-finite learning-rate-like scale.
///
/// Covers Adam/RMSProp `lr`, the SPSA learning-rate scale `a`, and the QNG
/// step size; `name` records which one was rejected.
pub fn verify_learning_rate(name: &'static str, value: f64) -> OptResult<()> {
    if !value.is_finite() {
        return Err(OptError::InvalidLearningRate {
            name,
            value,
            reason: "Learning rate must be finite.",
        });
    }
    if value <= 0.0 {
        return Err(OptError::InvalidLearningRate {
            name,
            value,
            reason: "Learning rate must be positive.",
        });
    }
    Ok(())
}

/// Reject a decay rate outside `[0, 1)`.
///
/// Covers Adam's `beta1`/`beta2` and RMSProp's `alpha`.
pub fn verify_decay_rate(name: &'static str, value: f64) -> OptResult<()> {
    if !value.is_finite() || value < 0.0 || value >= 1.0 {
        return Err(OptError::InvalidDecayRate {
            name,
            value,
            reason: "Decay rates must lie in [0, 1).",
        });
    }
    Ok(())
}

/// Reject a non-positive or non-finite numerical-stability constant.
pub fn verify_stability_eps(value: f64) -> OptResult<()> {
    if !value.is_finite() {
        return Err(OptError::InvalidStabilityEps {
            value,
            reason: "Stability epsilon must be finite.",
        });
    }
    if value <= 0.0 {
        return Err(OptError::InvalidStabilityEps {
            value,
            reason: "Stability epsilon must be positive.",
        });
    }
    Ok(())
}

/// Reject a zero or non-finite finite-difference perturbation.
///
/// Zero is the invalid-configuration case called out by the gradient
/// estimator's contract; sign is not constrained.
pub fn verify_fd_epsilon(value: f64) -> OptResult<()> {
    if !value.is_finite() {
        return Err(OptError::InvalidFdEpsilon {
            value,
            reason: "Perturbation must be finite.",
        });
    }
    if value == 0.0 {
        return Err(OptError::InvalidFdEpsilon {
            value,
            reason: "Perturbation must be nonzero.",
        });
    }
    Ok(())
}

/// Reject a non-positive or non-finite SPSA perturbation scale `c`.
pub fn verify_perturbation_scale(value: f64) -> OptResult<()> {
    if !value.is_finite() {
        return Err(OptError::InvalidPerturbationScale {
            value,
            reason: "Perturbation scale must be finite.",
        });
    }
    if value <= 0.0 {
        return Err(OptError::InvalidPerturbationScale {
            value,
            reason: "Perturbation scale must be positive.",
        });
    }
    Ok(())
}

/// Reject a negative or non-finite latency threshold.
///
/// Zero is permitted: it makes every observed step "slow" and pins the
/// hybrid policy to the perturbation child after the first iteration.
pub fn verify_latency_threshold(seconds: f64) -> OptResult<()> {
    if !seconds.is_finite() {
        return Err(OptError::InvalidLatencyThreshold {
            seconds,
            reason: "Latency threshold must be finite.",
        });
    }
    if seconds < 0.0 {
        return Err(OptError::InvalidLatencyThreshold {
            seconds,
            reason: "Latency threshold must be non-negative.",
        });
    }
    Ok(())
}

/// validate_initial_params — guard the caller's starting vector.
///
/// Purpose
/// -------
/// Check the initial parameter vector at `run` entry: nonempty, all-finite,
/// and matching the optimizer's expected dimensionality when one was
/// configured. Runs strictly before the first cost evaluation.
///
/// Parameters
/// ----------
/// - `theta`: the caller's starting vector.
/// - `expected_dim`: the optimizer's configured dimensionality, if any.
///
/// Errors
/// ------
/// - [`OptError::EmptyInitialParams`] for a zero-length vector.
/// - [`OptError::InitialParamsDimMismatch`] when `expected_dim` is set and
///   does not match `theta.len()`.
/// - [`OptError::InvalidInitialParam`] for the first NaN or infinite entry.
pub fn validate_initial_params(theta: &Theta, expected_dim: Option<usize>) -> OptResult<()> {
    if theta.is_empty() {
        return Err(OptError::EmptyInitialParams);
    }
    if let Some(expected) = expected_dim {
        if theta.len() != expected {
            return Err(OptError::InitialParamsDimMismatch {
                expected,
                found: theta.len(),
            });
        }
    }
    for (index, &value) in theta.iter().enumerate() {
        if !value.is_finite() {
            return Err(OptError::InvalidInitialParam { index, value });
        }
    }
    Ok(())
}
