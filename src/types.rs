//! types — shared numeric aliases and default hyperparameters.
//!
//! Purpose
//! -------
//! Centralize the core numeric types and default constants used across the
//! optimizer subsystem. By defining these in one place, the rest of the
//! crate can stay agnostic to `ndarray` specifics and callers get a single
//! vocabulary for parameter vectors, gradients, and costs.
//!
//! Key behaviors
//! -------------
//! - Define canonical aliases for parameter vectors, gradients, and scalar
//!   costs (`Theta`, `Grad`, `Cost`).
//! - Expose the default finite-difference perturbation size
//!   (`DEFAULT_FD_EPSILON`) and the fixed SPSA decay exponents
//!   (`SPSA_PERTURBATION_DECAY`, `SPSA_STEP_DECAY`).
//!
//! Invariants & assumptions
//! ------------------------
//! - All optimizer vectors are represented as `ndarray` containers over
//!   `f64`.
//! - `Cost` is always a scalar `f64` in cost space; optimizers minimize it
//!   directly, with no sign flips anywhere in this crate.
//! - The SPSA decay exponents are part of the algorithm definition in this
//!   crate, not tunable configuration; changing them changes the optimizer.
//!
//! Conventions
//! -----------
//! - `Theta` and `Grad` are treated conceptually as column vectors with
//!   length equal to the number of free circuit parameters.
//! - This module defines no runtime behavior beyond what `ndarray` requires
//!   when these types are instantiated elsewhere.
//!
//! Downstream usage
//! ----------------
//! - Other modules import these aliases instead of referring directly to
//!   `ndarray` generics.
//! - Cost-function implementors use [`Theta`] and [`Cost`] as the standard
//!   argument and return types.
//!
//! Testing notes
//! -------------
//! - This module only defines type aliases and constants; there are no
//!   dedicated unit tests. Correctness is exercised indirectly by the
//!   optimizer and gradient tests.

use ndarray::Array1;

/// Parameter vector `θ` for a parametrized circuit (or any black-box cost).
///
/// Alias for `ndarray::Array1<f64>`, used as the canonical parameter type
/// throughout the crate.
pub type Theta = Array1<f64>;

/// Gradient (or gradient estimate) vector, matching the shape of `Theta`.
pub type Grad = Array1<f64>;

/// Scalar objective value returned by a cost function.
pub type Cost = f64;

/// Default perturbation size for symmetric finite differences.
pub const DEFAULT_FD_EPSILON: f64 = 1e-5;

/// Decay exponent for the SPSA perturbation size `ck = c / k^0.2`.
///
/// Standard SPSA schedule; not exposed as configuration.
pub const SPSA_PERTURBATION_DECAY: f64 = 0.2;

/// Decay exponent for the SPSA learning rate `ak = a / k^0.6`.
///
/// Standard SPSA schedule; not exposed as configuration.
pub const SPSA_STEP_DECAY: f64 = 0.6;
