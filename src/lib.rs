//! vqa_optim — black-box optimizers for variational quantum circuits.
//!
//! Purpose
//! -------
//! Provide the classical optimization loop of a variational workflow as a
//! self-contained crate: iterative first-order minimization of a
//! caller-supplied scalar cost function over a real parameter vector. The
//! circuit/execution layer (circuit construction, parameter binding,
//! backend execution, measurement reduction) is deliberately outside this
//! crate; it appears only as the [`cost::CostFunction`] boundary.
//!
//! Key behaviors
//! -------------
//! - Estimate gradients of the black box via symmetric finite differences
//!   (`gradient`), at `2n` cost evaluations per estimate.
//! - Minimize with adaptive-learning-rate descent (`Adam`, `RmsProp`),
//!   with gradient-free simultaneous perturbation (`Spsa`, 3 evaluations
//!   per step regardless of dimension), or with the identity-metric QNG
//!   placeholder (`Qng`).
//! - Adaptively switch between Adam and SPSA per iteration based on
//!   observed per-step wall-clock latency (`Hybrid`).
//!
//! Invariants & assumptions
//! ------------------------
//! - Cost functions are opaque: no smoothness, determinism, boundedness,
//!   or thread-safety is assumed, and they are never called concurrently.
//! - Every optimizer runs exactly its configured iteration budget, tracks
//!   the best observation under strict improvement, and returns best
//!   parameters and value by value.
//! - Faults from the cost function abort the in-progress run unchanged;
//!   invalid configuration is rejected at construction. NaN/Inf
//!   divergence through an update rule is not detected (documented
//!   limitation).
//!
//! Conventions
//! -----------
//! - Parameters, gradients, and costs use the `ndarray`-based aliases in
//!   [`types`] (`Theta`, `Grad`, `Cost`).
//! - Public fallible entrypoints return `OptResult<T>`; callers never see
//!   panics from validation paths.
//! - This crate performs no I/O and no logging; run diagnostics travel in
//!   [`optimizers::RunOutcome`], and progress reporting belongs to the
//!   operational layer around this crate.
//!
//! Downstream usage
//! ----------------
//! - Wrap the execution pipeline in a [`cost::CostFunction`] (a closure
//!   via [`cost::from_fn`] suffices), construct an optimizer, and call
//!   [`optimizers::Optimizer::run`].
//! - Import the curated surface via `vqa_optim::prelude::*`.
//!
//! Testing notes
//! -------------
//! - Unit tests live next to each module; `tests/` holds the end-to-end
//!   suite driving every optimizer through the trait surface on toy
//!   objectives.

pub mod cost;
pub mod errors;
pub mod gradient;
pub mod optimizers;
pub mod types;
pub mod validation;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use vqa_optim::prelude::*;
//
// to import the main optimizer surface in a single line.

pub mod prelude {
    pub use super::cost::{from_fn, CostFunction};
    pub use super::errors::{OptError, OptResult};
    pub use super::gradient::FiniteDiffGradient;
    pub use super::optimizers::{Adam, Hybrid, Optimizer, Qng, RmsProp, RunOutcome, Spsa};
    pub use super::types::{Cost, Grad, Theta};
}
