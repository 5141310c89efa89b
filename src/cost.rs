//! cost — the cost-function boundary between optimizers and the backend.
//!
//! Purpose
//! -------
//! Define the single external interface of this crate: a black-box scalar
//! objective over a parameter vector. The excluded circuit/execution layer
//! (circuit construction, parameter binding, backend execution, measurement
//! reduction) lives entirely behind this trait; optimizers only ever see
//! `Theta -> Cost`.
//!
//! Key behaviors
//! -------------
//! - Define [`CostFunction`] with a fallible, `&mut self` evaluation method
//!   so externally stateful or noisy objectives need no interior
//!   mutability.
//! - Blanket-implement the trait for `FnMut(&Theta) -> OptResult<Cost>`
//!   closures and provide [`from_fn`] for infallible closures.
//! - Provide a crate-internal metering wrapper ([`MeteredCost`]) that
//!   counts evaluations for run diagnostics.
//!
//! Invariants & assumptions
//! ------------------------
//! - No smoothness, determinism, boundedness, or thread-safety is assumed
//!   of a cost function; it may be arbitrarily slow and may consult
//!   external state between calls.
//! - The only assumption made is invariance for a fixed input *during a
//!   single call* — i.e. `evaluate` returns one well-defined scalar per
//!   invocation.
//! - Cost functions are never called concurrently; every optimizer in this
//!   crate is single-threaded and synchronous.
//!
//! Conventions
//! -----------
//! - An `Err` from `evaluate` is a fault of the underlying backend and
//!   aborts the in-progress run unchanged (fail-fast, no retry).
//! - A returned NaN or infinity is *not* treated as a fault; it flows
//!   through the update rules unguarded (documented limitation).
//!
//! Downstream usage
//! ----------------
//! - Callers wrap their circuit-execution pipeline in a closure or a
//!   dedicated struct implementing [`CostFunction`] and hand it to any
//!   optimizer's `run`.
//! - Tests use [`from_fn`] with toy analytic objectives and counting
//!   closures.
//!
//! Testing notes
//! -------------
//! - Unit tests cover the closure blanket impl, the `from_fn` adapter, and
//!   the metering wrapper's count accuracy and error passthrough.

use crate::{
    errors::OptResult,
    types::{Cost, Theta},
};

/// Black-box scalar objective to be minimized.
///
/// Purpose
/// -------
/// Represent the caller-supplied cost function `Theta -> Cost`. Optimizers
/// may call it any nonnegative number of times per step and propagate any
/// fault it raises unmodified.
///
/// Notes
/// -----
/// - `evaluate` takes `&mut self` so that implementations backed by an
///   execution pipeline (job submission, result caching, shot counting)
///   can mutate their own state freely.
/// - Implemented for any `FnMut(&Theta) -> OptResult<Cost>`; infallible
///   closures can be adapted with [`from_fn`].
pub trait CostFunction {
    /// Evaluate the objective at `theta`.
    ///
    /// Errors
    /// ------
    /// - Any error the underlying objective raises; optimizers forward it
    ///   to their caller without retrying.
    fn evaluate(&mut self, theta: &Theta) -> OptResult<Cost>;
}

impl<F> CostFunction for F
where
    F: FnMut(&Theta) -> OptResult<Cost>,
{
    fn evaluate(&mut self, theta: &Theta) -> OptResult<Cost> {
        self(theta)
    }
}

/// Adapter wrapping an infallible closure as a [`CostFunction`].
///
/// Constructed via [`from_fn`]; exists so toy objectives and tests do not
/// have to spell out `OptResult` plumbing.
pub struct FromFn<F>(F);

/// from_fn — wrap an infallible closure as a [`CostFunction`].
///
/// Purpose
/// -------
/// Lift a plain `FnMut(&Theta) -> Cost` into the fallible cost-function
/// interface, so analytic objectives can be passed to optimizers directly.
///
/// Parameters
/// ----------
/// - `f`: closure mapping a parameter vector to a scalar cost; assumed
///   never to fail.
///
/// Returns
/// -------
/// A [`FromFn`] adapter whose `evaluate` always returns `Ok`.
///
/// Examples
/// --------
/// ```rust
/// # use vqa_optim::cost::{from_fn, CostFunction};
/// # use ndarray::array;
/// let mut cost = from_fn(|theta| (theta[0] - 2.0).powi(2) + 1.0);
/// let value = cost.evaluate(&array![2.0]).unwrap();
/// assert_eq!(value, 1.0);
/// ```
pub fn from_fn<F>(f: F) -> FromFn<F>
where
    F: FnMut(&Theta) -> Cost,
{
    FromFn(f)
}

impl<F> CostFunction for FromFn<F>
where
    F: FnMut(&Theta) -> Cost,
{
    fn evaluate(&mut self, theta: &Theta) -> OptResult<Cost> {
        Ok((self.0)(theta))
    }
}

/// Evaluation-counting wrapper used inside `run` implementations.
///
/// Forwards every call to the wrapped cost function and tallies it, so a
/// run can report its exact evaluation count in the outcome diagnostics.
/// Errors pass through untouched; the failed call is still counted.
pub(crate) struct MeteredCost<'a, C: CostFunction> {
    inner: &'a mut C,
    evals: usize,
}

impl<'a, C: CostFunction> MeteredCost<'a, C> {
    pub(crate) fn new(inner: &'a mut C) -> Self {
        Self { inner, evals: 0 }
    }

    /// Number of evaluations issued so far.
    pub(crate) fn evals(&self) -> usize {
        self.evals
    }
}

impl<C: CostFunction> CostFunction for MeteredCost<'_, C> {
    fn evaluate(&mut self, theta: &Theta) -> OptResult<Cost> {
        self.evals += 1;
        self.inner.evaluate(theta)
    }
}
