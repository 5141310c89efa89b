//! optimizers — the five optimizer variants behind one `run` capability.
//!
//! Purpose
//! -------
//! Collect the crate's optimizer implementations — Adam, RMSProp, SPSA,
//! the identity-metric QNG placeholder, and the latency-adaptive hybrid —
//! behind the single [`Optimizer`] capability, together with the shared
//! run bookkeeping ([`RunOutcome`] and the crate-internal best-so-far
//! record).
//!
//! Key behaviors
//! -------------
//! - Every variant owns its whole minimization loop: it runs exactly its
//!   configured iteration budget (no early stopping, no convergence
//!   check), tracks the best observation under a strict-improvement
//!   policy, and returns best parameters and value by value.
//! - Configuration is validated at construction; `run` validates the
//!   initial vector before the first cost evaluation and otherwise only
//!   fails by propagating a cost-function fault.
//!
//! Invariants & assumptions
//! ------------------------
//! - All variants are single-threaded, synchronous, and non-suspending;
//!   the cost function is never called concurrently and never cancelled.
//! - Per-variant evaluation budgets are exact and documented on each
//!   type: `maxiter * (2n + 1) + 1` for the finite-difference variants,
//!   `3 * maxiter + 1` for SPSA, selection-dependent for the hybrid.
//! - Nothing persists across separate `run` invocations; optimizer state
//!   lives and dies inside one call.
//!
//! Conventions
//! -----------
//! - The gradient-based variants share the [`gradient`] estimator and the
//!   validation guards; SPSA deliberately bypasses the estimator to keep
//!   its per-step cost dimension-independent.
//! - NaN/Inf flowing through an update rule is not guarded anywhere in
//!   this module (documented subsystem limitation).
//!
//! Downstream usage
//! ----------------
//! - Callers construct a variant, wrap their objective as a
//!   [`CostFunction`], and call `run`; code generic over [`Optimizer`]
//!   can swap variants freely.
//! - Front-ends typically import the curated surface via
//!   `vqa_optim::prelude::*`.
//!
//! Testing notes
//! -------------
//! - Each variant carries unit tests for its constructor guards,
//!   evaluation budget, and convergence behavior; `tests/` exercises the
//!   trait surface end to end.
//!
//! [`gradient`]: crate::gradient
//! [`CostFunction`]: crate::cost::CostFunction

pub mod adam;
pub mod hybrid;
pub mod qng;
pub mod rmsprop;
pub mod spsa;
pub mod traits;

pub use adam::Adam;
pub use hybrid::Hybrid;
pub use qng::Qng;
pub use rmsprop::RmsProp;
pub use spsa::Spsa;
pub use traits::{Optimizer, RunOutcome};
