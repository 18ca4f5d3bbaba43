//! Errors reported by the contention harness.

use core::fmt;

/// Which kind of worker thread a harness event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// A thread repeatedly calling `add`.
    Adder,
    /// A thread repeatedly calling `load`.
    Loader,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Role::Adder => "adder",
            Role::Loader => "loader",
        })
    }
}

/// The error type for a failed contention scenario.
///
/// The float cells themselves never fail; these variants describe either a
/// rejected configuration or a correctness violation detected by the harness.
#[derive(Debug, Clone, PartialEq)]
pub enum HarnessError {
    /// The scenario cannot produce a meaningful oracle.
    InvalidScenario(&'static str),
    /// The final value differs from the closed-form expected sum.
    Mismatch {
        /// `initial + increment * adders * operations`.
        expected: f64,
        /// What `load` returned after every worker joined.
        actual: f64,
    },
    /// A loader saw the value decrease although only non-negative increments
    /// were applied.
    NonMonotonicLoad {
        /// The earlier observation.
        previous: f64,
        /// The later, smaller observation.
        observed: f64,
    },
    /// A worker thread panicked before finishing.
    WorkerPanicked {
        /// The kind of worker that panicked.
        role: Role,
    },
}

impl fmt::Display for HarnessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HarnessError::InvalidScenario(reason) => write!(f, "invalid scenario: {reason}"),
            HarnessError::Mismatch { expected, actual } => {
                write!(f, "final value mismatch: got {actual}, want {expected}")
            }
            HarnessError::NonMonotonicLoad { previous, observed } => {
                write!(f, "load went backwards: observed {observed} after {previous}")
            }
            HarnessError::WorkerPanicked { role } => write!(f, "{role} thread panicked"),
        }
    }
}

impl std::error::Error for HarnessError {}
