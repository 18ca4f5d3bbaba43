//! Runtime selection of a float cell implementation.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Names one of the [`AtomicFloat`](super::AtomicFloat) implementations.
///
/// Used to pick a strategy at runtime (harness configuration, benchmark
/// labels, reports).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// [`BitwiseAtomicF64`](super::BitwiseAtomicF64).
    Bitwise,
    /// [`BackoffAtomicF64`](super::BackoffAtomicF64).
    Backoff,
    /// [`LockingAtomicF64`](super::LockingAtomicF64).
    Locking,
}

impl Strategy {
    /// Every strategy, in a stable order.
    pub const ALL: [Strategy; 3] = [Strategy::Bitwise, Strategy::Backoff, Strategy::Locking];

    /// The lower-case name used in reports and on the command line.
    pub const fn as_str(self) -> &'static str {
        match self {
            Strategy::Bitwise => "bitwise",
            Strategy::Backoff => "backoff",
            Strategy::Locking => "locking",
        }
    }

    /// Whether callers of this strategy may block on a lock.
    pub const fn is_blocking(self) -> bool {
        matches!(self, Strategy::Locking)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no known strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStrategyError(String);

impl fmt::Display for ParseStrategyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown strategy `{}` (expected bitwise, backoff or locking)", self.0)
    }
}

impl std::error::Error for ParseStrategyError {}

impl FromStr for Strategy {
    type Err = ParseStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Strategy::ALL
            .into_iter()
            .find(|strategy| strategy.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseStrategyError(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        for strategy in Strategy::ALL {
            assert_eq!(strategy.to_string().parse::<Strategy>(), Ok(strategy));
        }
        assert_eq!("LOCKING".parse::<Strategy>(), Ok(Strategy::Locking));
        assert!("mutex".parse::<Strategy>().is_err());
    }

    #[test]
    fn test_serde_uses_lowercase_names() {
        assert_eq!(serde_json::to_string(&Strategy::Backoff).unwrap(), "\"backoff\"");
        let parsed: Strategy = serde_json::from_str("\"bitwise\"").unwrap();
        assert_eq!(parsed, Strategy::Bitwise);
        assert!(Strategy::Locking.is_blocking());
        assert!(!Strategy::Bitwise.is_blocking());
    }
}
