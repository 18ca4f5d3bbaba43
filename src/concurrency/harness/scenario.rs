//! Scenario configuration and the report produced by running one.

use serde::{Deserialize, Serialize};

use super::error::HarnessError;
use crate::concurrency::atomic::Strategy;

/// Operations per worker in the producer/consumer scenario.
pub const PRODUCER_CONSUMER_OPERATIONS: usize = 1_000;

/// Describes one contention run: how many threads hammer the cell and how.
///
/// Every adder calls `add(increment)` exactly `operations` times; every loader
/// calls `load()` exactly `operations` times.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    /// Value the cell is created with.
    pub initial: f64,
    /// Amount each `add` call contributes.
    pub increment: f64,
    /// Number of adder threads.
    pub adders: usize,
    /// Number of loader threads.
    pub loaders: usize,
    /// Calls per thread.
    pub operations: usize,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            initial: 0.0,
            increment: 1.0,
            adders: 4,
            loaders: 0,
            operations: 500,
        }
    }
}

impl Scenario {
    /// Creates a scenario starting from zero with an increment of one.
    pub fn new(adders: usize, loaders: usize, operations: usize) -> Self {
        Self {
            adders,
            loaders,
            operations,
            ..Self::default()
        }
    }

    /// `count` adders racing `count` loaders, as in the classic
    /// producer/consumer contention benchmark.
    pub fn producer_consumer(count: usize) -> Self {
        Self::new(count, count, PRODUCER_CONSUMER_OPERATIONS)
    }

    /// Sets the initial value.
    #[must_use]
    pub fn with_initial(mut self, initial: f64) -> Self {
        self.initial = initial;
        self
    }

    /// Sets the per-call increment.
    #[must_use]
    pub fn with_increment(mut self, increment: f64) -> Self {
        self.increment = increment;
        self
    }

    /// Total number of `add` calls across all adders.
    pub fn total_adds(&self) -> usize {
        self.adders.saturating_mul(self.operations)
    }

    /// Total number of cell operations across all workers.
    pub fn total_operations(&self) -> usize {
        self.adders
            .saturating_add(self.loaders)
            .saturating_mul(self.operations)
    }

    /// The value the cell must hold once every adder has finished.
    ///
    /// Every `add` applies the same delta, so any interleaving performs the
    /// same sequence of rounded sums: `total_adds` steps of `x + increment`
    /// from `initial`. For integer-valued increments this equals
    /// `initial + increment * total_adds`.
    pub fn expected_total(&self) -> f64 {
        (0..self.total_adds()).fold(self.initial, |acc, _| acc + self.increment)
    }

    /// Rejects scenarios whose outcome the harness cannot verify.
    pub fn validate(&self) -> Result<(), HarnessError> {
        if !self.initial.is_finite() {
            return Err(HarnessError::InvalidScenario("initial value must be finite"));
        }
        if !self.increment.is_finite() {
            return Err(HarnessError::InvalidScenario("increment must be finite"));
        }
        if self.adders.checked_mul(self.operations).is_none() {
            return Err(HarnessError::InvalidScenario("adders * operations overflows"));
        }
        if !self.expected_total().is_finite() {
            return Err(HarnessError::InvalidScenario("expected total is not finite"));
        }
        Ok(())
    }
}

/// Outcome of a successful scenario run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioReport {
    /// The strategy that was exercised, when selected by name.
    pub strategy: Option<Strategy>,
    /// The scenario that was run.
    pub scenario: Scenario,
    /// `load()` after all workers joined.
    pub final_value: f64,
    /// The sequential sum the final value was checked against.
    pub expected: f64,
    /// Wall-clock time from releasing the workers to joining them.
    pub elapsed_nanos: u64,
    /// Number of `load` calls made by loader threads.
    pub loads: u64,
    /// Largest value any loader observed, if there were loaders.
    pub max_observed: Option<f64>,
}

impl ScenarioReport {
    /// Cell operations per second over the whole run.
    #[allow(clippy::cast_precision_loss)]
    pub fn ops_per_sec(&self) -> f64 {
        if self.elapsed_nanos == 0 {
            return 0.0;
        }
        self.scenario.total_operations() as f64 * 1e9 / self.elapsed_nanos as f64
    }

    /// Renders the report as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_reference_scenario() {
        let s = Scenario::default();
        assert_eq!((s.adders, s.loaders, s.operations), (4, 0, 500));
        assert_eq!(s.expected_total(), 2000.0);
    }

    #[test]
    fn test_expected_total_scales() {
        let s = Scenario::new(100, 0, 1_000);
        assert_eq!(s.expected_total(), 100_000.0);

        let s = Scenario::new(3, 2, 10).with_initial(5.0).with_increment(2.0);
        assert_eq!(s.expected_total(), 65.0);
        assert_eq!(s.total_operations(), 50);
    }

    #[test]
    fn test_expected_total_follows_rounded_steps() {
        let s = Scenario::new(1, 0, 10).with_increment(0.1);
        let mut sequential = 0.0f64;
        for _ in 0..10 {
            sequential += 0.1;
        }
        assert_eq!(s.expected_total(), sequential);
        assert_ne!(s.expected_total(), 1.0);

        // Large initial values absorb small increments.
        let s = Scenario::new(2, 0, 5).with_initial(1.0e17).with_increment(1.0);
        assert_eq!(s.expected_total(), 1.0e17);
    }

    #[test]
    fn test_validate_rejects_non_finite() {
        assert!(Scenario::default().validate().is_ok());
        assert_eq!(
            Scenario::default().with_increment(f64::NAN).validate(),
            Err(HarnessError::InvalidScenario("increment must be finite"))
        );
        assert!(Scenario::default().with_initial(f64::INFINITY).validate().is_err());
        assert!(Scenario::new(usize::MAX, 0, 2).validate().is_err());
        let overflowing = Scenario::new(1, 0, 1)
            .with_initial(f64::MAX)
            .with_increment(f64::MAX);
        assert!(overflowing.validate().is_err());
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let s: Scenario = serde_json::from_str(r#"{"adders": 10, "loaders": 10}"#).unwrap();
        assert_eq!(s.adders, 10);
        assert_eq!(s.loaders, 10);
        assert_eq!(s.operations, 500);
        assert_eq!(s.increment, 1.0);
    }

    #[test]
    fn test_report_json() {
        let report = ScenarioReport {
            strategy: Some(Strategy::Locking),
            scenario: Scenario::new(1, 1, 2),
            final_value: 2.0,
            expected: 2.0,
            elapsed_nanos: 1_000,
            loads: 2,
            max_observed: Some(2.0),
        };
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["strategy"], "locking");
        assert_eq!(json["scenario"]["adders"], 1);
        assert_eq!(report.ops_per_sec(), 4.0 * 1e6);
    }
}
