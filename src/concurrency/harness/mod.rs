//! Contention harness: drives a float cell from many threads and checks the
//! accumulated total.
//!
//! A run spawns `adders` threads calling `add(increment)` and `loaders`
//! threads calling `load()`, releases them together through a barrier, joins
//! them, and compares the final value with [`Scenario::expected_total`].
//! Loaders additionally check that the value never moves backwards while
//! only non-negative increments are applied.

pub mod error;
pub mod scenario;

pub use error::{HarnessError, Role};
pub use scenario::{Scenario, ScenarioReport, PRODUCER_CONSUMER_OPERATIONS};

use std::sync::Barrier;
use std::thread;
use std::time::Instant;

use crossbeam_utils::CachePadded;

use crate::concurrency::atomic::{
    AtomicFloat, BackoffAtomicF64, BitwiseAtomicF64, LockingAtomicF64, Strategy,
};

/// What a single loader thread saw.
#[derive(Debug, Clone, Copy)]
struct LoaderStats {
    loads: u64,
    max: f64,
}

/// Runs `scenario` against a fresh `F`.
///
/// The cell is cache-padded so that nothing else shares its line while the
/// workers hammer it.
pub fn run<F: AtomicFloat>(scenario: &Scenario) -> Result<ScenarioReport, HarnessError> {
    scenario.validate()?;
    let cell = CachePadded::new(F::new(scenario.initial));
    drive(&*cell, scenario)
}

/// Runs `scenario` against the implementation named by `strategy`.
pub fn run_strategy(
    strategy: Strategy,
    scenario: &Scenario,
) -> Result<ScenarioReport, HarnessError> {
    let report = match strategy {
        Strategy::Bitwise => run::<BitwiseAtomicF64>(scenario),
        Strategy::Backoff => run::<BackoffAtomicF64>(scenario),
        Strategy::Locking => run::<LockingAtomicF64>(scenario),
    };
    report.map(|report| ScenarioReport {
        strategy: Some(strategy),
        ..report
    })
}

/// Runs `scenario` against an existing cell.
///
/// The cell should hold `scenario.initial`; the final value is checked
/// against [`Scenario::expected_total`] regardless.
pub fn run_on<F: AtomicFloat + ?Sized>(
    cell: &F,
    scenario: &Scenario,
) -> Result<ScenarioReport, HarnessError> {
    scenario.validate()?;
    drive(cell, scenario)
}

#[allow(clippy::float_cmp)]
fn drive<F: AtomicFloat + ?Sized>(
    cell: &F,
    scenario: &Scenario,
) -> Result<ScenarioReport, HarnessError> {
    let Scenario {
        initial,
        increment,
        adders,
        loaders,
        operations,
    } = *scenario;

    #[cfg(feature = "tracing")]
    tracing::debug!(adders, loaders, operations, increment, "starting contention scenario");

    let barrier = Barrier::new(adders + loaders + 1);
    let monotonic = increment >= 0.0;

    let (elapsed, adder_results, loader_results) = thread::scope(|s| {
        let adder_handles: Vec<_> = (0..adders)
            .map(|_| {
                s.spawn(|| {
                    barrier.wait();
                    for _ in 0..operations {
                        cell.add(increment);
                    }
                })
            })
            .collect();

        let loader_handles: Vec<_> = (0..loaders)
            .map(|_| s.spawn(|| load_worker(cell, &barrier, initial, operations, monotonic)))
            .collect();

        barrier.wait();
        let start = Instant::now();

        // Every handle is joined before any result is inspected, so a
        // panicking worker surfaces as an error instead of aborting the scope.
        let loader_results: Vec<_> = loader_handles.into_iter().map(|h| h.join()).collect();
        let adder_results: Vec<_> = adder_handles.into_iter().map(|h| h.join()).collect();
        (start.elapsed(), adder_results, loader_results)
    });

    for result in adder_results {
        result.map_err(|_| HarnessError::WorkerPanicked { role: Role::Adder })?;
    }

    let mut loads = 0u64;
    let mut max_observed: Option<f64> = None;
    for result in loader_results {
        let stats = result.map_err(|_| HarnessError::WorkerPanicked { role: Role::Loader })??;
        loads += stats.loads;
        max_observed = Some(max_observed.map_or(stats.max, |m| m.max(stats.max)));
    }

    let final_value = cell.load();
    let expected = scenario.expected_total();
    if final_value != expected {
        #[cfg(feature = "tracing")]
        tracing::warn!(final_value, expected, "contention scenario lost or duplicated updates");
        return Err(HarnessError::Mismatch {
            expected,
            actual: final_value,
        });
    }

    let elapsed_nanos = u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX);

    #[cfg(feature = "tracing")]
    tracing::debug!(final_value, elapsed_nanos, loads, "contention scenario finished");

    Ok(ScenarioReport {
        strategy: None,
        scenario: *scenario,
        final_value,
        expected,
        elapsed_nanos,
        loads,
        max_observed,
    })
}

fn load_worker<F: AtomicFloat + ?Sized>(
    cell: &F,
    barrier: &Barrier,
    initial: f64,
    operations: usize,
    monotonic: bool,
) -> Result<LoaderStats, HarnessError> {
    barrier.wait();
    let mut previous = initial;
    let mut max = initial;
    let mut loads = 0u64;
    for _ in 0..operations {
        let observed = cell.load();
        loads += 1;
        if monotonic && observed < previous {
            #[cfg(feature = "tracing")]
            tracing::warn!(previous, observed, "loader observed a decreasing value");
            return Err(HarnessError::NonMonotonicLoad { previous, observed });
        }
        previous = observed;
        max = max.max(observed);
    }
    Ok(LoaderStats { loads, max })
}
