//! The capability set shared by every float cell.

/// A double-precision cell supporting atomic load, store, swap and add.
///
/// Every method takes `&self` and may be called from any number of threads
/// at once. None of them can fail: all inputs, including infinities and NaN,
/// produce the IEEE-754 result.
///
/// The trait exists so callers (the contention harness, benchmarks, user
/// code) can be written once and run against any storage strategy.
pub trait AtomicFloat: Send + Sync {
    /// Creates a cell holding `initial`.
    fn new(initial: f64) -> Self
    where
        Self: Sized;

    /// Returns the current value.
    fn load(&self) -> f64;

    /// Replaces the current value with `value`.
    fn store(&self, value: f64);

    /// Replaces the current value with `value`, returning the previous one.
    fn swap(&self, value: f64) -> f64;

    /// Adds `delta` to the current value and returns the result.
    fn add(&self, delta: f64) -> f64;

    /// Subtracts `delta`, returning the result. Equivalent to `add(-delta)`.
    #[inline]
    fn sub(&self, delta: f64) -> f64 {
        self.add(-delta)
    }
}
