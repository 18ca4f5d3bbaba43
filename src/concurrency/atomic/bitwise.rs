//! Lock-free `f64` cells backed by an `AtomicU64` bit pattern.
//!
//! Hardware atomics operate on integers, so the value is kept as its IEEE-754
//! bits and converted with `f64::to_bits`/`f64::from_bits` on every access.
//! That conversion is a bijection, so no information is lost and no observer
//! can ever see a value that was not written in full.
//!
//! Addition has no hardware primitive and is built from a compare-and-swap
//! loop. Two flavours are provided:
//! - [`BitwiseAtomicF64`] retries immediately after a lost race.
//! - [`BackoffAtomicF64`] spins with exponential backoff between attempts.

use core::fmt;

use crossbeam_utils::Backoff;

use super::traits::AtomicFloat;
use crate::sync::{AtomicU64, Ordering};

/// Adds `delta` to the float stored in `bits`, returning the sum.
///
/// `on_conflict` runs after every failed compare-and-swap, before the retry.
/// The comparison is on raw bits, so a stored NaN still compares equal to
/// itself and the loop terminates.
#[inline(always)]
fn cas_add(bits: &AtomicU64, delta: f64, mut on_conflict: impl FnMut()) -> f64 {
    let mut current = bits.load(Ordering::Acquire);
    loop {
        let sum = f64::from_bits(current) + delta;
        match bits.compare_exchange_weak(
            current,
            sum.to_bits(),
            Ordering::AcqRel,
            Ordering::Acquire,
        ) {
            Ok(_) => return sum,
            Err(actual) => {
                current = actual;
                on_conflict();
            }
        }
    }
}

/// An `f64` whose operations are single atomic integer instructions.
///
/// `add` is an unbounded optimistic retry loop: under contention a caller may
/// retry many times, but it never blocks and every successful attempt is
/// totally ordered with every other update of the cell.
#[repr(transparent)]
pub struct BitwiseAtomicF64 {
    bits: AtomicU64,
}

impl BitwiseAtomicF64 {
    /// Creates a new cell holding `value`.
    #[inline]
    pub fn new(value: f64) -> Self {
        Self {
            bits: AtomicU64::new(value.to_bits()),
        }
    }

    /// Loads the current value.
    #[inline(always)]
    pub fn load(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Acquire))
    }

    /// Stores a new value.
    #[inline(always)]
    pub fn store(&self, value: f64) {
        self.bits.store(value.to_bits(), Ordering::Release);
    }

    /// Swaps in `value`, returning the previous value.
    #[inline(always)]
    pub fn swap(&self, value: f64) -> f64 {
        f64::from_bits(self.bits.swap(value.to_bits(), Ordering::AcqRel))
    }

    /// Adds `delta`, returning the resulting value.
    #[inline]
    pub fn add(&self, delta: f64) -> f64 {
        cas_add(&self.bits, delta, || {})
    }

    /// Consumes the cell, returning the last stored value.
    #[inline]
    pub fn into_inner(self) -> f64 {
        self.load()
    }
}

/// Same storage and ordering as [`BitwiseAtomicF64`], but a caller that loses
/// a compare-and-swap backs off before retrying.
///
/// Backing off trades single-caller latency for less cache-line traffic when
/// many writers hit the cell at once.
#[repr(transparent)]
pub struct BackoffAtomicF64 {
    bits: AtomicU64,
}

impl BackoffAtomicF64 {
    /// Creates a new cell holding `value`.
    #[inline]
    pub fn new(value: f64) -> Self {
        Self {
            bits: AtomicU64::new(value.to_bits()),
        }
    }

    /// Loads the current value.
    #[inline(always)]
    pub fn load(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Acquire))
    }

    /// Stores a new value.
    #[inline(always)]
    pub fn store(&self, value: f64) {
        self.bits.store(value.to_bits(), Ordering::Release);
    }

    /// Swaps in `value`, returning the previous value.
    #[inline(always)]
    pub fn swap(&self, value: f64) -> f64 {
        f64::from_bits(self.bits.swap(value.to_bits(), Ordering::AcqRel))
    }

    /// Adds `delta`, returning the resulting value.
    #[inline]
    pub fn add(&self, delta: f64) -> f64 {
        let backoff = Backoff::new();
        cas_add(&self.bits, delta, || backoff.spin())
    }

    /// Consumes the cell, returning the last stored value.
    #[inline]
    pub fn into_inner(self) -> f64 {
        self.load()
    }
}

macro_rules! impl_bitwise_common {
    ($ty:ident) => {
        impl AtomicFloat for $ty {
            #[inline]
            fn new(initial: f64) -> Self {
                $ty::new(initial)
            }

            #[inline(always)]
            fn load(&self) -> f64 {
                $ty::load(self)
            }

            #[inline(always)]
            fn store(&self, value: f64) {
                $ty::store(self, value);
            }

            #[inline(always)]
            fn swap(&self, value: f64) -> f64 {
                $ty::swap(self, value)
            }

            #[inline(always)]
            fn add(&self, delta: f64) -> f64 {
                $ty::add(self, delta)
            }
        }

        impl Default for $ty {
            fn default() -> Self {
                Self::new(0.0)
            }
        }

        impl From<f64> for $ty {
            fn from(value: f64) -> Self {
                Self::new(value)
            }
        }

        impl fmt::Debug for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_tuple(stringify!($ty)).field(&self.load()).finish()
            }
        }
    };
}

impl_bitwise_common!(BitwiseAtomicF64);
impl_bitwise_common!(BackoffAtomicF64);

#[cfg(all(test, not(loom)))]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_basic_ops() {
        let a = BitwiseAtomicF64::new(1.5);
        assert_eq!(a.load(), 1.5);
        a.store(2.0);
        assert_eq!(a.load(), 2.0);
        assert_eq!(a.swap(3.0), 2.0);
        assert_eq!(a.add(0.5), 3.5);
        assert_eq!(a.sub(1.0), 2.5);
        assert_eq!(a.into_inner(), 2.5);
    }

    #[test]
    fn test_bits_round_trip_exactly() {
        let a = BitwiseAtomicF64::new(-0.0);
        assert_eq!(a.load().to_bits(), (-0.0f64).to_bits());

        a.store(f64::MIN_POSITIVE / 2.0);
        assert_eq!(a.load(), f64::MIN_POSITIVE / 2.0);
    }

    #[test]
    fn test_special_values() {
        let a = BitwiseAtomicF64::new(f64::INFINITY);
        assert_eq!(a.add(1.0), f64::INFINITY);
        assert!(a.add(f64::NEG_INFINITY).is_nan());

        // NaN compares unequal to itself, but the CAS compares bits.
        assert!(a.add(1.0).is_nan());
        assert!(a.swap(4.0).is_nan());
        assert_eq!(a.load(), 4.0);
    }

    #[test]
    fn test_backoff_concurrent_add() {
        let a = BackoffAtomicF64::default();
        thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    for _ in 0..1_000 {
                        a.add(1.0);
                    }
                });
            }
        });
        assert_eq!(a.load(), 8_000.0);
    }

    #[test]
    fn test_add_returns_distinct_results() {
        let a = BitwiseAtomicF64::new(0.0);
        let mut seen: Vec<f64> = thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| s.spawn(|| (0..250).map(|_| a.add(1.0)).collect::<Vec<_>>()))
                .collect();
            handles.into_iter().flat_map(|h| h.join().unwrap()).collect()
        });
        seen.sort_by(f64::total_cmp);
        let expected: Vec<f64> = (1..=1_000).map(f64::from).collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_debug_shows_value() {
        assert_eq!(format!("{:?}", BitwiseAtomicF64::from(1.25)), "BitwiseAtomicF64(1.25)");
        assert_eq!(format!("{:?}", BackoffAtomicF64::default()), "BackoffAtomicF64(0.0)");
    }
}
