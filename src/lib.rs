//! # `afloat` - Concurrency-Safe Floating Point Cells
//!
//! Atomic `load`, `store`, `swap` and `add` on an `f64` shared between many
//! threads, with no observer ever seeing a partially written value.
//!
//! ## Strategies
//!
//! Hardware atomics work on integers, not floats, so the crate offers two
//! ways of getting float read-modify-write atomicity, behind one trait:
//!
//! 1. **Bitwise** (`BitwiseAtomicF64`, `BackoffAtomicF64`):
//!    - The IEEE-754 bit pattern lives in an `AtomicU64`
//!    - `add` is an optimistic compare-and-swap retry loop
//!    - Callers never block; under heavy write contention they may spin
//!
//! 2. **Locking** (`LockingAtomicF64`):
//!    - A native `f64` behind a read-write lock
//!    - Readers share the lock, writers hold it exclusively
//!    - Blocked callers park and yield the CPU to the lock holder
//!
//! Both are linearizable and both are total: every input, including
//! infinities and NaN, yields the IEEE-754 result. They differ only in how
//! they behave under contention, which is what the `contention` benchmark
//! measures.
//!
//! ## Example
//!
//! ```rust
//! use afloat::{AtomicFloat, BitwiseAtomicF64, LockingAtomicF64};
//!
//! fn accumulate<F: AtomicFloat>(cell: &F) {
//!     std::thread::scope(|s| {
//!         for _ in 0..4 {
//!             s.spawn(|| {
//!                 for _ in 0..500 {
//!                     cell.add(1.0);
//!                 }
//!             });
//!         }
//!     });
//! }
//!
//! let lock_free = BitwiseAtomicF64::new(0.0);
//! let locked = LockingAtomicF64::new(0.0);
//! accumulate(&lock_free);
//! accumulate(&locked);
//! assert_eq!(lock_free.load(), 2000.0);
//! assert_eq!(locked.load(), 2000.0);
//! ```

#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod concurrency;
mod sync;

pub use concurrency::atomic::{
    AtomicFloat, BackoffAtomicF64, BitwiseAtomicF64, LockingAtomicF64, ParseStrategyError, Strategy,
};
#[cfg(not(loom))]
pub use concurrency::harness::{run, run_strategy, HarnessError, Scenario, ScenarioReport};

// Compile-time assertions for layout claims.
#[cfg(not(loom))]
const _: () = {
    use core::mem;

    // The bitwise cells are `repr(transparent)` over `AtomicU64`.
    assert!(mem::size_of::<BitwiseAtomicF64>() == mem::size_of::<u64>());
    assert!(mem::size_of::<BackoffAtomicF64>() == mem::size_of::<u64>());
    assert!(
        mem::align_of::<BitwiseAtomicF64>() == mem::align_of::<core::sync::atomic::AtomicU64>()
    );
};
