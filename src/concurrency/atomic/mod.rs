//! Atomic `f64` cells.
//!
//! Every cell implements [`AtomicFloat`], so callers can be written once and
//! pointed at whichever storage strategy suits their contention profile:
//! - [`BitwiseAtomicF64`]: lock-free, `AtomicU64` bit pattern plus a CAS loop.
//! - [`BackoffAtomicF64`]: as above, with exponential backoff on conflict.
//! - [`LockingAtomicF64`]: `RwLock<f64>`, blocking.
//!
//! Important:
//! - The strategies are semantically identical. They differ only in how
//!   they behave under contention (spinning versus parking).
//! - None of the operations can fail or return a sentinel.

/// Lock-free cells.
pub mod bitwise;
/// Lock-based cell.
pub mod locking;
/// Runtime selection of a strategy.
pub mod strategy;
/// The shared capability trait.
pub mod traits;

pub use bitwise::{BackoffAtomicF64, BitwiseAtomicF64};
pub use locking::LockingAtomicF64;
pub use strategy::{ParseStrategyError, Strategy};
pub use traits::AtomicFloat;
