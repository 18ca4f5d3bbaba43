//! Synchronization primitives used by the float cells.
//!
//! Under `--cfg loom` these resolve to loom's model-checked versions so the
//! same code paths can be explored exhaustively.

#[cfg(loom)]
pub(crate) use loom::sync::atomic::{AtomicU64, Ordering};
#[cfg(loom)]
pub(crate) use loom::sync::RwLock;

#[cfg(not(loom))]
pub(crate) use std::sync::atomic::{AtomicU64, Ordering};
#[cfg(not(loom))]
pub(crate) use std::sync::RwLock;
