//! Concurrent `f64` cells and the harness that exercises them.
//!
//! Important: every cell in [`atomic`] is safe to share across threads by
//! reference. The [`harness`] module drives them with real OS threads and is
//! not compiled under loom, whose primitives only work inside a model.

pub mod atomic;
#[cfg(not(loom))]
pub mod harness;
