//! Lock-based `f64` cell.

use core::fmt;
use std::sync::PoisonError;

use super::traits::AtomicFloat;
use crate::sync::RwLock;

/// An `f64` guarded by a read-write lock.
///
/// Loads take the lock in shared mode and may run in parallel with each
/// other; every mutation takes it exclusively, which makes `add` indivisible
/// without a retry loop. Blocked callers park instead of spinning.
///
/// Critical sections are a handful of float instructions and cannot panic,
/// so a poisoned lock still guards a fully written value and is recovered.
pub struct LockingAtomicF64 {
    value: RwLock<f64>,
}

impl LockingAtomicF64 {
    /// Creates a new cell holding `value`.
    #[inline]
    pub fn new(value: f64) -> Self {
        Self {
            value: RwLock::new(value),
        }
    }

    /// Loads the current value under the shared lock.
    #[inline]
    pub fn load(&self) -> f64 {
        *self.value.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stores a new value under the exclusive lock.
    #[inline]
    pub fn store(&self, value: f64) {
        *self.value.write().unwrap_or_else(PoisonError::into_inner) = value;
    }

    /// Swaps in `value` under the exclusive lock, returning the previous value.
    #[inline]
    pub fn swap(&self, value: f64) -> f64 {
        let mut guard = self.value.write().unwrap_or_else(PoisonError::into_inner);
        core::mem::replace(&mut *guard, value)
    }

    /// Adds `delta` under the exclusive lock, returning the resulting value.
    #[inline]
    pub fn add(&self, delta: f64) -> f64 {
        let mut guard = self.value.write().unwrap_or_else(PoisonError::into_inner);
        *guard += delta;
        *guard
    }

    /// Consumes the cell, returning the last stored value.
    #[inline]
    pub fn into_inner(self) -> f64 {
        self.load()
    }
}

impl AtomicFloat for LockingAtomicF64 {
    #[inline]
    fn new(initial: f64) -> Self {
        LockingAtomicF64::new(initial)
    }

    #[inline]
    fn load(&self) -> f64 {
        LockingAtomicF64::load(self)
    }

    #[inline]
    fn store(&self, value: f64) {
        LockingAtomicF64::store(self, value);
    }

    #[inline]
    fn swap(&self, value: f64) -> f64 {
        LockingAtomicF64::swap(self, value)
    }

    #[inline]
    fn add(&self, delta: f64) -> f64 {
        LockingAtomicF64::add(self, delta)
    }
}

impl Default for LockingAtomicF64 {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl From<f64> for LockingAtomicF64 {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl fmt::Debug for LockingAtomicF64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LockingAtomicF64").field(&self.load()).finish()
    }
}
