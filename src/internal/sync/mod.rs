// src/internal/sync/mod.rs

//! Exposing a toolkit-style `lock`/`unlock` mutex through the
//! `acquire`/`release` vocabulary and scoped acquisition.

use std::sync::{Condvar, Mutex, PoisonError};

/// A mutex with explicit lock and unlock calls and no guard object.
pub trait ToolkitLock {
    fn lock(&self);
    fn unlock(&self);
    /// Takes the lock if it is free. Returns whether it was taken.
    fn try_lock(&self) -> bool;
}

/// A [`ToolkitLock`] built from a flag, a mutex and a condition variable.
#[derive(Debug, Default)]
pub struct FlagLock {
    held: Mutex<bool>,
    freed: Condvar,
}

impl FlagLock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ToolkitLock for FlagLock {
    fn lock(&self) {
        let mut held = self.held.lock().unwrap_or_else(PoisonError::into_inner);
        while *held {
            held = self
                .freed
                .wait(held)
                .unwrap_or_else(PoisonError::into_inner);
        }
        *held = true;
    }

    fn unlock(&self) {
        let mut held = self.held.lock().unwrap_or_else(PoisonError::into_inner);
        *held = false;
        self.freed.notify_one();
    }

    fn try_lock(&self) -> bool {
        let mut held = self.held.lock().unwrap_or_else(PoisonError::into_inner);
        if *held {
            false
        } else {
            *held = true;
            true
        }
    }
}

/// Adapter giving any [`ToolkitLock`] `acquire`/`release` and scoped use.
#[derive(Debug, Default)]
pub struct LockCompatible<L: ToolkitLock> {
    inner: L,
}

impl<L: ToolkitLock> LockCompatible<L> {
    pub fn new(inner: L) -> Self {
        Self { inner }
    }

    pub fn acquire(&self) {
        self.inner.lock();
    }

    pub fn release(&self) {
        self.inner.unlock();
    }

    /// Whether another holder has the lock right now. Probes with a
    /// non-blocking attempt and gives the lock back if the probe took it.
    pub fn locked(&self) -> bool {
        if self.inner.try_lock() {
            self.inner.unlock();
            false
        } else {
            true
        }
    }

    /// Acquires and returns a guard that releases on drop, unwinding included.
    pub fn scoped(&self) -> ScopedLock<'_, L> {
        self.acquire();
        ScopedLock { lock: self }
    }

    pub fn inner(&self) -> &L {
        &self.inner
    }
}

#[must_use = "the lock is released as soon as the guard is dropped"]
pub struct ScopedLock<'a, L: ToolkitLock> {
    lock: &'a LockCompatible<L>,
}

impl<L: ToolkitLock> Drop for ScopedLock<'_, L> {
    fn drop(&mut self) {
        self.lock.release();
    }
}
