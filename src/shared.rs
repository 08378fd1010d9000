//! A manager shared between threads.
//!
//! Handles are only meaningful for the manager that produced them, so every
//! clone of a [`SharedMtbdd`] refers to the same underlying [`Mtbdd`].

use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::mtbdd::{Mtbdd, MtbddConfig};

/// [`Mtbdd`] behind a read-write lock: many concurrent readers
/// (evaluation, inspection) or a single writer (anything that builds nodes).
#[derive(Clone, Default)]
pub struct SharedMtbdd {
    inner: Arc<RwLock<Mtbdd>>,
}

impl SharedMtbdd {
    pub fn new() -> Self {
        Self::from(Mtbdd::new())
    }

    pub fn with_config(config: MtbddConfig) -> Self {
        Self::from(Mtbdd::with_config(config))
    }

    pub fn read(&self) -> RwLockReadGuard<'_, Mtbdd> {
        self.inner.read()
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, Mtbdd> {
        self.inner.write()
    }

    /// Runs `f` under the read lock.
    pub fn with_read<R>(&self, f: impl FnOnce(&Mtbdd) -> R) -> R {
        f(&self.inner.read())
    }

    /// Runs `f` under the write lock.
    pub fn with_write<R>(&self, f: impl FnOnce(&mut Mtbdd) -> R) -> R {
        f(&mut self.inner.write())
    }
}

impl From<Mtbdd> for SharedMtbdd {
    fn from(mgr: Mtbdd) -> Self {
        Self {
            inner: Arc::new(RwLock::new(mgr)),
        }
    }
}

impl std::fmt::Debug for SharedMtbdd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.inner.try_read() {
            Some(mgr) => f.debug_tuple("SharedMtbdd").field(&*mgr).finish(),
            None => f.write_str("SharedMtbdd(<locked>)"),
        }
    }
}
