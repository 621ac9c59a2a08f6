//! Lock acquisition helpers
//!
//! The registry and the scope graph each guard plain in-memory state
//! with one `RwLock`. A poisoned lock here only means some caller
//! panicked mid-mutation of a map or a vec of handles; recovering the
//! guard keeps one failed test from cascading into unrelated ones.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

pub(crate) fn read_lock<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn write_lock<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
