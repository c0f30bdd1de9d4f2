//! Ghosts shared between threads.

use crate::{error::GhostError, traits::GhostObject};
use parking_lot::{Mutex, MutexGuard};
use std::{any::Any, fmt, sync::Arc};

/// A ghost object behind an `Arc<Mutex<_>>`.
///
/// The lock is held across the whole guard protocol, so checking and raising the guard cells is atomic with respect
/// to other threads. No matter how many threads hit an unloaded ghost at once, the initializer runs once.
pub struct SharedGhost<T> {
    inner: Arc<Mutex<T>>,
}

impl<T: GhostObject> SharedGhost<T> {
    pub fn new(ghost: T) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ghost)),
        }
    }

    /// Load the ghost on behalf of `member` if needed, then run `f` on it.
    pub fn with<R>(&self, member: &str, f: impl FnOnce(&mut T) -> R) -> Result<R, GhostError> {
        self.with_args(member, &[], f)
    }

    pub fn with_args<R>(
        &self,
        member: &str,
        arguments: &[&dyn Any],
        f: impl FnOnce(&mut T) -> R,
    ) -> Result<R, GhostError> {
        let mut guard = self.inner.lock();
        guard.ghost_load(member, arguments)?;
        Ok(f(&mut guard))
    }

    /// Lock the ghost without loading it.
    pub fn lock(&self) -> MutexGuard<'_, T> {
        self.inner.lock()
    }

    pub fn is_initialized(&self) -> bool {
        self.inner.lock().is_ghost_initialized()
    }
}

impl<T> Clone for SharedGhost<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for SharedGhost<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedGhost")
            .field("type", &std::any::type_name::<T>())
            .finish()
    }
}

impl<T: GhostObject> From<T> for SharedGhost<T> {
    fn from(ghost: T) -> Self {
        Self::new(ghost)
    }
}
