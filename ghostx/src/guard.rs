//! Guard cells of a ghost object and the scoped `running` flag.

use crate::{load::Initializer, traits::GhostObject};
use std::{
    fmt,
    ops::{Deref, DerefMut},
    sync::Arc,
};

/// Where a ghost stands in its load protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GhostPhase {
    /// A load is owed and will run on the next guarded access.
    IdlePending,
    /// The initializer is executing.
    Running,
    /// Nothing to load.
    IdleDone,
}

/// The two guard cells every ghost object carries.
///
/// `pending` holds the initializer while a load is owed. It is not taken out for the duration of a load cycle; the
/// initializer clears it to report that the object is fully loaded. `running` is only ever set by the guard protocol
/// and is released by a drop-guard.
pub struct GhostState<T> {
    pending: Option<Initializer<T>>,
    running: bool,
}

impl<T> GhostState<T> {
    /// Armed state: a load is owed.
    pub fn armed(initializer: Initializer<T>) -> Self {
        Self {
            pending: Some(initializer),
            running: false,
        }
    }

    /// Nothing to load.
    pub fn idle() -> Self {
        Self {
            pending: None,
            running: false,
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    #[inline]
    pub fn pending(&self) -> Option<&Initializer<T>> {
        self.pending.as_ref()
    }

    #[inline]
    pub fn pending_mut(&mut self) -> &mut Option<Initializer<T>> {
        &mut self.pending
    }

    pub fn phase(&self) -> GhostPhase {
        if self.running {
            GhostPhase::Running
        }
        else if self.pending.is_some() {
            GhostPhase::IdlePending
        }
        else {
            GhostPhase::IdleDone
        }
    }

    #[inline]
    pub(crate) fn set_running(&mut self, running: bool) {
        self.running = running;
    }
}

impl<T> Default for GhostState<T> {
    fn default() -> Self {
        Self::idle()
    }
}

// A clone shares the initializer but never the running flag: the copy hasn't started any load.
impl<T> Clone for GhostState<T> {
    fn clone(&self) -> Self {
        Self {
            pending: self.pending.as_ref().map(Arc::clone),
            running: false,
        }
    }
}

impl<T> fmt::Debug for GhostState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GhostState")
            .field("pending", &self.pending.is_some())
            .field("running", &self.running)
            .finish()
    }
}

/// Holds `running` raised for as long as it lives.
pub(crate) struct RunningGuard<'a, T: GhostObject> {
    instance: &'a mut T,
}

impl<'a, T: GhostObject> RunningGuard<'a, T> {
    pub(crate) fn acquire(instance: &'a mut T) -> Self {
        instance.ghost_state_mut().set_running(true);
        Self { instance }
    }
}

impl<T: GhostObject> Deref for RunningGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.instance
    }
}

impl<T: GhostObject> DerefMut for RunningGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        self.instance
    }
}

impl<T: GhostObject> Drop for RunningGuard<'_, T> {
    fn drop(&mut self) {
        self.instance.ghost_state_mut().set_running(false);
    }
}
