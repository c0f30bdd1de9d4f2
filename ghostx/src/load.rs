//! The guarded load routine and the context a populating routine runs in.

use crate::{
    accessor::AccessorCache,
    error::GhostError,
    guard::RunningGuard,
    refs::FieldRefs,
    traits::GhostObject,
};
use std::{
    any::{self, Any},
    mem,
    sync::Arc,
};
use tracing::{debug, trace, warn};

/// A populating routine.
///
/// It clears the pending cell (see [`LoadCycle::clear_initializer`]) once the object is fully loaded; otherwise the
/// next guarded access runs it again.
pub type Initializer<T> = Arc<dyn Fn(&mut LoadCycle<'_, T>) -> Result<(), GhostError> + Send + Sync>;

/// Everything an initializer gets: the instance, what triggered the load, the pending cell, and a handle for every
/// field of the instance, ancestor-private ones included.
pub struct LoadCycle<'a, T> {
    instance:  &'a mut T,
    member:    &'a str,
    arguments: &'a [&'a dyn Any],
    fields:    FieldRefs,
}

impl<'a, T: GhostObject> LoadCycle<'a, T> {
    pub(crate) fn new(instance: &'a mut T, member: &'a str, arguments: &'a [&'a dyn Any], fields: FieldRefs) -> Self {
        Self {
            instance,
            member,
            arguments,
            fields,
        }
    }

    #[inline]
    pub fn instance(&self) -> &T {
        self.instance
    }

    /// The instance being loaded. Guarded accesses made through it while the cycle runs are no-ops.
    #[inline]
    pub fn instance_mut(&mut self) -> &mut T {
        self.instance
    }

    /// Name of the member which access triggered the load.
    #[inline]
    pub fn member(&self) -> &str {
        self.member
    }

    /// Call arguments of the triggering access; empty for plain field access.
    #[inline]
    pub fn arguments(&self) -> &[&'a dyn Any] {
        self.arguments
    }

    pub fn argument<V: Any>(&self, idx: usize) -> Option<&V> {
        self.arguments.get(idx).and_then(|arg| arg.downcast_ref::<V>())
    }

    /// The pending cell of the instance. Leaving `None` in it marks the object as loaded.
    #[inline]
    pub fn pending_mut(&mut self) -> &mut Option<Initializer<T>> {
        self.instance.ghost_state_mut().pending_mut()
    }

    /// Mark the object as fully loaded.
    pub fn clear_initializer(&mut self) -> Option<Initializer<T>> {
        self.pending_mut().take()
    }

    #[inline]
    pub fn fields(&self) -> &FieldRefs {
        &self.fields
    }

    pub fn get<V: Any>(&mut self, key: &str) -> Result<&V, GhostError> {
        Ok(&*self.get_mut::<V>(key)?)
    }

    pub fn get_mut<V: Any>(&mut self, key: &str) -> Result<&mut V, GhostError> {
        self.fields.require(key)?.get_mut::<T, V>(self.instance)
    }

    /// Store `value` into the field under `key`, returning the previous value.
    pub fn set<V: Any>(&mut self, key: &str, value: V) -> Result<V, GhostError> {
        Ok(mem::replace(self.get_mut::<V>(key)?, value))
    }

    fn reset_fields(&mut self) -> Result<(), GhostError> {
        self.fields.reset_all(self.instance)
    }
}

/// The body of every synthesized load routine.
///
/// Does nothing if a load is in progress or no load is owed. Otherwise resets every field to its declared default,
/// binds the field handles through `cache` and runs the pending initializer. The `running` flag is released on every
/// exit path, panics included. An initializer error is returned as is, after the fields are put back to their
/// defaults; the pending cell keeps whatever the initializer left in it.
pub fn call_initializer<'a, T: GhostObject>(
    instance: &'a mut T,
    member: &'a str,
    arguments: &'a [&'a dyn Any],
    cache: &AccessorCache,
) -> Result<(), GhostError> {
    let ghost = any::type_name::<T>();
    let state = instance.ghost_state();

    if state.is_running() {
        trace!(ghost, member, "ghost load in progress, skipping");
        return Ok(());
    }
    let Some(initializer) = state.pending().map(Arc::clone)
    else {
        trace!(ghost, member, "ghost already loaded");
        return Ok(());
    };

    let layout = cache.layout::<T>()?;
    let mut guard = RunningGuard::acquire(instance);

    let fields = FieldRefs::build(&layout, cache)?;
    fields.reset_all(&mut *guard)?;

    debug!(ghost, member, fields = fields.len(), "running ghost initializer");
    let mut cycle = LoadCycle::new(&mut *guard, member, arguments, fields);
    let outcome = (*initializer)(&mut cycle);

    if let Err(ref err) = outcome {
        warn!(ghost, member, error = %err, "ghost initializer failed");
        if let Err(reset_err) = cycle.reset_fields() {
            warn!(ghost, member, error = %reset_err, "cannot reset ghost fields after failed initializer");
        }
    }
    else {
        debug!(ghost, member, loaded = cycle.instance().is_ghost_initialized(), "ghost initializer done");
    }

    outcome
}

#[cfg(test)]
mod test {
    use super::call_initializer;
    use crate::{
        accessor::AccessorCache,
        error::GhostError,
        guard::GhostPhase,
        test_types::{Detachable, Leaf},
        traits::GhostObject,
    };
    use std::{
        io,
        panic::{self, AssertUnwindSafe},
    };

    #[test]
    fn runs_once_and_releases() {
        let (mut leaf, log) = Leaf::logged(|cycle| {
            cycle.set("Root::id", 42u64)?;
            cycle.clear_initializer();
            Ok(())
        });
        let cache = AccessorCache::new();

        call_initializer(&mut leaf, "name", &[], &cache).expect("load");
        call_initializer(&mut leaf, "name", &[], &cache).expect("no-op");

        assert_eq!(log.calls(), 1);
        assert_eq!(leaf.middle.root().id(), 42);
        assert_eq!(leaf.ghost_state().phase(), GhostPhase::IdleDone);
    }

    #[test]
    fn routine_sees_trigger() {
        let (mut leaf, log) = Leaf::logged(|cycle| {
            assert_eq!(cycle.member(), "rename");
            assert_eq!(cycle.argument::<&str>(0), Some(&"new name"));
            assert_eq!(cycle.arguments().len(), 1);
            assert!(cycle.instance().ghost_state().is_running());
            Ok(())
        });
        let cache = AccessorCache::new();

        call_initializer(&mut leaf, "rename", &[&"new name"], &cache).expect("load");
        assert_eq!(log.calls(), 1);
        assert_eq!(leaf.ghost_state().phase(), GhostPhase::IdlePending, "initializer didn't clear itself");
    }

    #[test]
    fn reentry_is_noop() {
        let (mut leaf, log) = Leaf::logged(|cycle| {
            cycle.instance_mut().ghost_load("label", &[])?;
            cycle.set("label", Some(String::from("set once")))?;
            cycle.clear_initializer();
            Ok(())
        });

        leaf.ghost_load("name", &[]).expect("load");
        assert_eq!(log.calls(), 1);
        assert_eq!(leaf.label.as_deref(), Some("set once"));
    }

    #[test]
    fn failure_resets_and_stays_armed() {
        let (mut leaf, log) = Leaf::logged(|cycle| {
            cycle.set("Middle::secret", 7i32)?;
            Err(GhostError::initializer(io::Error::other("backend down")))
        });
        let cache = AccessorCache::new();

        let err = call_initializer(&mut leaf, "name", &[], &cache).expect_err("initializer fails");
        assert!(err.is_initializer());
        assert_eq!(err.to_string(), "Ghost initializer failed: backend down");
        assert_eq!(leaf.ghost_state().phase(), GhostPhase::IdlePending);
        assert_eq!(leaf.middle.secret(), -1, "partial write rolled back to default");

        let _ = call_initializer(&mut leaf, "name", &[], &cache);
        assert_eq!(log.calls(), 2, "failed load is retried");
    }

    #[test]
    fn panic_releases_running() {
        let (mut leaf, log) = Leaf::logged(|cycle| {
            if cycle.instance().label.is_none() {
                panic!("initializer blew up");
            }
            Ok(())
        });
        let cache = AccessorCache::new();

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| call_initializer(&mut leaf, "name", &[], &cache)));
        assert!(outcome.is_err());
        assert!(!leaf.ghost_state().is_running());
        assert_eq!(log.calls(), 1);

        leaf.set_ghost_initializer(None);
        call_initializer(&mut leaf, "name", &[], &cache).expect("disarmed ghost is a no-op");
        assert_eq!(log.calls(), 1);
    }

    #[test]
    fn unknown_key() {
        let (mut leaf, log) = Leaf::logged(|cycle| {
            cycle.set("nope", 1u8)?;
            Ok(())
        });
        let err = leaf.ghost_load("name", &[]).expect_err("unknown field");
        assert!(matches!(err, GhostError::UnknownField(ref key) if key == "nope"));
        assert_eq!(log.calls(), 1);
    }

    #[test]
    fn unreachable_ancestor_fails_before_initializer() {
        let (mut ghost, log) = Detachable::logged(|cycle| {
            cycle.clear_initializer();
            Ok(())
        });
        ghost.detached = true;
        let cache = AccessorCache::new();

        let err = call_initializer(&mut ghost, "id", &[], &cache).expect_err("root can't be reached");
        assert!(matches!(err, GhostError::UnresolvedDeclaringType { ref declaring, .. } if declaring.ends_with("Root")));
        assert_eq!(log.calls(), 0);
        assert!(!ghost.ghost_state().is_running());
        assert_eq!(ghost.ghost_state().phase(), GhostPhase::IdlePending);
    }

    #[test]
    fn initializer_error_wins_over_reset_error() {
        let (mut ghost, log) = Detachable::logged(|cycle| {
            cycle.instance_mut().detached = true;
            Err(GhostError::initializer("lost the root"))
        });

        let err = ghost.ghost_load("id", &[]).expect_err("initializer fails");
        assert!(err.is_initializer());
        assert_eq!(err.to_string(), "Ghost initializer failed: lost the root");
        assert_eq!(log.calls(), 1);
        assert!(!ghost.ghost_state().is_running());
        assert_eq!(ghost.ghost_state().phase(), GhostPhase::IdlePending);
    }
}
