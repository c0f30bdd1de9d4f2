use crate::{
    error::GhostError,
    field::{DeclaringType, FieldDescriptor},
    guard::GhostState,
    load::{Initializer, LoadCycle},
};
use std::{
    any::{Any, TypeId},
    sync::Arc,
};

/// Type introspection for ghost objects and their ancestors.
///
/// Normally implemented by the `#[ghost]` attribute.
pub trait GhostFields: Any {
    /// Descriptors of the fields declared by this type itself, in declaration order. Fields of the embedded parent are
    /// not included.
    fn ghost_declared_fields() -> Vec<FieldDescriptor>;

    /// The type this one extends, if any.
    fn ghost_parent() -> Option<DeclaringType>;

    /// An instance with every field set to its declared default and an empty ghost state.
    fn ghost_blank() -> Self
    where
        Self: Sized;

    /// Find the sub-object of type `declaring` within this instance. The instance itself is returned for its own type.
    fn ghost_ancestor_mut(&mut self, declaring: TypeId) -> Option<&mut dyn Any>;

    fn ghost_type() -> DeclaringType
    where
        Self: Sized,
    {
        DeclaringType::of::<Self>()
    }
}

/// A type with deferred state population.
///
/// The `#[ghost]` attribute implements the required methods; [`ghost_load`](GhostObject::ghost_load) forwards to the
/// routine synthesized for the type.
pub trait GhostObject: GhostFields + Sized {
    fn ghost_state(&self) -> &GhostState<Self>;

    fn ghost_state_mut(&mut self) -> &mut GhostState<Self>;

    /// Run the guarded load routine on behalf of `member` called with `arguments`. This is a no-op if the object is
    /// already loaded or is being loaded.
    fn ghost_load(&mut self, member: &str, arguments: &[&dyn Any]) -> Result<(), GhostError>;

    /// Create a ghost armed with `initializer`. All fields hold their declared defaults.
    fn new_ghost<F>(initializer: F) -> Self
    where
        F: Fn(&mut LoadCycle<'_, Self>) -> Result<(), GhostError> + Send + Sync + 'static,
    {
        let initializer: Initializer<Self> = Arc::new(initializer);
        let mut ghost = Self::ghost_blank();
        ghost.set_ghost_initializer(Some(initializer));
        ghost
    }

    /// True when no load is owed, i.e. there is no pending initializer.
    fn is_ghost_initialized(&self) -> bool {
        !self.ghost_state().is_pending()
    }

    fn ghost_initializer(&self) -> Option<&Initializer<Self>> {
        self.ghost_state().pending()
    }

    /// Replace the pending initializer. `Some` re-arms the ghost, `None` marks it as loaded. Returns the previous
    /// initializer.
    fn set_ghost_initializer(&mut self, initializer: Option<Initializer<Self>>) -> Option<Initializer<Self>> {
        std::mem::replace(self.ghost_state_mut().pending_mut(), initializer)
    }

    /// Force the load. Returns `true` if the ghost is initialized afterwards.
    fn initialize_ghost(&mut self) -> Result<bool, GhostError> {
        self.ghost_load("initialize_ghost", &[])?;
        Ok(self.is_ghost_initialized())
    }
}
