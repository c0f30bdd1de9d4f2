//! The per-invocation map of field handles.

use crate::{
    accessor::{Accessor, AccessorCache},
    classify::{ClassifiedField, FieldClass, FieldKey, GhostLayout},
    defaults::resolve_default,
    error::GhostError,
    field::{FieldDescriptor, Projection},
    traits::GhostFields,
};
use std::{
    any::{self, Any},
    collections::HashMap,
    fmt,
    sync::Arc,
};

enum Route {
    Direct(Projection),
    Cached(Arc<Accessor>),
}

/// Read/write handle to one field of a ghost.
pub struct FieldHandle {
    key:        FieldKey,
    class:      FieldClass,
    descriptor: FieldDescriptor,
    route:      Route,
}

impl FieldHandle {
    #[inline]
    pub fn key(&self) -> &FieldKey {
        &self.key
    }

    #[inline]
    pub fn class(&self) -> FieldClass {
        self.class
    }

    #[inline]
    pub fn descriptor(&self) -> &FieldDescriptor {
        &self.descriptor
    }

    /// The cached accessor this handle goes through. `None` for direct fields.
    pub fn accessor(&self) -> Option<&Arc<Accessor>> {
        match self.route {
            Route::Cached(ref accessor) => Some(accessor),
            Route::Direct(_) => None,
        }
    }

    /// Alias the field within `instance`.
    pub fn slot<'a, T: GhostFields>(&self, instance: &'a mut T) -> Result<&'a mut dyn Any, GhostError> {
        let declaring = self.descriptor.declaring();
        let target = instance
            .ghost_ancestor_mut(declaring.id())
            .ok_or_else(|| GhostError::UnresolvedDeclaringType {
                owner:     any::type_name::<T>().to_string(),
                declaring: declaring.path().to_string(),
            })?;

        let slot = match self.route {
            Route::Direct(projection) => projection(target),
            Route::Cached(ref accessor) => accessor.bind(target),
        };

        slot.ok_or_else(|| GhostError::UnresolvedDeclaringType {
            owner:     any::type_name::<T>().to_string(),
            declaring: declaring.path().to_string(),
        })
    }

    /// Alias the field as a value of type `V`.
    pub fn get_mut<'a, T: GhostFields, V: Any>(&self, instance: &'a mut T) -> Result<&'a mut V, GhostError> {
        let slot = self.slot(instance)?;
        slot.downcast_mut::<V>().ok_or_else(|| self.type_error::<V>())
    }

    /// Put the field back to its declared default.
    pub fn reset<T: GhostFields>(&self, instance: &mut T) -> Result<(), GhostError> {
        let slot = self.slot(instance)?;
        self.descriptor
            .assign(slot, resolve_default(&self.descriptor).into_value())
            .map_err(|_| GhostError::FieldType {
                key:       self.key.to_string(),
                expected:  self.descriptor.type_name(),
                requested: "declared default",
            })
    }

    fn type_error<V: Any>(&self) -> GhostError {
        GhostError::FieldType {
            key:       self.key.to_string(),
            expected:  self.descriptor.type_name(),
            requested: any::type_name::<V>(),
        }
    }
}

impl fmt::Debug for FieldHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldHandle")
            .field("key", &self.key)
            .field("class", &self.class)
            .field("cached", &self.accessor().is_some())
            .finish()
    }
}

/// Every field of a ghost, keyed by internal key.
///
/// Built for a single load cycle. Handles hold no borrow of the instance; they are applied to it on access.
#[derive(Debug)]
pub struct FieldRefs {
    handles: Vec<FieldHandle>,
    index:   HashMap<FieldKey, usize>,
}

impl FieldRefs {
    /// One handle per field of `layout`. Ancestor-private fields are bound through `cache`.
    pub fn build(layout: &GhostLayout, cache: &AccessorCache) -> Result<Self, GhostError> {
        let mut handles = Vec::with_capacity(layout.len());
        let mut index = HashMap::with_capacity(layout.len());

        for field in layout.fields() {
            index.insert(field.key().clone(), handles.len());
            handles.push(Self::handle(field, cache)?);
        }

        Ok(Self { handles, index })
    }

    fn handle(field: &ClassifiedField, cache: &AccessorCache) -> Result<FieldHandle, GhostError> {
        let descriptor = *field.descriptor();
        let route = match field.class() {
            FieldClass::Direct => Route::Direct(descriptor.projection()),
            FieldClass::AncestorPrivate => {
                Route::Cached(cache.get_or_create(descriptor.declaring(), descriptor.name())?)
            }
        };
        Ok(FieldHandle {
            key: field.key().clone(),
            class: field.class(),
            descriptor,
            route,
        })
    }

    pub fn get(&self, key: &str) -> Option<&FieldHandle> {
        self.index.get(key).map(|&idx| &self.handles[idx])
    }

    pub(crate) fn require(&self, key: &str) -> Result<&FieldHandle, GhostError> {
        self.get(key).ok_or_else(|| GhostError::UnknownField(key.to_string()))
    }

    #[inline]
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Keys in layout order.
    pub fn keys(&self) -> impl Iterator<Item = &FieldKey> {
        self.handles.iter().map(|h| &h.key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldHandle> {
        self.handles.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Reset every field of `instance` to its declared default.
    pub fn reset_all<T: GhostFields>(&self, instance: &mut T) -> Result<(), GhostError> {
        for handle in &self.handles {
            handle.reset(instance)?;
        }
        Ok(())
    }
}
