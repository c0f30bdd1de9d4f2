//! Accessors of ancestor-private fields and the registry that keeps them.

use crate::{
    classify::{classify, GhostLayout},
    error::GhostError,
    field::{DeclaringType, Projection},
    traits::GhostFields,
};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::{
    any::{Any, TypeId},
    collections::HashMap,
    fmt,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};
use tracing::debug;

static GLOBAL: Lazy<AccessorCache> = Lazy::new(AccessorCache::new);

/// Identity of an accessor: the declaring type and the field name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccessorKey {
    declaring: TypeId,
    field:     &'static str,
}

impl AccessorKey {
    #[inline]
    pub fn declaring(&self) -> TypeId {
        self.declaring
    }

    #[inline]
    pub fn field(&self) -> &'static str {
        self.field
    }
}

/// Read/write handle to a field of a specific declaring type, usable with any instance of that type.
pub struct Accessor {
    declaring:  DeclaringType,
    field:      &'static str,
    projection: Projection,
}

impl Accessor {
    pub fn key(&self) -> AccessorKey {
        AccessorKey {
            declaring: self.declaring.id(),
            field:     self.field,
        }
    }

    #[inline]
    pub fn declaring(&self) -> &DeclaringType {
        &self.declaring
    }

    #[inline]
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// Alias the field within `instance`, which must be an instance of the declaring type.
    pub fn bind<'a>(&self, instance: &'a mut dyn Any) -> Option<&'a mut dyn Any> {
        (self.projection)(instance)
    }
}

impl fmt::Debug for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accessor")
            .field("declaring", &self.declaring)
            .field("field", &self.field)
            .finish()
    }
}

/// Registry of accessors and classified layouts.
///
/// An accessor is created at most once per `(declaring type, field)` key and is shared by all instances of all ghost
/// types that have the declaring type as an ancestor. Nothing is ever evicted. When two threads race to create the
/// same accessor the first one stored wins and the other is discarded.
///
/// [`AccessorCache::global`] is what generated ghost code uses unless told otherwise with `#[ghost(cache = ...)]`.
pub struct AccessorCache {
    accessors: RwLock<HashMap<TypeId, HashMap<&'static str, Arc<Accessor>>>>,
    layouts:   RwLock<HashMap<TypeId, Arc<GhostLayout>>>,
    created:   AtomicUsize,
}

impl AccessorCache {
    pub fn new() -> Self {
        Self {
            accessors: RwLock::new(HashMap::new()),
            layouts:   RwLock::new(HashMap::new()),
            created:   AtomicUsize::new(0),
        }
    }

    /// The process-wide cache.
    pub fn global() -> &'static AccessorCache {
        &GLOBAL
    }

    /// Get the accessor for `field` of `declaring`, creating it on the first request.
    pub fn get_or_create(&self, declaring: &DeclaringType, field: &str) -> Result<Arc<Accessor>, GhostError> {
        if let Some(accessor) = self.lookup(declaring.id(), field) {
            return Ok(accessor);
        }

        let descriptor = declaring
            .declared_fields()
            .into_iter()
            .find(|d| d.name() == field)
            .ok_or_else(|| GhostError::AccessorUnavailable {
                declaring: declaring.path().to_string(),
                field:     field.to_string(),
            })?;

        let accessor = Arc::new(Accessor {
            declaring:  *declaring,
            field:      descriptor.name(),
            projection: descriptor.projection(),
        });

        let mut accessors = self.accessors.write();
        let by_field = accessors.entry(declaring.id()).or_default();
        if let Some(existing) = by_field.get(field) {
            return Ok(Arc::clone(existing));
        }
        by_field.insert(descriptor.name(), Arc::clone(&accessor));
        self.created.fetch_add(1, Ordering::SeqCst);
        debug!(declaring = declaring.path(), field, "created ghost field accessor");
        Ok(accessor)
    }

    fn lookup(&self, declaring: TypeId, field: &str) -> Option<Arc<Accessor>> {
        self.accessors
            .read()
            .get(&declaring)
            .and_then(|by_field| by_field.get(field))
            .cloned()
    }

    pub fn contains(&self, declaring: TypeId, field: &str) -> bool {
        self.lookup(declaring, field).is_some()
    }

    /// Number of cached accessors.
    pub fn len(&self) -> usize {
        self.accessors.read().values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// How many accessors this cache has ever created. Never exceeds the number of distinct keys requested.
    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    pub fn keys(&self) -> Vec<AccessorKey> {
        self.accessors
            .read()
            .values()
            .flat_map(|by_field| by_field.values().map(|a| a.key()))
            .collect()
    }

    /// Classified layout of `T`, computed once per type.
    pub fn layout<T: GhostFields>(&self) -> Result<Arc<GhostLayout>, GhostError> {
        let id = TypeId::of::<T>();
        if let Some(layout) = self.layouts.read().get(&id) {
            return Ok(Arc::clone(layout));
        }

        let layout = Arc::new(classify(&T::ghost_type())?);
        Ok(Arc::clone(self.layouts.write().entry(id).or_insert(layout)))
    }
}

impl Default for AccessorCache {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AccessorCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessorCache")
            .field("accessors", &self.len())
            .field("layouts", &self.layouts.read().len())
            .field("created", &self.created())
            .finish()
    }
}
