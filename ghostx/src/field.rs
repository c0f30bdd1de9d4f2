//! Static field tables: the descriptors a ghost type publishes about its own declarations.
//!
//! Everything here is produced by the `#[ghost]` attribute at the site of the struct declaration. Since the expansion
//! lives in the same module as the struct, it can see private fields; the function pointers it stores in
//! [`FieldDescriptor`] are what later lets a derived type reach those fields without any visibility of its own.

use crate::traits::GhostFields;
use std::{
    any::{self, Any, TypeId},
    fmt,
};

/// Projects an instance of the declaring type onto one of its fields.
///
/// Returns `None` if the argument is not an instance of the declaring type.
pub type Projection = fn(&mut dyn Any) -> Option<&mut dyn Any>;

/// Stores a boxed value into a field slot. The value is handed back if its type doesn't match the slot.
pub type Assign = fn(&mut dyn Any, Box<dyn Any>) -> Result<(), Box<dyn Any>>;

/// Produces a fresh default value for a field.
pub type DefaultFactory = fn() -> Box<dyn Any>;

/// [`Assign`] implementation for fields of type `V`.
pub fn assign<V: Any>(slot: &mut dyn Any, value: Box<dyn Any>) -> Result<(), Box<dyn Any>> {
    let Some(slot) = slot.downcast_mut::<V>()
    else {
        return Err(value);
    };
    *slot = *value.downcast::<V>()?;
    Ok(())
}

/// Visibility of a field as declared in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum FieldVisibility {
    /// `pub`
    Public,
    /// `pub(crate)`
    Crate,
    /// `pub(super)`, `pub(in path)`
    Restricted,
    /// No visibility modifier or `pub(self)`.
    Private,
}

impl FieldVisibility {
    #[inline]
    pub fn is_private(&self) -> bool {
        *self == FieldVisibility::Private
    }
}

/// Identity of a type taking part in a ghost inheritance chain.
#[derive(Clone, Copy)]
pub struct DeclaringType {
    id:       TypeId,
    path:     &'static str,
    declared: fn() -> Vec<FieldDescriptor>,
    parent:   fn() -> Option<DeclaringType>,
}

impl DeclaringType {
    pub fn of<T: GhostFields>() -> Self {
        Self {
            id:       TypeId::of::<T>(),
            path:     any::type_name::<T>(),
            declared: T::ghost_declared_fields,
            parent:   T::ghost_parent,
        }
    }

    #[inline]
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Full type path, as reported by [`std::any::type_name`].
    #[inline]
    pub fn path(&self) -> &'static str {
        self.path
    }

    /// The last segment of the type path.
    pub fn name(&self) -> &'static str {
        self.path.rsplit("::").next().unwrap_or(self.path)
    }

    /// Descriptors of fields declared by this type itself, in declaration order.
    pub fn declared_fields(&self) -> Vec<FieldDescriptor> {
        (self.declared)()
    }

    pub fn parent(&self) -> Option<DeclaringType> {
        (self.parent)()
    }

    /// This type followed by its ancestors, nearest first.
    pub fn chain(&self) -> Vec<DeclaringType> {
        let mut chain = vec![*self];
        let mut current = self.parent();
        while let Some(ty) = current {
            // Hand-written impls may loop.
            if chain.iter().any(|seen| seen.id == ty.id) {
                break;
            }
            current = ty.parent();
            chain.push(ty);
        }
        chain
    }
}

impl PartialEq for DeclaringType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for DeclaringType {}

impl fmt::Debug for DeclaringType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DeclaringType").field(&self.path).finish()
    }
}

/// Statically declared default of a field.
#[derive(Clone, Copy)]
pub struct FieldDefault {
    literal: Option<&'static str>,
    factory: DefaultFactory,
}

impl FieldDefault {
    /// A default explicitly declared with the given source literal.
    pub fn declared(literal: &'static str, factory: DefaultFactory) -> Self {
        Self {
            literal: Some(literal),
            factory,
        }
    }

    /// No declared default; the factory produces the type's empty value.
    pub fn empty(factory: DefaultFactory) -> Self {
        Self { literal: None, factory }
    }

    #[inline]
    pub fn literal(&self) -> Option<&'static str> {
        self.literal
    }

    #[inline]
    pub fn is_declared(&self) -> bool {
        self.literal.is_some()
    }

    pub(crate) fn make(&self) -> Box<dyn Any> {
        (self.factory)()
    }
}

impl fmt::Debug for FieldDefault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDefault").field("literal", &self.literal).finish()
    }
}

/// Everything known about a single declared field.
#[derive(Clone, Copy)]
pub struct FieldDescriptor {
    name:       &'static str,
    declaring:  DeclaringType,
    visibility: FieldVisibility,
    type_name:  &'static str,
    default:    FieldDefault,
    projection: Projection,
    assign:     Assign,
}

impl FieldDescriptor {
    /// Describe a field of type `V`.
    pub fn new<V: Any>(
        name: &'static str,
        declaring: DeclaringType,
        visibility: FieldVisibility,
        default: FieldDefault,
        projection: Projection,
    ) -> Self {
        Self {
            name,
            declaring,
            visibility,
            type_name: any::type_name::<V>(),
            default,
            projection,
            assign: assign::<V>,
        }
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn declaring(&self) -> &DeclaringType {
        &self.declaring
    }

    #[inline]
    pub fn visibility(&self) -> FieldVisibility {
        self.visibility
    }

    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[inline]
    pub fn default(&self) -> &FieldDefault {
        &self.default
    }

    #[inline]
    pub fn projection(&self) -> Projection {
        self.projection
    }

    /// Store `value` into `slot`, which must be this field's slot.
    pub fn assign(&self, slot: &mut dyn Any, value: Box<dyn Any>) -> Result<(), Box<dyn Any>> {
        (self.assign)(slot, value)
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("declaring", &self.declaring)
            .field("visibility", &self.visibility)
            .field("type_name", &self.type_name)
            .field("default", &self.default)
            .finish()
    }
}
