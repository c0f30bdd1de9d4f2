//! Partitioning of a ghost type's merged field set.

use crate::{
    error::GhostError,
    field::{DeclaringType, FieldDescriptor, FieldVisibility},
};
use std::{any::TypeId, borrow::Borrow, collections::HashSet, fmt};

/// How a field is reached from the ghost type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum FieldClass {
    /// Own fields and non-private fields of ancestors.
    Direct,
    /// Private fields of ancestors; reached through a cached accessor.
    AncestorPrivate,
}

/// Internal key of a field in a layout. Unique within the layout.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FieldKey(String);

impl FieldKey {
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn qualified(prefix: &str, name: &str) -> Self {
        FieldKey(format!("{prefix}::{name}"))
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for FieldKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for FieldKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone)]
pub struct ClassifiedField {
    key:        FieldKey,
    class:      FieldClass,
    depth:      usize,
    descriptor: FieldDescriptor,
}

impl ClassifiedField {
    #[inline]
    pub fn key(&self) -> &FieldKey {
        &self.key
    }

    #[inline]
    pub fn class(&self) -> FieldClass {
        self.class
    }

    /// 0 for own fields, 1 for the parent's, and so on.
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[inline]
    pub fn descriptor(&self) -> &FieldDescriptor {
        &self.descriptor
    }
}

/// Ancestor-private fields of one declaring type, in declaration order.
#[derive(Debug, Clone)]
pub struct FieldGroup {
    declaring: DeclaringType,
    fields:    Vec<ClassifiedField>,
}

impl FieldGroup {
    #[inline]
    pub fn declaring(&self) -> &DeclaringType {
        &self.declaring
    }

    #[inline]
    pub fn fields(&self) -> &[ClassifiedField] {
        &self.fields
    }
}

/// The classified field set of a ghost type.
#[derive(Debug, Clone)]
pub struct GhostLayout {
    owner:  DeclaringType,
    fields: Vec<ClassifiedField>,
    groups: Vec<FieldGroup>,
}

impl GhostLayout {
    #[inline]
    pub fn owner(&self) -> &DeclaringType {
        &self.owner
    }

    /// All fields: the owner's first, then each ancestor's, every type in declaration order.
    #[inline]
    pub fn fields(&self) -> &[ClassifiedField] {
        &self.fields
    }

    pub fn direct(&self) -> impl Iterator<Item = &ClassifiedField> {
        self.fields.iter().filter(|f| f.class == FieldClass::Direct)
    }

    /// Ancestor-private fields grouped by declaring type, nearest ancestor first.
    #[inline]
    pub fn groups(&self) -> &[FieldGroup] {
        &self.groups
    }

    pub fn group(&self, declaring: TypeId) -> Option<&FieldGroup> {
        self.groups.iter().find(|g| g.declaring.id() == declaring)
    }

    pub fn field(&self, key: &str) -> Option<&ClassifiedField> {
        self.fields.iter().find(|f| f.key.as_str() == key)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Classify the fields of `owner` and all of its ancestors.
///
/// Own fields are always direct. An ancestor field is direct unless it is private to its declaring type. The nearest
/// direct declaration of a name takes the bare name as its key; every other declaration is keyed as `Type::name`,
/// falling back to the full type path when two types in the chain share a short name.
pub fn classify(owner: &DeclaringType) -> Result<GhostLayout, GhostError> {
    let mut taken = HashSet::new();
    let mut fields = Vec::new();
    let mut groups = Vec::new();

    for (depth, declaring) in owner.chain().into_iter().enumerate() {
        let mut private = Vec::new();

        for descriptor in declaring.declared_fields() {
            let class = if depth > 0 && descriptor.visibility() == FieldVisibility::Private {
                FieldClass::AncestorPrivate
            }
            else {
                FieldClass::Direct
            };

            let name = descriptor.name();
            let mut key = match class {
                FieldClass::Direct if !taken.contains(name) => FieldKey(name.to_string()),
                _ => FieldKey::qualified(declaring.name(), name),
            };
            if taken.contains(key.as_str()) {
                key = FieldKey::qualified(declaring.path(), name);
            }
            if !taken.insert(key.0.clone()) {
                return Err(GhostError::DuplicateFieldKey {
                    owner: owner.path().to_string(),
                    key:   key.0,
                });
            }

            let field = ClassifiedField {
                key,
                class,
                depth,
                descriptor,
            };
            if class == FieldClass::AncestorPrivate {
                private.push(field.clone());
            }
            fields.push(field);
        }

        if !private.is_empty() {
            groups.push(FieldGroup {
                declaring,
                fields: private,
            });
        }
    }

    Ok(GhostLayout {
        owner: *owner,
        fields,
        groups,
    })
}
