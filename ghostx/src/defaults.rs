//! Default value resolution.

use crate::field::FieldDescriptor;
use std::{any::Any, fmt};

/// A field's static default, materialized.
pub enum DefaultValue {
    /// The field declares a default; `literal` is its source text.
    Declared { literal: &'static str, value: Box<dyn Any> },
    /// The field declares no default. The value is the empty value of its type.
    Empty(Box<dyn Any>),
}

impl DefaultValue {
    #[inline]
    pub fn is_declared(&self) -> bool {
        matches!(self, DefaultValue::Declared { .. })
    }

    pub fn literal(&self) -> Option<&'static str> {
        match self {
            DefaultValue::Declared { literal, .. } => Some(*literal),
            DefaultValue::Empty(_) => None,
        }
    }

    pub fn value(&self) -> &dyn Any {
        match self {
            DefaultValue::Declared { value, .. } | DefaultValue::Empty(value) => value.as_ref(),
        }
    }

    pub fn downcast_ref<V: Any>(&self) -> Option<&V> {
        self.value().downcast_ref::<V>()
    }

    pub fn into_value(self) -> Box<dyn Any> {
        match self {
            DefaultValue::Declared { value, .. } | DefaultValue::Empty(value) => value,
        }
    }
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultValue::Declared { literal, .. } => f.debug_tuple("Declared").field(literal).finish(),
            DefaultValue::Empty(_) => f.write_str("Empty"),
        }
    }
}

/// Produce the value `descriptor`'s field is statically declared to hold. Every call returns a fresh value.
pub fn resolve_default(descriptor: &FieldDescriptor) -> DefaultValue {
    let default = descriptor.default();
    let value = default.make();
    match default.literal() {
        Some(literal) => DefaultValue::Declared { literal, value },
        None => DefaultValue::Empty(value),
    }
}
