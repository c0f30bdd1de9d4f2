use thiserror::Error;

/// Boxed error produced by a populating routine.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Standard error type of the crate.
#[derive(Error, Debug)]
pub enum GhostError {
    /// The populating routine failed. The error is passed through as is.
    #[error("Ghost initializer failed: {0}")]
    Initializer(BoxedError),
    /// No accessor could be bound for a field of an ancestor type.
    #[error("Cannot create accessor for field '{field}' of '{declaring}'")]
    AccessorUnavailable { declaring: String, field: String },
    /// The instance doesn't contain a sub-object of the type that declares the field.
    #[error("Type '{declaring}' cannot be reached from '{owner}'")]
    UnresolvedDeclaringType { owner: String, declaring: String },
    /// There is no field under the given internal key.
    #[error("Unknown ghost field '{0}'")]
    UnknownField(String),
    /// Field is accessed as a type it doesn't have.
    #[error("Field '{key}' is of type '{expected}', not '{requested}'")]
    FieldType {
        key:       String,
        expected:  &'static str,
        requested: &'static str,
    },
    /// Two declarations of the inheritance chain ended up with the same internal key.
    #[error("Duplicate field key '{key}' in the layout of '{owner}'")]
    DuplicateFieldKey { owner: String, key: String },
}

impl GhostError {
    /// A convenience for populating routines: wrap any error as an initializer failure.
    pub fn initializer<E: Into<BoxedError>>(err: E) -> GhostError {
        GhostError::Initializer(err.into())
    }

    /// True if the error was raised by a populating routine rather than by the ghost machinery.
    pub fn is_initializer(&self) -> bool {
        matches!(self, GhostError::Initializer(_))
    }
}
