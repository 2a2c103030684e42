use super::Error;

/// Error when an entity type cannot be turned into metadata.
///
/// Raised on the first metadata request for the type:
/// - no field, or more than one field, carries the id tag
/// - the id field has no column tag
/// - two columns share a name (compared case-insensitively)
/// - a type-level index lists no columns
#[derive(Debug)]
pub(super) struct InvalidEntityDefinition {
    message: Box<str>,
}

impl std::error::Error for InvalidEntityDefinition {}

impl core::fmt::Display for InvalidEntityDefinition {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid entity definition: {}", self.message)
    }
}

/// Error when an entity descriptor carries no instance factory, so rows
/// cannot be materialized into records.
#[derive(Debug)]
pub(super) struct NoDefaultConstructor {
    entity: Box<str>,
}

impl std::error::Error for NoDefaultConstructor {}

impl core::fmt::Display for NoDefaultConstructor {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "invalid entity definition: entity `{}` has no zero-argument constructor",
            self.entity
        )
    }
}

impl Error {
    pub fn invalid_entity_definition(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidEntityDefinition(
            InvalidEntityDefinition {
                message: message.into().into(),
            },
        ))
    }

    pub fn no_default_constructor(entity: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::NoDefaultConstructor(NoDefaultConstructor {
            entity: entity.into().into(),
        }))
    }

    /// Returns `true` for any entity definition failure, including a
    /// missing constructor.
    pub fn is_invalid_entity_definition(&self) -> bool {
        matches!(
            self.kind(),
            super::ErrorKind::InvalidEntityDefinition(_)
                | super::ErrorKind::NoDefaultConstructor(_)
        )
    }

    pub fn is_no_default_constructor(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::NoDefaultConstructor(_))
    }
}
