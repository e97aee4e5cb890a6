use super::Error;

/// Error when type metadata does not line up with the database schema.
///
/// This occurs when:
/// - A model declares no identifier property, or the identifier matched no
///   column
/// - The resolved table cannot be located through schema introspection
/// - A join column does not exist in the relevant table
/// - A relationship target property is missing or has an incompatible shape
///
/// These indicate a structural mismatch between code and schema, not a bad
/// call.
#[derive(Debug)]
pub(super) struct MappingError {
    pub(super) message: Box<str>,
}

impl core::fmt::Display for MappingError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "mapping error: {}", self.message)
    }
}

impl Error {
    /// Creates a mapping error.
    pub fn mapping(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::Mapping(MappingError {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is a mapping error.
    pub fn is_mapping(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::Mapping(_))
    }
}
