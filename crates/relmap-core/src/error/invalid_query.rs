use super::Error;

/// Error when a query is semantically invalid.
///
/// This occurs when:
/// - A join column argument carries a table qualification (a `.`)
/// - A limit/offset clause is combined with a fan-out cardinality
/// - Root and related sides of a self-join share one column prefix
///
/// These are caught before the statement reaches the database.
#[derive(Debug)]
pub(super) struct InvalidQueryError {
    pub(super) message: Box<str>,
}

impl core::fmt::Display for InvalidQueryError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid query: {}", self.message)
    }
}

impl Error {
    /// Creates an invalid query error.
    pub fn invalid_query(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidQuery(InvalidQueryError {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an invalid query error.
    pub fn is_invalid_query(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::InvalidQuery(_))
    }
}
