use super::Error;

/// Error when a caller passes an invalid or missing argument.
///
/// This occurs when:
/// - A required builder method was not called before `execute`
/// - A join column or other required argument is blank
/// - An object is in a state the operation cannot accept (e.g. an
///   auto-increment id already populated before insert)
///
/// These are caller mistakes, raised before any SQL is built or executed.
#[derive(Debug)]
pub(super) struct InvalidArgumentError {
    pub(super) message: Box<str>,
}

impl core::fmt::Display for InvalidArgumentError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid argument: {}", self.message)
    }
}

impl Error {
    /// Creates an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidArgument(InvalidArgumentError {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an invalid argument error.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::InvalidArgument(_))
    }
}
