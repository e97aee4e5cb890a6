use super::Error;

/// Error originating in the statement execution or introspection facility.
///
/// The core wraps collaborator failures without interpreting them; there is
/// no retry logic anywhere in relmap.
#[derive(Debug)]
pub(super) struct DriverError {
    pub(super) cause: Box<dyn std::error::Error + Send + Sync + 'static>,
}

impl DriverError {
    pub(super) fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.cause.as_ref())
    }
}

impl core::fmt::Display for DriverError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "driver error: {}", self.cause)
    }
}

impl Error {
    /// Wraps a collaborator failure.
    pub fn driver(cause: impl std::error::Error + Send + Sync + 'static) -> Error {
        Error::from(super::ErrorKind::Driver(DriverError {
            cause: Box::new(cause),
        }))
    }

    /// Returns `true` if this error wraps a collaborator failure.
    pub fn is_driver(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::Driver(_))
    }
}
