use super::Error;

/// An error built from a plain message, used by the `bail!` and `err!`
/// macros for failures that do not fit a structured kind.
#[derive(Debug)]
pub(super) struct AdhocError {
    pub(super) message: Box<str>,
}

impl core::fmt::Display for AdhocError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str(&self.message)
    }
}

impl Error {
    /// Creates an error from a plain message.
    pub fn adhoc(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::Adhoc(AdhocError {
            message: message.into().into(),
        }))
    }
}
