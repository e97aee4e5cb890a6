mod adhoc;
mod driver;
mod invalid_argument;
mod invalid_query;
mod mapping;
mod optimistic_lock;
mod type_conversion;

use adhoc::AdhocError;
use driver::DriverError;
use invalid_argument::InvalidArgumentError;
use invalid_query::InvalidQueryError;
use mapping::MappingError;
use optimistic_lock::OptimisticLockError;
use type_conversion::TypeConversionError;

/// An error that can occur in relmap.
///
/// Every error carries exactly one kind. The kinds mirror the failure
/// taxonomy of the library: caller mistakes ([`Error::is_invalid_argument`]),
/// structural mismatches between code and schema ([`Error::is_mapping`]),
/// query-semantics violations ([`Error::is_invalid_query`]), stale versioned
/// updates ([`Error::is_optimistic_lock`]), value conversion failures, and
/// wrapped collaborator failures ([`Error::is_driver`]).
pub struct Error {
    kind: ErrorKind,
}

#[derive(Debug)]
enum ErrorKind {
    Adhoc(AdhocError),
    Driver(DriverError),
    InvalidArgument(InvalidArgumentError),
    InvalidQuery(InvalidQueryError),
    Mapping(MappingError),
    OptimisticLock(OptimisticLockError),
    TypeConversion(TypeConversionError),
}

impl Error {
    fn kind(&self) -> &ErrorKind {
        &self.kind
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self.kind() {
            ErrorKind::Driver(err) => err.source(),
            _ => None,
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.kind, f)
    }
}

impl core::fmt::Debug for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        if !f.alternate() {
            core::fmt::Display::fmt(self, f)
        } else {
            f.debug_struct("Error").field("kind", &self.kind).finish()
        }
    }
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        use self::ErrorKind::*;

        match self {
            Adhoc(err) => core::fmt::Display::fmt(err, f),
            Driver(err) => core::fmt::Display::fmt(err, f),
            InvalidArgument(err) => core::fmt::Display::fmt(err, f),
            InvalidQuery(err) => core::fmt::Display::fmt(err, f),
            Mapping(err) => core::fmt::Display::fmt(err, f),
            OptimisticLock(err) => core::fmt::Display::fmt(err, f),
            TypeConversion(err) => core::fmt::Display::fmt(err, f),
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error { kind }
    }
}
