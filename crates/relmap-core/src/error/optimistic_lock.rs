use super::Error;

/// Error when a versioned update affects zero rows.
///
/// Raised when optimistic locking is configured and an update carrying the
/// expected version matches nothing, meaning another writer changed or
/// deleted the row since it was read.
#[derive(Debug)]
pub(super) struct OptimisticLockError {
    pub(super) model: Box<str>,
    pub(super) id: i64,
}

impl core::fmt::Display for OptimisticLockError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "optimistic lock failure: stale data while updating {} id={}",
            self.model, self.id
        )
    }
}

impl Error {
    /// Creates an optimistic lock error for the given model and id.
    pub fn optimistic_lock(model: impl Into<String>, id: i64) -> Error {
        Error::from(super::ErrorKind::OptimisticLock(OptimisticLockError {
            model: model.into().into(),
            id,
        }))
    }

    /// Returns `true` if this error is an optimistic lock error.
    pub fn is_optimistic_lock(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::OptimisticLock(_))
    }
}
