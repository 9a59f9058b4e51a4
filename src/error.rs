use thiserror::Error;

/// Failure of a store operation.
///
/// A missing todo on update or delete is not an error; see
/// [`crate::db::Outcome::NoOp`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be opened, configured, or upgraded.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("Read failed: {0}")]
    ReadFailed(String),
    #[error("Write failed: {0}")]
    WriteFailed(String),
}

impl StoreError {
    pub(crate) fn unavailable(err: impl std::fmt::Display) -> Self {
        StoreError::StoreUnavailable(err.to_string())
    }

    pub(crate) fn read_failed(err: sqlx::Error) -> Self {
        StoreError::ReadFailed(err.to_string())
    }

    pub(crate) fn write_failed(err: sqlx::Error) -> Self {
        StoreError::WriteFailed(err.to_string())
    }
}
