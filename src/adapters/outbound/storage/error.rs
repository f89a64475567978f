use crate::domain::errors::StorageError;
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum StoreError {
    #[error("Object store error: {0}")]
    ObjectStore(#[from] object_store::Error),

    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("HTTP error: {status} - {message}")]
    Api { status: u16, message: String },
}

/// Convert object_store errors to domain storage errors
impl From<object_store::Error> for StorageError {
    fn from(err: object_store::Error) -> Self {
        match err {
            object_store::Error::Precondition { .. } => StorageError::PreconditionFailed {
                message: err.to_string(),
            },
            object_store::Error::AlreadyExists { .. } => StorageError::Conflict {
                message: err.to_string(),
            },
            _ => StorageError::InternalError {
                message: format!("Object store operation failed: {}", err),
            },
        }
    }
}

/// Convert infrastructure StoreError to domain StorageError.
///
/// API errors that name a bucket or object are mapped by the adapter, which
/// knows the request target; this conversion handles the rest by status.
impl From<StoreError> for StorageError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::ObjectStore(object_err) => object_err.into(),
            StoreError::Transport(e) => StorageError::Transport {
                message: e.to_string(),
            },
            StoreError::Serialization(e) => StorageError::InternalError {
                message: format!("Failed to decode response: {}", e),
            },
            StoreError::MalformedResponse(message) => StorageError::InternalError { message },
            StoreError::Api { status, message } => match status {
                400 => StorageError::InvalidRequest { message },
                401 | 403 => StorageError::PermissionDenied { message },
                409 => StorageError::Conflict { message },
                412 => StorageError::PreconditionFailed { message },
                code => StorageError::ServiceError { code, message },
            },
        }
    }
}
