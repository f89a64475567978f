use crate::domain::value_objects::{BucketName, ObjectName};

/// Errors reported by the storage collaborator
///
/// These are carried through the policy layer unchanged so the caller sees the
/// collaborator's own message.
#[derive(Debug, Clone, PartialEq)]
pub enum StorageError {
    /// Bucket not found
    BucketNotFound { bucket: BucketName, message: String },

    /// Object not found
    ObjectNotFound {
        bucket: BucketName,
        object: ObjectName,
        message: String,
    },

    /// Bucket name already taken
    BucketAlreadyExists { bucket: BucketName, message: String },

    /// Caller is not allowed to perform the operation, or the service refused
    /// it because of a hold or a locked policy
    PermissionDenied { message: String },

    /// A request precondition (e.g. metageneration match) did not hold
    PreconditionFailed { message: String },

    /// The resource is in a state that conflicts with the request
    Conflict { message: String },

    /// The request was malformed
    InvalidRequest { message: String },

    /// Any other error status returned by the service
    ServiceError { code: u16, message: String },

    /// The request never produced a response
    Transport { message: String },

    /// Generic storage error
    InternalError { message: String },
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::BucketNotFound { bucket, message } => {
                write!(f, "Bucket not found: {}: {}", bucket, message)
            }
            StorageError::ObjectNotFound {
                bucket,
                object,
                message,
            } => {
                write!(f, "Object not found: {}/{}: {}", bucket, object, message)
            }
            StorageError::BucketAlreadyExists { bucket, message } => {
                write!(f, "Bucket already exists: {}: {}", bucket, message)
            }
            StorageError::PermissionDenied { message } => {
                write!(f, "Permission denied: {}", message)
            }
            StorageError::PreconditionFailed { message } => {
                write!(f, "Precondition failed: {}", message)
            }
            StorageError::Conflict { message } => {
                write!(f, "Conflict: {}", message)
            }
            StorageError::InvalidRequest { message } => {
                write!(f, "Invalid request: {}", message)
            }
            StorageError::ServiceError { code, message } => {
                write!(f, "Storage service error ({}): {}", code, message)
            }
            StorageError::Transport { message } => {
                write!(f, "Transport error: {}", message)
            }
            StorageError::InternalError { message } => {
                write!(f, "Internal storage error: {}", message)
            }
        }
    }
}

impl std::error::Error for StorageError {}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
