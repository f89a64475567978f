use crate::domain::{
    errors::{StorageError, ValidationError},
    value_objects::BucketName,
};

/// Errors surfaced by the bucket policy controller
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PolicyError {
    /// Malformed period or missing identifier
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// The requested transition is not legal from the bucket's current state
    #[error("Precondition failed for bucket {bucket}: {reason}")]
    PreconditionFailed { bucket: BucketName, reason: String },

    /// Failure returned by the storage collaborator, passed through unchanged
    #[error(transparent)]
    RemoteService(#[from] StorageError),
}

impl PolicyError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        PolicyError::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn precondition_failed(bucket: &BucketName, reason: impl Into<String>) -> Self {
        PolicyError::PreconditionFailed {
            bucket: bucket.clone(),
            reason: reason.into(),
        }
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, PolicyError::InvalidArgument { .. })
    }

    pub fn is_precondition_failed(&self) -> bool {
        matches!(self, PolicyError::PreconditionFailed { .. })
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, PolicyError::RemoteService(_))
    }
}

impl From<ValidationError> for PolicyError {
    fn from(err: ValidationError) -> Self {
        PolicyError::InvalidArgument {
            message: err.to_string(),
        }
    }
}

/// Result type for policy operations
pub type PolicyResult<T> = Result<T, PolicyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_error_keeps_collaborator_message() {
        let err: PolicyError = StorageError::PermissionDenied {
            message: "caller does not have storage.buckets.update access".to_string(),
        }
        .into();

        assert!(err.is_remote());
        assert_eq!(
            err.to_string(),
            "Permission denied: caller does not have storage.buckets.update access"
        );
    }

    #[test]
    fn test_validation_error_becomes_invalid_argument() {
        let err: PolicyError = ValidationError::RetentionPeriodNotPositive(0).into();
        assert!(err.is_invalid_argument());
        assert!(err.to_string().contains("greater than zero"));
    }
}
