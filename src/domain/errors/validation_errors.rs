/// Validation errors for domain value objects
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    // BucketName validation errors
    BucketNameTooShort {
        actual: usize,
        min: usize,
    },
    BucketNameTooLong {
        actual: usize,
        max: usize,
    },
    BucketNameInvalidStart,
    BucketNameInvalidEnd,
    BucketNameInvalidCharacter(char),
    BucketNameConsecutiveDots,
    BucketNameReservedPrefix,
    BucketNameLooksLikeIpAddress,

    // ObjectName validation errors
    EmptyObjectName,
    ObjectNameTooLong {
        actual: usize,
        max: usize,
    },
    InvalidObjectNameCharacter(char),
    ObjectNameIsRelativePath,

    // RetentionPeriod validation errors
    RetentionPeriodNotPositive(i64),
    RetentionPeriodTooLong {
        actual: u64,
        max: u64,
    },

    MissingArgument(&'static str),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // BucketName errors
            ValidationError::BucketNameTooShort { actual, min } => {
                write!(
                    f,
                    "Bucket name too short: {} characters (min: {})",
                    actual, min
                )
            }
            ValidationError::BucketNameTooLong { actual, max } => {
                write!(
                    f,
                    "Bucket name too long: {} characters (max: {})",
                    actual, max
                )
            }
            ValidationError::BucketNameInvalidStart => {
                write!(f, "Bucket name must start with lowercase letter or number")
            }
            ValidationError::BucketNameInvalidEnd => {
                write!(f, "Bucket name must end with lowercase letter or number")
            }
            ValidationError::BucketNameInvalidCharacter(c) => {
                write!(
                    f,
                    "Invalid character in bucket name: '{}'. Only lowercase letters, numbers, hyphens, underscores and dots allowed",
                    c
                )
            }
            ValidationError::BucketNameConsecutiveDots => {
                write!(f, "Bucket name cannot contain consecutive dots")
            }
            ValidationError::BucketNameReservedPrefix => {
                write!(f, "Bucket name cannot begin with the \"goog\" prefix")
            }
            ValidationError::BucketNameLooksLikeIpAddress => {
                write!(f, "Bucket name cannot be formatted as an IP address")
            }

            // ObjectName errors
            ValidationError::EmptyObjectName => write!(f, "Object name cannot be empty"),
            ValidationError::ObjectNameTooLong { actual, max } => {
                write!(f, "Object name too long: {} bytes (max: {})", actual, max)
            }
            ValidationError::InvalidObjectNameCharacter(c) => {
                write!(f, "Invalid character in object name: {:?}", c)
            }
            ValidationError::ObjectNameIsRelativePath => {
                write!(f, "Object name cannot be '.' or '..'")
            }

            // RetentionPeriod errors
            ValidationError::RetentionPeriodNotPositive(value) => {
                write!(
                    f,
                    "Retention period must be greater than zero seconds, got {}",
                    value
                )
            }
            ValidationError::RetentionPeriodTooLong { actual, max } => {
                write!(
                    f,
                    "Retention period too long: {} seconds (max: {})",
                    actual, max
                )
            }

            ValidationError::MissingArgument(name) => {
                write!(f, "Missing required argument: {}", name)
            }
        }
    }
}

impl std::error::Error for ValidationError {}
