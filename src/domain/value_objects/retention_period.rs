use crate::domain::errors::ValidationError;

/// Retention period of a bucket's retention policy, in whole seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RetentionPeriod(u64);

impl RetentionPeriod {
    /// 100 years; the service rejects anything at or above this
    pub const MAX_SECONDS: u64 = 3_155_760_000;

    pub fn from_secs(seconds: u64) -> Result<Self, ValidationError> {
        if seconds == 0 {
            return Err(ValidationError::RetentionPeriodNotPositive(0));
        }

        if seconds >= Self::MAX_SECONDS {
            return Err(ValidationError::RetentionPeriodTooLong {
                actual: seconds,
                max: Self::MAX_SECONDS - 1,
            });
        }

        Ok(Self(seconds))
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }

    pub fn as_duration(&self) -> chrono::Duration {
        // MAX_SECONDS keeps this well inside i64
        chrono::Duration::seconds(self.0 as i64)
    }
}

impl TryFrom<i64> for RetentionPeriod {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if value <= 0 {
            return Err(ValidationError::RetentionPeriodNotPositive(value));
        }
        Self::from_secs(value as u64)
    }
}

impl std::fmt::Display for RetentionPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_periods() {
        assert_eq!(RetentionPeriod::from_secs(5).unwrap().as_secs(), 5);
        assert_eq!(RetentionPeriod::try_from(86_400i64).unwrap().as_secs(), 86_400);
        assert!(RetentionPeriod::from_secs(RetentionPeriod::MAX_SECONDS - 1).is_ok());
    }

    #[test]
    fn test_rejects_non_positive_and_oversized_periods() {
        assert_eq!(
            RetentionPeriod::try_from(0i64),
            Err(ValidationError::RetentionPeriodNotPositive(0))
        );
        assert_eq!(
            RetentionPeriod::try_from(-5i64),
            Err(ValidationError::RetentionPeriodNotPositive(-5))
        );
        assert!(RetentionPeriod::from_secs(RetentionPeriod::MAX_SECONDS).is_err());
    }

    #[test]
    fn test_ordering_follows_seconds() {
        let short = RetentionPeriod::from_secs(5).unwrap();
        let long = RetentionPeriod::from_secs(10).unwrap();
        assert!(short < long);
        assert_eq!(long.as_duration(), chrono::Duration::seconds(10));
    }
}
