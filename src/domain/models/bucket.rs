use crate::domain::value_objects::{BucketName, RetentionPeriod};
use chrono::{DateTime, Utc};

/// Retention policy attached to a bucket
#[derive(Debug, Clone, PartialEq)]
pub struct RetentionPolicy {
    pub retention_period: RetentionPeriod,
    /// Set by the service when the policy is applied
    pub effective_time: Option<DateTime<Utc>>,
    /// An unset lock flag is reported as `false`
    pub is_locked: bool,
}

impl RetentionPolicy {
    /// Expiration time for objects governed by this policy
    pub fn expiration_time(&self) -> Option<DateTime<Utc>> {
        self.effective_time
            .map(|effective| effective + self.retention_period.as_duration())
    }
}

/// Where a bucket sits in the retention state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetentionState {
    NoPolicy,
    Unlocked {
        period: RetentionPeriod,
        effective_time: Option<DateTime<Utc>>,
    },
    Locked {
        period: RetentionPeriod,
        effective_time: Option<DateTime<Utc>>,
    },
}

impl RetentionState {
    pub fn is_locked(&self) -> bool {
        matches!(self, RetentionState::Locked { .. })
    }

    pub fn period(&self) -> Option<RetentionPeriod> {
        match self {
            RetentionState::NoPolicy => None,
            RetentionState::Unlocked { period, .. } | RetentionState::Locked { period, .. } => {
                Some(*period)
            }
        }
    }
}

/// Bucket metadata as reported by the storage service
#[derive(Debug, Clone, PartialEq)]
pub struct BucketInfo {
    pub name: BucketName,
    pub retention_policy: Option<RetentionPolicy>,
    pub default_event_based_hold: bool,
    /// Metadata revision, bumped on every change
    pub metageneration: i64,
    pub time_created: Option<DateTime<Utc>>,
}

impl BucketInfo {
    pub fn new(name: BucketName) -> Self {
        Self {
            name,
            retention_policy: None,
            default_event_based_hold: false,
            metageneration: 1,
            time_created: None,
        }
    }

    pub fn retention_state(&self) -> RetentionState {
        match &self.retention_policy {
            None => RetentionState::NoPolicy,
            Some(policy) if policy.is_locked => RetentionState::Locked {
                period: policy.retention_period,
                effective_time: policy.effective_time,
            },
            Some(policy) => RetentionState::Unlocked {
                period: policy.retention_period,
                effective_time: policy.effective_time,
            },
        }
    }

    pub fn is_retention_locked(&self) -> bool {
        self.retention_state().is_locked()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bucket() -> BucketInfo {
        BucketInfo::new(BucketName::new("state-bucket".to_string()).unwrap())
    }

    #[test]
    fn test_retention_state_transitions() {
        let mut info = bucket();
        assert_eq!(info.retention_state(), RetentionState::NoPolicy);
        assert!(!info.is_retention_locked());

        let period = RetentionPeriod::from_secs(5).unwrap();
        info.retention_policy = Some(RetentionPolicy {
            retention_period: period,
            effective_time: Some(Utc::now()),
            is_locked: false,
        });
        assert!(matches!(
            info.retention_state(),
            RetentionState::Unlocked { .. }
        ));
        assert_eq!(info.retention_state().period(), Some(period));

        if let Some(policy) = info.retention_policy.as_mut() {
            policy.is_locked = true;
        }
        assert!(info.is_retention_locked());
        assert_eq!(info.retention_state().period(), Some(period));
    }

    #[test]
    fn test_expiration_time_adds_period_to_effective_time() {
        let effective = DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let policy = RetentionPolicy {
            retention_period: RetentionPeriod::from_secs(90).unwrap(),
            effective_time: Some(effective),
            is_locked: false,
        };

        assert_eq!(
            policy.expiration_time().unwrap().to_rfc3339(),
            "2024-01-01T00:01:30+00:00"
        );
    }
}
