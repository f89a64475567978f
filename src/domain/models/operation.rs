use crate::domain::{
    models::{HoldKind, ObjectInfo, RetentionPolicy},
    value_objects::{BucketName, ObjectName, RetentionPeriod},
};

/// A single policy operation against one bucket
#[derive(Debug, Clone, PartialEq)]
pub enum PolicyOperation {
    SetRetentionPolicy {
        period: RetentionPeriod,
    },
    RemoveRetentionPolicy,
    LockRetentionPolicy,
    SetDefaultHold {
        enabled: bool,
    },
    SetObjectHold {
        object: ObjectName,
        kind: HoldKind,
        enabled: bool,
    },
    GetRetentionPolicy,
    GetDefaultHold,
    GetObjectHolds {
        object: ObjectName,
    },
}

/// Result of a completed policy operation.
///
/// `Display` renders the confirmation line (or report) printed by the CLI.
#[derive(Debug, Clone, PartialEq)]
pub enum OperationOutcome {
    RetentionPolicySet {
        bucket: BucketName,
        period: RetentionPeriod,
    },
    RetentionPolicyRemoved {
        bucket: BucketName,
    },
    RetentionPolicyLocked {
        bucket: BucketName,
    },
    DefaultHoldChanged {
        bucket: BucketName,
        enabled: bool,
    },
    ObjectHoldChanged {
        object: ObjectName,
        kind: HoldKind,
        enabled: bool,
    },
    RetentionPolicyReport {
        bucket: BucketName,
        policy: Option<RetentionPolicy>,
    },
    DefaultHoldReport {
        bucket: BucketName,
        enabled: bool,
    },
    ObjectHoldsReport {
        object: ObjectInfo,
    },
}

fn on_off(flag: bool) -> &'static str {
    if flag { "on" } else { "off" }
}

impl std::fmt::Display for OperationOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperationOutcome::RetentionPolicySet { bucket, period } => {
                write!(
                    f,
                    "Bucket {} retention period set for {} seconds",
                    bucket, period
                )
            }
            OperationOutcome::RetentionPolicyRemoved { bucket } => {
                write!(f, "Removed bucket {} retention policy", bucket)
            }
            OperationOutcome::RetentionPolicyLocked { bucket } => {
                write!(f, "Bucket {} retention policy locked", bucket)
            }
            OperationOutcome::DefaultHoldChanged { bucket, enabled } => {
                let state = if *enabled { "enabled" } else { "disabled" };
                write!(f, "Default event based hold was {} for {}", state, bucket)
            }
            OperationOutcome::ObjectHoldChanged {
                object,
                kind,
                enabled,
            } => {
                let state = if *enabled { "set" } else { "released" };
                write!(f, "{} was {} for {}", kind, state, object)
            }
            OperationOutcome::RetentionPolicyReport { bucket, policy } => match policy {
                None => write!(f, "Bucket {} has no retention policy", bucket),
                Some(policy) => {
                    write!(f, "Retention Policy for {}", bucket)?;
                    write!(f, "\nRetention Period: {}", policy.retention_period)?;
                    if let Some(effective) = policy.effective_time {
                        write!(f, "\nEffective Time: {}", effective.to_rfc3339())?;
                    }
                    if policy.is_locked {
                        write!(f, "\nRetention Policy is locked")?;
                    }
                    Ok(())
                }
            },
            OperationOutcome::DefaultHoldReport { bucket, enabled } => {
                if *enabled {
                    write!(f, "Default event-based hold is enabled for {}", bucket)
                } else {
                    write!(f, "Default event-based hold is not enabled for {}", bucket)
                }
            }
            OperationOutcome::ObjectHoldsReport { object } => {
                write!(
                    f,
                    "Object {} event based hold: {}, temporary hold: {}",
                    object.name,
                    on_off(HoldKind::EventBased.is_active(object)),
                    on_off(HoldKind::Temporary.is_active(object))
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn bucket() -> BucketName {
        BucketName::new("outcome-bucket".to_string()).unwrap()
    }

    fn object() -> ObjectName {
        ObjectName::new("test-object".to_string()).unwrap()
    }

    #[test]
    fn test_confirmation_lines() {
        let period = RetentionPeriod::from_secs(5).unwrap();
        let cases = vec![
            (
                OperationOutcome::RetentionPolicySet {
                    bucket: bucket(),
                    period,
                },
                "Bucket outcome-bucket retention period set for 5 seconds",
            ),
            (
                OperationOutcome::RetentionPolicyRemoved { bucket: bucket() },
                "Removed bucket outcome-bucket retention policy",
            ),
            (
                OperationOutcome::RetentionPolicyLocked { bucket: bucket() },
                "Bucket outcome-bucket retention policy locked",
            ),
            (
                OperationOutcome::DefaultHoldChanged {
                    bucket: bucket(),
                    enabled: true,
                },
                "Default event based hold was enabled for outcome-bucket",
            ),
            (
                OperationOutcome::DefaultHoldChanged {
                    bucket: bucket(),
                    enabled: false,
                },
                "Default event based hold was disabled for outcome-bucket",
            ),
            (
                OperationOutcome::ObjectHoldChanged {
                    object: object(),
                    kind: HoldKind::EventBased,
                    enabled: false,
                },
                "Event based hold was released for test-object",
            ),
            (
                OperationOutcome::ObjectHoldChanged {
                    object: object(),
                    kind: HoldKind::Temporary,
                    enabled: true,
                },
                "Temporary hold was set for test-object",
            ),
        ];

        for (outcome, expected) in cases {
            assert_eq!(outcome.to_string(), expected);
        }
    }

    #[test]
    fn test_retention_policy_report() {
        let effective = DateTime::parse_from_rfc3339("2024-03-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let report = OperationOutcome::RetentionPolicyReport {
            bucket: bucket(),
            policy: Some(RetentionPolicy {
                retention_period: RetentionPeriod::from_secs(60).unwrap(),
                effective_time: Some(effective),
                is_locked: true,
            }),
        };

        assert_eq!(
            report.to_string(),
            "Retention Policy for outcome-bucket\n\
             Retention Period: 60\n\
             Effective Time: 2024-03-01T12:00:00+00:00\n\
             Retention Policy is locked"
        );

        let empty = OperationOutcome::RetentionPolicyReport {
            bucket: bucket(),
            policy: None,
        };
        assert_eq!(
            empty.to_string(),
            "Bucket outcome-bucket has no retention policy"
        );
    }
}
