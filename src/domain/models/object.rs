use chrono::{DateTime, Utc};

use crate::domain::value_objects::{BucketName, ObjectName};

/// The two independent object-level holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HoldKind {
    EventBased,
    Temporary,
}

impl HoldKind {
    /// Name of the flag on the wire
    pub fn field_name(&self) -> &'static str {
        match self {
            HoldKind::EventBased => "eventBasedHold",
            HoldKind::Temporary => "temporaryHold",
        }
    }

    /// Hold flag as reported for this object; an unset flag is inactive
    pub fn is_active(&self, object: &ObjectInfo) -> bool {
        self.value(object).unwrap_or(false)
    }

    pub fn value(&self, object: &ObjectInfo) -> Option<bool> {
        match self {
            HoldKind::EventBased => object.event_based_hold,
            HoldKind::Temporary => object.temporary_hold,
        }
    }
}

impl std::fmt::Display for HoldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HoldKind::EventBased => write!(f, "Event based hold"),
            HoldKind::Temporary => write!(f, "Temporary hold"),
        }
    }
}

/// Object metadata as reported by the storage service
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectInfo {
    pub bucket: BucketName,
    pub name: ObjectName,
    pub generation: i64,
    pub size: u64,
    pub etag: Option<String>,
    pub time_created: Option<DateTime<Utc>>,
    /// Derived by the service from the bucket's retention policy
    pub retention_expiration_time: Option<DateTime<Utc>>,
    pub event_based_hold: Option<bool>,
    pub temporary_hold: Option<bool>,
}

impl ObjectInfo {
    pub fn is_under_hold(&self) -> bool {
        HoldKind::EventBased.is_active(self) || HoldKind::Temporary.is_active(self)
    }

    /// Whether the service would accept a delete at `now`
    pub fn is_deletable(&self, now: DateTime<Utc>) -> bool {
        if self.is_under_hold() {
            return false;
        }

        match self.retention_expiration_time {
            Some(expires) => expires <= now,
            None => true,
        }
    }
}
