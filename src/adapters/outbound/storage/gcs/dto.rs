//! Wire representations of the Cloud Storage JSON API resources this crate
//! touches. int64 fields are transported as JSON strings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::adapters::outbound::storage::error::StoreError;
use crate::domain::{
    models::{BucketInfo, ObjectInfo, RetentionPolicy},
    value_objects::{BucketName, ObjectName, RetentionPeriod},
};

/// Retention policy properties of a bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetentionPolicyResource {
    /// Duration in seconds that objects need to be retained.
    pub retention_period: String,
    /// Server-determined time from which the policy was enforced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_locked: Option<bool>,
}

/// The subset of the bucket resource used here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketResource {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metageneration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_created: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retention_policy: Option<RetentionPolicyResource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_event_based_hold: Option<bool>,
}

/// The subset of the object resource used here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectResource {
    pub bucket: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_created: Option<DateTime<Utc>>,
    /// Earliest time the object can be deleted under the bucket's policy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retention_expiration_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_based_hold: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temporary_hold: Option<bool>,
}

/// Request body for bucket creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BucketCreationConfig {
    pub name: String,
}

/// An error response returned from Cloud Storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
    #[serde(default)]
    pub errors: Vec<ErrorResponseItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponseItem {
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub reason: String,
    pub message: String,
}

/// The error body wraps the response in an extra `error` level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorWrapper {
    pub error: ErrorResponse,
}

impl ErrorWrapper {
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            error: ErrorResponse {
                code,
                message: message.into(),
                errors: Vec::new(),
            },
        }
    }
}

fn parse_int<T: std::str::FromStr>(field: &str, value: &str) -> Result<T, StoreError> {
    value
        .parse()
        .map_err(|_| StoreError::MalformedResponse(format!("invalid {}: {:?}", field, value)))
}

impl TryFrom<RetentionPolicyResource> for RetentionPolicy {
    type Error = StoreError;

    fn try_from(resource: RetentionPolicyResource) -> Result<Self, Self::Error> {
        let seconds: u64 = parse_int("retentionPeriod", &resource.retention_period)?;
        let retention_period = RetentionPeriod::from_secs(seconds)
            .map_err(|e| StoreError::MalformedResponse(e.to_string()))?;

        Ok(RetentionPolicy {
            retention_period,
            effective_time: resource.effective_time,
            is_locked: resource.is_locked.unwrap_or(false),
        })
    }
}

impl From<&RetentionPolicy> for RetentionPolicyResource {
    fn from(policy: &RetentionPolicy) -> Self {
        Self {
            retention_period: policy.retention_period.to_string(),
            effective_time: policy.effective_time,
            is_locked: Some(policy.is_locked),
        }
    }
}

impl TryFrom<BucketResource> for BucketInfo {
    type Error = StoreError;

    fn try_from(resource: BucketResource) -> Result<Self, Self::Error> {
        let name = BucketName::new(resource.name)
            .map_err(|e| StoreError::MalformedResponse(e.to_string()))?;
        let metageneration = match resource.metageneration {
            Some(value) => parse_int("metageneration", &value)?,
            None => 1,
        };
        let retention_policy = resource
            .retention_policy
            .map(RetentionPolicy::try_from)
            .transpose()?;

        Ok(BucketInfo {
            name,
            retention_policy,
            default_event_based_hold: resource.default_event_based_hold.unwrap_or(false),
            metageneration,
            time_created: resource.time_created,
        })
    }
}

impl From<&BucketInfo> for BucketResource {
    fn from(info: &BucketInfo) -> Self {
        Self {
            name: info.name.to_string(),
            metageneration: Some(info.metageneration.to_string()),
            time_created: info.time_created,
            retention_policy: info.retention_policy.as_ref().map(Into::into),
            default_event_based_hold: Some(info.default_event_based_hold),
        }
    }
}

impl TryFrom<ObjectResource> for ObjectInfo {
    type Error = StoreError;

    fn try_from(resource: ObjectResource) -> Result<Self, Self::Error> {
        let bucket = BucketName::new(resource.bucket)
            .map_err(|e| StoreError::MalformedResponse(e.to_string()))?;
        let name = ObjectName::new(resource.name)
            .map_err(|e| StoreError::MalformedResponse(e.to_string()))?;

        Ok(ObjectInfo {
            bucket,
            name,
            generation: match resource.generation {
                Some(value) => parse_int("generation", &value)?,
                None => 0,
            },
            size: match resource.size {
                Some(value) => parse_int("size", &value)?,
                None => 0,
            },
            etag: resource.etag,
            time_created: resource.time_created,
            retention_expiration_time: resource.retention_expiration_time,
            event_based_hold: resource.event_based_hold,
            temporary_hold: resource.temporary_hold,
        })
    }
}

impl From<&ObjectInfo> for ObjectResource {
    fn from(info: &ObjectInfo) -> Self {
        Self {
            bucket: info.bucket.to_string(),
            name: info.name.to_string(),
            generation: Some(info.generation.to_string()),
            size: Some(info.size.to_string()),
            etag: info.etag.clone(),
            time_created: info.time_created,
            retention_expiration_time: info.retention_expiration_time,
            event_based_hold: info.event_based_hold,
            temporary_hold: info.temporary_hold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bucket_resource_from_api_json() {
        let body = json!({
            "kind": "storage#bucket",
            "name": "rust-bucket-lock",
            "metageneration": "3",
            "timeCreated": "2024-05-01T10:00:00.123Z",
            "retentionPolicy": {
                "retentionPeriod": "5",
                "effectiveTime": "2024-05-01T10:00:01.000Z"
            },
            "defaultEventBasedHold": true
        });

        let resource: BucketResource = serde_json::from_value(body).unwrap();
        let info = BucketInfo::try_from(resource).unwrap();

        assert_eq!(info.name.as_str(), "rust-bucket-lock");
        assert_eq!(info.metageneration, 3);
        assert!(info.default_event_based_hold);
        let policy = info.retention_policy.unwrap();
        assert_eq!(policy.retention_period.as_secs(), 5);
        // Missing isLocked means unlocked
        assert!(!policy.is_locked);
        assert!(policy.effective_time.is_some());
    }

    #[test]
    fn test_bucket_without_policy_or_hold() {
        let resource: BucketResource =
            serde_json::from_value(json!({ "name": "plain-bucket" })).unwrap();
        let info = BucketInfo::try_from(resource).unwrap();

        assert!(info.retention_policy.is_none());
        assert!(!info.default_event_based_hold);
    }

    #[test]
    fn test_object_resource_keeps_unset_holds() {
        let body = json!({
            "bucket": "plain-bucket",
            "name": "test-object",
            "generation": "1714557600123456",
            "size": "3",
            "temporaryHold": true
        });

        let resource: ObjectResource = serde_json::from_value(body).unwrap();
        let info = ObjectInfo::try_from(resource).unwrap();

        assert_eq!(info.generation, 1714557600123456);
        assert_eq!(info.size, 3);
        assert_eq!(info.event_based_hold, None);
        assert_eq!(info.temporary_hold, Some(true));
        assert!(info.retention_expiration_time.is_none());
    }

    #[test]
    fn test_malformed_int64_is_rejected() {
        let resource: BucketResource = serde_json::from_value(json!({
            "name": "plain-bucket",
            "retentionPolicy": { "retentionPeriod": "soon" }
        }))
        .unwrap();

        assert!(matches!(
            BucketInfo::try_from(resource),
            Err(StoreError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_bucket_resource_serializes_camel_case() {
        let mut info = BucketInfo::new(BucketName::new("plain-bucket".to_string()).unwrap());
        info.retention_policy = Some(RetentionPolicy {
            retention_period: RetentionPeriod::from_secs(5).unwrap(),
            effective_time: None,
            is_locked: false,
        });

        let value = serde_json::to_value(BucketResource::from(&info)).unwrap();
        assert_eq!(value["retentionPolicy"]["retentionPeriod"], "5");
        assert_eq!(value["retentionPolicy"]["isLocked"], false);
        assert_eq!(value["defaultEventBasedHold"], false);
        assert_eq!(value["metageneration"], "1");
    }

    #[test]
    fn test_error_wrapper_parses_api_error() {
        let body = json!({
            "error": {
                "code": 403,
                "message": "Object is under active Temporary hold",
                "errors": [{
                    "domain": "global",
                    "reason": "forbidden",
                    "message": "Object is under active Temporary hold"
                }]
            }
        });

        let wrapper: ErrorWrapper = serde_json::from_value(body).unwrap();
        assert_eq!(wrapper.error.code, 403);
        assert_eq!(wrapper.error.errors[0].reason, "forbidden");
    }
}
