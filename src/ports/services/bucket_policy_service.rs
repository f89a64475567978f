use crate::domain::{
    errors::PolicyResult,
    models::{BucketInfo, ObjectInfo, OperationOutcome, PolicyOperation, RetentionPolicy},
    value_objects::{BucketName, ObjectName},
};
use async_trait::async_trait;

/// Port for bucket retention and hold management
/// This trait defines the legal transitions over a bucket/object pair
#[async_trait]
pub trait BucketPolicyService: Send + Sync + 'static {
    /// Set the retention period; `period_seconds` must be positive
    async fn set_retention_policy(
        &self,
        bucket: &BucketName,
        period_seconds: i64,
    ) -> PolicyResult<BucketInfo>;

    /// Remove an unlocked retention policy
    async fn remove_retention_policy(&self, bucket: &BucketName) -> PolicyResult<BucketInfo>;

    /// Lock the retention policy; irreversible
    async fn lock_retention_policy(&self, bucket: &BucketName) -> PolicyResult<BucketInfo>;

    /// Toggle the default event-based hold for objects uploaded from now on
    async fn set_default_event_based_hold(
        &self,
        bucket: &BucketName,
        enabled: bool,
    ) -> PolicyResult<BucketInfo>;

    /// Set or release an object's event-based hold
    async fn set_event_based_hold(
        &self,
        bucket: &BucketName,
        object: &ObjectName,
        enabled: bool,
    ) -> PolicyResult<ObjectInfo>;

    /// Set or release an object's temporary hold
    async fn set_temporary_hold(
        &self,
        bucket: &BucketName,
        object: &ObjectName,
        enabled: bool,
    ) -> PolicyResult<ObjectInfo>;

    /// Current retention policy, if any
    async fn get_retention_policy(
        &self,
        bucket: &BucketName,
    ) -> PolicyResult<Option<RetentionPolicy>>;

    /// Whether new uploads get an event-based hold
    async fn get_default_event_based_hold(&self, bucket: &BucketName) -> PolicyResult<bool>;

    /// Current hold flags of an object
    async fn get_object_holds(
        &self,
        bucket: &BucketName,
        object: &ObjectName,
    ) -> PolicyResult<ObjectInfo>;

    /// Run one operation and describe what happened
    async fn execute(
        &self,
        bucket: &BucketName,
        operation: PolicyOperation,
    ) -> PolicyResult<OperationOutcome>;
}
