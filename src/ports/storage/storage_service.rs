use crate::domain::{
    errors::StorageResult,
    models::{BucketInfo, HoldKind, ObjectInfo},
    value_objects::{BucketName, ObjectName, RetentionPeriod},
};
use async_trait::async_trait;
use bytes::Bytes;

/// Port for the remote storage service
/// This abstracts the actual backend (Cloud Storage JSON API, in-memory emulation)
///
/// Implementations own all bucket and object state and enforce retention and
/// hold rules themselves; callers re-fetch state with `get_bucket` /
/// `get_object` instead of caching it.
#[async_trait]
pub trait StorageService: Send + Sync + 'static {
    /// Create an empty bucket
    async fn create_bucket(&self, bucket: &BucketName) -> StorageResult<BucketInfo>;

    /// Delete an empty bucket
    async fn delete_bucket(&self, bucket: &BucketName) -> StorageResult<()>;

    /// Fetch the authoritative bucket metadata
    async fn get_bucket(&self, bucket: &BucketName) -> StorageResult<BucketInfo>;

    /// Upload an object; holds are seeded from the bucket defaults
    async fn upload_object(
        &self,
        bucket: &BucketName,
        object: &ObjectName,
        data: Bytes,
        content_type: Option<&str>,
    ) -> StorageResult<ObjectInfo>;

    /// Fetch the authoritative object metadata
    async fn get_object(
        &self,
        bucket: &BucketName,
        object: &ObjectName,
    ) -> StorageResult<ObjectInfo>;

    /// Delete an object
    async fn delete_object(&self, bucket: &BucketName, object: &ObjectName) -> StorageResult<()>;

    /// Set (`Some`) or remove (`None`) the bucket's retention policy
    async fn patch_retention_policy(
        &self,
        bucket: &BucketName,
        period: Option<RetentionPeriod>,
    ) -> StorageResult<BucketInfo>;

    /// Lock the retention policy if the bucket's metageneration still matches
    async fn lock_retention_policy(
        &self,
        bucket: &BucketName,
        if_metageneration_match: i64,
    ) -> StorageResult<BucketInfo>;

    /// Set the bucket's default event-based hold
    async fn patch_default_event_based_hold(
        &self,
        bucket: &BucketName,
        enabled: bool,
    ) -> StorageResult<BucketInfo>;

    /// Set one of the object's hold flags
    async fn patch_object_hold(
        &self,
        bucket: &BucketName,
        object: &ObjectName,
        kind: HoldKind,
        enabled: bool,
    ) -> StorageResult<ObjectInfo>;
}
