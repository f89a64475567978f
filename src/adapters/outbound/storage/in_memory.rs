use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use object_store::{
    memory::InMemory, path::Path as ObjectPath, ObjectStore as ApacheObjectStore, PutPayload,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use super::error::StoreError;
use crate::{
    domain::{
        errors::{StorageError, StorageResult},
        models::{BucketInfo, HoldKind, ObjectInfo, RetentionPolicy},
        value_objects::{BucketName, ObjectName, RetentionPeriod},
    },
    ports::storage::StorageService,
};

/// Source of "now" for the emulated service
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// In-process emulation of the storage service's retention and hold rules,
/// for testing and local development.
///
/// Metadata lives behind a `RwLock`; payload bytes go to an
/// `object_store` in-memory store keyed by `bucket/object`.
#[derive(Clone)]
pub struct InMemoryStorageService {
    data: Arc<RwLock<ServiceData>>,
    payloads: Arc<dyn ApacheObjectStore>,
    clock: Clock,
}

#[derive(Default)]
struct ServiceData {
    buckets: HashMap<BucketName, BucketEntry>,
    last_generation: i64,
}

struct BucketEntry {
    info: BucketInfo,
    objects: HashMap<ObjectName, ObjectInfo>,
}

impl BucketEntry {
    /// Object metadata with the retention expiration derived from the
    /// bucket's current policy
    fn view(&self, object: &ObjectInfo) -> ObjectInfo {
        let mut view = object.clone();
        view.retention_expiration_time = self
            .info
            .retention_policy
            .as_ref()
            .and_then(RetentionPolicy::expiration_time);
        view
    }

    fn touch(&mut self) {
        self.info.metageneration += 1;
    }
}

impl ServiceData {
    fn bucket(&self, bucket: &BucketName) -> StorageResult<&BucketEntry> {
        self.buckets
            .get(bucket)
            .ok_or_else(|| bucket_not_found(bucket))
    }

    fn bucket_mut(&mut self, bucket: &BucketName) -> StorageResult<&mut BucketEntry> {
        self.buckets
            .get_mut(bucket)
            .ok_or_else(|| bucket_not_found(bucket))
    }

    /// Generations are microsecond timestamps, strictly increasing
    fn next_generation(&mut self, now: DateTime<Utc>) -> i64 {
        self.last_generation = now.timestamp_micros().max(self.last_generation + 1);
        self.last_generation
    }
}

// Messages match the ones the service puts in its error bodies
fn bucket_not_found(bucket: &BucketName) -> StorageError {
    StorageError::BucketNotFound {
        bucket: bucket.clone(),
        message: "The specified bucket does not exist.".to_string(),
    }
}

fn object_not_found(bucket: &BucketName, object: &ObjectName) -> StorageError {
    StorageError::ObjectNotFound {
        bucket: bucket.clone(),
        object: object.clone(),
        message: format!("No such object: {}/{}", bucket, object),
    }
}

fn payload_path(bucket: &BucketName, object: &ObjectName) -> ObjectPath {
    ObjectPath::from_iter([bucket.as_str(), object.as_str()])
}

/// Why the service would refuse to delete or overwrite `object` at `now`
fn deletion_blocker(object: &ObjectInfo, now: DateTime<Utc>) -> Option<String> {
    if object.is_deletable(now) {
        return None;
    }

    let active_hold = [HoldKind::EventBased, HoldKind::Temporary]
        .into_iter()
        .find(|kind| kind.is_active(object));
    let reason = match active_hold {
        Some(kind) => format!(
            "Object '{}/{}' is under active {} hold and cannot be deleted, overwritten or archived until hold is removed.",
            object.bucket,
            object.name,
            match kind {
                HoldKind::EventBased => "Event-Based",
                HoldKind::Temporary => "Temporary",
            }
        ),
        None => format!(
            "Object '{}/{}' is subject to bucket's retention policy and cannot be deleted, overwritten or archived until {}",
            object.bucket,
            object.name,
            object
                .retention_expiration_time
                .map(|expires| expires.to_rfc3339())
                .unwrap_or_default()
        ),
    };

    Some(reason)
}

impl InMemoryStorageService {
    pub fn new() -> Self {
        Self::with_clock(Utc::now)
    }

    /// Use a custom clock, e.g. to step past retention expiry in tests
    pub fn with_clock(clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
        Self {
            data: Arc::new(RwLock::new(ServiceData::default())),
            payloads: Arc::new(InMemory::new()),
            clock: Arc::new(clock),
        }
    }

    fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    /// Read back an object's payload
    pub async fn read_object(
        &self,
        bucket: &BucketName,
        object: &ObjectName,
    ) -> StorageResult<Bytes> {
        {
            let data = self.data.read().await;
            if !data.bucket(bucket)?.objects.contains_key(object) {
                return Err(object_not_found(bucket, object));
            }
        }

        let result = self
            .payloads
            .get(&payload_path(bucket, object))
            .await
            .map_err(StoreError::from)?;
        let bytes = result.bytes().await.map_err(StoreError::from)?;

        Ok(bytes)
    }
}

impl Default for InMemoryStorageService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StorageService for InMemoryStorageService {
    async fn create_bucket(&self, bucket: &BucketName) -> StorageResult<BucketInfo> {
        let mut data = self.data.write().await;

        if data.buckets.contains_key(bucket) {
            return Err(StorageError::BucketAlreadyExists {
                bucket: bucket.clone(),
                message: "Your previous request to create the named bucket succeeded and you already own it.".to_string(),
            });
        }

        let mut info = BucketInfo::new(bucket.clone());
        info.time_created = Some(self.now());
        data.buckets.insert(
            bucket.clone(),
            BucketEntry {
                info: info.clone(),
                objects: HashMap::new(),
            },
        );
        debug!("Created bucket {}", bucket);

        Ok(info)
    }

    async fn delete_bucket(&self, bucket: &BucketName) -> StorageResult<()> {
        let mut data = self.data.write().await;

        if !data.bucket(bucket)?.objects.is_empty() {
            return Err(StorageError::Conflict {
                message: "The bucket you tried to delete is not empty.".to_string(),
            });
        }

        data.buckets.remove(bucket);
        debug!("Deleted bucket {}", bucket);
        Ok(())
    }

    async fn get_bucket(&self, bucket: &BucketName) -> StorageResult<BucketInfo> {
        let data = self.data.read().await;
        Ok(data.bucket(bucket)?.info.clone())
    }

    async fn upload_object(
        &self,
        bucket: &BucketName,
        object: &ObjectName,
        payload: Bytes,
        _content_type: Option<&str>,
    ) -> StorageResult<ObjectInfo> {
        let now = self.now();
        let mut data = self.data.write().await;

        let default_hold = {
            let entry = data.bucket(bucket)?;
            if let Some(existing) = entry.objects.get(object) {
                if let Some(reason) = deletion_blocker(&entry.view(existing), now) {
                    return Err(StorageError::PermissionDenied { message: reason });
                }
            }
            entry.info.default_event_based_hold
        };

        let etag = format!("{:x}", md5::compute(&payload));
        let size = payload.len() as u64;
        self.payloads
            .put(&payload_path(bucket, object), PutPayload::from(payload))
            .await
            .map_err(StoreError::from)?;

        let generation = data.next_generation(now);
        let stored = ObjectInfo {
            bucket: bucket.clone(),
            name: object.clone(),
            generation,
            size,
            etag: Some(etag),
            time_created: Some(now),
            retention_expiration_time: None,
            // The bucket default only seeds objects at upload time
            event_based_hold: default_hold.then_some(true),
            temporary_hold: None,
        };

        let entry = data.bucket_mut(bucket)?;
        let view = entry.view(&stored);
        entry.objects.insert(object.clone(), stored);
        debug!("Uploaded {}/{} ({} bytes)", bucket, object, size);

        Ok(view)
    }

    async fn get_object(
        &self,
        bucket: &BucketName,
        object: &ObjectName,
    ) -> StorageResult<ObjectInfo> {
        let data = self.data.read().await;
        let entry = data.bucket(bucket)?;
        entry
            .objects
            .get(object)
            .map(|stored| entry.view(stored))
            .ok_or_else(|| object_not_found(bucket, object))
    }

    async fn delete_object(&self, bucket: &BucketName, object: &ObjectName) -> StorageResult<()> {
        let now = self.now();
        let mut data = self.data.write().await;

        {
            let entry = data.bucket(bucket)?;
            let stored = entry
                .objects
                .get(object)
                .ok_or_else(|| object_not_found(bucket, object))?;
            if let Some(reason) = deletion_blocker(&entry.view(stored), now) {
                return Err(StorageError::PermissionDenied { message: reason });
            }
        }

        self.payloads
            .delete(&payload_path(bucket, object))
            .await
            .map_err(StoreError::from)?;
        data.bucket_mut(bucket)?.objects.remove(object);
        debug!("Deleted {}/{}", bucket, object);

        Ok(())
    }

    async fn patch_retention_policy(
        &self,
        bucket: &BucketName,
        period: Option<RetentionPeriod>,
    ) -> StorageResult<BucketInfo> {
        let now = self.now();
        let mut data = self.data.write().await;
        let entry = data.bucket_mut(bucket)?;

        let locked_period = entry
            .info
            .retention_policy
            .as_ref()
            .filter(|policy| policy.is_locked)
            .map(|policy| policy.retention_period);

        entry.info.retention_policy = match (period, locked_period) {
            (None, Some(_)) => {
                return Err(StorageError::PermissionDenied {
                    message: format!(
                        "Cannot remove the locked retention policy of bucket {}.",
                        bucket
                    ),
                });
            }
            (Some(requested), Some(locked)) if requested < locked => {
                return Err(StorageError::PermissionDenied {
                    message: format!(
                        "Cannot reduce the retention period of locked bucket {} from {} to {} seconds.",
                        bucket, locked, requested
                    ),
                });
            }
            (None, None) => None,
            (Some(requested), locked) => Some(RetentionPolicy {
                retention_period: requested,
                effective_time: Some(now),
                is_locked: locked.is_some(),
            }),
        };
        entry.touch();

        Ok(entry.info.clone())
    }

    async fn lock_retention_policy(
        &self,
        bucket: &BucketName,
        if_metageneration_match: i64,
    ) -> StorageResult<BucketInfo> {
        let mut data = self.data.write().await;
        let entry = data.bucket_mut(bucket)?;

        if entry.info.metageneration != if_metageneration_match {
            return Err(StorageError::PreconditionFailed {
                message: format!(
                    "Bucket {} metageneration is {}, expected {}",
                    bucket, entry.info.metageneration, if_metageneration_match
                ),
            });
        }

        match entry.info.retention_policy.as_mut() {
            None => {
                return Err(StorageError::InvalidRequest {
                    message: format!("Bucket {} has no retention policy to lock.", bucket),
                });
            }
            Some(policy) => policy.is_locked = true,
        }
        entry.touch();

        Ok(entry.info.clone())
    }

    async fn patch_default_event_based_hold(
        &self,
        bucket: &BucketName,
        enabled: bool,
    ) -> StorageResult<BucketInfo> {
        let mut data = self.data.write().await;
        let entry = data.bucket_mut(bucket)?;

        entry.info.default_event_based_hold = enabled;
        entry.touch();

        Ok(entry.info.clone())
    }

    async fn patch_object_hold(
        &self,
        bucket: &BucketName,
        object: &ObjectName,
        kind: HoldKind,
        enabled: bool,
    ) -> StorageResult<ObjectInfo> {
        let mut data = self.data.write().await;
        let entry = data.bucket_mut(bucket)?;

        let stored = entry
            .objects
            .get_mut(object)
            .ok_or_else(|| object_not_found(bucket, object))?;
        match kind {
            HoldKind::EventBased => stored.event_based_hold = Some(enabled),
            HoldKind::Temporary => stored.temporary_hold = Some(enabled),
        }
        let stored = stored.clone();

        Ok(entry.view(&stored))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::sync::Mutex;

    fn bucket() -> BucketName {
        BucketName::new("memory-bucket".to_string()).unwrap()
    }

    fn object() -> ObjectName {
        ObjectName::new("test-object".to_string()).unwrap()
    }

    fn period(seconds: u64) -> RetentionPeriod {
        RetentionPeriod::from_secs(seconds).unwrap()
    }

    #[tokio::test]
    async fn test_bucket_lifecycle() {
        let service = InMemoryStorageService::new();

        let created = service.create_bucket(&bucket()).await.unwrap();
        assert!(created.retention_policy.is_none());
        assert!(!created.default_event_based_hold);
        assert!(matches!(
            service.create_bucket(&bucket()).await,
            Err(StorageError::BucketAlreadyExists { .. })
        ));

        service.delete_bucket(&bucket()).await.unwrap();
        assert!(matches!(
            service.get_bucket(&bucket()).await,
            Err(StorageError::BucketNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_upload_stores_payload_and_seeds_hold() {
        let service = InMemoryStorageService::new();
        service.create_bucket(&bucket()).await.unwrap();

        let plain = service
            .upload_object(&bucket(), &object(), Bytes::from_static(b"foo"), None)
            .await
            .unwrap();
        assert_eq!(plain.event_based_hold, None);
        assert_eq!(plain.temporary_hold, None);
        assert_eq!(plain.size, 3);
        assert_eq!(
            plain.etag.as_deref(),
            Some("acbd18db4cc2f85cedef654fccc4a4d8")
        );
        assert_eq!(
            service.read_object(&bucket(), &object()).await.unwrap(),
            Bytes::from_static(b"foo")
        );

        service
            .patch_default_event_based_hold(&bucket(), true)
            .await
            .unwrap();
        // Existing objects are not affected by the new default
        let existing = service.get_object(&bucket(), &object()).await.unwrap();
        assert_eq!(existing.event_based_hold, None);

        let held_name = ObjectName::new("held-object".to_string()).unwrap();
        let held = service
            .upload_object(&bucket(), &held_name, Bytes::from_static(b"bar"), None)
            .await
            .unwrap();
        assert_eq!(held.event_based_hold, Some(true));
        assert!(held.generation > plain.generation);
    }

    #[tokio::test]
    async fn test_retention_policy_rules() {
        let service = InMemoryStorageService::new();
        let initial = service.create_bucket(&bucket()).await.unwrap();

        let set = service
            .patch_retention_policy(&bucket(), Some(period(10)))
            .await
            .unwrap();
        assert!(set.metageneration > initial.metageneration);
        let policy = set.retention_policy.clone().unwrap();
        assert!(!policy.is_locked);
        assert!(policy.effective_time.is_some());

        // Stale metageneration
        assert!(matches!(
            service
                .lock_retention_policy(&bucket(), initial.metageneration)
                .await,
            Err(StorageError::PreconditionFailed { .. })
        ));

        let locked = service
            .lock_retention_policy(&bucket(), set.metageneration)
            .await
            .unwrap();
        assert!(locked.is_retention_locked());

        assert!(matches!(
            service.patch_retention_policy(&bucket(), None).await,
            Err(StorageError::PermissionDenied { .. })
        ));
        assert!(matches!(
            service
                .patch_retention_policy(&bucket(), Some(period(5)))
                .await,
            Err(StorageError::PermissionDenied { .. })
        ));

        let grown = service
            .patch_retention_policy(&bucket(), Some(period(20)))
            .await
            .unwrap();
        let policy = grown.retention_policy.unwrap();
        assert!(policy.is_locked);
        assert_eq!(policy.retention_period, period(20));
    }

    #[tokio::test]
    async fn test_lock_without_policy_is_rejected() {
        let service = InMemoryStorageService::new();
        let info = service.create_bucket(&bucket()).await.unwrap();

        assert!(matches!(
            service
                .lock_retention_policy(&bucket(), info.metageneration)
                .await,
            Err(StorageError::InvalidRequest { .. })
        ));
    }

    #[tokio::test]
    async fn test_delete_blocked_by_holds_and_retention() {
        let now = Arc::new(Mutex::new(Utc::now()));
        let clock = now.clone();
        let service = InMemoryStorageService::with_clock(move || *clock.lock().unwrap());
        service.create_bucket(&bucket()).await.unwrap();
        service
            .upload_object(&bucket(), &object(), Bytes::from_static(b"foo"), None)
            .await
            .unwrap();

        service
            .patch_object_hold(&bucket(), &object(), HoldKind::Temporary, true)
            .await
            .unwrap();
        assert!(matches!(
            service.delete_object(&bucket(), &object()).await,
            Err(StorageError::PermissionDenied { .. })
        ));
        service
            .patch_object_hold(&bucket(), &object(), HoldKind::Temporary, false)
            .await
            .unwrap();

        service
            .patch_retention_policy(&bucket(), Some(period(5)))
            .await
            .unwrap();
        let info = service.get_object(&bucket(), &object()).await.unwrap();
        assert!(info.retention_expiration_time.is_some());
        assert!(matches!(
            service.delete_object(&bucket(), &object()).await,
            Err(StorageError::PermissionDenied { .. })
        ));

        *now.lock().unwrap() += Duration::seconds(6);
        service.delete_object(&bucket(), &object()).await.unwrap();
        assert!(matches!(
            service.read_object(&bucket(), &object()).await,
            Err(StorageError::ObjectNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_delete_non_empty_bucket_conflicts() {
        let service = InMemoryStorageService::new();
        service.create_bucket(&bucket()).await.unwrap();
        service
            .upload_object(&bucket(), &object(), Bytes::from_static(b"foo"), None)
            .await
            .unwrap();

        assert!(matches!(
            service.delete_bucket(&bucket()).await,
            Err(StorageError::Conflict { .. })
        ));
    }

    #[tokio::test]
    async fn test_delete_agrees_with_reported_deletability() {
        let now = Arc::new(Mutex::new(Utc::now()));
        let clock = now.clone();
        let service = InMemoryStorageService::with_clock(move || *clock.lock().unwrap());
        service.create_bucket(&bucket()).await.unwrap();
        service
            .patch_retention_policy(&bucket(), Some(period(5)))
            .await
            .unwrap();
        service
            .upload_object(&bucket(), &object(), Bytes::from_static(b"foo"), None)
            .await
            .unwrap();
        service
            .patch_object_hold(&bucket(), &object(), HoldKind::EventBased, true)
            .await
            .unwrap();

        let info = service.get_object(&bucket(), &object()).await.unwrap();
        assert!(!info.is_deletable(*now.lock().unwrap()));
        match service.delete_object(&bucket(), &object()).await {
            Err(StorageError::PermissionDenied { message }) => {
                assert!(message.contains("Event-Based hold"));
            }
            other => panic!("Expected hold refusal, got {:?}", other),
        }

        service
            .patch_object_hold(&bucket(), &object(), HoldKind::EventBased, false)
            .await
            .unwrap();
        let info = service.get_object(&bucket(), &object()).await.unwrap();
        assert!(!info.is_deletable(*now.lock().unwrap()));
        match service.delete_object(&bucket(), &object()).await {
            Err(StorageError::PermissionDenied { message }) => {
                assert!(message.contains("retention policy"));
            }
            other => panic!("Expected retention refusal, got {:?}", other),
        }

        *now.lock().unwrap() += Duration::seconds(6);
        let info = service.get_object(&bucket(), &object()).await.unwrap();
        assert!(info.is_deletable(*now.lock().unwrap()));
        service.delete_object(&bucket(), &object()).await.unwrap();
    }

    #[tokio::test]
    async fn test_not_found_errors_carry_service_message() {
        let service = InMemoryStorageService::new();

        match service.get_bucket(&bucket()).await {
            Err(StorageError::BucketNotFound { message, .. }) => {
                assert_eq!(message, "The specified bucket does not exist.");
            }
            other => panic!("Expected BucketNotFound, got {:?}", other),
        }

        service.create_bucket(&bucket()).await.unwrap();
        match service.get_object(&bucket(), &object()).await {
            Err(StorageError::ObjectNotFound { message, .. }) => {
                assert_eq!(message, "No such object: memory-bucket/test-object");
            }
            other => panic!("Expected ObjectNotFound, got {:?}", other),
        }
    }
}
