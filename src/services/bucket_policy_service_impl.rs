use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::{
    domain::{
        errors::{PolicyError, PolicyResult},
        models::{
            BucketInfo, HoldKind, ObjectInfo, OperationOutcome, PolicyOperation, RetentionPolicy,
            RetentionState,
        },
        value_objects::{BucketName, ObjectName, RetentionPeriod},
    },
    ports::{services::BucketPolicyService, storage::StorageService},
};

/// Applies retention and hold transitions through the storage service.
///
/// Holds no state of its own: every check reads the bucket fresh from the
/// service, and every collaborator failure is returned unchanged.
#[derive(Clone)]
pub struct BucketPolicyController {
    storage: Arc<dyn StorageService>,
}

impl BucketPolicyController {
    /// Create a new BucketPolicyController instance
    pub fn new(storage: Arc<dyn StorageService>) -> Self {
        Self { storage }
    }

    /// The storage service this controller talks to
    pub fn storage(&self) -> Arc<dyn StorageService> {
        self.storage.clone()
    }

    async fn apply_retention_period(
        &self,
        bucket: &BucketName,
        period: RetentionPeriod,
    ) -> PolicyResult<BucketInfo> {
        let current = self.storage.get_bucket(bucket).await?;

        if let RetentionState::Locked { period: locked, .. } = current.retention_state() {
            if period < locked {
                warn!(
                    "Refusing to shorten locked retention policy on {}: {}s -> {}s",
                    bucket, locked, period
                );
                return Err(PolicyError::invalid_argument(format!(
                    "retention policy of bucket {} is locked at {} seconds and can only be increased",
                    bucket, locked
                )));
            }
        }

        let updated = self
            .storage
            .patch_retention_policy(bucket, Some(period))
            .await?;
        info!("Retention period of {} set to {}s", bucket, period);

        Ok(updated)
    }

    async fn apply_object_hold(
        &self,
        bucket: &BucketName,
        object: &ObjectName,
        kind: HoldKind,
        enabled: bool,
    ) -> PolicyResult<ObjectInfo> {
        let updated = self
            .storage
            .patch_object_hold(bucket, object, kind, enabled)
            .await?;
        info!(
            "{} {} for {}/{}",
            kind,
            if enabled { "set" } else { "released" },
            bucket,
            object
        );

        Ok(updated)
    }
}

#[async_trait]
impl BucketPolicyService for BucketPolicyController {
    async fn set_retention_policy(
        &self,
        bucket: &BucketName,
        period_seconds: i64,
    ) -> PolicyResult<BucketInfo> {
        let period = RetentionPeriod::try_from(period_seconds)?;
        self.apply_retention_period(bucket, period).await
    }

    async fn remove_retention_policy(&self, bucket: &BucketName) -> PolicyResult<BucketInfo> {
        let current = self.storage.get_bucket(bucket).await?;

        match current.retention_state() {
            RetentionState::NoPolicy => Err(PolicyError::precondition_failed(
                bucket,
                "no retention policy is set",
            )),
            RetentionState::Locked { .. } => {
                warn!("Refusing to remove locked retention policy on {}", bucket);
                Err(PolicyError::precondition_failed(
                    bucket,
                    "retention policy is locked and cannot be removed",
                ))
            }
            RetentionState::Unlocked { .. } => {
                let updated = self.storage.patch_retention_policy(bucket, None).await?;
                info!("Removed retention policy of {}", bucket);
                Ok(updated)
            }
        }
    }

    async fn lock_retention_policy(&self, bucket: &BucketName) -> PolicyResult<BucketInfo> {
        let current = self.storage.get_bucket(bucket).await?;

        match current.retention_state() {
            RetentionState::NoPolicy => Err(PolicyError::precondition_failed(
                bucket,
                "no retention policy is set",
            )),
            RetentionState::Locked { .. } => Err(PolicyError::precondition_failed(
                bucket,
                "retention policy is already locked",
            )),
            RetentionState::Unlocked { .. } => {
                let updated = self
                    .storage
                    .lock_retention_policy(bucket, current.metageneration)
                    .await?;
                info!(
                    "Locked retention policy of {} at metageneration {}",
                    bucket, current.metageneration
                );
                Ok(updated)
            }
        }
    }

    async fn set_default_event_based_hold(
        &self,
        bucket: &BucketName,
        enabled: bool,
    ) -> PolicyResult<BucketInfo> {
        let updated = self
            .storage
            .patch_default_event_based_hold(bucket, enabled)
            .await?;
        info!(
            "Default event based hold {} for {}",
            if enabled { "enabled" } else { "disabled" },
            bucket
        );

        Ok(updated)
    }

    async fn set_event_based_hold(
        &self,
        bucket: &BucketName,
        object: &ObjectName,
        enabled: bool,
    ) -> PolicyResult<ObjectInfo> {
        self.apply_object_hold(bucket, object, HoldKind::EventBased, enabled)
            .await
    }

    async fn set_temporary_hold(
        &self,
        bucket: &BucketName,
        object: &ObjectName,
        enabled: bool,
    ) -> PolicyResult<ObjectInfo> {
        self.apply_object_hold(bucket, object, HoldKind::Temporary, enabled)
            .await
    }

    async fn get_retention_policy(
        &self,
        bucket: &BucketName,
    ) -> PolicyResult<Option<RetentionPolicy>> {
        let info = self.storage.get_bucket(bucket).await?;
        debug!("Fetched retention policy of {}", bucket);
        Ok(info.retention_policy)
    }

    async fn get_default_event_based_hold(&self, bucket: &BucketName) -> PolicyResult<bool> {
        let info = self.storage.get_bucket(bucket).await?;
        Ok(info.default_event_based_hold)
    }

    async fn get_object_holds(
        &self,
        bucket: &BucketName,
        object: &ObjectName,
    ) -> PolicyResult<ObjectInfo> {
        let info = self.storage.get_object(bucket, object).await?;
        debug!("Fetched holds of {}/{}", bucket, object);
        Ok(info)
    }

    async fn execute(
        &self,
        bucket: &BucketName,
        operation: PolicyOperation,
    ) -> PolicyResult<OperationOutcome> {
        let outcome = match operation {
            PolicyOperation::SetRetentionPolicy { period } => {
                self.apply_retention_period(bucket, period).await?;
                OperationOutcome::RetentionPolicySet {
                    bucket: bucket.clone(),
                    period,
                }
            }
            PolicyOperation::RemoveRetentionPolicy => {
                self.remove_retention_policy(bucket).await?;
                OperationOutcome::RetentionPolicyRemoved {
                    bucket: bucket.clone(),
                }
            }
            PolicyOperation::LockRetentionPolicy => {
                self.lock_retention_policy(bucket).await?;
                OperationOutcome::RetentionPolicyLocked {
                    bucket: bucket.clone(),
                }
            }
            PolicyOperation::SetDefaultHold { enabled } => {
                self.set_default_event_based_hold(bucket, enabled).await?;
                OperationOutcome::DefaultHoldChanged {
                    bucket: bucket.clone(),
                    enabled,
                }
            }
            PolicyOperation::SetObjectHold {
                object,
                kind,
                enabled,
            } => {
                self.apply_object_hold(bucket, &object, kind, enabled)
                    .await?;
                OperationOutcome::ObjectHoldChanged {
                    object,
                    kind,
                    enabled,
                }
            }
            PolicyOperation::GetRetentionPolicy => OperationOutcome::RetentionPolicyReport {
                bucket: bucket.clone(),
                policy: self.get_retention_policy(bucket).await?,
            },
            PolicyOperation::GetDefaultHold => OperationOutcome::DefaultHoldReport {
                bucket: bucket.clone(),
                enabled: self.get_default_event_based_hold(bucket).await?,
            },
            PolicyOperation::GetObjectHolds { object } => OperationOutcome::ObjectHoldsReport {
                object: self.get_object_holds(bucket, &object).await?,
            },
        };

        Ok(outcome)
    }
}

/// Builder for BucketPolicyController
pub struct BucketPolicyControllerBuilder {
    storage: Option<Arc<dyn StorageService>>,
}

impl BucketPolicyControllerBuilder {
    pub fn new() -> Self {
        Self { storage: None }
    }

    pub fn storage(mut self, storage: Arc<dyn StorageService>) -> Self {
        self.storage = Some(storage);
        self
    }

    pub fn build(self) -> Result<BucketPolicyController, &'static str> {
        let storage = self.storage.ok_or("Storage service is required")?;

        Ok(BucketPolicyController::new(storage))
    }
}

impl Default for BucketPolicyControllerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
