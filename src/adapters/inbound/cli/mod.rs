//! The `bucket-lock` command: flags in, one confirmation line per completed
//! operation out.

use clap::{Args, Parser};
use std::io::Write;
use tracing::warn;

use crate::{
    adapters::outbound::storage::gcs::{GcsConfig, DEFAULT_ENDPOINT},
    app::{AppConfig, StorageBackend},
    domain::{
        errors::{PolicyError, PolicyResult, ValidationError},
        models::{HoldKind, PolicyOperation},
        value_objects::{BucketName, ObjectName, RetentionPeriod},
    },
    ports::services::BucketPolicyService,
};

#[derive(Parser, Debug, Clone)]
#[command(name = "bucket-lock")]
#[command(about = "Manage retention policies and holds on a bucket and its objects", long_about = None)]
pub struct BucketLockCli {
    #[command(flatten)]
    pub command: BucketLockArgs,

    #[command(flatten)]
    pub backend: BackendArgs,

    /// Log level
    #[arg(long, env = "LOG_LEVEL", default_value = "warn")]
    pub log_level: String,
}

/// Target and requested operations
#[derive(Args, Debug, Clone, Default)]
pub struct BucketLockArgs {
    /// Bucket name
    pub bucket: String,

    /// Object name, required for object hold operations
    pub object: Option<String>,

    /// Retention period in seconds
    #[arg(long, allow_negative_numbers = true)]
    pub retention_period: Option<i64>,

    /// Set a retention policy of --retention-period seconds
    #[arg(long)]
    pub set_retention_policy: bool,

    /// Remove the (unlocked) retention policy
    #[arg(long)]
    pub remove_retention_policy: bool,

    /// Lock the retention policy; this cannot be undone
    #[arg(long)]
    pub lock_retention_policy: bool,

    /// Enable the default event-based hold for new objects
    #[arg(long)]
    pub enable_default_event_based_hold: bool,

    /// Disable the default event-based hold for new objects
    #[arg(long)]
    pub disable_default_event_based_hold: bool,

    /// Set an event-based hold on the object
    #[arg(long)]
    pub set_event_based_hold: bool,

    /// Release the object's event-based hold
    #[arg(long)]
    pub release_event_based_hold: bool,

    /// Set a temporary hold on the object
    #[arg(long)]
    pub set_temporary_hold: bool,

    /// Release the object's temporary hold
    #[arg(long)]
    pub release_temporary_hold: bool,

    /// Print the bucket's retention policy
    #[arg(long)]
    pub get_retention_policy: bool,

    /// Print whether the default event-based hold is enabled
    #[arg(long)]
    pub get_default_event_based_hold: bool,

    /// Print the object's hold flags
    #[arg(long)]
    pub get_object_holds: bool,
}

/// Connection to the Cloud Storage JSON API.
///
/// The in-memory backend is not offered here: each run would start from an
/// empty store with no buckets in it. Library callers get it through
/// `create_in_memory_app`.
#[derive(Args, Debug, Clone)]
pub struct BackendArgs {
    /// Cloud Storage endpoint
    #[arg(long, env = "GCS_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub gcs_endpoint: String,

    /// OAuth2 access token
    #[arg(long, env = "GCS_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    /// Project that owns new buckets
    #[arg(long, env = "GCS_PROJECT")]
    pub project: Option<String>,

    /// Project billed for requester-pays buckets
    #[arg(long, env = "GCS_USER_PROJECT")]
    pub user_project: Option<String>,
}

impl BackendArgs {
    pub fn to_app_config(&self) -> AppConfig {
        let config = GcsConfig::builder()
            .endpoint(self.gcs_endpoint.clone())
            .maybe_access_token(self.access_token.clone())
            .maybe_project(self.project.clone())
            .maybe_user_project(self.user_project.clone())
            .build();

        AppConfig {
            storage_backend: StorageBackend::Gcs(config),
        }
    }
}

impl BucketLockArgs {
    fn object_name(&self) -> PolicyResult<ObjectName> {
        let name = self
            .object
            .clone()
            .ok_or(ValidationError::MissingArgument("object"))?;
        Ok(ObjectName::new(name)?)
    }

    fn object_hold(&self, kind: HoldKind, enabled: bool) -> PolicyResult<PolicyOperation> {
        Ok(PolicyOperation::SetObjectHold {
            object: self.object_name()?,
            kind,
            enabled,
        })
    }

    /// Validate the arguments and list the operations to run, in execution
    /// order: retention policy first, then holds, then queries.
    pub fn plan(&self) -> PolicyResult<(BucketName, Vec<PolicyOperation>)> {
        let bucket = BucketName::new(self.bucket.clone())?;
        let mut operations = Vec::new();

        if self.set_retention_policy {
            let seconds = self
                .retention_period
                .ok_or(ValidationError::MissingArgument("retention-period"))?;
            operations.push(PolicyOperation::SetRetentionPolicy {
                period: RetentionPeriod::try_from(seconds)?,
            });
        }
        if self.remove_retention_policy {
            operations.push(PolicyOperation::RemoveRetentionPolicy);
        }
        if self.lock_retention_policy {
            operations.push(PolicyOperation::LockRetentionPolicy);
        }

        if self.enable_default_event_based_hold {
            operations.push(PolicyOperation::SetDefaultHold { enabled: true });
        }
        if self.disable_default_event_based_hold {
            operations.push(PolicyOperation::SetDefaultHold { enabled: false });
        }
        if self.set_event_based_hold {
            operations.push(self.object_hold(HoldKind::EventBased, true)?);
        }
        if self.release_event_based_hold {
            operations.push(self.object_hold(HoldKind::EventBased, false)?);
        }
        if self.set_temporary_hold {
            operations.push(self.object_hold(HoldKind::Temporary, true)?);
        }
        if self.release_temporary_hold {
            operations.push(self.object_hold(HoldKind::Temporary, false)?);
        }

        if self.get_retention_policy {
            operations.push(PolicyOperation::GetRetentionPolicy);
        }
        if self.get_default_event_based_hold {
            operations.push(PolicyOperation::GetDefaultHold);
        }
        if self.get_object_holds {
            operations.push(PolicyOperation::GetObjectHolds {
                object: self.object_name()?,
            });
        }

        Ok((bucket, operations))
    }
}

/// Errors from running the command
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error(transparent)]
    Policy(#[from] PolicyError),

    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

/// Run the planned operations in order, writing one line per completed
/// operation. Stops at the first failure; nothing is written for it.
pub async fn run_command<W: Write>(
    service: &dyn BucketPolicyService,
    args: &BucketLockArgs,
    out: &mut W,
) -> Result<usize, CommandError> {
    let (bucket, operations) = args.plan()?;
    if operations.is_empty() {
        warn!("No operation requested for bucket {}", bucket);
    }

    let mut completed = 0;
    for operation in operations {
        let outcome = service.execute(&bucket, operation).await?;
        writeln!(out, "{}", outcome)?;
        completed += 1;
    }

    Ok(completed)
}
