use std::sync::Arc;
use tracing::debug;

use crate::{
    adapters::outbound::storage::{GcsConfig, GcsStorageService, InMemoryStorageService},
    ports::storage::StorageService,
    services::{BucketPolicyController, BucketPolicyControllerBuilder},
};

/// Configuration for the application
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub storage_backend: StorageBackend,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage_backend: StorageBackend::InMemory,
        }
    }
}

/// Storage backend configuration
#[derive(Debug, Clone)]
pub enum StorageBackend {
    InMemory,
    Gcs(GcsConfig),
}

/// Application services container
pub struct AppServices {
    pub policy_controller: BucketPolicyController,
    /// Direct handle on the storage service, for creating and tearing down
    /// buckets and objects around policy operations
    pub storage: Arc<dyn StorageService>,
}

/// Application builder for dependency injection
pub struct AppBuilder {
    config: AppConfig,
}

impl AppBuilder {
    /// Create a new application builder
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
        }
    }

    /// Configure the application with custom settings
    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    /// Configure storage backend
    pub fn with_storage_backend(mut self, backend: StorageBackend) -> Self {
        self.config.storage_backend = backend;
        self
    }

    /// Use an already constructed storage service
    pub fn build_with_storage(storage: Arc<dyn StorageService>) -> Result<AppServices, AppError> {
        let policy_controller = BucketPolicyControllerBuilder::new()
            .storage(storage.clone())
            .build()
            .map_err(|message| AppError::ServiceInit {
                message: message.to_string(),
            })?;

        Ok(AppServices {
            policy_controller,
            storage,
        })
    }

    /// Build the complete application with services
    pub fn build(self) -> Result<AppServices, AppError> {
        let storage = self.create_storage_service()?;
        Self::build_with_storage(storage)
    }

    /// Create the storage service based on configuration
    fn create_storage_service(&self) -> Result<Arc<dyn StorageService>, AppError> {
        match &self.config.storage_backend {
            StorageBackend::InMemory => {
                debug!("Using in-memory storage service");
                Ok(Arc::new(InMemoryStorageService::new()))
            }
            StorageBackend::Gcs(config) => {
                if !config.endpoint.starts_with("http://") && !config.endpoint.starts_with("https://")
                {
                    return Err(AppError::StorageInit {
                        message: format!("Invalid endpoint: {}", config.endpoint),
                    });
                }
                debug!("Using Cloud Storage JSON API at {}", config.endpoint);
                Ok(Arc::new(GcsStorageService::new(config.clone())))
            }
        }
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Application-level errors
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Storage initialization error: {message}")]
    StorageInit { message: String },

    #[error("Service initialization error: {message}")]
    ServiceInit { message: String },
}

/// Convenience functions for common configurations
///
/// Create an in-memory application for testing and development
pub fn create_in_memory_app() -> Result<AppServices, AppError> {
    AppBuilder::new()
        .with_storage_backend(StorageBackend::InMemory)
        .build()
}

/// Create an application backed by the Cloud Storage JSON API
pub fn create_gcs_app(config: GcsConfig) -> Result<AppServices, AppError> {
    AppBuilder::new()
        .with_storage_backend(StorageBackend::Gcs(config))
        .build()
}

/// Create application from environment variables
pub fn create_app_from_env() -> Result<AppServices, AppError> {
    let storage_backend = match std::env::var("STORAGE_BACKEND").as_deref() {
        Ok("memory") => StorageBackend::InMemory,
        Ok("gcs") | Err(_) => {
            let config = GcsConfig::builder()
                .maybe_endpoint(std::env::var("GCS_ENDPOINT").ok())
                .maybe_access_token(std::env::var("GCS_ACCESS_TOKEN").ok())
                .maybe_project(std::env::var("GCS_PROJECT").ok())
                .maybe_user_project(std::env::var("GCS_USER_PROJECT").ok())
                .build();
            StorageBackend::Gcs(config)
        }
        Ok(other) => {
            return Err(AppError::Configuration {
                message: format!("Unknown storage backend: {}", other),
            })
        }
    };

    AppBuilder::new()
        .with_storage_backend(storage_backend)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{domain::value_objects::BucketName, ports::services::BucketPolicyService};

    #[tokio::test]
    async fn test_in_memory_app_shares_storage_with_controller() {
        let app = create_in_memory_app().unwrap();
        let bucket = BucketName::new("app-bucket".to_string()).unwrap();

        app.storage.create_bucket(&bucket).await.unwrap();
        app.policy_controller
            .set_default_event_based_hold(&bucket, true)
            .await
            .unwrap();

        assert!(app.storage.get_bucket(&bucket).await.unwrap().default_event_based_hold);
    }

    #[test]
    fn test_gcs_app_rejects_bad_endpoint() {
        let config = GcsConfig::builder().endpoint("storage.local").build();
        assert!(matches!(
            create_gcs_app(config),
            Err(AppError::StorageInit { .. })
        ));
    }

    #[test]
    fn test_gcs_app_builds() {
        let config = GcsConfig::builder()
            .endpoint("http://localhost:4443")
            .project("test-project")
            .build();
        assert!(create_gcs_app(config).is_ok());
    }
}
