pub mod adapters;
pub mod app;
pub mod domain;
pub mod ports;
pub mod services;

// Re-export key types for convenience

// Domain types - core entities and value objects
pub use domain::{
    BucketInfo,
    // Value objects
    BucketName,
    DomainValidationError,
    HoldKind,
    // Models
    ObjectInfo,
    ObjectName,
    OperationOutcome,
    // Errors
    PolicyError,
    PolicyOperation,
    RetentionPeriod,
    RetentionPolicy,
    RetentionState,
    StorageError,
};

// Port types - interfaces for external systems
pub use ports::{BucketPolicyService, StorageService};

// Service implementations - business logic
pub use services::{BucketPolicyController, BucketPolicyControllerBuilder};

// Application factory and configuration
pub use app::{
    create_app_from_env, create_gcs_app, create_in_memory_app, AppBuilder, AppConfig, AppError,
    AppServices, StorageBackend,
};

// Adapter types - infrastructure implementations
pub use adapters::outbound::storage::{GcsConfig, GcsStorageService, InMemoryStorageService};

// Public facade for easy construction
pub mod prelude {
    pub use crate::{
        create_in_memory_app, AppBuilder, AppServices, BucketName, BucketPolicyController,
        BucketPolicyService, GcsConfig, GcsStorageService, HoldKind, InMemoryStorageService,
        ObjectName, PolicyOperation, StorageService,
    };
}
