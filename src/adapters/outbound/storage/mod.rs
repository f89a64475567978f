// Infrastructure error types
pub mod error;

// Storage implementations
pub mod gcs;
pub mod in_memory;

// Re-export key types
pub use error::StoreError;
pub use gcs::{GcsConfig, GcsStorageService};
pub use in_memory::InMemoryStorageService;
