//! Storage abstraction trait
//!
//! This module defines the `ObjectStorage` trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// Creation lost to an existing container; callers treat it as success.
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Object bytes together with the content type recorded at write time
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub data: Bytes,
    pub content_type: String,
}

/// Storage abstraction trait
///
/// The gateway only relies on this capability; replication and durability
/// are the backend's business.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Check whether a container exists
    async fn container_exists(&self, container: &str) -> StorageResult<bool>;

    /// Create a container.
    ///
    /// Returns `StorageError::AlreadyExists` when the container is already
    /// there, including when a concurrent caller created it first.
    async fn create_container(&self, container: &str) -> StorageResult<()>;

    /// Write an object, recording `content_type` alongside it
    async fn put_object(
        &self,
        container: &str,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> StorageResult<()>;

    /// Check if an object exists
    async fn object_exists(&self, container: &str, key: &str) -> StorageResult<bool>;

    /// Read an object and its stored content type
    async fn get_object(&self, container: &str, key: &str) -> StorageResult<StoredObject>;

    /// Delete an object; `Ok(false)` when there was nothing to delete
    async fn delete_object_if_exists(&self, container: &str, key: &str) -> StorageResult<bool>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}

/// Reject names that could escape their container.
pub(crate) fn validate_segment(kind: &str, value: &str) -> StorageResult<()> {
    if value.is_empty()
        || value.contains("..")
        || value.contains('/')
        || value.contains('\\')
        || value.starts_with('.')
    {
        return Err(StorageError::InvalidKey(format!(
            "{} '{}' contains invalid characters",
            kind, value
        )));
    }
    Ok(())
}
