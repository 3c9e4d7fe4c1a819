//! `ObjectStorage` on top of any `object_store` implementation.
//!
//! A container is a top-level prefix. Its existence is recorded by a marker
//! object at `{container}/.container`; object keys never start with `.`, so
//! the marker cannot collide with a stored object. Content types are kept as
//! object attributes.

use crate::traits::{validate_segment, ObjectStorage, StorageError, StorageResult, StoredObject};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use mediagate_core::constants::DEFAULT_CONTENT_TYPE;
use object_store::memory::InMemory;
use object_store::path::Path;
use object_store::Error as ObjectStoreError;
use object_store::{
    Attribute, AttributeValue, Attributes, ObjectStore, ObjectStoreExt, PutMode, PutOptions,
    PutPayload,
};

const CONTAINER_MARKER: &str = ".container";

/// Object-store backed storage
#[derive(Debug, Clone)]
pub struct ObjectStoreBackend<S: ObjectStore> {
    store: S,
    backend: StorageBackend,
}

impl ObjectStoreBackend<InMemory> {
    /// Volatile backend, mainly for development and tests
    pub fn in_memory() -> Self {
        Self::new(InMemory::new(), StorageBackend::Memory)
    }
}

#[cfg(feature = "storage-s3")]
impl ObjectStoreBackend<object_store::aws::AmazonS3> {
    /// S3 (or S3-compatible) backend.
    ///
    /// Credentials come from the usual `AWS_*` environment variables.
    /// `endpoint` targets S3-compatible providers such as MinIO
    /// (e.g. "http://localhost:9000").
    pub fn s3(bucket: &str, region: &str, endpoint: Option<&str>) -> StorageResult<Self> {
        let mut builder = object_store::aws::AmazonS3Builder::from_env()
            .with_region(region)
            .with_bucket_name(bucket);

        if let Some(endpoint) = endpoint {
            builder = builder
                .with_endpoint(endpoint)
                .with_allow_http(endpoint.starts_with("http://"));
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        tracing::info!(bucket = %bucket, region = %region, "S3 storage backend initialized");

        Ok(Self::new(store, StorageBackend::S3))
    }
}

impl<S: ObjectStore> ObjectStoreBackend<S> {
    pub fn new(store: S, backend: StorageBackend) -> Self {
        Self { store, backend }
    }

    fn marker_path(container: &str) -> StorageResult<Path> {
        validate_segment("container", container)?;
        Ok(Path::from(format!("{}/{}", container, CONTAINER_MARKER)))
    }

    fn object_path(container: &str, key: &str) -> StorageResult<Path> {
        validate_segment("container", container)?;
        validate_segment("key", key)?;
        Ok(Path::from(format!("{}/{}", container, key)))
    }

    async fn exists(&self, location: &Path) -> StorageResult<bool> {
        match self.store.head(location).await {
            Ok(_) => Ok(true),
            Err(ObjectStoreError::NotFound { .. }) => Ok(false),
            Err(e) => Err(StorageError::BackendError(e.to_string())),
        }
    }
}

#[async_trait]
impl<S: ObjectStore> ObjectStorage for ObjectStoreBackend<S> {
    async fn container_exists(&self, container: &str) -> StorageResult<bool> {
        let marker = Self::marker_path(container)?;
        self.exists(&marker).await
    }

    async fn create_container(&self, container: &str) -> StorageResult<()> {
        let marker = Self::marker_path(container)?;

        let result = self
            .store
            .put_opts(&marker, PutPayload::new(), PutOptions::from(PutMode::Create))
            .await;

        match result {
            Ok(_) => {
                tracing::info!(container = %container, "Container created");
                Ok(())
            }
            Err(ObjectStoreError::AlreadyExists { .. }) => {
                Err(StorageError::AlreadyExists(container.to_string()))
            }
            // Stores without conditional writes: the marker write is idempotent
            Err(ObjectStoreError::NotImplemented { .. }) => {
                self.store
                    .put(&marker, PutPayload::new())
                    .await
                    .map_err(|e| StorageError::BackendError(e.to_string()))?;
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, container = %container, "Container creation failed");
                Err(StorageError::BackendError(e.to_string()))
            }
        }
    }

    async fn put_object(
        &self,
        container: &str,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> StorageResult<()> {
        let location = Self::object_path(container, key)?;
        let size = data.len() as u64;
        let start = std::time::Instant::now();

        let mut attributes = Attributes::new();
        attributes.insert(
            Attribute::ContentType,
            AttributeValue::from(content_type.to_string()),
        );
        let opts = PutOptions {
            attributes,
            ..Default::default()
        };

        self.store
            .put_opts(&location, PutPayload::from(data), opts)
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    container = %container,
                    key = %key,
                    size_bytes = size,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Object upload failed"
                );
                StorageError::BackendError(e.to_string())
            })?;

        tracing::debug!(
            container = %container,
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Object upload successful"
        );

        Ok(())
    }

    async fn object_exists(&self, container: &str, key: &str) -> StorageResult<bool> {
        let location = Self::object_path(container, key)?;
        self.exists(&location).await
    }

    async fn get_object(&self, container: &str, key: &str) -> StorageResult<StoredObject> {
        let location = Self::object_path(container, key)?;
        let start = std::time::Instant::now();

        let result = self.store.get(&location).await.map_err(|e| match e {
            ObjectStoreError::NotFound { .. } => {
                StorageError::NotFound(format!("{}/{}", container, key))
            }
            other => {
                tracing::error!(
                    error = %other,
                    container = %container,
                    key = %key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Object download failed"
                );
                StorageError::BackendError(other.to_string())
            }
        })?;

        let content_type = result
            .attributes
            .get(&Attribute::ContentType)
            .map(|value| {
                let value: &str = value.as_ref();
                value.to_string()
            })
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());

        let data = result
            .bytes()
            .await
            .map_err(|e| StorageError::BackendError(e.to_string()))?;

        tracing::debug!(
            container = %container,
            key = %key,
            size_bytes = data.len() as u64,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Object download successful"
        );

        Ok(StoredObject { data, content_type })
    }

    async fn delete_object_if_exists(&self, container: &str, key: &str) -> StorageResult<bool> {
        let location = Self::object_path(container, key)?;

        if !self.exists(&location).await? {
            return Ok(false);
        }

        match self.store.delete(&location).await {
            Ok(()) => Ok(true),
            // Removed concurrently between the head and the delete
            Err(ObjectStoreError::NotFound { .. }) => Ok(false),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    container = %container,
                    key = %key,
                    "Object delete failed"
                );
                Err(StorageError::BackendError(e.to_string()))
            }
        }
    }

    fn backend_type(&self) -> StorageBackend {
        self.backend
    }
}
