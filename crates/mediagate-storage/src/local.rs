use crate::traits::{validate_segment, ObjectStorage, StorageError, StorageResult, StoredObject};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use mediagate_core::constants::DEFAULT_CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Per-object metadata kept in a hidden sidecar file
#[derive(Debug, Serialize, Deserialize)]
struct ObjectMeta {
    content_type: String,
}

/// Local filesystem storage implementation
///
/// Containers are directories under `base_path`; each object is a file in its
/// container, with its content type stored in `.{key}.meta`.
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage instance rooted at `base_path`
    /// (e.g. "/var/lib/mediagate/media"), creating the directory if needed.
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage { base_path })
    }

    fn container_path(&self, container: &str) -> StorageResult<PathBuf> {
        validate_segment("container", container)?;
        Ok(self.base_path.join(container))
    }

    /// Convert (container, key) to the object and sidecar paths
    fn object_paths(&self, container: &str, key: &str) -> StorageResult<(PathBuf, PathBuf)> {
        validate_segment("key", key)?;
        let dir = self.container_path(container)?;
        Ok((dir.join(key), dir.join(format!(".{}.meta", key))))
    }
}

#[async_trait]
impl ObjectStorage for LocalStorage {
    async fn container_exists(&self, container: &str) -> StorageResult<bool> {
        let path = self.container_path(container)?;
        match fs::metadata(&path).await {
            Ok(meta) => Ok(meta.is_dir()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::IoError(e)),
        }
    }

    async fn create_container(&self, container: &str) -> StorageResult<()> {
        let path = self.container_path(container)?;
        match fs::create_dir(&path).await {
            Ok(()) => {
                tracing::info!(container = %container, path = %path.display(), "Container created");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                Err(StorageError::AlreadyExists(container.to_string()))
            }
            Err(e) => Err(StorageError::BackendError(format!(
                "Failed to create container directory {}: {}",
                path.display(),
                e
            ))),
        }
    }

    async fn put_object(
        &self,
        container: &str,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> StorageResult<()> {
        let (path, meta_path) = self.object_paths(container, key)?;
        let size = data.len();
        let start = std::time::Instant::now();

        let meta = serde_json::to_vec(&ObjectMeta {
            content_type: content_type.to_string(),
        })
        .map_err(|e| StorageError::BackendError(e.to_string()))?;

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::BackendError(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        file.write_all(&data).await.map_err(|e| {
            StorageError::BackendError(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::BackendError(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        if let Err(e) = fs::write(&meta_path, meta).await {
            // No object without its sidecar
            if let Err(remove_err) = fs::remove_file(&path).await {
                tracing::warn!(
                    error = %remove_err,
                    path = %path.display(),
                    "Failed to remove object after sidecar write failure"
                );
            }
            return Err(StorageError::BackendError(format!(
                "Failed to write metadata {}: {}",
                meta_path.display(),
                e
            )));
        }

        tracing::debug!(
            path = %path.display(),
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local file write successful"
        );

        Ok(())
    }

    async fn object_exists(&self, container: &str, key: &str) -> StorageResult<bool> {
        let (path, _) = self.object_paths(container, key)?;
        Ok(fs::try_exists(&path).await?)
    }

    async fn get_object(&self, container: &str, key: &str) -> StorageResult<StoredObject> {
        let (path, meta_path) = self.object_paths(container, key)?;

        let data = match fs::read(&path).await {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StorageError::NotFound(format!("{}/{}", container, key)))
            }
            Err(e) => {
                return Err(StorageError::BackendError(format!(
                    "Failed to read file {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        // Objects written without a sidecar fall back to the generic type
        let content_type = match fs::read(&meta_path).await {
            Ok(raw) => serde_json::from_slice::<ObjectMeta>(&raw)
                .map(|meta| meta.content_type)
                .unwrap_or_else(|_| DEFAULT_CONTENT_TYPE.to_string()),
            Err(e) if e.kind() == ErrorKind::NotFound => DEFAULT_CONTENT_TYPE.to_string(),
            Err(e) => return Err(StorageError::IoError(e)),
        };

        Ok(StoredObject {
            data: Bytes::from(data),
            content_type,
        })
    }

    async fn delete_object_if_exists(&self, container: &str, key: &str) -> StorageResult<bool> {
        let (path, meta_path) = self.object_paths(container, key)?;

        let removed = match fs::remove_file(&path).await {
            Ok(()) => true,
            Err(e) if e.kind() == ErrorKind::NotFound => false,
            Err(e) => {
                return Err(StorageError::BackendError(format!(
                    "Failed to delete file {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        match fs::remove_file(&meta_path).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    path = %meta_path.display(),
                    "Failed to remove metadata sidecar"
                );
            }
        }

        Ok(removed)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn storage() -> (TempDir, LocalStorage) {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path().join("media")).await.unwrap();
        (dir, storage)
    }

    #[tokio::test]
    async fn test_container_lifecycle() {
        let (_dir, storage) = storage().await;

        assert!(!storage.container_exists("media-acme").await.unwrap());
        storage.create_container("media-acme").await.unwrap();
        assert!(storage.container_exists("media-acme").await.unwrap());
        assert!(matches!(
            storage.create_container("media-acme").await,
            Err(StorageError::AlreadyExists(_))
        ));
    }

    #[tokio::test]
    async fn test_round_trip_with_content_type() {
        let (_dir, storage) = storage().await;
        storage.create_container("media-public").await.unwrap();

        storage
            .put_object(
                "media-public",
                "doc.pdf",
                Bytes::from_static(b"%PDF-1.7"),
                "application/pdf",
            )
            .await
            .unwrap();

        assert!(storage.object_exists("media-public", "doc.pdf").await.unwrap());
        let object = storage.get_object("media-public", "doc.pdf").await.unwrap();
        assert_eq!(object.data.as_ref(), b"%PDF-1.7");
        assert_eq!(object.content_type, "application/pdf");
    }

    #[tokio::test]
    async fn test_sidecar_failure_removes_object() {
        let (dir, storage) = storage().await;
        storage.create_container("media-acme").await.unwrap();
        // A directory in the sidecar's place makes the metadata write fail
        fs::create_dir(dir.path().join("media").join("media-acme").join(".a.png.meta"))
            .await
            .unwrap();

        let result = storage
            .put_object("media-acme", "a.png", Bytes::from_static(b"png"), "image/png")
            .await;

        assert!(matches!(result, Err(StorageError::BackendError(_))));
        assert!(!storage.object_exists("media-acme", "a.png").await.unwrap());
    }

    #[tokio::test]
    async fn test_put_without_container_fails() {
        let (_dir, storage) = storage().await;
        let result = storage
            .put_object("media-missing", "a.bin", Bytes::from_static(b"x"), "text/plain")
            .await;
        assert!(matches!(result, Err(StorageError::BackendError(_))));
    }

    #[tokio::test]
    async fn test_delete_if_exists() {
        let (_dir, storage) = storage().await;
        storage.create_container("media-public").await.unwrap();
        storage
            .put_object("media-public", "a.bin", Bytes::from_static(b"x"), "text/plain")
            .await
            .unwrap();

        assert!(storage.delete_object_if_exists("media-public", "a.bin").await.unwrap());
        assert!(!storage.delete_object_if_exists("media-public", "a.bin").await.unwrap());
        assert!(matches!(
            storage.get_object("media-public", "a.bin").await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_rejects_path_traversal() {
        let (_dir, storage) = storage().await;
        assert!(matches!(
            storage.container_exists("..").await,
            Err(StorageError::InvalidKey(_))
        ));
        assert!(matches!(
            storage.object_exists("media-public", "../../etc/passwd").await,
            Err(StorageError::InvalidKey(_))
        ));
    }
}
