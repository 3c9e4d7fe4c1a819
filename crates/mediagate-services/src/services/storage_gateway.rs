//! Upload, download and delete of tenant media.

use bytes::{Bytes, BytesMut};
use futures::{Stream, StreamExt};
use mediagate_core::constants::DEFAULT_CONTENT_TYPE;
use mediagate_core::{
    AuditAction, AuditRecord, AuditSink, AuthorizationGateway, ContainerHandle, GatewayError,
    GatewayResult, RequestContext, StoredObjectKey, UploadedMedia,
};
use mediagate_processing::MetadataExtractor;
use mediagate_storage::{ObjectStorage, StorageError, StoredObject};
use std::fmt;
use std::sync::Arc;

use super::ContainerRegistry;

/// Failure reading an upload body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyError {
    /// The transport gave up because the body went over its size limit.
    TooLarge(String),
    /// Any other read failure.
    Read(String),
}

impl fmt::Display for BodyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BodyError::TooLarge(msg) => write!(f, "body too large: {}", msg),
            BodyError::Read(msg) => write!(f, "{}", msg),
        }
    }
}

impl From<std::io::Error> for BodyError {
    fn from(err: std::io::Error) -> Self {
        BodyError::Read(err.to_string())
    }
}

/// Orchestrates the storage operations of the gateway.
///
/// Authorization is checked before any object-level backend call on the read
/// path; audit records are handed to the sink only after the mutation has
/// been applied. Nothing is retried.
pub struct StorageGateway {
    storage: Arc<dyn ObjectStorage>,
    registry: ContainerRegistry,
    extractor: MetadataExtractor,
    authorization: Arc<dyn AuthorizationGateway>,
    audit: Arc<dyn AuditSink>,
}

impl StorageGateway {
    pub fn new(
        storage: Arc<dyn ObjectStorage>,
        authorization: Arc<dyn AuthorizationGateway>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            registry: ContainerRegistry::new(storage.clone()),
            storage,
            extractor: MetadataExtractor::default(),
            authorization,
            audit,
        }
    }

    pub fn with_extractor(mut self, extractor: MetadataExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn registry(&self) -> &ContainerRegistry {
        &self.registry
    }

    /// Store an in-memory payload.
    pub async fn upload(
        &self,
        ctx: &RequestContext,
        data: Bytes,
        content_type: Option<&str>,
        original_filename: Option<&str>,
    ) -> GatewayResult<UploadedMedia> {
        let key = StoredObjectKey::generate(original_filename);
        self.store(ctx, key, data, content_type).await
    }

    /// Store a payload read from `body`. A read error from the stream fails
    /// the upload the same way a backend write error does; a body that went
    /// over the transport's size limit is rejected as too large.
    pub async fn upload_stream<S, E>(
        &self,
        ctx: &RequestContext,
        body: S,
        content_type: Option<&str>,
        original_filename: Option<&str>,
    ) -> GatewayResult<UploadedMedia>
    where
        S: Stream<Item = Result<Bytes, E>>,
        E: Into<BodyError>,
    {
        let key = StoredObjectKey::generate(original_filename);
        let mut body = std::pin::pin!(body);

        let mut buffer = BytesMut::new();
        while let Some(chunk) = body.next().await {
            match chunk {
                Ok(chunk) => buffer.extend_from_slice(&chunk),
                Err(e) => match e.into() {
                    BodyError::TooLarge(msg) => {
                        tracing::warn!(
                            tenant = %ctx.tenant,
                            key = %key,
                            received_bytes = buffer.len() as u64,
                            "Upload body over size limit"
                        );
                        return Err(GatewayError::PayloadTooLarge(msg));
                    }
                    BodyError::Read(e) => {
                        tracing::error!(
                            error = %e,
                            tenant = %ctx.tenant,
                            key = %key,
                            received_bytes = buffer.len() as u64,
                            "Failed to read upload stream"
                        );
                        return Err(GatewayError::UploadFailed {
                            key: key.to_string(),
                            tenant: ctx.tenant.to_string(),
                            reason: format!("input stream error: {}", e),
                        });
                    }
                },
            }
        }

        self.store(ctx, key, buffer.freeze(), content_type).await
    }

    #[tracing::instrument(
        skip(self, ctx, data),
        fields(tenant = %ctx.tenant, key = %key, size_bytes = data.len() as u64)
    )]
    async fn store(
        &self,
        ctx: &RequestContext,
        key: StoredObjectKey,
        data: Bytes,
        content_type: Option<&str>,
    ) -> GatewayResult<UploadedMedia> {
        if data.is_empty() {
            return Err(GatewayError::InvalidInput("Uploaded file is empty".to_string()));
        }

        let content_type = content_type
            .map(str::trim)
            .filter(|ct| !ct.is_empty())
            .unwrap_or(DEFAULT_CONTENT_TYPE);
        let start = std::time::Instant::now();

        let container = self
            .resolve(ctx, &key, |reason| GatewayError::UploadFailed {
                key: key.to_string(),
                tenant: ctx.tenant.to_string(),
                reason,
            })
            .await?;

        self.storage
            .put_object(container.name(), key.as_str(), data.clone(), content_type)
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    container = %container,
                    "Backend write failed"
                );
                GatewayError::UploadFailed {
                    key: key.to_string(),
                    tenant: ctx.tenant.to_string(),
                    reason: e.to_string(),
                }
            })?;

        let attributes = self.extractor.extract(&data, content_type);

        self.audit.publish(
            &ctx.tenant,
            AuditRecord::media_object(AuditAction::Uploaded, ctx.caller.subject(), &key),
        );

        tracing::info!(
            container = %container,
            content_type = %content_type,
            format = %attributes.format,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Media uploaded"
        );

        Ok(UploadedMedia { key, attributes })
    }

    /// Read an object and its stored content type, if the caller may read it.
    #[tracing::instrument(skip(self, ctx), fields(tenant = %ctx.tenant, key = %key))]
    pub async fn download(
        &self,
        ctx: &RequestContext,
        key: &StoredObjectKey,
    ) -> GatewayResult<StoredObject> {
        let download_failed = |reason: String| GatewayError::DownloadFailed {
            key: key.to_string(),
            tenant: ctx.tenant.to_string(),
            reason,
        };
        let not_found = || GatewayError::NotFound {
            key: key.to_string(),
            tenant: ctx.tenant.to_string(),
        };

        let container = self.resolve(ctx, key, download_failed).await?;

        if !self.authorization.can_read(ctx, key).await {
            tracing::warn!(caller = %ctx.caller.subject(), "Download denied");
            return Err(GatewayError::Unauthorized {
                key: key.to_string(),
                caller: ctx.caller.subject().to_string(),
            });
        }

        let exists = self
            .storage
            .object_exists(container.name(), key.as_str())
            .await
            .map_err(|e| {
                tracing::error!(error = %e, container = %container, "Existence check failed");
                download_failed(e.to_string())
            })?;
        if !exists {
            tracing::debug!(container = %container, "Object not found");
            return Err(not_found());
        }

        match self.storage.get_object(container.name(), key.as_str()).await {
            Ok(object) => {
                tracing::info!(
                    container = %container,
                    size_bytes = object.data.len() as u64,
                    content_type = %object.content_type,
                    "Media downloaded"
                );
                Ok(object)
            }
            // Deleted between the existence check and the read
            Err(StorageError::NotFound(_)) => Err(not_found()),
            Err(e) => {
                tracing::error!(error = %e, container = %container, "Backend read failed");
                Err(download_failed(e.to_string()))
            }
        }
    }

    /// Delete an object. Deleting something that is not there succeeds;
    /// returns whether an object was actually removed.
    #[tracing::instrument(skip(self, ctx), fields(tenant = %ctx.tenant, key = %key))]
    pub async fn delete(&self, ctx: &RequestContext, key: &StoredObjectKey) -> GatewayResult<bool> {
        let delete_failed = |reason: String| GatewayError::DeleteFailed {
            key: key.to_string(),
            tenant: ctx.tenant.to_string(),
            reason,
        };

        let container = self.resolve(ctx, key, delete_failed).await?;

        let removed = self
            .storage
            .delete_object_if_exists(container.name(), key.as_str())
            .await
            .map_err(|e| {
                tracing::error!(error = %e, container = %container, "Backend delete failed");
                delete_failed(e.to_string())
            })?;

        if removed {
            self.audit.publish(
                &ctx.tenant,
                AuditRecord::media_object(AuditAction::Deleted, ctx.caller.subject(), key),
            );
            tracing::info!(container = %container, "Media deleted");
        } else {
            tracing::debug!(container = %container, "Nothing to delete");
        }

        Ok(removed)
    }

    /// Container resolution failures surface as the failure kind of the
    /// operation in flight.
    async fn resolve<F>(
        &self,
        ctx: &RequestContext,
        key: &StoredObjectKey,
        on_error: F,
    ) -> GatewayResult<ContainerHandle>
    where
        F: FnOnce(String) -> GatewayError,
    {
        self.registry.resolve(&ctx.tenant).await.map_err(|e| {
            tracing::error!(
                error = %e,
                tenant = %ctx.tenant,
                container = %ctx.tenant.container_name(),
                key = %key,
                "Container unavailable"
            );
            on_error(format!("container unavailable: {}", e))
        })
    }
}
