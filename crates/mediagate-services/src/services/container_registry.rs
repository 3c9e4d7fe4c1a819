//! Tenant to container resolution.

use mediagate_core::{ContainerHandle, TenantId};
use mediagate_storage::{ObjectStorage, StorageError, StorageResult};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Resolves tenants to their storage container, creating it on first use.
///
/// Names confirmed to exist are cached for the life of the registry and
/// never evicted, so the backend sees at most one existence check per tenant
/// once resolution has succeeded. No lock is held across backend calls;
/// concurrent first resolutions may both try to create the container, and
/// the loser's "already exists" counts as success.
pub struct ContainerRegistry {
    storage: Arc<dyn ObjectStorage>,
    known: RwLock<HashSet<String>>,
}

impl ContainerRegistry {
    pub fn new(storage: Arc<dyn ObjectStorage>) -> Self {
        Self {
            storage,
            known: RwLock::new(HashSet::new()),
        }
    }

    pub async fn resolve(&self, tenant: &TenantId) -> StorageResult<ContainerHandle> {
        let handle = ContainerHandle::for_tenant(tenant);

        if self.known.read().await.contains(handle.name()) {
            return Ok(handle);
        }

        if !self.storage.container_exists(handle.name()).await? {
            match self.storage.create_container(handle.name()).await {
                Ok(()) => {
                    tracing::info!(
                        tenant = %tenant,
                        container = %handle.name(),
                        "Created storage container"
                    );
                }
                Err(StorageError::AlreadyExists(_)) => {
                    tracing::debug!(
                        container = %handle.name(),
                        "Container created concurrently"
                    );
                }
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        tenant = %tenant,
                        container = %handle.name(),
                        "Failed to create storage container"
                    );
                    return Err(e);
                }
            }
        }

        self.known.write().await.insert(handle.name().to_string());
        Ok(handle)
    }

    /// Whether `container` has been confirmed to exist by this registry
    pub async fn is_known(&self, container: &str) -> bool {
        self.known.read().await.contains(container)
    }
}
