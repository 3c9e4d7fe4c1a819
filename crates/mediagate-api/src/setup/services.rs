//! Collaborator wiring: storage backend, authorization client, audit publisher.

use crate::state::AppState;
use anyhow::{Context, Result};
use mediagate_core::Config;
use mediagate_services::{
    create_storage, AuditPublisher, HttpAuthorizationGateway, StorageGateway,
};
use std::sync::Arc;
use std::time::Duration;

pub async fn initialize_services(config: &Config) -> Result<Arc<AppState>> {
    let storage = create_storage(config)
        .await
        .context("Failed to initialize storage backend")?;

    let authorization = HttpAuthorizationGateway::new(
        config.authz_service_url(),
        Duration::from_millis(config.authz_timeout_ms()),
    )?;

    let audit = AuditPublisher::from_config(config)?;
    let audit_enabled = audit.is_enabled();
    if !audit_enabled {
        tracing::warn!("AUDIT_TOPIC not set; audit records will be discarded");
    }

    let gateway = StorageGateway::new(storage.clone(), Arc::new(authorization), Arc::new(audit));

    tracing::info!(
        backend = %storage.backend_type(),
        authz_url = %config.authz_service_url(),
        audit_enabled,
        "Services initialized"
    );

    Ok(Arc::new(AppState {
        gateway: Arc::new(gateway),
        storage,
        audit_enabled,
    }))
}
