//! Health check handler.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use mediagate_core::{ContainerHandle, TenantId};
use std::sync::Arc;
use std::time::Duration;

#[derive(serde::Serialize)]
pub struct HealthCheckResponse {
    pub status: String,
    pub storage: String,
    pub storage_backend: String,
    pub audit: String,
}

/// Reports healthy when the storage backend answers a container lookup in time.
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    const TIMEOUT: Duration = Duration::from_secs(5);

    let probe = ContainerHandle::for_tenant(&TenantId::default_tenant());
    let storage = match tokio::time::timeout(TIMEOUT, state.storage.container_exists(probe.name()))
        .await
    {
        Ok(Ok(_)) => "healthy".to_string(),
        Ok(Err(e)) => {
            tracing::error!(error = %e, "Storage health check failed");
            format!("unhealthy: {}", e)
        }
        Err(_) => {
            tracing::error!("Storage health check timed out");
            "timeout".to_string()
        }
    };

    let healthy = storage == "healthy";
    let response = HealthCheckResponse {
        status: if healthy { "healthy" } else { "unhealthy" }.to_string(),
        storage,
        storage_backend: state.storage.backend_type().to_string(),
        audit: if state.audit_enabled { "enabled" } else { "disabled" }.to_string(),
    };

    let status_code = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}
