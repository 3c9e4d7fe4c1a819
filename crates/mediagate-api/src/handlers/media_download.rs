use crate::error::HttpGatewayError;
use crate::extractors::CallerContext;
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::Response,
};
use mediagate_core::{GatewayError, StoredObjectKey};
use std::sync::Arc;

#[tracing::instrument(
    skip(state, ctx),
    fields(tenant = %ctx.0.tenant, key = %key, operation = "download_media")
)]
pub async fn download_media(
    State(state): State<Arc<AppState>>,
    ctx: CallerContext,
    Path(key): Path<String>,
) -> Result<Response, HttpGatewayError> {
    let key = StoredObjectKey::parse(&key)?;
    let object = state.gateway.download(&ctx.0, &key).await?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, object.content_type)
        .header(header::CONTENT_LENGTH, object.data.len())
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", key),
        )
        .body(Body::from(object.data))
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to build response");
            HttpGatewayError(GatewayError::DownloadFailed {
                key: key.to_string(),
                tenant: ctx.0.tenant.to_string(),
                reason: e.to_string(),
            })
        })
}
