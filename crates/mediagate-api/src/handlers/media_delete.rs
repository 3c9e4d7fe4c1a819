use crate::error::HttpGatewayError;
use crate::extractors::CallerContext;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use mediagate_core::StoredObjectKey;
use std::sync::Arc;

/// Deleting a key that does not exist also answers 204.
#[tracing::instrument(
    skip(state, ctx),
    fields(tenant = %ctx.0.tenant, key = %key, operation = "delete_media")
)]
pub async fn delete_media(
    State(state): State<Arc<AppState>>,
    ctx: CallerContext,
    Path(key): Path<String>,
) -> Result<StatusCode, HttpGatewayError> {
    let key = StoredObjectKey::parse(&key)?;
    state.gateway.delete(&ctx.0, &key).await?;
    Ok(StatusCode::NO_CONTENT)
}
