use crate::constants::UPLOAD_FIELD;
use crate::error::{body_error, HttpGatewayError};
use crate::extractors::CallerContext;
use crate::state::AppState;
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use futures::TryStreamExt;
use mediagate_core::GatewayError;
use std::sync::Arc;

/// Store the multipart field `file` in the caller's tenant container.
///
/// The field is streamed into the gateway; its declared content type and file
/// name drive the stored content type and the extension of the generated key.
/// A body cut off by the request size limit is answered with 413.
#[tracing::instrument(
    skip(state, ctx, multipart),
    fields(tenant = %ctx.0.tenant, caller = %ctx.0.caller.subject(), operation = "upload_media")
)]
pub async fn upload_media(
    State(state): State<Arc<AppState>>,
    ctx: CallerContext,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, HttpGatewayError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let content_type = field.content_type().map(str::to_string);
        let file_name = field.file_name().map(str::to_string);

        let body = field.map_err(body_error);
        let uploaded = state
            .gateway
            .upload_stream(&ctx.0, body, content_type.as_deref(), file_name.as_deref())
            .await?;

        return Ok((StatusCode::CREATED, Json(uploaded)));
    }

    Err(GatewayError::InvalidInput(format!("Missing multipart field '{}'", UPLOAD_FIELD)).into())
}
