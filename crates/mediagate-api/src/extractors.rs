//! Request context extraction.
//!
//! The tenant comes from `X-Tenant-Id`, the bearer credential from
//! `Authorization` and the caller subject from `X-Caller-Id`, which the
//! upstream identity layer asserts. None of them is required: absent values
//! fall back to the default tenant and the anonymous caller.

use crate::error::HttpGatewayError;
use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts, HeaderMap};
use mediagate_core::constants::{ANONYMOUS_CALLER, CALLER_HEADER, TENANT_HEADER};
use mediagate_core::{CallerIdentity, GatewayError, RequestContext, TenantId};

/// Request context for the storage gateway, extracted from headers.
#[derive(Debug, Clone)]
pub struct CallerContext(pub RequestContext);

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Result<Option<&'a str>, HttpGatewayError> {
    match headers.get(name) {
        None => Ok(None),
        Some(value) => value.to_str().map(|s| Some(s.trim())).map_err(|_| {
            HttpGatewayError(GatewayError::InvalidInput(format!(
                "Header {} is not valid UTF-8",
                name
            )))
        }),
    }
}

/// Token of a `Bearer` authorization header; other schemes carry no token.
fn bearer_token(authorization: &str) -> Option<String> {
    let (scheme, token) = authorization.split_once(' ')?;
    if scheme.eq_ignore_ascii_case("bearer") {
        Some(token.trim().to_string())
    } else {
        None
    }
}

impl<S> FromRequestParts<S> for CallerContext
where
    S: Send + Sync,
{
    type Rejection = HttpGatewayError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let tenant = TenantId::from_optional(header_str(&parts.headers, TENANT_HEADER)?);
        let token =
            header_str(&parts.headers, header::AUTHORIZATION.as_str())?.and_then(bearer_token);
        let subject = header_str(&parts.headers, CALLER_HEADER)?.unwrap_or(ANONYMOUS_CALLER);

        Ok(CallerContext(RequestContext::new(
            tenant,
            CallerIdentity::new(subject, token),
        )))
    }
}
