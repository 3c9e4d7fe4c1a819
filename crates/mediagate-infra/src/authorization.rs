//! Read-permission checks against the remote authorization service.

use anyhow::Context;
use async_trait::async_trait;
use mediagate_core::constants::TENANT_HEADER;
use mediagate_core::{AuthorizationGateway, RequestContext, StoredObjectKey};
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Asks `GET {base}/rest/v1/media/path/{key}` whether the caller may read an
/// object.
///
/// `200` and `404` (the service knows nothing about the object) allow the
/// read; every other status and every transport error denies it. One
/// attempt per call.
#[derive(Clone, Debug)]
pub struct HttpAuthorizationGateway {
    client: Client,
    base_url: String,
}

impl HttpAuthorizationGateway {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create authorization HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn permission_url(&self, key: &StoredObjectKey) -> String {
        format!("{}/rest/v1/media/path/{}", self.base_url, key)
    }
}

#[async_trait]
impl AuthorizationGateway for HttpAuthorizationGateway {
    #[tracing::instrument(skip(self, ctx), fields(tenant = %ctx.tenant, key = %key))]
    async fn can_read(&self, ctx: &RequestContext, key: &StoredObjectKey) -> bool {
        let start = std::time::Instant::now();

        let mut request = self
            .client
            .get(self.permission_url(key))
            .header(TENANT_HEADER, ctx.tenant.as_str());
        if let Some(authorization) = ctx.caller.authorization_header() {
            request = request.header(AUTHORIZATION, authorization);
        }

        match request.send().await {
            Ok(response) => match response.status() {
                StatusCode::OK | StatusCode::NOT_FOUND => {
                    tracing::debug!(
                        status = response.status().as_u16(),
                        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                        "Read permission granted"
                    );
                    true
                }
                status => {
                    tracing::warn!(
                        status = status.as_u16(),
                        caller = %ctx.caller.subject(),
                        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                        "Read permission denied"
                    );
                    false
                }
            },
            Err(e) => {
                tracing::error!(
                    error = %e,
                    caller = %ctx.caller.subject(),
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Authorization service unreachable, denying read"
                );
                false
            }
        }
    }
}
