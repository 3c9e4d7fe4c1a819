//! Seams between the gateway core and its collaborators
//!
//! The orchestrator only sees these traits. Production implementations live in
//! `mediagate-infra`; tests substitute recording fakes.

use async_trait::async_trait;

use crate::models::{AuditRecord, RequestContext, StoredObjectKey, TenantId};

/// Decides whether the caller in `ctx` may read `key`.
///
/// Implementations must fail closed: any error evaluating the decision is a
/// denial. A single evaluation per call, never cached.
#[async_trait]
pub trait AuthorizationGateway: Send + Sync {
    async fn can_read(&self, ctx: &RequestContext, key: &StoredObjectKey) -> bool;
}

/// Outbound audit channel.
///
/// `publish` must not block on delivery; failures are the sink's to log.
pub trait AuditSink: Send + Sync {
    fn publish(&self, tenant: &TenantId, record: AuditRecord);
}
