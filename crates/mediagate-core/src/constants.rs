//! Shared constants

/// Namespace used when a request carries no tenant.
pub const DEFAULT_TENANT: &str = "public";

/// Prefix of every tenant container name.
pub const CONTAINER_PREFIX: &str = "media-";

/// Content type recorded when a caller declares none.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Header carrying the raw tenant identifier (inbound requests and authorization calls).
pub const TENANT_HEADER: &str = "X-Tenant-Id";

/// Header carrying the caller subject asserted by the upstream identity layer.
pub const CALLER_HEADER: &str = "X-Caller-Id";

/// Subject used when the identity layer asserted none.
pub const ANONYMOUS_CALLER: &str = "anonymous";

/// Message-bus header carrying the tenant of an audit record.
pub const AUDIT_TENANT_HEADER: &str = "tenantId";
