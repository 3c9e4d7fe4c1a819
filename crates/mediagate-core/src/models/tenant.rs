//! Tenant identity and container naming.
//!
//! A tenant maps 1:1 to a storage container named `media-{sanitized tenant}`.
//! Sanitization lowercases the raw identifier and replaces every character
//! outside `[a-z0-9-]` with `-`. It is deterministic but not injective:
//! `Acme_Corp` and `acme.corp` both land in `media-acme-corp`.

use crate::constants::{CONTAINER_PREFIX, DEFAULT_TENANT};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Raw tenant identifier as asserted at the request boundary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantId(String);

impl TenantId {
    /// Build a tenant id; blank input maps to the default namespace.
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        if raw.trim().is_empty() {
            Self::default_tenant()
        } else {
            TenantId(raw)
        }
    }

    /// Absent tenants map to the default namespace.
    pub fn from_optional(raw: Option<&str>) -> Self {
        raw.map(Self::new).unwrap_or_else(Self::default_tenant)
    }

    pub fn default_tenant() -> Self {
        TenantId(DEFAULT_TENANT.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn sanitized(&self) -> String {
        self.0
            .to_lowercase()
            .chars()
            .map(|c| match c {
                'a'..='z' | '0'..='9' | '-' => c,
                _ => '-',
            })
            .collect()
    }

    pub fn container_name(&self) -> String {
        format!("{}{}", CONTAINER_PREFIX, self.sanitized())
    }
}

impl Default for TenantId {
    fn default() -> Self {
        Self::default_tenant()
    }
}

impl Display for TenantId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

/// One tenant's storage namespace, as resolved by the container registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContainerHandle {
    name: String,
    tenant: TenantId,
}

impl ContainerHandle {
    pub fn for_tenant(tenant: &TenantId) -> Self {
        Self {
            name: tenant.container_name(),
            tenant: tenant.clone(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tenant(&self) -> &TenantId {
        &self.tenant
    }
}

impl Display for ContainerHandle {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.name)
    }
}
