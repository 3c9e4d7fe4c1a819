//! Request-scoped identity, built once at the boundary and passed explicitly.

use crate::constants::ANONYMOUS_CALLER;
use crate::models::TenantId;
use std::fmt::{Debug, Formatter, Result as FmtResult};

/// Caller as asserted by the identity layer.
///
/// `subject` is the only caller identifier used anywhere in the gateway
/// (audit records included).
#[derive(Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    subject: String,
    bearer_token: Option<String>,
}

impl CallerIdentity {
    pub fn new(subject: impl Into<String>, bearer_token: Option<String>) -> Self {
        let subject = subject.into();
        Self {
            subject: if subject.trim().is_empty() {
                ANONYMOUS_CALLER.to_string()
            } else {
                subject
            },
            bearer_token: bearer_token.filter(|t| !t.is_empty()),
        }
    }

    pub fn anonymous() -> Self {
        Self::new(ANONYMOUS_CALLER, None)
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn bearer_token(&self) -> Option<&str> {
        self.bearer_token.as_deref()
    }

    /// `Authorization` header value for outbound calls on the caller's behalf.
    pub fn authorization_header(&self) -> Option<String> {
        self.bearer_token.as_ref().map(|t| format!("Bearer {}", t))
    }
}

impl Debug for CallerIdentity {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("CallerIdentity")
            .field("subject", &self.subject)
            .field("bearer_token", &self.bearer_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub tenant: TenantId,
    pub caller: CallerIdentity,
}

impl RequestContext {
    pub fn new(tenant: TenantId, caller: CallerIdentity) -> Self {
        Self { tenant, caller }
    }
}
