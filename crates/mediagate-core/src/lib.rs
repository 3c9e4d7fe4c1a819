//! Mediagate Core Library
//!
//! This crate provides the domain models, error taxonomy, configuration and the
//! collaborator traits shared by every Mediagate component.

pub mod config;
pub mod constants;
pub mod error;
pub mod hooks;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{Config, LogFormat};
pub use error::{ErrorMetadata, GatewayError, GatewayResult, LogLevel};
pub use hooks::{AuditSink, AuthorizationGateway};
pub use models::{
    AuditAction, AuditRecord, CallerIdentity, ContainerHandle, GeoLocation, MediaAttributes,
    MediaKind, RequestContext, StoredObjectKey, TenantId, UploadedMedia,
};
pub use storage_types::StorageBackend;
