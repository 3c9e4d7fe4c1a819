//! Domain models

pub mod audit;
pub mod context;
pub mod media;
pub mod object_key;
pub mod tenant;

pub use audit::{ActivityType, AuditAction, AuditRecord, EntityType};
pub use context::{CallerIdentity, RequestContext};
pub use media::{GeoLocation, MediaAttributes, MediaKind, UploadedMedia};
pub use object_key::StoredObjectKey;
pub use tenant::{ContainerHandle, TenantId};
