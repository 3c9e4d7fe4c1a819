//! Mediagate Services Layer
//!
//! Orchestration of the storage gateway: tenant container resolution and the
//! upload / download / delete pipelines. Also re-exports the storage,
//! processing and infrastructure pieces the API crate wires together, so the
//! API depends on a single service facade.

pub mod services;

pub use mediagate_infra::{
    AuditEnvelope, AuditPublisher, HttpAuthorizationGateway, HttpMessageBus, MessageBus,
};
pub use mediagate_processing::{default_probes, FormatProbe, MetadataExtractor, ProbeMatch};
pub use mediagate_storage::{
    create_storage, ObjectStorage, ObjectStoreBackend, StorageBackend, StorageError,
    StorageResult, StoredObject,
};
pub use services::{BodyError, ContainerRegistry, StorageGateway};
