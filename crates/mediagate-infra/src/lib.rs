//! Mediagate Infrastructure Library
//!
//! Production implementations of the gateway's collaborators, plus shared
//! service plumbing:
//! - Telemetry initialization
//! - Request ID middleware
//! - HTTP authorization client
//! - Audit publication to the message bus

pub mod audit;
pub mod authorization;
pub mod middleware;
pub mod telemetry;

// Re-export commonly used types
pub use audit::{AuditEnvelope, AuditPublisher, HttpMessageBus, MessageBus};
pub use authorization::HttpAuthorizationGateway;
pub use middleware::{get_request_id, request_id_middleware, RequestId};
pub use telemetry::init_telemetry;
