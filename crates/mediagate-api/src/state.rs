//! Application state shared by the handlers.

use mediagate_services::{ObjectStorage, StorageGateway};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<StorageGateway>,
    /// Backend the gateway writes to; probed by the health check
    pub storage: Arc<dyn ObjectStorage>,
    pub audit_enabled: bool,
}
