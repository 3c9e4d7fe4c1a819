pub mod container_registry;
pub mod storage_gateway;

pub use container_registry::ContainerRegistry;
pub use storage_gateway::{BodyError, StorageGateway};
