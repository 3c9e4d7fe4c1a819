//! Mediagate Storage Library
//!
//! Object-storage capability used by the gateway, plus its backends.
//!
//! # Layout
//!
//! Every tenant owns one *container*; objects are addressed by
//! `(container, key)`. How a container is materialised is up to the backend:
//! a marked prefix in an object store, or a directory on the local disk.
//! Neither container names nor keys may contain `/` or `..`.

pub mod factory;
#[cfg(feature = "storage-local")]
pub mod local;
pub mod object_backend;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
pub use mediagate_core::StorageBackend;
pub use object_backend::ObjectStoreBackend;
pub use traits::{ObjectStorage, StorageError, StorageResult, StoredObject};
