//! Mediagate API Library
//!
//! This crate provides the HTTP handlers, request extractors and application
//! setup around the storage gateway.

pub mod constants;
pub mod error;
pub mod extractors;
mod handlers;
pub mod setup;
pub mod state;

pub use error::{ErrorResponse, HttpGatewayError};
pub use extractors::CallerContext;
pub use state::AppState;
