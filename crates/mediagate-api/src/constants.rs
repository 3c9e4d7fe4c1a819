//! API constants

/// Prefix of the media routes.
pub const API_PREFIX: &str = "/rest/v1";

/// Multipart field carrying the uploaded file.
pub const UPLOAD_FIELD: &str = "file";
