//! Error types module
//!
//! `GatewayError` is the taxonomy the storage gateway exposes to its callers.
//! Each variant carries enough context (object key, tenant) for diagnosis,
//! while `ErrorMetadata::client_message` stays generic so that backend
//! details never reach a client.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Expected outcomes such as a missing object or a malformed key
    Debug,
    /// Denials and other outcomes worth noticing
    Warn,
    /// Backend failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "UPLOAD_FAILED")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried by the client)
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the client
    fn suggested_action(&self) -> Option<&'static str>;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden from clients
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Upload of {key} for tenant {tenant} failed: {reason}")]
    UploadFailed {
        key: String,
        tenant: String,
        reason: String,
    },

    #[error("Download of {key} for tenant {tenant} failed: {reason}")]
    DownloadFailed {
        key: String,
        tenant: String,
        reason: String,
    },

    #[error("Delete of {key} for tenant {tenant} failed: {reason}")]
    DeleteFailed {
        key: String,
        tenant: String,
        reason: String,
    },

    #[error("Object {key} not found for tenant {tenant}")]
    NotFound { key: String, tenant: String },

    #[error("Caller {caller} may not read {key}")]
    Unauthorized { key: String, caller: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),
}

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Static metadata for each variant:
/// (http_status, error_code, recoverable, suggested_action, sensitive, log_level).
fn gateway_error_static_metadata(
    err: &GatewayError,
) -> (
    u16,
    &'static str,
    bool,
    Option<&'static str>,
    bool,
    LogLevel,
) {
    match err {
        GatewayError::UploadFailed { .. } => (
            500,
            "UPLOAD_FAILED",
            true,
            Some("Retry the upload after a short delay"),
            true,
            LogLevel::Error,
        ),
        GatewayError::DownloadFailed { .. } => (
            500,
            "DOWNLOAD_FAILED",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        GatewayError::DeleteFailed { .. } => (
            500,
            "DELETE_FAILED",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        GatewayError::NotFound { .. } => (
            404,
            "NOT_FOUND",
            false,
            Some("Verify the object key returned by the upload"),
            false,
            LogLevel::Debug,
        ),
        GatewayError::Unauthorized { .. } => (
            403,
            "UNAUTHORIZED",
            false,
            Some("Check the access token and tenant"),
            false,
            LogLevel::Warn,
        ),
        GatewayError::InvalidInput(_) => (
            400,
            "INVALID_INPUT",
            false,
            Some("Check request parameters and try again"),
            false,
            LogLevel::Debug,
        ),
        GatewayError::PayloadTooLarge(_) => (
            413,
            "PAYLOAD_TOO_LARGE",
            false,
            Some("Reduce the file size below the upload limit"),
            false,
            LogLevel::Warn,
        ),
    }
}

impl GatewayError {
    /// Error type name for detailed error responses
    pub fn error_type(&self) -> &str {
        match self {
            GatewayError::UploadFailed { .. } => "UploadFailed",
            GatewayError::DownloadFailed { .. } => "DownloadFailed",
            GatewayError::DeleteFailed { .. } => "DeleteFailed",
            GatewayError::NotFound { .. } => "NotFound",
            GatewayError::Unauthorized { .. } => "Unauthorized",
            GatewayError::InvalidInput(_) => "InvalidInput",
            GatewayError::PayloadTooLarge(_) => "PayloadTooLarge",
        }
    }

    /// Object key the error refers to, when there is one.
    pub fn object_key(&self) -> Option<&str> {
        match self {
            GatewayError::UploadFailed { key, .. }
            | GatewayError::DownloadFailed { key, .. }
            | GatewayError::DeleteFailed { key, .. }
            | GatewayError::NotFound { key, .. }
            | GatewayError::Unauthorized { key, .. } => Some(key),
            GatewayError::InvalidInput(_) | GatewayError::PayloadTooLarge(_) => None,
        }
    }
}

impl ErrorMetadata for GatewayError {
    fn http_status_code(&self) -> u16 {
        gateway_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        gateway_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        gateway_error_static_metadata(self).2
    }

    fn suggested_action(&self) -> Option<&'static str> {
        gateway_error_static_metadata(self).3
    }

    fn is_sensitive(&self) -> bool {
        gateway_error_static_metadata(self).4
    }

    fn log_level(&self) -> LogLevel {
        gateway_error_static_metadata(self).5
    }

    fn client_message(&self) -> String {
        match self {
            GatewayError::UploadFailed { .. } => "Failed to store media".to_string(),
            GatewayError::DownloadFailed { .. } => "Failed to read media".to_string(),
            GatewayError::DeleteFailed { .. } => "Failed to delete media".to_string(),
            GatewayError::NotFound { .. } => "Media not found".to_string(),
            GatewayError::Unauthorized { .. } => "Access to media denied".to_string(),
            GatewayError::InvalidInput(ref msg) => msg.clone(),
            GatewayError::PayloadTooLarge(_) => "Uploaded media exceeds the size limit".to_string(),
        }
    }
}
