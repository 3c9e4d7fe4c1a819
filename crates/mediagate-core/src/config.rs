//! Configuration module
//!
//! Settings are read from the process environment (after loading a `.env`
//! file when present) with typed defaults, then checked by `validate()`.

use std::env;

use crate::storage_types::StorageBackend;

const DEFAULT_PORT: u16 = 4000;
const DEFAULT_LOCAL_STORAGE_PATH: &str = "./data/media";
const DEFAULT_AUTHZ_TIMEOUT_MS: u64 = 5000;
const DEFAULT_AUDIT_QUEUE_SIZE: usize = 1024;
const DEFAULT_AUDIT_TIMEOUT_MS: u64 = 5000;
const DEFAULT_MAX_UPLOAD_SIZE_MB: usize = 50;

/// Output format of the tracing subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Settings shared by every service binary
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub environment: String,
    pub log_format: LogFormat,
}

/// Storage gateway configuration
#[derive(Clone, Debug)]
pub struct GatewayConfig {
    pub base: BaseConfig,
    // Storage configuration
    pub storage_backend: StorageBackend,
    pub local_storage_path: String,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // S3-compatible providers (MinIO etc.)
    pub aws_region: Option<String>,
    // Remote authorization service
    pub authz_service_url: String,
    pub authz_timeout_ms: u64,
    // Audit stream; no topic means auditing is off
    pub audit_topic: Option<String>,
    pub audit_bus_url: Option<String>,
    pub audit_queue_size: usize,
    pub audit_timeout_ms: u64,
    pub max_upload_size_bytes: usize,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<GatewayConfig>);

impl Config {
    fn as_gateway(&self) -> &GatewayConfig {
        &self.0
    }

    pub fn is_production(&self) -> bool {
        let env = self.as_gateway().base.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = GatewayConfig::from_lookup(lookup)?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.as_gateway().validate()
    }

    pub fn server_port(&self) -> u16 {
        self.as_gateway().base.server_port
    }

    pub fn environment(&self) -> &str {
        &self.as_gateway().base.environment
    }

    pub fn log_format(&self) -> LogFormat {
        self.as_gateway().base.log_format
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.as_gateway().storage_backend
    }

    pub fn local_storage_path(&self) -> &str {
        &self.as_gateway().local_storage_path
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.as_gateway().s3_bucket.as_deref()
    }

    /// `S3_REGION`, falling back to `AWS_REGION`
    pub fn s3_region(&self) -> Option<&str> {
        self.as_gateway()
            .s3_region
            .as_deref()
            .or(self.as_gateway().aws_region.as_deref())
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.as_gateway().s3_endpoint.as_deref()
    }

    pub fn authz_service_url(&self) -> &str {
        &self.as_gateway().authz_service_url
    }

    pub fn authz_timeout_ms(&self) -> u64 {
        self.as_gateway().authz_timeout_ms
    }

    pub fn audit_topic(&self) -> Option<&str> {
        self.as_gateway().audit_topic.as_deref()
    }

    pub fn audit_bus_url(&self) -> Option<&str> {
        self.as_gateway().audit_bus_url.as_deref()
    }

    pub fn audit_queue_size(&self) -> usize {
        self.as_gateway().audit_queue_size
    }

    pub fn audit_timeout_ms(&self) -> u64 {
        self.as_gateway().audit_timeout_ms
    }

    pub fn max_upload_size_bytes(&self) -> usize {
        self.as_gateway().max_upload_size_bytes
    }
}

impl GatewayConfig {
    fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Blank values count as unset
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let environment = var("ENVIRONMENT").unwrap_or_else(|| "development".to_string());

        let log_format = match var("LOG_FORMAT").map(|v| v.to_lowercase()).as_deref() {
            Some("json") => LogFormat::Json,
            Some("text") | None => LogFormat::Text,
            Some(other) => {
                return Err(anyhow::anyhow!(
                    "LOG_FORMAT must be 'text' or 'json', got '{}'",
                    other
                ))
            }
        };

        let storage_backend = match var("STORAGE_BACKEND") {
            Some(raw) => raw.parse::<StorageBackend>()?,
            None => StorageBackend::Local,
        };

        let max_upload_size_mb = var("MAX_UPLOAD_SIZE_MB")
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(DEFAULT_MAX_UPLOAD_SIZE_MB);
        let max_upload_size_bytes = max_upload_size_mb
            .checked_mul(1024 * 1024)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "MAX_UPLOAD_SIZE_MB is too large: {}",
                    max_upload_size_mb
                )
            })?;

        Ok(GatewayConfig {
            base: BaseConfig {
                server_port: var("PORT")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_PORT),
                environment,
                log_format,
            },
            storage_backend,
            local_storage_path: var("LOCAL_STORAGE_PATH")
                .unwrap_or_else(|| DEFAULT_LOCAL_STORAGE_PATH.to_string()),
            s3_bucket: var("S3_BUCKET"),
            s3_region: var("S3_REGION"),
            s3_endpoint: var("S3_ENDPOINT"),
            aws_region: var("AWS_REGION"),
            authz_service_url: var("AUTHZ_SERVICE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_default(),
            authz_timeout_ms: var("AUTHZ_TIMEOUT_MS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_AUTHZ_TIMEOUT_MS),
            audit_topic: var("AUDIT_TOPIC"),
            audit_bus_url: var("AUDIT_BUS_URL").map(|url| url.trim_end_matches('/').to_string()),
            audit_queue_size: var("AUDIT_QUEUE_SIZE")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_AUDIT_QUEUE_SIZE),
            audit_timeout_ms: var("AUDIT_TIMEOUT_MS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_AUDIT_TIMEOUT_MS),
            max_upload_size_bytes,
        })
    }

    fn validate(&self) -> Result<(), anyhow::Error> {
        if self.authz_service_url.is_empty() {
            return Err(anyhow::anyhow!("AUTHZ_SERVICE_URL must be set"));
        }
        if !self.authz_service_url.starts_with("http://")
            && !self.authz_service_url.starts_with("https://")
        {
            return Err(anyhow::anyhow!(
                "AUTHZ_SERVICE_URL must be an http(s) URL"
            ));
        }

        match self.storage_backend {
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET must be set when using S3 storage backend"
                    ));
                }
                if self.s3_region.is_none() && self.aws_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.trim().is_empty() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend"
                    ));
                }
            }
            StorageBackend::Memory => {}
        }

        if self.audit_topic.is_some() {
            if self.audit_bus_url.is_none() {
                return Err(anyhow::anyhow!(
                    "AUDIT_BUS_URL must be set when AUDIT_TOPIC is configured"
                ));
            }
            if self.audit_queue_size == 0 {
                return Err(anyhow::anyhow!("AUDIT_QUEUE_SIZE must be greater than 0"));
            }
        }

        if self.max_upload_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_UPLOAD_SIZE_MB must be greater than 0"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, anyhow::Error> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[("AUTHZ_SERVICE_URL", "http://authz:8080/")]).unwrap();
        assert_eq!(config.server_port(), 4000);
        assert_eq!(config.storage_backend(), StorageBackend::Local);
        assert_eq!(config.local_storage_path(), "./data/media");
        assert_eq!(config.authz_service_url(), "http://authz:8080");
        assert_eq!(config.audit_topic(), None);
        assert_eq!(config.max_upload_size_bytes(), 50 * 1024 * 1024);
        assert_eq!(config.log_format(), LogFormat::Text);
        assert!(!config.is_production());
        config.validate().unwrap();
    }

    #[test]
    fn test_authz_url_required() {
        let config = config_from(&[]).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_s3_requires_bucket_and_region() {
        let config = config_from(&[
            ("AUTHZ_SERVICE_URL", "http://authz"),
            ("STORAGE_BACKEND", "s3"),
        ])
        .unwrap();
        assert!(config.validate().is_err());

        let config = config_from(&[
            ("AUTHZ_SERVICE_URL", "http://authz"),
            ("STORAGE_BACKEND", "s3"),
            ("S3_BUCKET", "media"),
            ("AWS_REGION", "eu-west-1"),
        ])
        .unwrap();
        config.validate().unwrap();
        assert_eq!(config.s3_region(), Some("eu-west-1"));
    }

    #[test]
    fn test_audit_topic_requires_bus_url() {
        let config = config_from(&[
            ("AUTHZ_SERVICE_URL", "http://authz"),
            ("AUDIT_TOPIC", "audit-stream"),
        ])
        .unwrap();
        assert!(config.validate().is_err());

        let config = config_from(&[
            ("AUTHZ_SERVICE_URL", "http://authz"),
            ("AUDIT_TOPIC", "audit-stream"),
            ("AUDIT_BUS_URL", "http://bus:8082"),
        ])
        .unwrap();
        config.validate().unwrap();
    }

    #[test]
    fn test_invalid_values() {
        assert!(config_from(&[("STORAGE_BACKEND", "gcs")]).is_err());
        assert!(config_from(&[("LOG_FORMAT", "xml")]).is_err());

        let config = config_from(&[("AUTHZ_SERVICE_URL", "http://a"), ("PORT", "nope")]).unwrap();
        assert_eq!(config.server_port(), 4000);
    }

    #[test]
    fn test_upload_size_overflow_rejected() {
        let too_large = (usize::MAX / 1024).to_string();
        assert!(config_from(&[("MAX_UPLOAD_SIZE_MB", too_large.as_str())]).is_err());

        let config = config_from(&[("MAX_UPLOAD_SIZE_MB", "2")]).unwrap();
        assert_eq!(config.max_upload_size_bytes(), 2 * 1024 * 1024);
    }
}
