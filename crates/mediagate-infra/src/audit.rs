//! Audit publication
//!
//! `AuditPublisher` is the gateway's `AuditSink`. Records go onto a bounded
//! in-process queue with `try_send` and a background task forwards them to
//! the configured `MessageBus`. Callers never wait for delivery. A full
//! queue or a failed delivery is logged and the record is dropped.

use anyhow::Context;
use async_trait::async_trait;
use mediagate_core::constants::AUDIT_TENANT_HEADER;
use mediagate_core::{AuditRecord, AuditSink, Config, TenantId};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// A record plus the tenant it belongs to; the tenant travels as a header.
#[derive(Debug, Clone)]
pub struct AuditEnvelope {
    pub tenant: TenantId,
    pub record: AuditRecord,
}

/// Destination for audit envelopes
#[async_trait]
pub trait MessageBus: Send + Sync {
    async fn send(&self, topic: &str, envelope: &AuditEnvelope) -> anyhow::Result<()>;
}

/// Publishes to an HTTP message-bus bridge:
/// `POST {base}/topics/{topic}` with the JSON record as body and the tenant
/// in the `tenantId` header.
#[derive(Clone, Debug)]
pub struct HttpMessageBus {
    client: Client,
    base_url: String,
}

impl HttpMessageBus {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create message bus HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl MessageBus for HttpMessageBus {
    async fn send(&self, topic: &str, envelope: &AuditEnvelope) -> anyhow::Result<()> {
        let url = format!("{}/topics/{}", self.base_url, topic);

        let response = self
            .client
            .post(&url)
            .header(AUDIT_TENANT_HEADER, envelope.tenant.as_str())
            .json(&envelope.record)
            .send()
            .await
            .context("Failed to send audit record")?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow::anyhow!(
                "Message bus rejected audit record with status {}",
                status
            ));
        }

        Ok(())
    }
}

/// Fire-and-forget audit sink. Disabled (drops everything) when no topic is
/// configured.
#[derive(Clone)]
pub struct AuditPublisher {
    tx: Option<mpsc::Sender<AuditEnvelope>>,
}

impl AuditPublisher {
    /// Publisher that emits nothing
    pub fn disabled() -> Self {
        Self { tx: None }
    }

    /// Start a publisher for `topic`; `None` yields a disabled publisher.
    ///
    /// Spawns the delivery task, so this must run inside a tokio runtime.
    pub fn new(topic: Option<String>, bus: Arc<dyn MessageBus>, queue_size: usize) -> Self {
        let Some(topic) = topic else {
            tracing::info!("Audit topic not configured, audit publishing disabled");
            return Self::disabled();
        };

        let queue_size = queue_size.max(1);
        let (tx, rx) = mpsc::channel(queue_size);

        tracing::info!(
            topic = %topic,
            queue_size = queue_size,
            "Audit publisher initialized with bounded channel"
        );

        tokio::spawn(async move {
            Self::deliver(rx, topic, bus).await;
        });

        Self { tx: Some(tx) }
    }

    /// Build the publisher described by `AUDIT_TOPIC` / `AUDIT_BUS_URL`.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let Some(topic) = config.audit_topic() else {
            return Ok(Self::disabled());
        };
        let bus_url = config
            .audit_bus_url()
            .context("AUDIT_BUS_URL must be set when AUDIT_TOPIC is configured")?;

        let bus = HttpMessageBus::new(bus_url, Duration::from_millis(config.audit_timeout_ms()))?;
        Ok(Self::new(
            Some(topic.to_string()),
            Arc::new(bus),
            config.audit_queue_size(),
        ))
    }

    pub fn is_enabled(&self) -> bool {
        self.tx.is_some()
    }

    async fn deliver(
        mut rx: mpsc::Receiver<AuditEnvelope>,
        topic: String,
        bus: Arc<dyn MessageBus>,
    ) {
        while let Some(envelope) = rx.recv().await {
            let start = std::time::Instant::now();
            match bus.send(&topic, &envelope).await {
                Ok(()) => tracing::debug!(
                    topic = %topic,
                    tenant = %envelope.tenant,
                    action = ?envelope.record.action,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Audit record published"
                ),
                Err(e) => tracing::error!(
                    error = %e,
                    topic = %topic,
                    tenant = %envelope.tenant,
                    action = ?envelope.record.action,
                    "Failed to publish audit record"
                ),
            }
        }
        tracing::debug!(topic = %topic, "Audit publisher stopped");
    }
}

impl AuditSink for AuditPublisher {
    fn publish(&self, tenant: &TenantId, record: AuditRecord) {
        let Some(tx) = &self.tx else {
            return;
        };

        let envelope = AuditEnvelope {
            tenant: tenant.clone(),
            record,
        };

        if let Err(e) = tx.try_send(envelope) {
            match e {
                mpsc::error::TrySendError::Full(envelope) => tracing::warn!(
                    tenant = %envelope.tenant,
                    action = ?envelope.record.action,
                    "Audit queue is full, dropping record"
                ),
                mpsc::error::TrySendError::Closed(envelope) => tracing::error!(
                    tenant = %envelope.tenant,
                    action = ?envelope.record.action,
                    "Audit publisher stopped, dropping record"
                ),
            }
        }
    }
}
