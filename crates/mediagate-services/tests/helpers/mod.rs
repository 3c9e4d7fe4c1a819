#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use mediagate_core::{
    AuditRecord, AuditSink, AuthorizationGateway, CallerIdentity, RequestContext,
    StoredObjectKey, TenantId,
};
use mediagate_services::{
    MetadataExtractor, ObjectStorage, ObjectStoreBackend, StorageBackend, StorageError,
    StorageGateway, StorageResult, StoredObject,
};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Per-operation call counters
#[derive(Default)]
pub struct CallCounts {
    pub container_exists: AtomicUsize,
    pub create_container: AtomicUsize,
    pub put_object: AtomicUsize,
    pub object_exists: AtomicUsize,
    pub get_object: AtomicUsize,
    pub delete_object: AtomicUsize,
}

impl CallCounts {
    pub fn get(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

/// In-memory storage that counts calls and can be told to fail.
#[derive(Default)]
pub struct Faults {
    pub containers: AtomicBool,
    pub writes: AtomicBool,
    pub reads: AtomicBool,
    pub deletes: AtomicBool,
    /// `container_exists` always answers false, as if another replica had
    /// not yet observed the container
    pub stale_container_checks: AtomicBool,
}

pub struct CountingStorage {
    inner: Arc<dyn ObjectStorage>,
    pub counts: CallCounts,
    pub faults: Faults,
}

impl CountingStorage {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: Arc::new(ObjectStoreBackend::in_memory()),
            counts: CallCounts::default(),
            faults: Faults::default(),
        })
    }

    pub fn fail(flag: &AtomicBool) {
        flag.store(true, Ordering::SeqCst);
    }

    /// Direct access to the underlying store, bypassing the counters
    pub fn inner(&self) -> &Arc<dyn ObjectStorage> {
        &self.inner
    }

    fn injected(flag: &AtomicBool) -> StorageResult<()> {
        if flag.load(Ordering::SeqCst) {
            return Err(StorageError::BackendError("injected failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ObjectStorage for CountingStorage {
    async fn container_exists(&self, container: &str) -> StorageResult<bool> {
        self.counts.container_exists.fetch_add(1, Ordering::SeqCst);
        Self::injected(&self.faults.containers)?;
        if self.faults.stale_container_checks.load(Ordering::SeqCst) {
            return Ok(false);
        }
        self.inner.container_exists(container).await
    }

    async fn create_container(&self, container: &str) -> StorageResult<()> {
        self.counts.create_container.fetch_add(1, Ordering::SeqCst);
        Self::injected(&self.faults.containers)?;
        self.inner.create_container(container).await
    }

    async fn put_object(
        &self,
        container: &str,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> StorageResult<()> {
        self.counts.put_object.fetch_add(1, Ordering::SeqCst);
        Self::injected(&self.faults.writes)?;
        self.inner.put_object(container, key, data, content_type).await
    }

    async fn object_exists(&self, container: &str, key: &str) -> StorageResult<bool> {
        self.counts.object_exists.fetch_add(1, Ordering::SeqCst);
        Self::injected(&self.faults.reads)?;
        self.inner.object_exists(container, key).await
    }

    async fn get_object(&self, container: &str, key: &str) -> StorageResult<StoredObject> {
        self.counts.get_object.fetch_add(1, Ordering::SeqCst);
        Self::injected(&self.faults.reads)?;
        self.inner.get_object(container, key).await
    }

    async fn delete_object_if_exists(&self, container: &str, key: &str) -> StorageResult<bool> {
        self.counts.delete_object.fetch_add(1, Ordering::SeqCst);
        Self::injected(&self.faults.deletes)?;
        self.inner.delete_object_if_exists(container, key).await
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Memory
    }
}

/// Authorization stub with a fixed answer
pub struct StaticAuthorization {
    allow: bool,
    pub calls: AtomicUsize,
}

impl StaticAuthorization {
    pub fn allow() -> Arc<Self> {
        Arc::new(Self {
            allow: true,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn deny() -> Arc<Self> {
        Arc::new(Self {
            allow: false,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthorizationGateway for StaticAuthorization {
    async fn can_read(&self, _ctx: &RequestContext, _key: &StoredObjectKey) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.allow
    }
}

/// Audit sink that keeps everything it is given
#[derive(Default)]
pub struct RecordingAuditSink {
    records: Mutex<Vec<(TenantId, AuditRecord)>>,
}

impl RecordingAuditSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn records(&self) -> Vec<(TenantId, AuditRecord)> {
        self.records.lock().unwrap().clone()
    }
}

impl AuditSink for RecordingAuditSink {
    fn publish(&self, tenant: &TenantId, record: AuditRecord) {
        self.records.lock().unwrap().push((tenant.clone(), record));
    }
}

pub struct TestGateway {
    pub gateway: Arc<StorageGateway>,
    pub storage: Arc<CountingStorage>,
    pub authorization: Arc<StaticAuthorization>,
    pub audit: Arc<RecordingAuditSink>,
}

pub fn gateway_with(authorization: Arc<StaticAuthorization>) -> TestGateway {
    let storage = CountingStorage::new();
    let audit = RecordingAuditSink::new();
    let gateway = StorageGateway::new(storage.clone(), authorization.clone(), audit.clone());

    TestGateway {
        gateway: Arc::new(gateway),
        storage,
        authorization,
        audit,
    }
}

pub fn gateway_with_extractor(extractor: MetadataExtractor) -> TestGateway {
    let authorization = StaticAuthorization::allow();
    let storage = CountingStorage::new();
    let audit = RecordingAuditSink::new();
    let gateway = StorageGateway::new(storage.clone(), authorization.clone(), audit.clone())
        .with_extractor(extractor);

    TestGateway {
        gateway: Arc::new(gateway),
        storage,
        authorization,
        audit,
    }
}

pub fn test_gateway() -> TestGateway {
    gateway_with(StaticAuthorization::allow())
}

pub fn ctx(tenant: &str) -> RequestContext {
    RequestContext::new(
        TenantId::new(tenant),
        CallerIdentity::new("uid-1001", Some("test-token".to_string())),
    )
}

pub fn png_fixture(width: u32, height: u32) -> Bytes {
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    let img = RgbaImage::from_pixel(width, height, Rgba([0, 255, 0, 255]));
    let mut buffer = Vec::new();
    let mut cursor = Cursor::new(&mut buffer);
    img.write_to(&mut cursor, ImageFormat::Png).unwrap();
    Bytes::from(buffer)
}
