//! Test helpers: build the router over in-memory storage and stub collaborators.
//!
//! Run from workspace root: `cargo test -p mediagate-api`.

#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use mediagate_api::setup::routes::build_router;
use mediagate_api::AppState;
use mediagate_core::{
    AuditRecord, AuditSink, AuthorizationGateway, RequestContext, StoredObjectKey, TenantId,
};
use mediagate_services::{ObjectStorage, ObjectStoreBackend, StorageGateway};
use std::io::Cursor;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// API path prefix for tests (e.g. `/rest/v1`).
pub fn api_path(path: &str) -> String {
    format!("{}{}", mediagate_api::constants::API_PREFIX, path)
}

/// Authorization stub that can be flipped and remembers the contexts it saw
#[derive(Default)]
pub struct SwitchableAuthorization {
    deny: AtomicBool,
    seen: Mutex<Vec<RequestContext>>,
}

impl SwitchableAuthorization {
    pub fn deny_all(&self) {
        self.deny.store(true, Ordering::SeqCst);
    }

    pub fn seen(&self) -> Vec<RequestContext> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuthorizationGateway for SwitchableAuthorization {
    async fn can_read(&self, ctx: &RequestContext, _key: &StoredObjectKey) -> bool {
        self.seen.lock().unwrap().push(ctx.clone());
        !self.deny.load(Ordering::SeqCst)
    }
}

#[derive(Default)]
pub struct RecordingAuditSink {
    records: Mutex<Vec<(TenantId, AuditRecord)>>,
}

impl RecordingAuditSink {
    pub fn records(&self) -> Vec<(TenantId, AuditRecord)> {
        self.records.lock().unwrap().clone()
    }
}

impl AuditSink for RecordingAuditSink {
    fn publish(&self, tenant: &TenantId, record: AuditRecord) {
        self.records.lock().unwrap().push((tenant.clone(), record));
    }
}

/// Test application: server plus handles on the collaborators.
pub struct TestApp {
    pub server: TestServer,
    pub storage: Arc<dyn ObjectStorage>,
    pub authorization: Arc<SwitchableAuthorization>,
    pub audit: Arc<RecordingAuditSink>,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

pub fn setup_test_app() -> TestApp {
    let storage: Arc<dyn ObjectStorage> = Arc::new(ObjectStoreBackend::in_memory());
    let authorization = Arc::new(SwitchableAuthorization::default());
    let audit = Arc::new(RecordingAuditSink::default());

    let gateway = StorageGateway::new(storage.clone(), authorization.clone(), audit.clone());
    let state = Arc::new(AppState {
        gateway: Arc::new(gateway),
        storage: storage.clone(),
        audit_enabled: true,
    });

    let server = TestServer::new(build_router(state, MAX_BODY_BYTES)).unwrap();

    TestApp {
        server,
        storage,
        authorization,
        audit,
    }
}

/// A real 3x2 PNG.
pub fn png_fixture() -> Vec<u8> {
    let img = image::RgbImage::from_pixel(3, 2, image::Rgb([200, 10, 10]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}
