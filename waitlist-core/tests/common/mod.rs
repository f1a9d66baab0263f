//! Shared fixtures for the waitlist integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use secrecy::SecretString;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tower::ServiceExt;
use waitlist_core::core_store::{MetadataFields, StoreError, StoreResult};
use waitlist_core::{build_router, AppState, MemoryStore, WaitlistStore};

pub const ADMIN_KEY: &str = "let-me-in";

/// Store wrapper that can fail on demand and counts every call
#[derive(Default)]
pub struct FlakyStore {
    pub inner: MemoryStore,
    pub fail_writes: AtomicBool,
    pub fail_reads: AtomicBool,
    pub fail_metadata: AtomicBool,
    pub calls: AtomicUsize,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn check(&self, flag: &AtomicBool, op: &str) -> StoreResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if flag.load(Ordering::SeqCst) {
            return Err(StoreError::Transport(format!("{op}: connection reset")));
        }
        Ok(())
    }
}

#[async_trait]
impl WaitlistStore for FlakyStore {
    async fn add_to_set(&self, set_key: &str, member: &str) -> StoreResult<bool> {
        self.check(&self.fail_writes, "SADD")?;
        self.inner.add_to_set(set_key, member).await
    }

    async fn set_cardinality(&self, set_key: &str) -> StoreResult<u64> {
        self.check(&self.fail_reads, "SCARD")?;
        self.inner.set_cardinality(set_key).await
    }

    async fn set_members(&self, set_key: &str) -> StoreResult<Vec<String>> {
        self.check(&self.fail_reads, "SMEMBERS")?;
        self.inner.set_members(set_key).await
    }

    async fn write_metadata(&self, meta_key: &str, fields: &MetadataFields) -> StoreResult<()> {
        self.check(&self.fail_metadata, "HSET")?;
        self.inner.write_metadata(meta_key, fields).await
    }
}

pub fn router_with(store: Arc<dyn WaitlistStore>) -> Router {
    let state = AppState::new(store, Some(SecretString::new(ADMIN_KEY.to_string())));
    build_router(Arc::new(state))
}

pub fn memory_router() -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    (router_with(store.clone()), store)
}

pub fn join_request(body: impl Into<String>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/waitlist")
        .header("content-type", "application/json")
        .body(Body::from(body.into()))
        .unwrap()
}

pub fn get_request(uri: &str, admin_key: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(key) = admin_key {
        builder = builder.header("x-admin-key", key);
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn send(router: &Router, request: Request<Body>) -> Response<Body> {
    router.clone().oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn content_type(response: &Response<Body>) -> String {
    response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

pub async fn join(router: &Router, email: &str) -> (StatusCode, serde_json::Value) {
    let response = send(router, join_request(serde_json::json!({ "email": email }).to_string())).await;
    let status = response.status();
    (status, body_json(response).await)
}
