//! Gateway doubles shared by the unit tests

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::oneshot;

use super::memory::InMemoryGateway;
use super::types::{EntityGateway, GatewayError, SortSpec};

/// In-memory gateway that can be switched into failing every call
#[derive(Default)]
pub struct FlakyGateway {
    pub inner: InMemoryGateway,
    failing: AtomicBool,
    writes: AtomicUsize,
    reads: AtomicUsize,
}

impl FlakyGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), GatewayError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(GatewayError::Unavailable("backend offline".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl EntityGateway for FlakyGateway {
    async fn list(
        &self,
        entity: &str,
        sort: Option<&SortSpec>,
        limit: Option<usize>,
    ) -> Result<Vec<Value>, GatewayError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        self.inner.list(entity, sort, limit).await
    }

    async fn filter(
        &self,
        entity: &str,
        matcher: &Map<String, Value>,
        sort: Option<&SortSpec>,
        limit: Option<usize>,
    ) -> Result<Vec<Value>, GatewayError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        self.inner.filter(entity, matcher, sort, limit).await
    }

    async fn create(&self, entity: &str, fields: Value) -> Result<Value, GatewayError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        self.inner.create(entity, fields).await
    }

    async fn update(&self, entity: &str, id: &str, fields: Value) -> Result<Value, GatewayError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        self.inner.update(entity, id, fields).await
    }

    async fn delete(&self, entity: &str, id: &str) -> Result<(), GatewayError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        self.inner.delete(entity, id).await
    }

    fn gateway_name(&self) -> &str {
        "flaky"
    }
}

/// The first `list` of `entity` reads its data, reports that it has
/// started, then parks until released
pub struct GatedGateway {
    pub inner: InMemoryGateway,
    entity: String,
    started: Mutex<Option<oneshot::Sender<()>>>,
    release: Mutex<Option<oneshot::Receiver<()>>>,
}

impl GatedGateway {
    /// Returns the gateway, a receiver fired when the gated call started,
    /// and a sender that releases it
    pub fn new(entity: &str) -> (Self, oneshot::Receiver<()>, oneshot::Sender<()>) {
        let (started_tx, started_rx) = oneshot::channel();
        let (release_tx, release_rx) = oneshot::channel();
        let gateway = Self {
            inner: InMemoryGateway::new(),
            entity: entity.to_string(),
            started: Mutex::new(Some(started_tx)),
            release: Mutex::new(Some(release_rx)),
        };
        (gateway, started_rx, release_tx)
    }
}

#[async_trait]
impl EntityGateway for GatedGateway {
    async fn list(
        &self,
        entity: &str,
        sort: Option<&SortSpec>,
        limit: Option<usize>,
    ) -> Result<Vec<Value>, GatewayError> {
        let records = self.inner.list(entity, sort, limit).await?;
        if entity == self.entity {
            let release = self.release.lock().unwrap().take();
            if let Some(release) = release {
                if let Some(started) = self.started.lock().unwrap().take() {
                    let _ = started.send(());
                }
                let _ = release.await;
            }
        }
        Ok(records)
    }

    async fn filter(
        &self,
        entity: &str,
        matcher: &Map<String, Value>,
        sort: Option<&SortSpec>,
        limit: Option<usize>,
    ) -> Result<Vec<Value>, GatewayError> {
        self.inner.filter(entity, matcher, sort, limit).await
    }

    async fn create(&self, entity: &str, fields: Value) -> Result<Value, GatewayError> {
        self.inner.create(entity, fields).await
    }

    async fn update(&self, entity: &str, id: &str, fields: Value) -> Result<Value, GatewayError> {
        self.inner.update(entity, id, fields).await
    }

    async fn delete(&self, entity: &str, id: &str) -> Result<(), GatewayError> {
        self.inner.delete(entity, id).await
    }

    fn gateway_name(&self) -> &str {
        "gated"
    }
}
