use wp_core::{Cursor, Envelope};
use wp_sync::{
    BroadcastConfig, ChangePublisher, EnvelopeStream, InMemoryBackend, ManualClock, RetryConfig,
    SubscriptionServer, SyncError,
};

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use tokio::time::timeout;

pub const START: i64 = 1_700_000_000_000;

const WAIT: Duration = Duration::from_millis(500);
const QUIET: Duration = Duration::from_millis(50);

pub struct MemoryHarness {
    pub backend: Arc<InMemoryBackend>,
    pub clock: Arc<ManualClock>,
    pub publisher: ChangePublisher,
    pub server: SubscriptionServer,
}

pub fn memory_harness() -> MemoryHarness {
    memory_harness_with(BroadcastConfig::default())
}

pub fn memory_harness_with(config: BroadcastConfig) -> MemoryHarness {
    let clock = Arc::new(ManualClock::new(Cursor::from_millis(START)));
    let cap = config.catch_up_cap;
    let backend = Arc::new(InMemoryBackend::new(config, clock.clone()));
    let publisher = ChangePublisher::new(backend.clone(), clock.clone(), RetryConfig::default());
    let server = SubscriptionServer::new(backend.clone(), cap);

    MemoryHarness {
        backend,
        clock,
        publisher,
        server,
    }
}

pub async fn expect_envelope(stream: &mut EnvelopeStream) -> Envelope {
    match timeout(WAIT, stream.next()).await {
        Ok(Some(Ok(envelope))) => envelope,
        Ok(Some(Err(e))) => panic!("Expected envelope, got error {}", e),
        Ok(None) => panic!("Expected envelope, stream ended"),
        Err(_) => panic!("Timed out waiting for envelope"),
    }
}

pub async fn expect_error(stream: &mut EnvelopeStream) -> SyncError {
    match timeout(WAIT, stream.next()).await {
        Ok(Some(Err(e))) => e,
        Ok(Some(Ok(envelope))) => panic!("Expected error, got envelope {:?}", envelope),
        Ok(None) => panic!("Expected error, stream ended"),
        Err(_) => panic!("Timed out waiting for error"),
    }
}

pub async fn expect_quiet(stream: &mut EnvelopeStream) {
    if let Ok(item) = timeout(QUIET, stream.next()).await {
        panic!("Expected no delivery, got {:?}", item.map(|r| r.map(|e| e.timestamp())));
    }
}
