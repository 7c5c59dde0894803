use wp_client::{
    Backoff, ClientError, ClientReconciler, ClientResult, InProcessSource, MemoryCursorStore,
    OpenedFeed, QueryCache, StreamSource,
};
use wp_auth::TenantContext;
use wp_core::{ActorId, ChangeKind, Cursor, Envelope, EnvelopeDraft, SyncModule, TenantId};
use wp_sync::{
    BroadcastBackend, BroadcastConfig, ChangePublisher, InMemoryBackend, ManualClock, RetryConfig,
    ShutdownCoordinator, SubscriptionServer,
};

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use futures::{StreamExt, stream};
use serde_json::json;

const START: i64 = 1_700_000_000_000;

fn stack() -> (ChangePublisher, SubscriptionServer) {
    let clock = Arc::new(ManualClock::new(Cursor::from_millis(START)));
    let backend = Arc::new(InMemoryBackend::new(BroadcastConfig::default(), clock.clone()));
    (
        ChangePublisher::new(backend.clone(), clock, RetryConfig::default()),
        SubscriptionServer::new(backend, 100),
    )
}

fn guest_added(actor: &str) -> EnvelopeDraft {
    EnvelopeDraft::new(
        ChangeKind::Insert,
        SyncModule::Guests,
        "guest-1",
        TenantId::new("tenant-a"),
        ActorId::new(actor),
    )
    .with_targets(["guests.list", "wedding.guest_count"])
}

/// In-process source whose first session drops right after another actor's
/// change lands, before that change reaches the client
struct DropsFirstSession {
    inner: InProcessSource,
    publisher: ChangePublisher,
    opened_with: Mutex<Vec<Option<Cursor>>>,
    published: Mutex<Option<Envelope>>,
}

#[async_trait]
impl StreamSource for DropsFirstSession {
    async fn open(&self, since: Option<Cursor>) -> ClientResult<OpenedFeed> {
        let first = {
            let mut opened_with = self.opened_with.lock().unwrap();
            opened_with.push(since);
            opened_with.len() == 1
        };

        let feed = self.inner.open(since).await?;
        if !first {
            return Ok(feed);
        }

        let session = TenantContext::new(TenantId::new("tenant-a"), ActorId::new("planner"));
        let envelope = self
            .publisher
            .publish(&session, guest_added("planner"))
            .await
            .map_err(ClientError::from)?;
        *self.published.lock().unwrap() = Some(envelope);
        Ok(OpenedFeed::new(feed.start, Box::pin(stream::empty())))
    }
}

#[tokio::test]
async fn given_in_process_source_when_opened_then_streams_other_actors_changes() {
    let (publisher, server) = stack();
    let source = InProcessSource::new(server, TenantId::new("tenant-a"), ActorId::new("viewer"));

    let mut stream = source.open(None).await.unwrap();
    let published = publisher
        .publish(
            &TenantContext::new(TenantId::new("tenant-a"), ActorId::new("planner")),
            guest_added("planner"),
        )
        .await
        .unwrap();

    let received = tokio::time::timeout(Duration::from_millis(500), stream.next())
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    assert_eq!(received, published);
}

#[tokio::test]
async fn given_reconciler_on_in_process_source_when_other_session_publishes_then_cache_invalidated() {
    // Given
    let (publisher, server) = stack();
    let cache = Arc::new(QueryCache::new());
    cache.insert("guests.list", json!([]));
    cache.insert("wedding.guest_count", json!(0));
    cache.insert("vendors.list", json!([]));
    let store = Arc::new(MemoryCursorStore::new());

    let mut reconciler = ClientReconciler::new(
        InProcessSource::new(server, TenantId::new("tenant-a"), ActorId::new("coordinator")),
        store.clone(),
        cache.clone(),
        TenantId::new("tenant-a"),
        ActorId::new("coordinator"),
        Backoff::new(Duration::from_millis(1), Duration::from_millis(5), 2.0, false),
    );

    let coordinator = ShutdownCoordinator::new();
    let guard = coordinator.subscribe_guard();
    let session = TenantContext::new(TenantId::new("tenant-a"), ActorId::new("planner"));
    let trigger = coordinator.clone();
    let publishing = async move {
        tokio::time::sleep(Duration::from_millis(30)).await;
        let envelope = publisher.publish(&session, guest_added("planner")).await.unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;
        trigger.shutdown();
        envelope
    };

    // When
    let (result, published) = tokio::join!(reconciler.run_until(guard), publishing);

    // Then
    result.unwrap();
    assert!(!cache.contains("guests.list"));
    assert!(!cache.contains("wedding.guest_count"));
    assert!(cache.contains("vendors.list"));
    assert_eq!(store.current(), Some(published.cursor()));
}

#[tokio::test]
async fn given_in_process_source_when_opened_without_cursor_then_start_is_tenant_head() {
    let (publisher, server) = stack();
    let session = TenantContext::new(TenantId::new("tenant-a"), ActorId::new("planner"));
    let existing = publisher.publish(&session, guest_added("planner")).await.unwrap();
    let source = InProcessSource::new(server, TenantId::new("tenant-a"), ActorId::new("viewer"));

    let feed = source.open(None).await.unwrap();

    assert_eq!(feed.start, Some(existing.cursor()));
}

#[tokio::test]
async fn given_change_published_while_disconnected_before_first_envelope_when_reconnected_then_delivered() {
    // Given
    let (publisher, server) = stack();
    let head = server.backend().head(&TenantId::new("tenant-a")).await.unwrap();
    let source = Arc::new(DropsFirstSession {
        inner: InProcessSource::new(server, TenantId::new("tenant-a"), ActorId::new("coordinator")),
        publisher,
        opened_with: Mutex::new(Vec::new()),
        published: Mutex::new(None),
    });
    let cache = Arc::new(QueryCache::new());
    cache.insert("guests.list", json!([]));
    cache.insert("vendors.list", json!([]));
    let store = Arc::new(MemoryCursorStore::new());

    let mut reconciler = ClientReconciler::new(
        source.clone(),
        store.clone(),
        cache.clone(),
        TenantId::new("tenant-a"),
        ActorId::new("coordinator"),
        Backoff::new(Duration::from_millis(1), Duration::from_millis(5), 2.0, false),
    );

    let coordinator = ShutdownCoordinator::new();
    let guard = coordinator.subscribe_guard();
    let trigger = coordinator.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        trigger.shutdown();
    });

    // When
    reconciler.run_until(guard).await.unwrap();

    // Then
    let published = source.published.lock().unwrap().clone().unwrap();
    let opened_with = source.opened_with.lock().unwrap().clone();
    assert_eq!(opened_with[0], None);
    assert_eq!(opened_with[1], Some(head));
    assert!(!cache.contains("guests.list"));
    assert!(cache.contains("vendors.list"));
    assert_eq!(store.current(), Some(published.cursor()));
}
