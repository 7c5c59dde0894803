mod common;

use common::{START, guest_insert};

use wp_server::{AppState, build_backend};

use wp_auth::TenantContext;
use wp_config::{BackendKind, Config};
use wp_core::{ActorId, Cursor, TenantId};
use wp_sync::{Clock, ManualClock, ShutdownCoordinator};

use std::env;
use std::sync::Arc;

use serial_test::serial;
use tempfile::TempDir;

/// Points WP_CONFIG_DIR at a temp directory; restores on drop
struct ConfigDirGuard {
    temp: TempDir,
    original: Option<String>,
}

impl ConfigDirGuard {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let original = env::var("WP_CONFIG_DIR").ok();
        unsafe { env::set_var("WP_CONFIG_DIR", temp.path()) };
        Self {
            temp,
            original,
        }
    }

    fn path(&self) -> &std::path::Path {
        self.temp.path()
    }
}

impl Drop for ConfigDirGuard {
    fn drop(&mut self) {
        unsafe {
            match &self.original {
                Some(val) => env::set_var("WP_CONFIG_DIR", val),
                None => env::remove_var("WP_CONFIG_DIR"),
            }
        }
    }
}

fn clock() -> Arc<dyn Clock> {
    Arc::new(ManualClock::new(Cursor::from_millis(START)))
}

#[tokio::test]
async fn given_memory_backend_config_when_building_then_memory_backend() {
    let backend = build_backend(&Config::default(), clock()).await.unwrap();

    assert_eq!(backend.name(), "memory");
}

#[tokio::test]
#[serial]
async fn given_sqlite_backend_config_when_building_then_log_lives_in_config_dir() {
    // Given
    let dir = ConfigDirGuard::new();
    let mut config = Config::default();
    config.sync.backend = BackendKind::Sqlite;

    // When
    let backend = build_backend(&config, clock()).await.unwrap();

    // Then
    assert_eq!(backend.name(), "sqlite");
    assert!(dir.path().join(&config.database.path).exists());
}

#[tokio::test]
#[serial]
async fn given_sqlite_backend_when_publishing_then_changes_are_served_from_log() {
    // Given
    let _dir = ConfigDirGuard::new();
    let mut config = Config::default();
    config.sync.backend = BackendKind::Sqlite;
    let clock = clock();
    let backend = build_backend(&config, clock.clone()).await.unwrap();
    let state = AppState::new(&config, backend, clock, None, ShutdownCoordinator::new());

    // When
    let session = TenantContext::new(TenantId::new("local"), ActorId::new("planner"));
    let published = state
        .publisher
        .publish(&session, guest_insert("local", "planner", "guest-1"))
        .await
        .unwrap();
    let page = state
        .server
        .catch_up(
            &TenantId::new("local"),
            &ActorId::new("viewer"),
            Some(Cursor::ORIGIN),
            10,
        )
        .await
        .unwrap();

    // Then
    assert_eq!(page.envelopes, vec![published]);
    assert!(!page.has_more);
}
