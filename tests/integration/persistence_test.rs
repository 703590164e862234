//! Integration tests for persistence, rehydration, and retention.

mod helpers;

use std::sync::Arc;

use chrono::Duration;

use rollcall_core::time::ManualClock;
use rollcall_entity::notification::{NotificationDraft, NotificationKind};
use rollcall_notify::persistence::JsonFilePersistence;
use rollcall_notify::retention::RetentionSweep;
use rollcall_notify::{NotificationStore, SharedStore};

use helpers::TestApp;

fn open_store(path: &std::path::Path, clock: Arc<ManualClock>) -> SharedStore {
    SharedStore::new(NotificationStore::hydrate(
        clock,
        Arc::new(JsonFilePersistence::new(path)),
    ))
}

#[tokio::test]
async fn test_file_layout_and_rehydration() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data").join("notifications-storage.json");

    let mut app = TestApp::with_persistence(Arc::new(JsonFilePersistence::new(&path)));
    app.run("mark 4 --name Ada").await;
    app.run("mark-all").await;
    app.console().notifications.critical_error("Undo Failed", "boom", None);
    let first_id = app.console().store.snapshot()[2].id.clone();
    app.run(&format!("notifications read {first_id}")).await;
    app.run("n toggle").await;

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw["version"], 0);
    assert_eq!(raw["state"]["unreadCount"], 2);
    assert_eq!(raw["state"]["notifications"][0]["type"], "error");
    assert_eq!(raw["state"]["notifications"][0]["showAsToast"], true);
    assert_eq!(raw["state"]["notifications"][2]["actionUrl"], "/secretary/attendance");
    assert!(raw["state"].get("isOpen").is_none());

    let reopened = open_store(&path, app.clock.clone());
    assert_eq!(reopened.snapshot(), app.console().store.snapshot());
    assert_eq!(reopened.unread_count(), 2);
    assert!(!reopened.is_open());
}

#[tokio::test]
async fn test_rehydrated_entries_do_not_toast_again() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notifications.json");

    let app = TestApp::with_persistence(Arc::new(JsonFilePersistence::new(&path)));
    app.console().notifications.critical_error("Undo Failed", "boom", None);
    app.tick();
    assert_eq!(app.toast_count(), 1);

    let next = TestApp::with_persistence(Arc::new(JsonFilePersistence::new(&path)));
    next.tick();
    assert_eq!(next.console().store.snapshot().len(), 1);
    assert_eq!(next.toast_count(), 0);
}

#[tokio::test]
async fn test_retention_sweep_after_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notifications.json");
    let clock = Arc::new(ManualClock::starting_now());

    let store = open_store(&path, clock.clone());
    store.add_notification(NotificationDraft::new(NotificationKind::Info, "eight", "m"));
    clock.advance(Duration::days(2));
    store.add_notification(NotificationDraft::new(NotificationKind::Warning, "six", "m"));
    drop(store);

    let now = clock.advance(Duration::days(6));
    let store = open_store(&path, clock.clone());
    assert_eq!(store.snapshot().len(), 2);

    let removed = RetentionSweep::new(Duration::days(7)).run(&store, now);
    assert_eq!(removed, 1);
    assert_eq!(store.unread_count(), 1);

    let reopened = open_store(&path, clock);
    let titles: Vec<String> = reopened.snapshot().into_iter().map(|n| n.title).collect();
    assert_eq!(titles, vec!["six"]);
}
