//! Integration tests for the notification store, toasts, and auto-read.

mod helpers;

use rollcall_entity::notification::{NotificationDraft, NotificationKind};

use helpers::TestApp;

#[tokio::test]
async fn test_toast_lifecycle_end_to_end() {
    let app = TestApp::new();
    let store = &app.console().store;

    store.add_notification(
        NotificationDraft::new(NotificationKind::Success, "Saved", "ok").with_toast(true),
    );
    app.tick();
    assert_eq!(store.unread_count(), 1);
    assert_eq!(app.toast_count(), 1);

    store.mark_all_as_read();
    assert_eq!(store.unread_count(), 0);
    assert_eq!(store.snapshot().len(), 1);
    assert_eq!(app.toast_count(), 1);

    app.advance_ms(4999);
    assert_eq!(app.toast_count(), 1);
    app.advance_ms(1);
    assert_eq!(app.toast_count(), 0);
    assert_eq!(store.snapshot().len(), 1);
}

#[tokio::test]
async fn test_notifications_without_toast_opt_in_never_toast() {
    let app = TestApp::new();
    let service = &app.console().notifications;

    service.system_error("Connection refused");
    service.bulk_upload_completed(3, 0, 3);
    app.tick();

    assert_eq!(app.toast_count(), 0);
    assert_eq!(app.console().store.unread_count(), 2);
}

#[tokio::test]
async fn test_console_shortcuts_drive_the_store() {
    let mut app = TestApp::new();
    app.console().notifications.system_error("boom");
    app.console().notifications.email_sent("a@example.org", rollcall_notify::service::EmailKind::Welcome);

    app.run("key ctrl+shift+n").await;
    assert!(app.console().store.is_open());

    app.run("key ctrl+shift+m --focus input").await;
    assert_eq!(app.console().store.unread_count(), 2);

    app.run("key cmd+shift+m").await;
    assert_eq!(app.console().store.unread_count(), 0);

    app.run("key ctrl+shift+c").await;
    assert!(app.console().store.snapshot().is_empty());

    app.run("n close").await;
    assert!(!app.console().store.is_open());
}

#[tokio::test]
async fn test_console_notification_commands_accept_id_prefixes() {
    let mut app = TestApp::new();
    let first = app
        .console()
        .store
        .add_notification(NotificationDraft::new(NotificationKind::Info, "First", "m"));
    app.clock.advance(chrono::Duration::seconds(1));
    let second = app
        .console()
        .store
        .add_notification(NotificationDraft::new(NotificationKind::Info, "Second", "m"));

    app.run(&format!("notifications read {}", first.id)).await;
    assert!(app.console().store.get(&first.id).unwrap().read);

    let prefix = &second.id.as_str()[..second.id.as_str().len() - 2];
    app.run(&format!("notifications remove {prefix}")).await;
    assert_eq!(app.titles(), vec!["First"]);
}

#[tokio::test]
async fn test_typing_auto_reads_info_but_not_errors() {
    let mut app = TestApp::new();
    app.console().notifications.undo_completed("Attendance Undone", "done");
    app.console().notifications.system_error("failed");

    app.run("status").await;
    app.advance_ms(4000);
    assert_eq!(app.console().store.unread_count(), 2);

    app.run("toasts").await;
    app.advance_ms(4999);
    assert_eq!(app.console().store.unread_count(), 2);
    app.advance_ms(1);

    let snapshot = app.console().store.snapshot();
    assert_eq!(app.console().store.unread_count(), 1);
    assert!(snapshot.iter().any(|n| n.kind == NotificationKind::Error && !n.read));
}

#[tokio::test]
async fn test_clicking_a_toast_reads_it_and_closes_it() {
    let mut app = TestApp::new();
    let critical = app
        .console()
        .notifications
        .critical_error("Undo Failed", "server down", None);
    app.tick();
    assert_eq!(app.toast_count(), 1);

    app.run(&format!("click {}", critical.id)).await;
    assert!(app.console().store.get(&critical.id).unwrap().read);

    app.advance_ms(299);
    assert_eq!(app.toast_count(), 1);
    app.advance_ms(1);
    assert_eq!(app.toast_count(), 0);
}
