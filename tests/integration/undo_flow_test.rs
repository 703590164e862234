//! Integration tests for optimistic actions and their undo.

mod helpers;

use std::io::Write;

use rollcall_cli::Flow;
use rollcall_client::dto::PresentMember;
use rollcall_core::types::StudentId;
use rollcall_entity::auth::Role;

use helpers::TestApp;

#[tokio::test]
async fn test_mark_then_undo_member() {
    let mut app = TestApp::new();

    app.run("mark 4 --name 'Ada Lovelace'").await;
    assert!(app.console().attendance.can_undo_member(StudentId(4)));
    assert_eq!(app.titles(), vec!["Member Attendance Marked"]);

    app.run("undo member 4").await;
    assert!(!app.console().attendance.can_undo_member(StudentId(4)));
    assert_eq!(
        app.backend.calls(),
        vec!["mark 2025-01-01 4 true", "undo-member act-1"]
    );
    assert_eq!(app.titles()[0], "Attendance Undone");

    app.run("undo member 4").await;
    assert_eq!(app.backend.calls().len(), 2);
}

#[tokio::test]
async fn test_failed_undo_clears_record_and_raises_toast() {
    let mut app = TestApp::new();
    app.backend.with(|s| s.fail_undo = true);

    app.run("mark-all").await;
    assert!(app.console().attendance.can_undo_mark_all());

    app.run("undo all").await;
    assert!(!app.console().attendance.can_undo_mark_all());
    assert_eq!(app.titles()[0], "Undo Failed");
    assert_eq!(app.toast_count(), 1);

    app.run("undo all").await;
    assert_eq!(
        app.backend.calls(),
        vec!["mark-all 2025-01-01", "undo-mark-all act-1"]
    );
}

#[tokio::test]
async fn test_switching_date_drops_undo_records() {
    let mut app = TestApp::new();

    app.run("mark 7").await;
    app.run("mark-all").await;
    app.run("date 2025-01-02").await;
    assert!(!app.console().attendance.can_undo_member(StudentId(7)));
    assert!(!app.console().attendance.can_undo_mark_all());

    app.run("date 2025-01-01").await;
    assert!(!app.console().attendance.can_undo_member(StudentId(7)));
    assert!(app.console().attendance.pending().is_empty());
}

#[tokio::test]
async fn test_adopted_marks_undo_through_unmark() {
    let mut app = TestApp::new();
    app.backend.with(|s| {
        s.present = vec![PresentMember {
            id: StudentId(9),
            full_name: "Grace Hopper".to_string(),
            code: None,
            level: None,
        }]
    });

    app.run("mark 3").await;
    app.run("adopt").await;
    assert!(app.console().attendance.can_undo_member(StudentId(9)));

    app.run("undo member 9").await;
    app.run("undo member 3").await;
    assert_eq!(
        app.backend.calls(),
        vec![
            "mark 2025-01-01 3 true",
            "present 2025-01-01",
            "unmark 2025-01-01 9",
            "undo-member act-1",
        ]
    );
}

#[tokio::test]
async fn test_upload_and_promotion_undo() {
    let mut app = TestApp::new();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("students.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "fullName,level\nAda,L1\nGrace,L1\nAlan,L2").unwrap();

    app.run(&format!("upload '{}'", path.display())).await;
    assert!(app.console().uploads.can_undo());
    assert_eq!(app.titles()[0], "Bulk Upload Complete");

    app.run("promote L1 L2").await;
    assert!(app.console().promotions.can_undo());

    app.run("undo promotion").await;
    app.run("undo upload").await;
    assert!(!app.console().uploads.can_undo());
    assert!(!app.console().promotions.can_undo());
    assert_eq!(app.titles()[0], "Bulk Upload Undone");
    assert_eq!(app.titles()[1], "Promotion Undone");
}

#[tokio::test]
async fn test_invalid_requests_never_reach_the_backend() {
    let mut app = TestApp::new();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("students.pdf");
    std::fs::write(&path, b"%PDF").unwrap();

    app.run(&format!("upload '{}'", path.display())).await;
    app.run("promote L1 L1").await;
    app.run("mark not-a-number").await;

    assert!(app.backend.calls().is_empty());
    assert!(app.console().store.snapshot().is_empty());
}

#[tokio::test]
async fn test_login_requires_matching_role() {
    let mut app = TestApp::new();
    app.backend.with(|s| s.role = Some(Role::SuperAdmin));

    app.run("login sec@example.org --password pw --role secretary").await;
    assert!(!app.console().auth.is_authenticated());

    app.run("login admin@example.org --password pw --role super-admin").await;
    assert!(app.console().auth.is_authenticated());
    assert_eq!(app.console().auth.current_user().unwrap().role, Role::SuperAdmin);

    app.run("logout").await;
    assert!(!app.console().auth.is_authenticated());
    assert_eq!(app.run("quit").await, Flow::Quit);
}
