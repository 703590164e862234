//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{Duration, NaiveDate};

use rollcall_cli::{Console, Flow, Shell};
use rollcall_cli::output::OutputFormat;
use rollcall_client::api::{AttendanceApi, AuthApi, PromotionApi, StudentApi};
use rollcall_client::dto::{
    BulkUploadResponse, LoginRequest, LoginResponse, MarkAllResponse, MarkMemberRequest,
    MarkMemberResponse, PresentMember, PromoteRequest, PromoteResponse, UndoResponse,
};
use rollcall_client::{AttendanceWorkflow, AuthWorkflow, BulkUploadWorkflow, PromotionWorkflow};
use rollcall_core::config::toast::ToastConfig;
use rollcall_core::config::upload::UploadConfig;
use rollcall_core::error::AppError;
use rollcall_core::result::AppResult;
use rollcall_core::time::{Clock, ManualClock};
use rollcall_core::types::{ActionId, StudentId};
use rollcall_entity::auth::{Role, UserProfile};
use rollcall_notify::activity::ActivityMonitor;
use rollcall_notify::persistence::{MemoryPersistence, StatePersistence};
use rollcall_notify::{NotificationService, NotificationStore, SharedStore, ToastManager};
use rollcall_worker::TimerDriver;

/// Mutable state of the in-memory backend.
#[derive(Debug, Default)]
pub struct BackendState {
    /// Requests received, in order.
    pub calls: Vec<String>,
    /// Bearer token currently attached.
    pub token: Option<String>,
    /// Role returned by login.
    pub role: Option<Role>,
    /// Every undo endpoint fails with a server error.
    pub fail_undo: bool,
    /// Members listed as already present.
    pub present: Vec<PresentMember>,
    next_action: u64,
}

/// In-memory stand-in for the attendance REST API.
#[derive(Debug, Default)]
pub struct FakeBackend {
    state: Mutex<BackendState>,
}

impl FakeBackend {
    /// Inspect or modify the backend state.
    pub fn with<R>(&self, f: impl FnOnce(&mut BackendState) -> R) -> R {
        f(&mut self.state.lock().unwrap())
    }

    /// Requests received so far.
    pub fn calls(&self) -> Vec<String> {
        self.with(|s| s.calls.clone())
    }

    fn record(&self, call: String) -> ActionId {
        self.with(|s| {
            s.calls.push(call);
            s.next_action += 1;
            ActionId::new(format!("act-{}", s.next_action))
        })
    }

    fn undo(&self, call: String, undone: u64) -> AppResult<UndoResponse> {
        self.with(|s| {
            s.calls.push(call);
            if s.fail_undo {
                Err(AppError::external_service("Undo window expired"))
            } else {
                Ok(UndoResponse { undone })
            }
        })
    }
}

#[async_trait]
impl AuthApi for FakeBackend {
    async fn login(&self, request: &LoginRequest) -> AppResult<LoginResponse> {
        self.record(format!("login {}", request.email));
        let role = self.with(|s| s.role).unwrap_or(Role::Secretary);
        Ok(LoginResponse {
            token: "token-1".to_string(),
            user: UserProfile {
                id: Some(serde_json::json!(1)),
                email: request.email.clone(),
                role,
                full_name: Some("Test Secretary".to_string()),
            },
        })
    }

    fn set_token(&self, token: Option<String>) {
        self.with(|s| s.token = token);
    }

    fn has_token(&self) -> bool {
        self.with(|s| s.token.is_some())
    }
}

#[async_trait]
impl AttendanceApi for FakeBackend {
    async fn mark_member(
        &self,
        date: NaiveDate,
        request: &MarkMemberRequest,
    ) -> AppResult<MarkMemberResponse> {
        let action_id = self.record(format!(
            "mark {date} {} {}",
            request.student_id, request.is_present
        ));
        Ok(MarkMemberResponse {
            action_id: Some(action_id),
            message: None,
        })
    }

    async fn mark_all(&self, date: NaiveDate) -> AppResult<MarkAllResponse> {
        let action_id = self.record(format!("mark-all {date}"));
        Ok(MarkAllResponse {
            created: 12,
            action_id: Some(action_id),
        })
    }

    async fn undo_member(&self, action_id: &ActionId) -> AppResult<UndoResponse> {
        self.undo(format!("undo-member {action_id}"), 1)
    }

    async fn undo_mark_all(&self, action_id: &ActionId) -> AppResult<UndoResponse> {
        self.undo(format!("undo-mark-all {action_id}"), 12)
    }

    async fn unmark_member(&self, date: NaiveDate, student_id: StudentId) -> AppResult<()> {
        self.with(|s| s.calls.push(format!("unmark {date} {student_id}")));
        Ok(())
    }

    async fn members_present(&self, date: NaiveDate) -> AppResult<Vec<PresentMember>> {
        self.with(|s| {
            s.calls.push(format!("present {date}"));
            Ok(s.present.clone())
        })
    }
}

#[async_trait]
impl StudentApi for FakeBackend {
    async fn bulk_upload(&self, file_name: &str, data: Bytes) -> AppResult<BulkUploadResponse> {
        let action_id = self.record(format!("upload {file_name} {}", data.len()));
        Ok(BulkUploadResponse {
            success: true,
            total_rows: 3,
            successful_rows: 3,
            failed_rows: 0,
            action_id: Some(action_id),
            ..Default::default()
        })
    }

    async fn undo_bulk_upload(&self, action_id: &ActionId) -> AppResult<UndoResponse> {
        self.undo(format!("undo-upload {action_id}"), 3)
    }
}

#[async_trait]
impl PromotionApi for FakeBackend {
    async fn promote(&self, request: &PromoteRequest) -> AppResult<PromoteResponse> {
        let action_id = self.record(format!("promote {} {}", request.from_level, request.to_level));
        Ok(PromoteResponse {
            promoted_count: 8,
            action_id: Some(action_id),
        })
    }

    async fn undo_promotion(&self, action_id: &ActionId) -> AppResult<UndoResponse> {
        self.undo(format!("undo-promotion {action_id}"), 8)
    }
}

/// Test application context
pub struct TestApp {
    /// Virtual time shared by every component
    pub clock: Arc<ManualClock>,
    /// Fake REST backend
    pub backend: Arc<FakeBackend>,
    /// Console shell under test
    pub shell: Shell,
    /// Timer driver, ticked by hand
    pub driver: TimerDriver,
}

impl TestApp {
    /// Attendance date every test starts on
    pub fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
    }

    /// Create a new test application with an in-memory slot
    pub fn new() -> Self {
        Self::with_persistence(Arc::new(MemoryPersistence::new()))
    }

    /// Create a new test application persisting into `persistence`
    pub fn with_persistence(persistence: Arc<dyn StatePersistence>) -> Self {
        let clock = Arc::new(ManualClock::starting_now());
        let store = SharedStore::new(NotificationStore::hydrate(clock.clone(), persistence));
        let toasts = Arc::new(Mutex::new(ToastManager::watching(ToastConfig::default(), &store)));
        let activity = Arc::new(Mutex::new(ActivityMonitor::new(Duration::seconds(5))));
        let backend = Arc::new(FakeBackend::default());
        let notifications = NotificationService::new(store.clone());

        let console = Console {
            format: OutputFormat::Json,
            clock: clock.clone(),
            store: store.clone(),
            notifications: notifications.clone(),
            toasts: toasts.clone(),
            activity: activity.clone(),
            auth: AuthWorkflow::new(backend.clone()),
            attendance: AttendanceWorkflow::new(backend.clone(), notifications.clone(), Self::date()),
            uploads: BulkUploadWorkflow::new(
                backend.clone(),
                notifications.clone(),
                UploadConfig::default(),
            ),
            promotions: PromotionWorkflow::new(backend.clone(), notifications),
        };
        let driver = TimerDriver::new(
            store,
            toasts,
            activity,
            clock.clone(),
            std::time::Duration::from_millis(100),
        );

        Self {
            clock,
            backend,
            shell: Shell::new(console),
            driver,
        }
    }

    /// The console behind the shell
    pub fn console(&self) -> &Console {
        self.shell.console()
    }

    /// Type one line into the console
    pub async fn run(&mut self, line: &str) -> Flow {
        self.shell.handle_line(line).await
    }

    /// Move virtual time forward and tick every timer
    pub fn advance_ms(&self, ms: i64) {
        let now = self.clock.advance(Duration::milliseconds(ms));
        self.driver.tick_once(now);
    }

    /// Tick every timer without moving time
    pub fn tick(&self) {
        self.driver.tick_once(self.clock.now());
    }

    /// Number of mounted toasts
    pub fn toast_count(&self) -> usize {
        self.console().toasts.lock().unwrap().len()
    }

    /// Titles of the notifications, newest first
    pub fn titles(&self) -> Vec<String> {
        self.console()
            .store
            .snapshot()
            .into_iter()
            .map(|n| n.title)
            .collect()
    }
}
