//! API seams the workflows depend on.
//!
//! [`crate::http::ApiClient`] implements all of them over HTTP; tests
//! substitute in-memory fakes.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::NaiveDate;

use rollcall_core::result::AppResult;
use rollcall_core::types::{ActionId, StudentId};

use crate::dto::{
    BulkUploadResponse, LoginRequest, LoginResponse, MarkAllResponse, MarkMemberRequest,
    MarkMemberResponse, PresentMember, PromoteRequest, PromoteResponse, UndoResponse,
};

/// Authentication endpoints and bearer-token handling.
#[async_trait]
pub trait AuthApi: Send + Sync + std::fmt::Debug + 'static {
    /// `POST /auth/login`.
    async fn login(&self, request: &LoginRequest) -> AppResult<LoginResponse>;

    /// Replace the bearer token attached to later requests.
    fn set_token(&self, token: Option<String>);

    /// Whether a bearer token is held.
    fn has_token(&self) -> bool;
}

/// Attendance endpoints.
#[async_trait]
pub trait AttendanceApi: Send + Sync + std::fmt::Debug + 'static {
    /// `POST /attendance/mark-member/{date}`.
    async fn mark_member(
        &self,
        date: NaiveDate,
        request: &MarkMemberRequest,
    ) -> AppResult<MarkMemberResponse>;

    /// `POST /attendance/mark-all/{date}`.
    async fn mark_all(&self, date: NaiveDate) -> AppResult<MarkAllResponse>;

    /// `POST /attendance/individual/undo/{actionId}`.
    async fn undo_member(&self, action_id: &ActionId) -> AppResult<UndoResponse>;

    /// `POST /attendance/mark-all/undo/{actionId}`.
    async fn undo_mark_all(&self, action_id: &ActionId) -> AppResult<UndoResponse>;

    /// `DELETE /attendance/unmark-member/{date}/{studentId}`.
    async fn unmark_member(&self, date: NaiveDate, student_id: StudentId) -> AppResult<()>;

    /// `GET /attendance/members-present/{date}`.
    async fn members_present(&self, date: NaiveDate) -> AppResult<Vec<PresentMember>>;
}

/// Student bulk-upload endpoints.
#[async_trait]
pub trait StudentApi: Send + Sync + std::fmt::Debug + 'static {
    /// `POST /bulk-upload/students` as multipart with a single `file` field.
    async fn bulk_upload(&self, file_name: &str, data: Bytes) -> AppResult<BulkUploadResponse>;

    /// `POST /bulk-upload/students/undo/{actionId}`.
    async fn undo_bulk_upload(&self, action_id: &ActionId) -> AppResult<UndoResponse>;
}

/// Level promotion endpoints.
#[async_trait]
pub trait PromotionApi: Send + Sync + std::fmt::Debug + 'static {
    /// `POST /admin/promote-students`.
    async fn promote(&self, request: &PromoteRequest) -> AppResult<PromoteResponse>;

    /// `POST /admin/promotions/undo/{actionId}`.
    async fn undo_promotion(&self, action_id: &ActionId) -> AppResult<UndoResponse>;
}
