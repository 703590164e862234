//! Request bodies sent to the REST API.

use serde::Serialize;

use rollcall_core::types::StudentId;

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Body of `POST /attendance/mark-member/{date}`.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkMemberRequest {
    pub student_id: StudentId,
    pub is_present: bool,
}

/// Body of `POST /admin/promote-students`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromoteRequest {
    pub from_level: String,
    pub to_level: String,
}
