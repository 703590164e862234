//! Response bodies returned by the REST API.
//!
//! Fields the console never reads are left out; everything optional on
//! the server side carries a serde default so partial payloads decode.

use serde::{Deserialize, Serialize};

use rollcall_core::types::{ActionId, StudentId};
use rollcall_entity::auth::UserProfile;

/// Successful login.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserProfile,
}

/// Result of marking one member.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkMemberResponse {
    #[serde(default)]
    pub action_id: Option<ActionId>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Result of marking every member present.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkAllResponse {
    /// Number of attendance rows created.
    #[serde(default)]
    pub created: u64,
    #[serde(default)]
    pub action_id: Option<ActionId>,
}

/// Result of a compensating request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UndoResponse {
    /// Number of records reverted.
    #[serde(default)]
    pub undone: u64,
}

/// One rejected spreadsheet row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowError {
    pub row: u64,
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

/// A student created by a bulk upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedStudent {
    /// Server id; some deployments send it as a string.
    pub id: serde_json::Value,
    #[serde(default)]
    pub code: Option<String>,
    pub full_name: String,
}

/// Result of `POST /bulk-upload/students`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkUploadResponse {
    pub success: bool,
    #[serde(default)]
    pub total_rows: u64,
    #[serde(default)]
    pub successful_rows: u64,
    #[serde(default)]
    pub failed_rows: u64,
    #[serde(default)]
    pub action_id: Option<ActionId>,
    #[serde(default)]
    pub errors: Vec<RowError>,
    #[serde(default)]
    pub created_students: Vec<CreatedStudent>,
}

/// Result of `POST /admin/promote-students`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromoteResponse {
    #[serde(default)]
    pub promoted_count: u64,
    #[serde(default)]
    pub action_id: Option<ActionId>,
}

/// A member already marked present, as listed by
/// `GET /attendance/members-present/{date}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresentMember {
    pub id: StudentId,
    pub full_name: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
}

/// Error payload of a non-2xx response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}
