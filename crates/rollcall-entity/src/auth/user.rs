//! Signed-in user profile.

use serde::{Deserialize, Serialize};

use super::role::Role;

/// Profile returned by the login endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Server identifier (numeric or string depending on the deployment).
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    /// Login email.
    pub email: String,
    /// Account role.
    pub role: Role,
    /// Display name.
    #[serde(default, alias = "name")]
    pub full_name: Option<String>,
}
