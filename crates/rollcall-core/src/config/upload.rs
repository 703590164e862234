//! Bulk upload configuration.

use serde::{Deserialize, Serialize};

/// Client-side validation limits for student bulk uploads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Maximum accepted file size in bytes.
    #[serde(default = "default_max_size")]
    pub max_file_size_bytes: u64,
    /// Accepted file extensions, lowercase and without the dot.
    #[serde(default = "default_extensions")]
    pub allowed_extensions: Vec<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size_bytes: default_max_size(),
            allowed_extensions: default_extensions(),
        }
    }
}

fn default_max_size() -> u64 {
    10 * 1024 * 1024
}

fn default_extensions() -> Vec<String> {
    vec!["csv".to_string(), "xls".to_string(), "xlsx".to_string()]
}
