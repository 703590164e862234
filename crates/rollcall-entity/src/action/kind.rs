//! Kinds of mutating actions that can be reversed.

use serde::{Deserialize, Serialize};

/// A mutating action the server can compensate for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// One member marked present or absent.
    MarkMember,
    /// Every member marked present for a date.
    MarkAll,
    /// A spreadsheet of students created in one go.
    BulkUpload,
    /// A batch of students moved from one level to another.
    Promotion,
}

impl ActionKind {
    /// Return the kind as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MarkMember => "mark_member",
            Self::MarkAll => "mark_all",
            Self::BulkUpload => "bulk_upload",
            Self::Promotion => "promotion",
        }
    }

    /// Human label used in undo messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::MarkMember => "attendance mark",
            Self::MarkAll => "mark all present",
            Self::BulkUpload => "bulk upload",
            Self::Promotion => "promotion",
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
