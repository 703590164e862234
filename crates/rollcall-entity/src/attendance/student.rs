//! Student references used by attendance flows.

use serde::{Deserialize, Serialize};

use rollcall_core::types::StudentId;

/// The minimum a flow needs to know about a student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRef {
    /// Server identifier.
    pub id: StudentId,
    /// Display name.
    pub full_name: String,
}

impl StudentRef {
    /// Create a new reference.
    pub fn new(id: StudentId, full_name: impl Into<String>) -> Self {
        Self {
            id,
            full_name: full_name.into(),
        }
    }
}

/// Whether an attendee is a registered member or a visitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendeeKind {
    /// Registered member.
    Member,
    /// One-off visitor.
    Visitor,
}

impl AttendeeKind {
    /// Capitalised label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Member => "Member",
            Self::Visitor => "Visitor",
        }
    }
}
