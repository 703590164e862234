//! Ledger keys for attendance actions.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use rollcall_core::types::StudentId;

use crate::action::ContextKey;

/// What an attendance action applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceTarget {
    /// A single member.
    Member(StudentId),
    /// Every member at once.
    AllMembers,
}

/// An attendance action on a given date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttendanceKey {
    /// Attendance date.
    pub date: NaiveDate,
    /// Affected member(s).
    pub target: AttendanceTarget,
}

impl AttendanceKey {
    /// Key for a single member on `date`.
    pub fn member(date: NaiveDate, student_id: StudentId) -> Self {
        Self {
            date,
            target: AttendanceTarget::Member(student_id),
        }
    }

    /// Key for a mark-all on `date`.
    pub fn all(date: NaiveDate) -> Self {
        Self {
            date,
            target: AttendanceTarget::AllMembers,
        }
    }
}

impl ContextKey for AttendanceKey {
    type Scope = NaiveDate;

    fn scope(&self) -> NaiveDate {
        self.date
    }
}
