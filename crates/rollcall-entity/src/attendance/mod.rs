//! Attendance entities.

pub mod key;
pub mod student;

pub use key::{AttendanceKey, AttendanceTarget};
pub use student::{AttendeeKind, StudentRef};
