//! # rollcall-client
//!
//! Client side of the attendance REST API.
//!
//! - [`http::ApiClient`]: reqwest implementation of the [`api`] traits.
//! - [`tracker::OptimisticActionTracker`]: the in-memory undo ledger.
//! - [`workflow`]: attendance, bulk upload, promotion, and sign-in use
//!   cases that tie API calls to the ledger and the notification store.

pub mod api;
pub mod dto;
pub mod http;
pub mod tracker;
pub mod workflow;

pub use http::ApiClient;
pub use tracker::OptimisticActionTracker;
pub use workflow::{
    AttendanceWorkflow, AuthWorkflow, BulkUploadWorkflow, PromotionWorkflow, UndoOutcome,
};
