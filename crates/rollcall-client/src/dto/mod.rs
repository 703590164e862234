//! Wire types for the REST API.

pub mod request;
pub mod response;

pub use request::{LoginRequest, MarkMemberRequest, PromoteRequest};
pub use response::{
    ApiErrorBody, BulkUploadResponse, CreatedStudent, LoginResponse, MarkAllResponse,
    MarkMemberResponse, PresentMember, PromoteResponse, RowError, UndoResponse,
};
