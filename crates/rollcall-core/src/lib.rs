//! # rollcall-core
//!
//! Core crate for the Rollcall attendance console. Contains configuration
//! schemas, typed identifiers, the clock abstraction, the deterministic
//! timer queue, and the unified error system.
//!
//! This crate has **no** internal dependencies on other Rollcall crates.

pub mod config;
pub mod error;
pub mod result;
pub mod time;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
