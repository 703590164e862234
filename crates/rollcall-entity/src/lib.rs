//! # rollcall-entity
//!
//! Domain entity models for the Rollcall console. Every struct in this
//! crate is a value object shared between the notification subsystem, the
//! undo ledger, and the API client. All entities derive `Debug`, `Clone`,
//! `Serialize`, and `Deserialize`.

pub mod action;
pub mod attendance;
pub mod auth;
pub mod notification;
