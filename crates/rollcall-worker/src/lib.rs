//! Background work for the Rollcall console.
//!
//! This crate provides:
//! - A maintenance scheduler that sweeps old notifications at startup and
//!   then on a fixed interval
//! - A timer driver that advances toast and activity timers on real time
//! - A runner that owns both and shuts them down together

pub mod driver;
pub mod runner;
pub mod scheduler;

pub use driver::{SharedActivity, SharedToasts, TimerDriver};
pub use runner::BackgroundRunner;
pub use scheduler::MaintenanceScheduler;
