//! Client-side notification subsystem.
//!
//! - [`store::NotificationStore`]: the single source of truth for
//!   notifications, read state, and dropdown visibility, persisted on
//!   every mutation through [`persistence::StatePersistence`].
//! - [`shared::SharedStore`]: the process-wide handle every component
//!   goes through.
//! - [`toast::ToastManager`]: transient, auto-expiring presentation of
//!   notifications that opted in to toasts.
//! - [`service::NotificationService`]: semantic helpers used as side
//!   effects of API calls.
//! - [`retention`] and [`activity`]: the periodic age sweep and the
//!   read-after-activity sweep.

pub mod activity;
pub mod persistence;
pub mod retention;
pub mod service;
pub mod shared;
pub mod shortcuts;
pub mod store;
pub mod toast;

pub use service::NotificationService;
pub use shared::SharedStore;
pub use store::{NotificationStore, StoreEvent};
pub use toast::ToastManager;
