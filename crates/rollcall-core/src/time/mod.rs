//! Time sources and scheduled timers.
//!
//! Every time-dependent component takes a [`Clock`] and keeps its pending
//! deadlines in a [`TimerQueue`], so tests drive them with a
//! [`ManualClock`] instead of sleeping.

pub mod clock;
pub mod timer;

pub use clock::{Clock, ManualClock, SharedClock, SystemClock};
pub use timer::{Due, TimerQueue, TimerToken};
