//! Deterministic timer queue.
//!
//! Timers are plain data: the owner schedules an event for a deadline,
//! keeps the returned [`TimerToken`] to cancel it, and periodically pops
//! whatever is due for the current instant. Nothing fires on its own.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};

/// Handle to a scheduled timer, used for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerToken(u64);

/// A timer whose deadline has passed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Due<E> {
    /// Token the timer was scheduled under.
    pub token: TimerToken,
    /// Instant the timer was due at (not the instant it was popped).
    pub deadline: DateTime<Utc>,
    /// The scheduled event.
    pub event: E,
}

/// Ordered set of pending deadlines.
///
/// Timers with equal deadlines pop in scheduling order.
#[derive(Debug)]
pub struct TimerQueue<E> {
    entries: BTreeMap<(DateTime<Utc>, u64), E>,
    deadlines: HashMap<u64, DateTime<Utc>>,
    next_seq: u64,
}

impl<E> TimerQueue<E> {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            deadlines: HashMap::new(),
            next_seq: 0,
        }
    }

    /// Schedule `event` for `deadline`.
    pub fn schedule(&mut self, deadline: DateTime<Utc>, event: E) -> TimerToken {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.insert((deadline, seq), event);
        self.deadlines.insert(seq, deadline);
        TimerToken(seq)
    }

    /// Cancel a pending timer. Returns the event if it had not fired yet.
    pub fn cancel(&mut self, token: TimerToken) -> Option<E> {
        let deadline = self.deadlines.remove(&token.0)?;
        self.entries.remove(&(deadline, token.0))
    }

    /// Whether the timer is still pending.
    pub fn is_pending(&self, token: TimerToken) -> bool {
        self.deadlines.contains_key(&token.0)
    }

    /// Earliest pending deadline.
    pub fn next_deadline(&self) -> Option<DateTime<Utc>> {
        self.entries.keys().next().map(|(deadline, _)| *deadline)
    }

    /// Pop the earliest timer if it is due at `now`.
    pub fn pop_due(&mut self, now: DateTime<Utc>) -> Option<Due<E>> {
        let key = *self.entries.keys().next()?;
        if key.0 > now {
            return None;
        }
        let event = self.entries.remove(&key)?;
        self.deadlines.remove(&key.1);
        Some(Due {
            token: TimerToken(key.1),
            deadline: key.0,
            event,
        })
    }

    /// Number of pending timers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no timers are pending.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cancel everything.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.deadlines.clear();
    }
}

impl<E> Default for TimerQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[test]
    fn test_pops_in_deadline_then_schedule_order() {
        let t0 = Utc::now();
        let mut queue = TimerQueue::new();
        queue.schedule(t0 + Duration::seconds(2), "late");
        queue.schedule(t0 + Duration::seconds(1), "first");
        queue.schedule(t0 + Duration::seconds(1), "second");

        let now = t0 + Duration::seconds(5);
        let order: Vec<&str> = std::iter::from_fn(|| queue.pop_due(now))
            .map(|due| due.event)
            .collect();
        assert_eq!(order, vec!["first", "second", "late"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_not_due_stays_pending() {
        let t0 = Utc::now();
        let mut queue = TimerQueue::new();
        let token = queue.schedule(t0 + Duration::seconds(5), ());

        assert!(queue.pop_due(t0 + Duration::seconds(4)).is_none());
        assert!(queue.is_pending(token));

        let due = queue.pop_due(t0 + Duration::seconds(5)).unwrap();
        assert_eq!(due.token, token);
        assert_eq!(due.deadline, t0 + Duration::seconds(5));
        assert!(!queue.is_pending(token));
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let t0 = Utc::now();
        let mut queue = TimerQueue::new();
        let token = queue.schedule(t0, 1);

        assert_eq!(queue.cancel(token), Some(1));
        assert_eq!(queue.cancel(token), None);
        assert!(queue.pop_due(t0).is_none());
    }
}
