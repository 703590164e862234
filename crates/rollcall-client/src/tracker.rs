//! The undo ledger.
//!
//! Maps a context key to the handle needed to reverse the last action
//! performed under it. The ledger lives in memory only.

use std::collections::HashMap;

use tracing::{debug, warn};

use rollcall_entity::action::{ContextKey, UndoHandle};

/// Remembers the latest undoable action per context key.
///
/// Records belong to the scope of their key. Moving to another scope drops
/// every record outside it, and a record arriving for a scope other than
/// the current one is discarded.
#[derive(Debug, Clone)]
pub struct OptimisticActionTracker<K: ContextKey> {
    scope: Option<K::Scope>,
    records: HashMap<K, UndoHandle>,
}

impl<K: ContextKey> Default for OptimisticActionTracker<K> {
    fn default() -> Self {
        Self {
            scope: None,
            records: HashMap::new(),
        }
    }
}

impl<K: ContextKey> OptimisticActionTracker<K> {
    /// A ledger that accepts records for any scope until one is set.
    pub fn new() -> Self {
        Self::default()
    }

    /// A ledger pinned to `scope`.
    pub fn scoped(scope: K::Scope) -> Self {
        Self {
            scope: Some(scope),
            records: HashMap::new(),
        }
    }

    /// The current scope.
    pub fn scope(&self) -> Option<&K::Scope> {
        self.scope.as_ref()
    }

    /// Switch scope, dropping records that belong to any other scope.
    ///
    /// Returns how many records were dropped.
    pub fn set_scope(&mut self, scope: K::Scope) -> usize {
        let before = self.records.len();
        self.records.retain(|key, _| key.scope() == scope);
        let dropped = before - self.records.len();
        if dropped > 0 {
            debug!(?scope, dropped, "Dropped undo records for previous context");
        }
        self.scope = Some(scope);
        dropped
    }

    /// Store `handle` for `key`, superseding any earlier record.
    ///
    /// Returns the superseded handle. A record for a key outside the
    /// current scope is not stored.
    pub fn record(&mut self, key: K, handle: UndoHandle) -> Option<UndoHandle> {
        if let Some(scope) = &self.scope {
            if &key.scope() != scope {
                warn!(?key, "Discarding undo record for a context no longer in view");
                return None;
            }
        }
        debug!(?key, ?handle, "Recorded undoable action");
        self.records.insert(key, handle)
    }

    /// Store [`UndoHandle::NoActionAvailable`] for `key` unless a record
    /// already exists. Returns whether anything was stored.
    pub fn adopt(&mut self, key: K) -> bool {
        if self.records.contains_key(&key) {
            return false;
        }
        if let Some(scope) = &self.scope {
            if &key.scope() != scope {
                return false;
            }
        }
        self.records.insert(key, UndoHandle::NoActionAvailable);
        true
    }

    /// Whether undo is available for `key`.
    pub fn is_available(&self, key: &K) -> bool {
        self.records.contains_key(key)
    }

    /// The stored handle for `key`.
    pub fn get(&self, key: &K) -> Option<&UndoHandle> {
        self.records.get(key)
    }

    /// Remove and return the record for `key`. Undo is one-shot: callers
    /// take the handle before issuing the compensating request.
    pub fn take(&mut self, key: &K) -> Option<UndoHandle> {
        self.records.remove(key)
    }

    /// Drop every record.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Live records.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &UndoHandle)> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
