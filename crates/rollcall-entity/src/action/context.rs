//! Context keys for the undo ledger.

use std::fmt::Debug;
use std::hash::Hash;

/// Key under which an undoable action is tracked.
///
/// Every key belongs to a scope (the selected date for attendance). When
/// the working scope changes, all records of other scopes are dropped.
pub trait ContextKey: Clone + Eq + Hash + Debug {
    /// The scope type.
    type Scope: Clone + Eq + Debug;

    /// The scope this key belongs to.
    fn scope(&self) -> Self::Scope;
}

/// Single-slot key for global actions such as bulk upload or promotion.
impl ContextKey for () {
    type Scope = ();

    fn scope(&self) -> Self::Scope {}
}
