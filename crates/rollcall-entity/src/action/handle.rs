//! What the ledger remembers about an undoable action.

use serde::{Deserialize, Serialize};

use rollcall_core::types::ActionId;

/// How an action recorded in the ledger can be reversed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "state", content = "actionId", rename_all = "snake_case")]
pub enum UndoHandle {
    /// The server issued a token for this action.
    Tracked(ActionId),
    /// The action is known to have happened but no token exists for it
    /// (it was discovered from a listing, not performed in this session).
    /// Reversal goes through the plain delete-by-identity endpoint.
    NoActionAvailable,
}

impl UndoHandle {
    /// Build a handle from an optional server token.
    pub fn from_response(action_id: Option<ActionId>) -> Self {
        match action_id {
            Some(id) => Self::Tracked(id),
            None => Self::NoActionAvailable,
        }
    }

    /// The server token, if one exists.
    pub fn action_id(&self) -> Option<&ActionId> {
        match self {
            Self::Tracked(id) => Some(id),
            Self::NoActionAvailable => None,
        }
    }
}
