//! Undoable action entities.

pub mod context;
pub mod handle;
pub mod kind;

pub use context::ContextKey;
pub use handle::UndoHandle;
pub use kind::ActionKind;
