//! Keyboard shortcuts for the notification dropdown.

use crate::shared::SharedStore;

/// Element holding keyboard focus when a key was pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusTarget {
    #[default]
    Document,
    TextInput,
    TextArea,
    Select,
}

impl FocusTarget {
    fn is_editable(&self) -> bool {
        !matches!(self, Self::Document)
    }
}

/// A key press with its modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyChord {
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
    pub key: char,
    pub focus: FocusTarget,
}

impl KeyChord {
    /// Ctrl+Shift+`key` pressed with no field focused.
    pub fn ctrl_shift(key: char) -> Self {
        Self {
            ctrl: true,
            meta: false,
            shift: true,
            key,
            focus: FocusTarget::Document,
        }
    }

    /// Same chord, pressed while `focus` holds the keyboard.
    pub fn in_focus(mut self, focus: FocusTarget) -> Self {
        self.focus = focus;
        self
    }
}

/// Store operation bound to a shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    /// Ctrl/Cmd+Shift+N.
    ToggleDropdown,
    /// Ctrl/Cmd+Shift+M.
    MarkAllAsRead,
    /// Ctrl/Cmd+Shift+C.
    ClearAll,
}

impl ShortcutAction {
    /// Resolve a chord, ignoring presses inside editable fields.
    pub fn from_chord(chord: &KeyChord) -> Option<Self> {
        if chord.focus.is_editable() || !(chord.ctrl || chord.meta) || !chord.shift {
            return None;
        }
        match chord.key {
            'N' => Some(Self::ToggleDropdown),
            'M' => Some(Self::MarkAllAsRead),
            'C' => Some(Self::ClearAll),
            _ => None,
        }
    }

    /// Apply the action to the store.
    pub fn apply(&self, store: &SharedStore) {
        match self {
            Self::ToggleDropdown => {
                store.toggle_dropdown();
            }
            Self::MarkAllAsRead => store.mark_all_as_read(),
            Self::ClearAll => store.clear_all(),
        }
    }
}
