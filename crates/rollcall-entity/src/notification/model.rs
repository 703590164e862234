//! Notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use rollcall_core::types::NotificationId;

use super::kind::NotificationKind;

/// A notification held by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Unique notification identifier.
    pub id: NotificationId,
    /// Severity.
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    /// Short headline.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Creation instant.
    pub timestamp: DateTime<Utc>,
    /// Whether the user has read this notification.
    pub read: bool,
    /// Where the action affordance navigates to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_url: Option<String>,
    /// Label of the action affordance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_text: Option<String>,
    /// Free-form data attached by the caller; opaque to the store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
    /// Only `Some(true)` makes the notification eligible for a toast.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_as_toast: Option<bool>,
}

impl Notification {
    /// Build a full notification from a draft.
    pub fn from_draft(draft: NotificationDraft, id: NotificationId, now: DateTime<Utc>) -> Self {
        Self {
            id,
            kind: draft.kind,
            title: draft.title,
            message: draft.message,
            timestamp: now,
            read: false,
            action_url: draft.action_url,
            action_text: draft.action_text,
            metadata: draft.metadata,
            show_as_toast: draft.show_as_toast,
        }
    }

    /// Check if the notification has not been read.
    pub fn is_unread(&self) -> bool {
        !self.read
    }

    /// Check if the notification opted in to toast presentation.
    pub fn wants_toast(&self) -> bool {
        self.show_as_toast == Some(true)
    }

    /// The action affordance, when both the url and the label are present.
    pub fn action(&self) -> Option<(&str, &str)> {
        match (&self.action_url, &self.action_text) {
            (Some(url), Some(text)) => Some((url.as_str(), text.as_str())),
            _ => None,
        }
    }
}

/// Caller-supplied part of a notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationDraft {
    /// Severity.
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    /// Short headline.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Where the action affordance navigates to.
    #[serde(default)]
    pub action_url: Option<String>,
    /// Label of the action affordance.
    #[serde(default)]
    pub action_text: Option<String>,
    /// Free-form attached data.
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
    /// Toast opt-in.
    #[serde(default)]
    pub show_as_toast: Option<bool>,
}

impl NotificationDraft {
    /// Start a draft with the mandatory fields.
    pub fn new(kind: NotificationKind, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            message: message.into(),
            action_url: None,
            action_text: None,
            metadata: None,
            show_as_toast: None,
        }
    }

    /// Attach a navigational affordance.
    pub fn with_action(mut self, url: impl Into<String>, text: impl Into<String>) -> Self {
        self.action_url = Some(url.into());
        self.action_text = Some(text.into());
        self
    }

    /// Attach free-form metadata.
    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Set the toast opt-in flag explicitly.
    pub fn with_toast(mut self, show: bool) -> Self {
        self.show_as_toast = Some(show);
        self
    }
}
