//! Toast presentation configuration.

use serde::{Deserialize, Serialize};

/// Longest accepted toast timing, one day in milliseconds.
pub const MAX_DURATION_MS: u64 = 86_400_000;

/// Timing and stacking settings for toasts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToastConfig {
    /// Total lifetime of a toast that is not dismissed, in milliseconds.
    #[serde(default = "default_display")]
    pub display_ms: u64,
    /// Fade-out duration before a toast is removed, in milliseconds.
    #[serde(default = "default_fade")]
    pub fade_ms: u64,
    /// Vertical offset between stacked toasts, in pixels.
    #[serde(default = "default_offset")]
    pub stack_offset_px: u32,
    /// Z-index of the newest toast; older ones stack below.
    #[serde(default = "default_z_index")]
    pub base_z_index: i32,
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self {
            display_ms: default_display(),
            fade_ms: default_fade(),
            stack_offset_px: default_offset(),
            base_z_index: default_z_index(),
        }
    }
}

impl ToastConfig {
    /// Display time clamped to `1..=MAX_DURATION_MS`.
    pub fn effective_display_ms(&self) -> i64 {
        self.display_ms.clamp(1, MAX_DURATION_MS) as i64
    }

    /// Fade time, never longer than the display time.
    pub fn effective_fade_ms(&self) -> i64 {
        (self.fade_ms as i64).min(self.effective_display_ms())
    }
}

fn default_display() -> u64 {
    5000
}

fn default_fade() -> u64 {
    300
}

fn default_offset() -> u32 {
    10
}

fn default_z_index() -> i32 {
    50
}
