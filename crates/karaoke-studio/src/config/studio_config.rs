use crate::config::{default_bpm, default_countdown_enabled, default_countdown_from};

use serde::{Deserialize, Serialize};

/// Tempo and recording lead-in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudioConfig {
    /// Tempo the bar grid starts with.
    #[serde(default = "default_bpm")]
    pub default_bpm: f64,

    /// Whether a 3-2-1-GO countdown runs before recording.
    #[serde(default = "default_countdown_enabled")]
    pub countdown_enabled: bool,

    /// Number the countdown starts from.
    #[serde(default = "default_countdown_from")]
    pub countdown_from: u32,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            default_bpm: default_bpm(),
            countdown_enabled: default_countdown_enabled(),
            countdown_from: default_countdown_from(),
        }
    }
}
