use crate::config::{default_bars_per_gridline, default_waveform_height};

use serde::{Deserialize, Serialize};

/// Waveform panel layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveformConfig {
    /// Panel height in logical pixels.
    #[serde(default = "default_waveform_height")]
    pub height: f32,

    /// Bars between labelled gridlines.
    #[serde(default = "default_bars_per_gridline")]
    pub bars_per_gridline: u32,
}

impl Default for WaveformConfig {
    fn default() -> Self {
        Self {
            height: default_waveform_height(),
            bars_per_gridline: default_bars_per_gridline(),
        }
    }
}
