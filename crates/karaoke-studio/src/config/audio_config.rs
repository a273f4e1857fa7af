use serde::{Deserialize, Serialize};

/// Audio output configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Selected output device name (None = default device).
    #[serde(default)]
    pub selected_device: Option<String>,
}
