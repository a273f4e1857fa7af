use crate::config::{
    default_camera_audio_source, default_camera_framerate, default_camera_height,
    default_camera_source, default_camera_width,
};

use serde::{Deserialize, Serialize};

/// Camera capture settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    /// GStreamer source element, e.g. `autovideosrc` or `v4l2src device=/dev/video1`.
    #[serde(default = "default_camera_source")]
    pub source: String,

    /// Capture width in pixels.
    #[serde(default = "default_camera_width")]
    pub width: u32,

    /// Capture height in pixels.
    #[serde(default = "default_camera_height")]
    pub height: u32,

    /// Capture frames per second.
    #[serde(default = "default_camera_framerate")]
    pub framerate: u32,

    /// GStreamer microphone element muxed into recordings. Empty records video only.
    #[serde(default = "default_camera_audio_source")]
    pub audio_source: String,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            source: default_camera_source(),
            width: default_camera_width(),
            height: default_camera_height(),
            framerate: default_camera_framerate(),
            audio_source: default_camera_audio_source(),
        }
    }
}
