mod audio_config;
mod camera_config;
#[allow(clippy::module_inception)]
mod config;
mod studio_config;
mod waveform_config;

pub(crate) use {
    audio_config::AudioConfig, camera_config::CameraConfig, config::Config,
    studio_config::StudioConfig, waveform_config::WaveformConfig,
};

pub(crate) const DEFAULT_COUNTDOWN_ENABLED: bool = true;
pub(crate) const DEFAULT_COUNTDOWN_FROM: u32 = 3;
pub(crate) const MAX_COUNTDOWN_FROM: u32 = 10;
pub(crate) const DEFAULT_WAVEFORM_HEIGHT: f32 = 160.0;
pub(crate) const DEFAULT_CAMERA_SOURCE: &str = "autovideosrc";
pub(crate) const DEFAULT_CAMERA_WIDTH: u32 = 640;
pub(crate) const DEFAULT_CAMERA_HEIGHT: u32 = 480;
pub(crate) const DEFAULT_CAMERA_FRAMERATE: u32 = 30;
pub(crate) const DEFAULT_CAMERA_AUDIO_SOURCE: &str = "autoaudiosrc";

pub(crate) fn default_bpm() -> f64 {
    karaoke_studio_core::waveform::DEFAULT_BPM
}

pub(crate) fn default_countdown_enabled() -> bool {
    DEFAULT_COUNTDOWN_ENABLED
}

pub(crate) fn default_countdown_from() -> u32 {
    DEFAULT_COUNTDOWN_FROM
}

pub(crate) fn default_waveform_height() -> f32 {
    DEFAULT_WAVEFORM_HEIGHT
}

pub(crate) fn default_bars_per_gridline() -> u32 {
    karaoke_studio_core::waveform::DEFAULT_BARS_PER_GRIDLINE
}

pub(crate) fn default_camera_source() -> String {
    DEFAULT_CAMERA_SOURCE.to_string()
}

pub(crate) fn default_camera_width() -> u32 {
    DEFAULT_CAMERA_WIDTH
}

pub(crate) fn default_camera_height() -> u32 {
    DEFAULT_CAMERA_HEIGHT
}

pub(crate) fn default_camera_framerate() -> u32 {
    DEFAULT_CAMERA_FRAMERATE
}

pub(crate) fn default_camera_audio_source() -> String {
    DEFAULT_CAMERA_AUDIO_SOURCE.to_string()
}
