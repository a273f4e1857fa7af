use crate::{
    host::{AudioOutput, CaptureDevice, ClipStore, Notifier, VideoSurface},
    transport::Clock,
};

/// Platform ports the studio drives.
pub struct StudioDevices {
    /// Track playback.
    pub audio: Box<dyn AudioOutput>,
    /// Camera capture.
    pub camera: Box<dyn CaptureDevice>,
    /// Video pane.
    pub video: Box<dyn VideoSurface>,
    /// Temporary clip addresses.
    pub clips: Box<dyn ClipStore>,
    /// Blocking alerts.
    pub notifier: Box<dyn Notifier>,
    /// Monotonic time.
    pub clock: Box<dyn Clock>,
}

impl std::fmt::Debug for StudioDevices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StudioDevices").finish_non_exhaustive()
    }
}

/// User-adjustable studio behaviour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StudioSettings {
    /// Tempo used for the bar grid.
    pub bpm: f64,
    /// Bars between labelled gridlines.
    pub bars_per_gridline: u32,
    /// Whether a countdown precedes recording.
    pub countdown_enabled: bool,
    /// Number the countdown starts from.
    pub countdown_from: u32,
}

impl Default for StudioSettings {
    fn default() -> Self {
        Self {
            bpm: crate::waveform::DEFAULT_BPM,
            bars_per_gridline: crate::waveform::DEFAULT_BARS_PER_GRIDLINE,
            countdown_enabled: true,
            countdown_from: 3,
        }
    }
}
