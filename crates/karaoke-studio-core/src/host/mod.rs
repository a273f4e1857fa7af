//! Ports to the platform: audio, camera, video, clip storage and alerts.
//!
//! The studio logic only talks to these traits. The application crate
//! provides native implementations; tests provide recording fakes.

use crate::{AudioTrack, ClipUrl, CoreResult, RecordedClip};

/// Plays a decoded track from an offset.
pub trait AudioOutput {
    /// Begin audible playback of `track` at `offset` seconds.
    ///
    /// Any playback already running is replaced.
    fn start(&mut self, track: &AudioTrack, offset: f64) -> CoreResult<()>;

    /// Halt playback. Safe to call when nothing plays.
    fn stop(&mut self);

    /// Returns `true` once after playback reached the end of the track.
    fn poll_ended(&mut self) -> bool;
}

/// Turns raw file bytes into PCM.
///
/// Decoding may run off the UI thread.
pub trait TrackDecoder: Send + Sync {
    /// Decode `bytes`; `name` is used for display and logs.
    fn decode(&self, name: &str, bytes: &[u8]) -> CoreResult<AudioTrack>;
}

/// Camera capture producing encoded video chunks.
pub trait CaptureDevice {
    /// Whether encoded video capture is available at all.
    fn is_supported(&self) -> bool;

    /// Open the camera and start the live preview.
    ///
    /// Returns `PermissionDenied` when the device cannot be opened.
    fn request_access(&mut self) -> CoreResult<()>;

    /// Start producing encoded chunks.
    fn start_capture(&mut self) -> CoreResult<()>;

    /// Chunks produced since the last call, oldest first.
    fn drain_chunks(&mut self) -> Vec<Vec<u8>>;

    /// Stop encoding and return any trailing chunks.
    fn stop_capture(&mut self) -> Vec<Vec<u8>>;

    /// Close the device and stop every underlying track.
    fn release(&mut self);
}

/// The video pane: shows either the live camera feed or a recorded clip.
pub trait VideoSurface {
    /// Route the live camera feed to the pane, dropping any loaded clip.
    fn show_live_feed(&mut self);

    /// Load a recorded clip, replacing the live feed.
    fn load_clip(&mut self, url: &ClipUrl) -> CoreResult<()>;

    /// Show nothing.
    fn clear(&mut self);

    /// Start clip playback.
    fn play(&mut self);

    /// Pause clip playback.
    fn pause(&mut self);

    /// Move the clip to `seconds`.
    fn seek(&mut self, seconds: f64);

    /// Current clip position in seconds.
    fn position(&self) -> f64;

    /// Returns `true` once after the clip played to its end.
    fn poll_ended(&mut self) -> bool;

    /// Whether [`seek`](Self::seek) comes back to the studio as a position
    /// notification.
    fn reports_seeks(&self) -> bool {
        false
    }
}

/// Gives recorded clips a temporary address the video pane can load.
pub trait ClipStore {
    /// Store `clip` and return its address.
    fn publish(&mut self, clip: &RecordedClip) -> CoreResult<ClipUrl>;

    /// Release the resources behind `url`. Unknown urls are ignored.
    fn revoke(&mut self, url: &ClipUrl);
}

/// Blocking, user-visible notification.
pub trait Notifier {
    /// Show `message` and return once the user dismissed it.
    fn alert(&mut self, message: &str);
}
