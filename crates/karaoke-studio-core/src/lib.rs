//! Karaoke Studio Core Library
//!
//! Waveform drawing, bar grid, track transport, camera recording and
//! clip/track synchronisation behind platform ports, with a CPAL + Rubato
//! audio output.
//!
//! # Example
//!
//! ```no_run
//! use karaoke_studio_core::{
//!     AudioTrack, CoreResult, StudioController, StudioDevices, StudioSettings,
//! };
//!
//! fn run(devices: StudioDevices, track: CoreResult<AudioTrack>) -> CoreResult<()> {
//!     let mut studio = StudioController::new(devices, StudioSettings::default());
//!
//!     studio.begin_track_load();
//!     studio.finish_track_load(track)?;
//!     studio.play()?;
//!     studio.request_recording()?;
//!     studio.stop_recording()?;
//!     Ok(())
//! }
//! ```

pub mod audio;
mod error;
pub mod host;
pub mod recorder;
pub mod studio;
pub mod sync;
mod track;
pub mod transport;
pub mod waveform;

pub use {
    error::Result as CoreResult,
    error::StudioError,
    recorder::{ClipUrl, RecordedClip},
    studio::{Controls, StudioController, StudioDevices, StudioSettings, StudioState},
    track::AudioTrack,
};

#[cfg(test)]
mod tests;
