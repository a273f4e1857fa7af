//! Camera recording synchronised with the backing track.

mod countdown;
#[allow(clippy::module_inception)]
mod recorder;
mod session;

pub use {
    countdown::{Countdown, CountdownStep, GO_SECONDS, RecIndicator, STEP_SECONDS},
    recorder::{PublishedClip, Recorder},
    session::{CLIP_MIME_TYPE, ClipUrl, RecordedClip, RecordingSession},
};
