//! Audio transport and the cooperative playhead task.

mod cancel;
mod clock;
#[allow(clippy::module_inception)]
mod transport;

pub use {
    cancel::{CancelToken, FrameLoop, FrameRequest},
    clock::{Clock, MonotonicClock},
    transport::{PlaybackState, Transport, TransportTick},
};
