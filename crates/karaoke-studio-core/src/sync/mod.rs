//! Keeps the audio offset and the recorded clip's position aligned.

mod position_bus;

pub use position_bus::{ECHO_TOLERANCE_SECONDS, PositionBus, PositionSource};

/// Which surface owns the playback position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncMode {
    /// Audio plays on its own; there is no clip to follow.
    #[default]
    Independent,
    /// A recorded clip exists and the video pane drives the audio offset.
    VideoSlave,
}
