use crate::recorder::{Countdown, RecIndicator};

use uuid::Uuid;

/// What the studio is doing right now.
///
/// Exactly one variant is live, so playback and recording can never both
/// animate the playhead.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StudioState {
    /// Nothing running.
    Idle,
    /// The track plays on its own.
    Playing,
    /// Camera is open and the lead-in is counting down.
    Countdown(Countdown),
    /// Camera chunks are captured while the track plays from zero.
    Recording {
        /// Session id for log correlation.
        session_id: Uuid,
        /// Blinking indicator.
        indicator: RecIndicator,
    },
    /// The recorded clip plays and drives the track.
    SlavePlaying,
}

impl StudioState {
    /// Whether the camera is in use.
    pub fn is_capturing(&self) -> bool {
        matches!(self, StudioState::Countdown(_) | StudioState::Recording { .. })
    }

    /// Whether audio is running.
    pub fn is_playing(&self) -> bool {
        matches!(
            self,
            StudioState::Playing | StudioState::Recording { .. } | StudioState::SlavePlaying
        )
    }
}

/// Which transport controls accept input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Controls {
    /// Choose a new audio file.
    pub load: bool,
    /// Start playback.
    pub play: bool,
    /// Stop playback, recording or countdown.
    pub stop: bool,
    /// Start a recording.
    pub record: bool,
    /// Edit the tempo.
    pub tempo: bool,
}

impl Controls {
    /// Derive control enablement from the studio state.
    pub fn for_state(state: &StudioState, track_loaded: bool, loading: bool) -> Self {
        if loading {
            return Self::default();
        }
        if !track_loaded {
            return Self {
                load: true,
                ..Self::default()
            };
        }

        match state {
            StudioState::Idle => Self {
                load: true,
                play: true,
                stop: false,
                record: true,
                tempo: true,
            },
            StudioState::Playing | StudioState::SlavePlaying => Self {
                load: false,
                play: false,
                stop: true,
                record: false,
                tempo: true,
            },
            StudioState::Countdown(_) | StudioState::Recording { .. } => Self {
                stop: true,
                ..Self::default()
            },
        }
    }
}
