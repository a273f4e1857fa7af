use crate::{
    AudioTrack, CoreResult,
    host::AudioOutput,
    transport::{FrameLoop, FrameRequest},
};

use tracing::{debug, info, instrument};

/// Playback position bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlaybackState {
    /// Offset playback (re)starts from, in seconds.
    pub offset: f64,
    /// Whether audio is currently running.
    pub is_playing: bool,
    /// Clock time the current run started, while playing.
    pub started_at: Option<f64>,
}

/// Outcome of one frame of the playhead task.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransportTick {
    /// Still running; playhead at this position.
    Running(f64),
    /// Reached the end of the track this frame.
    Ended,
    /// Not playing.
    Idle,
}

/// Play/stop/seek over a single output, with a cancellable playhead task.
#[derive(Debug, Default)]
pub struct Transport {
    state: PlaybackState,
    marker_visible: bool,
    frames: FrameLoop,
}

impl Transport {
    /// Empty, stopped transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the playback state.
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Whether audio is running.
    pub fn is_playing(&self) -> bool {
        self.state.is_playing
    }

    /// Stored offset in seconds.
    pub fn offset(&self) -> f64 {
        self.state.offset
    }

    /// Start playback from the stored offset.
    ///
    /// Returns `Ok(false)` without side effects when already playing.
    ///
    /// # Errors
    ///
    /// Propagates output failures; the transport stays stopped.
    #[track_caller]
    #[instrument(skip(self, track, output))]
    pub fn play(
        &mut self,
        track: &AudioTrack,
        output: &mut dyn AudioOutput,
        now: f64,
    ) -> CoreResult<bool> {
        if self.state.is_playing {
            debug!("Play ignored, already playing");
            return Ok(false);
        }

        let offset = self.state.offset.clamp(0.0, track.duration());
        output.start(track, offset)?;

        self.state = PlaybackState {
            offset,
            is_playing: true,
            started_at: Some(now),
        };
        self.marker_visible = true;
        self.frames.schedule();

        info!(offset, "Playback started");

        Ok(true)
    }

    /// Stop playback and rewind to zero, removing the playhead.
    #[instrument(skip(self, output))]
    pub fn stop(&mut self, output: &mut dyn AudioOutput) {
        if self.state.is_playing {
            output.stop();
            info!("Playback stopped");
        }
        self.frames.cancel();
        self.state = PlaybackState::default();
        self.marker_visible = false;
    }

    /// Stop playback but keep the playhead parked at `offset`.
    ///
    /// Used when another transport (the video pane) owns the position.
    #[instrument(skip(self, output))]
    pub fn park(&mut self, output: &mut dyn AudioOutput, offset: f64) {
        if self.state.is_playing {
            output.stop();
        }
        self.frames.cancel();
        self.state = PlaybackState {
            offset: offset.max(0.0),
            is_playing: false,
            started_at: None,
        };
        self.marker_visible = true;
    }

    /// Move to `seconds`, clamped to the track.
    ///
    /// While playing, the output restarts at the new offset. While stopped,
    /// only the stored offset and playhead move.
    #[track_caller]
    #[instrument(skip(self, track, output))]
    pub fn seek(
        &mut self,
        track: &AudioTrack,
        output: &mut dyn AudioOutput,
        seconds: f64,
        now: f64,
    ) -> CoreResult<()> {
        let target = seconds.clamp(0.0, track.duration());

        if self.state.is_playing {
            output.stop();
            self.frames.cancel();
            self.state.is_playing = false;
            self.state.started_at = None;
            self.state.offset = target;
            self.play(track, output, now)?;
        } else {
            self.state.offset = target;
            self.marker_visible = true;
        }

        debug!(target, playing = self.state.is_playing, "Seek applied");

        Ok(())
    }

    /// Current position in seconds.
    pub fn position(&self, now: f64) -> f64 {
        match self.state.started_at {
            Some(started_at) if self.state.is_playing => {
                self.state.offset + (now - started_at).max(0.0)
            }
            _ => self.state.offset,
        }
    }

    /// Playhead position, or `None` when the marker is hidden.
    pub fn playhead(&self, now: f64) -> Option<f64> {
        self.marker_visible.then(|| self.position(now))
    }

    /// Run one frame of the playhead task.
    pub fn tick(&mut self, duration: f64, now: f64) -> TransportTick {
        if self.frames.poll() == FrameRequest::Idle || !self.state.is_playing {
            return TransportTick::Idle;
        }

        let position = self.position(now);
        if position >= duration {
            TransportTick::Ended
        } else {
            TransportTick::Running(position)
        }
    }
}
