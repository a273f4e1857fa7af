use crate::{
    AudioTrack, CoreResult, StudioError,
    host::TrackDecoder,
    recorder::{ClipUrl, Countdown, CountdownStep, RecIndicator, Recorder},
    studio::{Controls, StudioDevices, StudioSettings, StudioState},
    sync::{PositionBus, PositionSource, SyncMode},
    transport::{FrameRequest, Transport, TransportTick},
    waveform::{BarGrid, SurfaceSize, WaveformScene, validate_bpm},
};

use std::panic::Location;

use error_location::ErrorLocation;
use tracing::{debug, error, info, instrument, warn};

/// Coordinates waveform, transport, recorder and video sync.
///
/// All mutation goes through this type on the UI thread. The host calls
/// [`tick`](Self::tick) once per display frame and keeps requesting frames
/// while it returns [`FrameRequest::Continue`].
#[derive(Debug)]
pub struct StudioController {
    devices: StudioDevices,
    settings: StudioSettings,
    track: Option<AudioTrack>,
    loading: bool,
    state: StudioState,
    sync_mode: SyncMode,
    transport: Transport,
    recorder: Recorder,
    bus: PositionBus,
    surface: Option<SurfaceSize>,
    scene: Option<WaveformScene>,
}

impl StudioController {
    /// Idle studio with no track.
    pub fn new(devices: StudioDevices, settings: StudioSettings) -> Self {
        Self {
            devices,
            settings,
            track: None,
            loading: false,
            state: StudioState::Idle,
            sync_mode: SyncMode::Independent,
            transport: Transport::new(),
            recorder: Recorder::new(),
            bus: PositionBus::new(),
            surface: None,
            scene: None,
        }
    }

    // -------------------------------
    // MARK: Accessors
    // -------------------------------

    /// Current state.
    pub fn state(&self) -> StudioState {
        self.state
    }

    /// Current sync mode.
    pub fn sync_mode(&self) -> SyncMode {
        self.sync_mode
    }

    /// Active settings.
    pub fn settings(&self) -> &StudioSettings {
        &self.settings
    }

    /// Loaded track, if any.
    pub fn track(&self) -> Option<&AudioTrack> {
        self.track.as_ref()
    }

    /// Whether a decode is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Transport state.
    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    /// Recorder state.
    pub fn recorder(&self) -> &Recorder {
        &self.recorder
    }

    /// Address of the current clip.
    pub fn clip_url(&self) -> Option<&ClipUrl> {
        self.recorder.clip().map(|c| c.url())
    }

    /// The last built waveform picture.
    pub fn scene(&self) -> Option<&WaveformScene> {
        self.scene.as_ref()
    }

    /// Enabled controls for the current state.
    pub fn controls(&self) -> Controls {
        let mut controls = Controls::for_state(&self.state, self.track.is_some(), self.loading);
        if !self.devices.camera.is_supported() {
            controls.record = false;
        }
        controls
    }

    /// Playhead x position on a surface `width` wide, or `None` when hidden.
    pub fn playhead_x(&self, width: f32) -> Option<f32> {
        let track = self.track.as_ref()?;
        let duration = track.duration();
        if duration <= 0.0 {
            return None;
        }
        let position = self.transport.playhead(self.devices.clock.now())?;
        Some((position.min(duration) / duration * f64::from(width)) as f32)
    }

    /// Countdown overlay text, while counting down.
    pub fn countdown_step(&self) -> Option<CountdownStep> {
        match self.state {
            StudioState::Countdown(countdown) => countdown.step_at(self.devices.clock.now()),
            _ => None,
        }
    }

    /// Whether the blinking recording indicator is lit.
    pub fn rec_indicator_visible(&self) -> bool {
        match self.state {
            StudioState::Recording { indicator, .. } => {
                indicator.is_visible(self.devices.clock.now())
            }
            _ => false,
        }
    }

    /// Current clip position, in video-slave mode while the clip is on screen.
    pub fn video_position(&self) -> Option<f64> {
        let clip_on_screen = self.sync_mode == SyncMode::VideoSlave && !self.state.is_capturing();
        clip_on_screen.then(|| self.devices.video.position())
    }

    // -------------------------------
    // MARK: Track loading
    // -------------------------------

    /// Mark a decode as started: stop everything and disable controls.
    #[instrument(skip(self))]
    pub fn begin_track_load(&mut self) {
        if let Err(e) = self.stop() {
            warn!(error = ?e, "Stopping before load failed");
        }
        self.loading = true;
    }

    /// Accept the result of a decode started with [`begin_track_load`](Self::begin_track_load).
    ///
    /// A new track replaces the old one wholesale, drops any clip recorded
    /// over the old one and rebuilds the waveform. A failure clears the
    /// previous track, alerts the user and leaves playback disabled.
    #[instrument(skip(self, result))]
    pub fn finish_track_load(&mut self, result: CoreResult<AudioTrack>) -> CoreResult<()> {
        self.halt();
        self.loading = false;
        self.recorder
            .discard_clip(self.devices.clips.as_mut());
        self.devices.video.clear();
        self.sync_mode = SyncMode::Independent;
        self.transport = Transport::new();

        match result {
            Ok(track) => {
                info!(
                    track = track.name(),
                    duration_secs = track.duration(),
                    channels = track.channel_count(),
                    sample_rate = track.sample_rate(),
                    "Track loaded"
                );
                self.track = Some(track);
                self.rebuild_scene();
                Ok(())
            }
            Err(e) => {
                error!(error = ?e, "Track failed to load");
                self.track = None;
                self.scene = None;
                self.devices.notifier.alert(&e.user_message());
                Err(e)
            }
        }
    }

    /// Decode `bytes` on the calling thread and load the result.
    pub fn load_track_bytes(
        &mut self,
        decoder: &dyn TrackDecoder,
        name: &str,
        bytes: &[u8],
    ) -> CoreResult<()> {
        self.begin_track_load();
        let result = decoder.decode(name, bytes);
        self.finish_track_load(result)
    }

    // -------------------------------
    // MARK: Waveform
    // -------------------------------

    /// Change the tempo and redraw the grid.
    ///
    /// # Errors
    ///
    /// `InvalidTempo` for non-finite or non-positive values; nothing changes.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn set_bpm(&mut self, bpm: f64) -> CoreResult<()> {
        let bpm = validate_bpm(bpm)?;
        if (self.settings.bpm - bpm).abs() > f64::EPSILON {
            self.settings.bpm = bpm;
            self.rebuild_scene();
            debug!(bpm, "Tempo changed");
        }
        Ok(())
    }

    /// Tell the studio the drawing surface size. Rebuilds the scene on change.
    pub fn resize(&mut self, size: SurfaceSize) {
        if self.surface != Some(size) {
            self.surface = Some(size);
            self.rebuild_scene();
        }
    }

    fn rebuild_scene(&mut self) {
        self.scene = match (&self.track, self.surface) {
            (Some(track), Some(size)) => {
                let grid = BarGrid::new(
                    track.duration(),
                    self.settings.bpm,
                    self.settings.bars_per_gridline,
                );
                Some(WaveformScene::build(track, &grid, size))
            }
            _ => None,
        };
    }

    // -------------------------------
    // MARK: Transport
    // -------------------------------

    /// Start playback from the stored offset.
    ///
    /// No-op when already playing, counting down, recording or with no track.
    /// With a recorded clip the clip plays too and leads the audio.
    #[instrument(skip(self))]
    pub fn play(&mut self) -> CoreResult<()> {
        if self.state != StudioState::Idle {
            debug!(state = ?self.state, "Play ignored");
            return Ok(());
        }
        if self.track.is_none() {
            debug!("Play ignored, no track");
            return Ok(());
        }

        let slave = self.sync_mode == SyncMode::VideoSlave;
        if slave {
            self.push_video_seek(self.transport.offset());
        }

        let Some(track) = self.track.as_ref() else {
            return Ok(());
        };
        let now = self.devices.clock.now();
        self.transport
            .play(track, self.devices.audio.as_mut(), now)
            .inspect_err(|e| self.devices.notifier.alert(&e.user_message()))?;

        if slave {
            self.devices.video.play();
            self.state = StudioState::SlavePlaying;
        } else {
            self.state = StudioState::Playing;
        }

        Ok(())
    }

    /// Stop whatever is running.
    ///
    /// Playback rewinds to zero and the playhead is removed. During a
    /// recording this finishes the recording; during the countdown it
    /// cancels it.
    #[instrument(skip(self))]
    pub fn stop(&mut self) -> CoreResult<()> {
        match self.state {
            StudioState::Recording { .. } => self.stop_recording(),
            StudioState::Countdown(_) => {
                self.cancel_countdown();
                Ok(())
            }
            StudioState::Playing | StudioState::SlavePlaying | StudioState::Idle => {
                self.halt();
                Ok(())
            }
        }
    }

    /// Seek to `seconds` from a waveform gesture.
    ///
    /// Ignored while counting down or recording. With a recorded clip the
    /// clip follows.
    #[instrument(skip(self))]
    pub fn seek(&mut self, seconds: f64) -> CoreResult<()> {
        if self.state.is_capturing() {
            debug!("Seek ignored while capturing");
            return Ok(());
        }
        let Some(track) = self.track.as_ref() else {
            return Ok(());
        };
        if !self.bus.begin(PositionSource::Waveform, seconds) {
            return Ok(());
        }

        let now = self.devices.clock.now();
        let result = self
            .transport
            .seek(track, self.devices.audio.as_mut(), seconds, now);

        if result.is_ok() && self.sync_mode == SyncMode::VideoSlave {
            let target = self.transport.offset();
            self.push_video_seek(target);
        }
        if result.is_err() && self.state.is_playing() {
            // restart failed, the audio is gone
            if self.state == StudioState::SlavePlaying {
                self.devices.video.pause();
            }
            self.state = StudioState::Idle;
        }

        self.bus.end();
        result
    }

    /// Seek from a click at `x` on a waveform `width` wide.
    pub fn seek_to_x(&mut self, x: f32, width: f32) -> CoreResult<()> {
        let Some(duration) = self.track.as_ref().map(AudioTrack::duration) else {
            return Ok(());
        };
        if width <= 0.0 {
            return Ok(());
        }
        let fraction = f64::from((x / width).clamp(0.0, 1.0));
        self.seek(fraction * duration)
    }

    // -------------------------------
    // MARK: Video gestures
    // -------------------------------

    /// Move the clip on the studio's behalf, expecting its echo only from
    /// panes that report programmatic seeks.
    fn push_video_seek(&mut self, seconds: f64) {
        self.devices.video.seek(seconds);
        if self.devices.video.reports_seeks() {
            self.bus.expect_echo(PositionSource::Video, seconds);
        }
    }

    /// The user scrubbed the video pane to `seconds`.
    ///
    /// Ignored outside video-slave mode and while the pane shows the live
    /// feed for a countdown or recording.
    #[instrument(skip(self))]
    pub fn on_video_seek(&mut self, seconds: f64) -> CoreResult<()> {
        if self.sync_mode != SyncMode::VideoSlave || self.state.is_capturing() {
            return Ok(());
        }
        let Some(track) = self.track.as_ref() else {
            return Ok(());
        };
        if !self.bus.begin(PositionSource::Video, seconds) {
            return Ok(());
        }

        self.devices.video.seek(seconds);
        let now = self.devices.clock.now();
        let result = self
            .transport
            .seek(track, self.devices.audio.as_mut(), seconds, now);
        if result.is_err() && self.state == StudioState::SlavePlaying {
            self.devices.video.pause();
            self.state = StudioState::Idle;
        }

        self.bus.end();
        result
    }

    /// The user pressed play on the video pane.
    #[instrument(skip(self))]
    pub fn on_video_play(&mut self) -> CoreResult<()> {
        if self.sync_mode != SyncMode::VideoSlave || self.state != StudioState::Idle {
            return Ok(());
        }
        let Some(track) = self.track.as_ref() else {
            return Ok(());
        };

        self.bus.clear_echo();
        let position = self.devices.video.position();
        let now = self.devices.clock.now();
        self.transport
            .seek(track, self.devices.audio.as_mut(), position, now)?;
        self.transport
            .play(track, self.devices.audio.as_mut(), now)
            .inspect_err(|e| self.devices.notifier.alert(&e.user_message()))?;
        self.devices.video.play();
        self.state = StudioState::SlavePlaying;

        Ok(())
    }

    /// The user paused the video pane. Audio stops at the clip position.
    #[instrument(skip(self))]
    pub fn on_video_pause(&mut self) {
        if self.state != StudioState::SlavePlaying {
            return;
        }
        self.devices.video.pause();
        self.bus.clear_echo();
        let position = self.devices.video.position();
        self.transport.park(self.devices.audio.as_mut(), position);
        self.state = StudioState::Idle;
    }

    // -------------------------------
    // MARK: Recording
    // -------------------------------

    /// Ask for the camera and start the lead-in to a recording.
    ///
    /// # Errors
    ///
    /// `NoTrackLoaded` without asking for the camera; `CapabilityMissing`
    /// and `PermissionDenied` after alerting the user. State is unchanged
    /// on every error.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn request_recording(&mut self) -> CoreResult<()> {
        if self.track.is_none() {
            return Err(StudioError::NoTrackLoaded {
                location: ErrorLocation::from(Location::caller()),
            });
        }
        if self.state.is_capturing() || self.loading {
            debug!("Recording request ignored");
            return Ok(());
        }

        if let Err(e) = self.recorder.acquire(self.devices.camera.as_mut()) {
            warn!(error = ?e, "Camera unavailable");
            self.devices.notifier.alert(&e.user_message());
            return Err(e);
        }

        self.halt();
        self.devices.video.show_live_feed();

        let now = self.devices.clock.now();
        if self.settings.countdown_enabled {
            self.state = StudioState::Countdown(Countdown::new(self.settings.countdown_from, now));
            info!(from = self.settings.countdown_from, "Countdown started");
            Ok(())
        } else {
            self.begin_recording()
        }
    }

    fn begin_recording(&mut self) -> CoreResult<()> {
        let Some(track) = self.track.as_ref() else {
            self.cancel_countdown();
            return Err(StudioError::NoTrackLoaded {
                location: ErrorLocation::from(Location::caller()),
            });
        };

        let now = self.devices.clock.now();
        let session_id = match self.recorder.begin(
            self.devices.camera.as_mut(),
            self.devices.clips.as_mut(),
            now,
        ) {
            Ok(id) => id,
            Err(e) => {
                // the previous clip is already gone
                error!(error = ?e, "Recording failed to start");
                self.devices.video.clear();
                self.sync_mode = SyncMode::Independent;
                self.state = StudioState::Idle;
                self.devices.notifier.alert(&e.user_message());
                return Err(e);
            }
        };

        self.sync_mode = SyncMode::Independent;
        self.transport.stop(self.devices.audio.as_mut());
        if let Err(e) = self.transport.play(track, self.devices.audio.as_mut(), now) {
            error!(session_id = %session_id, error = ?e, "Backing track failed to start");
            self.recorder.abort(self.devices.camera.as_mut());
            self.devices.video.clear();
            self.state = StudioState::Idle;
            self.devices.notifier.alert(&e.user_message());
            return Err(e);
        }

        self.state = StudioState::Recording {
            session_id,
            indicator: RecIndicator::new(now),
        };

        Ok(())
    }

    /// Finish the recording and load the clip into the video pane.
    ///
    /// No-op when not recording; cancels a running countdown.
    #[instrument(skip(self))]
    pub fn stop_recording(&mut self) -> CoreResult<()> {
        let session_id = match self.state {
            StudioState::Recording { session_id, .. } => session_id,
            StudioState::Countdown(_) => {
                self.cancel_countdown();
                return Ok(());
            }
            _ => {
                debug!("Stop recording ignored, not recording");
                return Ok(());
            }
        };

        self.recorder.collect(self.devices.camera.as_mut());
        self.transport.stop(self.devices.audio.as_mut());
        self.state = StudioState::Idle;

        let published = self
            .recorder
            .finish(self.devices.camera.as_mut(), self.devices.clips.as_mut());

        let url = match published {
            Ok(Some(published)) => published.url().clone(),
            Ok(None) => return Ok(()),
            Err(e) => {
                error!(session_id = %session_id, error = ?e, "Clip could not be published");
                self.devices.video.clear();
                self.devices.notifier.alert(&e.user_message());
                return Err(e);
            }
        };

        if let Err(e) = self.devices.video.load_clip(&url) {
            error!(session_id = %session_id, error = ?e, "Clip could not be loaded");
            self.recorder.discard_clip(self.devices.clips.as_mut());
            self.devices.video.clear();
            self.devices.notifier.alert(&e.user_message());
            return Err(e);
        }

        self.sync_mode = SyncMode::VideoSlave;
        info!(session_id = %session_id, url = %url, "Clip ready for playback");

        Ok(())
    }

    fn cancel_countdown(&mut self) {
        self.recorder.release_camera(self.devices.camera.as_mut());
        self.state = StudioState::Idle;

        let restore = self.recorder.clip().map(|c| c.url().clone());
        match restore {
            Some(url) => {
                if let Err(e) = self.devices.video.load_clip(&url) {
                    warn!(error = ?e, "Previous clip could not be restored");
                    self.devices.video.clear();
                }
            }
            None => self.devices.video.clear(),
        }

        info!("Countdown cancelled");
    }

    // -------------------------------
    // MARK: Frames & lifecycle
    // -------------------------------

    /// Run one display frame: advance the countdown, collect camera chunks,
    /// move the playhead and detect the end of the track.
    pub fn tick(&mut self) -> FrameRequest {
        let now = self.devices.clock.now();

        match self.state {
            StudioState::Idle => FrameRequest::Idle,
            StudioState::Countdown(countdown) => {
                if countdown.is_finished(now) {
                    let _ = self.begin_recording();
                }
                FrameRequest::Continue
            }
            StudioState::Recording { .. } => {
                self.recorder.collect(self.devices.camera.as_mut());
                if self.track_ended(now) {
                    info!("Track ended, finishing recording");
                    let _ = self.stop_recording();
                    return FrameRequest::Idle;
                }
                FrameRequest::Continue
            }
            StudioState::Playing => {
                if self.track_ended(now) {
                    self.halt();
                    return FrameRequest::Idle;
                }
                FrameRequest::Continue
            }
            StudioState::SlavePlaying => {
                let video_ended = self.devices.video.poll_ended();
                if video_ended || self.track_ended(now) {
                    self.devices.video.pause();
                    let position = self.devices.video.position();
                    self.transport.park(self.devices.audio.as_mut(), position);
                    self.state = StudioState::Idle;
                    return FrameRequest::Idle;
                }
                FrameRequest::Continue
            }
        }
    }

    fn track_ended(&mut self, now: f64) -> bool {
        let duration = self.track.as_ref().map_or(0.0, AudioTrack::duration);
        let output_ended = self.devices.audio.poll_ended();
        output_ended || self.transport.tick(duration, now) == TransportTick::Ended
    }

    /// Stop audio and clip playback and return to idle. Capture is untouched.
    fn halt(&mut self) {
        if self.state == StudioState::SlavePlaying {
            self.devices.video.pause();
        }
        if self.sync_mode == SyncMode::VideoSlave {
            self.devices.video.seek(0.0);
        }
        self.bus.clear_echo();
        self.transport.stop(self.devices.audio.as_mut());
        if !self.state.is_capturing() {
            self.state = StudioState::Idle;
        }
    }

    /// Release the camera, stop playback and revoke the clip.
    #[instrument(skip(self))]
    pub fn shutdown(&mut self) {
        self.transport.stop(self.devices.audio.as_mut());
        self.recorder
            .shutdown(self.devices.camera.as_mut(), self.devices.clips.as_mut());
        self.devices.video.clear();
        self.state = StudioState::Idle;
        info!("Studio shut down");
    }
}
