use crate::{
    CoreResult, StudioError,
    host::{CaptureDevice, ClipStore},
    recorder::{ClipUrl, RecordedClip, RecordingSession},
};

use std::panic::Location;

use error_location::ErrorLocation;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// A finished clip together with the address it was published under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedClip {
    clip: RecordedClip,
    url: ClipUrl,
}

impl PublishedClip {
    /// The recorded clip.
    pub fn clip(&self) -> &RecordedClip {
        &self.clip
    }

    /// Temporary address of the clip.
    pub fn url(&self) -> &ClipUrl {
        &self.url
    }
}

/// Owns the camera while recording and the single live clip afterwards.
///
/// The camera is released exactly once per acquisition and a replaced clip
/// always has its address revoked.
#[derive(Debug, Default)]
pub struct Recorder {
    camera_held: bool,
    session: Option<RecordingSession>,
    clip: Option<PublishedClip>,
}

impl Recorder {
    /// Recorder holding nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether chunks are being captured.
    pub fn is_recording(&self) -> bool {
        self.session.is_some()
    }

    /// Whether the camera is open.
    pub fn camera_held(&self) -> bool {
        self.camera_held
    }

    /// The current clip, if a recording has finished.
    pub fn clip(&self) -> Option<&PublishedClip> {
        self.clip.as_ref()
    }

    /// Id of the running session.
    pub fn session_id(&self) -> Option<Uuid> {
        self.session.as_ref().map(RecordingSession::id)
    }

    /// Open the camera.
    ///
    /// # Errors
    ///
    /// `CapabilityMissing` when the device cannot record at all (the device
    /// is not asked for access), or the device's `PermissionDenied`.
    #[track_caller]
    #[instrument(skip(self, camera))]
    pub fn acquire(&mut self, camera: &mut dyn CaptureDevice) -> CoreResult<()> {
        if self.camera_held {
            return Ok(());
        }

        if !camera.is_supported() {
            return Err(StudioError::CapabilityMissing {
                capability: "video recording".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        camera.request_access()?;
        self.camera_held = true;

        info!("Camera acquired");

        Ok(())
    }

    /// Start a new recording, discarding the previous clip first.
    ///
    /// # Errors
    ///
    /// Propagates capture start failures; the camera is released in that case.
    #[track_caller]
    #[instrument(skip(self, camera, clips))]
    pub fn begin(
        &mut self,
        camera: &mut dyn CaptureDevice,
        clips: &mut dyn ClipStore,
        now: f64,
    ) -> CoreResult<Uuid> {
        if !self.camera_held {
            return Err(StudioError::CaptureFailed {
                reason: "camera not acquired".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        self.discard_clip(clips);

        if let Err(e) = camera.start_capture() {
            self.release_camera(camera);
            return Err(e);
        }

        let session = RecordingSession::new(now);
        let session_id = session.id();
        self.session = Some(session);

        info!(session_id = %session_id, "Recording started");

        Ok(session_id)
    }

    /// Move chunks the camera produced into the session.
    pub fn collect(&mut self, camera: &mut dyn CaptureDevice) -> usize {
        let Some(session) = self.session.as_mut() else {
            return 0;
        };

        let chunks = camera.drain_chunks();
        let count = chunks.len();
        for chunk in chunks {
            session.push_chunk(chunk);
        }
        count
    }

    /// Stop capturing, release the camera and publish the clip.
    ///
    /// Returns `Ok(None)` when no recording is running.
    ///
    /// # Errors
    ///
    /// Propagates clip publishing failures. The camera is released either way.
    #[track_caller]
    #[instrument(skip(self, camera, clips))]
    pub fn finish(
        &mut self,
        camera: &mut dyn CaptureDevice,
        clips: &mut dyn ClipStore,
    ) -> CoreResult<Option<&PublishedClip>> {
        let Some(mut session) = self.session.take() else {
            debug!("Finish ignored, not recording");
            return Ok(None);
        };

        for chunk in camera.stop_capture() {
            session.push_chunk(chunk);
        }
        self.release_camera(camera);

        let session_id = session.id();
        let clip = session.finish();
        let url = clips.publish(&clip)?;

        info!(
            session_id = %session_id,
            chunks = clip.chunk_count(),
            bytes = clip.bytes().len(),
            url = %url,
            "Recording finished"
        );

        Ok(Some(&*self.clip.insert(PublishedClip { clip, url })))
    }

    /// Abandon a running recording without producing a clip.
    #[instrument(skip(self, camera))]
    pub fn abort(&mut self, camera: &mut dyn CaptureDevice) {
        if let Some(session) = self.session.take() {
            let _ = camera.stop_capture();
            warn!(session_id = %session.id(), "Recording aborted");
        }
        self.release_camera(camera);
    }

    /// Close the camera if this recorder holds it.
    pub fn release_camera(&mut self, camera: &mut dyn CaptureDevice) {
        if self.camera_held {
            camera.release();
            self.camera_held = false;
            info!("Camera released");
        }
    }

    /// Drop the current clip and revoke its address.
    pub fn discard_clip(&mut self, clips: &mut dyn ClipStore) {
        if let Some(published) = self.clip.take() {
            clips.revoke(&published.url);
            debug!(url = %published.url, "Previous clip revoked");
        }
    }

    /// Release everything held: running capture, camera and clip.
    pub fn shutdown(&mut self, camera: &mut dyn CaptureDevice, clips: &mut dyn ClipStore) {
        self.abort(camera);
        self.discard_clip(clips);
    }
}
