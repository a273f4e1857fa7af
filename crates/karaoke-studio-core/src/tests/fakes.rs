use crate::{
    AudioTrack, ClipUrl, CoreResult, RecordedClip, StudioController, StudioDevices,
    StudioError, StudioSettings,
    host::{AudioOutput, CaptureDevice, ClipStore, Notifier, VideoSurface},
    transport::Clock,
};

use std::{
    cell::{Cell, RefCell},
    panic::Location,
    rc::Rc,
};

use error_location::ErrorLocation;

pub const SAMPLE_RATE: u32 = 8_000;

/// Mono track of `seconds` length holding a 0.5 amplitude square wave.
#[allow(clippy::unwrap_used)]
pub fn square_track(seconds: f64) -> AudioTrack {
    let frames = (seconds * f64::from(SAMPLE_RATE)) as usize;
    let samples = (0..frames)
        .map(|i| if (i / 40) % 2 == 0 { 0.5 } else { -0.5 })
        .collect();
    AudioTrack::from_planar("square.wav", SAMPLE_RATE, vec![samples]).unwrap()
}

// -------------------------------
// MARK: Audio
// -------------------------------

#[derive(Debug, Default)]
pub struct AudioLog {
    pub starts: Vec<f64>,
    pub stops: usize,
    pub playing: bool,
    pub fail_start: bool,
    pub ended: bool,
}

pub struct FakeAudio(pub Rc<RefCell<AudioLog>>);

impl AudioOutput for FakeAudio {
    fn start(&mut self, _track: &AudioTrack, offset: f64) -> CoreResult<()> {
        let mut log = self.0.borrow_mut();
        if log.fail_start {
            return Err(StudioError::DeviceError {
                reason: "fake output refused".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        log.starts.push(offset);
        log.playing = true;
        Ok(())
    }

    fn stop(&mut self) {
        let mut log = self.0.borrow_mut();
        log.stops += 1;
        log.playing = false;
    }

    fn poll_ended(&mut self) -> bool {
        std::mem::take(&mut self.0.borrow_mut().ended)
    }
}

// -------------------------------
// MARK: Camera
// -------------------------------

#[derive(Debug)]
pub struct CameraLog {
    pub supported: bool,
    pub deny: bool,
    pub fail_capture: bool,
    pub access_requests: usize,
    pub releases: usize,
    pub capturing: bool,
    pub pending: Vec<Vec<u8>>,
    pub trailing: Vec<Vec<u8>>,
}

impl Default for CameraLog {
    fn default() -> Self {
        Self {
            supported: true,
            deny: false,
            fail_capture: false,
            access_requests: 0,
            releases: 0,
            capturing: false,
            pending: Vec::new(),
            trailing: vec![b"tail".to_vec()],
        }
    }
}

pub struct FakeCamera(pub Rc<RefCell<CameraLog>>);

impl CaptureDevice for FakeCamera {
    fn is_supported(&self) -> bool {
        self.0.borrow().supported
    }

    fn request_access(&mut self) -> CoreResult<()> {
        let mut log = self.0.borrow_mut();
        log.access_requests += 1;
        if log.deny {
            return Err(StudioError::PermissionDenied {
                reason: "no camera".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        Ok(())
    }

    fn start_capture(&mut self) -> CoreResult<()> {
        let mut log = self.0.borrow_mut();
        if log.fail_capture {
            return Err(StudioError::CaptureFailed {
                reason: "encoder missing".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        log.capturing = true;
        Ok(())
    }

    fn drain_chunks(&mut self) -> Vec<Vec<u8>> {
        std::mem::take(&mut self.0.borrow_mut().pending)
    }

    fn stop_capture(&mut self) -> Vec<Vec<u8>> {
        let mut log = self.0.borrow_mut();
        log.capturing = false;
        let mut chunks = std::mem::take(&mut log.pending);
        chunks.append(&mut log.trailing);
        chunks
    }

    fn release(&mut self) {
        let mut log = self.0.borrow_mut();
        log.capturing = false;
        log.releases += 1;
    }
}

// -------------------------------
// MARK: Video
// -------------------------------

#[derive(Debug, Default)]
pub struct VideoLog {
    pub live: bool,
    pub loaded: Option<ClipUrl>,
    pub playing: bool,
    pub position: f64,
    pub seeks: Vec<f64>,
    pub clears: usize,
    pub ended: bool,
    pub reports_seeks: bool,
}

pub struct FakeVideo(pub Rc<RefCell<VideoLog>>);

impl VideoSurface for FakeVideo {
    fn show_live_feed(&mut self) {
        let mut log = self.0.borrow_mut();
        log.live = true;
        log.loaded = None;
    }

    fn load_clip(&mut self, url: &ClipUrl) -> CoreResult<()> {
        let mut log = self.0.borrow_mut();
        log.live = false;
        log.loaded = Some(url.clone());
        log.position = 0.0;
        Ok(())
    }

    fn clear(&mut self) {
        let mut log = self.0.borrow_mut();
        log.live = false;
        log.loaded = None;
        log.playing = false;
        log.clears += 1;
    }

    fn play(&mut self) {
        self.0.borrow_mut().playing = true;
    }

    fn pause(&mut self) {
        self.0.borrow_mut().playing = false;
    }

    fn seek(&mut self, seconds: f64) {
        let mut log = self.0.borrow_mut();
        log.position = seconds;
        log.seeks.push(seconds);
    }

    fn position(&self) -> f64 {
        self.0.borrow().position
    }

    fn poll_ended(&mut self) -> bool {
        std::mem::take(&mut self.0.borrow_mut().ended)
    }

    fn reports_seeks(&self) -> bool {
        self.0.borrow().reports_seeks
    }
}

// -------------------------------
// MARK: Clips, alerts, clock
// -------------------------------

#[derive(Debug, Default)]
pub struct ClipLog {
    pub published: Vec<(ClipUrl, usize)>,
    pub revoked: Vec<ClipUrl>,
}

pub struct FakeClips(pub Rc<RefCell<ClipLog>>);

impl ClipStore for FakeClips {
    fn publish(&mut self, clip: &RecordedClip) -> CoreResult<ClipUrl> {
        let mut log = self.0.borrow_mut();
        let url = ClipUrl::new(format!("mem://clip/{}", log.published.len()));
        log.published.push((url.clone(), clip.bytes().len()));
        Ok(url)
    }

    fn revoke(&mut self, url: &ClipUrl) {
        self.0.borrow_mut().revoked.push(url.clone());
    }
}

pub struct FakeNotifier(pub Rc<RefCell<Vec<String>>>);

impl Notifier for FakeNotifier {
    fn alert(&mut self, message: &str) {
        self.0.borrow_mut().push(message.to_string());
    }
}

pub struct ManualClock(pub Rc<Cell<f64>>);

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        self.0.get()
    }
}

// -------------------------------
// MARK: Rig
// -------------------------------

/// Shared handles onto every fake the studio is wired to.
#[derive(Default)]
pub struct Rig {
    pub audio: Rc<RefCell<AudioLog>>,
    pub camera: Rc<RefCell<CameraLog>>,
    pub video: Rc<RefCell<VideoLog>>,
    pub clips: Rc<RefCell<ClipLog>>,
    pub alerts: Rc<RefCell<Vec<String>>>,
    pub clock: Rc<Cell<f64>>,
}

impl Rig {
    pub fn devices(&self) -> StudioDevices {
        StudioDevices {
            audio: Box::new(FakeAudio(Rc::clone(&self.audio))),
            camera: Box::new(FakeCamera(Rc::clone(&self.camera))),
            video: Box::new(FakeVideo(Rc::clone(&self.video))),
            clips: Box::new(FakeClips(Rc::clone(&self.clips))),
            notifier: Box::new(FakeNotifier(Rc::clone(&self.alerts))),
            clock: Box::new(ManualClock(Rc::clone(&self.clock))),
        }
    }

    /// Studio with the countdown switched off.
    pub fn studio(&self) -> StudioController {
        self.studio_with(StudioSettings {
            countdown_enabled: false,
            ..StudioSettings::default()
        })
    }

    pub fn studio_with(&self, settings: StudioSettings) -> StudioController {
        StudioController::new(self.devices(), settings)
    }

    /// Studio with a `seconds` long track loaded.
    #[allow(clippy::unwrap_used)]
    pub fn loaded_studio(&self, seconds: f64) -> StudioController {
        let mut studio = self.studio();
        studio.begin_track_load();
        studio.finish_track_load(Ok(square_track(seconds))).unwrap();
        studio
    }

    pub fn advance(&self, seconds: f64) {
        self.clock.set(self.clock.get() + seconds);
    }
}
