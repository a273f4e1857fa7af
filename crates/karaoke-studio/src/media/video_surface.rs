use crate::media::{FrameSlot, VideoFrame};

use karaoke_studio_core::{ClipUrl, CoreResult, StudioError, host::VideoSurface};

use std::panic::Location;

use error_location::ErrorLocation;
use gstreamer as gst;
use gstreamer_app as gst_app;
use gstreamer_video as gst_video;
use gst::prelude::*;
use tracing::{debug, error, info, instrument, warn};

const PREROLL_TIMEOUT_SECS: u64 = 5;

enum PaneMode {
    Empty,
    Live,
    Clip { url: ClipUrl, playbin: gst::Element },
}

/// The video pane. Live frames come from the camera through the shared
/// [`FrameSlot`]; a loaded clip is decoded by its own `playbin`.
pub struct GstVideoSurface {
    frames: FrameSlot,
    mode: PaneMode,
}

impl std::fmt::Debug for GstVideoSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mode = match &self.mode {
            PaneMode::Empty => "empty".to_string(),
            PaneMode::Live => "live".to_string(),
            PaneMode::Clip { url, .. } => format!("clip {}", url),
        };
        f.debug_struct("GstVideoSurface").field("mode", &mode).finish()
    }
}

impl GstVideoSurface {
    /// Pane drawing into `frames`.
    pub fn new(frames: FrameSlot) -> Self {
        Self {
            frames,
            mode: PaneMode::Empty,
        }
    }

    fn playbin(&self) -> Option<&gst::Element> {
        match &self.mode {
            PaneMode::Clip { playbin, .. } => Some(playbin),
            _ => None,
        }
    }

    fn teardown(&mut self) {
        if let PaneMode::Clip { url, playbin } = std::mem::replace(&mut self.mode, PaneMode::Empty)
        {
            if let Err(e) = playbin.set_state(gst::State::Null) {
                warn!(clip = %url, "Failed to stop clip pipeline: {}", e);
            }
        }
    }

    fn frame_sink(&self) -> gst_app::AppSink {
        let caps = gst_video::VideoCapsBuilder::new()
            .format(gst_video::VideoFormat::Rgba)
            .build();
        let sink = gst_app::AppSink::builder().caps(&caps).sync(true).build();

        let on_sample = self.frames.clone();
        let on_preroll = self.frames.clone();
        sink.set_callbacks(
            gst_app::AppSinkCallbacks::builder()
                .new_sample(move |sink| {
                    let sample = sink.pull_sample().map_err(|_| gst::FlowError::Eos)?;
                    if let Some(frame) = VideoFrame::from_sample(&sample) {
                        on_sample.publish(frame);
                    }
                    Ok(gst::FlowSuccess::Ok)
                })
                .new_preroll(move |sink| {
                    let sample = sink.pull_preroll().map_err(|_| gst::FlowError::Eos)?;
                    if let Some(frame) = VideoFrame::from_sample(&sample) {
                        on_preroll.publish(frame);
                    }
                    Ok(gst::FlowSuccess::Ok)
                })
                .build(),
        );
        sink
    }

    fn set_clip_state(&self, state: gst::State) {
        if let Some(playbin) = self.playbin() {
            if let Err(e) = playbin.set_state(state) {
                error!(?state, "Clip state change failed: {}", e);
            }
        }
    }
}

impl VideoSurface for GstVideoSurface {
    fn show_live_feed(&mut self) {
        self.teardown();
        self.frames.clear();
        self.mode = PaneMode::Live;
        debug!("Video pane showing live feed");
    }

    #[track_caller]
    #[instrument(skip(self), fields(clip = %url))]
    fn load_clip(&mut self, url: &ClipUrl) -> CoreResult<()> {
        let fail = |reason: String| StudioError::ClipStoreFailed {
            reason,
            location: ErrorLocation::from(Location::caller()),
        };

        self.teardown();
        self.frames.clear();

        let playbin = gst::ElementFactory::make("playbin")
            .property("uri", url.as_str())
            .property("video-sink", self.frame_sink())
            .build()
            .map_err(|e| fail(format!("Failed to create clip player: {}", e)))?;

        if let Err(e) = playbin.set_state(gst::State::Paused) {
            let _ = playbin.set_state(gst::State::Null);
            return Err(fail(format!("Failed to open clip: {}", e)));
        }

        let (result, _current, _pending) =
            playbin.state(Some(gst::ClockTime::from_seconds(PREROLL_TIMEOUT_SECS)));
        if let Err(e) = result {
            let _ = playbin.set_state(gst::State::Null);
            return Err(fail(format!("Clip did not preroll: {}", e)));
        }

        info!("Clip loaded");
        self.mode = PaneMode::Clip {
            url: url.clone(),
            playbin,
        };
        Ok(())
    }

    fn clear(&mut self) {
        self.teardown();
        self.frames.clear();
        self.mode = PaneMode::Empty;
    }

    fn play(&mut self) {
        self.set_clip_state(gst::State::Playing);
    }

    fn pause(&mut self) {
        self.set_clip_state(gst::State::Paused);
    }

    fn seek(&mut self, seconds: f64) {
        let Some(playbin) = self.playbin() else {
            return;
        };
        let target = gst::ClockTime::from_nseconds((seconds.max(0.0) * 1e9) as u64);
        if let Err(e) =
            playbin.seek_simple(gst::SeekFlags::FLUSH | gst::SeekFlags::ACCURATE, target)
        {
            warn!(seconds, "Clip seek failed: {}", e);
        }
    }

    fn position(&self) -> f64 {
        self.playbin()
            .and_then(|p| p.query_position::<gst::ClockTime>())
            .map(|t| t.nseconds() as f64 / 1e9)
            .unwrap_or(0.0)
    }

    fn poll_ended(&mut self) -> bool {
        let Some(bus) = self.playbin().and_then(|p| p.bus()) else {
            return false;
        };
        let mut ended = false;
        while let Some(msg) =
            bus.pop_filtered(&[gst::MessageType::Eos, gst::MessageType::Error])
        {
            match msg.view() {
                gst::MessageView::Eos(_) => ended = true,
                gst::MessageView::Error(err) => {
                    error!("Clip playback error: {}", err.error());
                    ended = true;
                }
                _ => {}
            }
        }
        ended
    }
}

impl Drop for GstVideoSurface {
    fn drop(&mut self) {
        self.teardown();
    }
}
