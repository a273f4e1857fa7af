use crate::{
    config::CameraConfig,
    media::{FrameSlot, VideoFrame},
};

use karaoke_studio_core::{CoreResult, StudioError, host::CaptureDevice};

use std::panic::Location;

use error_location::ErrorLocation;
use gstreamer as gst;
use gstreamer_app as gst_app;
use gst::prelude::*;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info, instrument, warn};

const STATE_TIMEOUT_SECS: u64 = 5;
const EOS_TIMEOUT_SECS: u64 = 3;
const ENCODER_ELEMENTS: [&str; 2] = ["vp8enc", "webmmux"];

/// Camera (and optionally microphone) capture through GStreamer.
///
/// Opening the device runs a preview-only pipeline. Starting a capture
/// relaunches it with a VP8/WebM branch whose muxed output arrives as
/// chunks on a channel, so every recording is a self-contained WebM stream.
pub struct GstCamera {
    config: CameraConfig,
    preview: FrameSlot,
    pipeline: Option<gst::Pipeline>,
    chunk_tx: UnboundedSender<Vec<u8>>,
    chunk_rx: UnboundedReceiver<Vec<u8>>,
}

impl std::fmt::Debug for GstCamera {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GstCamera")
            .field("source", &self.config.source)
            .field("open", &self.pipeline.is_some())
            .finish_non_exhaustive()
    }
}

impl GstCamera {
    /// Camera writing its live preview into `preview`.
    pub fn new(config: CameraConfig, preview: FrameSlot) -> Self {
        let (chunk_tx, chunk_rx) = mpsc::unbounded_channel();
        Self {
            config,
            preview,
            pipeline: None,
            chunk_tx,
            chunk_rx,
        }
    }

    /// Launch description for the camera pipeline.
    ///
    /// The preview branch always feeds `appsink name=preview`; with `record`
    /// set, a tee adds the encoder branch ending in `appsink name=chunks`.
    pub fn pipeline_description(config: &CameraConfig, record: bool) -> String {
        let source = format!(
            "{} ! videoconvert ! videoscale ! videorate ! \
             video/x-raw,width={},height={},framerate={}/1",
            config.source, config.width, config.height, config.framerate
        );
        let preview = "videoconvert ! video/x-raw,format=RGBA ! \
                       appsink name=preview sync=false max-buffers=1 drop=true";

        if !record {
            return format!("{source} ! {preview}");
        }

        let mut description = format!(
            "{source} ! tee name=t \
             t. ! queue ! {preview} \
             t. ! queue ! videoconvert ! vp8enc deadline=1 ! queue ! \
             webmmux name=mux streamable=true ! appsink name=chunks sync=false"
        );
        if !config.audio_source.trim().is_empty() {
            description.push_str(&format!(
                " {} ! queue ! audioconvert ! audioresample ! vorbisenc ! queue ! mux.",
                config.audio_source
            ));
        }
        description
    }

    #[track_caller]
    fn launch(&mut self, record: bool) -> CoreResult<()> {
        self.shutdown_pipeline();

        let description = Self::pipeline_description(&self.config, record);
        debug!(description = %description, "Launching camera pipeline");

        let denied = |reason: String| StudioError::PermissionDenied {
            reason,
            location: ErrorLocation::from(Location::caller()),
        };

        let pipeline = gst::parse::launch(&description)
            .map_err(|e| denied(format!("Failed to create camera pipeline: {}", e)))?
            .downcast::<gst::Pipeline>()
            .map_err(|_| denied("Launch result is not a pipeline".to_string()))?;

        let preview_sink = pipeline
            .by_name("preview")
            .and_then(|e| e.downcast::<gst_app::AppSink>().ok())
            .ok_or_else(|| denied("Camera pipeline has no preview sink".to_string()))?;

        let slot = self.preview.clone();
        preview_sink.set_callbacks(
            gst_app::AppSinkCallbacks::builder()
                .new_sample(move |sink| {
                    let sample = sink.pull_sample().map_err(|_| gst::FlowError::Eos)?;
                    if let Some(frame) = VideoFrame::from_sample(&sample) {
                        slot.publish(frame);
                    }
                    Ok(gst::FlowSuccess::Ok)
                })
                .build(),
        );

        if record {
            let chunk_sink = pipeline
                .by_name("chunks")
                .and_then(|e| e.downcast::<gst_app::AppSink>().ok())
                .ok_or_else(|| denied("Camera pipeline has no chunk sink".to_string()))?;

            let tx = self.chunk_tx.clone();
            chunk_sink.set_callbacks(
                gst_app::AppSinkCallbacks::builder()
                    .new_sample(move |sink| {
                        let sample = sink.pull_sample().map_err(|_| gst::FlowError::Eos)?;
                        let buffer = sample.buffer().ok_or(gst::FlowError::Error)?;
                        let map = buffer.map_readable().map_err(|_| gst::FlowError::Error)?;
                        if tx.send(map.as_slice().to_vec()).is_err() {
                            return Err(gst::FlowError::Flushing);
                        }
                        Ok(gst::FlowSuccess::Ok)
                    })
                    .build(),
            );
        }

        if let Err(e) = pipeline.set_state(gst::State::Playing) {
            let _ = pipeline.set_state(gst::State::Null);
            return Err(denied(format!("Failed to open camera: {}", e)));
        }

        let (result, _current, _pending) =
            pipeline.state(Some(gst::ClockTime::from_seconds(STATE_TIMEOUT_SECS)));
        if let Err(e) = result {
            let reason = Self::bus_error(&pipeline).unwrap_or_else(|| e.to_string());
            let _ = pipeline.set_state(gst::State::Null);
            return Err(denied(format!("Camera did not start: {}", reason)));
        }

        self.pipeline = Some(pipeline);
        Ok(())
    }

    fn bus_error(pipeline: &gst::Pipeline) -> Option<String> {
        let msg = pipeline.bus()?.pop_filtered(&[gst::MessageType::Error])?;
        match msg.view() {
            gst::MessageView::Error(err) => Some(err.error().to_string()),
            _ => None,
        }
    }

    /// Send EOS so the muxer flushes, then wait for it to reach the sinks.
    fn finish_stream(pipeline: &gst::Pipeline) {
        if !pipeline.send_event(gst::event::Eos::new()) {
            warn!("Camera pipeline rejected EOS");
            return;
        }
        let Some(bus) = pipeline.bus() else {
            return;
        };
        let msg = bus.timed_pop_filtered(
            gst::ClockTime::from_seconds(EOS_TIMEOUT_SECS),
            &[gst::MessageType::Eos, gst::MessageType::Error],
        );
        match msg.as_ref().map(|m| m.view()) {
            Some(gst::MessageView::Eos(_)) => debug!("Camera stream finished"),
            Some(gst::MessageView::Error(err)) => {
                error!("Camera stream failed while finishing: {}", err.error())
            }
            _ => warn!("Timed out waiting for camera EOS"),
        }
    }

    fn shutdown_pipeline(&mut self) {
        if let Some(pipeline) = self.pipeline.take() {
            if let Err(e) = pipeline.set_state(gst::State::Null) {
                warn!("Failed to stop camera pipeline: {}", e);
            }
        }
    }

    fn drain(&mut self) -> Vec<Vec<u8>> {
        let mut chunks = Vec::new();
        while let Ok(chunk) = self.chunk_rx.try_recv() {
            chunks.push(chunk);
        }
        chunks
    }
}

impl CaptureDevice for GstCamera {
    fn is_supported(&self) -> bool {
        let source = self.config.source.split_whitespace().next().unwrap_or_default();
        let supported = ENCODER_ELEMENTS
            .iter()
            .chain(std::iter::once(&source))
            .all(|name| gst::ElementFactory::find(name).is_some());
        if !supported {
            warn!(source, "Camera source or VP8/WebM encoder unavailable");
        }
        supported
    }

    #[track_caller]
    #[instrument(skip(self))]
    fn request_access(&mut self) -> CoreResult<()> {
        self.launch(false)?;
        info!(source = %self.config.source, "Camera opened");
        Ok(())
    }

    #[track_caller]
    #[instrument(skip(self))]
    fn start_capture(&mut self) -> CoreResult<()> {
        let _ = self.drain();
        self.launch(true).map_err(|e| StudioError::CaptureFailed {
            reason: e.to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?;
        info!("Camera capture started");
        Ok(())
    }

    fn drain_chunks(&mut self) -> Vec<Vec<u8>> {
        self.drain()
    }

    #[instrument(skip(self))]
    fn stop_capture(&mut self) -> Vec<Vec<u8>> {
        if let Some(pipeline) = self.pipeline.as_ref() {
            Self::finish_stream(pipeline);
        }
        self.shutdown_pipeline();
        let chunks = self.drain();
        debug!(chunks = chunks.len(), "Camera capture stopped");
        chunks
    }

    #[instrument(skip(self))]
    fn release(&mut self) {
        self.shutdown_pipeline();
        info!("Camera closed");
    }
}

impl Drop for GstCamera {
    fn drop(&mut self) {
        self.shutdown_pipeline();
    }
}
