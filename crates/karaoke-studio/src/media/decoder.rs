use karaoke_studio_core::{AudioTrack, CoreResult, StudioError, host::TrackDecoder};

use std::{
    io::Write,
    panic::Location,
    path::Path,
    time::{Duration, Instant},
};

use error_location::ErrorLocation;
use gstreamer as gst;
use gstreamer_app as gst_app;
use gst::prelude::*;
use tracing::{debug, info, instrument, warn};

const PULL_INTERVAL_MS: u64 = 100;
const DECODE_TIMEOUT: Duration = Duration::from_secs(120);

/// Decodes any audio file GStreamer understands to interleaved f32 PCM.
#[derive(Debug, Default, Clone, Copy)]
pub struct GstDecoder;

impl GstDecoder {
    /// New decoder. GStreamer must already be initialised.
    pub fn new() -> Self {
        Self
    }

    /// Pipeline that decodes `path` to interleaved F32LE into `appsink name=sink`.
    pub fn pipeline_description(path: &Path) -> String {
        format!(
            "filesrc location=\"{}\" ! decodebin ! audioconvert ! \
             audio/x-raw,format=F32LE,layout=interleaved ! appsink name=sink sync=false",
            path.display()
        )
    }

    #[track_caller]
    fn decode_path(&self, name: &str, path: &Path) -> CoreResult<AudioTrack> {
        let fail = |reason: String| StudioError::DecodeFailed {
            reason,
            location: ErrorLocation::from(Location::caller()),
        };

        let pipeline = gst::parse::launch(&Self::pipeline_description(path))
            .map_err(|e| fail(format!("Failed to create pipeline: {}", e)))?
            .downcast::<gst::Pipeline>()
            .map_err(|_| fail("Launch result is not a pipeline".to_string()))?;

        let sink = pipeline
            .by_name("sink")
            .and_then(|e| e.downcast::<gst_app::AppSink>().ok())
            .ok_or_else(|| fail("Pipeline has no appsink".to_string()))?;

        let bus = pipeline
            .bus()
            .ok_or_else(|| fail("Pipeline has no bus".to_string()))?;

        pipeline
            .set_state(gst::State::Playing)
            .map_err(|e| fail(format!("Failed to start decoding: {}", e)))?;

        let result = Self::pull_all(&sink, &bus, name);

        if let Err(e) = pipeline.set_state(gst::State::Null) {
            warn!("Failed to stop decode pipeline: {}", e);
        }

        let (sample_rate, channels, samples) = result.map_err(fail)?;
        AudioTrack::from_interleaved(name, sample_rate, channels, &samples)
    }

    fn pull_all(
        sink: &gst_app::AppSink,
        bus: &gst::Bus,
        name: &str,
    ) -> Result<(u32, usize, Vec<f32>), String> {
        let started = Instant::now();
        let mut format: Option<(u32, usize)> = None;
        let mut samples = Vec::new();

        loop {
            if let Some(msg) = bus.pop_filtered(&[gst::MessageType::Error]) {
                if let gst::MessageView::Error(err) = msg.view() {
                    return Err(err.error().to_string());
                }
            }

            match sink.try_pull_sample(gst::ClockTime::from_mseconds(PULL_INTERVAL_MS)) {
                Some(sample) => {
                    if format.is_none() {
                        format = Self::sample_format(&sample);
                        debug!(track = name, format = ?format, "Decoded stream format");
                    }
                    let Some(buffer) = sample.buffer() else {
                        continue;
                    };
                    let map = buffer.map_readable().map_err(|e| e.to_string())?;
                    samples.extend(
                        map.as_slice()
                            .chunks_exact(4)
                            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]])),
                    );
                }
                None if sink.is_eos() => break,
                None if started.elapsed() > DECODE_TIMEOUT => {
                    return Err("Timed out decoding audio".to_string());
                }
                None => {}
            }
        }

        let (rate, channels) = format.ok_or_else(|| "No audio stream found".to_string())?;
        if samples.is_empty() {
            return Err("Audio stream is empty".to_string());
        }

        Ok((rate, channels, samples))
    }

    fn sample_format(sample: &gst::Sample) -> Option<(u32, usize)> {
        let structure = sample.caps()?.structure(0)?;
        let rate = u32::try_from(structure.get::<i32>("rate").ok()?).ok()?;
        let channels = usize::try_from(structure.get::<i32>("channels").ok()?).ok()?;
        Some((rate, channels))
    }
}

impl TrackDecoder for GstDecoder {
    #[track_caller]
    #[instrument(skip(self, bytes), fields(bytes = bytes.len()))]
    fn decode(&self, name: &str, bytes: &[u8]) -> CoreResult<AudioTrack> {
        let fail = |reason: String| StudioError::DecodeFailed {
            reason,
            location: ErrorLocation::from(Location::caller()),
        };

        if bytes.is_empty() {
            return Err(fail("File is empty".to_string()));
        }

        // decodebin needs a seekable source for most containers
        let suffix = Path::new(name)
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();
        let mut file = tempfile::Builder::new()
            .prefix("karaoke-track-")
            .suffix(&suffix)
            .tempfile()
            .map_err(|e| fail(format!("Failed to create temp file: {}", e)))?;
        file.write_all(bytes)
            .and_then(|()| file.flush())
            .map_err(|e| fail(format!("Failed to write temp file: {}", e)))?;

        let track = self.decode_path(name, file.path())?;

        info!(
            track = name,
            duration_secs = track.duration(),
            sample_rate = track.sample_rate(),
            channels = track.channel_count(),
            "Audio decoded"
        );

        Ok(track)
    }
}
