use crate::{AudioTrack, CoreResult, StudioError, audio::Resampler, host::AudioOutput};

use std::{
    panic::Location,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use cpal::{
    Device, Stream, StreamConfig,
    traits::{DeviceTrait, HostTrait, StreamTrait},
};
use error_location::ErrorLocation;
use tracing::{debug, error, info, instrument, warn};

/// Names of the output devices the default host offers.
pub fn output_device_names() -> Vec<String> {
    let host = cpal::default_host();
    match host.output_devices() {
        Ok(devices) => devices.filter_map(|d| d.name().ok()).collect(),
        Err(e) => {
            warn!("Failed to enumerate output devices: {}", e);
            Vec::new()
        }
    }
}

/// Track playback through a cpal output stream.
///
/// Tracks whose rate differs from the device are resampled once and cached
/// until a different track is started.
pub struct CpalOutput {
    device: Device,
    config: StreamConfig,
    stream: Option<Stream>,
    prepared: Option<PreparedTrack>,
    /// Signals the callback to go silent. Set before the stream is dropped.
    shutdown: Arc<AtomicBool>,
    ended: Arc<AtomicBool>,
}

struct PreparedTrack {
    source_name: String,
    source_frames: usize,
    source_rate: u32,
    track: AudioTrack,
}

impl PreparedTrack {
    fn matches(&self, track: &AudioTrack) -> bool {
        self.source_name == track.name()
            && self.source_frames == track.frames()
            && self.source_rate == track.sample_rate()
    }
}

impl std::fmt::Debug for CpalOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpalOutput")
            .field("sample_rate", &self.config.sample_rate)
            .field("channels", &self.config.channels)
            .field("playing", &self.stream.is_some())
            .finish_non_exhaustive()
    }
}

impl CpalOutput {
    /// Open `device_name`, or the default output device when `None` or not found.
    #[track_caller]
    #[instrument]
    pub fn new(device_name: Option<&str>) -> CoreResult<Self> {
        let host = cpal::default_host();

        let named = device_name.and_then(|wanted| {
            let found = host
                .output_devices()
                .ok()?
                .find(|d| d.name().map(|n| n == wanted).unwrap_or(false));
            if found.is_none() {
                warn!(device = wanted, "Output device not found, using default");
            }
            found
        });

        let device = match named {
            Some(device) => device,
            None => host
                .default_output_device()
                .ok_or(StudioError::DeviceError {
                    reason: "No audio output device found".to_string(),
                    location: ErrorLocation::from(Location::caller()),
                })?,
        };

        let config = device
            .default_output_config()
            .map_err(|e| StudioError::DeviceError {
                reason: format!("Failed to get config: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        info!(
            device = ?device.name().ok(),
            sample_rate = config.sample_rate(),
            channels = config.channels(),
            "Audio output initialized"
        );

        Ok(Self {
            device,
            config: config.into(),
            stream: None,
            prepared: None,
            shutdown: Arc::new(AtomicBool::new(false)),
            ended: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Device sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate
    }

    #[track_caller]
    fn prepare(&mut self, track: &AudioTrack) -> CoreResult<AudioTrack> {
        let device_rate = self.config.sample_rate;
        if track.sample_rate() == device_rate {
            return Ok(track.clone());
        }
        if let Some(prepared) = self.prepared.as_ref().filter(|p| p.matches(track)) {
            return Ok(prepared.track.clone());
        }

        let mut resampler = Resampler::new(track.sample_rate(), device_rate)?;
        let channels: Vec<Vec<f32>> = (0..track.channel_count())
            .filter_map(|c| track.channel(c).map(<[f32]>::to_vec))
            .collect();
        let resampled = resampler.resample_planar(&channels)?;
        let prepared = AudioTrack::from_planar(track.name(), device_rate, resampled)?;

        debug!(
            from = track.sample_rate(),
            to = device_rate,
            frames = prepared.frames(),
            "Track resampled for output"
        );

        self.prepared = Some(PreparedTrack {
            source_name: track.name().to_string(),
            source_frames: track.frames(),
            source_rate: track.sample_rate(),
            track: prepared.clone(),
        });

        Ok(prepared)
    }

    fn halt_stream(&mut self) {
        self.shutdown.store(true, Ordering::Release);
        if let Some(stream) = self.stream.take() {
            drop(stream);
            debug!("Output stream dropped");
        }
    }
}

impl AudioOutput for CpalOutput {
    #[track_caller]
    #[instrument(skip(self, track))]
    fn start(&mut self, track: &AudioTrack, offset: f64) -> CoreResult<()> {
        self.halt_stream();

        let track = self.prepare(track)?;
        let out_channels = usize::from(self.config.channels.max(1));
        let src_channels = track.channel_count();
        let frames = track.frames();
        let mut cursor = track.frame_at(offset);

        // Fresh flags per stream so a late callback from the old stream
        // cannot mark the new one as ended.
        let shutdown = Arc::new(AtomicBool::new(false));
        let ended = Arc::new(AtomicBool::new(false));
        self.shutdown = Arc::clone(&shutdown);
        self.ended = Arc::clone(&ended);

        let stream = self
            .device
            .build_output_stream(
                &self.config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    if shutdown.load(Ordering::Acquire) {
                        data.fill(0.0);
                        return;
                    }
                    for frame in data.chunks_mut(out_channels) {
                        if cursor >= frames {
                            frame.fill(0.0);
                            ended.store(true, Ordering::Release);
                            continue;
                        }
                        for (c, sample) in frame.iter_mut().enumerate() {
                            *sample = track
                                .channel(c % src_channels)
                                .map_or(0.0, |channel| channel[cursor]);
                        }
                        cursor += 1;
                    }
                },
                |err| {
                    error!("Audio output stream error: {}", err);
                },
                None,
            )
            .map_err(|e| StudioError::DeviceError {
                reason: format!("Failed to build stream: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        stream.play().map_err(|e| StudioError::DeviceError {
            reason: format!("Failed to start stream: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        self.stream = Some(stream);
        info!(offset, "Audio output started");

        Ok(())
    }

    #[instrument(skip(self))]
    fn stop(&mut self) {
        if self.stream.is_some() {
            self.halt_stream();
            info!("Audio output stopped");
        }
    }

    fn poll_ended(&mut self) -> bool {
        self.stream.is_some() && self.ended.swap(false, Ordering::AcqRel)
    }
}

impl Drop for CpalOutput {
    fn drop(&mut self) {
        self.halt_stream();
    }
}
