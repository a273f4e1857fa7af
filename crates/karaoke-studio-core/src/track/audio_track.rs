use crate::{CoreResult, StudioError};

use std::{panic::Location, sync::Arc};

use error_location::ErrorLocation;
use tracing::{debug, instrument};

/// Decoded PCM audio, immutable once built.
///
/// Channels are stored planar. Cloning is cheap: the sample data is shared.
#[derive(Debug, Clone)]
pub struct AudioTrack {
    name: String,
    sample_rate: u32,
    channels: Arc<[Vec<f32>]>,
}

impl AudioTrack {
    /// Build a track from planar channel data.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTrack` if there are no channels, the channels have
    /// different lengths, or the sample rate is zero.
    #[track_caller]
    #[instrument(skip(channels))]
    pub fn from_planar(
        name: impl Into<String> + std::fmt::Debug,
        sample_rate: u32,
        channels: Vec<Vec<f32>>,
    ) -> CoreResult<Self> {
        if sample_rate == 0 {
            return Err(StudioError::InvalidTrack {
                reason: "sample rate is zero".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let Some(first) = channels.first() else {
            return Err(StudioError::InvalidTrack {
                reason: "no channels".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        };

        let frames = first.len();
        if channels.iter().any(|c| c.len() != frames) {
            return Err(StudioError::InvalidTrack {
                reason: "channels have different lengths".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let track = Self {
            name: name.into(),
            sample_rate,
            channels: channels.into(),
        };

        debug!(
            sample_rate,
            channels = track.channel_count(),
            frames,
            duration_secs = track.duration(),
            "Audio track built"
        );

        Ok(track)
    }

    /// Build a track from interleaved samples, splitting them into channels.
    ///
    /// A trailing partial frame is dropped.
    #[track_caller]
    pub fn from_interleaved(
        name: impl Into<String> + std::fmt::Debug,
        sample_rate: u32,
        channel_count: usize,
        samples: &[f32],
    ) -> CoreResult<Self> {
        if channel_count == 0 {
            return Err(StudioError::InvalidTrack {
                reason: "no channels".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let frames = samples.len() / channel_count;
        let mut channels = vec![Vec::with_capacity(frames); channel_count];
        for frame in samples.chunks_exact(channel_count) {
            for (channel, sample) in channels.iter_mut().zip(frame) {
                channel.push(*sample);
            }
        }

        Self::from_planar(name, sample_rate, channels)
    }

    /// Display name, usually the file name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of channels.
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Number of sample frames.
    pub fn frames(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    /// Duration in seconds.
    pub fn duration(&self) -> f64 {
        self.frames() as f64 / f64::from(self.sample_rate)
    }

    /// Samples of one channel, if it exists.
    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    /// Frame index for a time offset, clamped to the track length.
    pub fn frame_at(&self, seconds: f64) -> usize {
        let frame = (seconds.max(0.0) * f64::from(self.sample_rate)) as usize;
        frame.min(self.frames())
    }
}
