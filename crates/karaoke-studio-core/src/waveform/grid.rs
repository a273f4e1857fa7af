use crate::{CoreResult, StudioError};

use std::panic::Location;

use error_location::ErrorLocation;

/// Beats in one bar (4/4 time).
pub const BEATS_PER_BAR: f64 = 4.0;

/// Default spacing of labelled gridlines, in bars.
pub const DEFAULT_BARS_PER_GRIDLINE: u32 = 8;

/// Tempo used when nothing else is configured.
pub const DEFAULT_BPM: f64 = 120.0;

/// Reject tempos that cannot produce a bar grid.
#[track_caller]
pub fn validate_bpm(bpm: f64) -> CoreResult<f64> {
    if bpm.is_finite() && bpm > 0.0 {
        Ok(bpm)
    } else {
        Err(StudioError::InvalidTempo {
            bpm,
            location: ErrorLocation::from(Location::caller()),
        })
    }
}

/// Seconds in one bar at `bpm`.
#[inline]
pub fn bar_duration(bpm: f64) -> f64 {
    60.0 / bpm * BEATS_PER_BAR
}

/// Number of bars needed to cover `duration` seconds, counting a partial bar.
pub fn bar_count(duration: f64, bpm: f64) -> u32 {
    if duration <= 0.0 {
        return 0;
    }
    (duration / bar_duration(bpm)).ceil() as u32
}

/// A vertical marker drawn every few bars.
#[derive(Debug, Clone, PartialEq)]
pub struct Gridline {
    /// Bar number the line sits on.
    pub bar: u32,
    /// Horizontal position in logical pixels.
    pub x: f32,
    /// Text drawn next to the line.
    pub label: String,
}

/// Bar layout of a track at a given tempo.
#[derive(Debug, Clone, PartialEq)]
pub struct BarGrid {
    bpm: f64,
    duration: f64,
    bars_per_gridline: u32,
}

impl BarGrid {
    /// Grid for a track of `duration` seconds.
    ///
    /// `bars_per_gridline` of zero is treated as one.
    pub fn new(duration: f64, bpm: f64, bars_per_gridline: u32) -> Self {
        Self {
            bpm,
            duration,
            bars_per_gridline: bars_per_gridline.max(1),
        }
    }

    /// Tempo in beats per minute.
    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    /// Seconds per bar.
    pub fn bar_duration(&self) -> f64 {
        bar_duration(self.bpm)
    }

    /// Total bars, rounded up.
    pub fn bar_count(&self) -> u32 {
        bar_count(self.duration, self.bpm)
    }

    /// Gridlines at every multiple of `bars_per_gridline` strictly inside the track.
    pub fn gridlines(&self, width: f32) -> Vec<Gridline> {
        if self.duration <= 0.0 {
            return Vec::new();
        }

        let total = self.bar_count();
        let step = self.bars_per_gridline as usize;

        (self.bars_per_gridline..total)
            .step_by(step)
            .map(|bar| {
                let seconds = f64::from(bar) * self.bar_duration();
                Gridline {
                    bar,
                    x: (seconds / self.duration * f64::from(width)) as f32,
                    label: format!("{bar} bars"),
                }
            })
            .collect()
    }
}
