//! Waveform rendering: min/max envelope plus a bar grid.

mod envelope;
mod grid;
mod scene;

pub use envelope::{ColumnExtent, envelope};
pub use grid::{
    BEATS_PER_BAR, BarGrid, DEFAULT_BARS_PER_GRIDLINE, DEFAULT_BPM, Gridline, bar_count,
    bar_duration, validate_bpm,
};
pub use scene::{DrawCommand, PLAYHEAD, Rgba, SurfaceSize, WaveformScene};
