use crate::{
    AudioTrack,
    waveform::{BarGrid, envelope},
};

use tracing::{debug, instrument};

/// RGBA colour, straight alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba(pub u8, pub u8, pub u8, pub u8);

/// Background fill.
pub const BACKGROUND: Rgba = Rgba(24, 24, 28, 255);
/// Waveform trace.
pub const TRACE: Rgba = Rgba(80, 200, 255, 255);
/// Bar gridline.
pub const GRIDLINE: Rgba = Rgba(255, 255, 255, 90);
/// Gridline label.
pub const LABEL: Rgba = Rgba(220, 220, 220, 255);
/// Playhead marker.
pub const PLAYHEAD: Rgba = Rgba(255, 64, 64, 255);

/// Logical size of the drawing surface and its device pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSize {
    /// Width in logical pixels.
    pub width: f32,
    /// Height in logical pixels.
    pub height: f32,
    /// Physical pixels per logical pixel.
    pub pixel_ratio: f32,
}

impl SurfaceSize {
    /// Number of physical pixel columns backing the surface.
    pub fn backing_columns(&self) -> usize {
        (self.width * self.pixel_ratio.max(1.0)).round().max(0.0) as usize
    }

    /// True when nothing can be drawn.
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// One primitive in logical coordinates, origin top-left.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Wipe the whole surface with a colour.
    Clear(Rgba),
    /// Axis-aligned filled rectangle.
    FillRect {
        /// Left edge.
        x: f32,
        /// Top edge.
        y: f32,
        /// Width.
        w: f32,
        /// Height.
        h: f32,
        /// Fill colour.
        color: Rgba,
    },
    /// Vertical line spanning the full height.
    VLine {
        /// Horizontal position.
        x: f32,
        /// Stroke width.
        width: f32,
        /// Stroke colour.
        color: Rgba,
    },
    /// Text anchored at its top-left corner.
    Text {
        /// Left edge.
        x: f32,
        /// Top edge.
        y: f32,
        /// The text.
        text: String,
        /// Text colour.
        color: Rgba,
    },
}

/// A fully built waveform picture, replayed by the display surface.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveformScene {
    size: SurfaceSize,
    commands: Vec<DrawCommand>,
    bar_count: u32,
}

impl WaveformScene {
    /// Build the scene for `track` on a surface of `size`.
    ///
    /// Draws one min/max segment per physical column of channel 0, then a
    /// labelled gridline every `grid`-configured number of bars.
    #[instrument(skip(track, grid), fields(track = track.name()))]
    pub fn build(track: &AudioTrack, grid: &BarGrid, size: SurfaceSize) -> Self {
        let mut commands = vec![DrawCommand::Clear(BACKGROUND)];

        if size.is_empty() {
            return Self {
                size,
                commands,
                bar_count: grid.bar_count(),
            };
        }

        let columns = size.backing_columns();
        let column_width = size.width / columns.max(1) as f32;
        let amp = size.height / 2.0;
        let samples = track.channel(0).unwrap_or_default();

        for (i, extent) in envelope(samples, columns).iter().enumerate() {
            let top = (1.0 - extent.max) * amp;
            let bottom = (1.0 - extent.min) * amp;
            commands.push(DrawCommand::FillRect {
                x: i as f32 * column_width,
                y: top,
                w: column_width,
                // keep silent stretches visible as a hairline
                h: (bottom - top).max(1.0 / size.pixel_ratio.max(1.0)),
                color: TRACE,
            });
        }

        let gridlines = grid.gridlines(size.width);
        for line in &gridlines {
            commands.push(DrawCommand::VLine {
                x: line.x,
                width: 1.0,
                color: GRIDLINE,
            });
            commands.push(DrawCommand::Text {
                x: line.x + 4.0,
                y: 4.0,
                text: line.label.clone(),
                color: LABEL,
            });
        }

        debug!(
            columns,
            gridlines = gridlines.len(),
            bar_count = grid.bar_count(),
            "Waveform scene built"
        );

        Self {
            size,
            commands,
            bar_count: grid.bar_count(),
        }
    }

    /// Surface the scene was built for.
    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    /// Draw commands in paint order.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Total bars in the track.
    pub fn bar_count(&self) -> u32 {
        self.bar_count
    }
}
