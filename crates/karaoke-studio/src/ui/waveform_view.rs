use karaoke_studio_core::{
    CoreResult, StudioController,
    waveform::{DrawCommand, PLAYHEAD, Rgba, SurfaceSize, WaveformScene},
};

use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, Sense, Stroke, Vec2};
use tracing::warn;

const LABEL_FONT_SIZE: f32 = 12.0;
const PLAYHEAD_WIDTH: f32 = 2.0;

/// One egui painter call, relative to the panel's top-left corner.
#[derive(Debug, Clone, PartialEq)]
pub enum PaintOp {
    /// Filled rectangle.
    Rect {
        /// Rectangle in panel coordinates.
        rect: Rect,
        /// Fill colour.
        color: Color32,
    },
    /// Full-height vertical line at `x`.
    Line {
        /// Horizontal position.
        x: f32,
        /// Stroke.
        stroke: Stroke,
    },
    /// Left-top anchored label.
    Text {
        /// Anchor.
        pos: Pos2,
        /// Text.
        text: String,
        /// Colour.
        color: Color32,
    },
}

/// Convert a core colour.
pub fn to_color32(color: Rgba) -> Color32 {
    let Rgba(r, g, b, a) = color;
    Color32::from_rgba_unmultiplied(r, g, b, a)
}

/// Translate a scene into painter calls. `Clear` becomes a full-size rect.
pub fn paint_ops(scene: &WaveformScene) -> Vec<PaintOp> {
    let size = scene.size();
    scene
        .commands()
        .iter()
        .map(|command| match command {
            DrawCommand::Clear(color) => PaintOp::Rect {
                rect: Rect::from_min_size(Pos2::ZERO, Vec2::new(size.width, size.height)),
                color: to_color32(*color),
            },
            DrawCommand::FillRect { x, y, w, h, color } => PaintOp::Rect {
                rect: Rect::from_min_size(Pos2::new(*x, *y), Vec2::new(*w, *h)),
                color: to_color32(*color),
            },
            DrawCommand::VLine { x, width, color } => PaintOp::Line {
                x: *x,
                stroke: Stroke::new(*width, to_color32(*color)),
            },
            DrawCommand::Text { x, y, text, color } => PaintOp::Text {
                pos: Pos2::new(*x, *y),
                text: text.clone(),
                color: to_color32(*color),
            },
        })
        .collect()
}

/// Playhead marker on top of the waveform.
pub fn playhead_op(x: f32) -> PaintOp {
    PaintOp::Line {
        x,
        stroke: Stroke::new(PLAYHEAD_WIDTH, to_color32(PLAYHEAD)),
    }
}

/// Waveform panel: resizes the scene to the available space, paints it with
/// the playhead, and turns clicks into seeks.
pub fn show(ui: &mut egui::Ui, studio: &mut StudioController, height: f32) -> CoreResult<()> {
    let width = ui.available_width().max(1.0);
    let (response, painter) = ui.allocate_painter(Vec2::new(width, height), Sense::click());
    let rect = response.rect;

    studio.resize(SurfaceSize {
        width: rect.width(),
        height: rect.height(),
        pixel_ratio: ui.ctx().pixels_per_point(),
    });

    let Some(scene) = studio.scene() else {
        painter.rect_filled(rect, 0.0, Color32::from_gray(24));
        let hint = if studio.is_loading() {
            "Decoding…"
        } else {
            "Load an audio file to begin"
        };
        painter.text(
            rect.center(),
            Align2::CENTER_CENTER,
            hint,
            FontId::proportional(LABEL_FONT_SIZE),
            Color32::GRAY,
        );
        return Ok(());
    };

    let mut ops = paint_ops(scene);
    if let Some(x) = studio.playhead_x(rect.width()) {
        ops.push(playhead_op(x));
    }
    for op in &ops {
        paint(&painter, rect, op);
    }

    if response.clicked() {
        if let Some(pos) = response.interact_pointer_pos() {
            studio
                .seek_to_x(pos.x - rect.min.x, rect.width())
                .inspect_err(|e| warn!(error = ?e, "Waveform seek failed"))?;
        }
    }

    Ok(())
}

fn paint(painter: &egui::Painter, panel: Rect, op: &PaintOp) {
    let origin = panel.min.to_vec2();
    match op {
        PaintOp::Rect { rect, color } => {
            painter.rect_filled(rect.translate(origin), 0.0, *color);
        }
        PaintOp::Line { x, stroke } => {
            let x = panel.min.x + x;
            painter.line_segment(
                [Pos2::new(x, panel.min.y), Pos2::new(x, panel.max.y)],
                *stroke,
            );
        }
        PaintOp::Text { pos, text, color } => {
            painter.text(
                *pos + origin,
                Align2::LEFT_TOP,
                text,
                FontId::proportional(LABEL_FONT_SIZE),
                *color,
            );
        }
    }
}
