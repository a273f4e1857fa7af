use crate::ui::waveform_view::{PaintOp, paint_ops, playhead_op, to_color32};

use eframe::egui::{Color32, Pos2, Rect, Vec2};
use karaoke_studio_core::{
    AudioTrack,
    waveform::{BarGrid, PLAYHEAD, Rgba, SurfaceSize, WaveformScene},
};

fn scene(seconds: f64, width: f32) -> WaveformScene {
    let rate = 1_000;
    let samples = vec![0.25; (seconds * f64::from(rate)) as usize];
    let track = AudioTrack::from_planar("tone.wav", rate, vec![samples]).unwrap();
    let grid = BarGrid::new(track.duration(), 120.0, 8);
    WaveformScene::build(
        &track,
        &grid,
        SurfaceSize {
            width,
            height: 100.0,
            pixel_ratio: 1.0,
        },
    )
}

/// WHAT: Core colours map to the same egui colours
/// WHY: The trace and gridlines must keep their palette on screen
#[test]
fn given_core_colour_when_converting_then_channels_preserved() {
    assert_eq!(to_color32(Rgba(10, 20, 30, 255)), Color32::from_rgb(10, 20, 30));
    assert_eq!(
        to_color32(Rgba(255, 255, 255, 90)),
        Color32::from_rgba_unmultiplied(255, 255, 255, 90)
    );
}

/// WHAT: The background clear becomes a panel-sized rectangle painted first
/// WHY: Each repaint must wipe the previous playhead
#[test]
fn given_scene_when_translating_then_first_op_fills_panel() {
    // Given: A 10s scene on a 300x100 surface
    let scene = scene(10.0, 300.0);

    // When: Translating
    let ops = paint_ops(&scene);

    // Then: Full-size rect first, then one column rect per pixel
    assert_eq!(ops.len(), scene.commands().len());
    match &ops[0] {
        PaintOp::Rect { rect, .. } => {
            assert_eq!(*rect, Rect::from_min_size(Pos2::ZERO, Vec2::new(300.0, 100.0)));
        }
        other => panic!("expected background rect, got {other:?}"),
    }
    let columns = ops
        .iter()
        .skip(1)
        .filter(|op| matches!(op, PaintOp::Rect { .. }))
        .count();
    assert_eq!(columns, 300);
}

/// WHAT: Gridlines become a line plus a label
/// WHY: Every eighth bar is marked and annotated
#[test]
fn given_long_scene_when_translating_then_gridline_and_label() {
    // Given: 40s at 120 BPM = 20 bars, gridlines at 8 and 16
    let scene = scene(40.0, 400.0);

    // When: Translating
    let ops = paint_ops(&scene);

    // Then: Two lines, labelled "8 bars" and "16 bars"
    let lines: Vec<f32> = ops
        .iter()
        .filter_map(|op| match op {
            PaintOp::Line { x, .. } => Some(*x),
            _ => None,
        })
        .collect();
    assert_eq!(lines, vec![160.0, 320.0]);

    let labels: Vec<&str> = ops
        .iter()
        .filter_map(|op| match op {
            PaintOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(labels, vec!["8 bars", "16 bars"]);
}

/// WHAT: The playhead is a line in the playhead colour
/// WHY: It must stand out from the grey gridlines
#[test]
fn given_position_when_building_playhead_then_coloured_line() {
    // When: Building the playhead at x = 42
    let op = playhead_op(42.0);

    // Then: A line at 42 in PLAYHEAD colour
    match op {
        PaintOp::Line { x, stroke } => {
            assert_eq!(x, 42.0);
            assert_eq!(stroke.color, to_color32(PLAYHEAD));
        }
        other => panic!("expected line, got {other:?}"),
    }
}
