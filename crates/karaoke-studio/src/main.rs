//! Karaoke Studio: load a backing track, see its bar grid, and record
//! yourself on camera in sync with it.

mod app;
mod app_command;
mod config;
mod error;
mod logging;
mod media;
#[cfg(test)]
mod tests;
mod ui;

pub(crate) use {
    app::StudioApp,
    app_command::AppCommand,
    error::{AppError, Result as AppResult},
};

use crate::{
    config::Config,
    media::{FrameSlot, GstCamera, GstDecoder, GstVideoSurface, TempClipStore},
    ui::DialogNotifier,
};

use std::{panic::Location, sync::Arc};

use error_location::ErrorLocation;
use gstreamer as gst;
use karaoke_studio_core::{
    StudioController, StudioDevices,
    audio::{CpalOutput, output_device_names},
    transport::MonotonicClock,
};
use tracing::{error, info};

const WINDOW_TITLE: &str = "Karaoke Studio";
const WINDOW_SIZE: [f32; 2] = [960.0, 720.0];

/// Application entry point.
fn main() {
    if let Err(e) = logging::init_logging() {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load config: {:?}", e);
            std::process::exit(1);
        }
    };

    let app = match build_app(config) {
        Ok(app) => app,
        Err(e) => {
            error!("Failed to start studio: {:?}", e);
            std::process::exit(1);
        }
    };

    let native_options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_title(WINDOW_TITLE)
            .with_inner_size(WINDOW_SIZE),
        ..Default::default()
    };

    if let Err(e) = eframe::run_native(
        WINDOW_TITLE,
        native_options,
        Box::new(|_cc| Ok(Box::new(app))),
    ) {
        error!("Window error: {:?}", e);
        std::process::exit(1);
    }

    info!("Karaoke Studio exited");
}

/// Wire the native ports into a controller and wrap it in the window.
#[track_caller]
fn build_app(config: Config) -> AppResult<StudioApp> {
    gst::init().map_err(|e| AppError::MediaError {
        reason: format!("Failed to initialize GStreamer: {}", e),
        location: ErrorLocation::from(Location::caller()),
    })?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("karaoke-worker")
        .build()?;

    let frames = FrameSlot::new();
    info!(outputs = ?output_device_names(), "Audio output devices");
    let audio = CpalOutput::new(config.audio.selected_device.as_deref())?;

    let devices = StudioDevices {
        audio: Box::new(audio),
        camera: Box::new(GstCamera::new(config.camera.clone(), frames.clone())),
        video: Box::new(GstVideoSurface::new(frames.clone())),
        clips: Box::new(TempClipStore::new()?),
        notifier: Box::new(DialogNotifier::new()),
        clock: Box::new(MonotonicClock::new()),
    };

    let studio = StudioController::new(devices, config.studio_settings());
    info!(
        bpm = config.studio.default_bpm,
        countdown = config.studio.countdown_enabled,
        camera = %config.camera.source,
        "Studio ready"
    );

    Ok(StudioApp::new(
        studio,
        config,
        runtime,
        Arc::new(GstDecoder::new()),
        frames,
    ))
}
