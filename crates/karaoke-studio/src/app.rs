use crate::{AppCommand, config::Config, media::FrameSlot, ui::waveform_view};

use std::{
    panic::Location,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use eframe::egui;
use error_location::ErrorLocation;
use karaoke_studio_core::{
    AudioTrack, CoreResult, StudioController, StudioError, StudioState,
    host::TrackDecoder,
    transport::FrameRequest,
};
use rfd::FileDialog;
use tokio::{runtime::Runtime, sync::mpsc};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

const AUDIO_EXTENSIONS: [&str; 7] = ["mp3", "wav", "ogg", "flac", "m4a", "aac", "opus"];
const FRAME_INTERVAL: Duration = Duration::from_millis(16);
const COMMAND_CHANNEL_SIZE: usize = 8;
const MIN_BPM: f64 = 20.0;
const MAX_BPM: f64 = 300.0;

/// The studio window.
///
/// Owns the controller and runs it on the UI thread. Decoding runs on the
/// tokio runtime and reports back through `command_rx`.
pub struct StudioApp {
    studio: StudioController,
    config: Config,
    runtime: Runtime,
    decoder: Arc<dyn TrackDecoder>,
    command_tx: mpsc::Sender<AppCommand>,
    command_rx: mpsc::Receiver<AppCommand>,
    pending_load: Option<Uuid>,
    frames: FrameSlot,
    texture: Option<egui::TextureHandle>,
    texture_generation: u64,
    bpm_input: f64,
    track_label: Option<String>,
}

impl StudioApp {
    /// Window around `studio`. `frames` is the slot the video pane writes to.
    pub fn new(
        studio: StudioController,
        config: Config,
        runtime: Runtime,
        decoder: Arc<dyn TrackDecoder>,
        frames: FrameSlot,
    ) -> Self {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_CHANNEL_SIZE);
        let bpm_input = studio.settings().bpm;
        Self {
            studio,
            config,
            runtime,
            decoder,
            command_tx,
            command_rx,
            pending_load: None,
            frames,
            texture: None,
            texture_generation: 0,
            bpm_input,
            track_label: None,
        }
    }

    // -------------------------------
    // MARK: Track loading
    // -------------------------------

    fn pick_track(&mut self, ctx: &egui::Context) {
        let Some(path) = FileDialog::new()
            .set_title("Choose a backing track")
            .add_filter("Audio", &AUDIO_EXTENSIONS)
            .pick_file()
        else {
            return;
        };
        self.load_track(ctx, path);
    }

    #[instrument(skip(self, ctx))]
    fn load_track(&mut self, ctx: &egui::Context, path: PathBuf) {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "track".to_string());
        let load_id = Uuid::new_v4();

        self.pending_load = Some(load_id);
        self.studio.begin_track_load();
        info!(load_id = %load_id, track = %name, "Loading track");

        let decoder = Arc::clone(&self.decoder);
        let tx = self.command_tx.clone();
        let ctx = ctx.clone();

        self.runtime.spawn(async move {
            let task_name = name.clone();
            let result = tokio::task::spawn_blocking(move || {
                read_and_decode(decoder.as_ref(), &task_name, &path)
            })
            .await
            .unwrap_or_else(|e| {
                Err(StudioError::DecodeFailed {
                    reason: format!("Decode task failed: {}", e),
                    location: ErrorLocation::from(Location::caller()),
                })
            });

            if tx
                .send(AppCommand::TrackDecoded {
                    load_id,
                    name,
                    result,
                })
                .await
                .is_err()
            {
                warn!(load_id = %load_id, "UI closed before decode finished");
            }
            ctx.request_repaint();
        });
    }

    fn drain_commands(&mut self) {
        while let Ok(command) = self.command_rx.try_recv() {
            match command {
                AppCommand::TrackDecoded {
                    load_id,
                    name,
                    result,
                } => {
                    if self.pending_load != Some(load_id) {
                        debug!(load_id = %load_id, "Ignoring stale decode result");
                        continue;
                    }
                    self.pending_load = None;
                    match self.studio.finish_track_load(result) {
                        Ok(()) => {
                            info!(track = %name, "Track ready");
                            self.track_label = Some(name);
                        }
                        Err(e) => {
                            error!(track = %name, error = ?e, "Track load failed");
                            self.track_label = None;
                        }
                    }
                }
            }
        }
    }

    // -------------------------------
    // MARK: Panels
    // -------------------------------

    fn transport_bar(&mut self, ui: &mut egui::Ui) {
        let controls = self.studio.controls();

        ui.horizontal(|ui| {
            if ui
                .add_enabled(controls.load, egui::Button::new("📂 Load"))
                .clicked()
            {
                self.pick_track(ui.ctx());
            }
            if ui
                .add_enabled(controls.play, egui::Button::new("▶ Play"))
                .clicked()
            {
                log_failure("Play", self.studio.play());
            }
            if ui
                .add_enabled(controls.stop, egui::Button::new("⏹ Stop"))
                .clicked()
            {
                log_failure("Stop", self.studio.stop());
            }
            if ui
                .add_enabled(controls.record, egui::Button::new("⏺ Record"))
                .clicked()
            {
                log_failure("Record", self.studio.request_recording());
            }

            ui.separator();
            ui.label("Tempo");
            let tempo = ui.add_enabled(
                controls.tempo,
                egui::DragValue::new(&mut self.bpm_input)
                    .range(MIN_BPM..=MAX_BPM)
                    .speed(0.5)
                    .suffix(" BPM"),
            );
            if tempo.changed() {
                if let Err(e) = self.studio.set_bpm(self.bpm_input) {
                    warn!(error = ?e, "Tempo rejected");
                    self.bpm_input = self.studio.settings().bpm;
                }
            }

            if let Some(scene) = self.studio.scene() {
                ui.separator();
                ui.label(format!("{} bars", scene.bar_count()));
            }

            if self.studio.rec_indicator_visible() {
                ui.colored_label(egui::Color32::RED, "● REC");
            }
        });

        match (&self.track_label, self.studio.is_loading()) {
            (_, true) => ui.label("Decoding…"),
            (Some(name), false) => ui.label(name.as_str()),
            (None, false) => ui.label("No track loaded"),
        };
    }

    fn refresh_texture(&mut self, ctx: &egui::Context) {
        let generation = self.frames.generation();
        if generation == self.texture_generation {
            return;
        }
        self.texture_generation = generation;
        self.texture = self.frames.snapshot().map(|frame| {
            let image = egui::ColorImage::from_rgba_unmultiplied(
                [frame.width as usize, frame.height as usize],
                &frame.data,
            );
            ctx.load_texture("video_pane", image, egui::TextureOptions::LINEAR)
        });
    }

    fn video_pane(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            if let Some(step) = self.studio.countdown_step() {
                ui.label(egui::RichText::new(step.label()).size(64.0).strong());
            }

            match &self.texture {
                Some(texture) => {
                    ui.add(egui::Image::new(texture).shrink_to_fit());
                }
                None => {
                    ui.label("No video");
                }
            }
        });

        let Some(position) = self.studio.video_position() else {
            return;
        };

        let state = self.studio.state();
        let duration = self.studio.track().map_or(0.0, |t| t.duration());

        ui.horizontal(|ui| {
            if ui
                .add_enabled(state == StudioState::Idle, egui::Button::new("▶"))
                .clicked()
            {
                log_failure("Clip play", self.studio.on_video_play());
            }
            if ui
                .add_enabled(state == StudioState::SlavePlaying, egui::Button::new("⏸"))
                .clicked()
            {
                self.studio.on_video_pause();
            }

            let mut scrub = position.min(duration);
            let slider = egui::Slider::new(&mut scrub, 0.0..=duration)
                .show_value(false)
                .text(format!("{:.1}s", position));
            if ui.add(slider).changed() {
                log_failure("Clip seek", self.studio.on_video_seek(scrub));
            }
        });
    }

    fn schedule_frame(&mut self, ctx: &egui::Context) {
        let request = self.studio.tick();
        if request == FrameRequest::Continue {
            ctx.request_repaint_after(FRAME_INTERVAL);
        } else if self.studio.state() != StudioState::Idle || self.studio.is_loading() {
            ctx.request_repaint_after(FRAME_INTERVAL * 4);
        }
    }
}

impl eframe::App for StudioApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_commands();
        self.schedule_frame(ctx);
        self.refresh_texture(ctx);

        let waveform_height = self.config.waveform.height;

        egui::TopBottomPanel::top("transport_panel").show(ctx, |ui| {
            self.transport_bar(ui);
        });

        egui::TopBottomPanel::bottom("waveform_panel")
            .exact_height(waveform_height + 8.0)
            .show(ctx, |ui| {
                if let Err(e) = waveform_view::show(ui, &mut self.studio, waveform_height) {
                    debug!(error = ?e, "Waveform interaction failed");
                }
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.video_pane(ui);
        });
    }
}

impl Drop for StudioApp {
    fn drop(&mut self) {
        self.studio.shutdown();

        let bpm = self.studio.settings().bpm;
        if (bpm - self.config.studio.default_bpm).abs() > f64::EPSILON {
            self.config.studio.default_bpm = bpm;
            if let Err(e) = self.config.save() {
                error!(error = ?e, "Failed to save tempo");
            }
        }
    }
}

#[track_caller]
fn read_and_decode(decoder: &dyn TrackDecoder, name: &str, path: &Path) -> CoreResult<AudioTrack> {
    let bytes = std::fs::read(path).map_err(|e| StudioError::DecodeFailed {
        reason: format!("Failed to read {}: {}", path.display(), e),
        location: ErrorLocation::from(Location::caller()),
    })?;
    decoder.decode(name, &bytes)
}

fn log_failure(action: &str, result: CoreResult<()>) {
    if let Err(e) = result {
        error!(action, error = ?e, "Studio action failed");
    }
}
