use karaoke_studio_core::{AudioTrack, CoreResult};

use uuid::Uuid;

/// Results sent from background tasks to the UI thread.
#[derive(Debug)]
pub enum AppCommand {
    /// A track decode finished.
    TrackDecoded {
        /// Load request the result belongs to.
        load_id: Uuid,
        /// File name shown to the user.
        name: String,
        /// Decoded track or the decode error.
        result: CoreResult<AudioTrack>,
    },
}
