use karaoke_studio_core::{ClipUrl, CoreResult, RecordedClip, StudioError, host::ClipStore};

use std::{collections::HashMap, fs, panic::Location, path::PathBuf};

use error_location::ErrorLocation;
use gstreamer as gst;
use tempfile::TempDir;
use tracing::{debug, info, instrument, warn};

/// Writes recorded clips to a private temp directory and hands out
/// `file://` URIs for them. The directory is removed on drop.
#[derive(Debug)]
pub struct TempClipStore {
    dir: TempDir,
    files: HashMap<ClipUrl, PathBuf>,
}

impl TempClipStore {
    /// Store backed by a fresh temp directory.
    #[track_caller]
    pub fn new() -> CoreResult<Self> {
        let dir = tempfile::Builder::new()
            .prefix("karaoke-clips-")
            .tempdir()
            .map_err(|e| StudioError::ClipStoreFailed {
                reason: format!("Failed to create clip directory: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;
        debug!(dir = %dir.path().display(), "Clip store ready");
        Ok(Self {
            dir,
            files: HashMap::new(),
        })
    }

    /// Path backing `url`, if it was published here.
    #[cfg(test)]
    pub fn path_of(&self, url: &ClipUrl) -> Option<&PathBuf> {
        self.files.get(url)
    }
}

impl ClipStore for TempClipStore {
    #[track_caller]
    #[instrument(skip(self, clip), fields(session = %clip.session_id(), bytes = clip.bytes().len()))]
    fn publish(&mut self, clip: &RecordedClip) -> CoreResult<ClipUrl> {
        let fail = |reason: String| StudioError::ClipStoreFailed {
            reason,
            location: ErrorLocation::from(Location::caller()),
        };

        let path = self
            .dir
            .path()
            .join(format!("clip-{}.webm", clip.session_id()));
        fs::write(&path, clip.bytes())
            .map_err(|e| fail(format!("Failed to write clip: {}", e)))?;

        let uri = gst::glib::filename_to_uri(&path, None)
            .map_err(|e| fail(format!("Failed to build clip URI: {}", e)))?;
        let url = ClipUrl::new(uri.as_str());

        self.files.insert(url.clone(), path);
        info!(clip = %url, mime = clip.mime_type(), held = self.files.len(), "Clip published");
        Ok(url)
    }

    #[instrument(skip(self), fields(clip = %url))]
    fn revoke(&mut self, url: &ClipUrl) {
        let Some(path) = self.files.remove(url) else {
            return;
        };
        match fs::remove_file(&path) {
            Ok(()) => debug!("Clip revoked"),
            Err(e) => warn!("Failed to remove clip file {}: {}", path.display(), e),
        }
    }
}
