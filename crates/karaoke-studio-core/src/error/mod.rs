use error_location::ErrorLocation;
use thiserror::Error;

/// Studio errors with source location tracking.
#[derive(Error, Debug)]
pub enum StudioError {
    /// An operation needed a loaded track and none was present.
    #[error("No audio track loaded {location}")]
    NoTrackLoaded {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The host cannot record video at all.
    #[error("Capability missing: {capability} {location}")]
    CapabilityMissing {
        /// Name of the missing capability.
        capability: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Camera or microphone access was refused.
    #[error("Camera access denied: {reason} {location}")]
    PermissionDenied {
        /// Description of why access failed.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The selected file could not be decoded as audio.
    #[error("Audio decode failed: {reason} {location}")]
    DecodeFailed {
        /// Description of the decode failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Decoded PCM data is unusable (no channels, ragged channels, zero rate).
    #[error("Invalid audio track: {reason} {location}")]
    InvalidTrack {
        /// Description of the problem.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Tempo must be a finite, positive number of beats per minute.
    #[error("Invalid tempo: {bpm} {location}")]
    InvalidTempo {
        /// The rejected tempo.
        bpm: f64,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Video capture failed after access was granted.
    #[error("Capture failed: {reason} {location}")]
    CaptureFailed {
        /// Description of the capture failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A recorded clip could not be published or loaded for playback.
    #[error("Clip store error: {reason} {location}")]
    ClipStoreFailed {
        /// Description of the failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Audio device operation failed.
    #[error("Audio device error: {reason} {location}")]
    DeviceError {
        /// Description of the device error.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Audio resampling failed.
    #[error("Resampling error: {reason} {location}")]
    ResamplingError {
        /// Description of the resampling error.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

impl StudioError {
    /// Short message suitable for a blocking alert.
    pub fn user_message(&self) -> String {
        match self {
            StudioError::NoTrackLoaded { .. } => "Load an audio track first.".to_string(),
            StudioError::CapabilityMissing { .. } => {
                "Video recording is not supported on this system.".to_string()
            }
            StudioError::PermissionDenied { .. } => {
                "Could not access camera. Make sure a camera is connected and access is allowed."
                    .to_string()
            }
            StudioError::DecodeFailed { .. } | StudioError::InvalidTrack { .. } => {
                "Could not decode audio file.".to_string()
            }
            StudioError::InvalidTempo { bpm, .. } => format!("Invalid tempo: {bpm} BPM."),
            StudioError::CaptureFailed { reason, .. } => format!("Recording failed: {reason}"),
            StudioError::ClipStoreFailed { reason, .. } => {
                format!("Could not prepare the recorded clip: {reason}")
            }
            StudioError::DeviceError { reason, .. } => format!("Audio device error: {reason}"),
            StudioError::ResamplingError { reason, .. } => format!("Audio error: {reason}"),
        }
    }
}

/// Result type alias using [`StudioError`].
pub type Result<T> = std::result::Result<T, StudioError>;
