use std::fmt;

use uuid::Uuid;

/// Container format of recorded clips.
pub const CLIP_MIME_TYPE: &str = "video/webm";

/// Chunks accumulated while a recording is running.
#[derive(Debug, Clone)]
pub struct RecordingSession {
    id: Uuid,
    started_at: f64,
    chunks: Vec<Vec<u8>>,
}

impl RecordingSession {
    /// Empty session starting at clock time `started_at`.
    pub fn new(started_at: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at,
            chunks: Vec::new(),
        }
    }

    /// Session id used for log correlation.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Clock time the recording began.
    pub fn started_at(&self) -> f64 {
        self.started_at
    }

    /// Append a chunk. Empty chunks carry nothing and are skipped.
    pub fn push_chunk(&mut self, chunk: Vec<u8>) {
        if !chunk.is_empty() {
            self.chunks.push(chunk);
        }
    }

    /// Number of chunks kept so far.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Concatenate the chunks, in arrival order, into a clip.
    pub fn finish(self) -> RecordedClip {
        let chunk_count = self.chunks.len();
        let bytes = self.chunks.concat();
        RecordedClip {
            session_id: self.id,
            bytes,
            chunk_count,
        }
    }
}

/// A finished recording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedClip {
    session_id: Uuid,
    bytes: Vec<u8>,
    chunk_count: usize,
}

impl RecordedClip {
    /// Session that produced the clip.
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Encoded clip bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of chunks the clip was assembled from.
    pub fn chunk_count(&self) -> usize {
        self.chunk_count
    }

    /// Container MIME type.
    pub fn mime_type(&self) -> &'static str {
        CLIP_MIME_TYPE
    }
}

/// Temporary address of a published clip.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClipUrl(String);

impl ClipUrl {
    /// Wrap an address.
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    /// The address as text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClipUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
