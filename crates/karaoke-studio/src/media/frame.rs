use std::sync::{
    Arc, Mutex,
    atomic::{AtomicU64, Ordering},
};

use gstreamer as gst;
use tracing::error;

/// One decoded RGBA video frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoFrame {
    /// Tightly packed RGBA pixels, row-major.
    pub data: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl VideoFrame {
    /// Copy a frame out of an RGBA appsink sample. Row padding is stripped.
    pub fn from_sample(sample: &gst::Sample) -> Option<Self> {
        let structure = sample.caps()?.structure(0)?;
        let width = u32::try_from(structure.get::<i32>("width").ok()?).ok()?;
        let height = u32::try_from(structure.get::<i32>("height").ok()?).ok()?;
        let buffer = sample.buffer()?;
        let map = buffer.map_readable().ok()?;

        Self::from_padded(map.as_slice(), width, height)
    }

    /// Build a frame from rows that may carry trailing padding.
    pub fn from_padded(bytes: &[u8], width: u32, height: u32) -> Option<Self> {
        let row = width as usize * 4;
        let rows = height as usize;
        if row == 0 || rows == 0 {
            return None;
        }
        let stride = bytes.len() / rows;
        if stride < row {
            return None;
        }

        let data = if stride == row {
            bytes[..row * rows].to_vec()
        } else {
            bytes
                .chunks(stride)
                .take(rows)
                .flat_map(|line| &line[..row])
                .copied()
                .collect()
        };

        Some(Self {
            data,
            width,
            height,
        })
    }
}

/// Latest frame shared between a GStreamer streaming thread and the UI.
///
/// Writers replace the frame; the UI re-uploads its texture only when the
/// generation moved.
#[derive(Debug, Clone, Default)]
pub struct FrameSlot {
    frame: Arc<Mutex<Option<VideoFrame>>>,
    generation: Arc<AtomicU64>,
}

impl FrameSlot {
    /// Empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new frame.
    pub fn publish(&self, frame: VideoFrame) {
        let mut slot = self.frame.lock().unwrap_or_else(|e| {
            error!("Frame slot lock poisoned, recovering: {}", e);
            e.into_inner()
        });
        *slot = Some(frame);
        self.generation.fetch_add(1, Ordering::AcqRel);
    }

    /// Drop the current frame.
    pub fn clear(&self) {
        let mut slot = self.frame.lock().unwrap_or_else(|e| e.into_inner());
        if slot.take().is_some() {
            self.generation.fetch_add(1, Ordering::AcqRel);
        }
    }

    /// Counter bumped on every change.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Copy of the current frame.
    pub fn snapshot(&self) -> Option<VideoFrame> {
        self.frame
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}
