//! GStreamer-backed media ports: decoding, camera capture, clip playback
//! and clip storage.

mod camera;
mod clip_store;
mod decoder;
mod frame;
mod video_surface;

pub use {
    camera::GstCamera,
    clip_store::TempClipStore,
    decoder::GstDecoder,
    frame::{FrameSlot, VideoFrame},
    video_surface::GstVideoSurface,
};
