#![allow(clippy::unwrap_used, clippy::panic)]

mod clip_store;
mod waveform_view;
