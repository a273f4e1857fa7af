#![allow(clippy::unwrap_used)]

mod audio;
mod fakes;
mod recorder;
mod track;
mod transport;
