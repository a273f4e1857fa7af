//! The studio state machine and the ports it drives.

mod controller;
mod devices;
mod state;

pub use controller::StudioController;
pub use devices::{StudioDevices, StudioSettings};
pub use state::{Controls, StudioState};
