//! egui front end.

mod notifier;
pub(crate) mod waveform_view;

pub(crate) use notifier::DialogNotifier;
