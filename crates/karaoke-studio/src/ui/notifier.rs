use karaoke_studio_core::host::Notifier;

use rfd::{MessageButtons, MessageDialog, MessageLevel};
use tracing::warn;

const DIALOG_TITLE: &str = "Karaoke Studio";

/// Shows alerts as native modal dialogs.
#[derive(Debug, Default, Clone, Copy)]
pub struct DialogNotifier;

impl DialogNotifier {
    /// New notifier.
    pub fn new() -> Self {
        Self
    }
}

impl Notifier for DialogNotifier {
    fn alert(&mut self, message: &str) {
        warn!(message, "Alerting user");
        let _ = MessageDialog::new()
            .set_level(MessageLevel::Warning)
            .set_title(DIALOG_TITLE)
            .set_description(message)
            .set_buttons(MessageButtons::Ok)
            .show();
    }
}
