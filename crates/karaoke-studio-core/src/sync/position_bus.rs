use tracing::trace;

/// Two positions closer than this are the same seek.
pub const ECHO_TOLERANCE_SECONDS: f64 = 0.05;

/// Surface a position change came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionSource {
    /// A click on the waveform.
    Waveform,
    /// A gesture on the video pane.
    Video,
}

/// Single-direction position updates between the waveform and the video.
///
/// A gesture is published once with [`begin`](Self::begin); subscribers are
/// applied before [`end`](Self::end). Publishes arriving while one is being
/// applied are dropped, and a seek pushed onto the other surface may be
/// registered with [`expect_echo`](Self::expect_echo) so that surface's
/// answering notification is swallowed once.
#[derive(Debug, Default)]
pub struct PositionBus {
    applying: bool,
    pending_echo: Option<(PositionSource, f64)>,
}

impl PositionBus {
    /// Empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a position is currently being applied.
    pub fn is_applying(&self) -> bool {
        self.applying
    }

    /// Claim the bus for a change from `source` to `seconds`.
    ///
    /// Returns `false` when the change must be ignored: another change is
    /// being applied, or it is the echo of a seek this bus issued.
    pub fn begin(&mut self, source: PositionSource, seconds: f64) -> bool {
        if self.applying {
            trace!(?source, seconds, "Nested position change dropped");
            return false;
        }

        if let Some((echo_source, echo_seconds)) = self.pending_echo {
            if echo_source == source {
                self.pending_echo = None;
                if (echo_seconds - seconds).abs() <= ECHO_TOLERANCE_SECONDS {
                    trace!(?source, seconds, "Echo swallowed");
                    return false;
                }
            }
        }

        self.applying = true;
        true
    }

    /// Record that `target` was just moved to `seconds` on our behalf.
    pub fn expect_echo(&mut self, target: PositionSource, seconds: f64) {
        self.pending_echo = Some((target, seconds));
    }

    /// Forget an expected echo that never arrived.
    pub fn clear_echo(&mut self) {
        if let Some((source, seconds)) = self.pending_echo.take() {
            trace!(?source, seconds, "Stale echo cleared");
        }
    }

    /// Release the bus after applying a change.
    pub fn end(&mut self) {
        self.applying = false;
    }
}
