/// Seconds each numbered step is shown.
pub const STEP_SECONDS: f64 = 1.0;

/// Seconds the final "GO" is held.
pub const GO_SECONDS: f64 = 0.5;

/// What the countdown overlay shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownStep {
    /// A number counting down to one.
    Number(u32),
    /// The final cue.
    Go,
}

impl CountdownStep {
    /// Overlay text.
    pub fn label(&self) -> String {
        match self {
            CountdownStep::Number(n) => n.to_string(),
            CountdownStep::Go => "GO".to_string(),
        }
    }
}

/// A `N, …, 2, 1, GO` lead-in before recording.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Countdown {
    from: u32,
    started_at: f64,
}

impl Countdown {
    /// Countdown from `from` starting at clock time `started_at`.
    pub fn new(from: u32, started_at: f64) -> Self {
        Self { from, started_at }
    }

    /// Total length in seconds.
    pub fn total_seconds(&self) -> f64 {
        f64::from(self.from) * STEP_SECONDS + GO_SECONDS
    }

    /// Step visible at `now`, or `None` once finished.
    pub fn step_at(&self, now: f64) -> Option<CountdownStep> {
        let elapsed = (now - self.started_at).max(0.0);
        let numbers = f64::from(self.from) * STEP_SECONDS;

        if elapsed < numbers {
            let index = (elapsed / STEP_SECONDS) as u32;
            Some(CountdownStep::Number(self.from - index))
        } else if elapsed < numbers + GO_SECONDS {
            Some(CountdownStep::Go)
        } else {
            None
        }
    }

    /// True once the final step has been held.
    pub fn is_finished(&self, now: f64) -> bool {
        now - self.started_at >= self.total_seconds()
    }
}

/// Blinking "recording" indicator: visible for one second, hidden for one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecIndicator {
    started_at: f64,
}

impl RecIndicator {
    /// Indicator that starts visible at `started_at`.
    pub fn new(started_at: f64) -> Self {
        Self { started_at }
    }

    /// Whether the indicator is lit at `now`.
    pub fn is_visible(&self, now: f64) -> bool {
        let elapsed = (now - self.started_at).max(0.0);
        (elapsed as u64) % 2 == 0
    }
}
