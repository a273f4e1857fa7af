use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

/// Cancellation flag shared between a scheduled frame task and its owner.
///
/// Cancelling is one-way; a cancelled token never becomes live again.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// A fresh, live token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Signal every holder to stop.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Whether [`cancel`](Self::cancel) has been called on any clone.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// What the host should do after running one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameRequest {
    /// Run another frame as soon as the display refreshes.
    Continue,
    /// Nothing is animating; wait for input.
    Idle,
}

/// Cooperative per-frame task driven by display refresh.
///
/// The host calls [`poll`](Self::poll) once per frame. A task only runs
/// while its token is live; scheduling a new task cancels the old one.
#[derive(Debug, Default)]
pub struct FrameLoop {
    token: Option<CancelToken>,
}

impl FrameLoop {
    /// Start a new task, cancelling any previous one.
    pub fn schedule(&mut self) -> CancelToken {
        self.cancel();
        let token = CancelToken::new();
        self.token = Some(token.clone());
        token
    }

    /// Cancel the running task, if any.
    pub fn cancel(&mut self) {
        if let Some(token) = self.token.take() {
            token.cancel();
        }
    }

    /// True while a live task is scheduled.
    pub fn is_active(&self) -> bool {
        self.token.as_ref().is_some_and(|t| !t.is_cancelled())
    }

    /// Check the token for this frame. Drops it once cancelled.
    pub fn poll(&mut self) -> FrameRequest {
        if self.is_active() {
            FrameRequest::Continue
        } else {
            self.token = None;
            FrameRequest::Idle
        }
    }
}
