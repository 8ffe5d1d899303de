use std::cell::Cell;
use std::rc::Rc;

use super::OverlayAnimator;
use super::TickOutcome;
use super::surface::DrawSurface;

/// Monotonic millisecond clock handed to frame callbacks.
pub trait FrameClock {
    fn now_ms(&self) -> f64;
}

/// Clock advanced by hand. Cloning shares the underlying time.
#[derive(Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now: Rc::new(Cell::new(start_ms)),
        }
    }

    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }

    pub fn set(&self, ms: f64) {
        self.now.set(ms);
    }
}

impl FrameClock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

/// "Call me again on the next display refresh."
pub trait FrameScheduler {
    fn request_frame(&mut self);
}

/// Scheduler that only remembers whether a frame was requested.
#[derive(Debug, Default)]
pub struct FrameRequests {
    pending: bool,
    total: u64,
}

impl FrameRequests {
    /// Consume the pending request, if any.
    pub fn take(&mut self) -> bool {
        std::mem::replace(&mut self.pending, false)
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn total(&self) -> u64 {
        self.total
    }
}

impl FrameScheduler for FrameRequests {
    fn request_frame(&mut self) {
        self.pending = true;
        self.total += 1;
    }
}

/// Shared stop signal for the animation stream.
#[derive(Clone, Default, Debug)]
pub struct StopHandle(Rc<Cell<bool>>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.set(true);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.get()
    }
}

/// Drives an [`OverlayAnimator`] from a clock, one requested frame at a time.
pub struct FrameLoop<C: FrameClock, S: DrawSurface> {
    clock: C,
    requests: FrameRequests,
    animator: OverlayAnimator<S>,
}

impl<C: FrameClock, S: DrawSurface> FrameLoop<C, S> {
    /// Wrap the animator and request its first frame.
    pub fn start(clock: C, mut animator: OverlayAnimator<S>) -> Self {
        let mut requests = FrameRequests::default();
        animator.start(&mut requests);
        Self {
            clock,
            requests,
            animator,
        }
    }

    /// Run the pending frame, if one was requested. Returns `None` when the
    /// loop has nothing scheduled (it was stopped).
    pub fn pump(&mut self) -> Option<TickOutcome> {
        if !self.requests.take() {
            return None;
        }
        let now = self.clock.now_ms();
        Some(self.animator.tick(now, &mut self.requests))
    }

    pub fn is_running(&self) -> bool {
        self.requests.is_pending()
    }

    pub fn animator(&self) -> &OverlayAnimator<S> {
        &self.animator
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}
