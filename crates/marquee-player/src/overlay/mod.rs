pub mod frame_loop;
pub mod raster;
pub mod surface;
pub mod types;

use frame_loop::{FrameScheduler, StopHandle};
use surface::DrawSurface;
use types::{OverlayState, OverlayStyle};

use crate::player::types::PlaybackFlag;

/// Result of a single animation tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// The loop was stopped; nothing drawn, nothing rescheduled.
    Stopped,
    /// First tick: timestamp recorded, no movement.
    Primed,
    /// Frame drawn at `position`; `wrapped` if the text left the surface and
    /// was reset to the right edge this tick.
    Drawn { position: f64, wrapped: bool },
}

/// Scrolls one line of text right-to-left at a constant real-time speed.
///
/// Movement is driven by measured time between ticks, so traversal takes
/// `style.duration_secs` whatever the refresh rate. Position only changes
/// while the shared playback flag is set.
pub struct OverlayAnimator<S: DrawSurface> {
    surface: S,
    style: OverlayStyle,
    state: OverlayState,
    playback: PlaybackFlag,
    stop: StopHandle,
    frames_drawn: u64,
    wraps: u64,
}

impl<S: DrawSurface> OverlayAnimator<S> {
    pub fn new(mut surface: S, style: OverlayStyle, playback: PlaybackFlag) -> Self {
        apply_style(&mut surface, &style);
        let text_width = surface.measure_text(&style.text);
        let state = OverlayState::new(surface.width(), text_width, style.duration_secs);

        log::debug!(
            "Overlay initialized: text width {:.1}px, {:.1}px/s over {:.1}s",
            text_width,
            state.speed_per_sec,
            style.duration_secs
        );

        Self {
            surface,
            style,
            state,
            playback,
            stop: StopHandle::default(),
            frames_drawn: 0,
            wraps: 0,
        }
    }

    /// Request the first frame.
    pub fn start(&mut self, scheduler: &mut dyn FrameScheduler) {
        if !self.stop.is_stopped() {
            scheduler.request_frame();
        }
    }

    /// Advance and draw one frame. Called once per display refresh with a
    /// monotonically increasing timestamp in milliseconds.
    pub fn tick(&mut self, now_ms: f64, scheduler: &mut dyn FrameScheduler) -> TickOutcome {
        if self.stop.is_stopped() {
            return TickOutcome::Stopped;
        }

        // The interval before the first frame is unknown; just record it.
        let Some(last_ms) = self.state.last_tick_ms else {
            self.state.last_tick_ms = Some(now_ms);
            scheduler.request_frame();
            return TickOutcome::Primed;
        };

        let mut delta_secs = ((now_ms - last_ms) / 1000.0).max(0.0);
        if let Some(max) = self.style.max_frame_delta_secs {
            delta_secs = delta_secs.min(max);
        }

        let (w, h) = (self.surface.width(), self.surface.height());
        self.surface.clear_rect(0.0, 0.0, w, h);

        if self.playback.is_playing() {
            self.state.position -= self.state.speed_per_sec * delta_secs;
        }

        // Outline first so the fill sits on top of it.
        let (x, y) = (self.state.position, self.style.baseline_y as f64);
        self.surface.stroke_text(&self.style.text, x, y);
        self.surface.fill_text(&self.style.text, x, y);
        self.frames_drawn += 1;

        // Measured again: a late-loading font can change the width after init.
        let text_width = self.surface.measure_text(&self.style.text);
        let wrapped = self.state.position < -text_width;
        if wrapped {
            self.state.position = self.state.canvas_width;
            self.wraps += 1;
        }

        self.state.last_tick_ms = Some(now_ms);
        scheduler.request_frame();

        TickOutcome::Drawn {
            position: self.state.position,
            wrapped,
        }
    }

    /// Handle used to end the animation stream.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn position(&self) -> f64 {
        self.state.position
    }

    pub fn state(&self) -> &OverlayState {
        &self.state
    }

    pub fn style(&self) -> &OverlayStyle {
        &self.style
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    pub fn wraps(&self) -> u64 {
        self.wraps
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}

fn apply_style<S: DrawSurface>(surface: &mut S, style: &OverlayStyle) {
    surface.set_font(&style.font);
    surface.set_fill_color(style.fill);
    surface.set_stroke_color(style.stroke);
    surface.set_line_width(style.stroke_width);
}
