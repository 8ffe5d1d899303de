use crossbeam_channel::{Receiver, Sender};
use serde::Serialize;

use crate::error::WidgetError;
use crate::overlay::frame_loop::{FrameClock, FrameLoop, StopHandle};
use crate::overlay::surface::DrawSurface;
use crate::overlay::types::OverlayStyle;
use crate::overlay::{OverlayAnimator, TickOutcome};
use crate::player::events::WidgetEvent;
use crate::player::ports::{
    FullscreenHost, HLS_MIME, MediaElement, Notifier, StreamingTransport, VolumeStore,
};
use crate::player::types::ControlsView;
use crate::player::{Collaborators, PlayerCoordinator};

/// How the source ended up attached to the media element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackPath {
    /// Adaptive transport loaded the manifest and feeds the element.
    Transport,
    /// The element plays the manifest itself; no quality menu or recovery.
    Native,
}

/// Collects the widget's collaborators and validates them at build time.
pub struct WidgetBuilder<S: DrawSurface> {
    media: Option<Box<dyn MediaElement>>,
    transport: Option<Box<dyn StreamingTransport>>,
    volume_store: Option<Box<dyn VolumeStore>>,
    fullscreen: Option<Box<dyn FullscreenHost>>,
    notifier: Option<Box<dyn Notifier>>,
    surface: Option<S>,
    style: OverlayStyle,
    source: Option<String>,
    events_tx: Sender<WidgetEvent>,
    events_rx: Receiver<WidgetEvent>,
}

impl<S: DrawSurface> Default for WidgetBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: DrawSurface> WidgetBuilder<S> {
    pub fn new() -> Self {
        let (events_tx, events_rx) = crossbeam_channel::unbounded();
        Self {
            media: None,
            transport: None,
            volume_store: None,
            fullscreen: None,
            notifier: None,
            surface: None,
            style: OverlayStyle::default(),
            source: None,
            events_tx,
            events_rx,
        }
    }

    /// Sender for the widget's event queue, for collaborators that post
    /// notifications before the widget exists.
    pub fn event_sender(&self) -> Sender<WidgetEvent> {
        self.events_tx.clone()
    }

    pub fn media(mut self, media: impl MediaElement + 'static) -> Self {
        self.media = Some(Box::new(media));
        self
    }

    pub fn transport(mut self, transport: impl StreamingTransport + 'static) -> Self {
        self.transport = Some(Box::new(transport));
        self
    }

    pub fn volume_store(mut self, store: impl VolumeStore + 'static) -> Self {
        self.volume_store = Some(Box::new(store));
        self
    }

    pub fn fullscreen(mut self, host: impl FullscreenHost + 'static) -> Self {
        self.fullscreen = Some(Box::new(host));
        self
    }

    pub fn notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Some(Box::new(notifier));
        self
    }

    pub fn surface(mut self, surface: S) -> Self {
        self.surface = Some(surface);
        self
    }

    pub fn style(mut self, style: OverlayStyle) -> Self {
        self.style = style;
        self
    }

    pub fn source(mut self, url: impl Into<String>) -> Self {
        self.source = Some(url.into());
        self
    }

    /// Attach the source, sync the controls and start the overlay.
    pub fn build<C: FrameClock>(self, clock: C) -> Result<PlayerWidget<C, S>, WidgetError> {
        let mut media = self.media.ok_or(WidgetError::MissingComponent("media element"))?;
        let volume_store = self
            .volume_store
            .ok_or(WidgetError::MissingComponent("volume store"))?;
        let fullscreen = self
            .fullscreen
            .ok_or(WidgetError::MissingComponent("fullscreen container"))?;
        let notifier = self.notifier.ok_or(WidgetError::MissingComponent("notifier"))?;
        let surface = self.surface.ok_or(WidgetError::MissingComponent("overlay canvas"))?;
        let source = self.source.ok_or(WidgetError::MissingComponent("video source"))?;

        let (path, transport) = attach_source(&source, media.as_mut(), self.transport)?;
        log::info!("Attached {source} via {path:?} playback");

        let mut coordinator = PlayerCoordinator::new(Collaborators {
            media,
            transport,
            volume_store,
            fullscreen,
            notifier,
        });
        coordinator.initialize();

        let animator = OverlayAnimator::new(surface, self.style, coordinator.playback_flag());
        let stop = animator.stop_handle();
        let frames = FrameLoop::start(clock, animator);

        Ok(PlayerWidget {
            coordinator,
            frames,
            stop,
            path,
            events_tx: self.events_tx,
            events_rx: self.events_rx,
        })
    }
}

/// Prefer the streaming transport; fall back to the element's own HLS
/// support; otherwise there is no way to play the source.
fn attach_source(
    url: &str,
    media: &mut dyn MediaElement,
    transport: Option<Box<dyn StreamingTransport>>,
) -> Result<(PlaybackPath, Option<Box<dyn StreamingTransport>>), WidgetError> {
    if let Some(mut transport) = transport.filter(|t| t.is_supported()) {
        transport.load_source(url)?;
        transport.attach_media()?;
        return Ok((PlaybackPath::Transport, Some(transport)));
    }
    if media.can_play_type(HLS_MIME) {
        media.set_source(url)?;
        return Ok((PlaybackPath::Native, None));
    }
    Err(WidgetError::NoPlaybackPath {
        url: url.to_string(),
    })
}

/// A fully wired player: control coordinator, event queue and overlay loop.
pub struct PlayerWidget<C: FrameClock, S: DrawSurface> {
    coordinator: PlayerCoordinator,
    frames: FrameLoop<C, S>,
    stop: StopHandle,
    path: PlaybackPath,
    events_tx: Sender<WidgetEvent>,
    events_rx: Receiver<WidgetEvent>,
}

impl<C: FrameClock, S: DrawSurface> PlayerWidget<C, S> {
    pub fn sender(&self) -> Sender<WidgetEvent> {
        self.events_tx.clone()
    }

    /// Queue an event behind anything already pending.
    pub fn post(&self, event: impl Into<WidgetEvent>) {
        // Both channel ends live in `self`, so the send cannot fail.
        let _ = self.events_tx.send(event.into());
    }

    /// Handle queued events in arrival order, including any posted while
    /// handling. Returns how many were handled.
    pub fn dispatch_pending(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            log::trace!("Dispatching {event:?}");
            self.coordinator.handle(&event);
            handled += 1;
        }
        handled
    }

    /// Run the overlay's pending frame, if any.
    pub fn frame(&mut self) -> Option<TickOutcome> {
        self.frames.pump()
    }

    /// Stop the overlay. Nothing further is drawn or scheduled.
    pub fn teardown(&mut self) {
        log::debug!("Stopping overlay");
        self.stop.stop();
    }

    pub fn view(&self) -> &ControlsView {
        self.coordinator.view()
    }

    pub fn coordinator(&self) -> &PlayerCoordinator {
        &self.coordinator
    }

    pub fn overlay(&self) -> &OverlayAnimator<S> {
        self.frames.animator()
    }

    pub fn clock(&self) -> &C {
        self.frames.clock()
    }

    pub fn is_animating(&self) -> bool {
        self.frames.is_running()
    }

    pub fn playback_path(&self) -> PlaybackPath {
        self.path
    }
}
