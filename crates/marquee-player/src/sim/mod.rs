//! In-process stand-ins for the page collaborators, used by the session
//! replayer. Each posts the notifications a real page would into the
//! widget's event queue.

pub mod session;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crossbeam_channel::Sender;

use crate::error::{FullscreenError, MediaError, TransportError};
use crate::player::events::{MediaEvent, PageEvent, TransportEvent, WidgetEvent};
use crate::player::ports::{FullscreenHost, HLS_MIME, MediaElement, Notifier, StreamingTransport, VolumeStore};
use crate::player::types::QualityLevel;

/// Interval between `timeupdate` notifications while playing.
const TIME_UPDATE_INTERVAL_SECS: f64 = 0.25;

fn post(events: &Sender<WidgetEvent>, event: impl Into<WidgetEvent>) {
    if events.send(event.into()).is_err() {
        log::debug!("Event queue closed, dropping notification");
    }
}

#[derive(Debug)]
struct MediaState {
    current_time: f64,
    duration: f64,
    metadata_loaded: bool,
    volume: f64,
    muted: bool,
    paused: bool,
    ended: bool,
    native_hls: bool,
    autoplay_blocked: bool,
    since_time_update: f64,
    source: Option<String>,
}

/// Media element whose clock is advanced by the caller.
#[derive(Clone)]
pub struct SimulatedMedia {
    state: Rc<RefCell<MediaState>>,
    events: Sender<WidgetEvent>,
}

impl SimulatedMedia {
    pub fn new(duration_secs: f64, events: Sender<WidgetEvent>) -> Self {
        Self {
            state: Rc::new(RefCell::new(MediaState {
                current_time: 0.0,
                duration: duration_secs,
                metadata_loaded: false,
                volume: 1.0,
                muted: false,
                paused: true,
                ended: false,
                native_hls: false,
                autoplay_blocked: false,
                since_time_update: 0.0,
                source: None,
            })),
            events,
        }
    }

    pub fn with_native_hls(self, native: bool) -> Self {
        self.state.borrow_mut().native_hls = native;
        self
    }

    /// Reject `play()` the way an autoplay policy would.
    pub fn block_autoplay(&self, blocked: bool) {
        self.state.borrow_mut().autoplay_blocked = blocked;
    }

    /// Make the duration readable and announce it.
    pub fn load_metadata(&self) {
        self.state.borrow_mut().metadata_loaded = true;
        post(&self.events, MediaEvent::LoadedMetadata);
    }

    /// Move playback forward by `dt_secs` of wall time.
    pub fn advance(&self, dt_secs: f64) {
        let mut s = self.state.borrow_mut();
        if s.paused || !s.metadata_loaded {
            return;
        }
        s.current_time += dt_secs;
        s.since_time_update += dt_secs;
        if s.current_time >= s.duration {
            s.current_time = s.duration;
            s.paused = true;
            s.ended = true;
            s.since_time_update = 0.0;
            drop(s);
            post(&self.events, MediaEvent::TimeUpdate);
            post(&self.events, MediaEvent::Pause);
            return;
        }
        if s.since_time_update >= TIME_UPDATE_INTERVAL_SECS {
            s.since_time_update = 0.0;
            drop(s);
            post(&self.events, MediaEvent::TimeUpdate);
        }
    }

    pub fn source(&self) -> Option<String> {
        self.state.borrow().source.clone()
    }
}

impl MediaElement for SimulatedMedia {
    fn current_time(&self) -> f64 {
        self.state.borrow().current_time
    }

    fn set_current_time(&mut self, seconds: f64) {
        {
            let mut s = self.state.borrow_mut();
            let upper = if s.metadata_loaded { s.duration } else { 0.0 };
            s.current_time = seconds.max(0.0).min(upper.max(0.0));
            s.ended = false;
        }
        post(&self.events, MediaEvent::TimeUpdate);
    }

    fn duration(&self) -> f64 {
        let s = self.state.borrow();
        if s.metadata_loaded { s.duration } else { f64::NAN }
    }

    fn volume(&self) -> f64 {
        self.state.borrow().volume
    }

    fn set_volume(&mut self, volume: f64) {
        let changed = {
            let mut s = self.state.borrow_mut();
            let changed = (s.volume - volume).abs() > f64::EPSILON;
            s.volume = volume;
            changed
        };
        if changed {
            post(&self.events, MediaEvent::VolumeChange);
        }
    }

    fn muted(&self) -> bool {
        self.state.borrow().muted
    }

    fn set_muted(&mut self, muted: bool) {
        let was_muted = std::mem::replace(&mut self.state.borrow_mut().muted, muted);
        if was_muted != muted {
            post(&self.events, MediaEvent::VolumeChange);
        }
    }

    fn paused(&self) -> bool {
        self.state.borrow().paused
    }

    fn ended(&self) -> bool {
        self.state.borrow().ended
    }

    fn play(&mut self) -> Result<(), MediaError> {
        {
            let mut s = self.state.borrow_mut();
            if s.autoplay_blocked {
                return Err(MediaError::PlayRejected(
                    "play() requires a user interaction".into(),
                ));
            }
            if !s.paused {
                return Ok(());
            }
            if s.ended {
                s.current_time = 0.0;
                s.ended = false;
            }
            s.paused = false;
        }
        post(&self.events, MediaEvent::Play);
        Ok(())
    }

    fn pause(&mut self) {
        let was_playing = !std::mem::replace(&mut self.state.borrow_mut().paused, true);
        if was_playing {
            post(&self.events, MediaEvent::Pause);
        }
    }

    fn can_play_type(&self, mime: &str) -> bool {
        mime == HLS_MIME && self.state.borrow().native_hls
    }

    fn set_source(&mut self, url: &str) -> Result<(), MediaError> {
        if url.is_empty() {
            return Err(MediaError::UnsupportedSource("empty url".into()));
        }
        self.state.borrow_mut().source = Some(url.to_string());
        Ok(())
    }
}

/// Adaptive transport that "parses" a fixed ladder of levels.
pub struct SimulatedTransport {
    supported: bool,
    levels: Vec<QualityLevel>,
    fail_recovery: bool,
    recoveries: Rc<Cell<u32>>,
    events: Sender<WidgetEvent>,
}

impl SimulatedTransport {
    pub fn new(levels: Vec<QualityLevel>, events: Sender<WidgetEvent>) -> Self {
        Self {
            supported: true,
            levels,
            fail_recovery: false,
            recoveries: Rc::new(Cell::new(0)),
            events,
        }
    }

    pub fn supported(mut self, supported: bool) -> Self {
        self.supported = supported;
        self
    }

    pub fn failing_recovery(mut self, fail: bool) -> Self {
        self.fail_recovery = fail;
        self
    }

    /// Counter of recovery requests, readable after the transport is boxed.
    pub fn recovery_counter(&self) -> Rc<Cell<u32>> {
        self.recoveries.clone()
    }
}

impl StreamingTransport for SimulatedTransport {
    fn is_supported(&self) -> bool {
        self.supported
    }

    fn load_source(&mut self, url: &str) -> Result<(), TransportError> {
        if !url.ends_with(".m3u8") {
            return Err(TransportError::Manifest(format!("{url} is not an HLS playlist")));
        }
        log::debug!("Loading manifest {url}");
        post(
            &self.events,
            TransportEvent::ManifestParsed {
                levels: self.levels.clone(),
            },
        );
        Ok(())
    }

    fn attach_media(&mut self) -> Result<(), TransportError> {
        Ok(())
    }

    fn set_current_level(&mut self, level: i32) {
        log::debug!("Transport level set to {level}");
    }

    fn recover_media_error(&mut self) -> Result<(), TransportError> {
        self.recoveries.set(self.recoveries.get() + 1);
        if self.fail_recovery {
            return Err(TransportError::Detached);
        }
        Ok(())
    }
}

/// Fullscreen container that can be told to refuse requests.
#[derive(Clone)]
pub struct SimulatedFullscreen {
    active: Rc<Cell<bool>>,
    refusal: Option<FullscreenError>,
    events: Sender<WidgetEvent>,
}

impl SimulatedFullscreen {
    pub fn new(events: Sender<WidgetEvent>) -> Self {
        Self {
            active: Rc::new(Cell::new(false)),
            refusal: None,
            events,
        }
    }

    pub fn refusing(mut self, error: Option<FullscreenError>) -> Self {
        self.refusal = error;
        self
    }

    /// The user left fullscreen without the widget's button (Escape key).
    pub fn exit_externally(&self) {
        if self.active.replace(false) {
            post(&self.events, PageEvent::FullscreenChange);
        }
    }
}

impl FullscreenHost for SimulatedFullscreen {
    fn is_fullscreen(&self) -> bool {
        self.active.get()
    }

    fn request_fullscreen(&mut self) -> Result<(), FullscreenError> {
        if let Some(err) = &self.refusal {
            return Err(err.clone());
        }
        self.active.set(true);
        post(&self.events, PageEvent::FullscreenChange);
        Ok(())
    }

    fn exit_fullscreen(&mut self) -> Result<(), FullscreenError> {
        self.active.set(false);
        post(&self.events, PageEvent::FullscreenChange);
        Ok(())
    }
}

/// Notifier that logs alerts and keeps them for the session report.
#[derive(Clone, Default)]
pub struct LogNotifier {
    alerts: Rc<RefCell<Vec<String>>>,
}

impl LogNotifier {
    pub fn alerts(&self) -> Vec<String> {
        self.alerts.borrow().clone()
    }
}

impl Notifier for LogNotifier {
    fn alert(&mut self, message: &str) {
        log::warn!("Alert: {message}");
        self.alerts.borrow_mut().push(message.to_string());
    }
}

/// Volume preference held in memory only.
#[derive(Default)]
pub struct MemoryVolumeStore {
    volume: Option<f64>,
}

impl MemoryVolumeStore {
    pub fn with_volume(volume: f64) -> Self {
        Self {
            volume: Some(volume),
        }
    }
}

impl VolumeStore for MemoryVolumeStore {
    fn load(&self) -> Option<f64> {
        self.volume
    }

    fn save(&mut self, volume: f64) -> anyhow::Result<()> {
        self.volume = Some(volume);
        Ok(())
    }
}
