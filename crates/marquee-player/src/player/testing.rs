//! Inspectable fakes for coordinator and widget tests.

use std::cell::RefCell;
use std::rc::Rc;

use log::{Level, LevelFilter, Log, Metadata, Record};

use crate::error::{FullscreenError, MediaError, TransportError};

use super::ports::{FullscreenHost, HLS_MIME, MediaElement, Notifier, StreamingTransport, VolumeStore};
use super::{Collaborators, PlayerCoordinator};

#[derive(Debug)]
pub struct MediaState {
    pub current_time: f64,
    pub duration: f64,
    pub volume: f64,
    pub muted: bool,
    pub paused: bool,
    pub ended: bool,
    pub reject_play: bool,
    pub native_hls: bool,
    pub play_calls: usize,
    pub volume_writes: usize,
    pub seeks: Vec<f64>,
    pub sources: Vec<String>,
}

impl Default for MediaState {
    fn default() -> Self {
        Self {
            current_time: 0.0,
            duration: f64::NAN,
            volume: 1.0,
            muted: false,
            paused: true,
            ended: false,
            reject_play: false,
            native_hls: false,
            play_calls: 0,
            volume_writes: 0,
            seeks: Vec::new(),
            sources: Vec::new(),
        }
    }
}

pub struct FakeMedia(pub Rc<RefCell<MediaState>>);

impl MediaElement for FakeMedia {
    fn current_time(&self) -> f64 {
        self.0.borrow().current_time
    }
    fn set_current_time(&mut self, seconds: f64) {
        let mut s = self.0.borrow_mut();
        s.current_time = seconds;
        s.seeks.push(seconds);
    }
    fn duration(&self) -> f64 {
        self.0.borrow().duration
    }
    fn volume(&self) -> f64 {
        self.0.borrow().volume
    }
    fn set_volume(&mut self, volume: f64) {
        let mut s = self.0.borrow_mut();
        s.volume = volume;
        s.volume_writes += 1;
    }
    fn muted(&self) -> bool {
        self.0.borrow().muted
    }
    fn set_muted(&mut self, muted: bool) {
        self.0.borrow_mut().muted = muted;
    }
    fn paused(&self) -> bool {
        self.0.borrow().paused
    }
    fn ended(&self) -> bool {
        self.0.borrow().ended
    }
    fn play(&mut self) -> Result<(), MediaError> {
        let mut s = self.0.borrow_mut();
        s.play_calls += 1;
        if s.reject_play {
            return Err(MediaError::PlayRejected("autoplay policy".into()));
        }
        s.paused = false;
        s.ended = false;
        Ok(())
    }
    fn pause(&mut self) {
        self.0.borrow_mut().paused = true;
    }
    fn can_play_type(&self, mime: &str) -> bool {
        mime == HLS_MIME && self.0.borrow().native_hls
    }
    fn set_source(&mut self, url: &str) -> Result<(), MediaError> {
        self.0.borrow_mut().sources.push(url.to_string());
        Ok(())
    }
}

#[derive(Debug)]
pub struct TransportState {
    pub supported: bool,
    pub level: i32,
    pub level_writes: Vec<i32>,
    pub recover_calls: usize,
    pub fail_recovery: bool,
    pub fail_load: bool,
    pub loaded: Vec<String>,
    pub attached: bool,
}

impl Default for TransportState {
    fn default() -> Self {
        Self {
            supported: true,
            level: -1,
            level_writes: Vec::new(),
            recover_calls: 0,
            fail_recovery: false,
            fail_load: false,
            loaded: Vec::new(),
            attached: false,
        }
    }
}

pub struct FakeTransport(pub Rc<RefCell<TransportState>>);

impl StreamingTransport for FakeTransport {
    fn is_supported(&self) -> bool {
        self.0.borrow().supported
    }
    fn load_source(&mut self, url: &str) -> Result<(), TransportError> {
        let mut s = self.0.borrow_mut();
        if s.fail_load {
            return Err(TransportError::Manifest(format!("404 for {url}")));
        }
        s.loaded.push(url.to_string());
        Ok(())
    }
    fn attach_media(&mut self) -> Result<(), TransportError> {
        self.0.borrow_mut().attached = true;
        Ok(())
    }
    fn set_current_level(&mut self, level: i32) {
        let mut s = self.0.borrow_mut();
        s.level = level;
        s.level_writes.push(level);
    }
    fn recover_media_error(&mut self) -> Result<(), TransportError> {
        let mut s = self.0.borrow_mut();
        s.recover_calls += 1;
        if s.fail_recovery {
            return Err(TransportError::Recovery("decoder gone".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct StoreState {
    pub stored: Option<f64>,
    pub saved: Vec<f64>,
    pub fail_saves: bool,
}

pub struct FakeStore(pub Rc<RefCell<StoreState>>);

impl VolumeStore for FakeStore {
    fn load(&self) -> Option<f64> {
        self.0.borrow().stored
    }
    fn save(&mut self, volume: f64) -> anyhow::Result<()> {
        let mut s = self.0.borrow_mut();
        if s.fail_saves {
            anyhow::bail!("storage full");
        }
        s.stored = Some(volume);
        s.saved.push(volume);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct FullscreenState {
    pub active: bool,
    pub reject: Option<FullscreenError>,
    pub requests: usize,
    pub exits: usize,
}

pub struct FakeFullscreen(pub Rc<RefCell<FullscreenState>>);

impl FullscreenHost for FakeFullscreen {
    fn is_fullscreen(&self) -> bool {
        self.0.borrow().active
    }
    fn request_fullscreen(&mut self) -> Result<(), FullscreenError> {
        let mut s = self.0.borrow_mut();
        s.requests += 1;
        if let Some(err) = s.reject.clone() {
            return Err(err);
        }
        s.active = true;
        Ok(())
    }
    fn exit_fullscreen(&mut self) -> Result<(), FullscreenError> {
        let mut s = self.0.borrow_mut();
        s.exits += 1;
        s.active = false;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct NotifierState {
    pub alerts: Vec<String>,
}

pub struct FakeNotifier(pub Rc<RefCell<NotifierState>>);

impl Notifier for FakeNotifier {
    fn alert(&mut self, message: &str) {
        self.0.borrow_mut().alerts.push(message.to_string());
    }
}

/// Shared handles to every fake's state.
#[derive(Default)]
pub struct Fakes {
    pub media: Rc<RefCell<MediaState>>,
    pub transport: Rc<RefCell<TransportState>>,
    pub store: Rc<RefCell<StoreState>>,
    pub fullscreen: Rc<RefCell<FullscreenState>>,
    pub notifier: Rc<RefCell<NotifierState>>,
}

impl Fakes {
    pub fn collaborators(&self, with_transport: bool) -> Collaborators {
        Collaborators {
            media: Box::new(FakeMedia(self.media.clone())),
            transport: with_transport
                .then(|| Box::new(FakeTransport(self.transport.clone())) as Box<dyn StreamingTransport>),
            volume_store: Box::new(FakeStore(self.store.clone())),
            fullscreen: Box::new(FakeFullscreen(self.fullscreen.clone())),
            notifier: Box::new(FakeNotifier(self.notifier.clone())),
        }
    }
}

pub struct Harness {
    pub coord: PlayerCoordinator,
    pub media: Rc<RefCell<MediaState>>,
    pub transport: Rc<RefCell<TransportState>>,
    pub store: Rc<RefCell<StoreState>>,
    pub fullscreen: Rc<RefCell<FullscreenState>>,
    pub notifier: Rc<RefCell<NotifierState>>,
}

fn build(with_transport: bool) -> Harness {
    let fakes = Fakes::default();
    let coord = PlayerCoordinator::new(fakes.collaborators(with_transport));
    Harness {
        coord,
        media: fakes.media,
        transport: fakes.transport,
        store: fakes.store,
        fullscreen: fakes.fullscreen,
        notifier: fakes.notifier,
    }
}

pub fn harness() -> Harness {
    build(true)
}

pub fn harness_without_transport() -> Harness {
    build(false)
}

thread_local! {
    static RECORDS: RefCell<Vec<(Level, String)>> = const { RefCell::new(Vec::new()) };
}

/// Keeps records on the thread that emitted them, so parallel tests stay apart.
struct CaptureLogger;

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        RECORDS.with(|r| r.borrow_mut().push((record.level(), record.args().to_string())));
    }

    fn flush(&self) {}
}

static CAPTURE: CaptureLogger = CaptureLogger;

/// Route `log` output into this thread's buffer and clear it.
pub fn capture_logs() {
    // Already installed by an earlier test.
    let _ = log::set_logger(&CAPTURE);
    log::set_max_level(LevelFilter::Trace);
    RECORDS.with(|r| r.borrow_mut().clear());
}

pub fn take_logs() -> Vec<(Level, String)> {
    RECORDS.with(|r| std::mem::take(&mut *r.borrow_mut()))
}
