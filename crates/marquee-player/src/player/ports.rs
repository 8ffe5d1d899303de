//! Collaborators the coordinator drives but does not implement.
//!
//! The page supplies a media element, an optional adaptive-streaming
//! transport, a place to keep the volume preference, a fullscreen-capable
//! container and a way to tell the user something went wrong.

use crate::error::{FullscreenError, MediaError, TransportError};

/// MIME type probed for native HLS playback.
pub const HLS_MIME: &str = "application/vnd.apple.mpegurl";

/// The media element. Reads are cheap property reads; writes may cause the
/// element to post notifications (`play`, `pause`, `volumechange`, ...) that
/// arrive later through the widget's event queue.
pub trait MediaElement {
    fn current_time(&self) -> f64;
    fn set_current_time(&mut self, seconds: f64);
    /// `NaN` until metadata has loaded.
    fn duration(&self) -> f64;
    fn volume(&self) -> f64;
    fn set_volume(&mut self, volume: f64);
    fn muted(&self) -> bool;
    fn set_muted(&mut self, muted: bool);
    fn paused(&self) -> bool;
    fn ended(&self) -> bool;
    fn play(&mut self) -> Result<(), MediaError>;
    fn pause(&mut self);
    fn can_play_type(&self, mime: &str) -> bool;
    fn set_source(&mut self, url: &str) -> Result<(), MediaError>;
}

/// Adaptive-bitrate transport bound to the media element.
pub trait StreamingTransport {
    /// Whether this environment can run the transport at all.
    fn is_supported(&self) -> bool;
    fn load_source(&mut self, url: &str) -> Result<(), TransportError>;
    fn attach_media(&mut self) -> Result<(), TransportError>;
    /// `-1` lets the transport pick; otherwise an index into the parsed levels.
    fn set_current_level(&mut self, level: i32);
    fn recover_media_error(&mut self) -> Result<(), TransportError>;
}

/// Where the volume preference lives between page loads.
pub trait VolumeStore {
    fn load(&self) -> Option<f64>;
    fn save(&mut self, volume: f64) -> anyhow::Result<()>;
}

/// The widget's container element, which is what goes fullscreen so the
/// custom controls stay visible.
pub trait FullscreenHost {
    fn is_fullscreen(&self) -> bool;
    fn request_fullscreen(&mut self) -> Result<(), FullscreenError>;
    fn exit_fullscreen(&mut self) -> Result<(), FullscreenError>;
}

/// Blocking, user-visible notification (an alert box on a page).
pub trait Notifier {
    fn alert(&mut self, message: &str);
}
