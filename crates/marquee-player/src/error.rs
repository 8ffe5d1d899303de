use thiserror::Error;

/// Failure reported by the media element (e.g. a rejected `play()` under an
/// autoplay policy).
#[derive(Debug, Clone, Error, PartialEq)]
pub enum MediaError {
    #[error("playback was rejected: {0}")]
    PlayRejected(String),
    #[error("unsupported source: {0}")]
    UnsupportedSource(String),
}

/// Failure reported by the adaptive-streaming transport.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TransportError {
    #[error("manifest could not be loaded: {0}")]
    Manifest(String),
    #[error("media error recovery failed: {0}")]
    Recovery(String),
    #[error("transport is detached from the media element")]
    Detached,
}

/// Failure from the host when entering or leaving fullscreen.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FullscreenError {
    /// Fullscreen requires a user gesture and none was active.
    #[error("fullscreen requires a user gesture")]
    GestureRequired,
    /// The embedding context does not allow fullscreen.
    #[error("fullscreen is not allowed here: {0}")]
    NotAllowed(String),
}

/// Construction-time failures. These are programmer errors and abort widget
/// setup rather than degrade it.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum WidgetError {
    #[error("widget is missing a required component: {0}")]
    MissingComponent(&'static str),
    #[error("no playback path for {url}: transport unsupported and no native HLS support")]
    NoPlaybackPath { url: String },
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Media(#[from] MediaError),
}
