use serde::{Deserialize, Serialize};

use super::types::QualityLevel;

/// Notifications posted by the media element itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaEvent {
    Play,
    Pause,
    LoadedMetadata,
    TimeUpdate,
    VolumeChange,
}

/// User gestures on the controls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UiAction {
    PlayPauseClicked,
    /// Tap anywhere on the overlay canvas.
    CanvasClicked,
    SeekDragStart,
    /// Pointer moved while dragging; `value` is the provisional slider value in seconds.
    SeekDragInput { value: f64 },
    /// Pointer released; `value` is the final slider value in seconds.
    SeekDragEnd { value: f64 },
    VolumeInput { value: f64 },
    MuteClicked,
    QualityButtonClicked,
    /// Menu entry at `position` (0 is "Auto").
    QualitySelected { position: usize },
    FullscreenClicked,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    ManifestParsed { levels: Vec<QualityLevel> },
}

/// Document-level notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageEvent {
    VisibilityChange { hidden: bool },
    FullscreenChange,
}

/// Anything that can land in the widget's event queue.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetEvent {
    Media(MediaEvent),
    Ui(UiAction),
    Transport(TransportEvent),
    Page(PageEvent),
}

impl From<MediaEvent> for WidgetEvent {
    fn from(e: MediaEvent) -> Self {
        WidgetEvent::Media(e)
    }
}

impl From<UiAction> for WidgetEvent {
    fn from(a: UiAction) -> Self {
        WidgetEvent::Ui(a)
    }
}

impl From<TransportEvent> for WidgetEvent {
    fn from(e: TransportEvent) -> Self {
        WidgetEvent::Transport(e)
    }
}

impl From<PageEvent> for WidgetEvent {
    fn from(e: PageEvent) -> Self {
        WidgetEvent::Page(e)
    }
}
