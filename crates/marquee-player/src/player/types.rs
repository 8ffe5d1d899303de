use std::cell::Cell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// Whether the media element is currently advancing.
///
/// Shared between the coordinator (the only writer, driven by the element's
/// own `play`/`pause` notifications) and the overlay (reader, once per tick).
#[derive(Clone, Default, Debug)]
pub struct PlaybackFlag(Rc<Cell<bool>>);

impl PlaybackFlag {
    pub fn is_playing(&self) -> bool {
        self.0.get()
    }

    pub(crate) fn set(&self, playing: bool) {
        self.0.set(playing);
    }
}

/// Icon shown on the play/pause button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PlayIcon {
    /// Media is paused; clicking plays.
    Play,
    /// Media is playing; clicking pauses.
    Pause,
}

impl PlayIcon {
    pub fn for_paused(paused: bool) -> Self {
        if paused { PlayIcon::Play } else { PlayIcon::Pause }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VolumeIcon {
    Zero,
    Half,
    Max,
}

impl VolumeIcon {
    /// Muted always shows zero; otherwise half from just above 0, max from 0.5.
    pub fn for_level(volume: f64, muted: bool) -> Self {
        if muted {
            VolumeIcon::Zero
        } else if volume >= 0.5 {
            VolumeIcon::Max
        } else if volume > 0.0 {
            VolumeIcon::Half
        } else {
            VolumeIcon::Zero
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FullscreenIcon {
    /// Not fullscreen; clicking enters.
    Enter,
    /// Fullscreen; clicking exits.
    Exit,
}

impl FullscreenIcon {
    pub fn for_state(fullscreen: bool) -> Self {
        if fullscreen {
            FullscreenIcon::Exit
        } else {
            FullscreenIcon::Enter
        }
    }
}

/// Seek range control plus its visual fill.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeekBar {
    /// Slider thumb position in seconds.
    pub value: f64,
    /// Slider maximum (media duration once known).
    pub max: f64,
    /// Width of the progress fill, 0–100.
    pub progress_percent: f64,
}

impl Default for SeekBar {
    fn default() -> Self {
        Self {
            value: 0.0,
            max: 100.0,
            progress_percent: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolumeSlider {
    pub value: f64,
    /// Value of the `--volume-progress` custom property, e.g. `"70%"`.
    pub css_progress: String,
}

impl VolumeSlider {
    pub fn from_volume(volume: f64) -> Self {
        Self {
            value: volume,
            css_progress: format!("{}%", (volume * 100_000.0).round() / 1000.0),
        }
    }
}

impl Default for VolumeSlider {
    fn default() -> Self {
        Self::from_volume(1.0)
    }
}

/// One rendition announced by the streaming transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityLevel {
    pub height: u32,
    #[serde(default)]
    pub bitrate: Option<u32>,
}

/// Transport level meaning "choose automatically".
pub const AUTO_LEVEL: i32 = -1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QualityEntry {
    pub label: String,
    /// Value written to the transport's `current_level`.
    pub level: i32,
}

/// Quality menu: "Auto" followed by one entry per transport level.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct QualityMenu {
    pub entries: Vec<QualityEntry>,
    pub visible: bool,
}

impl QualityMenu {
    /// Replace all entries. "Auto" sits at position 0 and maps to
    /// [`AUTO_LEVEL`]; position `i` maps to transport level `i - 1`.
    pub fn rebuild(&mut self, levels: &[QualityLevel]) {
        self.entries.clear();
        self.entries.push(QualityEntry {
            label: "Auto".to_string(),
            level: AUTO_LEVEL,
        });
        self.entries
            .extend(levels.iter().enumerate().map(|(i, l)| QualityEntry {
                label: format!("{}p", l.height),
                level: i as i32,
            }));
    }

    pub fn level_at(&self, position: usize) -> Option<i32> {
        self.entries.get(position).map(|e| e.level)
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    pub fn close(&mut self) {
        self.visible = false;
    }
}

/// Everything the controls display, owned by the coordinator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControlsView {
    pub play_icon: PlayIcon,
    pub seek: SeekBar,
    pub elapsed_label: String,
    pub duration_label: String,
    pub volume_icon: VolumeIcon,
    pub volume: VolumeSlider,
    pub quality: QualityMenu,
    pub fullscreen_icon: FullscreenIcon,
}

impl Default for ControlsView {
    fn default() -> Self {
        Self {
            play_icon: PlayIcon::Play,
            seek: SeekBar::default(),
            elapsed_label: "00:00".to_string(),
            duration_label: "00:00".to_string(),
            volume_icon: VolumeIcon::Max,
            volume: VolumeSlider::default(),
            quality: QualityMenu::default(),
            fullscreen_icon: FullscreenIcon::Enter,
        }
    }
}
