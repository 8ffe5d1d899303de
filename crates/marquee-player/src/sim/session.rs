//! Scripted playback sessions: build a widget on simulated collaborators,
//! replay timed user gestures against a synthetic frame clock and report
//! the resulting control state.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::{LogNotifier, MemoryVolumeStore, SimulatedFullscreen, SimulatedMedia, SimulatedTransport};
use crate::error::FullscreenError;
use crate::overlay::frame_loop::{FrameClock, ManualClock};
use crate::overlay::raster::RasterSurface;
use crate::overlay::types::OverlayStyle;
use crate::player::events::{PageEvent, UiAction};
use crate::player::ports::MediaElement;
use crate::player::types::{ControlsView, QualityLevel};
use crate::settings::JsonVolumeStore;
use crate::widget::{PlaybackPath, PlayerWidget, WidgetBuilder};

type SessionWidget = PlayerWidget<ManualClock, RasterSurface>;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 180,
        }
    }
}

/// One scripted step, applied at the first frame at or after `at_ms`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Step {
    pub at_ms: f64,
    #[serde(flatten)]
    pub kind: StepKind,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "do", rename_all = "snake_case")]
pub enum StepKind {
    Ui { action: UiAction },
    /// Page goes to the background.
    Hide,
    /// Page returns to the foreground.
    Show,
    /// User leaves fullscreen with the Escape key.
    EscapeFullscreen,
    BlockAutoplay { blocked: bool },
    /// Write the overlay canvas to `file` under the snapshot directory.
    Snapshot { file: String },
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionScript {
    pub source: String,
    #[serde(default = "default_duration_secs")]
    pub duration_secs: f64,
    #[serde(default)]
    pub levels: Vec<QualityLevel>,
    #[serde(default = "default_true")]
    pub transport_supported: bool,
    #[serde(default)]
    pub native_hls: bool,
    #[serde(default)]
    pub autoplay_blocked: bool,
    #[serde(default)]
    pub fullscreen_refused: bool,
    #[serde(default)]
    pub recovery_fails: bool,
    #[serde(default)]
    pub canvas: CanvasSize,
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: f64,
    /// Keep running this long after the last step.
    #[serde(default = "default_tail_ms")]
    pub tail_ms: f64,
    #[serde(default)]
    pub overlay: OverlayStyle,
    #[serde(default)]
    pub steps: Vec<Step>,
}

fn default_duration_secs() -> f64 {
    60.0
}

fn default_true() -> bool {
    true
}

fn default_frame_interval_ms() -> f64 {
    1000.0 / 60.0
}

fn default_tail_ms() -> f64 {
    500.0
}

impl SessionScript {
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading session {}", path.display()))?;
        serde_json::from_str(&json).with_context(|| format!("parsing session {}", path.display()))
    }
}

#[derive(Default)]
pub struct RunOptions {
    /// Where `snapshot` steps write PNGs. Snapshots are skipped without it.
    pub snapshot_dir: Option<PathBuf>,
    /// Font for the overlay raster. Without one the overlay still moves but draws nothing.
    pub font: Option<fontdue::Font>,
    /// Settings file backing the volume preference; in-memory when unset.
    pub settings_path: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
pub struct SessionReport {
    pub playback_path: PlaybackPath,
    pub frames_drawn: u64,
    pub overlay_wraps: u64,
    pub overlay_position: f64,
    pub events_handled: usize,
    pub media_time_secs: f64,
    pub recoveries: u32,
    pub alerts: Vec<String>,
    pub snapshots: Vec<PathBuf>,
    pub view: ControlsView,
}

pub fn run(script: &SessionScript, options: RunOptions) -> Result<SessionReport> {
    if !(script.frame_interval_ms > 0.0 && script.frame_interval_ms.is_finite()) {
        anyhow::bail!("frame_interval_ms must be positive, got {}", script.frame_interval_ms);
    }
    if !(script.duration_secs > 0.0 && script.duration_secs.is_finite()) {
        anyhow::bail!("duration_secs must be positive, got {}", script.duration_secs);
    }

    let clock = ManualClock::new(0.0);
    let builder = WidgetBuilder::new();
    let events = builder.event_sender();

    let media = SimulatedMedia::new(script.duration_secs, events.clone()).with_native_hls(script.native_hls);
    media.block_autoplay(script.autoplay_blocked);
    let transport = SimulatedTransport::new(script.levels.clone(), events.clone())
        .supported(script.transport_supported)
        .failing_recovery(script.recovery_fails);
    let recoveries = transport.recovery_counter();
    let fullscreen = SimulatedFullscreen::new(events).refusing(
        script
            .fullscreen_refused
            .then(|| FullscreenError::NotAllowed("fullscreen is disabled for this page".into())),
    );
    let notifier = LogNotifier::default();
    let surface = RasterSurface::new(script.canvas.width, script.canvas.height, options.font);

    let builder = builder
        .media(media.clone())
        .transport(transport)
        .fullscreen(fullscreen.clone())
        .notifier(notifier.clone())
        .surface(surface)
        .style(script.overlay.clone())
        .source(script.source.clone());
    let builder = match &options.settings_path {
        Some(path) => builder.volume_store(JsonVolumeStore::at(path)),
        None => builder.volume_store(MemoryVolumeStore::default()),
    };
    let mut widget = builder.build(clock.clone())?;

    media.load_metadata();
    let mut handled = widget.dispatch_pending();

    let mut steps: Vec<&Step> = script.steps.iter().collect();
    steps.sort_by(|a, b| a.at_ms.total_cmp(&b.at_ms));
    let end_ms = steps.last().map_or(0.0, |s| s.at_ms) + script.tail_ms;
    let step_secs = script.frame_interval_ms / 1000.0;

    let mut snapshots = Vec::new();
    let mut next = 0;
    let mut frame_index: u64 = 0;
    loop {
        let now = clock.now_ms();
        let due_start = next;
        while next < steps.len() && steps[next].at_ms <= now {
            let step = steps[next];
            log::info!("[{now:8.1} ms] {:?}", step.kind);
            apply_step(&step.kind, &widget, &media, &fullscreen);
            next += 1;
        }
        handled += widget.dispatch_pending();
        widget.frame();

        for step in &steps[due_start..next] {
            if let StepKind::Snapshot { file } = &step.kind {
                if let Some(path) = write_snapshot(&widget, options.snapshot_dir.as_deref(), file)? {
                    snapshots.push(path);
                }
            }
        }

        if now >= end_ms {
            break;
        }
        frame_index += 1;
        clock.set(frame_index as f64 * script.frame_interval_ms);
        media.advance(step_secs);
        handled += widget.dispatch_pending();
    }

    let overlay = widget.overlay();
    Ok(SessionReport {
        playback_path: widget.playback_path(),
        frames_drawn: overlay.frames_drawn(),
        overlay_wraps: overlay.wraps(),
        overlay_position: overlay.position(),
        events_handled: handled,
        media_time_secs: media.current_time(),
        recoveries: recoveries.get(),
        alerts: notifier.alerts(),
        snapshots,
        view: widget.view().clone(),
    })
}

fn apply_step(
    kind: &StepKind,
    widget: &SessionWidget,
    media: &SimulatedMedia,
    fullscreen: &SimulatedFullscreen,
) {
    match kind {
        StepKind::Ui { action } => widget.post(action.clone()),
        StepKind::Hide => widget.post(PageEvent::VisibilityChange { hidden: true }),
        StepKind::Show => widget.post(PageEvent::VisibilityChange { hidden: false }),
        StepKind::EscapeFullscreen => fullscreen.exit_externally(),
        StepKind::BlockAutoplay { blocked } => media.block_autoplay(*blocked),
        StepKind::Snapshot { .. } => {}
    }
}

fn write_snapshot(widget: &SessionWidget, dir: Option<&Path>, file: &str) -> Result<Option<PathBuf>> {
    let Some(dir) = dir else {
        log::warn!("Skipping snapshot {file}: no snapshot directory");
        return Ok(None);
    };
    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let path = dir.join(file);
    widget.overlay().surface().save_png(&path)?;
    log::info!("Saved snapshot {}", path.display());
    Ok(Some(path))
}
