pub mod events;
pub mod ports;
pub mod time_format;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

use events::{MediaEvent, PageEvent, TransportEvent, UiAction, WidgetEvent};
use ports::{FullscreenHost, MediaElement, Notifier, StreamingTransport, VolumeStore};
use time_format::format_clock;
use types::{
    ControlsView, FullscreenIcon, PlayIcon, PlaybackFlag, QualityLevel, VolumeIcon, VolumeSlider,
};

/// The collaborators a coordinator drives.
pub struct Collaborators {
    pub media: Box<dyn MediaElement>,
    /// `None` when the page plays the source natively (no quality menu, no recovery).
    pub transport: Option<Box<dyn StreamingTransport>>,
    pub volume_store: Box<dyn VolumeStore>,
    pub fullscreen: Box<dyn FullscreenHost>,
    pub notifier: Box<dyn Notifier>,
}

/// Single owner of every control the user sees.
///
/// Each input source (media notifications, seek drags, volume, quality menu,
/// fullscreen, page visibility) is a named transition here; nothing else
/// writes to the view. Icons are re-derived from the media element after the
/// fact instead of being tracked separately.
pub struct PlayerCoordinator {
    media: Box<dyn MediaElement>,
    transport: Option<Box<dyn StreamingTransport>>,
    volume_store: Box<dyn VolumeStore>,
    fullscreen: Box<dyn FullscreenHost>,
    notifier: Box<dyn Notifier>,
    view: ControlsView,
    playback: PlaybackFlag,
    /// Drag in progress: `timeupdate` must not move the seek bar.
    is_seeking: bool,
    /// Last play/pause gesture asked for playback; read when a drag ends.
    resume_intent: bool,
}

impl PlayerCoordinator {
    pub fn new(parts: Collaborators) -> Self {
        Self {
            media: parts.media,
            transport: parts.transport,
            volume_store: parts.volume_store,
            fullscreen: parts.fullscreen,
            notifier: parts.notifier,
            view: ControlsView::default(),
            playback: PlaybackFlag::default(),
            is_seeking: false,
            resume_intent: false,
        }
    }

    /// Startup sync, run once before the first event: restore the stored
    /// volume and derive every indicator from the element's current state.
    /// The playback flag is left to the `play`/`pause` notifications.
    pub fn initialize(&mut self) {
        if let Some(stored) = self.volume_store.load() {
            if stored.is_finite() {
                let volume = stored.clamp(0.0, 1.0);
                log::info!("Restoring stored volume {volume:.2}");
                self.media.set_volume(volume);
            } else {
                log::warn!("Ignoring stored volume {stored}");
            }
        }
        self.view.volume = VolumeSlider::from_volume(self.media.volume());
        self.refresh_volume_icon();
        self.refresh_play_icon();
        self.view.fullscreen_icon = FullscreenIcon::for_state(self.fullscreen.is_fullscreen());
    }

    /// Route one queued event to its transition.
    pub fn handle(&mut self, event: &WidgetEvent) {
        match event {
            WidgetEvent::Media(e) => match e {
                MediaEvent::Play => self.on_media_play(),
                MediaEvent::Pause => self.on_media_pause(),
                MediaEvent::LoadedMetadata => self.on_loaded_metadata(),
                MediaEvent::TimeUpdate => self.on_time_update(),
                MediaEvent::VolumeChange => self.on_volume_change(),
            },
            WidgetEvent::Ui(action) => match *action {
                UiAction::PlayPauseClicked => self.on_play_pause_clicked(),
                UiAction::CanvasClicked => self.on_canvas_clicked(),
                UiAction::SeekDragStart => self.on_drag_start(),
                UiAction::SeekDragInput { value } => self.on_drag_input(value),
                UiAction::SeekDragEnd { value } => self.on_drag_end(value),
                UiAction::VolumeInput { value } => self.on_volume_input(value),
                UiAction::MuteClicked => self.on_mute_clicked(),
                UiAction::QualityButtonClicked => self.on_quality_button_clicked(),
                UiAction::QualitySelected { position } => self.on_quality_selected(position),
                UiAction::FullscreenClicked => self.on_fullscreen_clicked(),
            },
            WidgetEvent::Transport(TransportEvent::ManifestParsed { levels }) => {
                self.on_manifest_parsed(levels);
            }
            WidgetEvent::Page(PageEvent::VisibilityChange { hidden }) => {
                self.on_visibility_change(*hidden);
            }
            WidgetEvent::Page(PageEvent::FullscreenChange) => self.on_fullscreen_change(),
        }
    }

    // --- Play / pause ---

    pub fn on_play_pause_clicked(&mut self) {
        self.toggle_playback();
    }

    pub fn on_canvas_clicked(&mut self) {
        self.toggle_playback();
    }

    fn toggle_playback(&mut self) {
        if self.media.paused() || self.media.ended() {
            self.resume_intent = true;
            if let Err(e) = self.media.play() {
                log::warn!("Play request failed: {e}");
            }
        } else {
            self.resume_intent = false;
            self.media.pause();
        }
    }

    pub fn on_media_play(&mut self) {
        self.playback.set(true);
        self.refresh_play_icon();
    }

    pub fn on_media_pause(&mut self) {
        self.playback.set(false);
        self.refresh_play_icon();
    }

    fn refresh_play_icon(&mut self) {
        self.view.play_icon = PlayIcon::for_paused(self.media.paused());
    }

    // --- Time and seeking ---

    pub fn on_loaded_metadata(&mut self) {
        let duration = self.media.duration();
        log::info!("Metadata loaded, duration {duration:.2}s");
        if let Some(label) = format_clock(duration) {
            self.view.seek.max = duration;
            self.view.duration_label = label;
        }
        self.on_volume_change();
    }

    pub fn on_time_update(&mut self) {
        if self.is_seeking {
            return;
        }
        let current = self.media.current_time();
        if let Some(percent) = self.progress_percent(current) {
            self.view.seek.value = current;
            self.view.seek.progress_percent = percent;
        }
        if let Some(label) = format_clock(current) {
            self.view.elapsed_label = label;
        }
    }

    /// Pointer went down on the seek bar.
    pub fn on_drag_start(&mut self) {
        self.is_seeking = true;
        self.media.pause();
    }

    /// Pointer moved while dragging: visuals only, the element keeps its time.
    pub fn on_drag_input(&mut self, value: f64) {
        if !value.is_finite() {
            return;
        }
        self.view.seek.value = value;
        if let Some(percent) = self.progress_percent(value) {
            self.view.seek.progress_percent = percent;
        }
        if let Some(label) = format_clock(value) {
            self.view.elapsed_label = label;
        }
    }

    /// Pointer released: resume if the user had asked to play, then commit
    /// the final value as the element's time, once.
    pub fn on_drag_end(&mut self, value: f64) {
        self.is_seeking = false;
        if self.resume_intent {
            if let Err(e) = self.media.play() {
                log::warn!("Resume after seek failed: {e}");
            }
        }
        if value.is_finite() {
            self.view.seek.value = value;
            self.media.set_current_time(value);
            log::debug!("Seek committed to {value:.2}s");
        } else {
            log::warn!("Ignoring non-finite seek target {value}");
        }
    }

    fn progress_percent(&self, position: f64) -> Option<f64> {
        let duration = self.media.duration();
        if duration.is_finite() && duration > 0.0 && position.is_finite() {
            Some(position / duration * 100.0)
        } else {
            None
        }
    }

    // --- Volume ---

    pub fn on_volume_input(&mut self, value: f64) {
        if !value.is_finite() {
            return;
        }
        let volume = value.clamp(0.0, 1.0);
        self.media.set_volume(volume);
        if let Err(e) = self.volume_store.save(volume) {
            log::warn!("Failed to persist volume: {e}");
        }
        self.refresh_volume_icon();
    }

    /// The element reported a volume or mute change, whoever caused it.
    pub fn on_volume_change(&mut self) {
        self.view.volume = VolumeSlider::from_volume(self.media.volume());
        self.refresh_volume_icon();
    }

    pub fn on_mute_clicked(&mut self) {
        let muted = !self.media.muted();
        self.media.set_muted(muted);
        self.refresh_volume_icon();
    }

    fn refresh_volume_icon(&mut self) {
        self.view.volume_icon = VolumeIcon::for_level(self.media.volume(), self.media.muted());
    }

    // --- Quality ---

    pub fn on_manifest_parsed(&mut self, levels: &[QualityLevel]) {
        log::info!("Manifest parsed with {} quality level(s)", levels.len());
        self.view.quality.rebuild(levels);
    }

    pub fn on_quality_button_clicked(&mut self) {
        self.view.quality.toggle();
    }

    pub fn on_quality_selected(&mut self, position: usize) {
        let Some(level) = self.view.quality.level_at(position) else {
            log::warn!("No quality entry at position {position}");
            return;
        };
        if let Some(transport) = self.transport.as_mut() {
            log::info!("Switching quality to level {level}");
            transport.set_current_level(level);
        }
        self.view.quality.close();
    }

    // --- Fullscreen ---

    pub fn on_fullscreen_clicked(&mut self) {
        let result = if self.fullscreen.is_fullscreen() {
            self.fullscreen.exit_fullscreen()
        } else {
            self.fullscreen.request_fullscreen()
        };
        match result {
            Ok(()) => self.on_fullscreen_change(),
            Err(e) => {
                log::warn!("Fullscreen toggle rejected: {e}");
                self.notifier
                    .alert(&format!("Could not switch fullscreen mode: {e}"));
            }
        }
    }

    /// Re-derive the icon from the container's actual state.
    pub fn on_fullscreen_change(&mut self) {
        self.view.fullscreen_icon = FullscreenIcon::for_state(self.fullscreen.is_fullscreen());
    }

    // --- Visibility ---

    /// Coming back to the foreground can leave mobile decoders wedged; ask
    /// the transport to recover. Failure is logged and otherwise ignored.
    pub fn on_visibility_change(&mut self, hidden: bool) {
        if hidden {
            return;
        }
        let Some(transport) = self.transport.as_mut() else {
            return;
        };
        match transport.recover_media_error() {
            Ok(()) => log::debug!("Media error recovery requested after foregrounding"),
            Err(e) => log::error!("Cannot recover media after foregrounding: {e}"),
        }
    }

    // --- Accessors ---

    pub fn view(&self) -> &ControlsView {
        &self.view
    }

    /// Reader handle for the play/pause flag.
    pub fn playback_flag(&self) -> PlaybackFlag {
        self.playback.clone()
    }

    pub fn is_seeking(&self) -> bool {
        self.is_seeking
    }

    pub fn resume_intent(&self) -> bool {
        self.resume_intent
    }

    pub fn media(&self) -> &dyn MediaElement {
        self.media.as_ref()
    }

    pub fn transport(&self) -> Option<&dyn StreamingTransport> {
        self.transport.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{Harness, capture_logs, harness, harness_without_transport, take_logs};
    use super::types::{AUTO_LEVEL, FullscreenIcon, PlayIcon, QualityLevel, VolumeIcon};
    use super::*;

    fn loaded(h: &mut Harness) {
        h.media.borrow_mut().duration = 200.0;
        h.coord.on_loaded_metadata();
    }

    #[test]
    fn initialize_restores_stored_volume() {
        let mut h = harness();
        h.store.borrow_mut().stored = Some(0.3);
        h.coord.initialize();
        assert!((h.media.borrow().volume - 0.3).abs() < 1e-10);
        assert_eq!(h.coord.view().volume_icon, VolumeIcon::Half);
        assert!((h.coord.view().volume.value - 0.3).abs() < 1e-10);
        assert_eq!(h.coord.view().play_icon, PlayIcon::Play);
    }

    #[test]
    fn initialize_does_not_infer_playback_flag() {
        let mut h = harness();
        h.media.borrow_mut().paused = false;
        h.coord.initialize();
        assert_eq!(h.coord.view().play_icon, PlayIcon::Pause);
        assert!(!h.coord.playback_flag().is_playing());

        h.coord.on_media_play();
        assert!(h.coord.playback_flag().is_playing());
    }

    #[test]
    fn initialize_without_stored_volume_keeps_default() {
        let mut h = harness();
        h.coord.initialize();
        assert!((h.media.borrow().volume - 1.0).abs() < 1e-10);
        assert_eq!(h.coord.view().volume_icon, VolumeIcon::Max);
        assert_eq!(h.media.borrow().volume_writes, 0);
    }

    #[test]
    fn toggle_plays_and_records_intent() {
        let mut h = harness();
        h.coord.on_play_pause_clicked();
        assert!(!h.media.borrow().paused);
        assert!(h.coord.resume_intent());
        // Icon and flag wait for the element's own notification.
        assert_eq!(h.coord.view().play_icon, PlayIcon::Play);
        assert!(!h.coord.playback_flag().is_playing());

        h.coord.on_media_play();
        assert_eq!(h.coord.view().play_icon, PlayIcon::Pause);
        assert!(h.coord.playback_flag().is_playing());

        h.coord.on_canvas_clicked();
        assert!(h.media.borrow().paused);
        assert!(!h.coord.resume_intent());
        h.coord.on_media_pause();
        assert_eq!(h.coord.view().play_icon, PlayIcon::Play);
        assert!(!h.coord.playback_flag().is_playing());
    }

    #[test]
    fn toggle_on_ended_media_restarts() {
        let mut h = harness();
        {
            let mut m = h.media.borrow_mut();
            m.paused = false;
            m.ended = true;
        }
        h.coord.on_canvas_clicked();
        assert_eq!(h.media.borrow().play_calls, 1);
        assert!(h.coord.resume_intent());
    }

    #[test]
    fn play_icon_reads_element_not_event() {
        let mut h = harness();
        // A stale `play` notification after the element already paused again.
        h.media.borrow_mut().paused = true;
        h.coord.on_media_play();
        assert_eq!(h.coord.view().play_icon, PlayIcon::Play);
    }

    #[test]
    fn rejected_play_is_absorbed() {
        let mut h = harness();
        h.media.borrow_mut().reject_play = true;
        h.coord.on_play_pause_clicked();
        assert!(h.media.borrow().paused);
        assert!(h.notifier.borrow().alerts.is_empty());
    }

    #[test]
    fn time_update_moves_seek_bar() {
        let mut h = harness();
        loaded(&mut h);
        h.media.borrow_mut().current_time = 50.0;
        h.coord.on_time_update();
        let view = h.coord.view();
        assert!((view.seek.progress_percent - 25.0).abs() < 1e-10);
        assert!((view.seek.value - 50.0).abs() < 1e-10);
        assert_eq!(view.elapsed_label, "00:50");
        assert_eq!(view.duration_label, "03:20");
        assert!((view.seek.max - 200.0).abs() < 1e-10);
    }

    #[test]
    fn time_update_before_metadata_skips_progress() {
        let mut h = harness();
        h.media.borrow_mut().current_time = 3.0;
        h.coord.on_time_update();
        assert!(h.coord.view().seek.progress_percent.abs() < 1e-10);
        assert_eq!(h.coord.view().elapsed_label, "00:03");
        h.coord.on_loaded_metadata();
        assert_eq!(h.coord.view().duration_label, "00:00");
    }

    #[test]
    fn time_updates_suppressed_while_seeking() {
        let mut h = harness();
        loaded(&mut h);
        h.coord.on_drag_start();
        assert!(h.coord.is_seeking());
        h.coord.on_drag_input(100.0);
        let during = h.coord.view().clone();
        for t in 0..50 {
            h.media.borrow_mut().current_time = t as f64;
            h.coord.on_time_update();
        }
        assert_eq!(h.coord.view(), &during);
        assert!((during.seek.progress_percent - 50.0).abs() < 1e-10);
        assert_eq!(during.elapsed_label, "01:40");
    }

    #[test]
    fn drag_start_pauses_and_input_leaves_element_alone() {
        let mut h = harness();
        loaded(&mut h);
        h.media.borrow_mut().paused = false;
        h.media.borrow_mut().current_time = 10.0;
        h.coord.on_drag_start();
        assert!(h.media.borrow().paused);
        h.coord.on_drag_input(120.0);
        h.coord.on_drag_input(130.0);
        assert!((h.media.borrow().current_time - 10.0).abs() < 1e-10);
        assert!(h.media.borrow().seeks.is_empty());
    }

    #[test]
    fn drag_end_commits_exactly_once() {
        let mut h = harness();
        loaded(&mut h);
        h.coord.on_drag_start();
        for v in [10.0, 40.0, 90.0, 75.5] {
            h.coord.on_drag_input(v);
        }
        h.coord.on_drag_end(75.5);
        assert_eq!(h.media.borrow().seeks, vec![75.5]);
        assert!(!h.coord.is_seeking());

        // Time updates flow again after release.
        h.media.borrow_mut().current_time = 80.0;
        h.coord.on_time_update();
        assert!((h.coord.view().seek.progress_percent - 40.0).abs() < 1e-10);
    }

    #[test]
    fn drag_end_resumes_only_with_intent() {
        let mut h = harness();
        loaded(&mut h);
        h.coord.on_drag_start();
        h.coord.on_drag_end(20.0);
        assert_eq!(h.media.borrow().play_calls, 0);

        h.coord.on_play_pause_clicked();
        h.coord.on_drag_start();
        h.coord.on_drag_end(30.0);
        assert_eq!(h.media.borrow().play_calls, 2);
        assert!(!h.media.borrow().paused);
        assert_eq!(h.media.borrow().seeks, vec![20.0, 30.0]);
    }

    #[test]
    fn non_finite_drag_values_never_reach_view() {
        let mut h = harness();
        loaded(&mut h);
        h.coord.on_drag_start();
        h.coord.on_drag_input(50.0);
        let before = h.coord.view().clone();
        h.coord.on_drag_input(f64::NAN);
        assert_eq!(h.coord.view(), &before);

        h.coord.on_drag_end(f64::NAN);
        assert!(!h.coord.is_seeking());
        assert!(h.media.borrow().seeks.is_empty());
        assert!((h.coord.view().seek.value - 50.0).abs() < 1e-10);
    }

    #[test]
    fn volume_input_writes_persists_and_sets_icon() {
        let mut h = harness();
        h.coord.on_volume_input(0.3);
        assert!((h.media.borrow().volume - 0.3).abs() < 1e-10);
        assert_eq!(h.store.borrow().saved, vec![0.3]);
        assert_eq!(h.coord.view().volume_icon, VolumeIcon::Half);

        h.coord.on_volume_input(0.0);
        assert_eq!(h.coord.view().volume_icon, VolumeIcon::Zero);
        h.coord.on_volume_input(1.7);
        assert!((h.media.borrow().volume - 1.0).abs() < 1e-10);
        assert_eq!(h.coord.view().volume_icon, VolumeIcon::Max);
    }

    #[test]
    fn volume_store_failure_is_absorbed() {
        let mut h = harness();
        h.store.borrow_mut().fail_saves = true;
        h.coord.on_volume_input(0.6);
        assert!((h.media.borrow().volume - 0.6).abs() < 1e-10);
        assert_eq!(h.coord.view().volume_icon, VolumeIcon::Max);
    }

    #[test]
    fn volume_change_syncs_slider_from_element() {
        let mut h = harness();
        h.media.borrow_mut().volume = 0.25;
        h.coord.on_volume_change();
        assert!((h.coord.view().volume.value - 0.25).abs() < 1e-10);
        assert_eq!(h.coord.view().volume.css_progress, "25%");
        assert!(h.store.borrow().saved.is_empty());
    }

    #[test]
    fn mute_forces_zero_icon_and_unmute_restores() {
        let mut h = harness();
        h.coord.on_volume_input(0.9);
        h.coord.on_mute_clicked();
        assert!(h.media.borrow().muted);
        assert_eq!(h.coord.view().volume_icon, VolumeIcon::Zero);
        h.coord.on_mute_clicked();
        assert_eq!(h.coord.view().volume_icon, VolumeIcon::Max);

        // Unmuting at zero volume still shows zero.
        h.coord.on_volume_input(0.0);
        h.coord.on_mute_clicked();
        h.coord.on_mute_clicked();
        assert_eq!(h.coord.view().volume_icon, VolumeIcon::Zero);
    }

    #[test]
    fn volume_input_while_muted_keeps_zero_icon() {
        let mut h = harness();
        h.coord.on_mute_clicked();
        h.coord.on_volume_input(0.8);
        assert_eq!(h.coord.view().volume_icon, VolumeIcon::Zero);
    }

    #[test]
    fn quality_selection_maps_positions_to_levels() {
        let mut h = harness();
        h.coord.on_manifest_parsed(&[
            QualityLevel { height: 360, bitrate: None },
            QualityLevel { height: 720, bitrate: None },
            QualityLevel { height: 1080, bitrate: None },
        ]);
        h.coord.on_quality_button_clicked();
        assert!(h.coord.view().quality.visible);
        h.coord.on_quality_selected(0);
        assert!(!h.coord.view().quality.visible);
        h.coord.on_quality_selected(2);
        h.coord.on_quality_selected(3);
        assert_eq!(h.transport.borrow().level_writes, vec![AUTO_LEVEL, 1, 2]);
    }

    #[test]
    fn quality_out_of_range_is_ignored() {
        let mut h = harness();
        h.coord.on_manifest_parsed(&[QualityLevel { height: 480, bitrate: None }]);
        h.coord.on_quality_button_clicked();
        h.coord.on_quality_selected(5);
        assert!(h.transport.borrow().level_writes.is_empty());
        assert!(h.coord.view().quality.visible);
    }

    #[test]
    fn quality_menu_rebuilt_on_each_manifest() {
        let mut h = harness();
        h.coord.on_manifest_parsed(&[QualityLevel { height: 480, bitrate: None }]);
        h.coord.on_manifest_parsed(&[
            QualityLevel { height: 240, bitrate: None },
            QualityLevel { height: 1080, bitrate: None },
        ]);
        let labels: Vec<_> = h.coord.view().quality.entries.iter().map(|e| e.label.clone()).collect();
        assert_eq!(labels, ["Auto", "240p", "1080p"]);
    }

    #[test]
    fn quality_toggle_is_independent_of_selection() {
        let mut h = harness();
        h.coord.on_quality_button_clicked();
        h.coord.on_quality_button_clicked();
        assert!(!h.coord.view().quality.visible);
    }

    #[test]
    fn fullscreen_enters_and_exits() {
        let mut h = harness();
        h.coord.on_fullscreen_clicked();
        assert_eq!(h.coord.view().fullscreen_icon, FullscreenIcon::Exit);
        assert_eq!(h.fullscreen.borrow().requests, 1);
        h.coord.on_fullscreen_clicked();
        assert_eq!(h.coord.view().fullscreen_icon, FullscreenIcon::Enter);
        assert_eq!(h.fullscreen.borrow().exits, 1);
    }

    #[test]
    fn fullscreen_rejection_alerts_without_state_change() {
        let mut h = harness();
        h.fullscreen.borrow_mut().reject = Some(crate::error::FullscreenError::GestureRequired);
        let before = h.coord.view().clone();
        h.coord.on_fullscreen_clicked();
        assert_eq!(h.coord.view(), &before);
        assert!(!h.fullscreen.borrow().active);
        let notifier = h.notifier.borrow();
        assert_eq!(notifier.alerts.len(), 1);
        assert!(notifier.alerts[0].contains("user gesture"));
    }

    #[test]
    fn fullscreen_icon_follows_external_exit() {
        let mut h = harness();
        h.coord.on_fullscreen_clicked();
        // User pressed Escape; the host reports the change.
        h.fullscreen.borrow_mut().active = false;
        h.coord.on_fullscreen_change();
        assert_eq!(h.coord.view().fullscreen_icon, FullscreenIcon::Enter);
    }

    #[test]
    fn foregrounding_requests_recovery() {
        let mut h = harness();
        h.coord.on_visibility_change(true);
        assert_eq!(h.transport.borrow().recover_calls, 0);
        h.coord.on_visibility_change(false);
        assert_eq!(h.transport.borrow().recover_calls, 1);
    }

    #[test]
    fn failing_recovery_does_not_propagate() {
        let mut h = harness();
        h.transport.borrow_mut().fail_recovery = true;
        let before = h.coord.view().clone();
        capture_logs();
        h.coord.on_visibility_change(false);
        assert_eq!(h.transport.borrow().recover_calls, 1);
        assert_eq!(h.coord.view(), &before);
        assert!(h.notifier.borrow().alerts.is_empty());
        let errors: Vec<_> = take_logs()
            .into_iter()
            .filter(|(level, _)| *level == log::Level::Error)
            .collect();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].1.contains("decoder gone"));
    }

    #[test]
    fn no_transport_means_no_recovery_and_menu_only_closes() {
        let mut h = harness_without_transport();
        h.coord.on_visibility_change(false);
        h.coord.on_manifest_parsed(&[QualityLevel { height: 720, bitrate: None }]);
        h.coord.on_quality_button_clicked();
        h.coord.on_quality_selected(1);
        assert!(!h.coord.view().quality.visible);
        assert!(h.coord.transport().is_none());
    }

    #[test]
    fn handle_routes_events() {
        let mut h = harness();
        h.media.borrow_mut().duration = 100.0;
        h.coord.handle(&WidgetEvent::Media(MediaEvent::LoadedMetadata));
        h.coord.handle(&UiAction::SeekDragStart.into());
        h.coord.handle(&UiAction::SeekDragInput { value: 25.0 }.into());
        h.coord.handle(&MediaEvent::TimeUpdate.into());
        assert!((h.coord.view().seek.progress_percent - 25.0).abs() < 1e-10);
        h.coord.handle(&UiAction::SeekDragEnd { value: 25.0 }.into());
        assert_eq!(h.media.borrow().seeks, vec![25.0]);
        h.coord.handle(&PageEvent::VisibilityChange { hidden: false }.into());
        assert_eq!(h.transport.borrow().recover_calls, 1);
    }
}
