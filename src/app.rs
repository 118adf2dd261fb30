//! Application shell: owns the players, the loader handle and all UI state,
//! and wires widget interactions back into the engines once per frame.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam_channel::Receiver;
use eframe::egui;
use log::{info, warn};

use crate::core::events::{EventSender, PlayerEvent};
use crate::core::loader::{DataSource, EpisodeLoader, FetchOutcome, LoaderHandle};
use crate::core::playback::{PlaybackState, SequencePlayer};
use crate::core::video::{ClockTransport, VideoController};
use crate::entities::{EpisodeSummary, Pose, SceneSample};
use crate::selector::{self, ScatterPoint};
use crate::widgets::{
    index_to_ratio, menu_bar, ratio_to_index, transport_bar, MenuSelection, ScatterView,
    SceneView, TransportAction,
};

pub struct EpiscopeApp {
    selection: MenuSelection,

    // Data
    loader: LoaderHandle,
    /// Generation of the newest fetch outcome applied so far. Older
    /// completions are dropped on arrival.
    applied_generation: u64,
    summaries: Vec<EpisodeSummary>,
    points: Vec<ScatterPoint>,
    selected: Option<EpisodeSummary>,
    goal: Option<Pose>,
    goal_image_url: Option<String>,
    error_msg: Option<String>,

    // Playback
    player: SequencePlayer<SceneSample>,
    player_rx: Receiver<PlayerEvent>,
    current_sample: Option<SceneSample>,
    video: VideoController,
    transport: ClockTransport,

    // UI
    scatter: ScatterView,
    /// Autoplay the next loaded episode; set by the CLI for the first
    /// episode and by clicking a scatter point thereafter.
    first_load_autoplay: bool,
}

impl EpiscopeApp {
    /// Build the app and kick off the initial summary fetch.
    pub fn new(
        source: DataSource,
        selection: MenuSelection,
        interval: Duration,
        autoplay: bool,
    ) -> Self {
        let mut loader = LoaderHandle::spawn(EpisodeLoader::new(source));
        loader.request_summaries(selection.filter());

        let (player_tx, player_rx) = EventSender::channel();
        Self {
            selection,
            loader,
            applied_generation: 0,
            summaries: Vec::new(),
            points: Vec::new(),
            selected: None,
            goal: None,
            goal_image_url: None,
            error_msg: None,
            player: SequencePlayer::new(interval, player_tx),
            player_rx,
            current_sample: None,
            // Video state is read back through time()/duration()/state()
            // each frame; the event channel is observer-optional and stays
            // unwired here.
            video: VideoController::new(EventSender::dummy()),
            transport: ClockTransport::new(),
            scatter: ScatterView::default(),
            first_load_autoplay: autoplay,
        }
    }

    /// Apply completed fetches, newest-generation-wins. A failure keeps the
    /// previous data on screen and shows a banner instead.
    fn apply_fetch_outcomes(&mut self) {
        for outcome in self.loader.poll() {
            if outcome.is_stale(self.applied_generation) {
                info!("dropping stale fetch outcome gen={}", outcome.generation());
                continue;
            }
            self.applied_generation = outcome.generation();

            match outcome {
                FetchOutcome::Summaries { filter, result, .. } => match result {
                    Ok(summaries) => {
                        info!("{} summaries loaded for {}", summaries.len(), filter);
                        self.summaries = summaries;
                        self.points = selector::build_points(&self.summaries, self.selection.metric);
                        self.error_msg = None;

                        // Load the first episode right away so the viewer
                        // never shows an empty scene.
                        if let Some(first) = self.summaries.first().cloned() {
                            let autoplay = self.first_load_autoplay;
                            self.first_load_autoplay = false;
                            self.loader
                                .request_episode(first, self.selection.filter(), autoplay);
                        }
                    }
                    Err(e) => {
                        warn!("summary fetch failed: {}", e);
                        self.error_msg = Some(e.to_string());
                    }
                },
                FetchOutcome::Episode {
                    summary,
                    autoplay,
                    video_url,
                    goal_image_url,
                    result,
                    ..
                } => match result {
                    Ok(episode) => {
                        info!(
                            "episode {} loaded: {} samples, {:.2}s",
                            episode.episode_id,
                            episode.points.len(),
                            episode.duration()
                        );
                        let duration = episode.duration();
                        self.goal = Some(episode.goal);
                        self.goal_image_url = Some(goal_image_url);
                        self.selected = Some(summary);
                        self.error_msg = None;

                        let frames: Arc<[SceneSample]> = Arc::from(episode.points);
                        self.player.set_autoplay(autoplay);
                        self.player.set_sequence(frames);

                        self.transport.load(video_url, duration);
                        self.video.reset(autoplay);
                    }
                    Err(e) => {
                        warn!("episode fetch failed: {}", e);
                        self.error_msg = Some(e.to_string());
                    }
                },
            }
        }
    }

    /// Advance both playback engines and sync the rendered sample.
    fn drive_playback(&mut self, now: Instant) {
        self.player.update(now);

        // Emissions are idempotent; only the latest matters for rendering.
        let mut moved = false;
        for event in self.player_rx.try_iter() {
            if matches!(event, PlayerEvent::FrameChanged { .. }) {
                moved = true;
            }
        }
        if moved {
            self.current_sample = self.player.current().cloned();
        }

        for signal in self.transport.poll(now) {
            self.video.on_signal(signal, &mut self.transport);
        }
    }

    fn scene_panel(&mut self, ui: &mut egui::Ui) {
        SceneView::show(ui, self.goal.as_ref(), self.current_sample.as_ref());

        let progress = index_to_ratio(self.player.cursor(), self.player.len());
        let action = transport_bar(ui, self.player.state(), progress);
        match action {
            Some(TransportAction::Toggle) => {
                self.player.toggle();
            }
            Some(TransportAction::Scrub(ratio)) => {
                self.player.seek(ratio_to_index(ratio, self.player.len()));
            }
            None => {}
        }
        if action.is_some() {
            self.current_sample = self.player.current().cloned();
        }
    }

    fn video_panel(&mut self, ui: &mut egui::Ui) {
        // No decoder is wired in; show the timeline against the recording's
        // location so scrubbing and completion still behave like the real
        // element would.
        if let Some(url) = self.transport.url() {
            ui.label(egui::RichText::new(url).monospace().weak());
        }
        ui.label(format!(
            "{:.2}s / {:.2}s",
            self.video.time(),
            self.video.duration()
        ));

        let progress = if self.video.duration() > 0.0 {
            (self.video.time() / self.video.duration()) as f32
        } else {
            0.0
        };
        match transport_bar(ui, self.video.state(), progress) {
            Some(TransportAction::Toggle) => self.video.toggle(&mut self.transport),
            Some(TransportAction::Scrub(ratio)) => {
                let target = ratio as f64 * self.video.duration();
                self.video.seek(target, &mut self.transport);
            }
            None => {}
        }
    }

    fn info_panel(&self, ui: &mut egui::Ui) {
        let Some(summary) = &self.selected else {
            return;
        };
        ui.separator();
        let tag = crate::entities::EpisodeTag::parse(&summary.episode_id);
        if tag.is_blank() {
            ui.label(&summary.episode_id);
        } else {
            ui.label(format!("{} {}", summary.episode_id, tag.label()));
        }
        ui.label(format!(
            "rotation error: {:.4} rad    position error: {:.4} m",
            summary.rotation_error, summary.translation_error
        ));
        if let Some(url) = &self.goal_image_url {
            ui.label(egui::RichText::new(format!("goal: {url}")).monospace().weak());
        }
    }
}

impl eframe::App for EpiscopeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();

        self.apply_fetch_outcomes();
        self.drive_playback(now);

        egui::TopBottomPanel::top("menu").show(ctx, |ui| {
            let response = menu_bar(ui, &mut self.selection);
            if response.filter_changed {
                self.loader.request_summaries(self.selection.filter());
            }
            if response.metric_changed {
                self.points = selector::build_points(&self.summaries, self.selection.metric);
            }
        });

        if let Some(msg) = self.error_msg.clone() {
            egui::TopBottomPanel::bottom("errors").show(ctx, |ui| {
                ui.colored_label(egui::Color32::from_rgb(220, 80, 80), msg);
            });
        }

        egui::SidePanel::left("selector")
            .resizable(true)
            .default_width(440.0)
            .show(ctx, |ui| {
                ui.heading(self.selection.metric.label());
                let picked = self.scatter.show(ui, &self.points, self.selection.metric);
                if let Some(id) = picked {
                    // Resolve by id against the live list; a stale click
                    // (filter changed under the plot) is silently dropped.
                    if let Some(summary) = selector::resolve(&self.summaries, &id).cloned() {
                        info!("episode {} selected", summary.episode_id);
                        self.loader
                            .request_episode(summary, self.selection.filter(), true);
                    }
                }
                self.info_panel(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            if self.selection.video_visible() {
                self.video_panel(ui);
            } else {
                self.scene_panel(ui);
            }
        });

        // Keep polling while anything is moving or still in flight.
        if self.player.state() == PlaybackState::Playing
            || self.video.state() == PlaybackState::Playing
        {
            ctx.request_repaint();
        } else if self.loader.in_flight(self.applied_generation) {
            ctx.request_repaint_after(Duration::from_millis(50));
        }
    }
}
