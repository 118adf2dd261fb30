//! Episode data access: summary/detail fetch plus asset URL derivation.
//!
//! **Why**: Trajectories are heavy; the scatter plot only needs the summary
//! document, and full episodes are fetched lazily when selected. Data lives
//! either in a local directory tree or behind an HTTP base URL, laid out as
//! `<root>/<origin>/<mode>/{stats.json, <id>.json}`.
//!
//! Fetching runs on a background thread ([`LoaderHandle`]); every request
//! carries a monotonic generation so out-of-order completions can be
//! recognized and dropped by the consumer instead of regressing the UI to
//! a stale episode.

use std::fmt;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::thread;

use crossbeam_channel::{unbounded, Receiver, Sender};
use log::{debug, info, warn};
use serde::de::DeserializeOwned;

use crate::entities::{Episode, EpisodeSummary, Filter};

/// Load failure taxonomy. Fetch failures are surfaced to the caller, never
/// substituted with default data, and never retried here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// The resource does not exist (missing file, HTTP 404).
    NotFound(String),
    /// Transport-level failure (connection, non-404 status).
    Network(String),
    /// The document arrived but is not valid episode JSON.
    Parse(String),
    /// Local filesystem error other than absence.
    Io(String),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::NotFound(what) => write!(f, "not found: {}", what),
            LoadError::Network(e) => write!(f, "network error: {}", e),
            LoadError::Parse(e) => write!(f, "malformed document: {}", e),
            LoadError::Io(e) => write!(f, "i/o error: {}", e),
        }
    }
}

impl std::error::Error for LoadError {}

/// Where the episode tree lives.
#[derive(Debug, Clone)]
pub enum DataSource {
    /// Local directory root.
    Dir(PathBuf),
    /// HTTP(S) base URL, fetched with a blocking client.
    Http(String),
}

/// Fetches episode documents and derives asset locations.
#[derive(Debug, Clone)]
pub struct EpisodeLoader {
    source: DataSource,
}

impl EpisodeLoader {
    pub fn new(source: DataSource) -> Self {
        Self { source }
    }

    fn root(&self) -> String {
        match &self.source {
            DataSource::Dir(path) => path.display().to_string().replace('\\', "/"),
            DataSource::Http(base) => base.trim_end_matches('/').to_string(),
        }
    }

    /// Location of the summary document for a dataset slice. Pure.
    pub fn stats_url(&self, filter: &Filter) -> String {
        format!("{}/{}/stats.json", self.root(), filter.rel_dir())
    }

    /// Location of one episode's detail document. Pure.
    pub fn episode_url(&self, id: &str, filter: &Filter) -> String {
        format!("{}/{}/{}.json", self.root(), filter.rel_dir(), id)
    }

    /// Location of the goal overlay image for an episode. Pure; defined
    /// for any id, no existence check.
    pub fn goal_image_url(&self, id: &str, filter: &Filter) -> String {
        format!("{}/{}/goals/{}.png", self.root(), filter.rel_dir(), id)
    }

    /// Location of the recorded hardware video for an episode. Pure;
    /// defined for any id, no existence check.
    pub fn video_url(&self, id: &str, filter: &Filter) -> String {
        format!("{}/videos/{}/{}.mp4", self.root(), filter.mode.dir_name(), id)
    }

    /// Fetch the summary collection for a dataset slice.
    pub fn fetch_summaries(&self, filter: &Filter) -> Result<Vec<EpisodeSummary>, LoadError> {
        self.fetch_json(&self.stats_url(filter))
    }

    /// Fetch one full episode by identifier.
    pub fn fetch_episode(&self, id: &str, filter: &Filter) -> Result<Episode, LoadError> {
        self.fetch_json(&self.episode_url(id, filter))
    }

    fn fetch_json<T: DeserializeOwned>(&self, location: &str) -> Result<T, LoadError> {
        let text = self.fetch_text(location)?;
        serde_json::from_str(&text).map_err(|e| LoadError::Parse(format!("{}: {}", location, e)))
    }

    fn fetch_text(&self, location: &str) -> Result<String, LoadError> {
        match &self.source {
            DataSource::Dir(_) => match std::fs::read_to_string(location) {
                Ok(text) => Ok(text),
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    Err(LoadError::NotFound(location.to_string()))
                }
                Err(e) => Err(LoadError::Io(format!("{}: {}", location, e))),
            },
            DataSource::Http(_) => {
                debug!("GET {}", location);
                match ureq::get(location).call() {
                    Ok(response) => response
                        .into_body()
                        .read_to_string()
                        .map_err(|e| LoadError::Network(format!("{}: {}", location, e))),
                    Err(ureq::Error::StatusCode(404)) => {
                        Err(LoadError::NotFound(location.to_string()))
                    }
                    Err(e) => Err(LoadError::Network(format!("{}: {}", location, e))),
                }
            }
        }
    }
}

/// A fetch job handed to the background thread.
#[derive(Debug, Clone)]
pub enum FetchRequest {
    Summaries {
        generation: u64,
        filter: Filter,
    },
    Episode {
        generation: u64,
        summary: EpisodeSummary,
        filter: Filter,
        autoplay: bool,
    },
}

/// A completed fetch, delivered back to the UI thread.
///
/// Episode outcomes also carry the derived asset locations so the consumer
/// never needs loader access of its own.
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    Summaries {
        generation: u64,
        filter: Filter,
        result: Result<Vec<EpisodeSummary>, LoadError>,
    },
    Episode {
        generation: u64,
        summary: EpisodeSummary,
        autoplay: bool,
        video_url: String,
        goal_image_url: String,
        result: Result<Episode, LoadError>,
    },
}

impl FetchOutcome {
    pub fn generation(&self) -> u64 {
        match self {
            FetchOutcome::Summaries { generation, .. } => *generation,
            FetchOutcome::Episode { generation, .. } => *generation,
        }
    }

    /// Whether this outcome was overtaken by a newer one. `applied` is the
    /// generation of the last outcome the consumer accepted; anything at or
    /// below it must be dropped, not applied.
    pub fn is_stale(&self, applied: u64) -> bool {
        self.generation() <= applied
    }
}

/// Handle to the background fetch thread.
///
/// Requests are tagged with a monotonic generation; the consumer applies
/// an outcome only if its generation is newer than the last one applied,
/// which makes rapid reselection races resolve in request order.
pub struct LoaderHandle {
    requests: Sender<FetchRequest>,
    outcomes: Receiver<FetchOutcome>,
    generation: u64,
}

impl LoaderHandle {
    /// Spawn the fetch worker. It exits when the handle is dropped.
    pub fn spawn(loader: EpisodeLoader) -> Self {
        let (req_tx, req_rx) = unbounded::<FetchRequest>();
        let (out_tx, out_rx) = unbounded::<FetchOutcome>();

        thread::Builder::new()
            .name("episode-fetch".into())
            .spawn(move || fetch_worker(loader, req_rx, out_tx))
            .expect("spawn fetch worker");

        Self {
            requests: req_tx,
            outcomes: out_rx,
            generation: 0,
        }
    }

    /// Queue a summary fetch. Returns the assigned generation.
    pub fn request_summaries(&mut self, filter: Filter) -> u64 {
        self.generation += 1;
        let generation = self.generation;
        debug!("requesting summaries gen={} ({})", generation, filter);
        let _ = self.requests.send(FetchRequest::Summaries { generation, filter });
        generation
    }

    /// Queue an episode fetch. Returns the assigned generation.
    pub fn request_episode(
        &mut self,
        summary: EpisodeSummary,
        filter: Filter,
        autoplay: bool,
    ) -> u64 {
        self.generation += 1;
        let generation = self.generation;
        debug!(
            "requesting episode gen={} id={} autoplay={}",
            generation, summary.episode_id, autoplay
        );
        let _ = self.requests.send(FetchRequest::Episode {
            generation,
            summary,
            filter,
            autoplay,
        });
        generation
    }

    /// Drain completed fetches. Non-blocking.
    pub fn poll(&self) -> Vec<FetchOutcome> {
        self.outcomes.try_iter().collect()
    }

    /// Whether any request newer than `applied` may still be in flight.
    pub fn in_flight(&self, applied: u64) -> bool {
        self.generation > applied
    }
}

fn fetch_worker(
    loader: EpisodeLoader,
    requests: Receiver<FetchRequest>,
    outcomes: Sender<FetchOutcome>,
) {
    info!("episode fetch worker started");
    while let Ok(request) = requests.recv() {
        let outcome = match request {
            FetchRequest::Summaries { generation, filter } => {
                let result = loader.fetch_summaries(&filter);
                if let Err(ref e) = result {
                    warn!("summary fetch gen={} failed: {}", generation, e);
                }
                FetchOutcome::Summaries {
                    generation,
                    filter,
                    result,
                }
            }
            FetchRequest::Episode {
                generation,
                summary,
                filter,
                autoplay,
            } => {
                let result = loader.fetch_episode(&summary.episode_id, &filter);
                if let Err(ref e) = result {
                    warn!(
                        "episode fetch gen={} id={} failed: {}",
                        generation, summary.episode_id, e
                    );
                }
                FetchOutcome::Episode {
                    generation,
                    video_url: loader.video_url(&summary.episode_id, &filter),
                    goal_image_url: loader.goal_image_url(&summary.episode_id, &filter),
                    summary,
                    autoplay,
                    result,
                }
            }
        };
        if outcomes.send(outcome).is_err() {
            break; // UI gone
        }
    }
    info!("episode fetch worker exiting");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{ControlMode, DataOrigin, Pose};
    use std::fs;
    use std::path::Path;
    use std::time::Duration;

    fn fixture_root(name: &str) -> PathBuf {
        let root = std::env::temp_dir().join(format!(
            "episcope-loader-{}-{}",
            name,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&root);
        root
    }

    fn write_slice(root: &Path, filter: &Filter) {
        let dir = root.join(filter.rel_dir());
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("stats.json"),
            r#"[{
                "episodeId": "seed_1_segment_0",
                "goal": {"position":{"x":0.2,"y":0,"z":0},
                         "rotation":{"w":1,"x":0,"y":0,"z":0}},
                "initialPose": {"position":{"x":0,"y":0,"z":0},
                                "rotation":{"w":1,"x":0,"y":0,"z":0}},
                "finalPose": {"position":{"x":0.19,"y":0,"z":0},
                              "rotation":{"w":1,"x":0,"y":0,"z":0}},
                "rotationError": 0.05,
                "translationError": 0.01
            }]"#,
        )
        .unwrap();
        fs::write(
            dir.join("seed_1_segment_0.json"),
            r#"{
                "episodeId": "seed_1_segment_0",
                "goal": {"position":{"x":0.2,"y":0,"z":0},
                         "rotation":{"w":1,"x":0,"y":0,"z":0}},
                "points": [
                    {"timeFromStart": 0.0, "joints": [0.0],
                     "object": {"position":{"x":0,"y":0,"z":0},
                                "rotation":{"w":1,"x":0,"y":0,"z":0}}},
                    {"timeFromStart": 1.0, "joints": [0.5],
                     "object": {"position":{"x":0.1,"y":0,"z":0},
                                "rotation":{"w":1,"x":0,"y":0,"z":0}}}
                ]
            }"#,
        )
        .unwrap();
        fs::write(dir.join("broken.json"), "{ not json").unwrap();
    }

    #[test]
    fn test_dir_fetch_roundtrip() {
        let root = fixture_root("roundtrip");
        let filter = Filter::default();
        write_slice(&root, &filter);
        let loader = EpisodeLoader::new(DataSource::Dir(root.clone()));

        let stats = loader.fetch_summaries(&filter).unwrap();
        assert_eq!(stats.len(), 1);

        let episode = loader.fetch_episode("seed_1_segment_0", &filter).unwrap();
        assert_eq!(episode.points.len(), 2);
        assert!((episode.duration() - 1.0).abs() < 1e-12);

        fs::remove_dir_all(root).unwrap();
    }

    #[test]
    fn test_missing_episode_is_not_found() {
        let root = fixture_root("missing");
        let filter = Filter::default();
        write_slice(&root, &filter);
        let loader = EpisodeLoader::new(DataSource::Dir(root.clone()));

        match loader.fetch_episode("seed_9_segment_9", &filter) {
            Err(LoadError::NotFound(_)) => {}
            other => panic!("expected NotFound, got {other:?}"),
        }
        fs::remove_dir_all(root).unwrap();
    }

    #[test]
    fn test_malformed_document_is_parse_error() {
        let root = fixture_root("parse");
        let filter = Filter::default();
        write_slice(&root, &filter);
        let loader = EpisodeLoader::new(DataSource::Dir(root.clone()));

        match loader.fetch_episode("broken", &filter) {
            Err(LoadError::Parse(_)) => {}
            other => panic!("expected Parse, got {other:?}"),
        }
        fs::remove_dir_all(root).unwrap();
    }

    #[test]
    fn test_url_builders_are_pure_and_total() {
        let loader = EpisodeLoader::new(DataSource::Http("https://example.org/data/arm/".into()));
        let filter = Filter::new(ControlMode::ClosedLoop, DataOrigin::Hardware);

        // Defined even for ids that do not exist; stable across calls.
        let video = loader.video_url("ghost_episode", &filter);
        assert_eq!(
            video,
            "https://example.org/data/arm/videos/closed_loop/ghost_episode.mp4"
        );
        assert_eq!(video, loader.video_url("ghost_episode", &filter));
        assert_eq!(
            loader.goal_image_url("seed_2_segment_1", &filter),
            "https://example.org/data/arm/hardware/closed_loop/goals/seed_2_segment_1.png"
        );
        assert_eq!(
            loader.stats_url(&filter),
            "https://example.org/data/arm/hardware/closed_loop/stats.json"
        );
        assert_eq!(
            loader.episode_url("seed_2_segment_1", &filter),
            "https://example.org/data/arm/hardware/closed_loop/seed_2_segment_1.json"
        );
    }

    #[test]
    fn test_overtaken_outcome_is_stale() {
        // Rapid reselection: the second request finishes first, then the
        // slow first response arrives. It must be dropped, not applied.
        let slow = FetchOutcome::Summaries {
            generation: 1,
            filter: Filter::default(),
            result: Ok(Vec::new()),
        };
        let fast = FetchOutcome::Summaries {
            generation: 2,
            filter: Filter::default(),
            result: Ok(Vec::new()),
        };

        let mut applied = 0;
        assert!(!fast.is_stale(applied));
        applied = fast.generation();

        assert!(slow.is_stale(applied));
        // Redelivery of the applied generation is stale too.
        assert!(fast.is_stale(applied));
        // A genuinely newer outcome still goes through.
        let next = FetchOutcome::Summaries {
            generation: 3,
            filter: Filter::default(),
            result: Ok(Vec::new()),
        };
        assert!(!next.is_stale(applied));
    }

    #[test]
    fn test_background_worker_generations() {
        let root = fixture_root("worker");
        let filter = Filter::default();
        write_slice(&root, &filter);
        let loader = EpisodeLoader::new(DataSource::Dir(root.clone()));
        let mut handle = LoaderHandle::spawn(loader);

        let g1 = handle.request_summaries(filter);
        let summary = EpisodeSummary {
            episode_id: "seed_1_segment_0".into(),
            goal: Pose::default(),
            initial_pose: Pose::default(),
            final_pose: Pose::default(),
            rotation_error: 0.05,
            translation_error: 0.01,
        };
        let g2 = handle.request_episode(summary, filter, true);
        assert!(g2 > g1);
        assert!(handle.in_flight(0));

        // Collect both outcomes (the worker is a thread; give it a moment).
        let mut outcomes = Vec::new();
        for _ in 0..100 {
            outcomes.extend(handle.poll());
            if outcomes.len() == 2 {
                break;
            }
            thread::sleep(Duration::from_millis(10));
        }
        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].generation(), g1);
        assert_eq!(outcomes[1].generation(), g2);
        match &outcomes[1] {
            FetchOutcome::Episode {
                result, autoplay, ..
            } => {
                assert!(*autoplay);
                assert_eq!(result.as_ref().unwrap().points.len(), 2);
            }
            other => panic!("expected episode outcome, got {other:?}"),
        }
        assert!(!handle.in_flight(g2));

        fs::remove_dir_all(root).unwrap();
    }
}
