//! Episode documents: trajectory samples, per-episode detail, summary stats.
//!
//! Two wire documents exist per dataset slice:
//! - `stats.json`: array of [`EpisodeSummary`] (goal, start/end pose, scalar
//!   errors) - enough to place a point on the scatter plot.
//! - `<id>.json`: one [`Episode`] with the full ordered sample trajectory,
//!   fetched lazily when the episode is selected.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::pose::Pose;

/// One sample of an episode trajectory: joint state plus the manipulated
/// object's pose at `time_from_start` seconds.
///
/// The players never look inside this; they are generic over the payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneSample {
    /// Seconds since the first sample of the episode.
    pub time_from_start: f64,
    /// Joint positions in hardware order (hand or arm, dataset-dependent).
    pub joints: Vec<f64>,
    /// Pose of the manipulated object.
    pub object: Pose,
}

/// Full episode detail: identifier, goal pose, ordered trajectory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    pub episode_id: String,
    pub goal: Pose,
    pub points: Vec<SceneSample>,
}

impl Episode {
    /// Timestamp of the last sample, seconds. Zero for empty trajectories.
    ///
    /// Hardware recordings are cut to the trajectory, so this doubles as
    /// the video duration when no decoder is available.
    pub fn duration(&self) -> f64 {
        self.points.last().map(|s| s.time_from_start).unwrap_or(0.0)
    }
}

/// Summary record from `stats.json`: everything the selector needs,
/// without the per-frame trajectory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeSummary {
    pub episode_id: String,
    pub goal: Pose,
    pub initial_pose: Pose,
    pub final_pose: Pose,
    /// Final orientation error vs goal, radians.
    pub rotation_error: f64,
    /// Final position error vs goal, meters.
    pub translation_error: f64,
}

static SEED_SEGMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"seed_(\d+)_segment_(\d+)").expect("static regex"));
static SEGMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"segment_(\d+)").expect("static regex"));

/// Display metadata extracted from an episode identifier.
///
/// Identifiers look like `run_seed_12_segment_3`; hand datasets omit the
/// seed. A malformed id degrades to blank fields rather than failing -
/// the id still selects and loads fine, it just has no pretty label.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EpisodeTag {
    pub seed: String,
    pub segment: String,
}

impl EpisodeTag {
    pub fn parse(episode_id: &str) -> Self {
        if let Some(caps) = SEED_SEGMENT_RE.captures(episode_id) {
            return Self {
                seed: caps[1].to_string(),
                segment: caps[2].to_string(),
            };
        }
        if let Some(caps) = SEGMENT_RE.captures(episode_id) {
            return Self {
                seed: String::new(),
                segment: caps[1].to_string(),
            };
        }
        Self::default()
    }

    pub fn is_blank(&self) -> bool {
        self.seed.is_empty() && self.segment.is_empty()
    }

    /// Short human label, e.g. `(seed 12, segment 3)` or `(segment 3)`.
    /// Empty for blank tags.
    pub fn label(&self) -> String {
        match (self.seed.is_empty(), self.segment.is_empty()) {
            (false, false) => format!("(seed {}, segment {})", self.seed, self.segment),
            (true, false) => format!("(segment {})", self.segment),
            _ => String::new(),
        }
    }
}
