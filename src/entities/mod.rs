//! Domain data model: poses, episodes, dataset filters.

pub mod episode;
pub mod filter;
pub mod pose;

pub use episode::{Episode, EpisodeSummary, EpisodeTag, SceneSample};
pub use filter::{ControlMode, DataOrigin, ErrorMetric, Filter};
pub use pose::{wrap_angle, Pose, Quatf, Vec3f};
