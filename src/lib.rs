//! EPISCOPE - Robot episode replay viewer library
//!
//! Re-exports all modules for use by binary targets.

// Core engine (playback, video timeline, loading, events)
pub mod core;

// App modules
pub mod app;
pub mod cli;
pub mod entities;
pub mod selector;
pub mod widgets;

// Re-export commonly used types from core
pub use core::loader::{DataSource, EpisodeLoader, LoadError, LoaderHandle};
pub use core::playback::{PlaybackState, SequencePlayer};
pub use core::video::{ClockTransport, VideoController};

// Re-export entities
pub use entities::{Episode, EpisodeSummary, Filter, Pose, SceneSample};
