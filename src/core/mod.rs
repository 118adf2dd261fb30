//! Core engine modules - playback, video timeline, data loading, events.
//!
//! These form the replay engine, independent of UI.

pub mod events;
pub mod loader;
pub mod playback;
pub mod video;

// Re-exports for convenience
pub use events::{EventSender, PlayerEvent, VideoEvent};
pub use loader::{DataSource, EpisodeLoader, FetchOutcome, LoadError, LoaderHandle};
pub use playback::{PlaybackState, SequencePlayer};
pub use video::{ClockTransport, MediaTransport, TransportSignal, VideoController};
