//! Typed event channels for player and loader notifications.
//!
//! Components hold an [`EventSender`] and emit when significant state
//! changes occur; the owner of the matching receiver drains it once per UI
//! frame to trigger side effects (updating the scene, logging). Handlers
//! run on the draining thread in emit order within one channel; no ordering
//! is guaranteed across channels.

use crossbeam_channel::{unbounded, Receiver, Sender};

use crate::core::playback::PlaybackState;

/// Events emitted by a sequence player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerEvent {
    /// Cursor moved, or the frame at the cursor was re-emitted. Consumers
    /// must tolerate repeats of the same cursor (idempotent by design).
    FrameChanged { cursor: usize },

    /// Playback state transition.
    StateChanged { state: PlaybackState },
}

/// Events emitted by the video timeline controller.
#[derive(Debug, Clone, PartialEq)]
pub enum VideoEvent {
    /// The media reported its duration (seconds).
    DurationChanged { seconds: f64 },

    /// The media clock advanced or was seeked (seconds).
    TimeUpdated { seconds: f64 },

    /// Playback state transition.
    StateChanged { state: PlaybackState },
}

/// Event sender wrapper.
///
/// Cloneable; a dummy variant drops events silently so components can be
/// constructed before the event wiring exists (and in tests that do not
/// care about emissions).
#[derive(Debug, Clone)]
pub struct EventSender<E> {
    sender: Option<Sender<E>>,
}

impl<E> EventSender<E> {
    /// Create a connected sender/receiver pair.
    pub fn channel() -> (Self, Receiver<E>) {
        let (tx, rx) = unbounded();
        (Self { sender: Some(tx) }, rx)
    }

    /// Create a sender with no receiver (events are dropped).
    pub fn dummy() -> Self {
        Self { sender: None }
    }

    /// Emit an event. Silent if the receiver was dropped.
    pub fn emit(&self, event: E) {
        if let Some(ref tx) = self.sender {
            let _ = tx.send(event);
        }
    }
}

impl<E> Default for EventSender<E> {
    fn default() -> Self {
        Self::dummy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_delivers_in_order() {
        let (tx, rx) = EventSender::channel();
        tx.emit(PlayerEvent::FrameChanged { cursor: 0 });
        tx.emit(PlayerEvent::FrameChanged { cursor: 1 });
        let got: Vec<PlayerEvent> = rx.try_iter().collect();
        assert_eq!(
            got,
            vec![
                PlayerEvent::FrameChanged { cursor: 0 },
                PlayerEvent::FrameChanged { cursor: 1 },
            ]
        );
    }

    #[test]
    fn test_dummy_is_silent() {
        let tx: EventSender<PlayerEvent> = EventSender::dummy();
        tx.emit(PlayerEvent::FrameChanged { cursor: 7 }); // must not panic
    }

    #[test]
    fn test_emit_after_receiver_dropped() {
        let (tx, rx) = EventSender::channel();
        drop(rx);
        tx.emit(PlayerEvent::StateChanged {
            state: PlaybackState::Paused,
        });
    }
}
