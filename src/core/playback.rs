//! Frame-sequence playback engine.
//!
//! **Why**: Episode replay needs deterministic, frame-accurate stepping
//! through a recorded trajectory, not wall-clock interpolation. The player
//! is generic over the frame payload - it never looks inside a frame, it
//! only moves a cursor and reports which frame to show.
//!
//! # Timing model
//!
//! Poll-driven: `update()` is called once per UI frame and advances the
//! cursor when the single pending deadline elapses. Exactly one deadline is
//! outstanding at any time; every path that leaves `Playing` or replaces
//! the sequence clears it first, so a stale timer can never advance the
//! cursor twice per interval.
//!
//! # Emission
//!
//! Frame emissions are idempotent by design: loading, pausing and seeking
//! re-emit the current frame so consumers always have something to render.
//! Repeats are not deduplicated.

use std::sync::Arc;
use std::time::{Duration, Instant};

use log::debug;

use crate::core::events::{EventSender, PlayerEvent};

/// Playback state. Exactly one is active per player instance.
///
/// `Disabled` is entered whenever the sequence is absent or has at most one
/// element; it is left only by replacing the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// Fresh sequence loaded, nothing played yet.
    Initial,
    Playing,
    Paused,
    /// Cursor reached the final frame.
    Completed,
    /// Sequence missing or too short to play; controls are no-ops.
    Disabled,
}

/// Generic sequence player: drives [`PlaybackState`] over a discrete
/// frame cursor.
///
/// The trajectory data is shared (`Arc<[T]>`) and owned by whoever
/// orchestrates episode selection; the player owns only its cursor, state
/// and tick deadline. Sequence identity is pointer identity - handing the
/// player a different `Arc` means "new episode", the same `Arc` is a no-op.
pub struct SequencePlayer<T> {
    frames: Arc<[T]>,
    cursor: usize,
    state: PlaybackState,
    interval: Duration,
    autoplay: bool,
    /// The single pending tick deadline. `None` while Playing means
    /// "arm on next update".
    next_due: Option<Instant>,
    events: EventSender<PlayerEvent>,
}

impl<T> SequencePlayer<T> {
    /// Create an empty (disabled) player.
    pub fn new(interval: Duration, events: EventSender<PlayerEvent>) -> Self {
        Self {
            frames: Arc::from(Vec::new()),
            cursor: 0,
            state: PlaybackState::Disabled,
            interval,
            autoplay: false,
            next_due: None,
            events,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Frame under the cursor, if any.
    pub fn current(&self) -> Option<&T> {
        self.frames.get(self.cursor)
    }

    /// Whether the next `set_sequence` enters `Playing` immediately.
    pub fn set_autoplay(&mut self, autoplay: bool) {
        self.autoplay = autoplay;
    }

    /// Replace the trajectory. A different `Arc` resets the cursor to 0,
    /// emits frame 0 and enters `Playing` (autoplay) or `Initial`; the same
    /// `Arc` leaves playback untouched. Sequences of length 0 or 1 disable
    /// the player - a valid boundary state, not an error.
    pub fn set_sequence(&mut self, frames: Arc<[T]>) {
        if Arc::ptr_eq(&self.frames, &frames) {
            return;
        }
        self.frames = frames;
        self.cursor = 0;
        self.next_due = None;

        if self.frames.len() <= 1 {
            self.set_state(PlaybackState::Disabled);
            if !self.frames.is_empty() {
                self.events.emit(PlayerEvent::FrameChanged { cursor: 0 });
            }
            debug!("sequence of {} frame(s), playback disabled", self.frames.len());
            return;
        }

        self.events.emit(PlayerEvent::FrameChanged { cursor: 0 });
        if self.autoplay {
            self.set_state(PlaybackState::Playing);
        } else {
            self.set_state(PlaybackState::Initial);
        }
        debug!(
            "sequence replaced: {} frames, autoplay={}",
            self.frames.len(),
            self.autoplay
        );
    }

    /// Advance playback. Call once per UI frame with the current time.
    ///
    /// Returns the frame to render when this call emitted one: on the first
    /// poll after entering `Playing` (re-emit of the current frame) and on
    /// every elapsed tick thereafter. The tick that lands on the final
    /// index transitions to `Completed` and still emits the final frame.
    pub fn update(&mut self, now: Instant) -> Option<&T> {
        if self.state != PlaybackState::Playing {
            return None;
        }

        match self.next_due {
            None => {
                // Just started or resumed: arm the single deadline and
                // emit the current frame for the initial render.
                self.next_due = Some(now + self.interval);
                self.emit_frame();
                self.current()
            }
            Some(due) if now >= due => {
                let last = self.frames.len() - 1;
                if self.cursor < last {
                    self.cursor += 1;
                }
                if self.cursor == last {
                    self.next_due = None;
                    self.set_state(PlaybackState::Completed);
                } else {
                    self.next_due = Some(now + self.interval);
                }
                self.emit_frame();
                self.current()
            }
            Some(_) => None,
        }
    }

    /// Single play/pause control action.
    ///
    /// `Completed`/`Initial` restart from frame 0, `Paused` resumes,
    /// `Playing` pauses. No-op while `Disabled`. Returns the frame to
    /// render immediately.
    pub fn toggle(&mut self) -> Option<&T> {
        match self.state {
            PlaybackState::Disabled => None,
            PlaybackState::Completed | PlaybackState::Initial => {
                self.cursor = 0;
                self.next_due = None;
                self.set_state(PlaybackState::Playing);
                self.emit_frame();
                self.current()
            }
            PlaybackState::Paused => {
                self.next_due = None;
                self.set_state(PlaybackState::Playing);
                self.emit_frame();
                self.current()
            }
            PlaybackState::Playing => {
                self.next_due = None;
                self.set_state(PlaybackState::Paused);
                self.emit_frame();
                self.current()
            }
        }
    }

    /// Jump the cursor (scrubber interaction). Always immediate; cancels
    /// the pending tick. A target below the final index pauses there, the
    /// final index completes there. No-op while `Disabled`.
    pub fn seek(&mut self, index: usize) -> Option<&T> {
        if self.state == PlaybackState::Disabled {
            return None;
        }
        let last = self.frames.len() - 1;
        self.cursor = index.min(last);
        self.next_due = None;
        if self.cursor == last {
            self.set_state(PlaybackState::Completed);
        } else {
            self.set_state(PlaybackState::Paused);
        }
        self.emit_frame();
        self.current()
    }

    fn emit_frame(&self) {
        self.events.emit(PlayerEvent::FrameChanged {
            cursor: self.cursor,
        });
    }

    fn set_state(&mut self, state: PlaybackState) {
        if self.state != state {
            debug!("playback {:?} -> {:?} at cursor {}", self.state, state, self.cursor);
            self.state = state;
            self.events.emit(PlayerEvent::StateChanged { state });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::Receiver;

    const TICK: Duration = Duration::from_millis(10);

    fn player_with_events(
        frames: Vec<i32>,
        autoplay: bool,
    ) -> (SequencePlayer<i32>, Receiver<PlayerEvent>) {
        let (tx, rx) = EventSender::channel();
        let mut player = SequencePlayer::new(TICK, tx);
        player.set_autoplay(autoplay);
        player.set_sequence(Arc::from(frames));
        (player, rx)
    }

    fn emitted_cursors(rx: &Receiver<PlayerEvent>) -> Vec<usize> {
        rx.try_iter()
            .filter_map(|e| match e {
                PlayerEvent::FrameChanged { cursor } => Some(cursor),
                _ => None,
            })
            .collect()
    }

    fn dedup_consecutive(mut v: Vec<usize>) -> Vec<usize> {
        v.dedup();
        v
    }

    #[test]
    fn test_autoplay_runs_to_completion_in_order() {
        let (mut player, rx) = player_with_events(vec![10, 20, 30, 40], true);
        assert_eq!(player.state(), PlaybackState::Playing);

        let t0 = Instant::now();
        let mut t = t0;
        // Poll well past the end; each tick interval advances exactly once.
        for _ in 0..16 {
            player.update(t);
            t += TICK / 2;
        }

        assert_eq!(player.state(), PlaybackState::Completed);
        assert_eq!(player.cursor(), 3);
        // Every frame emitted in index order (idempotent repeats collapsed).
        assert_eq!(dedup_consecutive(emitted_cursors(&rx)), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_tick_schedule_timing() {
        // [f0,f1,f2], 10ms interval, autoplay: f0 at t0, f1 at t0+10,
        // f2 and Completed at t0+20.
        let (mut player, _rx) = player_with_events(vec![0, 1, 2], true);
        let t0 = Instant::now();

        assert_eq!(player.update(t0).copied(), Some(0));
        assert_eq!(player.update(t0 + Duration::from_millis(5)), None);
        assert_eq!(
            player.update(t0 + Duration::from_millis(10)).copied(),
            Some(1)
        );
        assert_eq!(player.state(), PlaybackState::Playing);
        assert_eq!(
            player.update(t0 + Duration::from_millis(20)).copied(),
            Some(2)
        );
        assert_eq!(player.state(), PlaybackState::Completed);
        // No further ticks after completion.
        assert_eq!(player.update(t0 + Duration::from_millis(30)), None);
    }

    #[test]
    fn test_short_sequences_are_disabled() {
        let (mut empty, _) = player_with_events(Vec::new(), true);
        assert_eq!(empty.state(), PlaybackState::Disabled);
        assert!(empty.toggle().is_none());
        assert!(empty.seek(0).is_none());
        assert!(empty.update(Instant::now()).is_none());

        let (mut single, _) = player_with_events(vec![42], true);
        assert_eq!(single.state(), PlaybackState::Disabled);
        assert!(single.toggle().is_none());
        assert!(single.seek(5).is_none());
        assert_eq!(single.cursor(), 0);
    }

    #[test]
    fn test_toggle_pause_resume_keeps_position() {
        let (mut player, _rx) = player_with_events(vec![0, 1, 2, 3, 4], true);
        let t0 = Instant::now();
        player.update(t0);
        player.update(t0 + TICK); // cursor 1
        assert_eq!(player.cursor(), 1);

        assert_eq!(player.toggle().copied(), Some(1)); // pause re-emits
        assert_eq!(player.state(), PlaybackState::Paused);
        // Paused: time passing does not advance.
        assert!(player.update(t0 + TICK * 5).is_none());
        assert_eq!(player.cursor(), 1);

        player.toggle(); // resume
        assert_eq!(player.state(), PlaybackState::Playing);
        let t1 = t0 + TICK * 6;
        player.update(t1); // re-arm, re-emit 1
        assert_eq!(player.cursor(), 1);
        player.update(t1 + TICK);
        assert_eq!(player.cursor(), 2); // resumed without skipping
    }

    #[test]
    fn test_seek_cancels_pending_tick() {
        let (mut player, _rx) = player_with_events(vec![0, 1, 2, 3, 4], true);
        let t0 = Instant::now();
        player.update(t0); // deadline armed at t0+10

        assert_eq!(player.seek(2).copied(), Some(2));
        assert_eq!(player.state(), PlaybackState::Paused);

        // The cancelled deadline must not fire: no advance past 2 even
        // well after the old due time.
        assert!(player.update(t0 + TICK * 3).is_none());
        assert_eq!(player.cursor(), 2);

        // Resume: exactly one deadline, one advance per interval.
        player.toggle();
        let t1 = t0 + TICK * 4;
        player.update(t1);
        assert_eq!(player.cursor(), 2);
        player.update(t1 + TICK);
        assert_eq!(player.cursor(), 3);
        player.update(t1 + TICK + Duration::from_millis(1));
        assert_eq!(player.cursor(), 3); // no double-advance
    }

    #[test]
    fn test_seek_to_last_completes() {
        let (mut player, _rx) = player_with_events(vec![0, 1, 2], false);
        assert_eq!(player.state(), PlaybackState::Initial);
        player.seek(2);
        assert_eq!(player.state(), PlaybackState::Completed);
        // Restart from completed.
        player.toggle();
        assert_eq!(player.state(), PlaybackState::Playing);
        assert_eq!(player.cursor(), 0);
    }

    #[test]
    fn test_seek_clamps_past_end() {
        let (mut player, _rx) = player_with_events(vec![0, 1, 2], false);
        player.seek(99);
        assert_eq!(player.cursor(), 2);
        assert_eq!(player.state(), PlaybackState::Completed);
    }

    #[test]
    fn test_new_sequence_resets_mid_playback() {
        let (tx, rx) = EventSender::channel();
        let mut player = SequencePlayer::new(TICK, tx);
        player.set_autoplay(true);
        player.set_sequence(Arc::from(vec![0, 1, 2, 3]));

        let t0 = Instant::now();
        player.update(t0);
        player.update(t0 + TICK);
        assert_eq!(player.cursor(), 1);
        let _ = emitted_cursors(&rx);

        // New episode arrives while playing.
        player.set_autoplay(false);
        player.set_sequence(Arc::from(vec![7, 8, 9]));
        assert_eq!(player.cursor(), 0);
        assert_eq!(player.state(), PlaybackState::Initial);
        assert_eq!(emitted_cursors(&rx), vec![0]); // frame 0 emitted on load

        // The old deadline is gone: nothing advances until toggled.
        assert!(player.update(t0 + TICK * 10).is_none());
        assert_eq!(player.cursor(), 0);
    }

    #[test]
    fn test_same_arc_is_identity_noop() {
        let frames: Arc<[i32]> = Arc::from(vec![0, 1, 2, 3]);
        let (tx, rx) = EventSender::channel();
        let mut player = SequencePlayer::new(TICK, tx);
        player.set_autoplay(true);
        player.set_sequence(Arc::clone(&frames));

        let t0 = Instant::now();
        player.update(t0);
        player.update(t0 + TICK);
        assert_eq!(player.cursor(), 1);
        let _ = rx.try_iter().count();

        // Same data handed back: no reset, no emission.
        player.set_sequence(frames);
        assert_eq!(player.cursor(), 1);
        assert_eq!(player.state(), PlaybackState::Playing);
        assert_eq!(rx.try_iter().count(), 0);
    }
}
