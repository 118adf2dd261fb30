//! Continuous-timeline playback for recorded hardware videos.
//!
//! Same state-machine shape as the sequence player, but the cursor is a
//! time in seconds bounded by a reported duration, and no timer is owned
//! here: the controller only reacts to two signals from the media
//! collaborator - duration-known and time-advanced. Seek commands are
//! fire-and-forget; the displayed cursor reflects the requested position
//! immediately, without waiting for the media to confirm.

use std::time::Instant;

use log::debug;

use crate::core::events::{EventSender, VideoEvent};
use crate::core::playback::PlaybackState;

/// Commands the controller issues to the media resource.
///
/// The real renderer/decoder lives outside this crate; anything that can
/// play, pause and seek can sit behind this trait.
pub trait MediaTransport {
    fn play(&mut self);
    fn pause(&mut self);
    /// Request a jump to `seconds`. No round-trip confirmation is awaited.
    fn seek(&mut self, seconds: f64);
}

/// Signals flowing back from the media resource to the controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransportSignal {
    DurationKnown(f64),
    TimeAdvanced(f64),
}

/// Drives [`PlaybackState`] over a video timeline.
pub struct VideoController {
    state: PlaybackState,
    time: f64,
    duration: f64,
    autoplay: bool,
    events: EventSender<VideoEvent>,
}

impl VideoController {
    pub fn new(events: EventSender<VideoEvent>) -> Self {
        Self {
            state: PlaybackState::Disabled,
            time: 0.0,
            duration: 0.0,
            autoplay: false,
            events,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// New video attached: duration is unknown again, controls disabled
    /// until the media reports it. `autoplay` starts playback as soon as
    /// the duration arrives.
    pub fn reset(&mut self, autoplay: bool) {
        self.time = 0.0;
        self.duration = 0.0;
        self.autoplay = autoplay;
        self.set_state(PlaybackState::Disabled);
    }

    /// Feed a transport signal into the state machine.
    pub fn on_signal(&mut self, signal: TransportSignal, transport: &mut dyn MediaTransport) {
        match signal {
            TransportSignal::DurationKnown(d) => self.on_duration(d, transport),
            TransportSignal::TimeAdvanced(t) => self.on_time(t),
        }
    }

    fn on_duration(&mut self, duration: f64, transport: &mut dyn MediaTransport) {
        self.duration = duration;
        self.events.emit(VideoEvent::DurationChanged { seconds: duration });
        if duration <= 0.0 {
            self.set_state(PlaybackState::Disabled);
            return;
        }
        debug!("video duration known: {:.3}s, autoplay={}", duration, self.autoplay);
        if self.autoplay {
            transport.play();
            self.set_state(PlaybackState::Playing);
        } else {
            transport.pause();
            self.set_state(PlaybackState::Initial);
        }
    }

    fn on_time(&mut self, time: f64) {
        self.time = time;
        self.events.emit(VideoEvent::TimeUpdated { seconds: time });
        // Float video clocks can land past the reported duration.
        if self.duration > 0.0 && time >= self.duration && self.state == PlaybackState::Playing {
            self.set_state(PlaybackState::Completed);
        }
    }

    /// Single play/pause control action. No-op until a duration is known.
    pub fn toggle(&mut self, transport: &mut dyn MediaTransport) {
        match self.state {
            PlaybackState::Disabled => {}
            PlaybackState::Completed | PlaybackState::Initial => {
                transport.seek(0.0);
                transport.play();
                self.time = 0.0;
                self.set_state(PlaybackState::Playing);
            }
            PlaybackState::Paused => {
                transport.play();
                self.set_state(PlaybackState::Playing);
            }
            PlaybackState::Playing => {
                transport.pause();
                self.set_state(PlaybackState::Paused);
            }
        }
    }

    /// Scrubber interaction. Immediate and optimistic: the displayed time
    /// jumps before the media confirms. Below the duration pauses there;
    /// at (or past) the duration completes there.
    pub fn seek(&mut self, seconds: f64, transport: &mut dyn MediaTransport) {
        if self.state == PlaybackState::Disabled {
            return;
        }
        let target = seconds.clamp(0.0, self.duration);
        self.time = target;
        self.events.emit(VideoEvent::TimeUpdated { seconds: target });
        if target < self.duration {
            transport.pause();
            transport.seek(target);
            self.set_state(PlaybackState::Paused);
        } else {
            transport.seek(target);
            self.set_state(PlaybackState::Completed);
        }
    }

    fn set_state(&mut self, state: PlaybackState) {
        if self.state != state {
            debug!("video {:?} -> {:?} at {:.3}s", self.state, state, self.time);
            self.state = state;
            self.events.emit(VideoEvent::StateChanged { state });
        }
    }
}

/// Wall-clock stand-in for a real media element.
///
/// Advances its own time while playing and reports the duration handed to
/// `load` (hardware recordings are cut to the trajectory, so the final
/// sample timestamp serves as duration). Polled once per UI frame.
#[derive(Debug, Default)]
pub struct ClockTransport {
    url: Option<String>,
    duration: f64,
    time: f64,
    playing: bool,
    last_poll: Option<Instant>,
    duration_pending: bool,
    time_dirty: bool,
}

impl ClockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Attach a new video. Duration is reported on the next poll,
    /// mimicking metadata arriving after the source is set.
    pub fn load(&mut self, url: String, duration: f64) {
        debug!("transport loading {} ({:.3}s)", url, duration);
        self.url = Some(url);
        self.duration = duration;
        self.time = 0.0;
        self.playing = false;
        self.last_poll = None;
        self.duration_pending = true;
        self.time_dirty = false;
    }

    /// Advance the clock and collect pending signals.
    pub fn poll(&mut self, now: Instant) -> Vec<TransportSignal> {
        let mut signals = Vec::new();
        if self.url.is_none() {
            return signals;
        }

        if self.duration_pending {
            self.duration_pending = false;
            signals.push(TransportSignal::DurationKnown(self.duration));
        }

        if self.playing {
            if let Some(last) = self.last_poll {
                self.time += now.duration_since(last).as_secs_f64();
                if self.time >= self.duration {
                    self.time = self.duration;
                    self.playing = false;
                }
            }
            self.last_poll = Some(now);
            signals.push(TransportSignal::TimeAdvanced(self.time));
        } else if self.time_dirty {
            self.time_dirty = false;
            signals.push(TransportSignal::TimeAdvanced(self.time));
        }
        signals
    }
}

impl MediaTransport for ClockTransport {
    fn play(&mut self) {
        self.playing = true;
        self.last_poll = None;
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn seek(&mut self, seconds: f64) {
        self.time = seconds.clamp(0.0, self.duration);
        self.time_dirty = true;
        if self.time >= self.duration {
            self.playing = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    /// Records issued commands instead of touching any media.
    #[derive(Default)]
    struct MockTransport {
        commands: Vec<String>,
    }

    impl MediaTransport for MockTransport {
        fn play(&mut self) {
            self.commands.push("play".into());
        }
        fn pause(&mut self) {
            self.commands.push("pause".into());
        }
        fn seek(&mut self, seconds: f64) {
            self.commands.push(format!("seek {seconds:.1}"));
        }
    }

    fn ready_controller(duration: f64, transport: &mut MockTransport) -> VideoController {
        let mut ctl = VideoController::new(EventSender::dummy());
        ctl.reset(true);
        ctl.on_signal(TransportSignal::DurationKnown(duration), transport);
        ctl
    }

    #[test]
    fn test_disabled_until_duration_known() {
        let mut transport = MockTransport::default();
        let mut ctl = VideoController::new(EventSender::dummy());
        ctl.reset(false);
        assert_eq!(ctl.state(), PlaybackState::Disabled);
        ctl.toggle(&mut transport);
        assert!(transport.commands.is_empty());

        ctl.on_signal(TransportSignal::DurationKnown(3.0), &mut transport);
        assert_eq!(ctl.state(), PlaybackState::Initial);
    }

    #[test]
    fn test_seek_to_end_completes_then_mid_pauses() {
        let mut transport = MockTransport::default();
        let mut ctl = ready_controller(5.0, &mut transport);
        assert_eq!(ctl.state(), PlaybackState::Playing);

        ctl.seek(5.0, &mut transport);
        assert_eq!(ctl.state(), PlaybackState::Completed);
        assert!((ctl.time() - 5.0).abs() < 1e-12);

        ctl.seek(2.5, &mut transport);
        assert_eq!(ctl.state(), PlaybackState::Paused);
        assert!((ctl.time() - 2.5).abs() < 1e-12);
        assert!(transport.commands.contains(&"seek 2.5".to_string()));
    }

    #[test]
    fn test_completion_on_clock_overshoot() {
        let mut transport = MockTransport::default();
        let mut ctl = ready_controller(5.0, &mut transport);
        // Float video clocks report slightly past the duration.
        ctl.on_signal(TransportSignal::TimeAdvanced(5.0001), &mut transport);
        assert_eq!(ctl.state(), PlaybackState::Completed);
    }

    #[test]
    fn test_toggle_cycle_commands() {
        let mut transport = MockTransport::default();
        let mut ctl = ready_controller(4.0, &mut transport);
        transport.commands.clear();

        ctl.toggle(&mut transport); // playing -> paused
        assert_eq!(ctl.state(), PlaybackState::Paused);
        ctl.toggle(&mut transport); // paused -> playing
        assert_eq!(ctl.state(), PlaybackState::Playing);
        assert_eq!(transport.commands, vec!["pause", "play"]);

        ctl.on_signal(TransportSignal::TimeAdvanced(4.0), &mut transport);
        assert_eq!(ctl.state(), PlaybackState::Completed);
        transport.commands.clear();
        ctl.toggle(&mut transport); // restart from the top
        assert_eq!(transport.commands, vec!["seek 0.0", "play"]);
        assert!((ctl.time() - 0.0).abs() < 1e-12);
    }

    #[test]
    fn test_clock_transport_advances_only_while_playing() {
        let mut clock = ClockTransport::new();
        clock.load("videos/open_loop/seed_1_segment_0.mp4".into(), 2.0);

        let t0 = Instant::now();
        let signals = clock.poll(t0);
        assert_eq!(signals, vec![TransportSignal::DurationKnown(2.0)]);

        // Paused: no time signals.
        assert!(clock.poll(t0 + Duration::from_millis(100)).is_empty());

        clock.play();
        clock.poll(t0 + Duration::from_millis(200)); // establishes baseline
        let signals = clock.poll(t0 + Duration::from_millis(700));
        match signals.as_slice() {
            [TransportSignal::TimeAdvanced(t)] => assert!((*t - 0.5).abs() < 1e-6),
            other => panic!("unexpected signals: {other:?}"),
        }

        clock.pause();
        assert!(clock.poll(t0 + Duration::from_secs(5)).is_empty());
    }

    #[test]
    fn test_clock_transport_seek_reports_once() {
        let mut clock = ClockTransport::new();
        clock.load("v.mp4".into(), 2.0);
        let t0 = Instant::now();
        clock.poll(t0);

        clock.seek(1.5);
        let signals = clock.poll(t0 + Duration::from_millis(10));
        assert_eq!(signals, vec![TransportSignal::TimeAdvanced(1.5)]);
        assert!(clock.poll(t0 + Duration::from_millis(20)).is_empty());
    }

    #[test]
    fn test_clock_transport_stops_at_duration() {
        let mut clock = ClockTransport::new();
        clock.load("v.mp4".into(), 0.5);
        let t0 = Instant::now();
        clock.poll(t0);
        clock.play();
        clock.poll(t0);
        let signals = clock.poll(t0 + Duration::from_secs(3));
        assert_eq!(signals, vec![TransportSignal::TimeAdvanced(0.5)]);
        // Clamped at the end and no longer playing.
        assert!(clock.poll(t0 + Duration::from_secs(4)).is_empty());
    }
}
