use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::engine::{AudioEngine, EngineError};
use crate::error::PlayerError;
use crate::library::Track;

use super::order::{next_index, previous_index};
use super::playlist::Playlist;
use super::transport::Transport;
use super::types::PlaybackState;

#[derive(Debug, Clone, PartialEq)]
enum EngineCall {
    Load(PathBuf),
    Play(Duration),
    Pause,
    Resume,
    Stop,
    SetVolume(f32),
}

/// Scripted engine state shared between a test and the transport under
/// test: a call log plus knobs for the busy flag, the elapsed counter and
/// paths whose load should fail.
#[derive(Default)]
struct FakeEngineState {
    calls: Vec<EngineCall>,
    busy: bool,
    elapsed: Duration,
    fail_loads: Vec<PathBuf>,
}

type SharedEngine = Arc<Mutex<FakeEngineState>>;

struct FakeEngine {
    state: SharedEngine,
}

impl AudioEngine for FakeEngine {
    fn load(&mut self, path: &Path) -> Result<(), EngineError> {
        let mut s = self.state.lock().unwrap();
        s.calls.push(EngineCall::Load(path.to_path_buf()));
        if s.fail_loads.iter().any(|p| p == path) {
            return Err(EngineError::Decode {
                path: path.to_path_buf(),
                reason: "scripted failure".to_string(),
            });
        }
        Ok(())
    }

    fn play(&mut self, start_at: Duration) -> Result<(), EngineError> {
        let mut s = self.state.lock().unwrap();
        s.calls.push(EngineCall::Play(start_at));
        s.busy = true;
        s.elapsed = Duration::ZERO;
        Ok(())
    }

    fn pause(&mut self) {
        self.state.lock().unwrap().calls.push(EngineCall::Pause);
    }

    fn resume(&mut self) {
        self.state.lock().unwrap().calls.push(EngineCall::Resume);
    }

    fn stop(&mut self) {
        let mut s = self.state.lock().unwrap();
        s.calls.push(EngineCall::Stop);
        s.busy = false;
        s.elapsed = Duration::ZERO;
    }

    fn set_volume(&mut self, volume: f32) {
        self.state
            .lock()
            .unwrap()
            .calls
            .push(EngineCall::SetVolume(volume));
    }

    fn is_busy(&self) -> bool {
        self.state.lock().unwrap().busy
    }

    fn elapsed_since_play(&self) -> Duration {
        self.state.lock().unwrap().elapsed
    }
}

fn track(name: &str, secs: Option<u64>) -> Track {
    Track {
        path: PathBuf::from(format!("/music/{name}.mp3")),
        title: name.to_string(),
        artist: None,
        duration: secs.map(Duration::from_secs),
    }
}

fn three_tracks() -> Vec<Track> {
    vec![
        track("a", Some(10)),
        track("b", Some(20)),
        track("c", Some(30)),
    ]
}

fn transport_with(tracks: Vec<Track>) -> (Transport, SharedEngine) {
    let shared: SharedEngine = Arc::default();
    let mut transport = Transport::new(Box::new(FakeEngine {
        state: shared.clone(),
    }));
    transport.replace_tracks(tracks);
    // Drop the Stop recorded by the initial replace.
    shared.lock().unwrap().calls.clear();
    (transport, shared)
}

#[test]
fn advance_walks_the_playlist_then_stops() {
    let (mut t, eng) = transport_with(three_tracks());
    t.load_and_play(0).unwrap();
    assert_eq!(t.state(), PlaybackState::Playing);
    assert_eq!(t.playlist().current_index(), Some(0));

    eng.lock().unwrap().busy = false;
    t.tick();
    assert_eq!(t.playlist().current_index(), Some(1));
    assert_eq!(t.state(), PlaybackState::Playing);

    eng.lock().unwrap().busy = false;
    t.tick();
    assert_eq!(t.playlist().current_index(), Some(2));

    eng.lock().unwrap().busy = false;
    t.tick();
    assert_eq!(t.state(), PlaybackState::Stopped);
    assert_eq!(t.display_state().error.as_deref(), Some("end of playlist"));
}

#[test]
fn advance_wraps_under_repeat() {
    let (mut t, eng) = transport_with(three_tracks());
    t.set_repeat(true);
    t.load_and_play(2).unwrap();

    eng.lock().unwrap().busy = false;
    t.tick();
    assert_eq!(t.playlist().current_index(), Some(0));
    assert_eq!(t.state(), PlaybackState::Playing);

    eng.lock().unwrap().busy = false;
    t.tick();
    assert_eq!(t.playlist().current_index(), Some(1));
}

#[test]
fn seek_rebases_position_while_playing() {
    let (mut t, eng) = transport_with(three_tracks());
    t.load_and_play(1).unwrap(); // the 20 s track
    t.seek(Duration::from_secs(15)).unwrap();

    assert_eq!(t.state(), PlaybackState::Playing);
    assert_eq!(t.position(), Duration::from_secs(15));

    eng.lock().unwrap().elapsed = Duration::from_millis(300);
    t.tick();
    let pos = t.position();
    assert!(
        pos >= Duration::from_secs(15) && pos < Duration::from_secs(20),
        "position {pos:?}"
    );

    // The engine restarted at 15 s and was not paused afterwards.
    let calls = eng.lock().unwrap().calls.clone();
    assert!(calls.contains(&EngineCall::Play(Duration::from_secs(15))));
    assert!(!calls.contains(&EngineCall::Pause));
}

#[test]
fn seek_while_stopped_stays_stopped_and_play_resumes_from_there() {
    let (mut t, eng) = transport_with(three_tracks());
    t.load_only(0).unwrap();
    assert_eq!(t.state(), PlaybackState::Stopped);

    t.seek(Duration::from_secs(5)).unwrap();
    assert_eq!(t.state(), PlaybackState::Stopped);
    assert_eq!(t.position(), Duration::from_secs(5));
    {
        let calls = &eng.lock().unwrap().calls;
        // Re-issued play at the target, then paused straight back.
        assert!(calls.ends_with(&[EngineCall::Play(Duration::from_secs(5)), EngineCall::Pause]));
    }

    t.play().unwrap();
    assert_eq!(t.state(), PlaybackState::Playing);
    let calls = eng.lock().unwrap().calls.clone();
    assert_eq!(calls.last(), Some(&EngineCall::Play(Duration::from_secs(5))));
}

#[test]
fn shuffle_never_repeats_the_current_track() {
    for _ in 0..200 {
        let picked = next_index(5, Some(2), true, false).unwrap();
        assert!(picked < 5);
        assert_ne!(picked, 2);
    }
}

#[test]
fn out_of_range_index_changes_nothing() {
    let (mut t, eng) = transport_with(three_tracks());
    t.load_and_play(0).unwrap();
    eng.lock().unwrap().calls.clear();

    let err = t.load_and_play(99).unwrap_err();
    assert!(matches!(
        err,
        PlayerError::IndexOutOfRange { index: 99, len: 3 }
    ));

    // Still playing the same track; the engine saw nothing.
    assert_eq!(t.state(), PlaybackState::Playing);
    assert_eq!(t.playlist().current_index(), Some(0));
    assert!(eng.lock().unwrap().calls.is_empty());
    assert!(
        t.display_state()
            .error
            .unwrap()
            .contains("no track at index 99")
    );
}

#[test]
fn pause_is_idempotent() {
    let (mut t, eng) = transport_with(three_tracks());
    t.load_and_play(0).unwrap();

    t.pause();
    t.pause();

    assert_eq!(t.state(), PlaybackState::Paused);
    let pauses = eng
        .lock()
        .unwrap()
        .calls
        .iter()
        .filter(|c| **c == EngineCall::Pause)
        .count();
    assert_eq!(pauses, 1);
}

#[test]
fn resume_does_not_restart_the_source() {
    let (mut t, eng) = transport_with(three_tracks());
    t.load_and_play(0).unwrap();
    t.pause();
    eng.lock().unwrap().calls.clear();

    t.play().unwrap();

    assert_eq!(t.state(), PlaybackState::Playing);
    assert_eq!(eng.lock().unwrap().calls, vec![EngineCall::Resume]);
}

#[test]
fn paused_position_includes_the_base_offset() {
    let (mut t, eng) = transport_with(three_tracks());
    t.load_and_play(1).unwrap();
    t.seek(Duration::from_secs(8)).unwrap();
    eng.lock().unwrap().elapsed = Duration::from_secs(3);
    t.pause();

    assert_eq!(t.position(), Duration::from_secs(11));
}

#[test]
fn position_clamps_to_duration() {
    let (mut t, eng) = transport_with(three_tracks());
    t.load_and_play(0).unwrap(); // the 10 s track
    eng.lock().unwrap().elapsed = Duration::from_secs(12);

    assert_eq!(t.position(), Duration::from_secs(10));
    assert_eq!(t.display_state().remaining, Duration::ZERO);
}

#[test]
fn failed_load_lands_stopped_with_the_error() {
    let (mut t, eng) = transport_with(three_tracks());
    eng.lock()
        .unwrap()
        .fail_loads
        .push(PathBuf::from("/music/b.mp3"));

    let err = t.load_and_play(1).unwrap_err();
    assert!(matches!(err, PlayerError::Load { .. }));
    assert_eq!(t.state(), PlaybackState::Stopped);
    // Cursor stays on the track the user asked for.
    assert_eq!(t.playlist().current_index(), Some(1));
    assert!(t.display_state().error.unwrap().contains("b.mp3"));

    // With nothing loaded, play() is a quiet no-op.
    eng.lock().unwrap().calls.clear();
    t.play().unwrap();
    assert_eq!(t.state(), PlaybackState::Stopped);
    assert!(eng.lock().unwrap().calls.is_empty());
}

#[test]
fn replace_stops_and_clears_the_cursor() {
    let (mut t, eng) = transport_with(three_tracks());
    t.load_and_play(1).unwrap();

    t.replace_tracks(vec![track("x", Some(7))]);

    assert_eq!(t.state(), PlaybackState::Stopped);
    assert_eq!(t.playlist().current_index(), None);
    assert_eq!(t.playlist().len(), 1);
    assert_eq!(eng.lock().unwrap().calls.last(), Some(&EngineCall::Stop));
    assert_eq!(t.position(), Duration::ZERO);
}

#[test]
fn previous_clamps_at_the_start() {
    let (mut t, _eng) = transport_with(three_tracks());
    t.load_and_play(0).unwrap();

    t.previous();

    // Restarts the first track rather than terminating the playlist.
    assert_eq!(t.playlist().current_index(), Some(0));
    assert_eq!(t.state(), PlaybackState::Playing);
}

#[test]
fn previous_wraps_under_repeat() {
    let (mut t, _eng) = transport_with(three_tracks());
    t.set_repeat(true);
    t.load_and_play(0).unwrap();

    t.previous();

    assert_eq!(t.playlist().current_index(), Some(2));
}

#[test]
fn seek_is_disabled_without_a_known_duration() {
    let (mut t, eng) = transport_with(vec![track("mystery", None)]);
    t.load_and_play(0).unwrap();
    eng.lock().unwrap().calls.clear();

    t.seek(Duration::from_secs(5)).unwrap();

    assert!(eng.lock().unwrap().calls.is_empty());
    assert_eq!(t.state(), PlaybackState::Playing);
}

#[test]
fn seek_clamps_to_track_length() {
    let (mut t, eng) = transport_with(three_tracks());
    t.load_and_play(0).unwrap(); // the 10 s track

    t.seek(Duration::from_secs(45)).unwrap();

    assert!(
        eng.lock()
            .unwrap()
            .calls
            .contains(&EngineCall::Play(Duration::from_secs(10)))
    );
    assert_eq!(t.position(), Duration::from_secs(10));
}

#[test]
fn seek_by_floors_at_zero() {
    let (mut t, eng) = transport_with(three_tracks());
    t.load_and_play(0).unwrap();
    eng.lock().unwrap().elapsed = Duration::from_secs(2);

    t.seek_by(-30).unwrap();

    assert_eq!(t.position(), Duration::ZERO);
    assert!(
        eng.lock()
            .unwrap()
            .calls
            .contains(&EngineCall::Play(Duration::ZERO))
    );
}

#[test]
fn volume_clamps_to_unit_range() {
    let (mut t, eng) = transport_with(three_tracks());

    t.set_volume(1.5);
    assert_eq!(t.display_state().volume, 1.0);
    t.set_volume(-0.2);
    assert_eq!(t.display_state().volume, 0.0);

    let calls = eng.lock().unwrap().calls.clone();
    assert!(calls.contains(&EngineCall::SetVolume(1.0)));
    assert!(calls.contains(&EngineCall::SetVolume(0.0)));
}

#[test]
fn play_pause_starts_from_stopped() {
    let (mut t, _eng) = transport_with(three_tracks());

    t.play_pause().unwrap();
    assert_eq!(t.state(), PlaybackState::Playing);
    assert_eq!(t.playlist().current_index(), Some(0));

    t.play_pause().unwrap();
    assert_eq!(t.state(), PlaybackState::Paused);
    t.play_pause().unwrap();
    assert_eq!(t.state(), PlaybackState::Playing);
}

#[test]
fn tick_only_advances_while_playing() {
    let (mut t, eng) = transport_with(three_tracks());
    t.load_and_play(0).unwrap();
    t.pause();
    eng.lock().unwrap().busy = false;

    t.tick();

    assert_eq!(t.playlist().current_index(), Some(0));
    assert_eq!(t.state(), PlaybackState::Paused);
}

#[test]
fn navigation_on_an_empty_playlist_is_a_no_op() {
    let (mut t, eng) = transport_with(vec![]);

    t.next();
    t.previous();

    assert_eq!(t.state(), PlaybackState::Stopped);
    assert!(eng.lock().unwrap().calls.is_empty());
    assert!(t.display_state().error.is_none());
}

#[test]
fn linear_order_walks_then_ends() {
    assert_eq!(next_index(3, None, false, false), Some(0));
    assert_eq!(next_index(3, Some(0), false, false), Some(1));
    assert_eq!(next_index(3, Some(2), false, false), None);
    assert_eq!(next_index(3, Some(2), false, true), Some(0));
    assert_eq!(next_index(0, None, false, true), None);
}

#[test]
fn shuffle_with_one_track_stays_put() {
    assert_eq!(next_index(1, Some(0), true, false), Some(0));
    assert_eq!(next_index(1, None, true, true), Some(0));
}

#[test]
fn previous_policy_clamps_and_wraps() {
    assert_eq!(previous_index(3, Some(2), false), Some(1));
    assert_eq!(previous_index(3, Some(0), false), Some(0));
    assert_eq!(previous_index(3, Some(0), true), Some(2));
    assert_eq!(previous_index(3, None, false), Some(0));
    assert_eq!(previous_index(0, None, true), None);
}

#[test]
fn playlist_select_ignores_out_of_range() {
    let mut pl = Playlist::new(three_tracks());
    pl.select(7);
    assert_eq!(pl.current_index(), None);

    pl.select(2);
    assert_eq!(pl.current_index(), Some(2));

    pl.replace(vec![]);
    assert_eq!(pl.current_index(), None);
    assert!(pl.is_empty());
}
