use std::time::Duration;

use crate::engine::AudioEngine;
use crate::error::PlayerError;
use crate::library::{self, Track};

use super::order;
use super::playlist::Playlist;
use super::types::{DisplayState, PlaybackState};

/// What the engine currently holds: a playlist index and the duration the
/// probe reported for it (`None` disables seeking and position clamping).
struct LoadedTrack {
    index: usize,
    duration: Option<Duration>,
}

/// The playback state machine. Owns the playlist, the engine and every
/// piece of mutable playback state; all mutation goes through its methods,
/// one call at a time, on the player thread.
///
/// The engine's elapsed counter restarts on every `play(offset)` call, so
/// the absolute track position is always `base_position + elapsed`, where
/// `base_position` is the offset handed to the most recent `play`.
pub struct Transport {
    engine: Box<dyn AudioEngine>,
    playlist: Playlist,
    state: PlaybackState,
    loaded: Option<LoadedTrack>,
    base_position: Duration,
    shuffle: bool,
    repeat: bool,
    volume: f32,
    error: Option<String>,
}

impl Transport {
    pub fn new(engine: Box<dyn AudioEngine>) -> Self {
        Self {
            engine,
            playlist: Playlist::default(),
            state: PlaybackState::Stopped,
            loaded: None,
            base_position: Duration::ZERO,
            shuffle: false,
            repeat: false,
            volume: 1.0,
            error: None,
        }
    }

    /// Load `index` and optionally start it.
    ///
    /// An out-of-range index is rejected before anything is touched, so a
    /// playing track keeps playing. On engine failure the machine lands in
    /// Stopped with the cursor left on the failed track.
    fn start_track(&mut self, index: usize, autoplay: bool) -> Result<(), PlayerError> {
        let len = self.playlist.len();
        let Some(track) = self.playlist.track(index) else {
            let err = PlayerError::IndexOutOfRange { index, len };
            self.error = Some(err.to_string());
            return Err(err);
        };
        let path = track.path.clone();
        let duration = track.duration.or_else(|| library::probe(&path));

        self.engine.stop();
        self.state = PlaybackState::Stopped;
        self.loaded = None;
        self.base_position = Duration::ZERO;
        self.playlist.select(index);

        let mut result = self.engine.load(&path);
        if result.is_ok() && autoplay {
            result = self.engine.play(Duration::ZERO);
        }

        match result {
            Ok(()) => {
                self.loaded = Some(LoadedTrack { index, duration });
                if autoplay {
                    self.state = PlaybackState::Playing;
                }
                self.error = None;
                Ok(())
            }
            Err(source) => {
                let err = PlayerError::Load { path, source };
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    pub fn load_and_play(&mut self, index: usize) -> Result<(), PlayerError> {
        self.start_track(index, true)
    }

    /// Load without autoplay; lands Stopped with the track ready. Used to
    /// restore a session cursor.
    pub fn load_only(&mut self, index: usize) -> Result<(), PlayerError> {
        self.start_track(index, false)
    }

    /// Resume from Paused, or start a stopped-but-loaded track from
    /// `base_position` (so a seek made while stopped is honored). No-op
    /// when already Playing or when nothing is loaded.
    pub fn play(&mut self) -> Result<(), PlayerError> {
        match self.state {
            PlaybackState::Playing => Ok(()),
            PlaybackState::Paused => {
                self.engine.resume();
                self.state = PlaybackState::Playing;
                self.error = None;
                Ok(())
            }
            PlaybackState::Stopped => {
                let Some(loaded) = self.loaded.as_ref() else {
                    return Ok(());
                };
                let index = loaded.index;
                match self.engine.play(self.base_position) {
                    Ok(()) => {
                        self.state = PlaybackState::Playing;
                        self.error = None;
                        Ok(())
                    }
                    Err(source) => {
                        let path = self
                            .playlist
                            .track(index)
                            .map(|t| t.path.clone())
                            .unwrap_or_default();
                        self.loaded = None;
                        self.base_position = Duration::ZERO;
                        let err = PlayerError::Load { path, source };
                        self.error = Some(err.to_string());
                        Err(err)
                    }
                }
            }
        }
    }

    /// Pause if playing; otherwise a no-op, so repeated pauses are safe.
    pub fn pause(&mut self) {
        if self.state == PlaybackState::Playing {
            self.engine.pause();
            self.state = PlaybackState::Paused;
        }
    }

    pub fn play_pause(&mut self) -> Result<(), PlayerError> {
        match self.state {
            PlaybackState::Playing => {
                self.pause();
                Ok(())
            }
            PlaybackState::Paused => self.play(),
            PlaybackState::Stopped => {
                if self.loaded.is_some() {
                    self.play()
                } else if !self.playlist.is_empty() {
                    let index = self.playlist.current_index().unwrap_or(0);
                    self.load_and_play(index)
                } else {
                    Ok(())
                }
            }
        }
    }

    pub fn stop(&mut self) {
        self.engine.stop();
        self.state = PlaybackState::Stopped;
        self.base_position = Duration::ZERO;
        self.error = None;
    }

    /// Jump to an absolute position in the loaded track.
    ///
    /// Needs a known duration, and is a silent no-op otherwise: seeking is
    /// simply disabled for tracks the probe couldn't measure. The engine
    /// restarts the source at `target` (clamped to the track length); if
    /// the machine wasn't Playing it is paused right back, so a seek never
    /// starts audible playback on its own.
    pub fn seek(&mut self, target: Duration) -> Result<(), PlayerError> {
        let Some(loaded) = self.loaded.as_ref() else {
            return Ok(());
        };
        let Some(duration) = loaded.duration else {
            return Ok(());
        };
        let index = loaded.index;
        let target = target.min(duration);

        let was_playing = self.state == PlaybackState::Playing;
        match self.engine.play(target) {
            Ok(()) => {
                if !was_playing {
                    self.engine.pause();
                }
                self.base_position = target;
                self.error = None;
                Ok(())
            }
            Err(source) => {
                let path = self
                    .playlist
                    .track(index)
                    .map(|t| t.path.clone())
                    .unwrap_or_default();
                self.engine.stop();
                self.loaded = None;
                self.state = PlaybackState::Stopped;
                self.base_position = Duration::ZERO;
                let err = PlayerError::Load { path, source };
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Seek relative to the current position, flooring at the track start.
    pub fn seek_by(&mut self, delta_secs: i64) -> Result<(), PlayerError> {
        let cur = self.position().as_secs() as i64;
        let target = (cur + delta_secs).max(0) as u64;
        self.seek(Duration::from_secs(target))
    }

    /// Absolute position in the loaded track, clamped to its duration when
    /// known. A Stopped machine reports its pending base (a seek made
    /// while stopped).
    pub fn position(&self) -> Duration {
        let raw = match self.state {
            PlaybackState::Playing | PlaybackState::Paused => {
                self.base_position + self.engine.elapsed_since_play()
            }
            PlaybackState::Stopped => self.base_position,
        };
        match self.loaded.as_ref().and_then(|l| l.duration) {
            Some(duration) => raw.min(duration),
            None => raw,
        }
    }

    /// One polling beat: when the engine has drained its source while we
    /// believe we are Playing, the track is over and we advance. Detection
    /// lags real track end by up to one tick interval.
    pub fn tick(&mut self) {
        if self.state != PlaybackState::Playing {
            return;
        }
        if !self.engine.is_busy() {
            self.advance();
        }
    }

    /// Move to whatever the ordering policy says comes next; the end of
    /// the playlist stops playback and leaves a notice in the display.
    fn advance(&mut self) {
        let next = order::next_index(
            self.playlist.len(),
            self.playlist.current_index(),
            self.shuffle,
            self.repeat,
        );
        match next {
            Some(index) => {
                if let Err(e) = self.load_and_play(index) {
                    log::warn!("auto-advance failed: {e}");
                }
            }
            None => {
                self.stop();
                self.error = Some("end of playlist".to_string());
            }
        }
    }

    pub fn next(&mut self) {
        if self.playlist.is_empty() {
            return;
        }
        self.advance();
    }

    pub fn previous(&mut self) {
        if self.playlist.is_empty() {
            return;
        }
        let prev = order::previous_index(
            self.playlist.len(),
            self.playlist.current_index(),
            self.repeat,
        );
        if let Some(index) = prev {
            if let Err(e) = self.load_and_play(index) {
                log::warn!("previous failed: {e}");
            }
        }
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        self.engine.set_volume(self.volume);
    }

    pub fn adjust_volume(&mut self, delta: f32) {
        self.set_volume(self.volume + delta);
    }

    pub fn set_shuffle(&mut self, on: bool) {
        self.shuffle = on;
    }

    pub fn toggle_shuffle(&mut self) {
        self.shuffle = !self.shuffle;
    }

    pub fn set_repeat(&mut self, on: bool) {
        self.repeat = on;
    }

    pub fn toggle_repeat(&mut self) {
        self.repeat = !self.repeat;
    }

    /// Stop, drop the loaded track and swap in a new list. This is the only
    /// playlist mutation there is.
    pub fn replace_tracks(&mut self, tracks: Vec<Track>) {
        self.engine.stop();
        self.state = PlaybackState::Stopped;
        self.loaded = None;
        self.base_position = Duration::ZERO;
        self.playlist.replace(tracks);
        self.error = None;
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn display_state(&self) -> DisplayState {
        let duration = self.loaded.as_ref().and_then(|l| l.duration);
        let elapsed = self.position();
        DisplayState {
            status: self.state,
            current_index: self.playlist.current_index(),
            track_count: self.playlist.len(),
            elapsed,
            remaining: duration
                .map(|d| d.saturating_sub(elapsed))
                .unwrap_or(Duration::ZERO),
            duration,
            shuffle: self.shuffle,
            repeat: self.repeat,
            volume: self.volume,
            error: self.error.clone(),
        }
    }
}
