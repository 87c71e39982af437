//! Small shared types: playback state, player commands and the display
//! snapshot handed to the UI and MPRIS layers.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::library::Track;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    Playing,
    Paused,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::Stopped
    }
}

#[derive(Debug)]
pub enum PlayerCmd {
    /// Load the track at the given index and start playing it.
    Play(usize),
    /// Load the track at the given index without starting playback.
    Load(usize),
    /// Toggle between playing and paused; starts the cursor track (or the
    /// first one) when stopped.
    PlayPause,
    /// Pause if playing.
    Pause,
    /// Resume if paused, or restart a stopped-but-loaded track.
    Resume,
    /// Stop playback, keeping the playlist and cursor.
    Stop,
    /// Advance according to the shuffle/repeat policy.
    Next,
    /// Step back one track (wraps under repeat, clamps at the start).
    Prev,
    /// Seek relative to the current position, in seconds.
    SeekBy(i64),
    /// Adjust volume by a signed step.
    VolumeBy(f32),
    /// Toggle shuffle mode.
    ToggleShuffle,
    /// Toggle repeat (wrap-at-end) mode.
    ToggleRepeat,
    /// Replace the whole playlist. Stops playback and clears the cursor.
    ReplaceTracks(Vec<Track>),
    /// Stop playback, persist the session and exit the player thread.
    Quit,
}

/// Snapshot of everything the front ends need to render, republished by
/// the player thread after every command and every tick.
#[derive(Debug, Clone)]
pub struct DisplayState {
    pub status: PlaybackState,
    /// Cursor into the playlist (if any track is selected/loaded).
    pub current_index: Option<usize>,
    pub track_count: usize,
    /// Position within the current track.
    pub elapsed: Duration,
    /// Time left in the current track; zero when the duration is unknown.
    pub remaining: Duration,
    /// Probed track length; `None` disables seeking.
    pub duration: Option<Duration>,
    pub shuffle: bool,
    pub repeat: bool,
    pub volume: f32,
    /// Latest failure or notice ("end of playlist"); cleared by the next
    /// successful operation.
    pub error: Option<String>,
}

impl Default for DisplayState {
    fn default() -> Self {
        Self {
            status: PlaybackState::Stopped,
            current_index: None,
            track_count: 0,
            elapsed: Duration::ZERO,
            remaining: Duration::ZERO,
            duration: None,
            shuffle: false,
            repeat: false,
            volume: 1.0,
            error: None,
        }
    }
}

pub type DisplayHandle = Arc<Mutex<DisplayState>>;
