//! Application model: the `App` struct backing the TUI.
//!
//! `App` holds the scanned library, the cursor position in the track list
//! and the latest playback snapshot published by the player thread.

use crate::library::Track;
use crate::player::DisplayState;

/// The main application model.
pub struct App {
    pub tracks: Vec<Track>,
    pub selected: usize,
    pub display: DisplayState,
    pub current_dir: Option<String>,
}

impl App {
    /// Create a new `App` with the provided list of `tracks`.
    pub fn new(tracks: Vec<Track>) -> Self {
        Self {
            tracks,
            selected: 0,
            display: DisplayState::default(),
            current_dir: None,
        }
    }

    /// Replace the library, resetting the cursor to the top.
    pub fn set_tracks(&mut self, tracks: Vec<Track>) {
        self.tracks = tracks;
        self.selected = 0;
    }

    /// Store the latest snapshot published by the player thread.
    pub fn set_display(&mut self, display: DisplayState) {
        self.display = display;
    }

    /// Record the directory the library was scanned from.
    pub fn set_current_dir(&mut self, dir: String) {
        self.current_dir = Some(dir);
    }

    /// Return true if the library contains any tracks.
    pub fn has_tracks(&self) -> bool {
        !self.tracks.is_empty()
    }

    /// Move the cursor to the next track, wrapping at the end.
    pub fn select_next(&mut self) {
        if self.tracks.is_empty() {
            return;
        }
        self.selected = (self.selected + 1) % self.tracks.len();
    }

    /// Move the cursor to the previous track, wrapping at the start.
    pub fn select_prev(&mut self) {
        if self.tracks.is_empty() {
            return;
        }
        self.selected = if self.selected == 0 {
            self.tracks.len() - 1
        } else {
            self.selected - 1
        };
    }

    /// Jump the cursor to the first track.
    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    /// Jump the cursor to the last track.
    pub fn select_last(&mut self) {
        if !self.tracks.is_empty() {
            self.selected = self.tracks.len() - 1;
        }
    }
}
