use std::path::PathBuf;

use crate::library::Track;

/// An ordered track list with a cursor.
///
/// The only mutation is wholesale replacement; there is no insert/remove/
/// reorder surface to keep consistent with a playing engine. The cursor is
/// always in bounds or `None`, and an empty list forces `None`.
#[derive(Default)]
pub struct Playlist {
    tracks: Vec<Track>,
    current: Option<usize>,
}

impl Playlist {
    pub fn new(tracks: Vec<Track>) -> Self {
        Self {
            tracks,
            current: None,
        }
    }

    /// Swap in a new track list. The cursor resets; any notion of "current
    /// track" from the old list is meaningless against the new one.
    pub fn replace(&mut self, tracks: Vec<Track>) {
        self.tracks = tracks;
        self.current = None;
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn track(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    /// Move the cursor; out-of-range indices are ignored so the bounds
    /// invariant can't be broken from outside.
    pub fn select(&mut self, index: usize) {
        if index < self.tracks.len() {
            self.current = Some(index);
        }
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        self.tracks.iter().map(|t| t.path.clone()).collect()
    }
}
