//! Saved session: the playlist plus cursor, written as TOML under the
//! state directory so the next run can pick up where this one stopped.
//!
//! Storage is best-effort by contract. A missing, malformed or unwritable
//! session file is logged and treated as "no session", never as an error
//! the user has to deal with. Validation against the live filesystem
//! happens on load, not on save.

use std::path::{Path, PathBuf};
use std::{env, fs};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::player::Playlist;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot encode session: {0}")]
    Encode(#[from] toml::ser::Error),
}

/// What gets persisted: track paths in playlist order and the cursor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub tracks: Vec<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current: Option<usize>,
}

impl Snapshot {
    /// Capture the live playlist verbatim; nothing is filtered at save
    /// time.
    pub fn capture(playlist: &Playlist) -> Self {
        Self {
            tracks: playlist.paths(),
            current: playlist.current_index(),
        }
    }

    /// Check a saved snapshot against the live filesystem.
    ///
    /// Paths that no longer exist are dropped, order preserved; when
    /// nothing survives the whole snapshot is discarded. The saved cursor
    /// is clamped into the filtered list, so a restore always lands on a
    /// real track.
    pub fn validated(self) -> Option<Snapshot> {
        let tracks: Vec<PathBuf> = self.tracks.into_iter().filter(|p| p.is_file()).collect();
        if tracks.is_empty() {
            return None;
        }
        let current = self.current.unwrap_or(0).min(tracks.len() - 1);
        Some(Snapshot {
            tracks,
            current: Some(current),
        })
    }
}

/// Read a snapshot. Absence and corruption both come back as `None`;
/// anything unexpected is logged.
pub fn load(path: &Path) -> Option<Snapshot> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
        Err(e) => {
            log::warn!("cannot read session {}: {e}", path.display());
            return None;
        }
    };
    match toml::from_str(&raw) {
        Ok(snapshot) => Some(snapshot),
        Err(e) => {
            log::warn!("ignoring malformed session {}: {e}", path.display());
            None
        }
    }
}

/// Write a snapshot, creating the parent directory as needed.
pub fn save(path: &Path, snapshot: &Snapshot) -> Result<(), SessionError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let body = toml::to_string(snapshot)?;
    fs::write(path, body)?;
    Ok(())
}

/// Resolve the session file from `CODA_SESSION_PATH` or the default
/// location under the state dir.
pub fn resolve_session_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("CODA_SESSION_PATH") {
        return Some(PathBuf::from(p));
    }
    default_session_path()
}

/// `$XDG_STATE_HOME/coda/session.toml`, falling back to
/// `~/.local/state/coda/session.toml`.
pub fn default_session_path() -> Option<PathBuf> {
    crate::config::default_state_dir().map(|d| d.join("session.toml"))
}
