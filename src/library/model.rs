use std::path::{Path, PathBuf};
use std::time::Duration;

use lofty::prelude::*;
use lofty::probe::Probe;
use lofty::tag::ItemKey;

/// One playable file. Metadata is resolved once, at construction; the
/// struct does not watch the underlying file afterwards.
#[derive(Debug, Clone)]
pub struct Track {
    pub path: PathBuf,
    pub title: String,
    pub artist: Option<String>,
    /// `None` means unknown, not zero-length. Seeking is disabled for
    /// tracks without a known duration.
    pub duration: Option<Duration>,
}

impl Track {
    /// Build a track from a file on disk, reading whatever tags are
    /// available. Never fails: an unreadable file still yields a track
    /// titled after its stem, with no artist and an unknown duration.
    pub fn from_path(path: &Path) -> Self {
        let mut title = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("UNKNOWN")
            .to_string();
        let mut artist: Option<String> = None;
        let mut duration: Option<Duration> = None;

        if let Ok(tagged) = Probe::open(path).and_then(|p| p.read()) {
            duration = Some(tagged.properties().duration()).filter(|d| !d.is_zero());

            if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
                if let Some(v) = tag.get_string(&ItemKey::TrackTitle) {
                    if !v.trim().is_empty() {
                        title = v.to_string();
                    }
                }
                if let Some(v) = tag.get_string(&ItemKey::TrackArtist) {
                    let v = v.trim();
                    if !v.is_empty() {
                        artist = Some(v.to_string());
                    }
                }
            }
        }

        Self {
            path: path.to_path_buf(),
            title,
            artist,
            duration,
        }
    }

    /// Human-readable label: `"Artist - Title"` when an artist tag exists.
    pub fn display(&self) -> String {
        match self.artist.as_deref() {
            Some(a) if !a.trim().is_empty() => format!("{} - {}", a.trim(), self.title),
            _ => self.title.clone(),
        }
    }
}
