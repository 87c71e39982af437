use std::env;
use std::path::Path;

use crate::config;
use crate::library::{self, Track};
use crate::session;

/// What the app starts with: the initial track list, the directory it came
/// from (when scanned) and an optional cursor restored from the session.
pub struct InitialLibrary {
    pub tracks: Vec<Track>,
    pub dir: Option<String>,
    pub resume_index: Option<usize>,
}

/// Build the startup library. An explicit directory argument wins, then the
/// saved session (when resume is enabled), then a scan of the working
/// directory.
pub fn initial_library(settings: &config::Settings) -> InitialLibrary {
    if let Some(dir) = env::args().nth(1) {
        return scan_dir(dir, settings);
    }

    if settings.session.resume {
        if let Some(snapshot) = session::resolve_session_path()
            .and_then(|p| session::load(&p))
            .and_then(session::Snapshot::validated)
        {
            let tracks = snapshot
                .tracks
                .iter()
                .map(|p| Track::from_path(p))
                .collect();
            return InitialLibrary {
                tracks,
                dir: None,
                resume_index: snapshot.current,
            };
        }
    }

    let dir = env::current_dir()
        .ok()
        .and_then(|p| p.to_str().map(|s| s.to_string()))
        .unwrap_or_else(|| ".".to_string());
    scan_dir(dir, settings)
}

fn scan_dir(dir: String, settings: &config::Settings) -> InitialLibrary {
    let tracks = library::scan(Path::new(&dir), &settings.library);
    InitialLibrary {
        tracks,
        dir: Some(dir),
        resume_index: None,
    }
}
