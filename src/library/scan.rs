use std::path::Path;

use walkdir::{DirEntry, WalkDir};

use crate::config::LibrarySettings;

use super::model::Track;

/// Collect every audio file under `dir`, sorted lexicographically by path
/// so playlist order is stable across runs and machines.
pub fn scan(dir: &Path, settings: &LibrarySettings) -> Vec<Track> {
    let exts = normalized_extensions(settings);

    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);
    if let Some(depth) = depth_limit(settings) {
        walker = walker.max_depth(depth);
    }

    let include_hidden = settings.include_hidden;
    let mut tracks: Vec<Track> = walker
        .into_iter()
        // The root entry is exempt so an explicitly named dot-directory
        // still gets scanned.
        .filter_entry(|e| include_hidden || e.depth() == 0 || !hidden(e))
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file() && matches_extension(e.path(), &exts))
        .map(|e| Track::from_path(e.path()))
        .collect();

    tracks.sort_by(|a, b| a.path.cmp(&b.path));
    tracks
}

fn normalized_extensions(settings: &LibrarySettings) -> Vec<String> {
    settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}

/// `None` means unlimited; a non-recursive scan stops at the root's direct
/// children (walkdir depth 1).
fn depth_limit(settings: &LibrarySettings) -> Option<usize> {
    if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    }
}

fn hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}

fn matches_extension(path: &Path, exts: &[String]) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|e| e.to_ascii_lowercase())
        .is_some_and(|e| exts.iter().any(|want| *want == e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(dir: &TempDir, rel: &str) {
        let path = dir.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, b"stub").unwrap();
    }

    fn titles(tracks: &[Track]) -> Vec<&str> {
        tracks.iter().map(|t| t.title.as_str()).collect()
    }

    #[test]
    fn keeps_configured_extensions_regardless_of_case() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "loud.MP3");
        touch(&dir, "quiet.ogg");
        touch(&dir, "notes.txt");
        touch(&dir, "no_extension");

        let tracks = scan(dir.path(), &LibrarySettings::default());
        assert_eq!(titles(&tracks), vec!["loud", "quiet"]);
    }

    #[test]
    fn orders_results_by_path() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "c.wav");
        touch(&dir, "a.flac");
        touch(&dir, "b.mp3");

        let tracks = scan(dir.path(), &LibrarySettings::default());
        assert_eq!(titles(&tracks), vec!["a", "b", "c"]);
    }

    #[test]
    fn skips_dotfiles_unless_asked() {
        let dir = TempDir::new().unwrap();
        touch(&dir, ".secret.mp3");
        touch(&dir, ".stash/tucked.mp3");
        touch(&dir, "plain.mp3");

        let hidden_off = LibrarySettings {
            include_hidden: false,
            ..LibrarySettings::default()
        };
        assert_eq!(titles(&scan(dir.path(), &hidden_off)), vec!["plain"]);

        let everything = scan(dir.path(), &LibrarySettings::default());
        assert_eq!(everything.len(), 3);
    }

    #[test]
    fn non_recursive_scan_ignores_subdirectories() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "top.mp3");
        touch(&dir, "deeper/nested.mp3");

        let settings = LibrarySettings {
            recursive: false,
            ..LibrarySettings::default()
        };
        assert_eq!(titles(&scan(dir.path(), &settings)), vec!["top"]);
    }

    #[test]
    fn max_depth_caps_recursion() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "root.mp3");
        touch(&dir, "d1/one.mp3");
        touch(&dir, "d1/d2/two.mp3");

        // walkdir counts the root as depth 0, so 2 reaches d1/* only.
        let settings = LibrarySettings {
            max_depth: Some(2),
            ..LibrarySettings::default()
        };
        let found = scan(dir.path(), &settings);
        assert_eq!(titles(&found), vec!["one", "root"]);
    }
}
