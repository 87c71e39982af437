use std::fs;
use std::path::PathBuf;

use tempfile::tempdir;

use super::{Track, probe};

#[test]
fn display_prefers_artist_dash_title() {
    let mut track = Track {
        path: PathBuf::from("/tmp/Song.mp3"),
        title: "Song".to_string(),
        artist: Some("Artist".to_string()),
        duration: None,
    };
    assert_eq!(track.display(), "Artist - Song");

    track.artist = Some("  Artist  ".to_string());
    assert_eq!(track.display(), "Artist - Song");

    track.artist = Some("   ".to_string());
    assert_eq!(track.display(), "Song");

    track.artist = None;
    assert_eq!(track.display(), "Song");
}

#[test]
fn from_path_falls_back_to_file_stem() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("untitled.mp3");
    fs::write(&path, b"not a real mp3").unwrap();

    let track = Track::from_path(&path);
    assert_eq!(track.title, "untitled");
    assert_eq!(track.artist, None);
    assert_eq!(track.duration, None);
    assert_eq!(track.path, path);
}

#[test]
fn probe_returns_none_for_garbage() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("noise.flac");
    fs::write(&path, b"definitely not flac data").unwrap();

    assert_eq!(probe(&path), None);
}

#[test]
fn probe_returns_none_for_missing_file() {
    let dir = tempdir().unwrap();
    assert_eq!(probe(&dir.path().join("gone.ogg")), None);
}
