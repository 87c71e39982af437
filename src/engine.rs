//! The audio output boundary.
//!
//! Everything above this module talks to an [`AudioEngine`]; the one real
//! implementation drives `rodio`. Keeping the boundary a trait is what lets
//! the transport logic run in tests without an audio device.

use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

mod backend;

pub use backend::RodioEngine;

/// Failures at the audio output boundary.
#[derive(Debug, Error)]
pub enum EngineError {
    /// No usable audio output device / stream.
    #[error("audio output unavailable: {0}")]
    Output(String),

    #[error("cannot open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot decode {}: {reason}", .path.display())]
    Decode { path: PathBuf, reason: String },

    /// `play` was called before any successful `load`.
    #[error("no track loaded")]
    NothingLoaded,
}

/// A minimal playback engine.
///
/// Contracts the transport relies on:
///
/// - After a successful [`load`](AudioEngine::load), the path stays playable
///   until the next `load`, including after [`stop`](AudioEngine::stop),
///   since `play` re-opens the file.
/// - [`elapsed_since_play`](AudioEngine::elapsed_since_play) counts from the
///   most recent `play` call only: it restarts at zero on every `play`,
///   freezes across `pause`/`resume` gaps, and zeroes on `stop`. Callers
///   that need an absolute track position must add their own base offset.
/// - [`is_busy`](AudioEngine::is_busy) is true while un-drained audio
///   remains; it going false during playback is the end-of-track signal.
pub trait AudioEngine {
    /// Prepare `path` for playback, replacing any previously loaded track.
    fn load(&mut self, path: &Path) -> Result<(), EngineError>;

    /// (Re)start output of the loaded track at `start_at` from the file
    /// start. Resets the elapsed counter.
    fn play(&mut self, start_at: Duration) -> Result<(), EngineError>;

    /// Suspend output, freezing the elapsed counter. No-op when idle.
    fn pause(&mut self);

    /// Continue output after `pause` without restarting the source.
    fn resume(&mut self);

    /// Halt output and zero the elapsed counter. The loaded track remains
    /// loaded.
    fn stop(&mut self);

    /// Set output gain as a fraction; values outside `[0, 1]` are clamped.
    /// Applies to the current sink and all future `play` calls.
    fn set_volume(&mut self, volume: f32);

    /// Whether the engine still holds audio that has not finished draining.
    fn is_busy(&self) -> bool;

    /// Wall-clock playback time since the last `play`, excluding paused
    /// time.
    fn elapsed_since_play(&self) -> Duration;
}
