use std::path::PathBuf;

use thiserror::Error;

use crate::engine::EngineError;

/// Failures surfaced by transport operations.
///
/// Probe failures are deliberately absent: an unknown duration is a
/// degraded mode (seeking disabled), not an error. Session storage has its
/// own type in [`crate::session`] because it is never allowed to become
/// fatal.
#[derive(Debug, Error)]
pub enum PlayerError {
    /// The track could not be opened or decoded. Playback is forced to
    /// Stopped when this happens.
    #[error("cannot play {}: {source}", .path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: EngineError,
    },

    /// A playlist index outside the current list. The operation that
    /// produced it is a no-op.
    #[error("no track at index {index} (playlist has {len} tracks)")]
    IndexOutOfRange { index: usize, len: usize },
}
