//! The playback core: playlist, transport state machine, ordering policy
//! and the thread that owns all of it.
//!
//! Everything here runs on one player thread. The rest of the program
//! sends [`PlayerCmd`] values through the [`Player`] handle and reads the
//! mutex-guarded [`DisplayState`] snapshot it republishes.

mod controller;
mod order;
mod playlist;
mod thread;
mod transport;
mod types;

pub use controller::Player;
pub use playlist::Playlist;
pub use transport::Transport;
pub use types::{DisplayHandle, DisplayState, PlaybackState, PlayerCmd};

#[cfg(test)]
mod tests;
