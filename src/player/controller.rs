use std::path::PathBuf;
use std::sync::mpsc::{self, SendError, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use crate::config::PlaybackSettings;
use crate::library::Track;

use super::thread::spawn_player_thread;
use super::types::{DisplayHandle, DisplayState, PlayerCmd};

/// Handle to the player thread: a command sender plus the shared display
/// snapshot. Dropping it does not stop the thread; call [`Player::quit`]
/// for an orderly shutdown (stop, session save, join).
pub struct Player {
    tx: Sender<PlayerCmd>,
    display: DisplayHandle,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl Player {
    pub fn new(
        tracks: Vec<Track>,
        playback: PlaybackSettings,
        session_path: Option<PathBuf>,
    ) -> Self {
        let (tx, rx) = mpsc::channel::<PlayerCmd>();
        let display: DisplayHandle = Arc::new(Mutex::new(DisplayState::default()));

        let handle = spawn_player_thread(tracks, rx, display.clone(), playback, session_path);

        Self {
            tx,
            display,
            join: Mutex::new(Some(handle)),
        }
    }

    pub fn display_handle(&self) -> DisplayHandle {
        self.display.clone()
    }

    pub fn send(&self, cmd: PlayerCmd) -> Result<(), SendError<PlayerCmd>> {
        self.tx.send(cmd)
    }

    /// Stop playback, persist the session and wait for the player thread
    /// to exit.
    pub fn quit(&self) {
        let _ = self.send(PlayerCmd::Quit);

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}
