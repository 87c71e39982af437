use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;

use crate::config::PlaybackSettings;
use crate::engine::RodioEngine;
use crate::library::Track;
use crate::session::{self, Snapshot};

use super::transport::Transport;
use super::types::{DisplayHandle, PlayerCmd};

/// Receive timeout that doubles as the polling beat: position updates and
/// end-of-track detection happen at this cadence.
const TICK_INTERVAL: Duration = Duration::from_millis(100);

pub(super) fn spawn_player_thread(
    tracks: Vec<Track>,
    rx: Receiver<PlayerCmd>,
    display: DisplayHandle,
    playback: PlaybackSettings,
    session_path: Option<PathBuf>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        // The output stream lives and dies on this thread.
        let engine = match RodioEngine::new() {
            Ok(engine) => engine,
            Err(e) => {
                log::error!("{e}");
                if let Ok(mut d) = display.lock() {
                    d.error = Some(e.to_string());
                }
                return;
            }
        };

        let mut transport = Transport::new(Box::new(engine));
        transport.set_shuffle(playback.shuffle);
        transport.set_repeat(playback.repeat);
        transport.set_volume(playback.volume);
        handle_cmd(
            PlayerCmd::ReplaceTracks(tracks),
            &mut transport,
            session_path.as_deref(),
        );
        publish(&transport, &display);

        loop {
            match rx.recv_timeout(TICK_INTERVAL) {
                Ok(cmd) => {
                    let quit = handle_cmd(cmd, &mut transport, session_path.as_deref());
                    publish(&transport, &display);
                    if quit {
                        break;
                    }
                }
                Err(RecvTimeoutError::Timeout) => {
                    transport.tick();
                    publish(&transport, &display);
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    })
}

/// Apply one command to the transport. Returns true when the thread should
/// exit. Failures are already recorded in the transport's display state;
/// they are logged here and never break the loop.
fn handle_cmd(cmd: PlayerCmd, transport: &mut Transport, session_path: Option<&Path>) -> bool {
    match cmd {
        PlayerCmd::Play(index) => {
            if let Err(e) = transport.load_and_play(index) {
                log::warn!("{e}");
            }
        }
        PlayerCmd::Load(index) => {
            if let Err(e) = transport.load_only(index) {
                log::warn!("{e}");
            }
        }
        PlayerCmd::PlayPause => {
            if let Err(e) = transport.play_pause() {
                log::warn!("{e}");
            }
        }
        PlayerCmd::Pause => transport.pause(),
        PlayerCmd::Resume => {
            if let Err(e) = transport.play() {
                log::warn!("{e}");
            }
        }
        PlayerCmd::Stop => transport.stop(),
        PlayerCmd::Next => transport.next(),
        PlayerCmd::Prev => transport.previous(),
        PlayerCmd::SeekBy(secs) => {
            if let Err(e) = transport.seek_by(secs) {
                log::warn!("{e}");
            }
        }
        PlayerCmd::VolumeBy(delta) => transport.adjust_volume(delta),
        PlayerCmd::ToggleShuffle => transport.toggle_shuffle(),
        PlayerCmd::ToggleRepeat => transport.toggle_repeat(),
        PlayerCmd::ReplaceTracks(tracks) => {
            transport.replace_tracks(tracks);
            save_session(transport, session_path);
        }
        PlayerCmd::Quit => {
            transport.stop();
            save_session(transport, session_path);
            return true;
        }
    }
    false
}

fn save_session(transport: &Transport, session_path: Option<&Path>) {
    let Some(path) = session_path else {
        return;
    };
    let snapshot = Snapshot::capture(transport.playlist());
    if let Err(e) = session::save(path, &snapshot) {
        log::warn!("cannot save session to {}: {e}", path.display());
    }
}

fn publish(transport: &Transport, display: &DisplayHandle) {
    if let Ok(mut d) = display.lock() {
        *d = transport.display_state();
    }
}
