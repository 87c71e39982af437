use std::path::Path;
use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::config;
use crate::library;
use crate::mpris::{ControlCmd, MprisHandle};
use crate::player::{PlaybackState, Player, PlayerCmd};
use crate::runtime::mpris_sync::update_mpris;
use crate::ui;

/// State tracked by the runtime event loop across iterations.
pub struct EventLoopState {
    /// Internal two-key prefix state used for `gg` handling.
    pub pending_gg: bool,
    /// Last-known playing index as emitted to MPRIS.
    pub last_mpris_index: Option<usize>,
    /// Last-known playback state as emitted to MPRIS.
    pub last_mpris_playback: PlaybackState,
}

impl EventLoopState {
    /// Construct a new `EventLoopState` seeded from `app`.
    pub fn new(app: &App) -> Self {
        Self {
            pending_gg: false,
            last_mpris_index: app.display.current_index,
            last_mpris_playback: app.display.status,
        }
    }
}

/// Main terminal event loop: handles input, UI drawing, sync with the player
/// thread and MPRIS. Returns `Ok(())` when shutdown is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    player: &Player,
    mpris: &MprisHandle,
    control_tx: &mpsc::Sender<ControlCmd>,
    control_rx: &mpsc::Receiver<ControlCmd>,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    let display_handle = player.display_handle();

    loop {
        // Pull the latest snapshot published by the player thread.
        if let Ok(d) = display_handle.lock() {
            app.set_display(d.clone());
        }

        // Keep MPRIS in sync even when playback changes come from media keys
        // or auto-advance.
        if app.display.current_index != state.last_mpris_index
            || app.display.status != state.last_mpris_playback
        {
            update_mpris(mpris, app);
            state.last_mpris_index = app.display.current_index;
            state.last_mpris_playback = app.display.status;
        }

        terminal.draw(|f| ui::draw(f, app, &settings.ui, &settings.controls))?;

        while let Ok(cmd) = control_rx.try_recv() {
            if handle_control_cmd(cmd, app, player) {
                return Ok(());
            }
        }

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, app, player, control_tx, state) {
                    break;
                }
            }
        }
    }

    Ok(())
}

fn handle_control_cmd(cmd: ControlCmd, app: &mut App, player: &Player) -> bool {
    match cmd {
        ControlCmd::Quit => {
            player.quit();
            return true;
        }
        ControlCmd::Play => {
            if starting_fresh(app) {
                if app.has_tracks() {
                    let _ = player.send(PlayerCmd::Play(app.selected));
                }
            } else {
                let _ = player.send(PlayerCmd::Resume);
            }
        }
        ControlCmd::Pause => {
            let _ = player.send(PlayerCmd::Pause);
        }
        ControlCmd::PlayPause => {
            if starting_fresh(app) {
                if app.has_tracks() {
                    let _ = player.send(PlayerCmd::Play(app.selected));
                }
            } else {
                let _ = player.send(PlayerCmd::PlayPause);
            }
        }
        ControlCmd::Stop => {
            let _ = player.send(PlayerCmd::Stop);
        }
        ControlCmd::Next => {
            if app.has_tracks() {
                let _ = player.send(PlayerCmd::Next);
            }
        }
        ControlCmd::Prev => {
            if app.has_tracks() {
                let _ = player.send(PlayerCmd::Prev);
            }
        }
    }

    false
}

/// True when nothing has ever been loaded, so "play" should start from the
/// list cursor rather than resume.
fn starting_fresh(app: &App) -> bool {
    app.display.status == PlaybackState::Stopped && app.display.current_index.is_none()
}

fn handle_key_event(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    player: &Player,
    control_tx: &mpsc::Sender<ControlCmd>,
    state: &mut EventLoopState,
) -> bool {
    match key.code {
        KeyCode::Char('q') => {
            state.pending_gg = false;
            player.quit();
            return true;
        }
        KeyCode::Char('g') => {
            if state.pending_gg {
                state.pending_gg = false;
                app.select_first();
            } else {
                state.pending_gg = true;
            }
        }
        KeyCode::Char('G') => {
            state.pending_gg = false;
            app.select_last();
        }
        KeyCode::Char('j') | KeyCode::Down => {
            state.pending_gg = false;
            app.select_next();
        }
        KeyCode::Char('k') | KeyCode::Up => {
            state.pending_gg = false;
            app.select_prev();
        }
        KeyCode::Enter => {
            state.pending_gg = false;
            if app.has_tracks() {
                let _ = player.send(PlayerCmd::Play(app.selected));
            }
        }
        KeyCode::Char('p') | KeyCode::Char(' ') => {
            state.pending_gg = false;
            let _ = control_tx.send(ControlCmd::PlayPause);
        }
        KeyCode::Char('x') => {
            state.pending_gg = false;
            let _ = player.send(PlayerCmd::Stop);
        }
        KeyCode::Char('l') => {
            state.pending_gg = false;
            let _ = control_tx.send(ControlCmd::Next);
        }
        KeyCode::Char('h') => {
            state.pending_gg = false;
            let _ = control_tx.send(ControlCmd::Prev);
        }
        KeyCode::Char('L') => {
            state.pending_gg = false;
            let _ = player.send(PlayerCmd::SeekBy(scrub_step(settings)));
        }
        KeyCode::Char('H') => {
            state.pending_gg = false;
            let _ = player.send(PlayerCmd::SeekBy(-scrub_step(settings)));
        }
        KeyCode::Char('-') => {
            state.pending_gg = false;
            let _ = player.send(PlayerCmd::VolumeBy(-settings.controls.volume_step));
        }
        KeyCode::Char('+') | KeyCode::Char('=') => {
            state.pending_gg = false;
            let _ = player.send(PlayerCmd::VolumeBy(settings.controls.volume_step));
        }
        KeyCode::Char('s') => {
            state.pending_gg = false;
            let _ = player.send(PlayerCmd::ToggleShuffle);
        }
        KeyCode::Char('r') => {
            state.pending_gg = false;
            let _ = player.send(PlayerCmd::ToggleRepeat);
        }
        KeyCode::Char('R') => {
            state.pending_gg = false;
            rescan(settings, app, player);
        }
        KeyCode::Char(_) => {
            // g pending should clear on any other printable char
            state.pending_gg = false;
        }
        _ => {}
    }

    false
}

fn scrub_step(settings: &config::Settings) -> i64 {
    settings.controls.scrub_seconds.min(i64::MAX as u64) as i64
}

/// Re-scan the directory the library came from and swap in the result; the
/// player stops and the saved session is rewritten.
fn rescan(settings: &config::Settings, app: &mut App, player: &Player) {
    let Some(dir) = app.current_dir.clone() else {
        return;
    };
    let tracks = library::scan(Path::new(&dir), &settings.library);
    let _ = player.send(PlayerCmd::ReplaceTracks(tracks.clone()));
    app.set_tracks(tracks);
}
