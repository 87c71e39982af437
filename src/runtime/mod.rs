use std::sync::mpsc;

use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::logging;
use crate::mpris::ControlCmd;
use crate::player::{Player, PlayerCmd};
use crate::session;

mod event_loop;
mod mpris_sync;
mod settings;
mod startup;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();
    let settings = settings::load_settings();

    let library = startup::initial_library(&settings);
    let session_path = session::resolve_session_path();

    let player = Player::new(
        library.tracks.clone(),
        settings.playback.clone(),
        session_path,
    );
    let mut app = App::new(library.tracks);
    if let Some(dir) = library.dir {
        app.set_current_dir(dir);
    }
    if let Some(idx) = library.resume_index {
        // Preload the remembered track so space resumes it; playback stays
        // stopped until asked.
        app.selected = idx;
        let _ = player.send(PlayerCmd::Load(idx));
    }

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let mpris = crate::mpris::spawn_mpris(control_tx.clone());

    mpris_sync::update_mpris(&mpris, &app);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result: Result<(), Box<dyn std::error::Error>> = (|| {
        let mut state = event_loop::EventLoopState::new(&app);
        event_loop::run(
            &mut terminal,
            &settings,
            &mut app,
            &player,
            &mpris,
            &control_tx,
            &control_rx,
            &mut state,
        )
    })();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    run_result
}
