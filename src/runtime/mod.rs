use std::env;
use std::path::PathBuf;
use std::rc::Rc;

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::catalog::{self, SourceResolver};
use crate::media::RodioBackend;
use crate::session::{LiveOutput, SessionManager};

mod event_loop;
mod logging;
mod settings;
mod startup;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = settings::load_settings();
    logging::init(&settings.logging);

    let target = env::args_os().nth(1).map(PathBuf::from).unwrap_or_else(|| {
        env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
    });

    let catalog = catalog::open(&target, &settings.catalog)?;
    let resolver = SourceResolver {
        media_root: settings.catalog.media_root.clone(),
        base_dir: catalog.base_dir().map(|p| p.to_path_buf()),
    };
    let backend = RodioBackend::open(resolver)?;

    let output = LiveOutput::new();
    let session = SessionManager::new(
        backend,
        Rc::new(catalog),
        startup::session_config(settings.player.layout),
        output,
    );
    let mut app = App::new(session, settings.player.layout);
    startup::apply_playback_defaults(&mut app, &settings);
    tracing::info!(
        target = %target.display(),
        tracks = app.tracks().len(),
        layout = ?settings.player.layout,
        "starting"
    );

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(&mut terminal, &settings, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableMouseCapture, LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    app.session.unmount();
    run_result
}
