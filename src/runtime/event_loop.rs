use std::time::Duration;

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{Terminal, backend::CrosstermBackend, layout::Rect};

use crate::app::App;
use crate::config;
use crate::media::MediaBackend;
use crate::session::pointer_fraction;
use crate::ui;

/// Main terminal event loop: drains media notifications, draws, and handles
/// input. Returns `Ok(())` when shutdown is requested.
pub fn run<B: MediaBackend>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App<B>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut gauge = Rect::default();

    loop {
        app.tick();

        terminal.draw(|f| gauge = ui::draw(f, app, &settings.ui, &settings.controls))?;

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if handle_key_event(key, app) {
                        break;
                    }
                }
                Event::Mouse(mouse) => handle_mouse_event(mouse, gauge, app),
                _ => {}
            }
        }
    }

    Ok(())
}

/// Returns true when the user asked to quit.
fn handle_key_event<B: MediaBackend>(key: KeyEvent, app: &mut App<B>) -> bool {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return true,
        KeyCode::Char('j') | KeyCode::Down => app.next(),
        KeyCode::Char('k') | KeyCode::Up => app.prev(),
        KeyCode::Enter => app.activate_selected(),
        KeyCode::Char('p') | KeyCode::Char(' ') => app.play_pause(),
        KeyCode::Char('n') => app.skip_next(),
        KeyCode::Char('b') => app.skip_prev(),
        KeyCode::Char('l') | KeyCode::Right => app.scrub(true),
        KeyCode::Char('h') | KeyCode::Left => app.scrub(false),
        KeyCode::Char(c @ '0'..='9') => {
            if let Some(tenth) = c.to_digit(10) {
                app.seek_tenth(tenth);
            }
        }
        KeyCode::Char('+') | KeyCode::Char('=') => app.volume_up(),
        KeyCode::Char('-') => app.volume_down(),
        KeyCode::Char('m') => app.toggle_mute(),
        KeyCode::Char('y') => app.share_link(),
        _ => {}
    }
    false
}

/// A click or drag on the progress gauge seeks to that position.
fn handle_mouse_event<B: MediaBackend>(mouse: MouseEvent, gauge: Rect, app: &mut App<B>) {
    let pressed = matches!(
        mouse.kind,
        MouseEventKind::Down(MouseButton::Left) | MouseEventKind::Drag(MouseButton::Left)
    );
    if !pressed || mouse.row < gauge.y || mouse.row >= gauge.y + gauge.height {
        return;
    }
    // Drags may overshoot the bar horizontally; seeking clamps.
    app.seek_fraction(pointer_fraction(mouse.column, gauge.x, gauge.width));
}
