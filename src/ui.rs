//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};

use crate::app::App;
use crate::catalog::Track;
use crate::config::{ControlsSettings, LayoutSetting, TimeField, UiSettings};
use crate::media::MediaBackend;
use crate::session::{Progress, format_time};

/// Render the controls help text, incorporating scrub seconds.
fn controls_text(layout: LayoutSetting, scrub_seconds: u64) -> String {
    let enter = match layout {
        LayoutSetting::Rows => "play/pause row",
        LayoutSetting::NowPlaying | LayoutSetting::Single => "play selected song",
    };
    let mut parts = vec![
        "[j/k] up/down".to_string(),
        format!("[enter] {enter}"),
        "[space/p] play/pause".to_string(),
    ];
    if layout != LayoutSetting::Single {
        parts.push("[n/b] next/prev song".to_string());
    }
    parts.extend([
        format!("[h/l] scrub -/+{scrub_seconds}s"),
        "[0-9] seek".to_string(),
        "[+/-] volume".to_string(),
        "[m] mute".to_string(),
        "[y] share link".to_string(),
        "[q] quit".to_string(),
    ]);
    parts.join(" | ")
}

/// Build the time label (elapsed/total/remaining) per `UiSettings`.
fn time_text(progress: &Progress, ui: &UiSettings) -> Option<String> {
    let mut parts: Vec<String> = Vec::new();
    for f in &ui.now_playing_time_fields {
        match f {
            TimeField::Elapsed => parts.push(format_time(progress.elapsed)),
            TimeField::Total => {
                if let Some(t) = progress.total {
                    parts.push(format_time(t));
                }
            }
            TimeField::Remaining => {
                if let Some(rem) = progress.remaining() {
                    parts.push(format!("-{}", format_time(rem)));
                }
            }
        }
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(&ui.now_playing_time_separator))
    }
}

/// Now-playing line for the status box, with the cover art locator when the
/// catalog has one.
fn song_text(track: &Track) -> String {
    match track.cover.as_deref().filter(|c| !c.trim().is_empty()) {
        Some(cover) => format!("Song: {} - {} [cover: {}]", track.artist, track.title, cover),
        None => format!("Song: {} - {}", track.artist, track.title),
    }
}

/// Right-hand column of a track row: live progress once the row has been
/// played, otherwise the catalog's display duration.
fn row_time(track: &Track, progress: &Progress, ui: &UiSettings) -> String {
    if progress.is_pristine() {
        track.display_duration.clone().unwrap_or_default()
    } else {
        time_text(progress, ui).unwrap_or_default()
    }
}

/// Render the entire UI into `frame`. Returns the progress gauge area so the
/// event loop can map mouse clicks to seek positions.
pub fn draw<B: MediaBackend>(
    frame: &mut Frame,
    app: &App<B>,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) -> Rect {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(frame.area());
    // Header
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" encore ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    let snapshot = app.snapshot();
    let active = snapshot
        .active_track_id
        .as_deref()
        .and_then(|id| app.session.catalog().get(id));

    // Status box
    let status = {
        let mut parts: Vec<String> = Vec::new();

        match active {
            Some(track) => {
                parts.push(song_text(track));
                parts.push(if snapshot.is_playing { "Playing" } else { "Paused" }.to_string());
            }
            None => parts.push("Stopped".to_string()),
        }

        if snapshot.muted {
            parts.push("Volume: muted".to_string());
        } else {
            parts.push(format!("Volume: {:.0}%", snapshot.volume * 100.0));
        }

        if let Some(msg) = app.status.as_deref().or(snapshot.notice.as_deref()) {
            parts.push(msg.to_string());
        }

        parts.join(" • ")
    };

    let status_par = Paragraph::new(status)
        .block(
            Block::bordered()
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                })
                .title(" status "),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(status_par, chunks[1]);

    // Progress gauge for the active track
    let progress = snapshot.progress();
    let label = if active.is_some() {
        time_text(&progress, ui_settings).unwrap_or_default()
    } else {
        String::new()
    };
    let gauge_block = Block::default().borders(Borders::ALL).title(" progress ");
    let gauge_area = gauge_block.inner(chunks[2]);
    let gauge = Gauge::default()
        .block(gauge_block)
        .gauge_style(Style::default().fg(Color::Cyan))
        .ratio(progress.ratio())
        .label(label);
    frame.render_widget(gauge, chunks[2]);

    // Main list
    {
        let tracks = app.tracks();
        let visible = app.visible_indices();
        let list_width = chunks[3].width.saturating_sub(4) as usize;
        let items: Vec<ListItem> = visible
            .iter()
            .map(|&i| {
                let track = &tracks[i];
                let is_active = snapshot.active_track_id.as_deref() == Some(track.id.as_str());
                let marker = match (is_active, app.session.row_is_playing(&track.id)) {
                    (true, true) => "▶ ",
                    (true, false) => "⏸ ",
                    _ => "  ",
                };
                let name = format!("{marker}{} - {}", track.artist, track.title);

                let time = match app.layout {
                    LayoutSetting::Rows => {
                        row_time(track, &app.session.row_progress(&track.id), ui_settings)
                    }
                    LayoutSetting::NowPlaying | LayoutSetting::Single => {
                        track.display_duration.clone().unwrap_or_default()
                    }
                };

                let pad = list_width.saturating_sub(name.chars().count() + time.chars().count());
                ListItem::new(format!("{name}{}{time}", " ".repeat(pad.max(1))))
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(" tracks "))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = ListState::default();
        state.select(visible.iter().position(|&i| i == app.selected));
        frame.render_stateful_widget(list, chunks[3], &mut state);
    }

    let footer_text = controls_text(app.layout, controls_settings.scrub_seconds);
    let footer = Paragraph::new(footer_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(footer, chunks[4]);

    gauge_area
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_text_follows_configured_fields() {
        let ui = UiSettings {
            now_playing_time_fields: vec![TimeField::Elapsed, TimeField::Total, TimeField::Remaining],
            ..UiSettings::default()
        };
        let progress = Progress {
            elapsed: 65.0,
            total: Some(200.0),
        };
        assert_eq!(time_text(&progress, &ui).as_deref(), Some("1:05 / 3:20 / -2:15"));
    }

    #[test]
    fn time_text_skips_unknown_total() {
        let ui = UiSettings::default();
        let progress = Progress {
            elapsed: 3.0,
            total: None,
        };
        assert_eq!(time_text(&progress, &ui).as_deref(), Some("0:03"));
    }

    #[test]
    fn row_time_prefers_display_duration_until_played() {
        let ui = UiSettings::default();
        let track = Track {
            id: "1".into(),
            title: "T".into(),
            artist: "A".into(),
            source: "/music/t.mp3".into(),
            cover: None,
            display_duration: Some("5:05".into()),
        };
        assert_eq!(row_time(&track, &Progress::default(), &ui), "5:05");

        let played = Progress {
            elapsed: 10.0,
            total: Some(305.0),
        };
        assert_eq!(row_time(&track, &played, &ui), "0:10 / 5:05");
    }

    #[test]
    fn song_text_includes_cover_when_present() {
        let mut track = Track {
            id: "1".into(),
            title: "Adventure Time".into(),
            artist: "Azhar".into(),
            source: "/music/a.wav".into(),
            cover: Some("/music/cover1.jpg".into()),
            display_duration: None,
        };
        assert_eq!(
            song_text(&track),
            "Song: Azhar - Adventure Time [cover: /music/cover1.jpg]"
        );

        track.cover = None;
        assert_eq!(song_text(&track), "Song: Azhar - Adventure Time");
    }

    #[test]
    fn controls_text_mentions_scrub_seconds() {
        assert!(controls_text(LayoutSetting::NowPlaying, 7).contains("+7s"));
        assert!(controls_text(LayoutSetting::Rows, 5).contains("play/pause row"));
        assert!(!controls_text(LayoutSetting::Single, 5).contains("next/prev"));
    }
}
