use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/encore/config.toml` or `~/.config/encore/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `ENCORE__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub player: PlayerSettings,
    pub audio: AudioSettings,
    pub controls: ControlsSettings,
    pub ui: UiSettings,
    pub catalog: CatalogSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    /// Which player shape to mount.
    pub layout: LayoutSetting,
    /// Start the first catalog track right away.
    pub autoplay: bool,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            layout: LayoutSetting::NowPlaying,
            autoplay: false,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutSetting {
    /// One player bar over the playlist; advances at the end of each track.
    #[serde(alias = "now_playing", alias = "nowplaying", alias = "player")]
    NowPlaying,
    /// Every track is its own play button; stops at the end of each.
    #[serde(alias = "list", alias = "row")]
    Rows,
    /// Dedicated screen for one track.
    #[serde(alias = "detail", alias = "single-track", alias = "single_track")]
    Single,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Initial volume in [0, 1].
    pub volume: f32,
    /// Whether output starts muted.
    pub muted: bool,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            volume: 1.0,
            muted: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Number of seconds to scrub when pressing `h` / `l`.
    pub scrub_seconds: u64,
    /// Volume change per `+` / `-` press.
    pub volume_step: f32,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self {
            scrub_seconds: 5,
            volume_step: 0.05,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,

    /// Which time fields to show next to the progress bar, and in what order.
    ///
    /// Example: ["elapsed", "total", "remaining"]
    pub now_playing_time_fields: Vec<TimeField>,

    /// Separator used to join `now_playing_time_fields`.
    pub now_playing_time_separator: String,

    /// Site root used to build share links (`<base>/music/<id>`).
    pub share_base_url: Option<String>,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ encore ~ ".to_string(),
            now_playing_time_fields: vec![TimeField::Elapsed, TimeField::Total],
            now_playing_time_separator: " / ".to_string(),
            share_base_url: None,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimeField {
    Elapsed,
    Total,
    Remaining,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// Directory that root-relative locators (`/music/a.mp3`) resolve under.
    pub media_root: Option<PathBuf>,
    /// File extensions to treat as audio when scanning (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Optional cap on directory recursion depth.
    pub max_depth: Option<usize>,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            media_root: None,
            extensions: vec!["mp3".into(), "flac".into(), "wav".into(), "ogg".into()],
            follow_links: true,
            include_hidden: true,
            recursive: true,
            max_depth: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log file. Logging is off when unset; the terminal belongs to the UI.
    pub file: Option<PathBuf>,
    /// Default filter directive, overridden by `ENCORE_LOG`.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            file: None,
            level: "info".to_string(),
        }
    }
}
