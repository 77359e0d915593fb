use super::load::{default_config_path, resolve_config_path};
use super::schema::*;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK.get_or_init(|| Mutex::new(())).lock().unwrap()
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_encore_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("ENCORE_CONFIG_PATH", "/tmp/encore-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/encore-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("encore")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("encore")
            .join("config.toml")
    );
}

#[test]
fn defaults_are_valid() {
    let s = Settings::default();
    assert!(s.validate().is_ok());
    assert_eq!(s.player.layout, LayoutSetting::NowPlaying);
    assert!(!s.player.autoplay);
    assert_eq!(s.audio.volume, 1.0);
    assert_eq!(s.logging.file, None);
}

#[test]
fn settings_load_from_config_file_and_parse_layout_aliases() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[player]
layout = "list"
autoplay = true

[audio]
volume = 0.4
muted = true

[controls]
scrub_seconds = 9
volume_step = 0.1

[ui]
header_text = "hello"
now_playing_time_fields = ["elapsed", "remaining"]
now_playing_time_separator = " | "
share_base_url = "https://me.dev"

[catalog]
media_root = "/srv/site/public"
extensions = ["mp3"]
recursive = false
include_hidden = false
follow_links = false

[logging]
file = "/tmp/encore.log"
level = "debug"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("ENCORE_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("ENCORE__AUDIO__VOLUME");

    let s = Settings::load().unwrap();
    assert_eq!(s.player.layout, LayoutSetting::Rows);
    assert!(s.player.autoplay);
    assert_eq!(s.audio.volume, 0.4);
    assert!(s.audio.muted);
    assert_eq!(s.controls.scrub_seconds, 9);
    assert_eq!(s.controls.volume_step, 0.1);
    assert_eq!(s.ui.header_text, "hello");
    assert_eq!(
        s.ui.now_playing_time_fields,
        vec![TimeField::Elapsed, TimeField::Remaining]
    );
    assert_eq!(s.ui.now_playing_time_separator, " | ");
    assert_eq!(s.ui.share_base_url.as_deref(), Some("https://me.dev"));
    assert_eq!(
        s.catalog.media_root,
        Some(std::path::PathBuf::from("/srv/site/public"))
    );
    assert_eq!(s.catalog.extensions, vec!["mp3".to_string()]);
    assert!(!s.catalog.recursive);
    assert!(!s.catalog.include_hidden);
    assert!(!s.catalog.follow_links);
    assert_eq!(
        s.logging.file,
        Some(std::path::PathBuf::from("/tmp/encore.log"))
    );
    assert_eq!(s.logging.level, "debug");
    assert!(s.validate().is_ok());
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[controls]
scrub_seconds = 5
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("ENCORE_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("ENCORE__CONTROLS__SCRUB_SECONDS", "30");

    let s = Settings::load().unwrap();
    assert_eq!(s.controls.scrub_seconds, 30);
}

#[test]
fn validate_rejects_out_of_range_volume() {
    let mut s = Settings::default();
    s.audio.volume = 1.5;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.controls.volume_step = 0.0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.ui.share_base_url = Some("  ".into());
    assert!(s.validate().is_err());
}
