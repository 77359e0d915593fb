use crate::app::App;
use crate::config;
use crate::media::MediaBackend;
use crate::session::SessionConfig;

/// Session shape for the configured layout.
pub fn session_config(layout: config::LayoutSetting) -> SessionConfig {
    match layout {
        config::LayoutSetting::NowPlaying => SessionConfig::now_playing(),
        config::LayoutSetting::Rows => SessionConfig::rows(),
        config::LayoutSetting::Single => SessionConfig::single(),
    }
}

pub fn apply_playback_defaults<B: MediaBackend>(app: &mut App<B>, settings: &config::Settings) {
    app.scrub_seconds = settings.controls.scrub_seconds;
    app.volume_step = settings.controls.volume_step;
    app.share_base_url = settings.ui.share_base_url.clone();

    app.session.set_volume(settings.audio.volume);
    if settings.audio.muted {
        app.session.toggle_mute();
    }

    if settings.player.autoplay && app.has_tracks() {
        app.activate_selected();
    }
}
