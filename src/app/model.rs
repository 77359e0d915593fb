//! Application model: the list cursor and the playback session behind it.
//!
//! `App` translates user intents (keys, clicks) into session operations and
//! keeps a one-line status for the UI.

use crate::catalog::{Track, share_url};
use crate::config::LayoutSetting;
use crate::media::MediaBackend;
use crate::session::{SeekOutcome, SessionError, SessionManager, Snapshot};

/// The main application model.
pub struct App<B: MediaBackend> {
    pub session: SessionManager<B>,
    pub layout: LayoutSetting,
    pub selected: usize,
    /// Transient message for the status line.
    pub status: Option<String>,

    pub scrub_seconds: u64,
    pub volume_step: f32,
    pub share_base_url: Option<String>,

    /// Active track seen on the last tick; the cursor follows auto-advance.
    last_active: Option<String>,
}

impl<B: MediaBackend> App<B> {
    pub fn new(session: SessionManager<B>, layout: LayoutSetting) -> Self {
        Self {
            session,
            layout,
            selected: 0,
            status: None,
            scrub_seconds: 5,
            volume_step: 0.05,
            share_base_url: None,
            last_active: None,
        }
    }

    pub fn tracks(&self) -> &[Track] {
        self.session.catalog().tracks()
    }

    /// Return true if the catalog contains any tracks.
    pub fn has_tracks(&self) -> bool {
        !self.tracks().is_empty()
    }

    pub fn selected_track(&self) -> Option<&Track> {
        self.tracks().get(self.selected)
    }

    pub fn snapshot(&self) -> Snapshot {
        self.session.snapshot()
    }

    /// Catalog indices the track list shows. The single-track screen shows
    /// only the track under the cursor.
    pub fn visible_indices(&self) -> Vec<usize> {
        match self.layout {
            LayoutSetting::Single if self.has_tracks() => vec![self.selected],
            LayoutSetting::Single => Vec::new(),
            LayoutSetting::NowPlaying | LayoutSetting::Rows => (0..self.tracks().len()).collect(),
        }
    }

    /// Set the selected index, clamped to the catalog.
    pub fn set_selected(&mut self, idx: usize) {
        let len = self.tracks().len();
        self.selected = if len == 0 { 0 } else { idx.min(len - 1) };
    }

    /// Move selection to the next track, wrapping to the first.
    pub fn next(&mut self) {
        let len = self.tracks().len();
        if len > 0 {
            self.selected = (self.selected + 1) % len;
        }
    }

    /// Move selection to the previous track, wrapping to the last.
    pub fn prev(&mut self) {
        let len = self.tracks().len();
        if len > 0 {
            self.selected = (self.selected + len - 1) % len;
        }
    }

    /// Play the track under the cursor. In the row layout this is the row's
    /// play button, so pressing it on the active row pauses.
    pub fn activate_selected(&mut self) {
        let Some(id) = self.selected_track().map(|t| t.id.clone()) else {
            return;
        };
        let result = match self.layout {
            LayoutSetting::Rows => self.session.toggle_row(&id),
            LayoutSetting::NowPlaying | LayoutSetting::Single => self.session.select_track(&id),
        };
        self.report(result);
        self.last_active = self.session.active_track_id().map(str::to_owned);
    }

    /// Toggle the active track, or start the selected one when nothing is loaded.
    pub fn play_pause(&mut self) {
        if self.session.active_track_id().is_none() {
            self.activate_selected();
        } else {
            let result = self.session.toggle_play_pause();
            self.report(result);
        }
    }

    /// The single-track screen has no playlist to skip through.
    pub fn skip_next(&mut self) {
        if self.layout == LayoutSetting::Single {
            return;
        }
        let result = self.session.next();
        self.report(result);
        self.follow_active();
    }

    pub fn skip_prev(&mut self) {
        if self.layout == LayoutSetting::Single {
            return;
        }
        let result = self.session.previous();
        self.report(result);
        self.follow_active();
    }

    /// Seek the active track to `fraction` of its length.
    pub fn seek_fraction(&mut self, fraction: f64) {
        if self.session.seek(fraction) == SeekOutcome::NotReady {
            tracing::debug!(fraction, "seek ignored, duration unknown");
        }
    }

    /// Seek to `tenth / 10` of the track (number keys).
    pub fn seek_tenth(&mut self, tenth: u32) {
        self.seek_fraction(f64::from(tenth.min(10)) / 10.0);
    }

    pub fn scrub(&mut self, forward: bool) {
        let secs = self.scrub_seconds as f64;
        let delta = if forward { secs } else { -secs };
        self.session.seek_by(delta);
    }

    pub fn volume_up(&mut self) {
        let v = self.session.volume() + self.volume_step;
        self.session.set_volume(v);
    }

    pub fn volume_down(&mut self) {
        let v = self.session.volume() - self.volume_step;
        self.session.set_volume(v);
    }

    pub fn toggle_mute(&mut self) {
        self.session.toggle_mute();
    }

    /// Put the share link for the selected track on the status line.
    pub fn share_link(&mut self) {
        let Some(id) = self.selected_track().map(|t| t.id.clone()) else {
            return;
        };
        self.status = Some(match self.share_base_url.as_deref() {
            Some(base) => share_url(base, &id),
            None => "no ui.share_base_url configured".to_string(),
        });
    }

    /// Drain media notifications. Called once per frame; a message set by
    /// the last user action stays until the next one.
    pub fn tick(&mut self) {
        if let Err(err) = self.session.poll() {
            self.status = Some(err.to_string());
        }

        let active = self.session.active_track_id();
        if active != self.last_active.as_deref() {
            self.follow_active();
        }
    }

    fn follow_active(&mut self) {
        let active = self.session.active_track_id().map(str::to_owned);
        if let Some(idx) = active.as_deref().and_then(|id| self.session.catalog().position(id)) {
            self.selected = idx;
        }
        self.last_active = active;
    }

    fn report(&mut self, result: Result<(), SessionError>) {
        match result {
            Ok(()) => {
                if self.session.snapshot().notice.is_none() {
                    self.status = None;
                }
            }
            Err(err) => self.status = Some(err.to_string()),
        }
    }
}
