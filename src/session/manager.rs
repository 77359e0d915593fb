//! Playback session manager.

use std::rc::Rc;

use crate::catalog::Catalog;
use crate::media::{MediaBackend, MediaElement, MediaEvent};

use super::error::SessionError;
use super::output::{LiveOutput, OwnerId};
use super::progress::Progress;
use super::registry::{HandleRegistry, Slot};
use super::seek::{SeekOutcome, scrub_target, seek_target};

/// What happens when the active track plays to its end.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EndedPolicy {
    /// Continue with the next catalog track (wrapping).
    Advance,
    /// Pause and rewind the finished track.
    Stop,
}

/// How many media elements the manager keeps.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum HandleMode {
    /// One element, rebound to whichever track is selected.
    Shared,
    /// One element per track, created on first use.
    PerTrack,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub ended_policy: EndedPolicy,
    pub handle_mode: HandleMode,
}

impl SessionConfig {
    /// Single player with a playlist: auto-advances.
    pub fn now_playing() -> Self {
        Self {
            ended_policy: EndedPolicy::Advance,
            handle_mode: HandleMode::Shared,
        }
    }

    /// Independently playable rows.
    pub fn rows() -> Self {
        Self {
            ended_policy: EndedPolicy::Stop,
            handle_mode: HandleMode::PerTrack,
        }
    }

    /// Dedicated single-track screen.
    pub fn single() -> Self {
        Self {
            ended_policy: EndedPolicy::Stop,
            handle_mode: HandleMode::Shared,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::now_playing()
    }
}

/// Read-only view of the session for renderers.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub active_track_id: Option<String>,
    pub is_playing: bool,
    pub elapsed: f64,
    pub total: Option<f64>,
    pub volume: f32,
    pub muted: bool,
    /// Non-fatal problem worth showing, e.g. a rejected play request.
    pub notice: Option<String>,
}

impl Snapshot {
    pub fn progress(&self) -> Progress {
        Progress {
            elapsed: self.elapsed,
            total: self.total,
        }
    }
}

/// A media notification tagged with the track and load it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub track_id: String,
    pub generation: u64,
    pub event: MediaEvent,
}

pub struct SessionManager<B: MediaBackend> {
    backend: B,
    catalog: Rc<Catalog>,
    config: SessionConfig,
    output: LiveOutput,
    owner: OwnerId,
    registry: HandleRegistry<B::Element>,
    active: Option<String>,
    playing: bool,
    volume: f32,
    muted: bool,
    notice: Option<String>,
    generation: u64,
}

impl<B: MediaBackend> SessionManager<B> {
    pub fn new(backend: B, catalog: Rc<Catalog>, config: SessionConfig, output: LiveOutput) -> Self {
        let owner = output.register();
        Self {
            backend,
            catalog,
            config,
            output,
            owner,
            registry: HandleRegistry::new(),
            active: None,
            playing: false,
            volume: 1.0,
            muted: false,
            notice: None,
            generation: 0,
        }
    }

    pub fn config(&self) -> SessionConfig {
        self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn active_track_id(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Playing and still holding the live output.
    pub fn is_playing(&self) -> bool {
        self.playing && self.output.holds(self.owner)
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn effective_gain(&self) -> f32 {
        if self.muted { 0.0 } else { self.volume }
    }

    /// Progress of the active track.
    pub fn progress(&self) -> Progress {
        self.active
            .as_deref()
            .map(|id| self.row_progress(id))
            .unwrap_or_default()
    }

    /// Last known progress of any track this manager has played.
    pub fn row_progress(&self, id: &str) -> Progress {
        self.registry
            .get(id)
            .map(|slot| slot.progress)
            .unwrap_or_default()
    }

    pub fn row_is_playing(&self, id: &str) -> bool {
        self.active.as_deref() == Some(id) && self.is_playing()
    }

    /// Generation of the most recent load. Notifications must carry it.
    pub fn current_generation(&self) -> u64 {
        self.generation
    }

    pub fn snapshot(&self) -> Snapshot {
        let progress = self.progress();
        Snapshot {
            active_track_id: self.active.clone(),
            is_playing: self.is_playing(),
            elapsed: progress.elapsed,
            total: progress.total,
            volume: self.volume,
            muted: self.muted,
            notice: self.notice.clone(),
        }
    }

    /// Make `id` the active track and start it from the beginning.
    pub fn select_track(&mut self, id: &str) -> Result<(), SessionError> {
        self.sync_lease();
        let Some(track) = self.catalog.get(id) else {
            tracing::warn!(track_id = id, "select of unknown track");
            return Err(SessionError::UnknownTrack(id.to_string()));
        };
        let source = track.source.clone();

        self.registry.pause_all_except(None);
        self.bind(id, &source);
        self.active = Some(id.to_string());
        tracing::debug!(track_id = id, generation = self.generation, "selected track");
        self.start_playback()
    }

    /// Flip between playing and paused. No-op without an active track.
    pub fn toggle_play_pause(&mut self) -> Result<(), SessionError> {
        self.sync_lease();
        if self.active.is_none() {
            return Ok(());
        }
        if self.playing {
            self.pause_active();
            Ok(())
        } else {
            self.start_playback()
        }
    }

    /// Row play button: toggles the active row, selects any other row.
    pub fn toggle_row(&mut self, id: &str) -> Result<(), SessionError> {
        if self.active.as_deref() == Some(id) {
            self.toggle_play_pause()
        } else {
            self.select_track(id)
        }
    }

    /// Select the following catalog track, wrapping to the first. Without an
    /// active track this starts the first track.
    pub fn next(&mut self) -> Result<(), SessionError> {
        let target = match self.active.as_deref() {
            Some(id) => self.catalog.next_id(id),
            None => self.catalog.first_id(),
        }
        .map(str::to_owned);

        match target {
            Some(id) => self.select_track(&id),
            None => Ok(()),
        }
    }

    /// Select the preceding catalog track, wrapping to the last. Without an
    /// active track this starts the last track.
    pub fn previous(&mut self) -> Result<(), SessionError> {
        let target = match self.active.as_deref() {
            Some(id) => self.catalog.prev_id(id),
            None => self.catalog.last_id(),
        }
        .map(str::to_owned);

        match target {
            Some(id) => self.select_track(&id),
            None => Ok(()),
        }
    }

    /// End-of-source policy for the active track.
    pub fn on_track_ended(&mut self) -> Result<(), SessionError> {
        match self.config.ended_policy {
            EndedPolicy::Advance => self.next(),
            EndedPolicy::Stop => {
                self.stop_and_rewind();
                Ok(())
            }
        }
    }

    /// Set the output level. Adjusting the level unmutes.
    pub fn set_volume(&mut self, volume: f32) {
        if volume.is_nan() {
            return;
        }
        self.volume = volume.clamp(0.0, 1.0);
        self.muted = false;
        self.registry.set_gain(self.effective_gain());
    }

    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
        self.registry.set_gain(self.effective_gain());
    }

    /// Seek the active track to `fraction` of its duration.
    pub fn seek(&mut self, fraction: f64) -> SeekOutcome {
        let Some(slot) = self.active_slot_mut() else {
            return SeekOutcome::NotReady;
        };
        match seek_target(fraction, slot.progress.total) {
            Some(target) => Self::apply_seek(slot, target),
            None => {
                tracing::trace!(fraction, "seek before duration is known");
                SeekOutcome::NotReady
            }
        }
    }

    /// Move the active track by `delta` seconds.
    pub fn seek_by(&mut self, delta: f64) -> SeekOutcome {
        let Some(slot) = self.active_slot_mut() else {
            return SeekOutcome::NotReady;
        };
        match scrub_target(slot.progress.elapsed, delta, slot.progress.total) {
            Some(target) => Self::apply_seek(slot, target),
            None => SeekOutcome::NotReady,
        }
    }

    /// Apply one notification. Notifications from a superseded track or load
    /// are dropped.
    pub fn handle_notification(&mut self, n: Notification) -> Result<(), SessionError> {
        self.sync_lease();

        let is_current = self.active.as_deref() == Some(n.track_id.as_str())
            && self
                .registry
                .get(&n.track_id)
                .is_some_and(|slot| slot.generation == n.generation);
        if !is_current {
            tracing::trace!(track_id = %n.track_id, generation = n.generation, event = ?n.event, "discarding stale notification");
            return Ok(());
        }

        match n.event {
            MediaEvent::TimeUpdate(offset) => {
                if let Some(slot) = self.registry.get_mut(&n.track_id) {
                    slot.progress.apply_time_update(offset);
                }
                Ok(())
            }
            MediaEvent::LoadedMetadata(duration) => {
                if let Some(slot) = self.registry.get_mut(&n.track_id) {
                    slot.progress.apply_metadata(duration);
                }
                Ok(())
            }
            MediaEvent::Ended => {
                tracing::debug!(track_id = %n.track_id, "track ended");
                self.on_track_ended()
            }
            MediaEvent::PlayRejected(reason) => Err(self.reject(&n.track_id, reason)),
        }
    }

    /// Drain pending notifications from every element and apply them.
    /// Returns the last error raised while applying them.
    pub fn poll(&mut self) -> Result<(), SessionError> {
        self.sync_lease();

        let mut pending = Vec::new();
        for (id, slot) in self.registry.iter() {
            for event in slot.element.borrow_mut().drain_events() {
                pending.push(Notification {
                    track_id: id.clone(),
                    generation: slot.generation,
                    event,
                });
            }
        }

        let mut result = Ok(());
        for n in pending {
            if let Err(err) = self.handle_notification(n) {
                result = Err(err);
            }
        }
        result
    }

    /// Release every element and the output lease.
    pub fn unmount(&mut self) {
        self.registry.detach_all();
        self.output.release(self.owner);
        self.active = None;
        self.playing = false;
        tracing::debug!(owner = self.owner, "session unmounted");
    }

    fn active_slot_mut(&mut self) -> Option<&mut Slot<B::Element>> {
        let id = self.active.as_deref()?;
        self.registry.get_mut(id)
    }

    fn apply_seek(slot: &mut Slot<B::Element>, target: f64) -> SeekOutcome {
        slot.element.borrow_mut().set_offset(target);
        // Optimistic; the next time update is authoritative.
        slot.progress.elapsed = target;
        SeekOutcome::Applied(target)
    }

    /// Load `source` into the element for `id`, releasing elements that must
    /// not outlive the switch.
    fn bind(&mut self, id: &str, source: &str) {
        if self.config.handle_mode == HandleMode::Shared {
            let stale: Vec<String> = self.registry.ids().filter(|k| *k != id).cloned().collect();
            for k in stale {
                self.registry.detach(&k);
            }
        }

        self.generation += 1;
        let generation = self.generation;
        let gain = self.effective_gain();
        let backend = &mut self.backend;
        let slot = self.registry.attach_with(id, || backend.create_element());
        slot.generation = generation;
        slot.progress.reset();

        let mut element = slot.element.borrow_mut();
        element.load(source);
        element.set_gain(gain);
    }

    /// Pause competitors, take the live output and play the active element.
    fn start_playback(&mut self) -> Result<(), SessionError> {
        let Some(id) = self.active.clone() else {
            return Ok(());
        };
        let Some(element) = self.registry.get(&id).map(|slot| Rc::clone(&slot.element)) else {
            return Ok(());
        };

        self.registry.pause_all_except(Some(&id));
        let preempted = Rc::clone(&element);
        self.output.acquire(self.owner, move || {
            if let Ok(mut element) = preempted.try_borrow_mut() {
                element.pause();
            }
        });
        self.playing = true;

        let result = element.borrow_mut().play();
        match result {
            Ok(()) => {
                self.notice = None;
                tracing::debug!(track_id = %id, "playing");
                Ok(())
            }
            Err(err) => Err(self.reject(&id, err.to_string())),
        }
    }

    fn pause_active(&mut self) {
        if let Some(slot) = self.active_slot_mut() {
            slot.element.borrow_mut().pause();
        }
        self.playing = false;
        self.output.release(self.owner);
        tracing::debug!(track_id = ?self.active, "paused");
    }

    fn stop_and_rewind(&mut self) {
        if let Some(slot) = self.active_slot_mut() {
            let mut element = slot.element.borrow_mut();
            element.pause();
            element.set_offset(0.0);
            drop(element);
            slot.progress.elapsed = 0.0;
        }
        self.playing = false;
        self.output.release(self.owner);
        tracing::debug!(track_id = ?self.active, "stopped at end of track");
    }

    /// Roll back the optimistic play state.
    fn reject(&mut self, id: &str, reason: String) -> SessionError {
        tracing::warn!(track_id = id, %reason, "playback rejected");
        if let Some(slot) = self.registry.get(id) {
            slot.element.borrow_mut().pause();
        }
        self.playing = false;
        self.output.release(self.owner);

        let err = SessionError::PlaybackRejected {
            track_id: id.to_string(),
            reason,
        };
        self.notice = Some(err.to_string());
        err
    }

    /// Notice when another manager took the live output away.
    fn sync_lease(&mut self) {
        if self.playing && !self.output.holds(self.owner) {
            tracing::debug!(owner = self.owner, "lost live output to another player");
            self.playing = false;
        }
    }
}

impl<B: MediaBackend> Drop for SessionManager<B> {
    fn drop(&mut self) {
        self.unmount();
    }
}
