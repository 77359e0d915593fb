//! `rodio` implementation of the media primitive.
//!
//! Every element owns at most one paused-or-playing `Sink` connected to the
//! shared output stream's mixer. Notifications are synthesized when the
//! runtime drains events: metadata once per load, a time update while the
//! sink is running, and `Ended` once the sink runs dry.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

use lofty::prelude::AudioFile;
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};

use crate::catalog::{Locator, SourceResolver};

use super::types::{MediaBackend, MediaElement, MediaError, MediaEvent};

pub struct RodioBackend {
    stream: Rc<OutputStream>,
    resolver: Rc<SourceResolver>,
}

impl RodioBackend {
    /// Open the default output device.
    pub fn open(resolver: SourceResolver) -> Result<Self, MediaError> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| MediaError::Output(e.to_string()))?;
        // rodio logs to stderr when OutputStream is dropped, which would
        // scribble over the TUI.
        stream.log_on_drop(false);

        Ok(Self {
            stream: Rc::new(stream),
            resolver: Rc::new(resolver),
        })
    }
}

impl MediaBackend for RodioBackend {
    type Element = RodioElement;

    fn create_element(&mut self) -> RodioElement {
        RodioElement {
            stream: Rc::clone(&self.stream),
            resolver: Rc::clone(&self.resolver),
            path: None,
            locator: None,
            sink: None,
            base_offset: Duration::ZERO,
            duration: None,
            gain: 1.0,
            metadata_sent: false,
            ended_sent: false,
        }
    }
}

pub struct RodioElement {
    stream: Rc<OutputStream>,
    resolver: Rc<SourceResolver>,
    path: Option<PathBuf>,
    /// Raw locator of the loaded source, kept for error reporting.
    locator: Option<String>,
    sink: Option<Sink>,
    /// Offset the current sink started at when it had to be rebuilt to seek.
    base_offset: Duration,
    duration: Option<Duration>,
    gain: f32,
    metadata_sent: bool,
    ended_sent: bool,
}

/// Create a paused `Sink` for `path` that starts playback at `start_at`.
fn open_sink_at(
    stream: &OutputStream,
    path: &Path,
    start_at: Duration,
) -> Result<(Sink, Option<Duration>), MediaError> {
    let file = File::open(path).map_err(|source| MediaError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let decoder = Decoder::new(BufReader::new(file)).map_err(|e| MediaError::Decode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let total = decoder.total_duration();

    let sink = Sink::connect_new(stream.mixer());
    // `skip_duration` is the fallback seeking primitive; Duration::ZERO is fine.
    sink.append(decoder.skip_duration(start_at));
    sink.pause();
    Ok((sink, total))
}

/// Duration from the container tags when the decoder cannot tell.
fn probe_duration(path: &Path) -> Option<Duration> {
    lofty::read_from_path(path)
        .ok()
        .map(|tagged| tagged.properties().duration())
        .filter(|d| !d.is_zero())
}

impl RodioElement {
    fn ensure_sink(&mut self) -> Result<&Sink, MediaError> {
        if self.sink.is_none() {
            let Some(path) = self.path.clone() else {
                return Err(match &self.locator {
                    Some(locator) => MediaError::Unsupported(locator.clone()),
                    None => MediaError::NotLoaded,
                });
            };

            let (sink, total) = open_sink_at(&self.stream, &path, Duration::ZERO)?;
            sink.set_volume(self.gain);
            self.duration = total.or_else(|| probe_duration(&path));
            self.base_offset = Duration::ZERO;
            self.sink = Some(sink);
        }

        self.sink.as_ref().ok_or(MediaError::NotLoaded)
    }

    fn rebuild_at(&mut self, at: Duration) {
        let Some(path) = self.path.clone() else {
            return;
        };
        let was_playing = self.sink.as_ref().is_some_and(|s| !s.is_paused());

        match open_sink_at(&self.stream, &path, at) {
            Ok((sink, _)) => {
                if let Some(old) = self.sink.take() {
                    old.stop();
                }
                sink.set_volume(self.gain);
                if was_playing {
                    sink.play();
                }
                self.sink = Some(sink);
                self.base_offset = at;
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "failed to reopen source for seek");
            }
        }
    }
}

impl MediaElement for RodioElement {
    fn load(&mut self, source: &str) {
        self.release();

        self.locator = Some(source.to_string());
        match self.resolver.resolve(source) {
            Locator::File(path) => {
                self.path = Some(path);
                // Open eagerly so the duration is known before play, like a
                // preloaded audio element. Failures surface again on `play`.
                if let Err(err) = self.ensure_sink() {
                    tracing::debug!(source, %err, "source not ready at load");
                }
            }
            Locator::Remote(url) => {
                tracing::debug!(%url, "remote sources are not supported by the rodio backend");
            }
        }
    }

    fn play(&mut self) -> Result<(), MediaError> {
        let sink = self.ensure_sink()?;
        sink.play();
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(sink) = &self.sink {
            sink.pause();
        }
    }

    fn is_paused(&self) -> bool {
        self.sink.as_ref().is_none_or(|s| s.is_paused())
    }

    fn set_offset(&mut self, secs: f64) {
        let at = Duration::from_secs_f64(secs.max(0.0));
        self.ended_sent = false;

        let Some(sink) = &self.sink else {
            return;
        };
        if sink.empty() {
            self.rebuild_at(at);
            return;
        }
        match sink.try_seek(at) {
            Ok(()) => self.base_offset = Duration::ZERO,
            Err(err) => {
                tracing::debug!(%err, "sink cannot seek, rebuilding at offset");
                self.rebuild_at(at);
            }
        }
    }

    fn offset(&self) -> f64 {
        self.sink
            .as_ref()
            .map(|s| (self.base_offset + s.get_pos()).as_secs_f64())
            .unwrap_or(0.0)
    }

    fn duration(&self) -> Option<f64> {
        self.duration.map(|d| d.as_secs_f64())
    }

    fn set_gain(&mut self, gain: f32) {
        self.gain = gain;
        if let Some(sink) = &self.sink {
            sink.set_volume(gain);
        }
    }

    fn release(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        self.path = None;
        self.locator = None;
        self.duration = None;
        self.base_offset = Duration::ZERO;
        self.metadata_sent = false;
        self.ended_sent = false;
    }

    fn drain_events(&mut self) -> Vec<MediaEvent> {
        let mut events = Vec::new();
        let Some(sink) = &self.sink else {
            return events;
        };

        if !self.metadata_sent {
            if let Some(d) = self.duration {
                events.push(MediaEvent::LoadedMetadata(d.as_secs_f64()));
                self.metadata_sent = true;
            }
        }

        if !sink.is_paused() {
            if sink.empty() {
                if !self.ended_sent {
                    self.ended_sent = true;
                    events.push(MediaEvent::Ended);
                }
            } else {
                events.push(MediaEvent::TimeUpdate(self.offset()));
            }
        }

        events
    }
}

impl Drop for RodioElement {
    fn drop(&mut self) {
        self.release();
    }
}
