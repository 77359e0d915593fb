//! Scripted in-memory media backend for tests.
//!
//! Every element shares its state with the backend so tests can inspect
//! play/pause calls and inject notifications after the fact.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use super::types::{MediaBackend, MediaElement, MediaError, MediaEvent};

#[derive(Debug)]
pub(crate) struct FakeState {
    pub loaded: Option<String>,
    pub playing: bool,
    pub offset: f64,
    pub duration: Option<f64>,
    pub gain: f32,
    pub loads: usize,
    pub released: bool,
    pub events: Vec<MediaEvent>,
}

impl Default for FakeState {
    fn default() -> Self {
        Self {
            loaded: None,
            playing: false,
            offset: 0.0,
            duration: None,
            gain: 1.0,
            loads: 0,
            released: false,
            events: Vec::new(),
        }
    }
}

#[derive(Clone, Default)]
pub(crate) struct FakeBackend {
    elements: Rc<RefCell<Vec<Rc<RefCell<FakeState>>>>>,
    rejected: Rc<RefCell<HashSet<String>>>,
}

impl FakeBackend {
    /// Make `play` fail for `source`.
    pub fn reject(&self, source: &str) {
        self.rejected.borrow_mut().insert(source.to_string());
    }

    pub fn accept(&self, source: &str) {
        self.rejected.borrow_mut().remove(source);
    }

    pub fn created(&self) -> usize {
        self.elements.borrow().len()
    }

    /// State of the live (not released) element currently bound to `source`.
    pub fn element(&self, source: &str) -> Option<Rc<RefCell<FakeState>>> {
        self.elements
            .borrow()
            .iter()
            .rev()
            .find(|e| {
                let e = e.borrow();
                !e.released && e.loaded.as_deref() == Some(source)
            })
            .cloned()
    }

    /// Sources whose element is currently playing.
    pub fn playing_sources(&self) -> Vec<String> {
        self.elements
            .borrow()
            .iter()
            .filter_map(|e| {
                let e = e.borrow();
                (e.playing && !e.released).then(|| e.loaded.clone().unwrap_or_default())
            })
            .collect()
    }

    pub fn push_event(&self, source: &str, event: MediaEvent) {
        if let Some(e) = self.element(source) {
            e.borrow_mut().events.push(event);
        }
    }

    pub fn released_count(&self) -> usize {
        self.elements
            .borrow()
            .iter()
            .filter(|e| e.borrow().released)
            .count()
    }
}

impl MediaBackend for FakeBackend {
    type Element = FakeElement;

    fn create_element(&mut self) -> FakeElement {
        let state = Rc::new(RefCell::new(FakeState::default()));
        self.elements.borrow_mut().push(Rc::clone(&state));
        FakeElement {
            state,
            rejected: Rc::clone(&self.rejected),
        }
    }
}

pub(crate) struct FakeElement {
    state: Rc<RefCell<FakeState>>,
    rejected: Rc<RefCell<HashSet<String>>>,
}

impl MediaElement for FakeElement {
    fn load(&mut self, source: &str) {
        let mut s = self.state.borrow_mut();
        s.loaded = Some(source.to_string());
        s.playing = false;
        s.offset = 0.0;
        s.duration = None;
        s.released = false;
        s.events.clear();
        s.loads += 1;
    }

    fn play(&mut self) -> Result<(), MediaError> {
        let mut s = self.state.borrow_mut();
        let Some(source) = s.loaded.clone() else {
            return Err(MediaError::NotLoaded);
        };
        if self.rejected.borrow().contains(&source) {
            s.playing = false;
            return Err(MediaError::Unsupported(source));
        }
        s.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        self.state.borrow_mut().playing = false;
    }

    fn is_paused(&self) -> bool {
        !self.state.borrow().playing
    }

    fn set_offset(&mut self, secs: f64) {
        self.state.borrow_mut().offset = secs;
    }

    fn offset(&self) -> f64 {
        self.state.borrow().offset
    }

    fn duration(&self) -> Option<f64> {
        self.state.borrow().duration
    }

    fn set_gain(&mut self, gain: f32) {
        self.state.borrow_mut().gain = gain;
    }

    fn release(&mut self) {
        let mut s = self.state.borrow_mut();
        s.playing = false;
        s.released = true;
        s.events.clear();
    }

    fn drain_events(&mut self) -> Vec<MediaEvent> {
        std::mem::take(&mut self.state.borrow_mut().events)
    }
}
