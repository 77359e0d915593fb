//! Track id -> media handle registry.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::media::MediaElement;

use super::progress::Progress;

/// A media element bound to one track.
pub(crate) struct Slot<E> {
    pub element: Rc<RefCell<E>>,
    /// Load generation the element's notifications belong to.
    pub generation: u64,
    pub progress: Progress,
}

pub(crate) struct HandleRegistry<E> {
    slots: HashMap<String, Slot<E>>,
}

impl<E: MediaElement> HandleRegistry<E> {
    pub fn new() -> Self {
        Self {
            slots: HashMap::new(),
        }
    }

    /// Slot for `track_id`, attaching a new element from `create` if the
    /// track has none yet.
    pub fn attach_with(&mut self, track_id: &str, create: impl FnOnce() -> E) -> &mut Slot<E> {
        self.slots.entry(track_id.to_string()).or_insert_with(|| {
            tracing::debug!(track_id, "attached media handle");
            Slot {
                element: Rc::new(RefCell::new(create())),
                generation: 0,
                progress: Progress::default(),
            }
        })
    }

    /// Release and forget the element bound to `track_id`.
    pub fn detach(&mut self, track_id: &str) -> bool {
        match self.slots.remove(track_id) {
            Some(slot) => {
                slot.element.borrow_mut().release();
                tracing::debug!(track_id, "detached media handle");
                true
            }
            None => false,
        }
    }

    pub fn detach_all(&mut self) {
        let ids: Vec<String> = self.slots.keys().cloned().collect();
        for id in ids {
            self.detach(&id);
        }
    }

    pub fn get(&self, track_id: &str) -> Option<&Slot<E>> {
        self.slots.get(track_id)
    }

    pub fn get_mut(&mut self, track_id: &str) -> Option<&mut Slot<E>> {
        self.slots.get_mut(track_id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &String> {
        self.slots.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Slot<E>)> {
        self.slots.iter()
    }

    /// Pause every element except the one bound to `keep`.
    pub fn pause_all_except(&self, keep: Option<&str>) {
        for (id, slot) in &self.slots {
            if Some(id.as_str()) == keep {
                continue;
            }
            let mut element = slot.element.borrow_mut();
            if !element.is_paused() {
                element.pause();
                tracing::debug!(track_id = %id, "paused competing source");
            }
        }
    }

    pub fn set_gain(&self, gain: f32) {
        for slot in self.slots.values() {
            slot.element.borrow_mut().set_gain(gain);
        }
    }
}
