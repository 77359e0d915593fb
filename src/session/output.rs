//! The single live audio output and its lease.

use std::cell::RefCell;
use std::rc::Rc;

pub(crate) type OwnerId = u64;

#[derive(Default)]
struct Lease {
    next_owner: OwnerId,
    holder: Option<OwnerId>,
    on_preempt: Option<Box<dyn FnOnce()>>,
}

/// Lease over the one audio output shared by every mounted player.
///
/// Acquiring the lease runs the previous holder's preempt hook (which pauses
/// its element) before the new holder starts. Clones share the same lease.
#[derive(Clone, Default)]
pub struct LiveOutput {
    inner: Rc<RefCell<Lease>>,
}

impl LiveOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn register(&self) -> OwnerId {
        let mut lease = self.inner.borrow_mut();
        lease.next_owner += 1;
        lease.next_owner
    }

    /// Take the output for `owner`. `on_preempt` runs when another owner
    /// takes it away.
    pub(crate) fn acquire(&self, owner: OwnerId, on_preempt: impl FnOnce() + 'static) {
        let previous = {
            let mut lease = self.inner.borrow_mut();
            let previous = lease.on_preempt.take();
            let same_owner = lease.holder == Some(owner);
            lease.holder = Some(owner);
            lease.on_preempt = Some(Box::new(on_preempt));
            if same_owner { None } else { previous }
        };

        // Run outside the borrow: the hook belongs to another manager.
        if let Some(preempt) = previous {
            tracing::debug!(owner, "live output preempted");
            preempt();
        }
    }

    pub(crate) fn release(&self, owner: OwnerId) {
        let mut lease = self.inner.borrow_mut();
        if lease.holder == Some(owner) {
            lease.holder = None;
            lease.on_preempt = None;
        }
    }

    pub(crate) fn holds(&self, owner: OwnerId) -> bool {
        self.inner.borrow().holder == Some(owner)
    }

    pub fn is_idle(&self) -> bool {
        self.inner.borrow().holder.is_none()
    }
}
