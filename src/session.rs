//! Playback session: which track owns the audio output, its transport state,
//! and the progress/seek projections over the active media element.
//!
//! One [`SessionManager`] serves both player shapes. The "now playing"
//! player binds a single shared element and auto-advances through the
//! catalog; the row list keeps one element per track and stops at the end
//! of each. Managers that share a [`LiveOutput`] never play at the same time.

mod error;
mod manager;
mod output;
mod progress;
mod registry;
mod seek;

pub use error::SessionError;
pub use manager::*;
pub use output::LiveOutput;
pub use progress::{Progress, completion_ratio, format_time};
pub use seek::{SeekOutcome, pointer_fraction, scrub_target, seek_target};


#[cfg(test)]
mod proptests;
