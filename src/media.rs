//! Platform media primitive.
//!
//! The session manager drives playback through the [`MediaElement`] trait:
//! a loadable, playable source with an offset clock and a queue of
//! notifications (time updates, metadata, end of stream, late rejections).
//! `rodio` provides the real implementation.

mod rodio_backend;
mod types;

#[cfg(test)]
pub(crate) mod fake;

pub use rodio_backend::{RodioBackend, RodioElement};
pub use types::*;
