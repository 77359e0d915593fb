//! Track catalog: the ordered, read-only list of playable tracks.
//!
//! A catalog comes either from a TOML catalog file (`[[tracks]]` tables) or
//! from scanning a directory of audio files. Its order defines the circular
//! next/previous adjacency used by the playback session.

mod load;
mod model;
mod scan;
mod source;

pub use load::open;
pub use model::*;
pub use source::{Locator, SourceResolver, share_url};
