use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// A single catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Track {
    pub id: String,
    pub title: String,
    pub artist: String,
    /// URL or path resolvable to playable audio bytes.
    #[serde(rename = "src", alias = "source")]
    pub source: String,
    #[serde(default)]
    pub cover: Option<String>,
    /// Human readable duration shown before playback metadata is known.
    #[serde(default, rename = "duration")]
    pub display_duration: Option<String>,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid catalog file: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("duplicate track id {0:?}")]
    DuplicateId(String),
    #[error("track at position {0} has an empty id")]
    EmptyId(usize),
}

/// Ordered tracks with unique ids.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    tracks: Vec<Track>,
    base_dir: Option<PathBuf>,
}

impl Catalog {
    /// Build a catalog, rejecting empty or duplicate ids.
    pub fn new(tracks: Vec<Track>) -> Result<Self, CatalogError> {
        let mut seen: HashSet<&str> = HashSet::with_capacity(tracks.len());
        for (pos, track) in tracks.iter().enumerate() {
            if track.id.trim().is_empty() {
                return Err(CatalogError::EmptyId(pos));
            }
            if !seen.insert(track.id.as_str()) {
                return Err(CatalogError::DuplicateId(track.id.clone()));
            }
        }

        Ok(Self {
            tracks,
            base_dir: None,
        })
    }

    /// Directory that relative source locators are resolved against.
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    pub fn base_dir(&self) -> Option<&Path> {
        self.base_dir.as_deref()
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.tracks.iter().position(|t| t.id == id)
    }

    pub fn first_id(&self) -> Option<&str> {
        self.tracks.first().map(|t| t.id.as_str())
    }

    pub fn last_id(&self) -> Option<&str> {
        self.tracks.last().map(|t| t.id.as_str())
    }

    /// Id after `id`, wrapping from the last track to the first.
    pub fn next_id(&self, id: &str) -> Option<&str> {
        let pos = self.position(id)?;
        let next = (pos + 1) % self.tracks.len();
        Some(self.tracks[next].id.as_str())
    }

    /// Id before `id`, wrapping from the first track to the last.
    pub fn prev_id(&self, id: &str) -> Option<&str> {
        let pos = self.position(id)?;
        let prev = (pos + self.tracks.len() - 1) % self.tracks.len();
        Some(self.tracks[prev].id.as_str())
    }
}
