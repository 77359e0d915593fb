//! Media element trait, notification and error types.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("no audio output device: {0}")]
    Output(String),
    #[error("unsupported source locator: {0}")]
    Unsupported(String),
    #[error("failed to open {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {path:?}: {reason}")]
    Decode { path: PathBuf, reason: String },
    #[error("no source loaded")]
    NotLoaded,
}

/// Notification emitted by a media element, in emission order.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    /// Current playback offset in seconds.
    TimeUpdate(f64),
    /// Duration in seconds became known.
    LoadedMetadata(f64),
    /// Playback reached the end of the source.
    Ended,
    /// A play request was declined after the fact.
    PlayRejected(String),
}

/// One playable audio source.
pub trait MediaElement {
    /// Bind `source`, dropping whatever was loaded before. Resets the offset.
    fn load(&mut self, source: &str);
    fn play(&mut self) -> Result<(), MediaError>;
    fn pause(&mut self);
    fn is_paused(&self) -> bool;
    fn set_offset(&mut self, secs: f64);
    fn offset(&self) -> f64;
    fn duration(&self) -> Option<f64>;
    fn set_gain(&mut self, gain: f32);
    /// Stop playback and free the underlying platform resource.
    fn release(&mut self);
    fn drain_events(&mut self) -> Vec<MediaEvent>;
}

/// Factory for media elements sharing one audio output.
pub trait MediaBackend {
    type Element: MediaElement + 'static;

    fn create_element(&mut self) -> Self::Element;
}
