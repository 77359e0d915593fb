use thiserror::Error;

/// Recoverable session errors. None of these leave the session inconsistent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The id is not part of the catalog; session state is unchanged.
    #[error("unknown track {0:?}")]
    UnknownTrack(String),

    /// The media element declined to start; the track stays selected, paused.
    #[error("playback of {track_id:?} was rejected: {reason}")]
    PlaybackRejected { track_id: String, reason: String },
}
