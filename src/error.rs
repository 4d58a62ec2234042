//! Error taxonomy for the clip core.
//!
//! None of these are fatal to a host. Validation and network failures are shown
//! as transient messages, decode failures leave the source with a zero duration,
//! and playback errors are reported back to the caller that asked for the action.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClipError {
    /// Input rejected before anything was mutated
    #[error("{0}")]
    Validation(String),

    /// Audio could not be decoded far enough to know its duration
    #[error("Could not decode audio: {0}")]
    Decode(String),

    /// The upload boundary reported a failure
    #[error("Upload failed: {0}")]
    Network(String),

    /// The shared playback resource refused an operation
    #[error("Playback error: {0}")]
    Playback(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClipError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn playback(msg: impl Into<String>) -> Self {
        Self::Playback(msg.into())
    }

    /// Whether this error should be shown as a transient inline message
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Network(_))
    }
}

pub type Result<T> = std::result::Result<T, ClipError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(ClipError::validation("missing title").is_transient());
        assert!(ClipError::Network("timeout".into()).is_transient());
        assert!(!ClipError::Decode("bad header".into()).is_transient());
        assert!(!ClipError::playback("no source").is_transient());
    }

    #[test]
    fn test_display_messages() {
        let err = ClipError::Decode("truncated".to_string());
        assert_eq!(err.to_string(), "Could not decode audio: truncated");

        let err = ClipError::validation("Title is required");
        assert_eq!(err.to_string(), "Title is required");
    }
}
