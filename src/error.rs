use thiserror::Error;

use crate::document::EmojiId;

/// Errors raised by document mutations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DocumentError {
    /// No emoji with this id exists in the document
    #[error("no emoji with id {0}")]
    UnknownEmoji(EmojiId),
    /// The serialized document could not be decoded
    #[error("malformed document: {0}")]
    Malformed(String),
}

/// The kinds of gesture tracked by the gesture combinator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    Drag,
    Magnify,
}

impl std::fmt::Display for GestureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Drag => write!(f, "drag"),
            Self::Magnify => write!(f, "magnify"),
        }
    }
}

/// Errors that can occur during gesture state transitions
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GestureError {
    /// A gesture of this kind is already in flight
    #[error("a {0} gesture is already active")]
    AlreadyActive(GestureKind),
    /// No gesture of this kind is in flight
    #[error("no {0} gesture is active")]
    NotActive(GestureKind),
    /// The zoom factor would make the transform non-invertible
    #[error("zoom factor {0} must be finite and positive")]
    InvalidZoom(f32),
}
