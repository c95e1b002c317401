//! Codec errors.

use thiserror::Error;

/// Errors produced while encoding or decoding wire messages.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The payload was not valid JSON or did not match any known message
    /// shape (including unknown component kinds and property value forms).
    #[error("malformed protocol message: {0}")]
    Decode(#[source] serde_json::Error),

    /// A message carried an unrecognized `type` tag.
    #[error("unknown message type: {tag}")]
    UnknownType {
        /// The unrecognized tag.
        tag: String,
    },

    /// The payload had no `type` tag at all.
    #[error("protocol message missing 'type' field")]
    MissingType,

    /// Serialization failed (non-string map keys and the like).
    #[error("failed to encode protocol message: {0}")]
    Encode(#[source] serde_json::Error),
}
