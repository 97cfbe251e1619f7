//! Message codec error primitives.

use thiserror::Error;

/// Failures raised while encoding or decoding a message envelope.
#[derive(Debug, Error)]
pub enum MessageError {
    /// Raw slot contents were not a JSON object.
    #[error("malformed message: {0}")]
    Malformed(#[source] serde_json::Error),
    /// The envelope carried no `type` discriminator.
    #[error("message is missing its type")]
    MissingKind,
    /// The payload of a known kind did not match its expected shape.
    #[error("invalid payload for '{kind}' message")]
    InvalidPayload {
        /// Kind discriminator of the rejected message.
        kind: &'static str,
        /// Underlying deserialization failure.
        #[source]
        source: serde_json::Error,
    },
    /// The timestamp was absent or outside the representable range.
    #[error("invalid message timestamp")]
    InvalidTimestamp,
    /// Payload serialization failed while encoding.
    #[error("failed to encode '{kind}' message")]
    Encode {
        /// Kind discriminator of the message being encoded.
        kind: &'static str,
        /// Underlying serialization failure.
        #[source]
        source: serde_json::Error,
    },
}

impl MessageError {
    /// Kind discriminator associated with the failure, when one was known.
    #[must_use]
    pub const fn kind(&self) -> Option<&'static str> {
        match self {
            Self::InvalidPayload { kind, .. } | Self::Encode { kind, .. } => Some(kind),
            Self::Malformed(_) | Self::MissingKind | Self::InvalidTimestamp => None,
        }
    }
}

/// Result wrapper for codec operations.
pub type MessageResult<T> = Result<T, MessageError>;
