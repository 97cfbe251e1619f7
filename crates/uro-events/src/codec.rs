//! JSON codec for the shared storage slot and in-page event detail.

use crate::error::{MessageError, MessageResult};
use crate::payloads::{MessageEnvelope, SiteMessage};
use crate::topics::MessageKind;
use chrono::DateTime;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Decoded slot contents.
#[derive(Clone, Debug, PartialEq)]
pub enum Inbound {
    /// A message of a kind this build understands.
    Known(MessageEnvelope),
    /// A well-formed envelope whose kind is not recognised.
    Unknown {
        /// Raw discriminator as published.
        kind: String,
        /// Originating page key, when present.
        page: Option<String>,
    },
}

#[derive(Serialize, Deserialize)]
struct WireEnvelope {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
    #[serde(default)]
    data: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timestamp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    page: Option<String>,
}

/// Encode an envelope into its wire JSON.
///
/// # Errors
///
/// Returns [`MessageError::Encode`] if the payload cannot be serialized.
pub fn encode(envelope: &MessageEnvelope) -> MessageResult<String> {
    let kind = envelope.kind().as_str();
    let data = match &envelope.message {
        SiteMessage::UserPreference(payload) => serde_json::to_value(payload),
        SiteMessage::ContentViewed(payload) => serde_json::to_value(payload),
        SiteMessage::SearchPerformed(payload) => serde_json::to_value(payload),
    }
    .map_err(|source| MessageError::Encode { kind, source })?;

    let wire = WireEnvelope {
        kind: Some(kind.to_string()),
        data,
        timestamp: Some(envelope.timestamp.timestamp_millis()),
        page: Some(envelope.page.clone()),
    };
    serde_json::to_string(&wire).map_err(|source| MessageError::Encode { kind, source })
}

/// Decode raw slot contents.
///
/// # Errors
///
/// Returns an error when the text is not an envelope object, carries no
/// `type`, or a known kind has a payload or timestamp of the wrong shape.
/// Unknown kinds are not errors; they decode into [`Inbound::Unknown`].
pub fn decode(raw: &str) -> MessageResult<Inbound> {
    let wire: WireEnvelope = serde_json::from_str(raw).map_err(MessageError::Malformed)?;
    let kind_label = wire.kind.ok_or(MessageError::MissingKind)?;
    let Some(kind) = MessageKind::parse(&kind_label) else {
        return Ok(Inbound::Unknown {
            kind: kind_label,
            page: wire.page,
        });
    };

    let message = match kind {
        MessageKind::UserPreference => SiteMessage::UserPreference(payload(kind, wire.data)?),
        MessageKind::ContentViewed => SiteMessage::ContentViewed(payload(kind, wire.data)?),
        MessageKind::SearchPerformed => SiteMessage::SearchPerformed(payload(kind, wire.data)?),
    };
    let timestamp = wire
        .timestamp
        .and_then(DateTime::from_timestamp_millis)
        .ok_or(MessageError::InvalidTimestamp)?;

    Ok(Inbound::Known(MessageEnvelope {
        message,
        timestamp,
        page: wire.page.unwrap_or_default(),
    }))
}

fn payload<T: DeserializeOwned>(kind: MessageKind, data: Value) -> MessageResult<T> {
    // Pages built against older scripts may publish `data: null`.
    let data = if data.is_null() {
        Value::Object(serde_json::Map::new())
    } else {
        data
    };
    serde_json::from_value(data).map_err(|source| MessageError::InvalidPayload {
        kind: kind.as_str(),
        source,
    })
}
