//! Message payload types carried through the shared storage slot.

use crate::topics::MessageKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Preference change published by a page, as a key/value mapping.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserPreference {
    /// Raw preference entries; only `theme` is acted on by this build.
    pub values: Map<String, Value>,
}

impl UserPreference {
    /// Build a single-key preference payload.
    #[must_use]
    pub fn from_pair(key: &str, value: Value) -> Self {
        let mut values = Map::new();
        values.insert(key.to_string(), value);
        Self { values }
    }

    /// Theme class carried by the payload, when it is a non-empty string.
    #[must_use]
    pub fn theme(&self) -> Option<&str> {
        self.values
            .get("theme")
            .and_then(Value::as_str)
            .filter(|theme| !theme.is_empty())
    }
}

/// Content view notification used to maintain per-item view counters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentViewed {
    /// Identifier of the viewed item; messages without one are ignored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_id: Option<String>,
    /// Display title of the item.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Address of the page the item was viewed on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Search submission relayed so other tabs can react to the terms.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPerformed {
    /// Trimmed search terms.
    #[serde(default)]
    pub terms: Vec<String>,
    /// Submission time in epoch milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

/// Typed message variants; the variant decides the envelope `type`.
#[derive(Clone, Debug, PartialEq)]
pub enum SiteMessage {
    /// See [`UserPreference`].
    UserPreference(UserPreference),
    /// See [`ContentViewed`].
    ContentViewed(ContentViewed),
    /// See [`SearchPerformed`].
    SearchPerformed(SearchPerformed),
}

impl SiteMessage {
    /// Kind discriminator for this message.
    #[must_use]
    pub const fn kind(&self) -> MessageKind {
        match self {
            Self::UserPreference(_) => MessageKind::UserPreference,
            Self::ContentViewed(_) => MessageKind::ContentViewed,
            Self::SearchPerformed(_) => MessageKind::SearchPerformed,
        }
    }
}

/// Message tagged with its emission time and originating page key.
#[derive(Clone, Debug, PartialEq)]
pub struct MessageEnvelope {
    /// Typed payload.
    pub message: SiteMessage,
    /// Wall-clock emission time, millisecond precision on the wire.
    pub timestamp: DateTime<Utc>,
    /// Logical key of the page that sent the message (e.g. `index`).
    pub page: String,
}

impl MessageEnvelope {
    /// Wrap a message sent from `page` at `timestamp`.
    #[must_use]
    pub fn new(message: SiteMessage, timestamp: DateTime<Utc>, page: impl Into<String>) -> Self {
        Self {
            message,
            timestamp,
            page: page.into(),
        }
    }

    /// Kind discriminator of the wrapped message.
    #[must_use]
    pub const fn kind(&self) -> MessageKind {
        self.message.kind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn preference_from_theme_pair_exposes_theme() {
        let preference = UserPreference::from_pair("theme", json!("dark"));
        assert_eq!(preference.theme(), Some("dark"));
        assert_eq!(serde_json::to_value(&preference).unwrap(), json!({"theme": "dark"}));
    }

    #[test]
    fn non_string_or_empty_theme_is_ignored() {
        assert_eq!(UserPreference::from_pair("theme", json!(true)).theme(), None);
        assert_eq!(UserPreference::from_pair("theme", json!("")).theme(), None);
        assert_eq!(UserPreference::from_pair("fontSize", json!(18)).theme(), None);
    }

    #[test]
    fn content_viewed_uses_camel_case_keys() {
        let payload = ContentViewed {
            content_id: Some("artigo-12".into()),
            title: Some("Incontinência".into()),
            url: None,
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            value,
            json!({"contentId": "artigo-12", "title": "Incontinência"})
        );
    }
}
