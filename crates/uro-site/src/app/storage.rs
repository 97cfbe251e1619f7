//! Browser bindings for storage, in-page dispatch, and time.

use crate::core::error::{SiteError, SiteResult};
use crate::core::ports::{Clock, KeyValueStore, Transport};
use chrono::{DateTime, Utc};
use gloo::utils::window;
use js_sys::{Date, JSON};
use wasm_bindgen::JsValue;
use web_sys::{CustomEvent, CustomEventInit, Storage};

/// `window.localStorage`, storing raw strings so legacy scripts on other
/// pages read the same values.
pub(crate) struct BrowserStore {
    storage: Storage,
}

impl BrowserStore {
    /// Local storage handle, or `None` when the browser denies access.
    pub(crate) fn open() -> Option<Self> {
        window()
            .local_storage()
            .ok()
            .flatten()
            .map(|storage| Self { storage })
    }
}

impl KeyValueStore for BrowserStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> SiteResult<()> {
        self.storage
            .set_item(key, value)
            .map_err(|err| SiteError::Storage {
                key: key.to_string(),
                message: js_message(&err),
            })
    }
}

/// Raises the in-page message event on `window`, with the envelope object as
/// the event detail.
pub(crate) struct EventTransport {
    event: String,
}

impl EventTransport {
    pub(crate) fn new(event: impl Into<String>) -> Self {
        Self {
            event: event.into(),
        }
    }
}

impl Transport for EventTransport {
    fn dispatch(&self, raw: &str) -> SiteResult<()> {
        let failed = |err: JsValue| SiteError::Dispatch {
            event: self.event.clone(),
            message: js_message(&err),
        };
        let detail = JSON::parse(raw).map_err(failed)?;
        let init = CustomEventInit::new();
        init.set_detail(&detail);
        let event = CustomEvent::new_with_event_init_dict(&self.event, &init).map_err(failed)?;
        window().dispatch_event(&event).map_err(failed)?;
        Ok(())
    }
}

/// `Date.now()` clock.
pub(crate) struct BrowserClock;

impl Clock for BrowserClock {
    #[allow(clippy::cast_possible_truncation)]
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(Date::now() as i64).unwrap_or_default()
    }
}

/// Text form of a thrown JS value.
pub(crate) fn js_message(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}
