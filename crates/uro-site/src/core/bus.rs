//! Cross-tab and same-page message relay.
//!
//! # Design
//! - `send` writes the encoded envelope into one shared storage slot, which
//!   the browser relays to other tabs as a storage event, and mirrors it to
//!   the current page through the [`Transport`].
//! - Both delivery paths decode the same envelope; a message is applied
//!   once per page it reaches.
//! - View counters live in the shared storage, so only the in-page path
//!   counts a view. Storage events from other tabs leave them alone.
//! - Malformed slot contents are logged and dropped; they never mutate state.

use crate::core::error::SiteResult;
use crate::core::ports::{Clock, KeyValueStore, Renderer, Transport};
use crate::core::views::record_view;
use chrono::{DateTime, Utc};
use std::cell::RefCell;
use std::rc::Rc;
use uro_events::{Inbound, MessageEnvelope, MessageKind, SiteMessage, decode, encode};

/// Callback invoked with the terms of every delivered search.
pub type SearchHook = Rc<dyn Fn(&[String])>;

/// Storage keys the bus reads and writes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BusKeys {
    /// Shared relay slot.
    pub channel: String,
    /// Active theme.
    pub theme: String,
    /// View counter prefix.
    pub view_prefix: String,
}

/// Result of handling one inbound message.
#[derive(Debug, PartialEq, Eq)]
pub enum Delivery {
    /// Derived state was updated.
    Applied(MessageKind),
    /// Known kind whose payload carried nothing to act on.
    Ignored(MessageKind),
    /// Kind not understood by this build.
    Unknown(String),
    /// Slot contents could not be decoded.
    Dropped,
}

/// Path a message took to reach this page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Route {
    /// Sent by this page.
    InPage,
    /// Relayed from another tab through a storage event.
    OtherTab,
}

/// Typed publish/receive hub bound to the page's ports.
pub struct MessageBus {
    keys: BusKeys,
    store: Rc<dyn KeyValueStore>,
    transport: Rc<dyn Transport>,
    renderer: Rc<dyn Renderer>,
    clock: Rc<dyn Clock>,
    search_hooks: RefCell<Vec<SearchHook>>,
}

impl MessageBus {
    /// Bus writing to `keys` through the given ports.
    #[must_use]
    pub fn new(
        keys: BusKeys,
        store: Rc<dyn KeyValueStore>,
        transport: Rc<dyn Transport>,
        renderer: Rc<dyn Renderer>,
        clock: Rc<dyn Clock>,
    ) -> Self {
        Self {
            keys,
            store,
            transport,
            renderer,
            clock,
            search_hooks: RefCell::new(Vec::new()),
        }
    }

    /// Current time from the bus clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Register a callback for delivered `search-performed` messages.
    ///
    /// Hooks may register further hooks; those run from the next delivery.
    pub fn on_search(&self, hook: impl Fn(&[String]) + 'static) {
        self.search_hooks.borrow_mut().push(Rc::new(hook));
    }

    /// Publish `message` from `page` to other tabs and to this page.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails or the storage slot rejects the
    /// write. A failed in-page dispatch is logged and does not fail the send,
    /// since other tabs already received the message.
    pub fn send(&self, page: &str, message: SiteMessage) -> SiteResult<MessageEnvelope> {
        let envelope = MessageEnvelope::new(message, self.clock.now(), page);
        let raw = encode(&envelope)?;
        self.store.set(&self.keys.channel, &raw)?;
        if let Err(err) = self.transport.dispatch(&raw) {
            tracing::warn!(kind = %envelope.kind(), error = %err, "in-page message dispatch failed");
        }
        tracing::debug!(kind = %envelope.kind(), page, "message sent");
        Ok(envelope)
    }

    /// Handle a storage event; only writes to the relay slot are messages.
    ///
    /// Returns `None` for unrelated keys and for slot removals.
    pub fn on_storage_event(&self, key: Option<&str>, new_value: Option<&str>) -> Option<Delivery> {
        if key != Some(self.keys.channel.as_str()) {
            return None;
        }
        new_value.map(|raw| self.deliver(raw, Route::OtherTab))
    }

    /// Decode `raw` from the in-page message event and apply it.
    pub fn receive(&self, raw: &str) -> Delivery {
        self.deliver(raw, Route::InPage)
    }

    fn deliver(&self, raw: &str, route: Route) -> Delivery {
        match decode(raw) {
            Ok(Inbound::Known(envelope)) => self.apply(&envelope, route),
            Ok(Inbound::Unknown { kind, page }) => {
                tracing::info!(kind = %kind, page = ?page, "unrecognised message type ignored");
                Delivery::Unknown(kind)
            }
            Err(err) => {
                tracing::warn!(error = %err, "malformed message dropped");
                Delivery::Dropped
            }
        }
    }

    fn apply(&self, envelope: &MessageEnvelope, route: Route) -> Delivery {
        let kind = envelope.kind();
        tracing::debug!(kind = %kind, page = %envelope.page, route = ?route, "message received");
        let applied = match &envelope.message {
            SiteMessage::UserPreference(preference) => {
                preference.theme().is_some_and(|theme| self.apply_theme(theme))
            }
            SiteMessage::ContentViewed(view) => view
                .content_id
                .as_deref()
                .filter(|id| !id.is_empty())
                .is_some_and(|id| self.count_view(id, route)),
            SiteMessage::SearchPerformed(search) => self.relay_search(&search.terms),
        };
        if applied {
            Delivery::Applied(kind)
        } else {
            Delivery::Ignored(kind)
        }
    }

    /// Apply the theme saved by an earlier visit, if any.
    pub fn restore_theme(&self) -> Option<String> {
        let theme = self.store.get(&self.keys.theme).filter(|theme| !theme.is_empty())?;
        self.renderer.set_root_class(&theme);
        Some(theme)
    }

    fn apply_theme(&self, theme: &str) -> bool {
        self.renderer.set_root_class(theme);
        if let Err(err) = self.store.set(&self.keys.theme, theme) {
            tracing::warn!(error = %err, "theme not persisted");
        }
        true
    }

    fn count_view(&self, content_id: &str, route: Route) -> bool {
        if route == Route::OtherTab {
            tracing::debug!(content_id, "view already counted by the sending tab");
            return false;
        }
        match record_view(self.store.as_ref(), &self.keys.view_prefix, content_id) {
            Ok(count) => {
                tracing::debug!(content_id, count, "view recorded");
                true
            }
            Err(err) => {
                tracing::warn!(content_id, error = %err, "view not recorded");
                false
            }
        }
    }

    fn relay_search(&self, terms: &[String]) -> bool {
        if terms.is_empty() {
            return false;
        }
        tracing::info!(terms = ?terms, "search terms received");
        let hooks = self.search_hooks.borrow().clone();
        for hook in hooks {
            hook(terms);
        }
        true
    }
}
