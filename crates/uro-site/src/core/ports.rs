//! Seams between the DOM-free core and the browser.
//!
//! # Design
//! - The core only talks to the page through these traits, so message
//!   handling, navigation resolution, and fragment injection run under
//!   `cargo test` with in-memory doubles.
//! - Every method takes `&self`; browser handles are cheap to share and the
//!   in-memory doubles use interior mutability.

use crate::core::error::{SiteError, SiteResult};
use crate::core::nav::NavGroup;
use chrono::{DateTime, Utc};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::future::Future;

/// Navigation link as seen by the highlighter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavLink {
    /// Position of the link within its group, in document order.
    pub index: usize,
    /// Raw `href` attribute, when present.
    pub href: Option<String>,
}

/// Thin rendering adapter over the page DOM.
pub trait Renderer {
    /// Whether an element with `id` exists.
    fn has_element(&self, id: &str) -> bool;

    /// Replace the whole content of the element with `id`.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::MissingElement`] when the element is absent.
    fn replace_content(&self, id: &str, markup: &str) -> SiteResult<()>;

    /// Replace the class attribute of the root element.
    fn set_root_class(&self, class: &str);

    /// Links belonging to a navigation group, in document order.
    fn nav_links(&self, group: NavGroup) -> Vec<NavLink>;

    /// Add and remove classes on one link of a navigation group.
    fn update_link_classes(&self, group: NavGroup, index: usize, add: &[&str], remove: &[&str]);

    /// Send the browser to `url`.
    fn navigate(&self, url: &str);
}

/// String key/value store with local-storage semantics.
pub trait KeyValueStore {
    /// Read the raw value stored under `key`.
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, overwriting any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Storage`] when the backend rejects the write.
    fn set(&self, key: &str, value: &str) -> SiteResult<()>;
}

/// Same-page delivery of an encoded message.
pub trait Transport {
    /// Deliver `raw` to listeners on the current page.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Dispatch`] when the event cannot be raised.
    fn dispatch(&self, raw: &str) -> SiteResult<()>;
}

/// Wall-clock source for message timestamps.
pub trait Clock {
    /// Current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Source of fragment markup.
pub trait FragmentSource {
    /// Fetch the body at `path`.
    ///
    /// Implementations report non-success statuses as
    /// [`SiteError::FetchStatus`] and transport failures as
    /// [`SiteError::Network`].
    fn fetch(&self, path: &str) -> impl Future<Output = SiteResult<String>>;
}

/// In-memory store used when the browser denies local storage, and in tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<BTreeMap<String, String>>,
}

impl MemoryStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Whether the store holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> SiteResult<()> {
        if key.is_empty() {
            return Err(SiteError::Storage {
                key: String::new(),
                message: "empty key".into(),
            });
        }
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
