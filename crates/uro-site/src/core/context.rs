//! Explicitly constructed per-page site context.
//!
//! # Design
//! - Built once on page-ready and cloned into every event handler; there is
//!   no module-level singleton.
//! - Exposes the page-level API (`track_content_view`, `set_user_preference`,
//!   `view_count`) plus the operations the DOM wiring needs.

use crate::core::bus::{BusKeys, MessageBus};
use crate::core::config::SiteConfig;
use crate::core::error::SiteResult;
use crate::core::fragments::{ComponentLoader, FragmentOutcome};
use crate::core::nav::{highlight, page_file, resolve_page};
use crate::core::ports::{Clock, FragmentSource, KeyValueStore, Renderer, Transport};
use crate::core::search::{normalize_term, results_url};
use crate::core::views::view_count;
use serde_json::Value;
use std::rc::Rc;
use uro_events::{ContentViewed, MessageEnvelope, SearchPerformed, SiteMessage, UserPreference};

/// Browser (or test) bindings the context runs against.
pub struct SitePorts {
    /// DOM adapter.
    pub renderer: Rc<dyn Renderer>,
    /// Local storage.
    pub store: Rc<dyn KeyValueStore>,
    /// In-page event dispatch.
    pub transport: Rc<dyn Transport>,
    /// Wall clock.
    pub clock: Rc<dyn Clock>,
}

/// Shared handle to everything a page needs.
#[derive(Clone)]
pub struct SiteContext {
    config: Rc<SiteConfig>,
    page: Rc<str>,
    renderer: Rc<dyn Renderer>,
    store: Rc<dyn KeyValueStore>,
    bus: Rc<MessageBus>,
    loader: Rc<ComponentLoader>,
}

impl SiteContext {
    /// Build the context for the page at `pathname`.
    #[must_use]
    pub fn new(config: SiteConfig, pathname: &str, ports: SitePorts) -> Self {
        let page: Rc<str> = resolve_page(page_file(pathname), &config.pages).into();
        let bus = MessageBus::new(
            BusKeys {
                channel: config.channel_key.clone(),
                theme: config.theme_key.clone(),
                view_prefix: config.view_key_prefix.clone(),
            },
            ports.store.clone(),
            ports.transport,
            ports.renderer.clone(),
            ports.clock,
        );
        Self {
            config: Rc::new(config),
            page,
            renderer: ports.renderer,
            store: ports.store,
            bus: Rc::new(bus),
            loader: Rc::new(ComponentLoader::new()),
        }
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Logical key of the current page.
    #[must_use]
    pub fn page(&self) -> &str {
        &self.page
    }

    /// Message bus bound to this page.
    #[must_use]
    pub fn bus(&self) -> &MessageBus {
        &self.bus
    }

    /// Fragment loader and its cache.
    #[must_use]
    pub fn loader(&self) -> &ComponentLoader {
        &self.loader
    }

    /// Fill every configured fragment container.
    pub async fn load_fragments<S: FragmentSource>(&self, source: &S) -> Vec<FragmentOutcome> {
        let descriptors = self.config.fragment_descriptors();
        self.loader
            .load_all(source, self.renderer.as_ref(), &descriptors)
            .await
    }

    /// Mark the current page in both navigation groups.
    pub fn highlight_navigation(&self) -> usize {
        highlight(self.renderer.as_ref(), &self.page)
    }

    /// Publish a message from the current page.
    ///
    /// # Errors
    ///
    /// Propagates encoding and storage failures from [`MessageBus::send`].
    pub fn send(&self, message: SiteMessage) -> SiteResult<MessageEnvelope> {
        self.bus.send(&self.page, message)
    }

    /// Announce that `content_id` was viewed at `url`.
    ///
    /// # Errors
    ///
    /// See [`SiteContext::send`].
    pub fn track_content_view(
        &self,
        content_id: &str,
        title: Option<&str>,
        url: Option<&str>,
    ) -> SiteResult<MessageEnvelope> {
        self.send(SiteMessage::ContentViewed(ContentViewed {
            content_id: Some(content_id.to_string()),
            title: title.map(str::to_string),
            url: url.map(str::to_string),
        }))
    }

    /// Announce a single preference change.
    ///
    /// # Errors
    ///
    /// See [`SiteContext::send`].
    pub fn set_user_preference(&self, key: &str, value: Value) -> SiteResult<MessageEnvelope> {
        self.send(SiteMessage::UserPreference(UserPreference::from_pair(
            key, value,
        )))
    }

    /// Stored view count for `content_id`.
    #[must_use]
    pub fn view_count(&self, content_id: &str) -> u64 {
        view_count(
            self.store.as_ref(),
            &self.config.view_key_prefix,
            content_id,
        )
    }

    /// Submit the search box contents.
    ///
    /// Whitespace-only input does nothing and returns `None`; otherwise one
    /// `search-performed` message is sent and the browser is sent to the
    /// results page, whose address is returned.
    pub fn submit_search(&self, raw: &str) -> Option<String> {
        let term = normalize_term(raw)?;
        let message = SiteMessage::SearchPerformed(SearchPerformed {
            terms: vec![term.to_string()],
            timestamp: Some(self.bus.now().timestamp_millis()),
        });
        if let Err(err) = self.send(message) {
            tracing::warn!(error = %err, "search message not sent");
        }
        let url = results_url(&self.config.search_page, term);
        self.renderer.navigate(&url);
        Some(url)
    }
}
