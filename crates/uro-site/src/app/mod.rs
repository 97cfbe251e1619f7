//! Browser entry point: builds the site context and wires the page.
//!
//! # Design
//! - Start on `DOMContentLoaded`, or immediately when the document is
//!   already parsed.
//! - Fragments load concurrently; header-dependent wiring (navigation,
//!   menu, search) runs once every fragment has settled.

use crate::core::config::{CONFIG_ELEMENT_ID, SiteConfig};
use crate::core::context::{SiteContext, SitePorts};
use crate::core::error::SiteError;
use crate::core::fragments::FragmentOutcome;
use crate::core::ports::{KeyValueStore, MemoryStore};
use fetch::HttpFragments;
use gloo::events::EventListener;
use gloo::utils::{document, window};
use logging::init_logging;
use std::rc::Rc;
use storage::{BrowserClock, BrowserStore, EventTransport};
use wasm_bindgen_futures::spawn_local;
use wiring::{listen_for_connectivity, listen_for_messages, wire_mobile_menu, wire_search};

mod dom;
mod fetch;
mod logging;
mod storage;
mod utils;
mod wiring;

/// Start the site runtime for the current page.
pub fn run_site() {
    console_error_panic_hook::set_once();
    if document().ready_state() == "loading" {
        EventListener::once(&document(), "DOMContentLoaded", |_| start()).forget();
    } else {
        start();
    }
}

fn start() {
    let (config, config_error) = load_config();
    init_logging(config.log_filter());
    tracing::info!("starting site runtime");
    if let Some(err) = config_error {
        tracing::warn!(error = %err, "configuration overrides ignored");
    }

    let pathname = window().location().pathname().unwrap_or_default();
    let ports = SitePorts {
        renderer: Rc::new(dom::DomRenderer),
        store: open_store(),
        transport: Rc::new(EventTransport::new(config.message_event.clone())),
        clock: Rc::new(BrowserClock),
    };
    let ctx = SiteContext::new(config, &pathname, ports);

    if let Some(theme) = ctx.bus().restore_theme() {
        tracing::debug!(theme = %theme, "saved theme applied");
    }
    listen_for_messages(&ctx);
    listen_for_connectivity();
    if let Err(err) = utils::install(ctx.clone()) {
        tracing::error!(error = %err, "page API unavailable");
    }

    spawn_local(async move {
        let outcomes = ctx.load_fragments(&HttpFragments).await;
        on_fragments_settled(&ctx, &outcomes);
    });
}

fn on_fragments_settled(ctx: &SiteContext, outcomes: &[FragmentOutcome]) {
    ctx.highlight_navigation();
    wire_mobile_menu(ctx.config().menu);
    wire_search(ctx);

    let fallbacks = outcomes
        .iter()
        .filter(|outcome| **outcome != FragmentOutcome::Loaded)
        .count();
    if fallbacks == 0 {
        tracing::info!(page = ctx.page(), "site components loaded");
    } else {
        tracing::warn!(page = ctx.page(), fallbacks, "site components loaded with fallbacks");
    }
}

fn load_config() -> (SiteConfig, Option<SiteError>) {
    let overrides = document()
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|element| element.text_content());
    match overrides {
        None => (SiteConfig::default(), None),
        Some(json) if json.trim().is_empty() => (SiteConfig::default(), None),
        Some(json) => match SiteConfig::from_overrides(&json) {
            Ok(config) => (config, None),
            Err(err) => (SiteConfig::default(), Some(err)),
        },
    }
}

fn open_store() -> Rc<dyn KeyValueStore> {
    match BrowserStore::open() {
        Some(store) => Rc::new(store),
        None => {
            tracing::warn!("local storage unavailable; messages stay on this page");
            Rc::new(MemoryStore::new())
        }
    }
}
