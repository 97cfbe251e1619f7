//! Active-page resolution and navigation highlighting.
//!
//! # Design
//! - Page keys come from the last path segment, looked up in a static map
//!   first and falling back to stripping `.html`.
//! - Highlighting rewrites every link in both groups on each call so the
//!   result does not depend on prior state.

use crate::core::ports::Renderer;
use std::collections::BTreeMap;

/// Page assumed when the path ends in `/`.
pub const DEFAULT_PAGE_FILE: &str = "index.html";
/// Key of the landing page; also matches links with an empty stem.
pub const INDEX_KEY: &str = "index";

/// Known pages and their logical keys.
#[must_use]
pub fn default_page_map() -> BTreeMap<String, String> {
    [
        ("index.html", "index"),
        ("protocolos.html", "protocolos"),
        ("artigos.html", "artigos"),
        ("eventos.html", "eventos"),
        ("noticias.html", "noticias"),
        ("sobre.html", "sobre"),
        ("contato.html", "contato"),
    ]
    .into_iter()
    .map(|(file, key)| (file.to_string(), key.to_string()))
    .collect()
}

/// Navigation surfaces that mark the active page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NavGroup {
    /// Header buttons on wide viewports.
    Desktop,
    /// Links inside the slide-in mobile menu.
    Mobile,
}

impl NavGroup {
    /// Both groups, in highlight order.
    pub const ALL: [Self; 2] = [Self::Desktop, Self::Mobile];

    /// CSS selector locating the group's links.
    #[must_use]
    pub const fn selector(self) -> &'static str {
        match self {
            Self::Desktop => ".nav-button",
            Self::Mobile => "#mobileMenu a",
        }
    }

    /// Classes carried by the link of the active page.
    #[must_use]
    pub const fn active_classes(self) -> &'static [&'static str] {
        match self {
            Self::Desktop => &["border-uro-azul", "text-uro-azul"],
            Self::Mobile => &["bg-uro-azul", "text-white"],
        }
    }

    /// Classes carried by every other link.
    #[must_use]
    pub const fn idle_classes(self) -> &'static [&'static str] {
        match self {
            Self::Desktop => &["border-transparent"],
            Self::Mobile => &["text-uro-azul_escuro", "hover:bg-uro-cinza"],
        }
    }
}

/// File name of the current page from a location pathname.
#[must_use]
pub fn page_file(pathname: &str) -> &str {
    match pathname.rsplit('/').next() {
        Some(file) if !file.is_empty() => file,
        _ => DEFAULT_PAGE_FILE,
    }
}

/// Logical key for a page file name.
#[must_use]
pub fn resolve_page(file: &str, pages: &BTreeMap<String, String>) -> String {
    pages
        .get(file)
        .cloned()
        .unwrap_or_else(|| file.strip_suffix(".html").unwrap_or(file).to_string())
}

/// Page stem a link points at (`./sobre.html?x#y` → `sobre`).
#[must_use]
pub fn link_stem(href: &str) -> &str {
    let path = href.split(['?', '#']).next().unwrap_or_default();
    let file = path.rsplit('/').next().unwrap_or_default();
    file.strip_suffix(".html").unwrap_or(file)
}

/// Whether a link with `href` points at the page with key `page`.
#[must_use]
pub fn is_active(href: Option<&str>, page: &str) -> bool {
    let stem = href.map(link_stem).unwrap_or_default();
    stem == page || (page == INDEX_KEY && stem.is_empty())
}

/// Mark the links of `page` active in every group and reset the rest.
///
/// Returns the number of links marked active.
pub fn highlight(renderer: &dyn Renderer, page: &str) -> usize {
    let mut active = 0;
    for group in NavGroup::ALL {
        for link in renderer.nav_links(group) {
            if is_active(link.href.as_deref(), page) {
                renderer.update_link_classes(
                    group,
                    link.index,
                    group.active_classes(),
                    group.idle_classes(),
                );
                active += 1;
            } else {
                renderer.update_link_classes(
                    group,
                    link.index,
                    group.idle_classes(),
                    group.active_classes(),
                );
            }
        }
    }
    tracing::debug!(page, active, "navigation highlighted");
    active
}
