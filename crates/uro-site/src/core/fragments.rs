//! Fragment loading into placeholder containers.
//!
//! # Design
//! - One best-effort fetch per fragment; failures swap in static fallback
//!   markup so the page never keeps a half-rendered placeholder.
//! - Fragments load concurrently and settle independently.

use crate::core::ports::{FragmentSource, Renderer};
use futures_util::future::join_all;
use std::cell::RefCell;
use std::collections::BTreeMap;

/// Markup used when no fallback is registered for a container.
pub const GENERIC_FALLBACK: &str = "<p>Componente não carregado</p>";

const HEADER_FALLBACK: &str = r#"
                <div class="bg-uro-branco shadow-md p-4 text-center">
                    <h1 class="text-2xl font-bold text-uro-azul_escuro">Uroginecologia Em Dia</h1>
                    <p class="text-sm text-gray-600">Menu temporariamente indisponível</p>
                </div>
            "#;

const FOOTER_FALLBACK: &str = r#"
                <div class="bg-uro-azul_escuro text-white p-8 text-center">
                    <p>© 2025 Uroginecologia Em Dia. Todos os direitos reservados.</p>
                </div>
            "#;

/// Static markup shown in `container` when its fragment cannot be fetched.
#[must_use]
pub fn fallback_markup(container: &str) -> &'static str {
    match container {
        "header-component" => HEADER_FALLBACK,
        "footer-component" => FOOTER_FALLBACK,
        _ => GENERIC_FALLBACK,
    }
}

/// Immutable description of one injectable region.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FragmentDescriptor {
    /// Logical fragment name (`header`, `footer`).
    pub name: String,
    /// Path the markup is fetched from.
    pub source: String,
    /// Id of the container the markup replaces.
    pub container: String,
}

impl FragmentDescriptor {
    /// Descriptor for `<root><name>.html` injected into `container`.
    #[must_use]
    pub fn under(root: &str, name: &str, container: &str) -> Self {
        Self {
            name: name.to_string(),
            source: format!("{root}{name}.html"),
            container: container.to_string(),
        }
    }
}

/// How a fragment load settled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FragmentOutcome {
    /// Fetched markup was injected.
    Loaded,
    /// Fetch failed; fallback markup was injected.
    Fallback,
    /// Container missing; nothing was fetched or changed.
    Skipped,
}

/// Loads fragments and remembers the markup of those that succeeded.
#[derive(Debug, Default)]
pub struct ComponentLoader {
    loaded: RefCell<BTreeMap<String, String>>,
}

impl ComponentLoader {
    /// Loader with an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Markup of a fragment that loaded successfully.
    #[must_use]
    pub fn loaded(&self, name: &str) -> Option<String> {
        self.loaded.borrow().get(name).cloned()
    }

    /// Fetch one fragment and inject it, or its fallback, into its container.
    pub async fn load<S: FragmentSource>(
        &self,
        source: &S,
        renderer: &dyn Renderer,
        descriptor: &FragmentDescriptor,
    ) -> FragmentOutcome {
        let FragmentDescriptor {
            name,
            source: path,
            container,
        } = descriptor;

        if !renderer.has_element(container) {
            tracing::warn!(fragment = %name, container = %container, "fragment container not found");
            return FragmentOutcome::Skipped;
        }

        let markup = match source.fetch(path).await {
            Ok(markup) => markup,
            Err(err) => {
                tracing::error!(fragment = %name, path = %path, error = %err, "fragment load failed");
                return match renderer.replace_content(container, fallback_markup(container)) {
                    Ok(()) => FragmentOutcome::Fallback,
                    Err(err) => {
                        tracing::warn!(fragment = %name, error = %err, "fallback injection skipped");
                        FragmentOutcome::Skipped
                    }
                };
            }
        };

        if let Err(err) = renderer.replace_content(container, &markup) {
            tracing::warn!(fragment = %name, error = %err, "fragment injection skipped");
            return FragmentOutcome::Skipped;
        }
        self.loaded.borrow_mut().insert(name.clone(), markup);
        tracing::info!(fragment = %name, "{name} initialized");
        FragmentOutcome::Loaded
    }

    /// Load every descriptor concurrently; outcomes follow input order.
    pub async fn load_all<S: FragmentSource>(
        &self,
        source: &S,
        renderer: &dyn Renderer,
        descriptors: &[FragmentDescriptor],
    ) -> Vec<FragmentOutcome> {
        join_all(
            descriptors
                .iter()
                .map(|descriptor| self.load(source, renderer, descriptor)),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SiteConfig;
    use crate::core::testing::{FakePage, ScriptedSource};

    const HEADER_HTML: &str = "<nav><a class=\"nav-button\" href=\"index.html\">Início</a></nav>";
    const FOOTER_HTML: &str = "<footer>Contato</footer>";

    fn descriptors() -> Vec<FragmentDescriptor> {
        SiteConfig::default().fragment_descriptors()
    }

    fn page() -> FakePage {
        FakePage::default()
            .with_element("header-component", "<p>carregando…</p>")
            .with_element("footer-component", "<p>carregando…</p>")
    }

    #[tokio::test]
    async fn successful_fetch_injects_body_verbatim() {
        let page = page();
        let source = ScriptedSource::default()
            .ok("components/header.html", HEADER_HTML)
            .ok("components/footer.html", FOOTER_HTML);
        let loader = ComponentLoader::new();

        let outcomes = loader.load_all(&source, &page, &descriptors()).await;

        assert_eq!(outcomes, vec![FragmentOutcome::Loaded, FragmentOutcome::Loaded]);
        assert_eq!(page.content("header-component").as_deref(), Some(HEADER_HTML));
        assert_eq!(page.content("footer-component").as_deref(), Some(FOOTER_HTML));
        assert_eq!(loader.loaded("header").as_deref(), Some(HEADER_HTML));
    }

    #[tokio::test]
    async fn http_error_replaces_content_with_fallback() {
        let page = page();
        let source = ScriptedSource::default()
            .status("components/header.html", 404)
            .ok("components/footer.html", FOOTER_HTML);
        let loader = ComponentLoader::new();

        let outcomes = loader.load_all(&source, &page, &descriptors()).await;

        assert_eq!(outcomes, vec![FragmentOutcome::Fallback, FragmentOutcome::Loaded]);
        assert_eq!(
            page.content("header-component").as_deref(),
            Some(fallback_markup("header-component"))
        );
        assert_eq!(page.content("footer-component").as_deref(), Some(FOOTER_HTML));
        assert_eq!(loader.loaded("header"), None);
    }

    #[tokio::test]
    async fn network_error_uses_container_fallback() {
        let page = page();
        let source = ScriptedSource::default();
        let loader = ComponentLoader::new();

        loader.load_all(&source, &page, &descriptors()).await;

        let footer = page.content("footer-component").unwrap();
        assert_eq!(footer, FOOTER_FALLBACK);
        assert!(!footer.contains("carregando"));
    }

    #[tokio::test]
    async fn missing_container_skips_fetch() {
        let page = FakePage::default().with_element("footer-component", "");
        let source = ScriptedSource::default().ok("components/footer.html", FOOTER_HTML);
        let loader = ComponentLoader::new();

        let outcomes = loader.load_all(&source, &page, &descriptors()).await;

        assert_eq!(outcomes, vec![FragmentOutcome::Skipped, FragmentOutcome::Loaded]);
        assert_eq!(*source.requests.borrow(), vec!["components/footer.html".to_string()]);
    }

    #[tokio::test]
    async fn unknown_container_gets_generic_fallback() {
        let page = FakePage::default().with_element("sidebar-component", "old");
        let source = ScriptedSource::default().status("components/sidebar.html", 500);
        let descriptor = FragmentDescriptor::under("components/", "sidebar", "sidebar-component");

        let outcome = ComponentLoader::new().load(&source, &page, &descriptor).await;

        assert_eq!(outcome, FragmentOutcome::Fallback);
        assert_eq!(page.content("sidebar-component").as_deref(), Some(GENERIC_FALLBACK));
    }
}
