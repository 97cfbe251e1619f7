//! Site configuration and page-level overrides.
//!
//! # Design
//! - Defaults reproduce the live site; pages only override what differs.
//! - Overrides arrive as JSON in `<script type="application/json"
//!   id="uro-site-config">` and are validated as a whole; any failure keeps
//!   the defaults.

use crate::core::error::{SiteError, SiteResult};
use crate::core::fragments::FragmentDescriptor;
use crate::core::menu::MenuTimings;
use crate::core::nav::default_page_map;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing_subscriber::EnvFilter;

/// Id of the inline script element carrying configuration overrides.
pub const CONFIG_ELEMENT_ID: &str = "uro-site-config";
/// Fragment directory used by the current page layout.
pub const FRAGMENT_ROOT: &str = "components/";
/// Fragment directory used by the legacy root-relative layout.
pub const LEGACY_FRAGMENT_ROOT: &str = "/components/";

/// Injectable region: fragment name plus the container it fills.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FragmentSlot {
    /// Fragment name; the file is `<root><name>.html`.
    pub name: String,
    /// Id of the placeholder element.
    pub container: String,
}

/// Runtime configuration for one page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct SiteConfig {
    /// Directory prefix fragments are fetched from.
    pub fragment_root: String,
    /// Regions to fill on page-ready.
    pub fragments: Vec<FragmentSlot>,
    /// Storage slot shared by every tab for message relay.
    pub channel_key: String,
    /// Storage key holding the active theme.
    pub theme_key: String,
    /// Prefix of per-content view counter keys.
    pub view_key_prefix: String,
    /// Name of the in-page message event.
    pub message_event: String,
    /// Results page searches navigate to.
    pub search_page: String,
    /// Page file name to logical key.
    pub pages: BTreeMap<String, String>,
    /// Mobile menu transition delays.
    pub menu: MenuTimings,
    /// Log filter directives, e.g. `info` or `warn,uro_site=debug`.
    pub log_level: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            fragment_root: FRAGMENT_ROOT.to_string(),
            fragments: vec![
                FragmentSlot {
                    name: "header".into(),
                    container: "header-component".into(),
                },
                FragmentSlot {
                    name: "footer".into(),
                    container: "footer-component".into(),
                },
            ],
            channel_key: "uro-site-data".into(),
            theme_key: "uro-theme".into(),
            view_key_prefix: "views-".into(),
            message_event: "uro-message".into(),
            search_page: "busca.html".into(),
            pages: default_page_map(),
            menu: MenuTimings::default(),
            log_level: "info".into(),
        }
    }
}

impl SiteConfig {
    /// Parse page overrides on top of the defaults and validate the result.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::InvalidConfig`] when the JSON is unreadable or a
    /// field fails validation.
    pub fn from_overrides(json: &str) -> SiteResult<Self> {
        let config: Self = serde_json::from_str(json).map_err(|err| SiteError::InvalidConfig {
            field: "document",
            reason: err.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check keys are non-empty and fragment slots are unambiguous.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> SiteResult<()> {
        for (field, value) in [
            ("channelKey", &self.channel_key),
            ("themeKey", &self.theme_key),
            ("viewKeyPrefix", &self.view_key_prefix),
            ("messageEvent", &self.message_event),
            ("searchPage", &self.search_page),
        ] {
            if value.trim().is_empty() {
                return Err(invalid(field, "must not be empty"));
            }
        }

        let mut names = BTreeSet::new();
        let mut containers = BTreeSet::new();
        for slot in &self.fragments {
            if slot.name.trim().is_empty() || slot.container.trim().is_empty() {
                return Err(invalid("fragments", "name and container are required"));
            }
            if !names.insert(slot.name.as_str()) {
                return Err(invalid("fragments", format!("duplicate name '{}'", slot.name)));
            }
            if !containers.insert(slot.container.as_str()) {
                return Err(invalid(
                    "fragments",
                    format!("duplicate container '{}'", slot.container),
                ));
            }
        }

        if let Err(err) = EnvFilter::try_new(&self.log_level) {
            return Err(invalid("logLevel", err.to_string()));
        }
        Ok(())
    }

    /// Log filter built from `log_level`, `info` when unreadable.
    #[must_use]
    pub fn log_filter(&self) -> EnvFilter {
        EnvFilter::try_new(&self.log_level).unwrap_or_else(|_| EnvFilter::new("info"))
    }

    /// Fragment descriptors resolved against the fragment root.
    #[must_use]
    pub fn fragment_descriptors(&self) -> Vec<FragmentDescriptor> {
        self.fragments
            .iter()
            .map(|slot| FragmentDescriptor::under(&self.fragment_root, &slot.name, &slot.container))
            .collect()
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> SiteError {
    SiteError::InvalidConfig {
        field,
        reason: reason.into(),
    }
}
