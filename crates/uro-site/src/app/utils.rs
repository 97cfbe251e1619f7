//! `window.UroSiteUtils`: the page-level API other scripts call.

use crate::app::storage::js_message;
use crate::core::context::SiteContext;
use anyhow::{Result, anyhow};
use gloo::utils::window;
use js_sys::{JSON, Reflect};
use serde_json::Value;
use wasm_bindgen::prelude::*;

/// Global property the API is published under.
const GLOBAL_NAME: &str = "UroSiteUtils";

/// Thin JS-facing wrapper over the page's [`SiteContext`].
#[wasm_bindgen(js_name = UroSiteUtils)]
pub struct SiteUtils {
    ctx: SiteContext,
}

#[wasm_bindgen(js_class = UroSiteUtils)]
impl SiteUtils {
    /// Record that `contentId` was viewed on the current page.
    #[wasm_bindgen(js_name = trackContentView)]
    pub fn track_content_view(&self, content_id: &str, title: Option<String>) {
        let url = window().location().href().ok();
        if let Err(err) = self
            .ctx
            .track_content_view(content_id, title.as_deref(), url.as_deref())
        {
            tracing::warn!(content_id, error = %err, "content view not tracked");
        }
    }

    /// Publish a `{ [key]: value }` preference.
    #[wasm_bindgen(js_name = setUserPreference)]
    pub fn set_user_preference(&self, key: &str, value: JsValue) {
        let value = match to_json(&value) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(key, error = %err, "preference value not serializable");
                return;
            }
        };
        if let Err(err) = self.ctx.set_user_preference(key, value) {
            tracing::warn!(key, error = %err, "preference not published");
        }
    }

    /// Stored view count for `contentId`.
    #[wasm_bindgen(js_name = getViewCount)]
    #[must_use]
    pub fn get_view_count(&self, content_id: &str) -> u32 {
        u32::try_from(self.ctx.view_count(content_id)).unwrap_or(u32::MAX)
    }
}

fn to_json(value: &JsValue) -> Result<Value> {
    if value.is_undefined() || value.is_function() || value.is_symbol() {
        return Ok(Value::Null);
    }
    let text: String = JSON::stringify(value)
        .map_err(|err| anyhow!("stringify failed: {}", js_message(&err)))?
        .into();
    Ok(serde_json::from_str(&text)?)
}

/// Publish the page API on `window`.
pub(crate) fn install(ctx: SiteContext) -> Result<()> {
    let utils = JsValue::from(SiteUtils { ctx });
    Reflect::set(&window(), &JsValue::from_str(GLOBAL_NAME), &utils)
        .map_err(|err| anyhow!("failed to publish {GLOBAL_NAME}: {}", js_message(&err)))?;
    Ok(())
}
