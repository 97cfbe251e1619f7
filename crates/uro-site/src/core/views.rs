//! Per-content view counters kept in local storage.

use crate::core::error::SiteResult;
use crate::core::ports::KeyValueStore;

/// Storage key of the counter for `content_id`.
#[must_use]
pub fn view_key(prefix: &str, content_id: &str) -> String {
    format!("{prefix}{content_id}")
}

/// Current count for `content_id`; absent or unreadable counters read as zero.
#[must_use]
pub fn view_count(store: &dyn KeyValueStore, prefix: &str, content_id: &str) -> u64 {
    let key = view_key(prefix, content_id);
    match store.get(&key) {
        None => 0,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key = %key, raw = %raw, "unreadable view counter reset to zero");
            0
        }),
    }
}

/// Increment the counter for `content_id` by one and return the new value.
///
/// # Errors
///
/// Propagates storage write failures.
pub fn record_view(store: &dyn KeyValueStore, prefix: &str, content_id: &str) -> SiteResult<u64> {
    let next = view_count(store, prefix, content_id).saturating_add(1);
    store.set(&view_key(prefix, content_id), &next.to_string())?;
    Ok(next)
}
