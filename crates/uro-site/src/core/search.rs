//! Search box submission rules.

/// Id of the header search input.
pub const INPUT_ID: &str = "searchInput";
/// Id of the header search button.
pub const BUTTON_ID: &str = "searchButton";

/// Trimmed term, or `None` when nothing but whitespace was typed.
#[must_use]
pub fn normalize_term(raw: &str) -> Option<&str> {
    let term = raw.trim();
    (!term.is_empty()).then_some(term)
}

/// Results page address carrying `term` as the `q` parameter.
#[must_use]
pub fn results_url(search_page: &str, term: &str) -> String {
    format!("{search_page}?q={}", urlencoding::encode(term))
}
