//! Response body rendering for terminal display.
//!
//! JSON bodies are pretty-printed; everything else is treated as markup and
//! reduced to its text content. Style and script elements are removed
//! wholesale before generic tag stripping so their contents never leak into
//! the output.

use std::sync::LazyLock;

use regex::Regex;

use crate::response::HttpResponse;

static STYLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<style\b[^>]*>.*?</style>")
        .expect("Failed to parse style regex - this is a bug")
});

static SCRIPT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script>")
        .expect("Failed to parse script regex - this is a bug")
});

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("Failed to parse tag regex - this is a bug"));

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Failed to parse whitespace regex - this is a bug"));

/// Renders the display text for a terminal response.
pub fn render(response: &HttpResponse) -> String {
    let body = response.body_text();
    if response.content_type().contains("application/json") {
        render_json(&body)
    } else {
        strip_tags(&body)
    }
}

/// Pretty-prints a JSON body with two-space indentation. Bodies that fail
/// to parse come back unchanged; this boundary never errors.
fn render_json(body: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => serde_json::to_string_pretty(&value).unwrap_or_else(|_| body.to_string()),
        Err(_) => body.to_string(),
    }
}

/// Strips markup from an HTML or plain-text body.
///
/// Style and script bodies must be removed before generic tag stripping or
/// their text would leak into the output; whitespace collapses last.
pub(crate) fn strip_tags(body: &str) -> String {
    let without_style = STYLE_RE.replace_all(body, "");
    let without_script = SCRIPT_RE.replace_all(&without_style, "");
    let without_tags = TAG_RE.replace_all(&without_script, "");
    WHITESPACE_RE
        .replace_all(&without_tags, " ")
        .trim()
        .to_string()
}
