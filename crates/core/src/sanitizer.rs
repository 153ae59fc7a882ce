//! Default markup-to-text reduction for notification bodies.

use std::sync::LazyLock;

use regex::Regex;

use crate::collaborators::ContentSanitizer;

/// Default maximum length of a rendered body, in characters.
pub const DEFAULT_MAX_CHARS: usize = 250;

/// Appended when a body is cut short.
const ELLIPSIS: char = '…';

static SCRIPT_STYLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(script|style)\b[^>]*>.*?</(script|style)\s*>").expect("valid regex")
});

static BLOCK_BREAK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<\s*(br|/p|/div|/li|/h[1-6]|/blockquote)\b[^>]*>").expect("valid regex")
});

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid regex"));

static SHORTCODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[/?[A-Za-z][\w-]*[^\]]*\]").expect("valid regex"));

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Strips markup and shortcodes, decodes common entities, collapses
/// whitespace and truncates to `max_chars` characters.
#[derive(Debug, Clone)]
pub struct PlainTextSanitizer {
    max_chars: usize,
}

impl PlainTextSanitizer {
    pub fn new(max_chars: usize) -> Self {
        Self { max_chars }
    }
}

impl Default for PlainTextSanitizer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CHARS)
    }
}

impl ContentSanitizer for PlainTextSanitizer {
    fn render(&self, raw_body: &str) -> String {
        let text = SCRIPT_STYLE_RE.replace_all(raw_body, "");
        let text = BLOCK_BREAK_RE.replace_all(&text, " ");
        let text = TAG_RE.replace_all(&text, "");
        let text = SHORTCODE_RE.replace_all(&text, "");
        let text = decode_entities(&text);
        let text = WHITESPACE_RE.replace_all(text.trim(), " ");

        truncate_chars(&text, self.max_chars)
    }
}

/// Decode the handful of entities editors actually produce.
fn decode_entities(text: &str) -> String {
    // `&amp;` last so `&amp;lt;` decodes to `&lt;` rather than `<`.
    text.replace("&nbsp;", " ")
        .replace("&#160;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#039;", "'")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&hellip;", "…")
        .replace("&#8230;", "…")
        .replace("&ndash;", "–")
        .replace("&mdash;", "—")
        .replace("&amp;", "&")
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    if max_chars == 0 {
        return String::new();
    }

    let mut out: String = text.chars().take(max_chars - 1).collect();
    out.truncate(out.trim_end().len());
    out.push(ELLIPSIS);
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
