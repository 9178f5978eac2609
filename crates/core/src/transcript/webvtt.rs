use std::sync::LazyLock;

use regex::Regex;

static TIMESTAMP_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\d{2,}:)?\d{2}:\d{2}\.\d{3}\s+-->\s+(?:\d{2,}:)?\d{2}:\d{2}\.\d{3}")
        .expect("timestamp pattern is valid")
});

static INLINE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("tag pattern is valid"));

// `Kind: captions`, `Language: en` and friends, only valid in the header block.
static HEADER_FIELD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z-]*:\s").expect("header pattern is valid"));

/// Flatten WebVTT captions into plain text.
///
/// Header, blank lines, numeric cue indices, timing lines and `NOTE` /
/// `STYLE` / `REGION` blocks are dropped, inline tags are stripped and
/// the remaining lines are joined with single spaces.
pub fn parse_webvtt(content: &str) -> String {
    let mut text_lines = Vec::new();
    let mut in_header = false;
    let mut in_skipped_block = false;

    for raw in content.lines() {
        let line = raw.trim();

        if line.is_empty() {
            in_header = false;
            in_skipped_block = false;
            continue;
        }
        if line.starts_with("WEBVTT") {
            in_header = true;
            continue;
        }
        if TIMESTAMP_RANGE.is_match(line) {
            in_header = false;
            continue;
        }
        if in_header && HEADER_FIELD.is_match(line) {
            continue;
        }
        if line == "NOTE"
            || line.starts_with("NOTE ")
            || line == "STYLE"
            || line == "REGION"
        {
            in_skipped_block = true;
            continue;
        }
        if in_skipped_block {
            continue;
        }
        if line.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }

        let cleaned = decode_entities(&INLINE_TAG.replace_all(line, ""));
        let cleaned = cleaned.trim();
        if !cleaned.is_empty() {
            text_lines.push(cleaned.to_string());
        }
    }

    text_lines.join(" ")
}

pub(crate) fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}
