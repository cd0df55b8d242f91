//! Conversion between content items and translation service payloads.

use std::sync::OnceLock;

use regex::Regex;

use super::table_format::{parse_cells, serialize_cells};
use super::TranslationResult;
use crate::model::{Content, Translation};

/// Strip the first response preamble in `prefixes` that `text` starts with.
///
/// The match is exact and case-sensitive and at most one prefix is removed.
/// The remainder is trimmed on purpose: a preamble is normally followed by a
/// space or line break that is not part of the translation. Text with no
/// matching prefix is returned as is, untrimmed.
pub fn strip_prefix<S: AsRef<str>>(text: &str, prefixes: &[S]) -> String {
    prefixes
        .iter()
        .find_map(|p| text.strip_prefix(p.as_ref()))
        .map(|rest| rest.trim().to_string())
        .unwrap_or_else(|| text.to_string())
}

const FENCE_PATTERN: &str = r"(?s)^\s*```[A-Za-z0-9_-]*[ \t]*\r?\n(.*?)\r?\n?```\s*$";

fn fence_regex() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| Regex::new(FENCE_PATTERN).expect("fence pattern is a valid regex"))
}

/// Return the body of a single Markdown code fence, or `text` unchanged.
pub fn unwrap_code_fence(text: &str) -> &str {
    fence_regex()
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or(text)
}

/// Text sent to the translation service for one item.
pub fn externalize(content: &Content) -> String {
    match content {
        Content::Text(t) => t.original.clone(),
        Content::Table(t) => serialize_cells(&t.original),
    }
}

/// Attach a service response to `content`.
///
/// Failed requests and unparseable table responses leave the item
/// untranslated. Returns the resulting status.
pub fn internalize<S: AsRef<str>>(
    content: &mut Content,
    result: TranslationResult,
    prefixes: &[S],
) -> bool {
    if !result.success {
        content.reset_translation();
        return false;
    }

    let cleaned = strip_prefix(&result.text, prefixes);
    let translation = match content {
        Content::Text(_) => Translation::Text(cleaned),
        Content::Table(_) => match parse_cells(unwrap_code_fence(&cleaned)) {
            Ok(cells) => Translation::Table(cells),
            Err(e) => {
                log::error!("Failed to parse translated table: {}", e);
                content.reset_translation();
                return false;
            }
        },
    };

    match content.set_translation(translation) {
        Ok(()) => true,
        Err(e) => {
            log::error!("Rejected translation: {}", e);
            content.reset_translation();
            false
        }
    }
}
