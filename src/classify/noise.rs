//! Boilerplate line detection.
//!
//! Rejects page numbers, publisher imprints, contact details, copyright
//! notices, decorative rules and table-of-contents remnants before they
//! reach heading classification.

use regex::Regex;
use std::sync::OnceLock;

/// Contact/imprint lines only count as noise below this many words.
const CONTACT_MAX_WORDS: usize = 12;

/// Lines at least this long are never treated as TOC remnants.
const TOC_MAX_CHARS: usize = 80;

/// Fragments typical of publisher contact lines.
const CONTACT_MARKERS: &[&str] = &["www.", ".com", "@"];

/// Lowercase publisher keywords.
const PUBLISHER_KEYWORDS: &[&str] = &["books", "global"];

/// Lowercase copyright and imprint markers.
const IMPRINT_MARKERS: &[&str] = &[
    "copyright",
    "first published",
    "isbn",
    "printed in",
    "all rights reserved",
];

/// Lowercase address fragments seen in imprint pages.
const ADDRESS_FRAGMENTS: &[&str] = &[
    "nizamuddin",
    "new delhi",
    "noida",
    "bensalem",
    "byberry road",
];

fn page_label_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^\s*page\s+\d+\s*$").expect("valid page label regex"))
}

fn long_word_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[a-zA-Z]{4,}").expect("valid word regex"))
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_all_digits(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

/// Check if a line is boilerplate that should be dropped.
///
/// Pure and idempotent; rules are tried in priority order and the first
/// match wins.
pub fn is_noise(line_text: &str) -> bool {
    let line = line_text.trim();
    if line.is_empty() {
        return true;
    }

    let core = line.trim_matches(|c: char| !is_word_char(c));
    let lower = line.to_lowercase();

    // Bare page number
    if is_all_digits(core) && core == line && core.len() < 4 {
        return true;
    }

    if is_contact_fragment(line, &lower) && line.split_whitespace().count() < CONTACT_MAX_WORDS {
        return true;
    }

    if page_label_regex().is_match(line) {
        return true;
    }

    if line.contains('©') || line.contains("Â©") {
        return true;
    }
    if IMPRINT_MARKERS.iter().any(|m| lower.contains(m)) {
        return true;
    }

    if ADDRESS_FRAGMENTS.iter().any(|a| lower.contains(a)) {
        return true;
    }

    if is_decorative(line) {
        return true;
    }

    is_toc_remnant(line, core)
}

fn is_contact_fragment(line: &str, lower: &str) -> bool {
    CONTACT_MARKERS.iter().any(|m| line.contains(m))
        || PUBLISHER_KEYWORDS.iter().any(|k| lower.contains(k))
        || (lower.contains("center") && lower.contains("peace"))
}

/// Low character diversity relative to length, e.g. `* * * *` or `-----`.
fn is_decorative(line: &str) -> bool {
    let mut distinct: Vec<char> = line.chars().collect();
    let len = distinct.len();
    distinct.sort_unstable();
    distinct.dedup();
    distinct.len() < 4 && len > 4
}

/// A dotted/spaced entry ending in a page number with no real word before it.
fn is_toc_remnant(line: &str, core: &str) -> bool {
    if !is_all_digits(core) || !line.ends_with(core) {
        return false;
    }
    let len = line.chars().count();
    len < TOC_MAX_CHARS && len > core.chars().count() + 2 && !long_word_regex().is_match(line)
}
