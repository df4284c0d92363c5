//! Post-processing: deterministic cleanup of recognised text.
//!
//! OCR engines leave artefacts that carry no content: tesseract terminates
//! every page with a form feed, Windows builds emit `\r\n`, and vision models
//! sometimes wrap their answer in a code fence despite being told not to.
//! The rules below remove those artefacts without touching the words.
//!
//! Only OCR output goes through here. Text-layer output is returned exactly
//! as the document stores it (trimmed), so that callers can rely on it
//! byte-for-byte.
//!
//! ## Rule Order
//!
//! Fences are stripped before line endings are normalised so the fence regex
//! sees the raw answer; invisible characters are removed last because the
//! earlier rules never introduce any.

use once_cell::sync::Lazy;
use regex::Regex;

/// Apply all cleanup rules to raw OCR output.
///
/// Rules (applied in order):
/// 1. Strip an outer code fence (vision models)
/// 2. Normalise line endings (CRLF / CR → LF)
/// 3. Drop form feeds (tesseract page terminators)
/// 4. Trim trailing whitespace per line
/// 5. Collapse 3+ consecutive blank lines down to 2
/// 6. Strip invisible formatting characters
/// 7. Trim the whole text
pub fn clean_ocr_text(input: &str) -> String {
    let s = strip_code_fence(input);
    let s = normalise_line_endings(&s);
    let s = remove_form_feeds(&s);
    let s = trim_trailing_whitespace(&s);
    let s = collapse_blank_lines(&s);
    let s = remove_invisible_chars(&s);
    s.trim().to_string()
}

// ── Rule 1: Strip outer code fence ───────────────────────────────────────────

static RE_OUTER_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^```(?:text|plaintext|markdown)?\n(.*)\n```\s*$").expect("static regex")
});

fn strip_code_fence(input: &str) -> String {
    match RE_OUTER_FENCE.captures(input.trim()) {
        Some(caps) => caps[1].to_string(),
        None => input.to_string(),
    }
}

// ── Rule 2: Normalise line endings ───────────────────────────────────────────

fn normalise_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

// ── Rule 3: Drop form feeds ──────────────────────────────────────────────────

fn remove_form_feeds(input: &str) -> String {
    input.replace('\u{000C}', "")
}

// ── Rule 4: Trim trailing whitespace per line ────────────────────────────────

fn trim_trailing_whitespace(input: &str) -> String {
    input
        .lines()
        .map(|line| line.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}

// ── Rule 5: Collapse excessive blank lines ───────────────────────────────────

static RE_BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{4,}").expect("static regex"));

fn collapse_blank_lines(input: &str) -> String {
    RE_BLANK_LINES.replace_all(input, "\n\n\n").to_string()
}

// ── Rule 6: Strip invisible formatting characters ────────────────────────────
//
// ZWNJ (U+200C) and ZWJ (U+200D) are kept: Urdu uses them to control letter
// joining, and removing them changes how words render.

fn remove_invisible_chars(input: &str) -> String {
    input.replace(['\u{200B}', '\u{FEFF}', '\u{00AD}', '\u{2060}'], "")
}
