//! Text normalization
//!
//! Every piece of text entering the classifiers goes through [`normalize`]
//! first, so downstream components can rely on:
//! - `\n` as the only line terminator
//! - no leading or trailing whitespace
//! - no run of more than two consecutive newlines
//! - at most [`MAX_CHARS`] characters

/// Upper bound on normalized text length, in characters
pub const MAX_CHARS: usize = 20_000;

/// Canonicalize raw email text.
///
/// Never fails; empty or whitespace-only input yields an empty string.
pub fn normalize(raw: &str) -> String {
    let unified = raw.replace("\r\n", "\n").replace('\r', "\n");
    let collapsed = collapse_blank_runs(unified.trim());
    truncate_chars(&collapsed, MAX_CHARS).to_string()
}

/// Normalize text that may be missing altogether.
pub fn normalize_opt(raw: Option<&str>) -> String {
    raw.map(normalize).unwrap_or_default()
}

/// Length of `text` in characters, as reported to clients.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Return the first `max` characters of `text`.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

// Runs of three or more newlines become exactly two.
fn collapse_blank_runs(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut run = 0usize;

    for ch in text.chars() {
        if ch == '\n' {
            run += 1;
            if run > 2 {
                continue;
            }
        } else {
            run = 0;
        }
        out.push(ch);
    }

    out
}
