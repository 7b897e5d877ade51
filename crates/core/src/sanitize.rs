//! Free-text normalization.

use regex::Regex;
use std::sync::LazyLock;

/// Runs of two or more spaces/tabs.
static HORIZONTAL_WS_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]{2,}").expect("invalid whitespace pattern"));

/// Marker appended to truncated text.
pub const ELLIPSIS: char = '…';

/// Normalize a free-text field.
///
/// Trims the ends, turns `\r\n` (and stray `\r`) into `\n`, collapses runs of
/// spaces/tabs into one space, and truncates to `max_len` chars with a
/// trailing `…`. Newlines are preserved.
pub fn clean(text: &str, max_len: usize) -> String {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    let text = HORIZONTAL_WS_RUN.replace_all(text.trim(), " ");

    if text.chars().count() <= max_len {
        return text.into_owned();
    }

    let mut truncated: String = text.chars().take(max_len).collect();
    truncated.truncate(truncated.trim_end().len());
    truncated.push(ELLIPSIS);
    truncated
}

/// [`clean`] for optional fields; `None` yields an empty string.
pub fn clean_opt(text: Option<&str>, max_len: usize) -> String {
    text.map(|t| clean(t, max_len)).unwrap_or_default()
}
