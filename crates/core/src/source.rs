use crate::fence::{SENTINEL_CLOSE, SENTINEL_OPEN};
use crate::transform::{TARGET_CLOSE, TARGET_OPEN};

/// Canonicalizes line endings to `\n` and removes placeholder sentinels.
///
/// `\r\n` and lone `\r` both become `\n`. The private-use characters used by
/// code block placeholders and link target tokens are replaced with U+FFFD so
/// no user text can be mistaken for either.
pub fn normalize(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '\r' => {
                chars.next_if_eq(&'\n');
                out.push('\n');
            }
            SENTINEL_OPEN | SENTINEL_CLOSE | TARGET_OPEN | TARGET_CLOSE => {
                out.push(char::REPLACEMENT_CHARACTER)
            }
            _ => out.push(ch),
        }
    }

    out
}
