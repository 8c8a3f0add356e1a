//! HTML escaping shared by the extractor, the transformer and the restorer.

use std::borrow::Cow;

/// Escapes the five HTML-significant characters.
///
/// | Char | Entity   |
/// |------|----------|
/// | `&`  | `&amp;`  |
/// | `<`  | `&lt;`   |
/// | `>`  | `&gt;`   |
/// | `"`  | `&quot;` |
/// | `'`  | `&#39;`  |
///
/// Input without any of these characters is returned borrowed.
pub fn escape_html(s: &str) -> Cow<'_, str> {
    let mut start = 0;
    let mut escaped: Option<String> = None;

    for (index, &byte) in s.as_bytes().iter().enumerate() {
        let Some(replacement) = entity_for(byte) else {
            continue;
        };

        let out = escaped.get_or_insert_with(|| String::with_capacity(s.len() + 16));
        out.push_str(&s[start..index]);
        out.push_str(replacement);
        start = index + 1;
    }

    match escaped {
        Some(mut out) => {
            out.push_str(&s[start..]);
            Cow::Owned(out)
        }
        None => Cow::Borrowed(s),
    }
}

/// Appends the escaped form of `s` to `out`.
pub fn escape_into(out: &mut String, s: &str) {
    out.push_str(&escape_html(s));
}

fn entity_for(byte: u8) -> Option<&'static str> {
    match byte {
        b'&' => Some("&amp;"),
        b'<' => Some("&lt;"),
        b'>' => Some("&gt;"),
        b'"' => Some("&quot;"),
        b'\'' => Some("&#39;"),
        _ => None,
    }
}
