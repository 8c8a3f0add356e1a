//! Block and inline rewrite rules applied to placeholder-protected text.
//!
//! Rules run in a fixed order: headings, strong, emphasis, inline code, links,
//! list items, list grouping. No rule emits a delimiter a later rule matches,
//! so output of one rule is never re-matched by another. Link destinations are
//! set aside before the emphasis rules run, so a URL such as `a_b_c` reaches
//! the link rule untouched.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::escape::escape_html;

static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(#{1,6}) +(.*?)[ \t]*$").unwrap());

static STRONG_STARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*([^\n]+?)\*\*").unwrap());

static STRONG_UNDERSCORES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"__([^\n]+?)__").unwrap());

static EMPHASIS_STAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*([^\n]+?)\*").unwrap());

static EMPHASIS_UNDERSCORE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_([^\n]+?)_").unwrap());

static INLINE_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`([^`\n]+)`").unwrap());

static LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]\n]+)\]\(([^)\s]+)\)").unwrap());

static LIST_ITEM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^- (.*)$").unwrap());

static LIST_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)(?:^<li>.*</li>(?:\n|$))+").unwrap());

/// `](destination)` as matched by [`LINK`], without the label.
static LINK_TARGET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\]\(([^)\s]+)\)").unwrap());

static TARGET_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("\u{E002}([0-9]+)\u{E003}").unwrap());

pub(crate) const TARGET_OPEN: char = '\u{E002}';
pub(crate) const TARGET_CLOSE: char = '\u{E003}';

/// Tags produced by the emphasis rules, which run before inline code and links.
static EMPHASIS_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</?(?:strong|em)>").unwrap());

/// Applies every block and inline rule to `text`.
///
/// With `escape_inline` off, inline code content and link URLs are inserted
/// verbatim.
pub fn transform(text: &str, escape_inline: bool) -> String {
    let (text, targets) = LinkTargets::protect(text);

    let text = HEADING.replace_all(&text, |caps: &Captures<'_>| {
        let level = caps[1].len();
        format!("<h{level}>{}</h{level}>", &caps[2])
    });

    let text = STRONG_STARS.replace_all(&text, "<strong>${1}</strong>");
    let text = STRONG_UNDERSCORES.replace_all(&text, "<strong>${1}</strong>");
    let text = EMPHASIS_STAR.replace_all(&text, "<em>${1}</em>");
    let text = EMPHASIS_UNDERSCORE.replace_all(&text, "<em>${1}</em>");

    let text = INLINE_CODE.replace_all(&text, |caps: &Captures<'_>| {
        let code = targets.resolve(&caps[1]);
        format!("<code>{}</code>", inline_content(&code, escape_inline))
    });

    let text = LINK.replace_all(&text, |caps: &Captures<'_>| {
        let url = targets.resolve(&caps[2]);
        format!(
            "<a href=\"{}\">{}</a>",
            inline_content(&url, escape_inline),
            &caps[1]
        )
    });
    let text = targets.resolve(&text);

    let text = LIST_ITEM.replace_all(&text, "<li>${1}</li>");
    let text = LIST_RUN.replace_all(&text, |caps: &Captures<'_>| {
        let run = &caps[0];
        let items = run.trim_end_matches('\n');
        let trailing = if run.len() > items.len() { "\n" } else { "" };
        format!("<ul>\n{items}\n</ul>{trailing}")
    });

    text.into_owned()
}

/// Link destinations replaced by numbered tokens while the emphasis rules run.
struct LinkTargets(Vec<String>);

impl LinkTargets {
    fn protect(text: &str) -> (String, Self) {
        let mut targets = Vec::new();
        let protected = LINK_TARGET.replace_all(text, |caps: &Captures<'_>| {
            let token = format!("]({TARGET_OPEN}{}{TARGET_CLOSE})", targets.len());
            targets.push(caps[1].to_owned());
            token
        });

        (protected.into_owned(), LinkTargets(targets))
    }

    /// Puts the original destinations back in place of their tokens.
    fn resolve<'t>(&self, text: &'t str) -> Cow<'t, str> {
        if self.0.is_empty() {
            return Cow::Borrowed(text);
        }

        TARGET_TOKEN.replace_all(text, |caps: &Captures<'_>| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|index| self.0.get(index))
                .map_or_else(|| caps[0].to_owned(), String::clone)
        })
    }
}

fn inline_content(raw: &str, escape: bool) -> Cow<'_, str> {
    if escape {
        Cow::Owned(escape_around_emphasis(raw))
    } else {
        Cow::Borrowed(raw)
    }
}

/// Escapes `raw` while keeping `<strong>`/`<em>` tags from earlier rules intact.
fn escape_around_emphasis(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut last = 0;

    for tag in EMPHASIS_TAG.find_iter(raw) {
        out.push_str(&escape_html(&raw[last..tag.start()]));
        out.push_str(tag.as_str());
        last = tag.end();
    }

    out.push_str(&escape_html(&raw[last..]));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn headings_match_their_marker_count() {
        assert_eq!(transform("# H", true), "<h1>H</h1>");
        assert_eq!(transform("### H", true), "<h3>H</h3>");
        assert_eq!(transform("###### H", true), "<h6>H</h6>");
    }

    #[test]
    fn seven_markers_stay_literal() {
        assert_eq!(transform("####### H", true), "####### H");
        assert_eq!(transform("#NoSpace", true), "#NoSpace");
    }

    #[test]
    fn strong_runs_before_emphasis() {
        assert_eq!(
            transform("**a** and __b__ and *c* and _d_", true),
            "<strong>a</strong> and <strong>b</strong> and <em>c</em> and <em>d</em>"
        );
    }

    #[test]
    fn unmatched_delimiters_stay_literal() {
        assert_eq!(transform("a ** b", true), "a ** b");
        assert_eq!(transform("2 * 3", true), "2 * 3");
        assert_eq!(transform("**bold\nstill**", true), "**bold\nstill**");
    }

    #[test]
    fn inline_code_is_escaped_by_default() {
        assert_eq!(
            transform("run `<b>x</b>`", true),
            "run <code>&lt;b&gt;x&lt;/b&gt;</code>"
        );
        assert_eq!(
            transform("run `<b>x</b>`", false),
            "run <code><b>x</b></code>"
        );
    }

    #[test]
    fn escaping_keeps_earlier_emphasis_tags() {
        assert_eq!(
            transform("`a *b* <c>`", true),
            "<code>a <em>b</em> &lt;c&gt;</code>"
        );
    }

    #[test]
    fn links_escape_their_url() {
        assert_eq!(
            transform("[docs](https://example.com/?a=1&b=2)", true),
            "<a href=\"https://example.com/?a=1&amp;b=2\">docs</a>"
        );
        assert_eq!(
            transform("[x](javascript:alert(1\"))", false),
            "<a href=\"javascript:alert(1\"\">x</a>)"
        );
    }

    #[test]
    fn emphasis_delimiters_in_link_urls_stay_literal() {
        assert_eq!(
            transform("[x](https://a.com/some_path_here)", true),
            "<a href=\"https://a.com/some_path_here\">x</a>"
        );
        assert_eq!(
            transform("[_x_](http://a_b_c/*d*)", false),
            "<a href=\"http://a_b_c/*d*\"><em>x</em></a>"
        );
    }

    #[test]
    fn unlinked_targets_are_put_back() {
        assert_eq!(
            transform("see ](a_b_c) and `](x_y_)`", true),
            "see ](a_b_c) and <code>](x_y_)</code>"
        );
    }

    #[test]
    fn consecutive_items_share_one_list() {
        assert_eq!(
            transform("- a\n- b\n- c", true),
            "<ul>\n<li>a</li>\n<li>b</li>\n<li>c</li>\n</ul>"
        );
    }

    #[test]
    fn separated_runs_stay_separate() {
        assert_eq!(
            transform("- a\ntext\n- b\n", true),
            "<ul>\n<li>a</li>\n</ul>\ntext\n<ul>\n<li>b</li>\n</ul>\n"
        );
    }

    #[test]
    fn heading_content_gets_inline_rules() {
        assert_eq!(
            transform("## A **big** deal", true),
            "<h2>A <strong>big</strong> deal</h2>"
        );
    }
}
