//! Fenced code blocks: protect them from the Markdown transforms, then splice
//! them back in once the rest of the document has been rendered.
//!
//! Each fenced region is replaced by a [`Placeholder`] that encodes its ordinal
//! in [`CodeBlocks`]. The placeholder is wrapped in two private-use sentinel
//! characters which [`crate::source::normalize`] strips from user input, so a
//! placeholder can only ever come from the extractor.

use std::fmt;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::{debug, warn};

use crate::error::ParseWarning;
use crate::escape::escape_html;
use crate::options::UnterminatedFence;

const FENCE: &str = "```";

pub(crate) const SENTINEL_OPEN: char = '\u{E000}';
pub(crate) const SENTINEL_CLOSE: char = '\u{E001}';

static PLACEHOLDER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("\u{E000}([0-9]+)\u{E001}").unwrap());

/// One extracted code block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlockRecord {
    /// Position in first-seen order.
    pub index: usize,
    /// Tag written after the opening fence, if any.
    pub language: Option<String>,
    /// Trimmed, already HTML-escaped code.
    pub code: String,
}

/// Marker standing in for a code block while the document is transformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder(pub usize);

impl Placeholder {
    /// Returns true when `text` opens with a placeholder.
    pub fn starts(text: &str) -> bool {
        text.starts_with(SENTINEL_OPEN)
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{SENTINEL_OPEN}{}{SENTINEL_CLOSE}", self.0)
    }
}

/// Ordered association between placeholder ordinals and their records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeBlocks {
    records: Vec<CodeBlockRecord>,
}

impl CodeBlocks {
    fn push(&mut self, language: Option<&str>, code: &str) -> Placeholder {
        let index = self.records.len();
        self.records.push(CodeBlockRecord {
            index,
            language: language.map(str::to_owned),
            code: escape_html(code.trim()).into_owned(),
        });
        Placeholder(index)
    }

    pub fn get(&self, index: usize) -> Option<&CodeBlockRecord> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CodeBlockRecord> {
        self.records.iter()
    }
}

/// Output of [`extract`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// Document with every code block replaced by its placeholder.
    pub text: String,
    pub blocks: CodeBlocks,
    pub warnings: Vec<ParseWarning>,
}

/// Replaces every fenced code block in `text` with a placeholder.
///
/// An opening fence is three backticks at the start of a line (indentation
/// allowed), followed by nothing or a single language tag on the rest of the
/// line. The first following triple backtick closes the block. Each
/// placeholder is surrounded by blank lines so the paragraph assembler always
/// sees it as a block of its own.
pub fn extract(text: &str, policy: UnterminatedFence) -> Extraction {
    let mut out = String::with_capacity(text.len());
    let mut blocks = CodeBlocks::default();
    let mut warnings = Vec::new();
    let mut cursor = 0;
    let mut search = 0;
    let mut lines = LineStarts::default();

    while let Some(rel) = text[search..].find(FENCE) {
        let open = search + rel;
        let info_start = open + FENCE.len();

        if !text[lines.advance(text, open)..open].trim().is_empty() {
            search = info_start;
            continue;
        }

        let line_end = text[info_start..]
            .find('\n')
            .map_or(text.len(), |i| info_start + i);

        let Some(language) = parse_info(&text[info_start..line_end]) else {
            search = info_start;
            continue;
        };

        let body_start = (line_end + 1).min(text.len());

        if let Some(rel_close) = text[body_start..].find(FENCE) {
            let close = body_start + rel_close;
            out.push_str(&text[cursor..open]);
            let placeholder = blocks.push(language, &text[body_start..close]);
            push_placeholder(&mut out, placeholder);
            cursor = close + FENCE.len();
            search = cursor;
            continue;
        }

        let line = text[..open].matches('\n').count() + 1;
        warn!(line, ?policy, "unterminated code fence");
        warnings.push(ParseWarning::UnterminatedFence {
            line,
            language: language.map(str::to_owned),
        });

        if policy == UnterminatedFence::CodeToEnd {
            out.push_str(&text[cursor..open]);
            let placeholder = blocks.push(language, &text[body_start..]);
            push_placeholder(&mut out, placeholder);
            cursor = text.len();
        }
        break;
    }

    out.push_str(&text[cursor..]);
    debug!(blocks = blocks.len(), "extracted code blocks");

    Extraction {
        text: out,
        blocks,
        warnings,
    }
}

/// Replaces every placeholder in `text` with the rendered code block.
///
/// Code is inserted exactly as stored; it was escaped during extraction.
pub fn restore(text: &str, blocks: &CodeBlocks) -> String {
    let mut restored = 0usize;
    let html = PLACEHOLDER_PATTERN.replace_all(text, |caps: &Captures<'_>| {
        let record = caps[1].parse::<usize>().ok().and_then(|i| blocks.get(i));
        match record {
            Some(record) => {
                restored += 1;
                render_block(record)
            }
            None => {
                warn!(ordinal = &caps[1], "no code block recorded for placeholder");
                String::new()
            }
        }
    });

    debug_assert_eq!(restored, blocks.len(), "placeholder/record mismatch");
    debug!(restored, "restored code blocks");
    html.into_owned()
}

fn render_block(record: &CodeBlockRecord) -> String {
    match &record.language {
        Some(language) => format!(
            "<pre><code class=\"language-{}\">{}</code></pre>",
            escape_html(language),
            record.code
        ),
        None => format!("<pre><code>{}</code></pre>", record.code),
    }
}

fn push_placeholder(out: &mut String, placeholder: Placeholder) {
    out.push_str("\n\n");
    out.push_str(&placeholder.to_string());
    out.push_str("\n\n");
}

/// Start of the line holding a fence candidate, tracked forward so each byte
/// is scanned once however many candidates share a line.
#[derive(Default)]
struct LineStarts {
    scanned: usize,
    line_start: usize,
}

impl LineStarts {
    /// `at` must not decrease between calls.
    fn advance(&mut self, text: &str, at: usize) -> usize {
        if let Some(i) = text[self.scanned..at].rfind('\n') {
            self.line_start = self.scanned + i + 1;
        }
        self.scanned = at;
        self.line_start
    }
}

/// `None` when the rest of the fence line is not a valid info string.
fn parse_info(info: &str) -> Option<Option<&str>> {
    let tag = info.trim();
    if tag.is_empty() {
        return Some(None);
    }

    tag.chars().all(is_tag_char).then_some(Some(tag))
}

fn is_tag_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '_' | '+' | '#' | '.' | '-')
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::time::{Duration, Instant};

    fn extract_default(text: &str) -> Extraction {
        extract(text, UnterminatedFence::CodeToEnd)
    }

    #[test]
    fn extracts_blocks_in_order() {
        let extraction = extract_default("```js\nlet a;\n```\ntext\n```\nplain\n```");
        let languages: Vec<_> = extraction
            .blocks
            .iter()
            .map(|record| (record.index, record.language.as_deref()))
            .collect();

        assert_eq!(languages, vec![(0, Some("js")), (1, None)]);
        assert_eq!(extraction.blocks.get(1).unwrap().code, "plain");
        assert!(extraction.warnings.is_empty());
    }

    #[test]
    fn placeholder_replaces_the_whole_fence() {
        let extraction = extract_default("before\n```py\nx = 1\n```\nafter");
        let expected = format!("before\n\n\n{}\n\n\nafter", Placeholder(0));

        assert_eq!(extraction.text, expected);
        assert!(!extraction.text.contains("```"));
    }

    #[test]
    fn code_is_trimmed_and_escaped_once() {
        let extraction = extract_default("```\n\n  <b>&amp;</b>  \n\n```");

        assert_eq!(
            extraction.blocks.get(0).unwrap().code,
            "&lt;b&gt;&amp;amp;&lt;/b&gt;"
        );
    }

    #[test]
    fn first_closing_fence_ends_the_block() {
        let extraction = extract_default("```\none\n```\n```\ntwo\n```");

        assert_eq!(extraction.blocks.len(), 2);
        assert_eq!(extraction.blocks.get(0).unwrap().code, "one");
        assert_eq!(extraction.blocks.get(1).unwrap().code, "two");
    }

    #[test]
    fn backticks_followed_by_prose_do_not_open_a_fence() {
        let extraction = extract_default("use ```this``` inline");

        assert!(extraction.blocks.is_empty());
        assert_eq!(extraction.text, "use ```this``` inline");
    }

    #[test]
    fn fence_must_open_a_line() {
        let extraction = extract_default("text ```js\ncode\n```");

        assert!(extraction.blocks.is_empty());
        assert!(extraction.warnings.is_empty());
    }

    #[test]
    fn many_rejected_openers_on_one_line_scan_linearly() {
        let input = format!("x{}", "```a b".repeat(200_000));
        let started = Instant::now();
        let extraction = extract_default(&input);

        assert!(extraction.blocks.is_empty());
        assert_eq!(extraction.text, input);
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn line_start_survives_skipped_blocks() {
        let extraction = extract_default("```\na\n```\nx ```\n```\nc\n```");

        assert_eq!(extraction.blocks.len(), 2);
        assert_eq!(extraction.blocks.get(1).unwrap().code, "c");
    }

    #[test]
    fn unterminated_fence_runs_to_end_by_default() {
        let extraction = extract_default("intro\n\n```rust\nfn main() {}\n");

        assert_eq!(extraction.blocks.len(), 1);
        assert_eq!(extraction.blocks.get(0).unwrap().code, "fn main() {}");
        assert_eq!(
            extraction.warnings,
            vec![ParseWarning::UnterminatedFence {
                line: 3,
                language: Some("rust".to_owned()),
            }]
        );
    }

    #[test]
    fn unterminated_fence_can_stay_literal() {
        let input = "intro\n```\nstill text";
        let extraction = extract(input, UnterminatedFence::Literal);

        assert!(extraction.blocks.is_empty());
        assert_eq!(extraction.text, input);
        assert_eq!(extraction.warnings.len(), 1);
    }

    #[test]
    fn restore_renders_language_class() {
        let extraction = extract_default("```js\na < b\n```\n\n```\nplain\n```");
        let html = restore(&extraction.text, &extraction.blocks);

        assert!(html.contains("<pre><code class=\"language-js\">a &lt; b</code></pre>"));
        assert!(html.contains("<pre><code>plain</code></pre>"));
        assert!(!html.contains(SENTINEL_OPEN));
    }

    #[test]
    fn unknown_placeholder_restores_to_nothing() {
        let text = format!("a{}b", Placeholder(3));

        assert_eq!(restore(&text, &CodeBlocks::default()), "ab");
    }

    #[test]
    fn extraction_state_is_per_call() {
        let first = extract_default("```\na\n```");
        let second = extract_default("```\nb\n```");

        assert_eq!(first.blocks.get(0).unwrap().index, 0);
        assert_eq!(second.blocks.get(0).unwrap().index, 0);
    }
}
