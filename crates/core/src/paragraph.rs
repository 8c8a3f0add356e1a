use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::fence::Placeholder;

static BLANK_LINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n[ \t]*\n").unwrap());

static BLOCK_OPENER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^<(?:h[1-6]|ul)>").unwrap());

/// Groups transformed text into paragraphs.
///
/// Blocks are separated by blank lines. A block that already opens with a
/// heading, a list or a code block placeholder is kept as is; any other block
/// becomes a `<p>` with `<br>` for each internal newline. Empty blocks are
/// dropped.
///
/// Only the start of a block is inspected. A text line directly followed by
/// list items, with no blank line between them, yields a `<ul>` nested in the
/// `<p>`, which browsers will repair by closing the paragraph early. Leave a
/// blank line before a list to keep the output valid.
pub fn assemble(text: &str) -> String {
    let blocks: Vec<String> = BLANK_LINES
        .split(text)
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .map(|block| {
            if is_block_level(block) {
                block.to_owned()
            } else {
                format!("<p>{}</p>", block.replace('\n', "<br>"))
            }
        })
        .collect();

    debug!(blocks = blocks.len(), "assembled blocks");
    blocks.join("\n")
}

fn is_block_level(block: &str) -> bool {
    Placeholder::starts(block) || BLOCK_OPENER.is_match(block)
}
