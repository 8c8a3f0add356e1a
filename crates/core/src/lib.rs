//! Inkdown renders a small Markdown subset to HTML and highlights the code
//! blocks of the rendered document.
//!
//! The pipeline is a sequence of text passes:
//!
//! 1. [`source::normalize`] canonicalizes line endings.
//! 2. [`fence::extract`] swaps fenced code blocks for placeholders, escaping
//!    their code once.
//! 3. [`transform::transform`] applies heading, emphasis, inline code, link and
//!    list rules.
//! 4. [`paragraph::assemble`] wraps the remaining text in paragraphs.
//! 5. [`fence::restore`] puts the code blocks back.
//!
//! Highlighting is a separate pass over the resulting HTML
//! ([`highlight_html`], [`StreamingRewriter`]), so hosts that insert the HTML
//! themselves can run it later against the realized code elements
//! ([`highlight_code`]).

pub mod adapter;
pub mod error;
pub mod escape;
pub mod fence;
pub mod highlight;
pub mod options;
pub mod paragraph;
pub mod source;
pub mod streaming_rewriter;
pub mod transform;

use std::io::Write;

use tracing::debug;

pub use adapter::PipeAdapter;
pub use error::{ParseWarning, RenderError};
pub use escape::escape_html;
pub use highlight::{HighlightToken, Language, highlight_code};
pub use options::{RenderOptions, UnterminatedFence};
pub use streaming_rewriter::{HighlightOptions, StreamingRewriter, highlight_html};

/// Result of [`render`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub html: String,
    /// Number of fenced code blocks found in the input.
    pub code_blocks: usize,
    pub warnings: Vec<ParseWarning>,
}

/// Renders Markdown to HTML with default options and no highlighting.
///
/// Never fails: malformed constructs stay literal text.
pub fn parse(input: &str) -> String {
    run_pipeline(input, &RenderOptions::default()).html
}

/// Renders Markdown to HTML, highlighting code blocks when enabled.
pub fn render(input: &str, options: &RenderOptions) -> Result<Rendered, RenderError> {
    let mut rendered = run_pipeline(input, options);

    if options.highlight {
        rendered.html = highlight_html(&rendered.html)?;
    }

    Ok(rendered)
}

/// Renders Markdown straight into `writer` and returns the parse warnings.
pub fn render_to_writer<W: Write>(
    input: &str,
    options: &RenderOptions,
    writer: W,
) -> Result<Vec<ParseWarning>, RenderError> {
    let rendered = run_pipeline(input, options);
    let highlight = HighlightOptions {
        highlight_code_blocks: options.highlight,
    };

    PipeAdapter::new(writer, highlight).drive(&rendered.html)?;
    Ok(rendered.warnings)
}

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

fn run_pipeline(input: &str, options: &RenderOptions) -> Rendered {
    let normalized = source::normalize(input);
    let fence::Extraction {
        text,
        blocks,
        warnings,
    } = fence::extract(&normalized, options.unterminated_fence);

    let transformed = transform::transform(&text, options.escape_inline);
    let assembled = paragraph::assemble(&transformed);
    let html = fence::restore(&assembled, &blocks);

    debug!(
        input_bytes = input.len(),
        output_bytes = html.len(),
        code_blocks = blocks.len(),
        "rendered markdown"
    );

    Rendered {
        html,
        code_blocks: blocks.len(),
        warnings,
    }
}
