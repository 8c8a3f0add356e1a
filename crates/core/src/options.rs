/// What the extractor does with an opening fence that is never closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum UnterminatedFence {
    /// Everything after the opening line becomes the code block body.
    #[default]
    CodeToEnd,
    /// The fence and the rest of the document stay ordinary text.
    Literal,
}

/// Flags that control a single render call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RenderOptions {
    /// Run the syntax highlighter over the rendered code blocks.
    pub highlight: bool,
    /// Escape inline code content and link URLs.
    ///
    /// Disabling this inserts both verbatim, so untrusted input can inject markup
    /// through backtick spans and `[text](url)` links.
    pub escape_inline: bool,
    /// Policy for a fence without a closing delimiter.
    pub unterminated_fence: UnterminatedFence,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            highlight: true,
            escape_inline: true,
            unterminated_fence: UnterminatedFence::default(),
        }
    }
}
