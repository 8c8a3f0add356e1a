//! Streaming HTML rewriter that highlights rendered code blocks through lol_html.
//!
//! The highlighter runs against realized `<code class="language-*">` elements,
//! not against the Markdown source. Text inside such an element is buffered
//! until the end of its text node, then replaced with the highlighted markup.
//! The text is already escaped, so it is re-emitted as HTML without another
//! escaping pass.

use lol_html::errors::RewritingError;
use lol_html::html_content::ContentType;
use lol_html::{HtmlRewriter, OutputSink, Selector, Settings, element, text};
use std::borrow::Cow;
use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;
use tracing::debug;

use crate::error::RenderError;
use crate::highlight::Language;

const CODE_SELECTOR: &str = "code[class]";

/// Configuration flags that control how the streaming rewriter manipulates HTML.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightOptions {
    /// When enabled, code elements tagged with a supported language are highlighted.
    pub highlight_code_blocks: bool,
}

impl Default for HighlightOptions {
    fn default() -> Self {
        HighlightOptions {
            highlight_code_blocks: true,
        }
    }
}

/// Implements [`Write`] so rendered HTML can be pushed straight into lol_html.
///
/// The destination writer is shared through a single `Rc<RefCell<Option<W>>>`,
/// which is what lol_html's `OutputSink` needs without buffering the rewritten
/// output.
pub struct StreamingRewriter<W: Write> {
    rewriter: Option<HtmlRewriter<'static, OutputProxy<W>>>,
    target: Rc<RefCell<Option<W>>>,
    sink_error: Rc<RefCell<Option<io::Error>>>,
}

impl<W: Write> StreamingRewriter<W> {
    /// Creates a rewriter that forwards lol_html output into `writer`.
    pub fn new(writer: W, options: HighlightOptions) -> Self {
        let target = Rc::new(RefCell::new(Some(writer)));
        let sink_error = Rc::new(RefCell::new(None));
        let output_sink = OutputProxy::new(Rc::clone(&target), Rc::clone(&sink_error));
        let settings = options.into_settings();
        let rewriter = HtmlRewriter::new(settings, output_sink);

        Self {
            rewriter: Some(rewriter),
            target,
            sink_error,
        }
    }

    /// Consumes the rewriter, ensures lol_html has flushed, and returns the underlying writer.
    pub fn into_inner(mut self) -> io::Result<W> {
        self.finalize_if_needed()?;

        let cell = Rc::try_unwrap(self.target)
            .map_err(|_| io::Error::other("rewriter still borrowed"))?;

        cell.into_inner()
            .ok_or_else(|| io::Error::new(io::ErrorKind::BrokenPipe, "writer missing"))
    }

    fn finalize_if_needed(&mut self) -> io::Result<()> {
        if let Some(rewriter) = self.rewriter.take() {
            rewriter.end().map_err(rewriting_error_to_io)?;
        }

        Self::take_sink_error(&self.sink_error)
    }

    fn take_sink_error(cell: &Rc<RefCell<Option<io::Error>>>) -> io::Result<()> {
        if let Some(err) = cell.borrow_mut().take() {
            Err(err)
        } else {
            Ok(())
        }
    }
}

impl<W: Write> Write for StreamingRewriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let rewriter = self
            .rewriter
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::BrokenPipe, "rewriter finalized"))?;

        rewriter.write(buf).map_err(rewriting_error_to_io)?;
        Self::take_sink_error(&self.sink_error)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.finalize_if_needed()
    }
}

impl HighlightOptions {
    fn into_settings(self) -> Settings<'static, 'static> {
        let mut settings = Settings::default();
        let mut handlers = Vec::new();

        if self.highlight_code_blocks {
            handlers.extend(code_highlight_handlers());
        }

        settings.element_content_handlers = handlers;
        settings
    }
}

/// Highlights every supported code element of an HTML document.
pub fn highlight_html(html: &str) -> Result<String, RenderError> {
    let mut rewriter =
        StreamingRewriter::new(Vec::with_capacity(html.len()), HighlightOptions::default());
    rewriter.write_all(html.as_bytes())?;
    let bytes = rewriter.into_inner()?;
    Ok(String::from_utf8(bytes)?)
}

fn code_highlight_handlers() -> [(
    Cow<'static, Selector>,
    lol_html::ElementContentHandlers<'static>,
); 2] {
    let current: Rc<RefCell<Option<Language>>> = Rc::default();
    let pending: Rc<RefCell<String>> = Rc::default();
    let on_element = Rc::clone(&current);
    let on_element_pending = Rc::clone(&pending);

    [
        element!(CODE_SELECTOR, move |el| {
            let language = el
                .get_attribute("class")
                .as_deref()
                .and_then(Language::from_class_attr);
            *on_element.borrow_mut() = language;
            on_element_pending.borrow_mut().clear();
            Ok(())
        }),
        text!(CODE_SELECTOR, move |chunk| {
            let Some(language) = *current.borrow() else {
                return Ok(());
            };

            let mut buffer = pending.borrow_mut();
            buffer.push_str(chunk.as_str());

            if chunk.last_in_text_node() {
                let code = std::mem::take(&mut *buffer);
                debug!(
                    language = language.name(),
                    bytes = code.len(),
                    "highlighting code element"
                );
                chunk.replace(&language.highlight(&code), ContentType::Html);
            } else {
                chunk.remove();
            }

            Ok(())
        }),
    ]
}

fn rewriting_error_to_io(err: RewritingError) -> io::Error {
    io::Error::other(err)
}

struct OutputProxy<W: Write> {
    target: Rc<RefCell<Option<W>>>,
    sink_error: Rc<RefCell<Option<io::Error>>>,
}

impl<W: Write> OutputProxy<W> {
    fn new(target: Rc<RefCell<Option<W>>>, sink_error: Rc<RefCell<Option<io::Error>>>) -> Self {
        OutputProxy { target, sink_error }
    }
}

impl<W: Write> OutputSink for OutputProxy<W> {
    fn handle_chunk(&mut self, chunk: &[u8]) {
        if chunk.is_empty() {
            return;
        }

        if self.sink_error.borrow().is_some() {
            return;
        }

        let mut borrow = self.target.borrow_mut();

        if let Some(writer) = borrow.as_mut() {
            if let Err(err) = writer.write_all(chunk) {
                *self.sink_error.borrow_mut() = Some(err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn rewrite_in_chunks(html: &str, chunk_size: usize, options: HighlightOptions) -> String {
        let mut rewriter = StreamingRewriter::new(Vec::new(), options);
        for chunk in html.as_bytes().chunks(chunk_size) {
            rewriter
                .write_all(chunk)
                .expect("stream write should succeed");
        }
        String::from_utf8(rewriter.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn highlights_tagged_code_elements() {
        let output = highlight_html(
            "<p>x</p>\n<pre><code class=\"language-js\">let x = 1; // demo</code></pre>",
        )
        .unwrap();

        assert_eq!(
            output,
            "<p>x</p>\n<pre><code class=\"language-js\"><span class=\"hl-keyword\">let</span> x = \
             <span class=\"hl-number\">1</span>; <span class=\"hl-comment\">// demo</span></code></pre>"
        );
    }

    #[test]
    fn leaves_unsupported_languages_untouched() {
        let html = "<pre><code class=\"language-haskell\">let x = 1</code></pre><code>if</code>";

        assert_eq!(highlight_html(html).unwrap(), html);
    }

    #[test]
    fn buffers_text_split_across_writes() {
        let html = "<pre><code class=\"language-python\">def run(): return &quot;ok&quot;</code></pre>";
        let output = rewrite_in_chunks(html, 3, HighlightOptions::default());

        assert_eq!(
            output,
            "<pre><code class=\"language-python\"><span class=\"hl-keyword\">def</span> \
             <span class=\"hl-function\">run</span>(): <span class=\"hl-keyword\">return</span> \
             <span class=\"hl-string\">&quot;ok&quot;</span></code></pre>"
        );
    }

    #[test]
    fn disabled_highlighting_passes_html_through() {
        let html = "<pre><code class=\"language-c\">int x;</code></pre>";
        let options = HighlightOptions {
            highlight_code_blocks: false,
        };

        assert_eq!(rewrite_in_chunks(html, 5, options), html);
    }
}
