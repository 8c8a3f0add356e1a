use std::io::{self, Write};

use crate::streaming_rewriter::{HighlightOptions, StreamingRewriter};

/// A bridge that pushes a rendered document through the highlight rewriter
/// and into an `io::Write`, without building the highlighted document in memory.
pub struct PipeAdapter<W> {
    writer: W,
    options: HighlightOptions,
}

impl<W: Write> PipeAdapter<W> {
    /// Create a new adapter wrapping an IO writer
    pub fn new(writer: W, options: HighlightOptions) -> Self {
        Self { writer, options }
    }

    /// Streams `html` line by line into the writer and returns it once flushed.
    pub fn drive(self, html: &str) -> io::Result<W> {
        let mut rewriter = StreamingRewriter::new(self.writer, self.options);

        for line in html.split_inclusive('\n') {
            rewriter.write_all(line.as_bytes())?;
        }

        let mut writer = rewriter.into_inner()?;
        writer.flush()?;
        Ok(writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_streaming_output() {
        let html = "<h1>Hello Stream</h1>\n<pre><code class=\"language-c\">return 0;\n</code></pre>";
        let mut output_buffer = Vec::new();

        let adapter = PipeAdapter::new(&mut output_buffer, HighlightOptions::default());
        adapter.drive(html).expect("Failed to drive stream");

        let output_str = String::from_utf8(output_buffer).unwrap();

        assert!(output_str.contains("<h1>Hello Stream</h1>"));
        assert!(output_str.contains("<span class=\"hl-keyword\">return</span>"));
    }
}
