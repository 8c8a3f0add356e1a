use inkdown_core::{HighlightOptions, RenderOptions, StreamingRewriter};
use js_sys::Function;
use std::io::{self, Write};
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::*;

/// Renders markdown into an HTML `String`, highlighting code blocks.
#[wasm_bindgen(js_name = render_html)]
pub fn render_html(input: &str) -> Result<String, JsError> {
    inkdown_core::render(input, &RenderOptions::default())
        .map(|rendered| rendered.html)
        .map_err(to_js_error)
}

/// Renders markdown without the highlight pass.
///
/// Hosts that insert the HTML into the DOM themselves call [`highlight_code`]
/// on each realized `code` element afterwards.
#[wasm_bindgen(js_name = parse_markdown)]
pub fn parse_markdown(input: &str) -> String {
    inkdown_core::parse(input)
}

/// Highlights the escaped content of one code element.
///
/// Returns the content unchanged when `language` has no highlighter.
#[wasm_bindgen(js_name = highlight_code)]
pub fn highlight_code(language: &str, escaped: &str) -> String {
    inkdown_core::highlight_code(language, escaped).unwrap_or_else(|| escaped.to_owned())
}

/// Streams rendered HTML chunks into the provided JavaScript callback.
///
/// The callback is invoked with each UTF-8 chunk produced by the streaming
/// rewriter, so callers can forward output to a `WritableStream`, append to the
/// DOM incrementally, or buffer it manually.
#[wasm_bindgen(js_name = stream_html)]
pub fn stream_html(
    input: &str,
    chunk_callback: &Function,
    highlight: Option<bool>,
) -> Result<(), JsError> {
    let options = HighlightOptions {
        highlight_code_blocks: highlight.unwrap_or(true),
    };

    let html = inkdown_core::parse(input);
    let writer = JsChunkWriter::new(chunk_callback.clone());
    let mut rewriter = StreamingRewriter::new(writer, options);

    rewriter
        .write_all(html.as_bytes())
        .map_err(|err| JsError::new(&err.to_string()))?;

    rewriter
        .into_inner()
        .map_err(|err| JsError::new(&err.to_string()))?;
    Ok(())
}

fn to_js_error<E: ToString>(err: E) -> JsError {
    JsError::new(&err.to_string())
}

struct JsChunkWriter {
    callback: Function,
}

impl JsChunkWriter {
    fn new(callback: Function) -> Self {
        Self { callback }
    }
}

impl Write for JsChunkWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let chunk = std::str::from_utf8(buf)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;

        self.callback
            .call1(&JsValue::UNDEFINED, &JsValue::from_str(chunk))
            .map_err(js_callback_error)?;

        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn js_callback_error(err: JsValue) -> io::Error {
    let message = err
        .as_string()
        .or_else(|| {
            js_sys::JSON::stringify(&err)
                .ok()
                .and_then(|s| s.as_string())
        })
        .unwrap_or_else(|| "callback threw".to_string());
    io::Error::other(message)
}
