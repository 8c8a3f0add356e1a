#![deny(missing_docs)]
//! Node.js bindings that surface Inkdown's Rust implementation.

use inkdown_core::RenderOptions;
use napi::{Error, Result};
use napi_derive::napi;

/// Returns the version string reported by the core crate.
#[napi]
pub fn version() -> String {
    inkdown_core::version().to_string()
}

/// Renders markdown into highlighted HTML.
#[napi]
pub fn render(input: String) -> Result<String> {
    inkdown_core::render(&input, &RenderOptions::default())
        .map(|rendered| rendered.html)
        .map_err(|err| Error::from_reason(err.to_string()))
}

/// Highlights the escaped content of one code element, or returns `null` for
/// languages without a highlighter.
#[napi]
pub fn highlight_code(language: String, escaped: String) -> Option<String> {
    inkdown_core::highlight_code(&language, &escaped)
}
