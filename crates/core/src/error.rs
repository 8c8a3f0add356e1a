use std::io;
use std::string::FromUtf8Error;

use thiserror::Error;

/// Failures of the HTML rewriting and writer plumbing.
///
/// The Markdown pipeline itself never fails; only the highlight pass and the
/// writers it feeds can.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to write rendered html: {0}")]
    Io(#[from] io::Error),

    #[error("rewritten html is not valid utf-8: {0}")]
    Utf8(#[from] FromUtf8Error),
}

/// Recoverable problems found while parsing. The document still renders.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseWarning {
    #[error("code fence opened on line {line} is never closed")]
    UnterminatedFence {
        /// 1-based line of the opening fence.
        line: usize,
        language: Option<String>,
    },
}
