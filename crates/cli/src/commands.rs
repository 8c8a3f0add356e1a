//! `render` and `languages` subcommands.

use clap::Args;
use inkdown_core::{Language, ParseWarning, render_to_writer};
use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::{self, CliSettings};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the `render` command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Markdown file to render. Reads stdin when omitted or `-`.
    source: Option<PathBuf>,

    /// Write HTML to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// TOML file with a `[render]` section.
    #[arg(long, env = "INKDOWN_CONFIG")]
    config: Option<PathBuf>,

    /// Skip the syntax highlight pass.
    #[arg(long)]
    no_highlight: bool,

    /// Insert inline code and link URLs without escaping.
    #[arg(long)]
    raw_inline: bool,

    /// Leave an unterminated code fence as plain text.
    #[arg(long)]
    literal_unterminated: bool,

    /// Enable debug logging.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl RenderArgs {
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let settings = CliSettings {
            no_highlight: self.no_highlight,
            raw_inline: self.raw_inline,
            literal_unterminated: self.literal_unterminated,
        };
        let options = config::load(self.config.as_deref(), &settings)?;
        let markdown = load_source(self.source.as_deref())?;
        info!(bytes = markdown.len(), ?options, "loaded markdown");

        let warnings = match &self.output {
            Some(path) => {
                let file = File::create(path)?;
                let warnings = render_to_writer(&markdown, &options, BufWriter::new(file))?;
                output.info(&format!("Wrote {}", path.display()));
                warnings
            }
            None => render_to_writer(&markdown, &options, io::stdout().lock())?,
        };

        report_warnings(output, &warnings);
        Ok(())
    }
}

/// Prints each supported language with its fence tags.
pub(crate) fn list_languages(mut out: impl Write) -> io::Result<()> {
    for language in Language::ALL {
        writeln!(out, "{}: {}", language.name(), language.tags().join(", "))?;
    }
    Ok(())
}

fn load_source(source: Option<&Path>) -> Result<String, CliError> {
    match source {
        Some(path) if path != Path::new("-") => {
            std::fs::read_to_string(path).map_err(|cause| CliError::Load {
                origin: path.display().to_string(),
                cause,
            })
        }
        _ => {
            let mut markdown = String::new();
            io::stdin()
                .read_to_string(&mut markdown)
                .map_err(|cause| CliError::Load {
                    origin: "stdin".to_owned(),
                    cause,
                })?;
            Ok(markdown)
        }
    }
}

fn report_warnings(output: &Output, warnings: &[ParseWarning]) {
    for warning in warnings {
        output.warning(&format!("warning: {warning}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_source_is_a_load_failure() {
        let err = load_source(Some(Path::new("/nonexistent/page.md"))).unwrap_err();

        assert!(matches!(err, CliError::Load { .. }));
        assert!(
            err.to_string()
                .starts_with("Failed to load /nonexistent/page.md:")
        );
    }

    #[test]
    fn reads_source_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.md");
        std::fs::write(&path, "# Page\n").unwrap();

        assert_eq!(load_source(Some(&path)).unwrap(), "# Page\n");
    }

    #[test]
    fn lists_every_language() {
        let mut out = Vec::new();
        list_languages(&mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "C family: c, cpp, c++\nPython: python\nJavaScript: js, javascript\n"
        );
    }
}
