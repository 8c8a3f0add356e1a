//! Render options loaded from an `inkdown.toml` file.
//!
//! ```toml
//! [render]
//! highlight = true
//! escape_inline = true
//! unterminated_fence = "code_to_end" # or "literal"
//! ```

use inkdown_core::{RenderOptions, UnterminatedFence};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Command line flags that override configuration file values.
///
/// Each flag only ever turns a behavior off, so `false` means "keep the file value".
#[derive(Debug, Default)]
pub(crate) struct CliSettings {
    pub(crate) no_highlight: bool,
    pub(crate) raw_inline: bool,
    pub(crate) literal_unterminated: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    render: RenderOptions,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ConfigError {
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Loads options from `config_path` (or defaults) and applies `settings` on top.
pub(crate) fn load(
    config_path: Option<&Path>,
    settings: &CliSettings,
) -> Result<RenderOptions, ConfigError> {
    let mut options = match config_path {
        Some(path) => {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            let content = std::fs::read_to_string(path)?;
            toml::from_str::<ConfigFile>(&content)?.render
        }
        None => RenderOptions::default(),
    };

    apply_cli_settings(&mut options, settings);
    Ok(options)
}

fn apply_cli_settings(options: &mut RenderOptions, settings: &CliSettings) {
    if settings.no_highlight {
        options.highlight = false;
    }
    if settings.raw_inline {
        options.escape_inline = false;
    }
    if settings.literal_unterminated {
        options.unterminated_fence = UnterminatedFence::Literal;
    }
}
