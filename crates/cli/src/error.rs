//! CLI error types.

use inkdown_core::RenderError;

use crate::config::ConfigError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("Failed to load {origin}: {cause}")]
    Load {
        origin: String,
        #[source]
        cause: std::io::Error,
    },

    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Render(#[from] RenderError),

    #[error("{0}")]
    Io(#[from] std::io::Error),
}
