//! CLI error types.

use mdoc_clidoc::ClidocError;
use mdoc_config::ConfigError;
use mdoc_index::IndexError;
use mdoc_pages::PagesError;
use mdoc_server::ServerError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Pages(#[from] PagesError),

    #[error("{0}")]
    Index(#[from] IndexError),

    #[error("{0}")]
    Clidoc(#[from] ClidocError),

    #[error("{0}")]
    Server(#[from] ServerError),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Validation(String),
}
