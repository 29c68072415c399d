//! Error types for the HTTP server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// No page or redirect at the given path.
    #[error("Page not found: {0}")]
    PageNotFound(String),

    /// Redirect chain for a request cannot be followed.
    #[error(transparent)]
    Redirect(#[from] mdoc_index::RedirectError),

    /// Corpus could not be loaded at startup.
    #[error(transparent)]
    Pages(#[from] mdoc_pages::PagesError),

    /// Index page could not be loaded at startup.
    #[error(transparent)]
    Index(#[from] mdoc_index::IndexError),

    /// Listen address is not valid.
    #[error("Invalid listen address: {0}")]
    Address(#[from] std::net::AddrParseError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::PageNotFound(path) => (
                StatusCode::NOT_FOUND,
                json!({"error": "Page not found", "path": path}),
            ),
            Self::Redirect(e) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({"error": e.to_string()}),
            ),
            Self::Pages(_) | Self::Index(_) | Self::Address(_) | Self::Io(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({"error": self.to_string()}),
            ),
        };

        (status, axum::Json(body)).into_response()
    }
}
