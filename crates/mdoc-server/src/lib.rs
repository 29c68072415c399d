//! HTTP preview server for mdoc documentation.
//!
//! Loads the corpus and index page once at startup and serves:
//! - article previews under the base path and at topic links;
//! - `301` responses for redirect table sources;
//! - JSON endpoints for the navigation tree and redirect resolution.
//!
//! # Quick Start
//!
//! ```ignore
//! use mdoc_server::{run_server, server_config_from_config};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = mdoc_config::Config::load(None, None).unwrap();
//!     run_server(server_config_from_config(&config)).await.unwrap();
//! }
//! ```
//!
//! # Routes
//!
//! ```text
//! GET /api/navigation          navigation tree
//! GET /api/redirects           effective redirect rules
//! GET /api/resolve?path=...    resolution of one path
//! GET <anything else>          301 redirect, HTML page or 404
//! ```

mod app;
mod error;
mod handlers;
mod middleware;
mod render;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use mdoc_index::SiteIndex;
use mdoc_pages::{Corpus, CorpusConfig};
use state::AppState;

pub use error::ServerError;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Corpus to serve.
    pub corpus: CorpusConfig,
    /// Index page with the navigation and redirect tables.
    pub index_path: PathBuf,
    /// Redirect chain limit.
    pub max_hops: usize,
}

/// Run the server until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the corpus or index cannot be loaded, or the
/// listener cannot be bound.
pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let corpus = Corpus::load(&config.corpus)?;
    let index = SiteIndex::load(&config.index_path, config.max_hops)?;
    tracing::info!(articles = corpus.len(), "Loaded corpus");

    let state = Arc::new(AppState::new(
        corpus,
        index,
        config.corpus.topic_prefix.clone(),
    ));
    let app = app::create_router(state);

    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(address = %addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from mdoc config.
#[must_use]
pub fn server_config_from_config(config: &mdoc_config::Config) -> ServerConfig {
    let docs = &config.docs_resolved;
    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        corpus: CorpusConfig {
            source_dir: docs.source_dir.clone(),
            base_path: docs.base_path.clone(),
            topic_prefix: config.links.topic_prefix.clone(),
            article_delimiter: docs.article_delimiter.clone(),
            exclude: docs.exclude.clone(),
        },
        index_path: docs.index_path(),
        max_hops: config.redirects.max_hops,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_server_config_from_config() {
        let config = mdoc_config::Config::default();

        let server = server_config_from_config(&config);

        assert_eq!(server.host, "127.0.0.1");
        assert_eq!(server.port, 7979);
        assert_eq!(server.corpus.topic_prefix, "/t/");
        assert_eq!(server.max_hops, 10);
        assert_eq!(server.index_path, config.docs_resolved.index_path());
    }
}
