//! Router construction.
//!
//! Builds the axum router with all routes and middleware.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::security;
use crate::state::AppState;

/// Create the application router.
///
/// API routes are matched first; every other path is looked up as a
/// redirect source, a page under the base path or a topic link.
pub(crate) fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        .route("/api/navigation", get(handlers::navigation::get_navigation))
        .route("/api/redirects", get(handlers::redirects::get_redirects))
        .route("/api/resolve", get(handlers::redirects::resolve));

    Router::new()
        .merge(api_routes)
        .fallback(handlers::pages::serve_path)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(security::csp_layer())
                .layer(security::content_type_options_layer())
                .layer(security::frame_options_layer()),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use mdoc_index::SiteIndex;
    use mdoc_pages::{Corpus, CorpusConfig};
    use pretty_assertions::assert_eq;
    use tower::ServiceExt;

    const INDEX: &str = "\
# Home

| Level | Path | Navlink |
| -- | -- | -- |
| 1 | | Tutorials |
| 2 | install-maas | [Install MAAS](/t/install-maas/5128) |

| Path | Location |
| -- | -- |
| /docs/old-install | /docs/install-maas#setup |
| /t/legacy/42 | /docs/install-maas |
| /docs/loop-a | /docs/loop-b |
| /docs/loop-b | /docs/loop-a |
";

    fn app() -> (tempfile::TempDir, Router) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.md"), INDEX).unwrap();
        std::fs::write(
            dir.path().join("install-maas.md"),
            "# Install MAAS\n\n## Setup\n\nRun it.\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("réseau.md"), "# Réseau\n\nVLANs.\n").unwrap();

        let corpus = Corpus::load(&CorpusConfig {
            source_dir: dir.path().to_path_buf(),
            base_path: "/docs".to_owned(),
            topic_prefix: "/t/".to_owned(),
            article_delimiter: "<!-- split -->".to_owned(),
            exclude: Vec::new(),
        })
        .unwrap();
        let index = SiteIndex::load(&dir.path().join("index.md"), 10).unwrap();
        let state = Arc::new(AppState::new(corpus, index, "/t/".to_owned()));
        (dir, create_router(state))
    }

    async fn get(router: Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, String) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, headers, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_page_renders_with_breadcrumbs() {
        let (_dir, router) = app();

        let (status, headers, body) = get(router, "/docs/install-maas").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
        assert_eq!(headers[header::X_FRAME_OPTIONS], "DENY");
        assert!(body.contains("<title>Install MAAS</title>"));
        assert!(body.contains("<nav class=\"breadcrumbs\">Tutorials</nav>"));
        assert!(body.contains("<h2 id=\"setup\">Setup</h2>"));
    }

    #[tokio::test]
    async fn test_percent_encoded_path_serves_page() {
        let (_dir, router) = app();

        let (status, _, body) = get(router, "/docs/r%C3%A9seau").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<title>Réseau</title>"));
    }

    #[tokio::test]
    async fn test_redirect_source_moves_permanently() {
        let (_dir, router) = app();

        let (status, headers, _) = get(router.clone(), "/docs/old-install").await;
        assert_eq!(status, StatusCode::MOVED_PERMANENTLY);
        assert_eq!(headers[header::LOCATION], "/docs/install-maas#setup");

        let (status, headers, _) = get(router, "/t/legacy/42").await;
        assert_eq!(status, StatusCode::MOVED_PERMANENTLY);
        assert_eq!(headers[header::LOCATION], "/docs/install-maas");
    }

    #[tokio::test]
    async fn test_topic_link_serves_page() {
        let (_dir, router) = app();

        let (status, _, body) = get(router, "/t/install-maas/5128").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<title>Install MAAS</title>"));
    }

    #[tokio::test]
    async fn test_unknown_path_is_json_404() {
        let (_dir, router) = app();

        let (status, _, body) = get(router, "/docs/nowhere").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["error"], "Page not found");
        assert_eq!(json["path"], "/docs/nowhere");
    }

    #[tokio::test]
    async fn test_redirect_loop_is_unprocessable() {
        let (_dir, router) = app();

        let (status, _, _) = get(router, "/docs/loop-a").await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_api_navigation() {
        let (_dir, router) = app();

        let (status, _, body) = get(router, "/api/navigation").await;

        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["items"][0]["title"], "Tutorials");
        assert_eq!(json["items"][0]["children"][0]["path"], "install-maas");
    }

    #[tokio::test]
    async fn test_api_redirects_and_resolve() {
        let (_dir, router) = app();

        let (_, _, body) = get(router.clone(), "/api/redirects").await;
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["rules"].as_array().unwrap().len(), 4);
        assert_eq!(json["rules"][0]["from"], "/docs/old-install");
        assert!(json["rules"][0].get("line").is_none());

        let (status, _, body) = get(router.clone(), "/api/resolve?path=/docs/old-install").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["status"], "redirect");
        assert_eq!(json["target"], "/docs/install-maas#setup");
        assert_eq!(json["hops"], 1);

        let (_, _, body) = get(router.clone(), "/api/resolve?path=/docs/install-maas").await;
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["status"], "page");

        let (status, _, body) = get(router, "/api/resolve?path=/docs/loop-a").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body.contains("redirect loop"));
    }
}
