//! Page routes.
//!
//! Serves article previews under the base path and topic links, answering
//! redirect sources with `301 Moved Permanently`.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{StatusCode, Uri, header};
use axum::response::{Html, IntoResponse, Response};
use mdoc_index::Resolution;
use mdoc_pages::Article;
use percent_encoding::percent_decode_str;

use crate::error::ServerError;
use crate::render::render_page;
use crate::state::AppState;

/// Handle any path not matched by an API route.
pub(crate) async fn serve_path(
    State(state): State<Arc<AppState>>,
    uri: Uri,
) -> Result<Response, ServerError> {
    let path = percent_decode_str(uri.path()).decode_utf8_lossy();

    match state
        .index
        .redirects
        .resolve(&path, |p| state.corpus.is_page_url(p))?
    {
        Resolution::Redirect { target, hops } => {
            tracing::debug!(path = %path, target = %target, hops, "Redirecting");
            Ok((StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, target)]).into_response())
        }
        Resolution::Page { path } => {
            let article = state
                .corpus
                .slug_for_url(&path)
                .and_then(|slug| state.corpus.get(slug))
                .ok_or_else(|| ServerError::PageNotFound(path.clone()))?;
            Ok(page_response(&state, article))
        }
        Resolution::NotFound { path } => {
            let topic = path
                .strip_prefix(state.topic_prefix.as_str())
                .and_then(topic_slug)
                .and_then(|slug| state.topic_article(slug));
            match topic {
                Some(article) => Ok(page_response(&state, article)),
                None => Err(ServerError::PageNotFound(path)),
            }
        }
    }
}

/// Slug part of a `{slug}/{id}` topic path.
fn topic_slug(rest: &str) -> Option<&str> {
    let mut parts = rest.trim_matches('/').split('/');
    let slug = parts.next().filter(|s| !s.is_empty())?;
    match (parts.next(), parts.next()) {
        (Some(id), None) if id.bytes().all(|b| b.is_ascii_digit()) => Some(slug),
        (None, None) => Some(slug),
        _ => None,
    }
}

fn page_response(state: &AppState, article: &Article) -> Response {
    let breadcrumbs = state.index.navigation.breadcrumbs(&article.slug);
    Html(render_page(article, &breadcrumbs, |p| state.corpus.url_for(p))).into_response()
}
