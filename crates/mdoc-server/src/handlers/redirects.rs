//! Redirect API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use mdoc_index::{RedirectRule, Resolution};
use serde::{Deserialize, Serialize};

use crate::error::ServerError;
use crate::state::AppState;

/// Response for GET /api/redirects.
#[derive(Serialize)]
pub(crate) struct RedirectsResponse {
    /// Effective rules, first row per source.
    rules: Vec<RedirectRule>,
}

/// Query for GET /api/resolve.
#[derive(Deserialize)]
pub(crate) struct ResolveQuery {
    path: String,
}

/// Handle GET /api/redirects.
pub(crate) async fn get_redirects(State(state): State<Arc<AppState>>) -> Json<RedirectsResponse> {
    let rules = state.index.redirects.effective_rules().cloned().collect();
    Json(RedirectsResponse { rules })
}

/// Handle GET /api/resolve?path=...
pub(crate) async fn resolve(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ResolveQuery>,
) -> Result<Json<Resolution>, ServerError> {
    let resolution = state
        .index
        .redirects
        .resolve(&query.path, |p| state.corpus.is_page_url(p))?;
    Ok(Json(resolution))
}
