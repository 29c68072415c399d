//! Navigation API endpoint.
//!
//! Returns the navigation tree built from the index page.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use mdoc_index::NavItem;
use serde::Serialize;

use crate::state::AppState;

/// Response for GET /api/navigation.
#[derive(Serialize)]
pub(crate) struct NavigationResponse {
    /// Navigation tree items.
    items: Vec<NavItem>,
}

/// Handle GET /api/navigation.
pub(crate) async fn get_navigation(State(state): State<Arc<AppState>>) -> Json<NavigationResponse> {
    let items = state.index.navigation.items();
    Json(NavigationResponse { items })
}
