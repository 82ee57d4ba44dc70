use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::info;

use crate::error::{AppError, Result};
use crate::location::PickedLocation;
use crate::AppState;

use super::extract::ValidQuery;

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new().route("/geocode", get(handler))
}

#[derive(Debug, Deserialize)]
struct GeocodeQuery {
    #[serde(default)]
    q: String,
}

async fn handler(
    ValidQuery(params): ValidQuery<GeocodeQuery>,
    State(state): State<AppState>,
) -> Result<Json<PickedLocation>> {
    // ---
    let query = params.q.trim();
    info!("GET /geocode - '{}'", query);

    if query.is_empty() {
        return Err(AppError::validation("Missing search", "Enter a place to search for."));
    }
    let found = state.geocoder.search(query).await?;
    Ok(Json(found))
}
