use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{AppError, Result};
use crate::timeline::{FIRST_YEAR, LAST_YEAR};
use crate::AppState;

use super::extract::ValidQuery;

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new()
        .route("/history", get(rivers))
        .route("/history/{river}", get(snapshot))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RiverList<'a> {
    rivers: Vec<RiverEntry<'a>>,
    first_year: i32,
    last_year: i32,
}

#[derive(Serialize)]
struct RiverEntry<'a> {
    key: &'a str,
    name: &'a str,
}

async fn rivers(State(state): State<AppState>) -> Response {
    // ---
    info!("GET /history");
    Json(RiverList {
        rivers: state
            .catalog
            .rivers
            .iter()
            .map(|r| RiverEntry {
                key: &r.key,
                name: &r.name,
            })
            .collect(),
        first_year: FIRST_YEAR,
        last_year: LAST_YEAR,
    })
    .into_response()
}

#[derive(Debug, Deserialize)]
struct YearQuery {
    year: Option<i32>,
}

async fn snapshot(
    Path(river): Path<String>,
    ValidQuery(params): ValidQuery<YearQuery>,
    State(state): State<AppState>,
) -> Result<Response> {
    // ---
    info!("GET /history/{}", river);

    let history = state
        .catalog
        .river(&river)
        .ok_or_else(|| AppError::NotFound("river", river.clone()))?;

    let year = params.year.unwrap_or(LAST_YEAR);
    let view = history.snapshot(year);
    debug!(
        "GET /history/{} - year {} -> quality record {:?}",
        river,
        view.year,
        view.water_quality.map(|q| q.year)
    );

    Ok(Json(view).into_response())
}
