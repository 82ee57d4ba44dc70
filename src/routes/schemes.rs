use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{AppError, Result};
use crate::models::{Scheme, SchemeScope};
use crate::AppState;

use super::extract::ValidQuery;

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new().route("/schemes", get(handler))
}

#[derive(Debug, Deserialize)]
struct SchemeQuery {
    scope: Option<String>,
}

async fn handler(
    ValidQuery(params): ValidQuery<SchemeQuery>,
    State(state): State<AppState>,
) -> Result<Response> {
    // ---
    info!("GET /schemes");

    let scope = match params.scope.as_deref().map(str::trim) {
        None | Some("") | Some("all") => None,
        Some(raw) => Some(
            raw.parse::<SchemeScope>()
                .map_err(|e| AppError::validation("Invalid scope", e))?,
        ),
    };
    debug!("GET /schemes - scope {:?}", scope);

    let schemes: Vec<&Scheme> = state
        .catalog
        .schemes
        .iter()
        .filter(|s| scope.map_or(true, |wanted| s.scope == wanted))
        .collect();

    Ok(Json(schemes).into_response())
}
