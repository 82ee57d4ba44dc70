use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{AppError, Result};
use crate::filter::{Criteria, ReportQuery};
use crate::models::{PollutionReport, PollutionType};
use crate::AppState;

use super::extract::ValidQuery;

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new()
        .route("/reports", get(handler))
        .route("/reports/{id}", get(report))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReportList<'a> {
    total: usize,
    reports: Vec<&'a PollutionReport>,
    pollution_types: Vec<TypeOption>,
}

#[derive(Serialize)]
struct TypeOption {
    value: PollutionType,
    label: &'static str,
}

fn type_options() -> Vec<TypeOption> {
    PollutionType::ALL
        .iter()
        .map(|t| TypeOption {
            value: *t,
            label: t.label(),
        })
        .collect()
}

async fn handler(
    ValidQuery(params): ValidQuery<ReportQuery>,
    State(state): State<AppState>,
) -> Result<Response> {
    // ---
    info!("GET /reports");

    let filter = params.to_filter()?;
    debug!("GET /reports - filter {:?}", filter);

    let reports = filter.apply(&state.catalog.reports);
    info!(
        "GET /reports - returning {} of {}",
        reports.len(),
        state.catalog.reports.len()
    );

    Ok(Json(ReportList {
        total: state.catalog.reports.len(),
        reports,
        pollution_types: type_options(),
    })
    .into_response())
}

/// The report behind a clicked map marker.
async fn report(
    Path(id): Path<u32>,
    State(state): State<AppState>,
) -> Result<Json<PollutionReport>> {
    // ---
    info!("GET /reports/{}", id);
    state
        .catalog
        .report(id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound("report", id.to_string()))
}
