use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::Result;
use crate::filter::{Criteria, ReportQuery};
use crate::location::ClientPosition;
use crate::map::{self, LegendEntry, MapAdapter, MapPlan, MapView, RecordingMap};
use crate::models::{GeoPoint, Notification, PollutionReport, Severity};
use crate::AppState;

use super::extract::{ValidJson, ValidQuery};

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new()
        .route("/map", get(handler))
        .route("/map/locate", post(locate))
}

/// Report filters plus the viewport. Kept flat so every field parses from
/// the query string with its own type.
#[derive(Debug, Default, Deserialize)]
struct MapQuery {
    river: Option<String>,
    #[serde(rename = "type")]
    pollution_type: Option<String>,
    severity_min: Option<i64>,
    severity_max: Option<i64>,
    verified_only: Option<bool>,
    time_range: Option<String>,
    as_of: Option<NaiveDate>,
    center_lat: Option<f64>,
    center_lng: Option<f64>,
    zoom: Option<u8>,
}

impl MapQuery {
    fn split(self) -> (ReportQuery, MapView) {
        // ---
        let defaults = MapView::default();
        let view = MapView {
            center: GeoPoint::new(
                self.center_lat.unwrap_or(defaults.center.lat),
                self.center_lng.unwrap_or(defaults.center.lng),
            ),
            zoom: self.zoom.unwrap_or(defaults.zoom),
        };
        let filters = ReportQuery {
            river: self.river,
            pollution_type: self.pollution_type,
            severity_min: self.severity_min,
            severity_max: self.severity_max,
            verified_only: self.verified_only,
            time_range: self.time_range,
            as_of: self.as_of,
        };
        (filters, view)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MapResponse<'a> {
    reports: Vec<&'a PollutionReport>,
    plan: MapPlan,
    legend: Vec<LegendEntry>,
}

async fn handler(
    ValidQuery(params): ValidQuery<MapQuery>,
    State(state): State<AppState>,
) -> Result<Response> {
    // ---
    info!("GET /map");

    let (filters, view) = params.split();
    let filter = filters.to_filter()?;
    debug!("GET /map - filter {:?}, view {:?}", filter, view);

    let reports = filter.apply(&state.catalog.reports);

    let mut adapter = MapAdapter::new(RecordingMap::default(), "map", |s: Severity| s.color());
    adapter.initialize(&reports, view, Box::new(|_| {}));
    let plan = adapter.into_backend().into_plan();

    info!("GET /map - {} markers", plan.markers.len());
    Ok(Json(MapResponse {
        reports,
        plan,
        legend: map::legend(),
    })
    .into_response())
}

#[derive(Serialize)]
struct Located {
    view: MapView,
    notification: Notification,
}

async fn locate(ValidJson(position): ValidJson<ClientPosition>) -> Result<Json<Located>> {
    // ---
    info!("POST /map/locate");
    let (view, notification) = map::focus_on(&position)?;
    Ok(Json(Located { view, notification }))
}
