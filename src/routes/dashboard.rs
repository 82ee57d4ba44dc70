use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tracing::info;

use crate::models::{DashboardReport, EarningRule, Event, Reward, UserProfile};
use crate::AppState;

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new().route("/dashboard", get(handler))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Progress {
    percent: u32,
    points_to_next_level: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RewardOffer<'a> {
    #[serde(flatten)]
    reward: &'a Reward,
    affordable: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Dashboard<'a> {
    profile: &'a UserProfile,
    progress: Progress,
    reports: &'a [DashboardReport],
    events: &'a [Event],
    rewards: Vec<RewardOffer<'a>>,
    earning_rules: &'a [EarningRule],
}

async fn handler(State(state): State<AppState>) -> Response {
    // ---
    info!("GET /dashboard");

    let catalog = &state.catalog;
    let profile = &catalog.profile;

    Json(Dashboard {
        profile,
        progress: Progress {
            percent: profile.progress_percent(),
            points_to_next_level: profile.points_to_next_level(),
        },
        reports: &catalog.my_reports,
        events: &catalog.events,
        rewards: catalog
            .rewards
            .iter()
            .map(|reward| RewardOffer {
                reward,
                affordable: profile.can_afford(reward),
            })
            .collect(),
        earning_rules: &catalog.earning_rules,
    })
    .into_response()
}
