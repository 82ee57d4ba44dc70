//! HTTP gateway: one sub-router per screen, merged here and bound to the
//! shared [`AppState`].

use axum::Router;

use crate::AppState;

mod community;
mod dashboard;
mod drafts;
mod extract;
mod geocode;
mod health;
mod history;
mod map;
mod reports;
mod schemes;

// ---

pub fn router(state: AppState) -> Router {
    // ---
    Router::new()
        .merge(reports::router())
        .merge(map::router())
        .merge(history::router())
        .merge(community::router())
        .merge(dashboard::router())
        .merge(schemes::router())
        .merge(geocode::router())
        .merge(drafts::router())
        .merge(health::router())
        .with_state(state)
}
