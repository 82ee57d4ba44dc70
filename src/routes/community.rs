use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::error::{AppError, Result};
use crate::filter::{Criteria, DiscussionFilter, Selector};
use crate::forum::{self, LikeTarget, NewTopicForm, ReplyForm};
use crate::models::{Category, DiscussionSummary, Notification, TagCount};
use crate::AppState;

use super::extract::{ValidJson, ValidQuery};

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new()
        .route("/community", get(overview))
        .route("/community/discussions", get(discussions))
        .route("/community/discussions/{id}", get(discussion))
        .route("/community/discussions/{id}/replies", post(reply))
        .route("/community/discussions/{id}/like", post(like))
        .route("/community/discussions/{id}/flag", post(flag))
        .route("/community/topics", post(new_topic))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Overview<'a> {
    categories: &'a [Category],
    trending_tags: &'a [TagCount],
}

async fn overview(State(state): State<AppState>) -> Response {
    // ---
    info!("GET /community");
    Json(Overview {
        categories: &state.catalog.categories,
        trending_tags: &state.catalog.trending_tags,
    })
    .into_response()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
enum Tab {
    #[default]
    Recent,
    Popular,
}

#[derive(Debug, Default, Deserialize)]
struct DiscussionQuery {
    q: Option<String>,
    category: Option<String>,
    tag: Option<String>,
    #[serde(default)]
    tab: Tab,
}

#[derive(Serialize)]
struct DiscussionList<'a> {
    tab: Tab,
    discussions: Vec<&'a DiscussionSummary>,
}

async fn discussions(
    ValidQuery(params): ValidQuery<DiscussionQuery>,
    State(state): State<AppState>,
) -> Response {
    // ---
    info!("GET /community/discussions");

    let filter = DiscussionFilter {
        query: params.q.unwrap_or_default(),
        category: Selector::parse(params.category.as_deref()),
        tag: params.tag,
    };
    debug!("GET /community/discussions - tab {:?}, filter {:?}", params.tab, filter);

    let source = match params.tab {
        Tab::Recent => &state.catalog.recent_discussions,
        Tab::Popular => &state.catalog.popular_discussions,
    };

    Json(DiscussionList {
        tab: params.tab,
        discussions: filter.apply(source),
    })
    .into_response()
}

async fn discussion(Path(id): Path<u32>, State(state): State<AppState>) -> Result<Response> {
    // ---
    info!("GET /community/discussions/{}", id);
    let found = state
        .catalog
        .discussion(id)
        .ok_or_else(|| AppError::NotFound("discussion", id.to_string()))?;
    Ok(Json(found).into_response())
}

/// Listed in either tab or available in full.
fn ensure_known(catalog: &Catalog, id: u32) -> Result<()> {
    // ---
    let listed = catalog
        .recent_discussions
        .iter()
        .chain(&catalog.popular_discussions)
        .any(|d| d.id == id);
    if listed || catalog.discussion(id).is_some() {
        Ok(())
    } else {
        Err(AppError::NotFound("discussion", id.to_string()))
    }
}

async fn reply(
    Path(id): Path<u32>,
    State(state): State<AppState>,
    ValidJson(form): ValidJson<ReplyForm>,
) -> Result<Response> {
    // ---
    info!("POST /community/discussions/{}/replies", id);
    ensure_known(&state.catalog, id)?;

    let composer = state.reply_form(id);
    let done = composer.post_reply(id, &form, state.backend.as_ref()).await?;
    Ok((StatusCode::CREATED, Json(done)).into_response())
}

#[derive(Debug, Default, Deserialize)]
struct LikeQuery {
    #[serde(default)]
    target: LikeTarget,
}

async fn like(
    Path(id): Path<u32>,
    ValidQuery(params): ValidQuery<LikeQuery>,
    State(state): State<AppState>,
) -> Result<Json<Notification>> {
    // ---
    info!("POST /community/discussions/{}/like", id);
    ensure_known(&state.catalog, id)?;
    Ok(Json(forum::liked(params.target)))
}

async fn flag(Path(id): Path<u32>, State(state): State<AppState>) -> Result<Json<Notification>> {
    // ---
    info!("POST /community/discussions/{}/flag", id);
    ensure_known(&state.catalog, id)?;
    Ok(Json(forum::flagged()))
}

async fn new_topic(
    State(state): State<AppState>,
    ValidJson(form): ValidJson<NewTopicForm>,
) -> Result<Response> {
    // ---
    info!("POST /community/topics");
    let done = state
        .topic_form
        .post_topic(&form, &state.catalog, state.backend.as_ref())
        .await?;
    Ok((StatusCode::CREATED, Json(done)).into_response())
}
