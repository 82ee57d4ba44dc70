//! Report wizard sessions.
//!
//! A draft is a [`ReportWizard`] kept in the shared map until it is
//! submitted, discarded or evicted after sitting idle. Dashmap guards are never held across an
//! `.await`: capability calls run on values copied out of the entry.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::forum::Submitted;
use crate::location::{self, ClientPosition};
use crate::models::Notification;
use crate::uploader::{SelectedFile, UploadSource};
use crate::wizard::{DraftPatch, ReportWizard, WizardView, REPORT_SUCCESS_PATH};
use crate::AppState;

use super::extract::ValidJson;

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new()
        .route("/reports/drafts", post(create))
        .route("/reports/drafts/{id}", get(show).patch(edit).delete(discard))
        .route("/reports/drafts/{id}/next", post(next))
        .route("/reports/drafts/{id}/previous", post(previous))
        .route("/reports/drafts/{id}/location", post(locate))
        .route("/reports/drafts/{id}/location/search", post(search))
        .route("/reports/drafts/{id}/images", post(add_images))
        .route("/reports/drafts/{id}/images/{index}", delete(remove_image))
        .route("/reports/drafts/{id}/submit", post(submit))
}

/// Run `f` against the draft while holding its entry. Marks the draft as
/// recently used so the idle sweep leaves it alone.
fn with_draft<R>(
    state: &AppState,
    id: Uuid,
    f: impl FnOnce(&mut ReportWizard) -> Result<R>,
) -> Result<R> {
    // ---
    let mut entry = state
        .drafts
        .get_mut(&id)
        .ok_or_else(|| AppError::NotFound("draft", id.to_string()))?;
    let draft = entry.value_mut();
    draft.touch();
    f(&mut draft.wizard)
}

fn view(w: &ReportWizard) -> Response {
    Json(w.view()).into_response()
}

#[derive(Serialize)]
struct Created {
    id: Uuid,
}

async fn create(State(state): State<AppState>) -> Response {
    // ---
    info!("POST /reports/drafts");
    let id = state.new_draft();
    (StatusCode::CREATED, Json(Created { id })).into_response()
}

async fn show(Path(id): Path<Uuid>, State(state): State<AppState>) -> Result<Response> {
    debug!("GET /reports/drafts/{}", id);
    with_draft(&state, id, |w| Ok(view(w)))
}

async fn edit(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    ValidJson(patch): ValidJson<DraftPatch>,
) -> Result<Response> {
    // ---
    debug!("PATCH /reports/drafts/{}", id);
    with_draft(&state, id, |w| {
        w.apply(patch);
        Ok(view(w))
    })
}

async fn discard(Path(id): Path<Uuid>, State(state): State<AppState>) -> Result<StatusCode> {
    // ---
    info!("DELETE /reports/drafts/{}", id);
    state
        .drafts
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| AppError::NotFound("draft", id.to_string()))
}

async fn next(Path(id): Path<Uuid>, State(state): State<AppState>) -> Result<Response> {
    // ---
    info!("POST /reports/drafts/{}/next", id);
    with_draft(&state, id, |w| {
        w.next()?;
        Ok(view(w))
    })
}

async fn previous(Path(id): Path<Uuid>, State(state): State<AppState>) -> Result<Response> {
    // ---
    info!("POST /reports/drafts/{}/previous", id);
    with_draft(&state, id, |w| {
        w.previous();
        Ok(view(w))
    })
}

#[derive(Serialize)]
struct Noticed<'a> {
    notification: Notification,
    draft: WizardView<'a>,
}

async fn locate(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    ValidJson(position): ValidJson<ClientPosition>,
) -> Result<Response> {
    // ---
    info!("POST /reports/drafts/{}/location", id);
    with_draft(&state, id, |w| {
        let here = w.location.use_current_location(&position)?;
        Ok(Json(Noticed {
            notification: location::detected(here),
            draft: w.view(),
        })
        .into_response())
    })
}

#[derive(Debug, Deserialize)]
struct SearchBody {
    #[serde(default)]
    query: String,
}

async fn search(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    ValidJson(body): ValidJson<SearchBody>,
) -> Result<Response> {
    // ---
    info!("POST /reports/drafts/{}/location/search", id);

    let (query, loading) = with_draft(&state, id, |w| w.location.begin_search(&body.query))?;
    let found = state.geocoder.search(&query).await;
    drop(loading);

    let found = found?;
    with_draft(&state, id, |w| {
        w.location.select(found);
        Ok(view(w))
    })
}

#[derive(Debug, Deserialize)]
struct ImageBatch {
    files: Vec<SelectedFile>,
    #[serde(default)]
    source: UploadSource,
}

async fn add_images(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    ValidJson(batch): ValidJson<ImageBatch>,
) -> Result<Response> {
    // ---
    info!("POST /reports/drafts/{}/images", id);
    let offered = batch.files.len();
    with_draft(&state, id, |w| {
        let kept = w.images.add(batch.files, batch.source);
        if kept < offered {
            debug!("Draft {} kept {} of {} offered files", id, kept, offered);
        }
        Ok(view(w))
    })
}

async fn remove_image(
    Path((id, index)): Path<(Uuid, usize)>,
    State(state): State<AppState>,
) -> Result<Response> {
    // ---
    info!("DELETE /reports/drafts/{}/images/{}", id, index);
    with_draft(&state, id, |w| {
        w.images.remove(index)?;
        Ok(view(w))
    })
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReportAccepted {
    #[serde(flatten)]
    submitted: Submitted,
    points_earned: u32,
}

async fn submit(Path(id): Path<Uuid>, State(state): State<AppState>) -> Result<Response> {
    // ---
    info!("POST /reports/drafts/{}/submit", id);

    let (submitting, payload) = with_draft(&state, id, |w| w.begin_submit())?;
    let points_earned = payload.points();
    let receipt = match state.backend.submit_report(payload).await {
        Ok(receipt) => receipt,
        Err(e) => {
            drop(submitting);
            warn!("Draft {} submission failed, keeping it for retry: {}", id, e);
            return Err(e);
        }
    };

    // The token outlives the entry so no second submit can start on it.
    // Removing the entry releases the draft's previews.
    state.drafts.remove(&id);
    drop(submitting);
    info!("Draft {} accepted as report {}", id, receipt.id);

    let accepted = ReportAccepted {
        submitted: Submitted {
            receipt,
            notification: Notification::success(
                "Report submitted successfully!",
                "Thank you for contributing to cleaner rivers.",
            ),
            redirect: Some(REPORT_SUCCESS_PATH),
        },
        points_earned,
    };
    Ok(Json(accepted).into_response())
}
