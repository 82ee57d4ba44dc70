//! Body and query extractors that answer malformed input with the same
//! destructive notification as every other validation failure.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        FromRequest, FromRequestParts, Query, Request,
    },
    http::request::Parts,
    Json,
};
use tracing::debug;

use crate::error::AppError;

// ---

const INVALID_REQUEST: &str = "Invalid request";

/// `Json<T>` whose rejection is an [`AppError::Validation`].
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        // ---
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                debug!("Rejected body ({}): {}", rejection.status(), rejection.body_text());
                Err(AppError::validation(INVALID_REQUEST, rejection.body_text()))
            }
        }
    }
}

/// `Query<T>` whose rejection is an [`AppError::Validation`].
pub struct ValidQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidQuery<T>
where
    Query<T>: FromRequestParts<S, Rejection = QueryRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // ---
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(Self(value)),
            Err(rejection) => {
                debug!("Rejected query ({}): {}", rejection.status(), rejection.body_text());
                Err(AppError::validation(INVALID_REQUEST, rejection.body_text()))
            }
        }
    }
}
