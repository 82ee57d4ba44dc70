//! Error taxonomy for the `riverguard` service.
//!
//! Every failure a user can hit ends up as a transient notification (a
//! "toast" on the client). The three user-facing categories are validation
//! failures, operation failures and unsupported capabilities; the remaining
//! variants cover lookups and wizard misuse by API clients.

use axum::{http::StatusCode, response::IntoResponse, Json};
use thiserror::Error;

use crate::models::Notification;

// ---

/// The primary error type for all riverguard operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AppError {
    /// Required input missing or malformed (e.g. empty reply).
    #[error("{title}: {description}")]
    Validation { title: String, description: String },

    /// A simulated or remote operation failed; the caller may retry.
    #[error("{title}: {description}")]
    Operation { title: String, description: String },

    /// The execution environment lacks a capability (e.g. geolocation).
    #[error("{title}: {description}")]
    Unsupported { title: String, description: String },

    /// Resource not found (river, discussion, draft, image index)
    #[error("{0} not found: {1}")]
    NotFound(&'static str, String),

    /// A submission for this form is already in flight
    #[error("conflict: {0}")]
    Conflict(String),

    /// Wizard action attempted from the wrong step
    #[error("invalid transition: {0}")]
    InvalidTransition(String),
}

/// A specialized Result type for riverguard logic.
pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    // ---
    pub fn validation(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::Validation {
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn operation(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::Operation {
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn unsupported(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::Unsupported {
            title: title.into(),
            description: description.into(),
        }
    }

    /// HTTP status used when this error crosses the API boundary.
    pub fn status(&self) -> StatusCode {
        // ---
        match self {
            Self::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Operation { .. } => StatusCode::BAD_GATEWAY,
            Self::Unsupported { .. } => StatusCode::NOT_IMPLEMENTED,
            Self::NotFound(..) => StatusCode::NOT_FOUND,
            Self::Conflict(_) | Self::InvalidTransition(_) => StatusCode::CONFLICT,
        }
    }

    /// The destructive notification shown to the user for this error.
    pub fn notification(&self) -> Notification {
        // ---
        match self {
            Self::Validation { title, description }
            | Self::Operation { title, description }
            | Self::Unsupported { title, description } => {
                Notification::destructive(title.clone(), description.clone())
            }
            Self::NotFound(what, key) => {
                Notification::destructive(format!("{what} not found"), format!("No {what} '{key}'"))
            }
            Self::Conflict(msg) => Notification::destructive("Please wait", msg.clone()),
            Self::InvalidTransition(msg) => Notification::destructive("Not available", msg.clone()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        // ---
        tracing::warn!("Request failed: {}", self);
        (self.status(), Json(self.notification())).into_response()
    }
}
