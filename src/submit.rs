//! Form submission plumbing.
//!
//! Submissions go through a [`Backend`]. The shipped implementation,
//! [`SimulatedBackend`], only waits a fixed delay and then reports success
//! (or a configured failure); nothing is sent anywhere. Each form instance
//! allows at most one submission in flight, enforced by a [`Busy`] flag.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{GeoPoint, PollutionType, Severity};
use crate::uploader::SelectedFile;

// ---

/// Busy flag for one form instance.
///
/// Cloning shares the flag. Acquiring returns a token that clears the flag
/// when dropped, so every exit path of a submission resets it.
#[derive(Debug, Clone, Default)]
pub struct Busy(Arc<AtomicBool>);

impl Busy {
    pub fn is_busy(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub fn try_acquire(&self) -> Option<BusyToken> {
        // ---
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BusyToken(Arc::clone(&self.0)))
    }
}

/// Proof that a submission is in flight.
#[derive(Debug)]
pub struct BusyToken(Arc<AtomicBool>);

impl Drop for BusyToken {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Body of a pollution report submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportPayload {
    pub river_name: String,
    pub pollution_type: Option<PollutionType>,
    pub description: String,
    pub severity_level: Severity,
    pub images: Vec<SelectedFile>,
    pub location: Option<GeoPoint>,
}

/// Points awarded for any accepted report.
pub const BASE_REPORT_POINTS: u32 = 30;
/// Bonus when at least one photo is attached.
pub const PHOTO_BONUS_POINTS: u32 = 10;
/// Bonus when a location is attached.
pub const LOCATION_BONUS_POINTS: u32 = 15;

impl ReportPayload {
    /// Reward points this report earns once accepted.
    pub fn points(&self) -> u32 {
        // ---
        let mut points = BASE_REPORT_POINTS;
        if !self.images.is_empty() {
            points += PHOTO_BONUS_POINTS;
        }
        if self.location.is_some() {
            points += LOCATION_BONUS_POINTS;
        }
        points
    }
}

/// Body of a new discussion topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicPayload {
    pub title: String,
    pub category: String,
    pub content: String,
    pub tags: Vec<String>,
}

/// Body of a reply to a discussion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyPayload {
    pub discussion_id: u32,
    pub content: String,
}

/// Acknowledgement returned by a backend for an accepted submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub id: Uuid,
    pub accepted_at: DateTime<Utc>,
}

impl Receipt {
    fn now() -> Self {
        Self {
            id: Uuid::new_v4(),
            accepted_at: Utc::now(),
        }
    }
}

/// Destination for form submissions.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn submit_report(&self, payload: ReportPayload) -> Result<Receipt>;
    async fn create_topic(&self, payload: TopicPayload) -> Result<Receipt>;
    async fn post_reply(&self, payload: ReplyPayload) -> Result<Receipt>;
}

/// Stand-in backend: waits a fixed delay, then accepts (or fails).
#[derive(Debug, Clone)]
pub struct SimulatedBackend {
    pub report_delay: Duration,
    pub topic_delay: Duration,
    pub reply_delay: Duration,
    /// When set, every submission fails with this description.
    pub failure: Option<String>,
}

impl SimulatedBackend {
    pub fn new(report_delay: Duration, topic_delay: Duration, reply_delay: Duration) -> Self {
        Self {
            report_delay,
            topic_delay,
            reply_delay,
            failure: None,
        }
    }

    /// A backend that answers immediately.
    pub fn instant() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO, Duration::ZERO)
    }

    pub fn failing(mut self, description: impl Into<String>) -> Self {
        self.failure = Some(description.into());
        self
    }

    async fn settle(&self, delay: Duration, title: &str) -> Result<Receipt> {
        // ---
        tokio::time::sleep(delay).await;
        match &self.failure {
            Some(description) => Err(AppError::operation(title, description.clone())),
            None => Ok(Receipt::now()),
        }
    }
}

#[async_trait]
impl Backend for SimulatedBackend {
    async fn submit_report(&self, payload: ReportPayload) -> Result<Receipt> {
        // ---
        tracing::debug!(
            "Simulating report submission for river '{}' ({} images)",
            payload.river_name,
            payload.images.len()
        );
        self.settle(self.report_delay, "Error submitting report").await
    }

    async fn create_topic(&self, payload: TopicPayload) -> Result<Receipt> {
        tracing::debug!("Simulating topic creation: '{}'", payload.title);
        self.settle(self.topic_delay, "Error creating topic").await
    }

    async fn post_reply(&self, payload: ReplyPayload) -> Result<Receipt> {
        tracing::debug!("Simulating reply to discussion {}", payload.discussion_id);
        self.settle(self.reply_delay, "Error posting reply").await
    }
}
