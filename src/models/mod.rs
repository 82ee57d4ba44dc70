//! Data model for RiverGuard.
//!
//! Gateway for the per-screen model modules (EMBP): sibling modules only
//! import from `crate::models`, never from `crate::models::<file>`.

use serde::{Deserialize, Serialize};

mod dashboard;
mod forum;
mod history;
mod report;
mod scheme;

pub use dashboard::{
    Badge, DashboardReport, EarningRule, Event, EventStatus, LevelTarget, ReportStatus, Reward,
    UserProfile,
};
pub use forum::{Author, AuthorProfile, Category, Discussion, DiscussionSummary, Reply, TagCount};
pub use history::{ConservationEffort, PollutionSnapshot, RiverHistory, WaterQuality, Yearly};
pub use report::{GeoPoint, PollutionReport, PollutionType, Severity, SeverityColor};
pub use scheme::{Scheme, SchemeScope};

// ---

/// Visual treatment of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationVariant {
    Default,
    Destructive,
}

/// A transient user-visible message (rendered as a toast by the client).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub variant: NotificationVariant,
}

impl Notification {
    // ---
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: NotificationVariant::Default,
        }
    }

    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: NotificationVariant::Destructive,
        }
    }
}
