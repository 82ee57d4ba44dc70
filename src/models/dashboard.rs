//! Dashboard model: profile, rewards, the user's reports and events.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{PollutionType, Severity};

// ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Badge {
    pub name: String,
    pub icon: String,
    pub earned_on: NaiveDate,
}

/// The next level and the points balance required to reach it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelTarget {
    pub name: String,
    pub points_needed: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    // ---
    pub name: String,
    pub username: String,
    pub avatar: String,
    pub points: u32,
    pub level: String,
    pub reports: u32,
    pub cleanups: u32,
    pub badges: Vec<Badge>,
    pub next_level: LevelTarget,
}

impl UserProfile {
    /// Progress towards the next level, 0..=100.
    pub fn progress_percent(&self) -> u32 {
        // ---
        if self.next_level.points_needed == 0 {
            return 100;
        }
        (self.points.saturating_mul(100) / self.next_level.points_needed).min(100)
    }

    pub fn points_to_next_level(&self) -> u32 {
        self.next_level.points_needed.saturating_sub(self.points)
    }

    pub fn can_afford(&self, reward: &Reward) -> bool {
        self.points >= reward.cost
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Verified,
    Pending,
}

/// One of the user's own reports with the points it earned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardReport {
    pub id: u32,
    pub river: String,
    pub location: String,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub pollution_type: PollutionType,
    pub severity: Severity,
    pub status: ReportStatus,
    pub points: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Upcoming,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: u32,
    pub name: String,
    pub location: String,
    pub date: NaiveDate,
    pub time: String,
    pub status: EventStatus,
    pub participants: u32,
    /// Only present once the event is completed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points_earned: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reward {
    pub name: String,
    pub description: String,
    pub cost: u32,
}

/// A row of the "How to Earn Points" table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarningRule {
    pub group: String,
    pub activity: String,
    pub points: u32,
}
