//! Community forum model: categories, discussions and replies.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ---

/// A forum category shown in the sidebar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: u32,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub threads: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagCount {
    pub name: String,
    pub count: u32,
}

/// Author shown on a discussion list card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    pub avatar: String,
}

/// Full author profile shown on a discussion page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorProfile {
    pub name: String,
    pub avatar: String,
    pub role: String,
    pub join_date: String,
    pub posts: u32,
}

/// List entry for the recent/popular discussion tabs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscussionSummary {
    // ---
    pub id: u32,
    pub title: String,
    pub category: String,
    pub author: Author,
    pub replies: u32,
    pub views: u32,
    /// Relative activity label as displayed, e.g. "2 hours ago".
    pub last_activity: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    pub id: u32,
    pub author: AuthorProfile,
    /// Rich text (HTML fragment).
    pub content: String,
    pub created_at: NaiveDateTime,
    pub likes: u32,
}

/// A discussion together with the replies it owns, in posting order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discussion {
    // ---
    pub id: u32,
    pub title: String,
    pub content: String,
    pub category: String,
    pub author: AuthorProfile,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub replies: u32,
    pub views: u32,
    pub likes: u32,
    pub tags: Vec<String>,
    pub images: Vec<String>,
    pub thread: Vec<Reply>,
}
