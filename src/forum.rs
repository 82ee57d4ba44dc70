//! Community forms: new topic and reply.
//!
//! Each form validates its fields, then goes through a [`Composer`] that
//! enforces one submission in flight and turns the backend's answer into
//! the notification the user sees.

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::error::{AppError, Result};
use crate::models::Notification;
use crate::submit::{Backend, Busy, Receipt, ReplyPayload, TopicPayload};

/// Where the client goes after a topic is created.
pub const COMMUNITY_PATH: &str = "/community";

// ---

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewTopicForm {
    pub title: String,
    pub category: String,
    pub content: String,
    /// Comma separated, as typed.
    pub tags: String,
}

impl NewTopicForm {
    pub fn validate(&self, catalog: &Catalog) -> Result<TopicPayload> {
        // ---
        let title = self.title.trim();
        let content = self.content.trim();
        let category = self.category.trim();

        if title.is_empty() || category.is_empty() || content.is_empty() {
            return Err(AppError::validation(
                "Missing information",
                "Please fill in all required fields.",
            ));
        }

        let category = catalog
            .category_names()
            .find(|c| c.eq_ignore_ascii_case(category))
            .ok_or_else(|| {
                AppError::validation(
                    "Unknown category",
                    format!("'{category}' is not a forum category."),
                )
            })?;

        Ok(TopicPayload {
            title: title.to_string(),
            category: category.to_string(),
            content: content.to_string(),
            tags: parse_tags(&self.tags),
        })
    }
}

/// Split a comma separated tag list, dropping blanks.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReplyForm {
    pub content: String,
}

impl ReplyForm {
    pub fn validate(&self, discussion_id: u32) -> Result<ReplyPayload> {
        // ---
        if self.content.trim().is_empty() {
            return Err(AppError::validation(
                "Empty reply",
                "Please enter your reply before submitting.",
            ));
        }
        Ok(ReplyPayload {
            discussion_id,
            content: self.content.trim().to_string(),
        })
    }
}

/// Response to an accepted form submission.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Submitted {
    pub receipt: Receipt,
    pub notification: Notification,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<&'static str>,
}

/// Submission guard for one form. Clones share the in-flight flag.
#[derive(Debug, Clone, Default)]
pub struct Composer {
    busy: Busy,
}

impl Composer {
    pub fn is_submitting(&self) -> bool {
        self.busy.is_busy()
    }

    pub async fn post_topic(
        &self,
        form: &NewTopicForm,
        catalog: &Catalog,
        backend: &dyn Backend,
    ) -> Result<Submitted> {
        // ---
        let payload = form.validate(catalog)?;
        let _token = self
            .busy
            .try_acquire()
            .ok_or_else(|| AppError::Conflict("Your topic is already being posted".into()))?;

        let receipt = backend.create_topic(payload).await.map_err(|e| {
            tracing::error!("Topic creation failed: {}", e);
            e
        })?;

        Ok(Submitted {
            receipt,
            notification: Notification::success(
                "Topic created",
                "Your discussion topic has been posted successfully.",
            ),
            redirect: Some(COMMUNITY_PATH),
        })
    }

    pub async fn post_reply(
        &self,
        discussion_id: u32,
        form: &ReplyForm,
        backend: &dyn Backend,
    ) -> Result<Submitted> {
        // ---
        let payload = form.validate(discussion_id)?;
        let _token = self
            .busy
            .try_acquire()
            .ok_or_else(|| AppError::Conflict("Your reply is already being posted".into()))?;

        let receipt = backend.post_reply(payload).await.map_err(|e| {
            tracing::error!("Reply to discussion {} failed: {}", discussion_id, e);
            e
        })?;

        Ok(Submitted {
            receipt,
            notification: Notification::success(
                "Reply posted",
                "Your reply has been added to the discussion.",
            ),
            redirect: None,
        })
    }
}

/// What a like applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LikeTarget {
    #[default]
    Discussion,
    Reply,
}

pub fn liked(target: LikeTarget) -> Notification {
    let what = match target {
        LikeTarget::Discussion => "discussion",
        LikeTarget::Reply => "reply",
    };
    Notification::success("Liked", format!("You liked this {what}."))
}

pub fn flagged() -> Notification {
    Notification::success(
        "Report submitted",
        "Thank you for reporting this content. Our moderators will review it.",
    )
}
