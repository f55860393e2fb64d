use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::User;
use crate::error::DomainError;

/// Comment entity. Visible wherever its post is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    /// Set at creation, never changed afterwards.
    pub author_id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(post_id: Uuid, author_id: Uuid, text: String, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            post_id,
            author_id,
            text,
            created_at: now,
        }
    }

    pub fn validate_text(text: &str) -> Result<(), DomainError> {
        if text.trim().is_empty() {
            return Err(DomainError::Validation(
                "comment text must not be blank".to_string(),
            ));
        }
        Ok(())
    }
}

/// A comment joined with its author, as shown under a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentRecord {
    pub comment: Comment,
    pub author: User,
}
