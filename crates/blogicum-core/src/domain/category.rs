use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Category entity - a published-or-hidden grouping of posts.
///
/// An unpublished category hides every post filed under it, whatever the
/// posts' own flags say.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    /// Unique, case-sensitive URL key.
    pub slug: String,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}

impl Category {
    pub fn new(title: impl Into<String>, slug: impl Into<String>, is_published: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: String::new(),
            slug: slug.into(),
            is_published,
            created_at: Utc::now(),
        }
    }
}
