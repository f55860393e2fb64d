//! Who may see which posts.
//!
//! [`is_publicly_visible`] is the single definition of "published". Listing
//! filters are expressed as a [`PostQuery`] so that every store evaluates the
//! same rule: the in-memory store calls [`PostQuery::matches`] directly, the
//! SQL store compiles the same scope into a `WHERE` clause.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Category, Post, PostRecord, Viewer};

/// True iff the post is published, its category (when it has one) is
/// published, and its publication date is not in the future.
///
/// A post pointing at a category that was not supplied counts as hidden.
pub fn is_publicly_visible(post: &Post, category: Option<&Category>, now: DateTime<Utc>) -> bool {
    let category_published = match post.category_id {
        None => true,
        Some(id) => category.is_some_and(|c| c.id == id && c.is_published),
    };

    post.is_published && category_published && post.pub_date <= now
}

/// Listing order: newest publication date first, id as a tie-breaker so
/// pages never overlap.
pub fn newest_first(a: &Post, b: &Post) -> Ordering {
    b.pub_date.cmp(&a.pub_date).then_with(|| b.id.cmp(&a.id))
}

/// Which posts a read may see, independent of any further narrowing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostScope {
    /// Everything, drafts and scheduled posts included.
    Everything,
    /// Only posts that are publicly visible at `now`.
    Published { now: DateTime<Utc> },
    /// Everything `owner_id` wrote, plus whatever is publicly visible.
    OwnedOrPublished { owner_id: Uuid, now: DateTime<Utc> },
}

impl PostScope {
    /// Scope for reading a single post: authenticated viewers also see their
    /// own drafts.
    pub fn for_viewer(viewer: &Viewer, now: DateTime<Utc>) -> Self {
        match viewer.user_id() {
            Some(owner_id) => Self::OwnedOrPublished { owner_id, now },
            None => Self::Published { now },
        }
    }

    pub fn admits(&self, record: &PostRecord) -> bool {
        match *self {
            Self::Everything => true,
            Self::Published { now } => record.is_publicly_visible(now),
            Self::OwnedOrPublished { owner_id, now } => {
                record.post.author_id == owner_id || record.is_publicly_visible(now)
            }
        }
    }
}

/// A filtered post collection, ordered by [`newest_first`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostQuery {
    pub scope: PostScope,
    pub category_id: Option<Uuid>,
    pub author_id: Option<Uuid>,
}

impl PostQuery {
    pub fn new(scope: PostScope) -> Self {
        Self {
            scope,
            category_id: None,
            author_id: None,
        }
    }

    pub fn in_category(mut self, category_id: Uuid) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn by_author(mut self, author_id: Uuid) -> Self {
        self.author_id = Some(author_id);
        self
    }

    pub fn matches(&self, record: &PostRecord) -> bool {
        self.category_id
            .is_none_or(|id| record.post.category_id == Some(id))
            && self.author_id.is_none_or(|id| record.post.author_id == id)
            && self.scope.admits(record)
    }
}
