use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Category, Location, User};
use crate::error::DomainError;
use crate::visibility;

const TITLE_MAX_LEN: usize = 256;

/// Post entity - a blog post, possibly a draft or scheduled for later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    /// Set at creation, never changed afterwards.
    pub author_id: Uuid,
    pub title: String,
    pub text: String,
    /// Scheduled or actual publication instant.
    pub pub_date: DateTime<Utc>,
    pub is_published: bool,
    pub category_id: Option<Uuid>,
    pub location_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post owned by `author_id`.
    pub fn new(author_id: Uuid, fields: PostFields, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            author_id,
            title: fields.title,
            text: fields.text,
            pub_date: fields.pub_date,
            is_published: fields.is_published,
            category_id: fields.category_id,
            location_id: fields.location_id,
            created_at: now,
        }
    }

    /// Replace the editable fields. Author and creation time are untouched.
    pub fn apply(&mut self, fields: PostFields) {
        self.title = fields.title;
        self.text = fields.text;
        self.pub_date = fields.pub_date;
        self.is_published = fields.is_published;
        self.category_id = fields.category_id;
        self.location_id = fields.location_id;
    }

    pub fn fields(&self) -> PostFields {
        PostFields {
            title: self.title.clone(),
            text: self.text.clone(),
            pub_date: self.pub_date,
            is_published: self.is_published,
            category_id: self.category_id,
            location_id: self.location_id,
        }
    }
}

/// The author-editable part of a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostFields {
    pub title: String,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub is_published: bool,
    pub category_id: Option<Uuid>,
    pub location_id: Option<Uuid>,
}

impl PostFields {
    /// Shape checks only; whether the category and location exist is the
    /// store's business.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.title.trim().is_empty() {
            return Err(DomainError::Validation("title must not be blank".to_string()));
        }
        if self.title.chars().count() > TITLE_MAX_LEN {
            return Err(DomainError::Validation(format!(
                "title must be at most {TITLE_MAX_LEN} characters"
            )));
        }
        if self.text.trim().is_empty() {
            return Err(DomainError::Validation("text must not be blank".to_string()));
        }
        Ok(())
    }
}

/// Post field values prepared for a form.
///
/// A read-only form backs the delete confirmation page: same values, no
/// editing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostForm {
    post_id: Uuid,
    fields: PostFields,
    read_only: bool,
}

impl PostForm {
    pub fn editable(post: &Post) -> Self {
        Self {
            post_id: post.id,
            fields: post.fields(),
            read_only: false,
        }
    }

    pub fn read_only(post: &Post) -> Self {
        Self {
            post_id: post.id,
            fields: post.fields(),
            read_only: true,
        }
    }

    pub fn post_id(&self) -> Uuid {
        self.post_id
    }

    pub fn fields(&self) -> &PostFields {
        &self.fields
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }
}

/// A post joined with the rows it points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostRecord {
    pub post: Post,
    pub author: User,
    pub category: Option<Category>,
    pub location: Option<Location>,
}

impl PostRecord {
    pub fn is_publicly_visible(&self, now: DateTime<Utc>) -> bool {
        visibility::is_publicly_visible(&self.post, self.category.as_ref(), now)
    }
}

/// A post as it appears in a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListedPost {
    #[serde(flatten)]
    pub record: PostRecord,
    pub comment_count: u64,
}
