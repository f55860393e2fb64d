//! Comment reads.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Comment, CommentRecord, Viewer};
use crate::error::DomainError;
use crate::ports::{CommentRepository, Repositories};

/// The comment query engine.
///
/// The set a viewer may edit or delete is exactly the set they wrote; there
/// is no separate permission check for comments.
pub struct CommentQueries {
    comments: Arc<dyn CommentRepository>,
}

impl CommentQueries {
    pub fn new(repos: &Repositories) -> Self {
        Self {
            comments: repos.comments.clone(),
        }
    }

    /// Comments under a post, oldest first.
    pub async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<CommentRecord>, DomainError> {
        Ok(self.comments.find_by_post(post_id).await?)
    }

    /// Every comment the viewer may edit or delete.
    pub async fn mutable_scope(&self, viewer: &Viewer) -> Result<Vec<Comment>, DomainError> {
        let author_id = viewer.user_id().ok_or(DomainError::Unauthenticated)?;
        Ok(self.comments.find_by_author(author_id).await?)
    }

    /// Load one comment through the viewer's mutable scope. Someone else's
    /// comment is `NotFound`, not `Forbidden`.
    pub async fn find_mutable(
        &self,
        viewer: &Viewer,
        comment_id: Uuid,
    ) -> Result<Comment, DomainError> {
        let author_id = viewer.user_id().ok_or(DomainError::Unauthenticated)?;

        self.comments
            .find_authored(comment_id, author_id)
            .await?
            .ok_or_else(|| DomainError::not_found("comment", comment_id))
    }
}
