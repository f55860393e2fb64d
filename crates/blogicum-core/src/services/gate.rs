//! The authorization gate for create/update/delete of posts and comments.
//!
//! Per request the gate resolves the target first (absent targets are
//! `NotFound`), then decides:
//!
//! - anonymous viewer: rejected, go to the login flow;
//! - authenticated, not the author: rejected, go to the post's read-only view;
//! - the author: permitted.
//!
//! Comments are resolved through the viewer's own comment scope, so for them
//! the middle case never arises: someone else's comment is simply `NotFound`.
//! Anonymous viewers have no scope; their target is checked for existence
//! under its post before they are sent to log in.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Comment, Post, Redirect, Viewer};
use crate::error::DomainError;
use crate::ports::{Clock, CommentRepository, PostRepository, Repositories};
use crate::services::CommentQueries;
use crate::visibility::PostScope;

/// Outcome of an authorization check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision<T> {
    Permitted(T),
    Rejected(Redirect),
}

impl<T> Decision<T> {
    pub fn is_permitted(&self) -> bool {
        matches!(self, Self::Permitted(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Decision<U> {
        match self {
            Self::Permitted(value) => Decision::Permitted(f(value)),
            Self::Rejected(redirect) => Decision::Rejected(redirect),
        }
    }

    /// Rejection to the login flow becomes `Unauthenticated`; any other
    /// rejection becomes `Forbidden` carrying its redirect.
    pub fn into_result(self) -> Result<T, DomainError> {
        match self {
            Self::Permitted(value) => Ok(value),
            Self::Rejected(Redirect::Login) => Err(DomainError::Unauthenticated),
            Self::Rejected(redirect) => Err(DomainError::Forbidden { redirect }),
        }
    }
}

/// The six mutating operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    CreatePost,
    UpdatePost { post_id: Uuid },
    DeletePost { post_id: Uuid },
    CreateComment { post_id: Uuid },
    UpdateComment { post_id: Uuid, comment_id: Uuid },
    DeleteComment { post_id: Uuid, comment_id: Uuid },
}

/// What a permitted operation acts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Permit {
    /// A post about to be created by `author_id`.
    NewPost { author_id: Uuid },
    /// An existing post owned by the viewer.
    Post(Post),
    /// A comment about to be attached to `post` by `author_id`.
    NewComment { post: Post, author_id: Uuid },
    /// An existing comment owned by the viewer.
    Comment(Comment),
}

/// Ownership rule shared by every change to an existing resource.
pub fn check_owner(viewer: &Viewer, owner_id: Uuid, on_reject: Redirect) -> Decision<Uuid> {
    match viewer.user_id() {
        None => Decision::Rejected(Redirect::Login),
        Some(id) if id == owner_id => Decision::Permitted(id),
        Some(_) => Decision::Rejected(on_reject),
    }
}

pub struct AuthorizationGate {
    posts: Arc<dyn PostRepository>,
    comment_rows: Arc<dyn CommentRepository>,
    comments: CommentQueries,
    clock: Arc<dyn Clock>,
}

impl AuthorizationGate {
    pub fn new(repos: &Repositories, clock: Arc<dyn Clock>) -> Self {
        Self {
            posts: repos.posts.clone(),
            comment_rows: repos.comments.clone(),
            comments: CommentQueries::new(repos),
            clock,
        }
    }

    /// Decide any mutating operation.
    pub async fn authorize(
        &self,
        viewer: &Viewer,
        operation: Operation,
    ) -> Result<Decision<Permit>, DomainError> {
        let decision = match operation {
            Operation::CreatePost => self
                .create_post(viewer)
                .map(|author_id| Permit::NewPost { author_id }),
            Operation::UpdatePost { post_id } | Operation::DeletePost { post_id } => {
                self.change_post(viewer, post_id).await?.map(Permit::Post)
            }
            Operation::CreateComment { post_id } => self
                .create_comment(viewer, post_id)
                .await?
                .map(|(post, author_id)| Permit::NewComment { post, author_id }),
            Operation::UpdateComment {
                post_id,
                comment_id,
            }
            | Operation::DeleteComment {
                post_id,
                comment_id,
            } => self
                .change_comment(viewer, post_id, comment_id)
                .await?
                .map(Permit::Comment),
        };

        if let Decision::Rejected(redirect) = &decision {
            tracing::debug!(?operation, ?redirect, "Operation rejected");
        }
        Ok(decision)
    }

    /// Any authenticated viewer may write a post and becomes its author.
    pub fn create_post(&self, viewer: &Viewer) -> Decision<Uuid> {
        match viewer.user_id() {
            Some(author_id) => Decision::Permitted(author_id),
            None => Decision::Rejected(Redirect::Login),
        }
    }

    /// Update or delete of a post.
    pub async fn change_post(
        &self,
        viewer: &Viewer,
        post_id: Uuid,
    ) -> Result<Decision<Post>, DomainError> {
        let post = self
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("post", post_id))?;

        Ok(check_owner(viewer, post.author_id, Redirect::PostDetail { post_id }).map(|_| post))
    }

    /// Commenting requires a login and a post the viewer can read.
    pub async fn create_comment(
        &self,
        viewer: &Viewer,
        post_id: Uuid,
    ) -> Result<Decision<(Post, Uuid)>, DomainError> {
        let Some(author_id) = viewer.user_id() else {
            return Ok(Decision::Rejected(Redirect::Login));
        };

        let scope = PostScope::for_viewer(viewer, self.clock.now());
        let record = self
            .posts
            .find_record(post_id, scope)
            .await?
            .ok_or_else(|| DomainError::not_found("post", post_id))?;

        Ok(Decision::Permitted((record.post, author_id)))
    }

    /// Update or delete of a comment, addressed under its post.
    pub async fn change_comment(
        &self,
        viewer: &Viewer,
        post_id: Uuid,
        comment_id: Uuid,
    ) -> Result<Decision<Comment>, DomainError> {
        if !viewer.is_authenticated() {
            return match self.comment_rows.find_by_id(comment_id).await? {
                Some(comment) if comment.post_id == post_id => {
                    Ok(Decision::Rejected(Redirect::Login))
                }
                _ => Err(DomainError::not_found("comment", comment_id)),
            };
        }

        let comment = self.comments.find_mutable(viewer, comment_id).await?;
        if comment.post_id != post_id {
            return Err(DomainError::not_found("comment", comment_id));
        }

        Ok(Decision::Permitted(comment))
    }
}
