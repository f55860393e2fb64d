//! Writes. Every mutation passes through the [`AuthorizationGate`] before it
//! touches the store, and each store call is a single atomic write.
//!
//! Concurrent edits of the same resource are not merged: the last write wins.

use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::domain::{
    Comment, Post, PostFields, PostForm, ProfileFields, Redirect, User, Viewer,
};
use crate::error::DomainError;
use crate::ports::{
    CategoryRepository, Clock, CommentRepository, LocationRepository, PostRepository,
    Repositories, UserRepository,
};
use crate::services::AuthorizationGate;

/// A finished mutation and where to send the viewer afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Completed<T> {
    pub entity: T,
    pub redirect: Redirect,
}

pub struct BlogCommands {
    gate: AuthorizationGate,
    users: Arc<dyn UserRepository>,
    categories: Arc<dyn CategoryRepository>,
    locations: Arc<dyn LocationRepository>,
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
    clock: Arc<dyn Clock>,
}

impl BlogCommands {
    pub fn new(repos: &Repositories, clock: Arc<dyn Clock>) -> Self {
        Self {
            gate: AuthorizationGate::new(repos, clock.clone()),
            users: repos.users.clone(),
            categories: repos.categories.clone(),
            locations: repos.locations.clone(),
            posts: repos.posts.clone(),
            comments: repos.comments.clone(),
            clock,
        }
    }

    pub fn gate(&self) -> &AuthorizationGate {
        &self.gate
    }

    pub async fn create_post(
        &self,
        viewer: &Viewer,
        fields: PostFields,
    ) -> Result<Completed<Post>, DomainError> {
        let author_id = self.gate.create_post(viewer).into_result()?;
        self.validate_post(&fields).await?;

        let post = self
            .posts
            .insert(Post::new(author_id, fields, self.clock.now()))
            .await?;
        tracing::info!(post_id = %post.id, author_id = %author_id, "Post created");

        Ok(Completed {
            entity: post,
            redirect: self.profile_of(author_id).await?,
        })
    }

    /// Current values for the edit form.
    pub async fn edit_post_form(
        &self,
        viewer: &Viewer,
        post_id: Uuid,
    ) -> Result<PostForm, DomainError> {
        let post = self.gate.change_post(viewer, post_id).await?.into_result()?;
        Ok(PostForm::editable(&post))
    }

    pub async fn update_post(
        &self,
        viewer: &Viewer,
        post_id: Uuid,
        fields: PostFields,
    ) -> Result<Completed<Post>, DomainError> {
        let mut post = self.gate.change_post(viewer, post_id).await?.into_result()?;
        self.validate_post(&fields).await?;

        post.apply(fields);
        let post = self.posts.update(post).await?;
        tracing::info!(post_id = %post.id, "Post updated");

        Ok(Completed {
            entity: post,
            redirect: Redirect::PostDetail { post_id },
        })
    }

    /// Read-only snapshot shown on the delete confirmation page.
    pub async fn confirm_post_delete(
        &self,
        viewer: &Viewer,
        post_id: Uuid,
    ) -> Result<PostForm, DomainError> {
        let post = self.gate.change_post(viewer, post_id).await?.into_result()?;
        Ok(PostForm::read_only(&post))
    }

    /// Deletes the post and, with it, its comments.
    pub async fn delete_post(
        &self,
        viewer: &Viewer,
        post_id: Uuid,
    ) -> Result<Completed<Post>, DomainError> {
        let post = self.gate.change_post(viewer, post_id).await?.into_result()?;

        self.posts.delete(post.id).await?;
        tracing::info!(post_id = %post.id, "Post deleted");

        let redirect = self.profile_of(post.author_id).await?;
        Ok(Completed {
            entity: post,
            redirect,
        })
    }

    pub async fn create_comment(
        &self,
        viewer: &Viewer,
        post_id: Uuid,
        text: String,
    ) -> Result<Completed<Comment>, DomainError> {
        let (post, author_id) = self
            .gate
            .create_comment(viewer, post_id)
            .await?
            .into_result()?;
        Comment::validate_text(&text)?;

        let comment = self
            .comments
            .insert(Comment::new(post.id, author_id, text, self.clock.now()))
            .await?;
        tracing::info!(comment_id = %comment.id, post_id = %post.id, "Comment created");

        Ok(Completed {
            entity: comment,
            redirect: Redirect::PostDetail { post_id },
        })
    }

    pub async fn update_comment(
        &self,
        viewer: &Viewer,
        post_id: Uuid,
        comment_id: Uuid,
        text: String,
    ) -> Result<Completed<Comment>, DomainError> {
        let mut comment = self
            .gate
            .change_comment(viewer, post_id, comment_id)
            .await?
            .into_result()?;
        Comment::validate_text(&text)?;

        comment.text = text;
        let comment = self.comments.update(comment).await?;
        tracing::info!(comment_id = %comment.id, "Comment updated");

        Ok(Completed {
            entity: comment,
            redirect: Redirect::PostDetail { post_id },
        })
    }

    pub async fn delete_comment(
        &self,
        viewer: &Viewer,
        post_id: Uuid,
        comment_id: Uuid,
    ) -> Result<Completed<Comment>, DomainError> {
        let comment = self
            .gate
            .change_comment(viewer, post_id, comment_id)
            .await?
            .into_result()?;

        self.comments.delete(comment.id).await?;
        tracing::info!(comment_id = %comment.id, "Comment deleted");

        Ok(Completed {
            entity: comment,
            redirect: Redirect::PostDetail { post_id },
        })
    }

    /// Edit the viewer's own display fields.
    pub async fn update_profile(
        &self,
        viewer: &Viewer,
        fields: ProfileFields,
    ) -> Result<Completed<User>, DomainError> {
        let user_id = viewer.user_id().ok_or(DomainError::Unauthenticated)?;
        fields.validate()?;

        if let Some(holder) = self.users.find_by_username(&fields.username).await? {
            if holder.id != user_id {
                return Err(DomainError::Duplicate(format!(
                    "username {} is taken",
                    fields.username
                )));
            }
        }

        let mut user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("user", user_id))?;
        user.apply(fields, self.clock.now());
        let user = self.users.update(user).await?;
        tracing::info!(user_id = %user.id, "Profile updated");

        let redirect = Redirect::Profile {
            username: user.username.clone(),
        };
        Ok(Completed {
            entity: user,
            redirect,
        })
    }

    /// The author's profile, by the username currently stored. Tokens may
    /// still carry a name from before a rename.
    async fn profile_of(&self, user_id: Uuid) -> Result<Redirect, DomainError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("user", user_id))?;

        Ok(Redirect::Profile {
            username: user.username,
        })
    }

    async fn validate_post(&self, fields: &PostFields) -> Result<(), DomainError> {
        fields.validate()?;

        if let Some(category_id) = fields.category_id {
            if self.categories.find_by_id(category_id).await?.is_none() {
                return Err(DomainError::Validation(format!(
                    "unknown category {category_id}"
                )));
            }
        }
        if let Some(location_id) = fields.location_id {
            if self.locations.find_by_id(location_id).await?.is_none() {
                return Err(DomainError::Validation(format!(
                    "unknown location {location_id}"
                )));
            }
        }
        Ok(())
    }
}
