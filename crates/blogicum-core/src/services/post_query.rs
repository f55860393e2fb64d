//! Post reads: index, category, profile and detail.

use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::domain::{Category, CommentRecord, ListedPost, PostRecord, User, Viewer};
use crate::error::DomainError;
use crate::pagination::{PAGE_SIZE, Page, PageNumber, PageWindow};
use crate::ports::{
    CategoryRepository, Clock, CommentRepository, PostRepository, Repositories, UserRepository,
};
use crate::visibility::{PostQuery, PostScope};

/// A published category and one page of its visible posts.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryListing {
    pub category: Category,
    pub page: Page<ListedPost>,
}

/// A user's profile and one page of the posts the viewer may see.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileListing {
    pub profile: User,
    /// The viewer is looking at their own profile, drafts included.
    pub is_owner: bool,
    pub page: Page<ListedPost>,
}

/// A readable post and its comments, oldest first.
#[derive(Debug, Clone, Serialize)]
pub struct PostDetail {
    pub record: PostRecord,
    pub comments: Vec<CommentRecord>,
}

/// The post query engine.
pub struct PostQueries {
    posts: Arc<dyn PostRepository>,
    categories: Arc<dyn CategoryRepository>,
    users: Arc<dyn UserRepository>,
    comments: Arc<dyn CommentRepository>,
    clock: Arc<dyn Clock>,
}

impl PostQueries {
    pub fn new(repos: &Repositories, clock: Arc<dyn Clock>) -> Self {
        Self {
            posts: repos.posts.clone(),
            categories: repos.categories.clone(),
            users: repos.users.clone(),
            comments: repos.comments.clone(),
            clock,
        }
    }

    /// Every publicly visible post, newest first.
    pub async fn list_index(&self, page: PageNumber) -> Result<Page<ListedPost>, DomainError> {
        let query = PostQuery::new(PostScope::Published {
            now: self.clock.now(),
        });
        self.paginate(&query, page).await
    }

    /// Visible posts of a published category.
    ///
    /// An unpublished category is reported as `NotFound`, same as an unknown
    /// slug, so hidden categories do not leak.
    pub async fn list_by_category(
        &self,
        slug: &str,
        page: PageNumber,
    ) -> Result<CategoryListing, DomainError> {
        let category = self
            .categories
            .find_by_slug(slug)
            .await?
            .filter(|c| c.is_published)
            .ok_or_else(|| {
                tracing::debug!(slug, "Category missing or unpublished");
                DomainError::not_found("category", slug)
            })?;

        let query = PostQuery::new(PostScope::Published {
            now: self.clock.now(),
        })
        .in_category(category.id);
        let page = self.paginate(&query, page).await?;

        Ok(CategoryListing { category, page })
    }

    /// Posts on a user's profile. The owner sees all of them, drafts and
    /// scheduled posts included; everyone else sees the public ones.
    pub async fn list_by_author(
        &self,
        username: &str,
        viewer: &Viewer,
        page: PageNumber,
    ) -> Result<ProfileListing, DomainError> {
        let profile = self
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| DomainError::not_found("user", username))?;

        let is_owner = viewer.is(profile.id);
        let scope = if is_owner {
            PostScope::Everything
        } else {
            PostScope::Published {
                now: self.clock.now(),
            }
        };
        let query = PostQuery::new(scope).by_author(profile.id);
        let page = self.paginate(&query, page).await?;

        Ok(ProfileListing {
            profile,
            is_owner,
            page,
        })
    }

    /// A single post. Authors see their own posts in any state; everything
    /// else must be publicly visible. Absent and hidden both yield `NotFound`.
    pub async fn get_detail(
        &self,
        post_id: Uuid,
        viewer: &Viewer,
    ) -> Result<PostRecord, DomainError> {
        let scope = PostScope::for_viewer(viewer, self.clock.now());

        self.posts
            .find_record(post_id, scope)
            .await?
            .ok_or_else(|| DomainError::not_found("post", post_id))
    }

    /// [`get_detail`](Self::get_detail) plus the comments under the post.
    pub async fn detail(&self, post_id: Uuid, viewer: &Viewer) -> Result<PostDetail, DomainError> {
        let record = self.get_detail(post_id, viewer).await?;
        let comments = self.comments.find_by_post(record.post.id).await?;

        Ok(PostDetail { record, comments })
    }

    async fn paginate(
        &self,
        query: &PostQuery,
        requested: PageNumber,
    ) -> Result<Page<ListedPost>, DomainError> {
        let total = self.posts.count(query).await?;
        let window = PageWindow::resolve(requested, total, PAGE_SIZE);
        let items = self
            .posts
            .find_page(query, window.offset(), window.limit())
            .await?;

        Ok(Page::new(window, items))
    }
}
