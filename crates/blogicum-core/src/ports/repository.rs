use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Category, Comment, CommentRecord, ListedPost, Location, Post, PostRecord, User};
use crate::error::RepoError;
use crate::visibility::{PostQuery, PostScope};

/// Generic repository trait defining standard CRUD operations.
///
/// Each call is one atomic unit; the store provides the isolation.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Store a new entity.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;

    /// Overwrite an existing entity. Fails with `NotFound` if it is gone.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Exact, case-sensitive username lookup.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;
}

/// Category repository.
#[async_trait]
pub trait CategoryRepository: BaseRepository<Category, Uuid> {
    /// Exact, case-sensitive slug lookup. Unpublished categories are returned too.
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError>;
}

/// Location repository.
pub trait LocationRepository: BaseRepository<Location, Uuid> {}

/// Post repository.
///
/// Reads take a [`PostQuery`] or [`PostScope`] and must apply it exactly as
/// [`PostQuery::matches`] does. Relations are loaded eagerly.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// The post with its relations, if it exists and the scope admits it.
    async fn find_record(&self, id: Uuid, scope: PostScope)
    -> Result<Option<PostRecord>, RepoError>;

    /// Number of posts the query matches.
    async fn count(&self, query: &PostQuery) -> Result<u64, RepoError>;

    /// Matching posts, newest first, with comment counts.
    async fn find_page(
        &self,
        query: &PostQuery,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<ListedPost>, RepoError>;
}

/// Comment repository.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, Uuid> {
    /// Comments on a post, oldest first, with their authors.
    async fn find_by_post(&self, post_id: Uuid) -> Result<Vec<CommentRecord>, RepoError>;

    /// Comments written by `author_id`, oldest first.
    async fn find_by_author(&self, author_id: Uuid) -> Result<Vec<Comment>, RepoError>;

    /// The comment, but only if `author_id` wrote it.
    async fn find_authored(
        &self,
        id: Uuid,
        author_id: Uuid,
    ) -> Result<Option<Comment>, RepoError>;
}

/// Every repository the services need, bundled for wiring.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub locations: Arc<dyn LocationRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
}
