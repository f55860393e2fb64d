//! In-memory store - used by tests and as the fallback when no database is
//! configured.
//!
//! Enforces the same unique keys, foreign keys and cascades as the SQL schema.
//! Note: Data is lost on process restart.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use blogicum_core::domain::{
    Category, Comment, CommentRecord, ListedPost, Location, Post, PostRecord, User,
};
use blogicum_core::error::RepoError;
use blogicum_core::ports::{
    BaseRepository, CategoryRepository, CommentRepository, LocationRepository, PostRepository,
    Repositories, UserRepository,
};
use blogicum_core::visibility::{PostQuery, PostScope, newest_first};

#[cfg(test)]
mod tests;

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    categories: HashMap<Uuid, Category>,
    locations: HashMap<Uuid, Location>,
    posts: HashMap<Uuid, Post>,
    comments: HashMap<Uuid, Comment>,
}

impl Tables {
    fn record(&self, post: &Post) -> Result<PostRecord, RepoError> {
        let author = self.users.get(&post.author_id).cloned().ok_or_else(|| {
            RepoError::Query(format!("post {} references a missing author", post.id))
        })?;

        Ok(PostRecord {
            post: post.clone(),
            author,
            category: post
                .category_id
                .and_then(|id| self.categories.get(&id))
                .cloned(),
            location: post
                .location_id
                .and_then(|id| self.locations.get(&id))
                .cloned(),
        })
    }

    fn matching(&self, query: &PostQuery) -> Result<Vec<PostRecord>, RepoError> {
        let mut records = Vec::new();
        for post in self.posts.values() {
            let record = self.record(post)?;
            if query.matches(&record) {
                records.push(record);
            }
        }
        records.sort_by(|a, b| newest_first(&a.post, &b.post));
        Ok(records)
    }

    fn comment_count(&self, post_id: Uuid) -> u64 {
        self.comments
            .values()
            .filter(|c| c.post_id == post_id)
            .count() as u64
    }

    fn remove_post(&mut self, post_id: Uuid) {
        self.posts.remove(&post_id);
        self.comments.retain(|_, c| c.post_id != post_id);
    }
}

/// One table of the store.
trait Row: Clone + Send + Sync + 'static {
    const NAME: &'static str;

    fn id(&self) -> Uuid;
    fn table(tables: &Tables) -> &HashMap<Uuid, Self>;
    fn table_mut(tables: &mut Tables) -> &mut HashMap<Uuid, Self>;

    /// Unique and foreign-key checks run before every write.
    fn check(&self, _tables: &Tables) -> Result<(), RepoError> {
        Ok(())
    }

    /// Runs after the row itself has been removed.
    fn cascade(_id: Uuid, _tables: &mut Tables) {}
}

fn missing(what: &str, id: Uuid) -> RepoError {
    RepoError::Query(format!("{what} {id} does not exist"))
}

impl Row for User {
    const NAME: &'static str = "user";

    fn id(&self) -> Uuid {
        self.id
    }
    fn table(tables: &Tables) -> &HashMap<Uuid, Self> {
        &tables.users
    }
    fn table_mut(tables: &mut Tables) -> &mut HashMap<Uuid, Self> {
        &mut tables.users
    }

    fn check(&self, tables: &Tables) -> Result<(), RepoError> {
        if tables
            .users
            .values()
            .any(|u| u.id != self.id && u.username == self.username)
        {
            return Err(RepoError::Constraint(format!(
                "username {} already exists",
                self.username
            )));
        }
        Ok(())
    }

    fn cascade(id: Uuid, tables: &mut Tables) {
        let owned: Vec<Uuid> = tables
            .posts
            .values()
            .filter(|p| p.author_id == id)
            .map(|p| p.id)
            .collect();
        for post_id in owned {
            tables.remove_post(post_id);
        }
        tables.comments.retain(|_, c| c.author_id != id);
    }
}

impl Row for Category {
    const NAME: &'static str = "category";

    fn id(&self) -> Uuid {
        self.id
    }
    fn table(tables: &Tables) -> &HashMap<Uuid, Self> {
        &tables.categories
    }
    fn table_mut(tables: &mut Tables) -> &mut HashMap<Uuid, Self> {
        &mut tables.categories
    }

    fn check(&self, tables: &Tables) -> Result<(), RepoError> {
        if tables
            .categories
            .values()
            .any(|c| c.id != self.id && c.slug == self.slug)
        {
            return Err(RepoError::Constraint(format!(
                "category slug {} already exists",
                self.slug
            )));
        }
        Ok(())
    }

    fn cascade(id: Uuid, tables: &mut Tables) {
        for post in tables.posts.values_mut() {
            if post.category_id == Some(id) {
                post.category_id = None;
            }
        }
    }
}

impl Row for Location {
    const NAME: &'static str = "location";

    fn id(&self) -> Uuid {
        self.id
    }
    fn table(tables: &Tables) -> &HashMap<Uuid, Self> {
        &tables.locations
    }
    fn table_mut(tables: &mut Tables) -> &mut HashMap<Uuid, Self> {
        &mut tables.locations
    }

    fn cascade(id: Uuid, tables: &mut Tables) {
        for post in tables.posts.values_mut() {
            if post.location_id == Some(id) {
                post.location_id = None;
            }
        }
    }
}

impl Row for Post {
    const NAME: &'static str = "post";

    fn id(&self) -> Uuid {
        self.id
    }
    fn table(tables: &Tables) -> &HashMap<Uuid, Self> {
        &tables.posts
    }
    fn table_mut(tables: &mut Tables) -> &mut HashMap<Uuid, Self> {
        &mut tables.posts
    }

    fn check(&self, tables: &Tables) -> Result<(), RepoError> {
        if !tables.users.contains_key(&self.author_id) {
            return Err(missing("user", self.author_id));
        }
        if let Some(id) = self.category_id.filter(|id| !tables.categories.contains_key(id)) {
            return Err(missing("category", id));
        }
        if let Some(id) = self.location_id.filter(|id| !tables.locations.contains_key(id)) {
            return Err(missing("location", id));
        }
        Ok(())
    }

    fn cascade(id: Uuid, tables: &mut Tables) {
        tables.comments.retain(|_, c| c.post_id != id);
    }
}

impl Row for Comment {
    const NAME: &'static str = "comment";

    fn id(&self) -> Uuid {
        self.id
    }
    fn table(tables: &Tables) -> &HashMap<Uuid, Self> {
        &tables.comments
    }
    fn table_mut(tables: &mut Tables) -> &mut HashMap<Uuid, Self> {
        &mut tables.comments
    }

    fn check(&self, tables: &Tables) -> Result<(), RepoError> {
        if !tables.posts.contains_key(&self.post_id) {
            return Err(missing("post", self.post_id));
        }
        if !tables.users.contains_key(&self.author_id) {
            return Err(missing("user", self.author_id));
        }
        Ok(())
    }
}

/// In-memory store using HashMaps behind a single async RwLock.
///
/// Every write takes the write lock for its whole check-and-apply, so each
/// call is atomic.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand the store out as every repository port at once.
    pub fn repositories(self: &Arc<Self>) -> Repositories {
        Repositories {
            users: self.clone(),
            categories: self.clone(),
            locations: self.clone(),
            posts: self.clone(),
            comments: self.clone(),
        }
    }

    async fn find_row<T: Row>(&self, id: Uuid) -> Option<T> {
        let tables = self.tables.read().await;
        T::table(&tables).get(&id).cloned()
    }

    async fn insert_row<T: Row>(&self, row: T) -> Result<T, RepoError> {
        let mut tables = self.tables.write().await;
        if T::table(&tables).contains_key(&row.id()) {
            return Err(RepoError::Constraint(format!(
                "{} {} already exists",
                T::NAME,
                row.id()
            )));
        }
        row.check(&tables)?;
        T::table_mut(&mut tables).insert(row.id(), row.clone());
        tracing::debug!(entity = T::NAME, id = %row.id(), "Inserted");
        Ok(row)
    }

    async fn update_row<T: Row>(&self, row: T) -> Result<T, RepoError> {
        let mut tables = self.tables.write().await;
        if !T::table(&tables).contains_key(&row.id()) {
            return Err(RepoError::NotFound);
        }
        row.check(&tables)?;
        T::table_mut(&mut tables).insert(row.id(), row.clone());
        Ok(row)
    }

    async fn delete_row<T: Row>(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if T::table_mut(&mut tables).remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        T::cascade(id, &mut tables);
        tracing::debug!(entity = T::NAME, %id, "Deleted");
        Ok(())
    }
}

macro_rules! base_repository {
    ($($entity:ty),+ $(,)?) => {$(
        #[async_trait]
        impl BaseRepository<$entity, Uuid> for InMemoryStore {
            async fn find_by_id(&self, id: Uuid) -> Result<Option<$entity>, RepoError> {
                Ok(self.find_row(id).await)
            }

            async fn insert(&self, entity: $entity) -> Result<$entity, RepoError> {
                self.insert_row(entity).await
            }

            async fn update(&self, entity: $entity) -> Result<$entity, RepoError> {
                self.update_row(entity).await
            }

            async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
                self.delete_row::<$entity>(id).await
            }
        }
    )+};
}

base_repository!(User, Category, Location, Post, Comment);

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(username, "Finding user by username");
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }
}

#[async_trait]
impl CategoryRepository for InMemoryStore {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .categories
            .values()
            .find(|c| c.slug == slug)
            .cloned())
    }
}

impl LocationRepository for InMemoryStore {}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn find_record(
        &self,
        id: Uuid,
        scope: PostScope,
    ) -> Result<Option<PostRecord>, RepoError> {
        let tables = self.tables.read().await;
        let Some(post) = tables.posts.get(&id) else {
            return Ok(None);
        };

        let record = tables.record(post)?;
        Ok(scope.admits(&record).then_some(record))
    }

    async fn count(&self, query: &PostQuery) -> Result<u64, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.matching(query)?.len() as u64)
    }

    async fn find_page(
        &self,
        query: &PostQuery,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<ListedPost>, RepoError> {
        let tables = self.tables.read().await;
        let page = tables
            .matching(query)?
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .map(|record| ListedPost {
                comment_count: tables.comment_count(record.post.id),
                record,
            })
            .collect();

        Ok(page)
    }
}

#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn find_by_post(&self, post_id: Uuid) -> Result<Vec<CommentRecord>, RepoError> {
        let tables = self.tables.read().await;
        let mut comments: Vec<&Comment> = tables
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .collect();
        comments.sort_by_key(|c| (c.created_at, c.id));

        comments
            .into_iter()
            .map(|comment| {
                let author = tables.users.get(&comment.author_id).cloned().ok_or_else(|| {
                    RepoError::Query(format!("comment {} references a missing author", comment.id))
                })?;
                Ok(CommentRecord {
                    comment: comment.clone(),
                    author,
                })
            })
            .collect()
    }

    async fn find_by_author(&self, author_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let tables = self.tables.read().await;
        let mut comments: Vec<Comment> = tables
            .comments
            .values()
            .filter(|c| c.author_id == author_id)
            .cloned()
            .collect();
        comments.sort_by_key(|c| (c.created_at, c.id));
        Ok(comments)
    }

    async fn find_authored(
        &self,
        id: Uuid,
        author_id: Uuid,
    ) -> Result<Option<Comment>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .comments
            .get(&id)
            .filter(|c| c.author_id == author_id)
            .cloned())
    }
}
