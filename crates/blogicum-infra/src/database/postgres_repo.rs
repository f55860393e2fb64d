//! PostgreSQL repository implementations.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, Condition, DbConn, EntityTrait, FromQueryResult, JoinType, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Select,
    prelude::DateTimeWithTimeZone,
};
use uuid::Uuid;

use blogicum_core::domain::{
    Category, Comment, CommentRecord, ListedPost, Location, Post, PostRecord, User,
};
use blogicum_core::error::RepoError;
use blogicum_core::ports::{
    CategoryRepository, CommentRepository, LocationRepository, PostRepository, Repositories,
    UserRepository,
};
use blogicum_core::visibility::{PostQuery, PostScope};

use super::entity::category::{self, Entity as CategoryEntity};
use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::location::{self, Entity as LocationEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, repo_error};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL category repository.
pub type PostgresCategoryRepository = PostgresBaseRepository<CategoryEntity>;

/// PostgreSQL location repository.
pub type PostgresLocationRepository = PostgresBaseRepository<LocationEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL comment repository.
pub type PostgresCommentRepository = PostgresBaseRepository<CommentEntity>;

/// Wire every repository to one connection pool.
pub fn repositories(db: DbConn) -> Repositories {
    Repositories {
        users: Arc::new(PostgresUserRepository::new(db.clone())),
        categories: Arc::new(PostgresCategoryRepository::new(db.clone())),
        locations: Arc::new(PostgresLocationRepository::new(db.clone())),
        posts: Arc::new(PostgresPostRepository::new(db.clone())),
        comments: Arc::new(PostgresCommentRepository::new(db)),
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(username, "Finding user by username");

        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(repo_error)?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        let result = CategoryEntity::find()
            .filter(category::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(repo_error)?;

        Ok(result.map(Into::into))
    }
}

impl LocationRepository for PostgresLocationRepository {}

/// `is_published AND pub_date <= now AND (no category OR category published)`.
///
/// Needs the category table left-joined, see [`posts_matching`].
fn publicly_visible(now: DateTimeWithTimeZone) -> Condition {
    Condition::all()
        .add(post::Column::IsPublished.eq(true))
        .add(post::Column::PubDate.lte(now))
        .add(
            Condition::any()
                .add(post::Column::CategoryId.is_null())
                .add(category::Column::IsPublished.eq(true)),
        )
}

fn scope_condition(scope: PostScope) -> Condition {
    match scope {
        PostScope::Everything => Condition::all(),
        PostScope::Published { now } => publicly_visible(now.into()),
        PostScope::OwnedOrPublished { owner_id, now } => Condition::any()
            .add(post::Column::AuthorId.eq(owner_id))
            .add(publicly_visible(now.into())),
    }
}

/// Posts matching `query`. Categories are joined many-to-one, so every post
/// appears at most once.
pub(crate) fn posts_matching(query: &PostQuery) -> Select<PostEntity> {
    let mut condition = Condition::all().add(scope_condition(query.scope));
    if let Some(category_id) = query.category_id {
        condition = condition.add(post::Column::CategoryId.eq(category_id));
    }
    if let Some(author_id) = query.author_id {
        condition = condition.add(post::Column::AuthorId.eq(author_id));
    }

    PostEntity::find()
        .join(JoinType::LeftJoin, post::Relation::Category.def())
        .filter(condition)
}

#[derive(Debug, FromQueryResult)]
struct CommentCount {
    post_id: Uuid,
    comment_count: i64,
}

impl PostgresPostRepository {
    /// Attach author, category and location to each post, one query per table.
    async fn hydrate(&self, models: Vec<post::Model>) -> Result<Vec<PostRecord>, RepoError> {
        let author_ids: HashSet<Uuid> = models.iter().map(|m| m.author_id).collect();
        let category_ids: HashSet<Uuid> = models.iter().filter_map(|m| m.category_id).collect();
        let location_ids: HashSet<Uuid> = models.iter().filter_map(|m| m.location_id).collect();

        let mut authors: HashMap<Uuid, User> = HashMap::new();
        if !author_ids.is_empty() {
            for model in UserEntity::find()
                .filter(user::Column::Id.is_in(author_ids))
                .all(&self.db)
                .await
                .map_err(repo_error)?
            {
                authors.insert(model.id, model.into());
            }
        }

        let mut categories: HashMap<Uuid, Category> = HashMap::new();
        if !category_ids.is_empty() {
            for model in CategoryEntity::find()
                .filter(category::Column::Id.is_in(category_ids))
                .all(&self.db)
                .await
                .map_err(repo_error)?
            {
                categories.insert(model.id, model.into());
            }
        }

        let mut locations: HashMap<Uuid, Location> = HashMap::new();
        if !location_ids.is_empty() {
            for model in LocationEntity::find()
                .filter(location::Column::Id.is_in(location_ids))
                .all(&self.db)
                .await
                .map_err(repo_error)?
            {
                locations.insert(model.id, model.into());
            }
        }

        models
            .into_iter()
            .map(|model| {
                let post = Post::from(model);
                let author = authors.get(&post.author_id).cloned().ok_or_else(|| {
                    RepoError::Query(format!("author of post {} is missing", post.id))
                })?;
                let category = post.category_id.and_then(|id| categories.get(&id).cloned());
                let location = post.location_id.and_then(|id| locations.get(&id).cloned());

                Ok(PostRecord {
                    post,
                    author,
                    category,
                    location,
                })
            })
            .collect()
    }

    async fn comment_counts(&self, post_ids: Vec<Uuid>) -> Result<HashMap<Uuid, u64>, RepoError> {
        if post_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = CommentEntity::find()
            .select_only()
            .column(comment::Column::PostId)
            .column_as(comment::Column::Id.count(), "comment_count")
            .filter(comment::Column::PostId.is_in(post_ids))
            .group_by(comment::Column::PostId)
            .into_model::<CommentCount>()
            .all(&self.db)
            .await
            .map_err(repo_error)?;

        Ok(rows
            .into_iter()
            .map(|row| (row.post_id, u64::try_from(row.comment_count).unwrap_or(0)))
            .collect())
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_record(
        &self,
        id: Uuid,
        scope: PostScope,
    ) -> Result<Option<PostRecord>, RepoError> {
        let model = posts_matching(&PostQuery::new(scope))
            .filter(post::Column::Id.eq(id))
            .one(&self.db)
            .await
            .map_err(repo_error)?;

        match model {
            Some(model) => Ok(self.hydrate(vec![model]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn count(&self, query: &PostQuery) -> Result<u64, RepoError> {
        posts_matching(query)
            .count(&self.db)
            .await
            .map_err(repo_error)
    }

    async fn find_page(
        &self,
        query: &PostQuery,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<ListedPost>, RepoError> {
        tracing::debug!(?query, offset, limit, "Loading post page");

        let models = posts_matching(query)
            .order_by_desc(post::Column::PubDate)
            .order_by_desc(post::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(repo_error)?;

        let ids = models.iter().map(|m| m.id).collect();
        let records = self.hydrate(models).await?;
        let counts = self.comment_counts(ids).await?;

        Ok(records
            .into_iter()
            .map(|record| ListedPost {
                comment_count: counts.get(&record.post.id).copied().unwrap_or(0),
                record,
            })
            .collect())
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn find_by_post(&self, post_id: Uuid) -> Result<Vec<CommentRecord>, RepoError> {
        let rows = CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .find_also_related(UserEntity)
            .order_by_asc(comment::Column::CreatedAt)
            .order_by_asc(comment::Column::Id)
            .all(&self.db)
            .await
            .map_err(repo_error)?;

        rows.into_iter()
            .map(|(comment, author)| {
                let comment = Comment::from(comment);
                let author = author.ok_or_else(|| {
                    RepoError::Query(format!("author of comment {} is missing", comment.id))
                })?;
                Ok(CommentRecord {
                    comment,
                    author: author.into(),
                })
            })
            .collect()
    }

    async fn find_by_author(&self, author_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let result = CommentEntity::find()
            .filter(comment::Column::AuthorId.eq(author_id))
            .order_by_asc(comment::Column::CreatedAt)
            .order_by_asc(comment::Column::Id)
            .all(&self.db)
            .await
            .map_err(repo_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_authored(
        &self,
        id: Uuid,
        author_id: Uuid,
    ) -> Result<Option<Comment>, RepoError> {
        let result = CommentEntity::find_by_id(id)
            .filter(comment::Column::AuthorId.eq(author_id))
            .one(&self.db)
            .await
            .map_err(repo_error)?;

        Ok(result.map(Into::into))
    }
}
