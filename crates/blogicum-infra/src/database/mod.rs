//! PostgreSQL persistence via SeaORM.

mod connection;
mod postgres_base;
pub mod postgres_repo;

pub mod entity;

pub use connection::{DatabaseConfig, connect};
pub use postgres_base::PostgresBaseRepository;
pub use postgres_repo::{
    PostgresCategoryRepository, PostgresCommentRepository, PostgresLocationRepository,
    PostgresPostRepository, PostgresUserRepository, repositories,
};
