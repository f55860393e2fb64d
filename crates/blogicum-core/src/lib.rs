//! # Blogicum Core
//!
//! The domain layer of the Blogicum blog: who may see which posts and
//! comments, and who may change them.
//! This crate contains pure business logic with zero infrastructure dependencies;
//! storage and time are reached through the traits in [`ports`].

pub mod domain;
pub mod error;
pub mod pagination;
pub mod ports;
pub mod services;
pub mod visibility;

pub use error::DomainError;
