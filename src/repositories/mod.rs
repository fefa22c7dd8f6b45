//! Repository layer for database operations.
//!
//! Services depend on the [`UserRepository`] contract; the MongoDB
//! implementation is the only place that knows about documents and driver
//! errors.

#![allow(async_fn_in_trait)]

pub mod user_repository;

use mongodb::bson::oid::ObjectId;

use crate::errors::DbError;
use crate::models::User;

pub use user_repository::MongoUserRepository;

/// Data access for user accounts.
pub trait UserRepository: Send + Sync {
    /// Persist a new user. Assigns a fresh id and sets both timestamps to now
    /// on `user`, then returns the assigned id.
    ///
    /// Fails with [`DbError::UsernameExists`] when the username is taken.
    async fn create(&self, user: &mut User) -> Result<ObjectId, DbError>;

    /// Fails with [`DbError::UserNotFound`] when no user has this username.
    async fn find_by_username(&self, username: &str) -> Result<User, DbError>;

    /// Fails with [`DbError::UserNotFound`] when no user has this id.
    async fn find_by_id(&self, id: ObjectId) -> Result<User, DbError>;
}
