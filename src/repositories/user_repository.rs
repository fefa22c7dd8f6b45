//! MongoDB-backed user repository.
//!
//! Username uniqueness is enforced by a unique index on the collection, not by a
//! read-before-write check, so concurrent creates of the same username resolve
//! to exactly one success.

use log::{debug, info, warn};
use mongodb::bson::{doc, oid::ObjectId, DateTime};
use mongodb::options::IndexOptions;
use mongodb::{Collection, Database, IndexModel};

use crate::constants::COLLECTION_USERS;
use crate::database::{with_timeout, CONNECT_TIMEOUT};
use crate::errors::DbError;
use crate::models::User;
use crate::repositories::UserRepository;
use crate::utils::log_sanitizer::mask_username;

const LOG_TARGET: &str = "synapse_sprint::user_repo";

/// Repository for the `users` collection.
///
/// Holds only driver handles, which are cheap to clone and safe to share across
/// tasks.
#[derive(Clone, Debug)]
pub struct MongoUserRepository {
    db: Database,
    collection: Collection<User>,
}

impl MongoUserRepository {
    /// Bind to the `users` collection and make sure the unique username index
    /// exists.
    ///
    /// Index creation failures (already present with other options, missing
    /// privileges, timeout) are logged and swallowed; the repository stays
    /// usable and relies on the index having been created earlier.
    pub async fn new(db: &Database) -> Self {
        let repository = Self {
            db: db.clone(),
            collection: db.collection(COLLECTION_USERS),
        };

        match with_timeout("create indexes", CONNECT_TIMEOUT, repository.create_indexes()).await {
            Ok(()) => info!(target: LOG_TARGET, "Unique index on username ensured."),
            Err(e) => warn!(
                target: LOG_TARGET,
                "Failed to create unique index on username: {}", e
            ),
        }

        repository
    }

    /// Create the unique ascending index on `username`.
    pub async fn create_indexes(&self) -> Result<(), DbError> {
        debug!(target: LOG_TARGET, "Creating indexes for {} collection...", COLLECTION_USERS);
        let index = IndexModel::builder()
            .keys(doc! { "username": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.collection.create_index(index).await?;
        Ok(())
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

impl UserRepository for MongoUserRepository {
    async fn create(&self, user: &mut User) -> Result<ObjectId, DbError> {
        let masked = mask_username(&user.username);
        debug!(target: LOG_TARGET, "Attempting to create user: {}", masked);

        let now = DateTime::now();
        user.created_at = now;
        user.updated_at = now;
        let id = ObjectId::new();
        user.id = Some(id);

        let result = match self.collection.insert_one(&*user).await {
            Ok(result) => result,
            Err(e) => {
                let err = DbError::from_insert(e);
                if err.is_username_exists() {
                    info!(target: LOG_TARGET, "Username '{}' already exists.", masked);
                } else {
                    warn!(target: LOG_TARGET, "Failed to insert user {}: {}", masked, err);
                }
                return Err(err);
            }
        };

        let Some(inserted_id) = result.inserted_id.as_object_id() else {
            warn!(
                target: LOG_TARGET,
                "Insert result id is not an ObjectId for user {}: {}", masked, result.inserted_id
            );
            return Err(DbError::InvalidInsertedId);
        };

        info!(
            target: LOG_TARGET,
            "Successfully created user {} with ID {}", masked, inserted_id
        );
        // The id generated above is the one returned; the echoed id is only checked.
        Ok(id)
    }

    async fn find_by_username(&self, username: &str) -> Result<User, DbError> {
        let masked = mask_username(username);
        debug!(target: LOG_TARGET, "Finding user by username: {}", masked);

        match self.collection.find_one(doc! { "username": username }).await {
            Ok(Some(user)) => Ok(user),
            Ok(None) => {
                debug!(target: LOG_TARGET, "User not found: {}", masked);
                Err(DbError::UserNotFound)
            }
            Err(e) => {
                warn!(target: LOG_TARGET, "Error finding user {}: {}", masked, e);
                Err(e.into())
            }
        }
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<User, DbError> {
        debug!(target: LOG_TARGET, "Finding user by ID: {}", id);

        match self.collection.find_one(doc! { "_id": id }).await {
            Ok(Some(user)) => Ok(user),
            Ok(None) => {
                debug!(target: LOG_TARGET, "User not found by ID: {}", id);
                Err(DbError::UserNotFound)
            }
            Err(e) => {
                warn!(target: LOG_TARGET, "Error finding user by ID {}: {}", id, e);
                Err(e.into())
            }
        }
    }
}
