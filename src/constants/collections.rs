//! Database and collection names.

/// Database used when `DATABASE_NAME` is not set.
pub const DEFAULT_DATABASE_NAME: &str = "synapse_sprint_db";

pub const COLLECTION_USERS: &str = "users";
