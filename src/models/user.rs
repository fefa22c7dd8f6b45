use std::fmt;

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

/// Account roles. The set is closed; unknown values are rejected on decode.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Parent,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Parent => "parent",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User document stored in the `users` collection.
///
/// `password_hash` is an opaque, already-hashed value; plaintext passwords never
/// reach this type.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub username: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl User {
    /// Build an unsaved user. The id stays empty and the timestamps are
    /// overwritten when the record is created.
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>, role: Role) -> Self {
        let now = DateTime::now();
        Self {
            id: None,
            username: username.into(),
            password_hash: password_hash.into(),
            role,
            created_at: now,
            updated_at: now,
        }
    }
}
