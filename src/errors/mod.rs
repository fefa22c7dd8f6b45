//! Error taxonomy for the data-access layer.
//!
//! Store-specific failures are classified here and nowhere else: the repository
//! hands every driver error to this module, which decides whether it maps to a
//! distinguished variant or passes through untouched.

use std::time::Duration;

use mongodb::error::{ErrorKind, WriteFailure};

use crate::constants::{
    CODE_DATABASE_ERROR, CODE_INVALID_INSERTED_ID, CODE_TIMEOUT, CODE_USERNAME_EXISTS,
    CODE_USER_NOT_FOUND, ERR_INVALID_INSERTED_ID, ERR_USERNAME_EXISTS, ERR_USER_NOT_FOUND,
    MONGO_DUPLICATE_KEY_CODE,
};

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// A user with the same username is already stored.
    #[error("{}", ERR_USERNAME_EXISTS)]
    UsernameExists,
    /// The lookup matched no document.
    #[error("{}", ERR_USER_NOT_FOUND)]
    UserNotFound,
    /// The store acknowledged an insert with an identifier that is not an ObjectId.
    #[error("{}", ERR_INVALID_INSERTED_ID)]
    InvalidInsertedId,
    #[error("{operation} timed out after {timeout:?}")]
    Timeout {
        operation: &'static str,
        timeout: Duration,
    },
    /// Any other driver failure, kept as-is so the root cause survives.
    #[error(transparent)]
    Mongo(#[from] mongodb::error::Error),
}

impl DbError {
    /// Machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::UsernameExists => CODE_USERNAME_EXISTS,
            Self::UserNotFound => CODE_USER_NOT_FOUND,
            Self::InvalidInsertedId => CODE_INVALID_INSERTED_ID,
            Self::Timeout { .. } => CODE_TIMEOUT,
            Self::Mongo(_) => CODE_DATABASE_ERROR,
        }
    }

    pub fn is_username_exists(&self) -> bool {
        matches!(self, Self::UsernameExists)
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::UserNotFound)
    }

    /// Translate a failed insert of a user document.
    pub(crate) fn from_insert(err: mongodb::error::Error) -> Self {
        if is_duplicate_key(&err) {
            Self::UsernameExists
        } else {
            Self::Mongo(err)
        }
    }
}

/// Whether the server rejected a write because of a unique index violation.
pub fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    server_error_code(err) == Some(MONGO_DUPLICATE_KEY_CODE)
}

fn server_error_code(err: &mongodb::error::Error) -> Option<i32> {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => Some(write_error.code),
        ErrorKind::Write(WriteFailure::WriteConcernError(concern_error)) => {
            Some(concern_error.code)
        }
        ErrorKind::Command(command_error) => Some(command_error.code),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;
    use mongodb::error::WriteError;

    #[test]
    fn test_distinguished_errors_have_stable_codes() {
        assert_eq!(DbError::UsernameExists.code(), "USERNAME_EXISTS");
        assert_eq!(DbError::UserNotFound.code(), "USER_NOT_FOUND");
        assert_eq!(DbError::InvalidInsertedId.code(), "INVALID_INSERTED_ID");
        let timeout = DbError::Timeout {
            operation: "ping",
            timeout: Duration::from_secs(5),
        };
        assert_eq!(timeout.code(), "TIMEOUT");
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(DbError::UsernameExists.to_string(), "username already exists");
        assert_eq!(DbError::UserNotFound.to_string(), "user not found");
        assert_eq!(
            DbError::InvalidInsertedId.to_string(),
            "inserted id is not an ObjectId"
        );
        let timeout = DbError::Timeout {
            operation: "ping",
            timeout: Duration::from_secs(5),
        };
        assert_eq!(timeout.to_string(), "ping timed out after 5s");
    }

    fn write_error(code: i32) -> mongodb::error::Error {
        let write_error: WriteError = mongodb::bson::from_document(doc! {
            "code": code,
            "errmsg": "E11000 duplicate key error collection: db.users index: username_1",
        })
        .unwrap();
        mongodb::error::Error::from(ErrorKind::Write(WriteFailure::WriteError(write_error)))
    }

    #[test]
    fn test_duplicate_key_maps_to_username_exists() {
        let err = write_error(11000);
        assert!(is_duplicate_key(&err));
        assert!(DbError::from_insert(err).is_username_exists());
    }

    #[test]
    fn test_other_write_errors_pass_through() {
        let err = write_error(121);
        assert!(!is_duplicate_key(&err));
        match DbError::from_insert(err) {
            DbError::Mongo(inner) => match inner.kind.as_ref() {
                ErrorKind::Write(WriteFailure::WriteError(write_error)) => {
                    assert_eq!(write_error.code, 121)
                }
                other => panic!("driver error was rewritten: {:?}", other),
            },
            other => panic!("expected pass-through, got {:?}", other),
        }
    }

    #[test]
    fn test_predicates() {
        assert!(DbError::UsernameExists.is_username_exists());
        assert!(!DbError::UsernameExists.is_not_found());
        assert!(DbError::UserNotFound.is_not_found());
        assert!(!DbError::UserNotFound.is_username_exists());
    }
}
