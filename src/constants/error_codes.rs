//! Error code constants.
//!
//! These codes give each distinguished failure a machine-readable identifier,
//! so a caller can branch on the kind of error without parsing messages.

// User errors
pub const CODE_USERNAME_EXISTS: &str = "USERNAME_EXISTS";
pub const CODE_USER_NOT_FOUND: &str = "USER_NOT_FOUND";
pub const CODE_INVALID_INSERTED_ID: &str = "INVALID_INSERTED_ID";

// Infrastructure errors
pub const CODE_TIMEOUT: &str = "TIMEOUT";
pub const CODE_DATABASE_ERROR: &str = "DATABASE_ERROR";

/// MongoDB server error code for a unique index violation.
pub const MONGO_DUPLICATE_KEY_CODE: i32 = 11000;
