//! Error message constants used by the data-access layer.

// User errors
pub const ERR_USERNAME_EXISTS: &str = "username already exists";
pub const ERR_USER_NOT_FOUND: &str = "user not found";
pub const ERR_INVALID_INSERTED_ID: &str = "inserted id is not an ObjectId";
