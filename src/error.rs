use rusqlite::Error as DbError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong in the election system.
///
/// All variants are recoverable and user-facing: the display layer is
/// expected to show the message and let the caller try again.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Db(#[from] DbError),
    #[error(transparent)]
    Argon2(#[from] argon2::Error),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
    #[error("Not authenticated: {0}")]
    NotAuthenticated(String),
    #[error("{voter_name} has already voted in this election")]
    AlreadyVoted { voter_name: String },
}

/// Return true if the given error is a UNIQUE or PRIMARY KEY violation.
///
/// SQLite reports both as generic constraint failures; this narrows them so
/// insert paths can surface [`Error::DuplicateKey`] instead of a raw
/// database error.
pub(crate) fn is_duplicate_key_error(err: &DbError) -> bool {
    matches!(
        err,
        DbError::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}
