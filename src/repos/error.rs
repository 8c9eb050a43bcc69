/**
 * Responsibility
 * - What the repo layer tells its callers (independent of the backend)
 */
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("db error")]
    Db(#[from] sqlx::Error),
    // unique constraint hit; carries the name of the clashing field
    #[error("conflict: {0}")]
    Conflict(&'static str),
}

pub type RepoResult<T> = Result<T, RepoError>;

impl RepoError {
    /// Give meaning to unique violations (23505); everything else stays a plain db error.
    pub fn from_sqlx(e: sqlx::Error, unique_field: &'static str) -> Self {
        if let sqlx::Error::Database(dbe) = &e
            && dbe.code().as_deref() == Some("23505")
        {
            return RepoError::Conflict(unique_field);
        }
        RepoError::Db(e)
    }
}
