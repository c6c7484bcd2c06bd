use thiserror::Error;

pub type LedgerResult<T> = std::result::Result<T, LedgerError>;

/// Failures surfaced by match ledger operations.
///
/// The HTTP layer maps each variant to a stable status code, so the
/// classification here is part of the API contract.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Referenced player id does not resolve
    #[error("player {0} not found")]
    PlayerNotFound(i64),

    /// Referenced match id does not resolve
    #[error("match {0} not found")]
    MatchNotFound(i64),

    /// Winner and loser must be two distinct players
    #[error("winner and loser must be different players")]
    SamePlayer,

    /// Operation attempted on a soft-deleted match
    #[error("match {0} has been deleted")]
    MatchDeleted(i64),

    /// Underlying persistence failure, surfaced unchanged. The ledger never
    /// retries: a blind retry of a rating mutation risks double-application.
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl From<rusqlite::Error> for LedgerError {
    fn from(err: rusqlite::Error) -> Self {
        LedgerError::Storage(err.into())
    }
}
