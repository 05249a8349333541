/// Failures surfaced by the persistence gateway. Missing rows on reads are
/// `Ok(None)`, never an error.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A save referenced an author, publisher, book, or reviewer that is not
    /// persisted. SQLite rejects the statement, so nothing is written.
    #[error("save references an entity that does not exist")]
    ReferentialIntegrity,

    /// A save collided with a unique key (the ISBN index or a duplicate
    /// book/reviewer link).
    #[error("value collides with an existing unique key")]
    Duplicate,

    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
}

/// Map driver errors onto gateway errors by inspecting the SQLite message;
/// the sqlite driver does not expose constraint kinds as typed codes.
pub(crate) fn classify(error: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &error {
        let message = db_err.message();
        if message.contains("FOREIGN KEY constraint failed") {
            return StoreError::ReferentialIntegrity;
        }
        if message.contains("UNIQUE constraint failed") {
            return StoreError::Duplicate;
        }
    }
    StoreError::Db(error)
}
