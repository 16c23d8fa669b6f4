use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Failed to load environment variables for database connection: {0}")]
    ConnectionConfigError(String),

    #[error("Database query failed: {0}")]
    QueryError(#[from] sqlx::Error),

    #[error("Database migration failed: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    #[error("File I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed CSV at line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error(transparent)]
    Core(#[from] core_types::CoreError),

    #[error(transparent)]
    Ledger(#[from] core_types::LedgerError),
}
