use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid input for {0}: {1}")]
    InvalidInput(String, String),

    #[error("Malformed sentiment score '{0}'")]
    MalformedScore(String),
}

/// Failures raised by a ledger collaborator while accepting a record.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Ledger I/O failure: {0}")]
    Io(#[from] std::io::Error),
}
