use thiserror::Error;

/// Failure to persist a ledger mutation
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode user state: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Console error: {0}")]
    Console(std::io::Error),
}
