pub mod catalog;
pub mod error;
pub mod history;
pub mod ledger;

pub use catalog::load_catalog;
pub use error::StoreError;
pub use history::{DayCount, LedgerHistory, ProblemAttempts};
pub use ledger::FileLedger;
