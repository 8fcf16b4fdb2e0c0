use std::collections::BTreeSet;

use crate::catalog::ProblemId;
use crate::error::LedgerError;
use crate::record::CompletionRecord;
use crate::user_state::{Category, UserState};

/// Attempt history plus the user's classification lists.
///
/// Every mutation is persisted before the call returns.
pub trait Ledger {
    fn user_state(&self) -> &UserState;

    /// Ids that appear in the attempt history, solved or not
    fn completed_ids(&self) -> BTreeSet<ProblemId>;

    /// Append one attempt to the history
    fn record(&mut self, record: &CompletionRecord) -> Result<(), LedgerError>;

    /// Append an id to one of the classification lists
    fn mark(&mut self, category: Category, id: ProblemId) -> Result<(), LedgerError>;
}

/// Ledger that keeps everything in memory. Used for dry runs and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryLedger {
    pub state: UserState,
    pub records: Vec<CompletionRecord>,
    pub history_ids: BTreeSet<ProblemId>,
}

impl MemoryLedger {
    pub fn new(state: UserState, history_ids: BTreeSet<ProblemId>) -> Self {
        Self {
            state,
            records: Vec::new(),
            history_ids,
        }
    }
}

impl Ledger for MemoryLedger {
    fn user_state(&self) -> &UserState {
        &self.state
    }

    fn completed_ids(&self) -> BTreeSet<ProblemId> {
        self.history_ids
            .iter()
            .copied()
            .chain(self.records.iter().map(|r| r.problem_id))
            .collect()
    }

    fn record(&mut self, record: &CompletionRecord) -> Result<(), LedgerError> {
        self.records.push(record.clone());
        Ok(())
    }

    fn mark(&mut self, category: Category, id: ProblemId) -> Result<(), LedgerError> {
        self.state.push(category, id);
        Ok(())
    }
}
