//! # leetpick-core
//!
//! Problem selection and the interactive practice loop.
//!
//! ## Key Types
//!
//! - [`Selector`] - Filters a candidate set and samples problems from it
//! - [`Session`] - Interactive controller over a sequence of problems
//! - [`Ledger`] / [`Console`] / [`Clock`] - Collaborators the session talks to
//!
//! Nothing in this crate touches the filesystem; persistence lives behind
//! the [`Ledger`] trait.

mod catalog;
mod clock;
mod console;
mod error;
mod fallback;
mod ledger;
mod outcome;
mod record;
mod selector;
mod session;
mod user_state;

pub use catalog::{Catalog, Difficulty, Problem, ProblemId};
pub use clock::{Clock, ManualClock, Stopwatch, SystemClock};
pub use console::Console;
pub use error::{LedgerError, SessionError};
pub use fallback::{select_with_fallback, FallbackTier, InitialSelection};
pub use ledger::{Ledger, MemoryLedger};
pub use outcome::{SessionOutcome, SessionTally};
pub use record::{leading_id, CompletionRecord, Outcome};
pub use selector::{SelectionCriteria, Selector, SkipSet};
pub use session::{Command, Session, SessionConfig, HELP_TEXT};
pub use user_state::{Category, UserState};
