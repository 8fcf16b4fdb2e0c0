use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::fallback::FallbackTier;

/// Counters gathered while a session runs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTally {
    pub presented: usize,
    pub attempted: usize,
    pub solved: usize,
}

/// The final outcome of a practice session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SessionOutcome {
    /// Every problem in the sequence was worked through
    Completed {
        tier: FallbackTier,
        #[serde(flatten)]
        tally: SessionTally,
        total_duration_secs: f64,
    },
    /// User asked to stop (or input ended)
    Quit {
        tier: FallbackTier,
        #[serde(flatten)]
        tally: SessionTally,
        total_duration_secs: f64,
    },
    /// No fallback tier produced any problem
    Exhausted,
}

impl SessionOutcome {
    pub fn completed(tier: FallbackTier, tally: SessionTally, duration: Duration) -> Self {
        Self::Completed {
            tier,
            tally,
            total_duration_secs: duration.as_secs_f64(),
        }
    }

    pub fn quit(tier: FallbackTier, tally: SessionTally, duration: Duration) -> Self {
        Self::Quit {
            tier,
            tally,
            total_duration_secs: duration.as_secs_f64(),
        }
    }

    pub fn tally(&self) -> SessionTally {
        match self {
            Self::Completed { tally, .. } | Self::Quit { tally, .. } => *tally,
            Self::Exhausted => SessionTally::default(),
        }
    }

    pub fn status(&self) -> &'static str {
        match self {
            Self::Completed { .. } => "completed",
            Self::Quit { .. } => "quit",
            Self::Exhausted => "exhausted",
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Completed { .. } | Self::Quit { .. } => 0,
            Self::Exhausted => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let tally = SessionTally::default();
        assert_eq!(
            SessionOutcome::completed(FallbackTier::Original, tally, Duration::ZERO).exit_code(),
            0
        );
        assert_eq!(
            SessionOutcome::quit(FallbackTier::Universe, tally, Duration::ZERO).exit_code(),
            0
        );
        assert_eq!(SessionOutcome::Exhausted.exit_code(), 2);
    }

    #[test]
    fn test_serializes_with_status_tag() {
        let tally = SessionTally {
            presented: 3,
            attempted: 2,
            solved: 1,
        };
        let outcome = SessionOutcome::quit(FallbackTier::AllTopics, tally, Duration::from_secs(90));
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["status"], "quit");
        assert_eq!(value["tier"], "all_topics");
        assert_eq!(value["attempted"], 2);
        assert_eq!(value["total_duration_secs"], 90.0);
    }
}
