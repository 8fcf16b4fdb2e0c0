use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::info;

use crate::catalog::ProblemId;
use crate::selector::{SelectionCriteria, Selector, SkipSet};

/// Which relaxation of the filters produced the session's problems
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackTier {
    /// Requested filters over the requested problem lists
    Original,
    /// Requested filters over every id up to the configured bound
    Universe,
    /// Every topic over the requested problem lists
    AllTopics,
    /// Every topic over every id up to the configured bound
    AllTopicsUniverse,
}

impl FallbackTier {
    pub const ORDER: [FallbackTier; 4] = [
        FallbackTier::Original,
        FallbackTier::Universe,
        FallbackTier::AllTopics,
        FallbackTier::AllTopicsUniverse,
    ];

    pub fn description(&self) -> &'static str {
        match self {
            FallbackTier::Original => "requested filters",
            FallbackTier::Universe => "requested filters over the whole problem range",
            FallbackTier::AllTopics => "all topics over the requested lists",
            FallbackTier::AllTopicsUniverse => "all topics over the whole problem range",
        }
    }

    fn uses_universe(&self) -> bool {
        matches!(
            self,
            FallbackTier::Universe | FallbackTier::AllTopicsUniverse
        )
    }

    fn uses_all_topics(&self) -> bool {
        matches!(
            self,
            FallbackTier::AllTopics | FallbackTier::AllTopicsUniverse
        )
    }
}

impl std::fmt::Display for FallbackTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FallbackTier::Original => write!(f, "original"),
            FallbackTier::Universe => write!(f, "universe"),
            FallbackTier::AllTopics => write!(f, "all_topics"),
            FallbackTier::AllTopicsUniverse => write!(f, "all_topics_universe"),
        }
    }
}

/// Initial problems for a session, along with the pool and criteria that
/// replacement draws should keep using.
#[derive(Debug, Clone, PartialEq)]
pub struct InitialSelection {
    pub tier: FallbackTier,
    pub problems: Vec<ProblemId>,
    pub pool: BTreeSet<ProblemId>,
    pub criteria: SelectionCriteria,
}

/// Try each tier in order until one yields problems. `None` means every
/// tier came back empty.
pub fn select_with_fallback<R: Rng + ?Sized>(
    selector: &Selector<'_>,
    candidates: &BTreeSet<ProblemId>,
    criteria: &SelectionCriteria,
    skip: &SkipSet,
    universe_max_id: ProblemId,
    rng: &mut R,
) -> Option<InitialSelection> {
    let universe: BTreeSet<ProblemId> = (1..=universe_max_id).collect();

    for tier in FallbackTier::ORDER {
        let pool = if tier.uses_universe() {
            &universe
        } else {
            candidates
        };
        let tier_criteria = if tier.uses_all_topics() {
            criteria.clone().with_all_topics(selector.catalog())
        } else {
            criteria.clone()
        };

        let problems = selector.select(pool, &tier_criteria, skip, rng);
        if problems.is_empty() {
            info!(tier = %tier, "No problems at this fallback tier");
            continue;
        }

        let mut pool = pool.clone();
        for id in &problems {
            pool.remove(id);
        }
        return Some(InitialSelection {
            tier,
            problems,
            pool,
            criteria: tier_criteria,
        });
    }

    None
}
