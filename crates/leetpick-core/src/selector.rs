use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeSet;
use tracing::debug;

use crate::catalog::{Catalog, Difficulty, ProblemId};
use crate::user_state::{Category, UserState};

/// Filters applied when drawing problems
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SelectionCriteria {
    /// Topics to draw from. Empty means nothing is included.
    pub include_topics: Vec<String>,
    /// Topics whose problems are never returned
    pub exclude_topics: Option<Vec<String>>,
    /// Allowed difficulties. Empty means any difficulty.
    pub difficulties: Vec<Difficulty>,
    /// Number of problems wanted
    pub count: usize,
}

impl SelectionCriteria {
    pub fn new(include_topics: Vec<String>, count: usize) -> Self {
        Self {
            include_topics,
            count,
            ..Default::default()
        }
    }

    pub fn with_exclude_topics(mut self, topics: Vec<String>) -> Self {
        self.exclude_topics = if topics.is_empty() {
            None
        } else {
            Some(topics)
        };
        self
    }

    pub fn with_difficulties(mut self, difficulties: Vec<Difficulty>) -> Self {
        self.difficulties = difficulties;
        self
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    /// Same filters, but drawing from every topic in the catalog.
    pub fn with_all_topics(mut self, catalog: &Catalog) -> Self {
        self.include_topics = catalog.topic_names();
        self
    }

    pub fn without_difficulty(mut self) -> Self {
        self.difficulties.clear();
        self
    }
}

/// Problem ids that must not be offered for fresh practice.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkipSet {
    ids: BTreeSet<ProblemId>,
}

impl SkipSet {
    /// Union of the four category lists, where `completed` also includes
    /// every id found in the completion ledger. Categories in `bypass` are
    /// left out entirely.
    pub fn build(
        state: &UserState,
        ledger_completed: &BTreeSet<ProblemId>,
        bypass: &BTreeSet<Category>,
    ) -> Self {
        let mut ids = BTreeSet::new();
        for category in Category::ALL {
            if bypass.contains(&category) {
                continue;
            }
            ids.extend(state.category(category).iter().copied());
            if category == Category::Completed {
                ids.extend(ledger_completed.iter().copied());
            }
        }
        Self { ids }
    }

    pub fn contains(&self, id: ProblemId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl FromIterator<ProblemId> for SkipSet {
    fn from_iter<I: IntoIterator<Item = ProblemId>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

/// Draws practice problems from the catalog.
pub struct Selector<'a> {
    catalog: &'a Catalog,
}

impl<'a> Selector<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    /// Every candidate that passes the topic, skip and difficulty filters,
    /// in ascending id order.
    pub fn eligible(
        &self,
        candidates: &BTreeSet<ProblemId>,
        criteria: &SelectionCriteria,
        skip: &SkipSet,
    ) -> Vec<ProblemId> {
        let included = self.catalog.topic_members(&criteria.include_topics);
        let excluded = match criteria.exclude_topics {
            Some(ref topics) => self.catalog.topic_members(topics),
            None => BTreeSet::new(),
        };

        candidates
            .iter()
            .copied()
            .filter(|id| included.contains(id))
            .filter(|id| !skip.contains(*id))
            .filter(|id| !excluded.contains(id))
            .filter(|id| match self.catalog.get(*id) {
                Some(problem) => {
                    criteria.difficulties.is_empty()
                        || criteria.difficulties.contains(&problem.difficulty)
                }
                None => false,
            })
            .collect()
    }

    /// Draw `min(count, |eligible|)` distinct problems uniformly at random.
    pub fn select<R: Rng + ?Sized>(
        &self,
        candidates: &BTreeSet<ProblemId>,
        criteria: &SelectionCriteria,
        skip: &SkipSet,
        rng: &mut R,
    ) -> Vec<ProblemId> {
        if criteria.count == 0 {
            return Vec::new();
        }

        let mut eligible = self.eligible(candidates, criteria, skip);
        debug!(
            candidates = candidates.len(),
            eligible = eligible.len(),
            wanted = criteria.count,
            "Selecting problems"
        );

        eligible.shuffle(rng);
        eligible.truncate(criteria.count);
        eligible
    }
}
