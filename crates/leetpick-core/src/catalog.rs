use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Stable identifier of a catalogued problem. Always positive.
pub type ProblemId = u32;

/// Difficulty rating as published by the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "Easy"),
            Difficulty::Medium => write!(f, "Medium"),
            Difficulty::Hard => write!(f, "Hard"),
        }
    }
}

impl std::str::FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(format!("Unknown difficulty: {}", s)),
        }
    }
}

/// A single practice problem
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    pub id: ProblemId,
    pub name: String,
    pub link: String,
    pub difficulty: Difficulty,
    /// Share of accepted submissions, e.g. `"45.2%"`
    pub acceptance: String,
}

/// Read-only problem catalog, loaded once at startup.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub problems: BTreeMap<ProblemId, Problem>,
    pub topics: BTreeMap<String, BTreeSet<ProblemId>>,
    /// Companies that have asked each problem, most frequent first
    pub problem_companies: HashMap<ProblemId, Vec<String>>,
    /// Company name -> period label (e.g. "6months") -> problem ids
    pub company_problems: BTreeMap<String, BTreeMap<String, Vec<ProblemId>>>,
}

impl Catalog {
    pub fn get(&self, id: ProblemId) -> Option<&Problem> {
        self.problems.get(&id)
    }

    pub fn contains(&self, id: ProblemId) -> bool {
        self.problems.contains_key(&id)
    }

    pub fn all_ids(&self) -> BTreeSet<ProblemId> {
        self.problems.keys().copied().collect()
    }

    pub fn topic_names(&self) -> Vec<String> {
        self.topics.keys().cloned().collect()
    }

    /// Union of the members of the named topics. Unknown names contribute nothing.
    pub fn topic_members<S: AsRef<str>>(&self, names: &[S]) -> BTreeSet<ProblemId> {
        names
            .iter()
            .filter_map(|name| self.topics.get(name.as_ref()))
            .flat_map(|members| members.iter().copied())
            .collect()
    }

    pub fn companies_for(&self, id: ProblemId) -> &[String] {
        self.problem_companies
            .get(&id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every problem a company has asked, across all periods.
    pub fn company_members(&self, company: &str) -> Option<BTreeSet<ProblemId>> {
        self.company_problems
            .get(company)
            .map(|periods| periods.values().flatten().copied().collect())
    }

    /// Topics whose member sets are distinct. When several names share the
    /// same members (aliases), the alphabetically first name is kept.
    pub fn canonical_topics(&self) -> Vec<String> {
        let mut seen: BTreeSet<&BTreeSet<ProblemId>> = BTreeSet::new();
        self.topics
            .iter()
            .filter(|(_, members)| seen.insert(*members))
            .map(|(name, _)| name.clone())
            .collect()
    }
}
