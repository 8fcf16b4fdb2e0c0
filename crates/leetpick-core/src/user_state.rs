use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::catalog::ProblemId;

/// User-maintained classification lists. Each one can act as a skip list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Completed,
    Hard,
    Revisit,
    Refresh,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Completed,
        Category::Hard,
        Category::Revisit,
        Category::Refresh,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Category::Completed => "completed",
            Category::Hard => "hard",
            Category::Revisit => "revisit",
            Category::Refresh => "refresh",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "completed" => Ok(Category::Completed),
            "hard" => Ok(Category::Hard),
            "revisit" => Ok(Category::Revisit),
            "refresh" => Ok(Category::Refresh),
            _ => Err(format!("Unknown category: {}", s)),
        }
    }
}

/// The `user.json` document.
///
/// Besides the four category lists it carries the companies of interest and
/// any number of named problem lists (e.g. `blind75`). Keys this type does
/// not know about are kept in `lists` so a rewrite never drops them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserState {
    #[serde(default)]
    pub completed: Vec<ProblemId>,
    #[serde(default)]
    pub hard: Vec<ProblemId>,
    #[serde(default)]
    pub revisit: Vec<ProblemId>,
    #[serde(default)]
    pub refresh: Vec<ProblemId>,
    #[serde(default)]
    pub faang: Vec<String>,
    #[serde(default)]
    pub my_companies: Vec<String>,
    #[serde(flatten)]
    pub lists: BTreeMap<String, serde_json::Value>,
}

impl UserState {
    pub fn category(&self, category: Category) -> &[ProblemId] {
        match category {
            Category::Completed => &self.completed,
            Category::Hard => &self.hard,
            Category::Revisit => &self.revisit,
            Category::Refresh => &self.refresh,
        }
    }

    /// Append an id to a category. Duplicates are allowed.
    pub fn push(&mut self, category: Category, id: ProblemId) {
        match category {
            Category::Completed => self.completed.push(id),
            Category::Hard => self.hard.push(id),
            Category::Revisit => self.revisit.push(id),
            Category::Refresh => self.refresh.push(id),
        }
    }

    /// Companies whose questions the user cares about most.
    pub fn companies_of_interest(&self) -> Vec<String> {
        let mut companies: Vec<String> = self
            .faang
            .iter()
            .chain(self.my_companies.iter())
            .cloned()
            .collect();
        companies.sort();
        companies.dedup();
        companies
    }

    /// Look up a list by name: one of the categories or a custom list.
    /// Non-integer entries in a custom list are ignored.
    pub fn named_list(&self, name: &str) -> Option<Vec<ProblemId>> {
        if let Ok(category) = name.parse::<Category>() {
            return Some(self.category(category).to_vec());
        }

        let value = self.lists.get(name)?;
        let items = value.as_array()?;
        Some(
            items
                .iter()
                .filter_map(|item| item.as_u64())
                .filter_map(|id| ProblemId::try_from(id).ok())
                .filter(|id| *id > 0)
                .collect(),
        )
    }
}
