use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::info;

use leetpick_core::{Catalog, Difficulty, Problem, ProblemId};

use crate::error::StoreError;

pub const ALL_PROBLEMS_FILE: &str = "all_problems.json";
pub const TOPICS_FILE: &str = "topics.json";
pub const PROBLEM_COMPANIES_FILE: &str = "problem_to_companies.json";
pub const COMPANY_PROBLEMS_FILE: &str = "company_to_problems.json";

#[derive(Deserialize)]
struct RawProblem {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Link", default)]
    link: String,
    #[serde(rename = "Difficulty")]
    difficulty: Difficulty,
    #[serde(rename = "Acceptance", default)]
    acceptance: serde_json::Value,
}

/// Ids show up both as JSON numbers and as decimal strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(i64),
    Text(String),
}

/// Load the problem catalog from the four JSON files in `data_dir`.
pub fn load_catalog(data_dir: &Path) -> Result<Catalog, StoreError> {
    let raw_problems: BTreeMap<String, RawProblem> = read_json(data_dir, ALL_PROBLEMS_FILE)?;
    let raw_topics: BTreeMap<String, Vec<RawId>> = read_json(data_dir, TOPICS_FILE)?;
    let raw_problem_companies: HashMap<String, Vec<String>> =
        read_json(data_dir, PROBLEM_COMPANIES_FILE)?;
    let raw_company_problems: BTreeMap<String, BTreeMap<String, Vec<RawId>>> =
        read_json(data_dir, COMPANY_PROBLEMS_FILE)?;

    let mut problems = BTreeMap::new();
    for (key, raw) in raw_problems {
        let id = parse_key(ALL_PROBLEMS_FILE, &key)?;
        problems.insert(
            id,
            Problem {
                id,
                name: raw.name,
                link: raw.link,
                difficulty: raw.difficulty,
                acceptance: acceptance_text(raw.acceptance),
            },
        );
    }

    let mut topics = BTreeMap::new();
    for (name, ids) in raw_topics {
        let members = ids
            .into_iter()
            .map(|raw| parse_id(TOPICS_FILE, raw))
            .collect::<Result<BTreeSet<_>, _>>()?;
        topics.insert(name, members);
    }

    let mut problem_companies = HashMap::new();
    for (key, companies) in raw_problem_companies {
        problem_companies.insert(parse_key(PROBLEM_COMPANIES_FILE, &key)?, companies);
    }

    let mut company_problems = BTreeMap::new();
    for (company, periods) in raw_company_problems {
        let mut by_period = BTreeMap::new();
        for (period, ids) in periods {
            let ids = ids
                .into_iter()
                .map(|raw| parse_id(COMPANY_PROBLEMS_FILE, raw))
                .collect::<Result<Vec<_>, _>>()?;
            by_period.insert(period, ids);
        }
        company_problems.insert(company, by_period);
    }

    info!(
        problems = problems.len(),
        topics = topics.len(),
        companies = company_problems.len(),
        "Loaded catalog from {}",
        data_dir.display()
    );

    Ok(Catalog {
        problems,
        topics,
        problem_companies,
        company_problems,
    })
}

fn read_json<T: DeserializeOwned>(data_dir: &Path, file: &str) -> Result<T, StoreError> {
    let path = data_dir.join(file);
    if !path.exists() {
        return Err(StoreError::MissingFile(path));
    }
    let content = fs::read_to_string(&path).map_err(|e| StoreError::io(&path, e))?;
    serde_json::from_str(&content).map_err(|source| StoreError::Json { path, source })
}

fn parse_key(file: &str, key: &str) -> Result<ProblemId, StoreError> {
    parse_id(file, RawId::Text(key.to_string()))
}

fn parse_id(file: &str, raw: RawId) -> Result<ProblemId, StoreError> {
    let invalid = |value: String| StoreError::InvalidId {
        file: file.to_string(),
        value,
    };

    match raw {
        RawId::Number(n) => ProblemId::try_from(n)
            .ok()
            .filter(|id| *id > 0)
            .ok_or_else(|| invalid(n.to_string())),
        RawId::Text(text) => text
            .trim()
            .parse::<ProblemId>()
            .ok()
            .filter(|id| *id > 0)
            .ok_or_else(|| invalid(text)),
    }
}

fn acceptance_text(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id_accepts_numbers_and_strings() {
        assert_eq!(parse_id("t", RawId::Number(12)).unwrap(), 12);
        assert_eq!(parse_id("t", RawId::Text(" 34 ".to_string())).unwrap(), 34);
    }

    #[test]
    fn test_parse_id_rejects_non_positive() {
        assert!(matches!(
            parse_id("t", RawId::Number(0)),
            Err(StoreError::InvalidId { .. })
        ));
        assert!(matches!(
            parse_id("t", RawId::Number(-3)),
            Err(StoreError::InvalidId { .. })
        ));
        assert!(matches!(
            parse_id("t", RawId::Text("two".to_string())),
            Err(StoreError::InvalidId { .. })
        ));
    }

    #[test]
    fn test_acceptance_text() {
        assert_eq!(acceptance_text(serde_json::json!("45.2%")), "45.2%");
        assert_eq!(acceptance_text(serde_json::json!(45.2)), "45.2");
        assert_eq!(acceptance_text(serde_json::Value::Null), "");
    }
}
