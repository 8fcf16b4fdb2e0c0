//! Resolution of `--list` entries into the candidate problem ids.

use std::collections::BTreeSet;
use std::path::Path;

use tracing::warn;

use leetpick_core::{Catalog, Category, ProblemId, UserState};

/// Candidate ids gathered from the `--list` entries
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ResolvedSources {
    pub ids: BTreeSet<ProblemId>,
    /// Categories that were named as a source
    pub categories: BTreeSet<Category>,
    /// Entries that matched nothing
    pub unknown: Vec<String>,
}

/// Each entry is tried as `all`, a company, a user list, then a file of ids.
pub fn resolve_sources(
    entries: &[String],
    catalog: &Catalog,
    state: &UserState,
) -> ResolvedSources {
    let mut resolved = ResolvedSources::default();

    if entries.iter().any(|e| e.eq_ignore_ascii_case("all")) {
        resolved.ids = catalog.all_ids();
        return resolved;
    }

    for entry in entries {
        if let Some(ids) = catalog.company_members(entry) {
            resolved.ids.extend(ids);
            continue;
        }

        let lowered = entry.to_lowercase();
        if let Some(ids) = state.named_list(&lowered) {
            if let Ok(category) = lowered.parse::<Category>() {
                resolved.categories.insert(category);
            }
            resolved.ids.extend(ids);
            continue;
        }

        let path = Path::new(entry);
        if path.is_file() {
            match read_id_file(path) {
                Ok(ids) => resolved.ids.extend(ids),
                Err(e) => {
                    warn!("Could not read problem list {}: {}", path.display(), e);
                    resolved.unknown.push(entry.clone());
                }
            }
            continue;
        }

        warn!("Unknown problem list: {}", entry);
        resolved.unknown.push(entry.clone());
    }

    resolved
}

/// Ids separated by commas and/or whitespace. Tokens that are not positive
/// integers are ignored.
fn read_id_file(path: &Path) -> std::io::Result<Vec<ProblemId>> {
    let content = std::fs::read_to_string(path)?;
    Ok(parse_ids(&content))
}

pub fn parse_ids(text: &str) -> Vec<ProblemId> {
    text.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .filter_map(|token| token.parse::<ProblemId>().ok())
        .filter(|id| *id > 0)
        .collect()
}
