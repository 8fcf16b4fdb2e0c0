//! Configuration file support for leetpick.
//!
//! Settings come from the global `config.toml` under the user's config
//! directory, then `leetpick.toml` in the working directory, then CLI flags.
//! Each layer overrides the one before it field by field.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use leetpick_core::{Category, ProblemId};
use leetpick_logging::LogFormat;

/// The project config file name
pub const CONFIG_FILE_NAME: &str = "leetpick.toml";
pub const GLOBAL_CONFIG_DIR: &str = "leetpick";
pub const GLOBAL_CONFIG_FILE: &str = "config.toml";

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_LIST: &str = "blind75";
pub const DEFAULT_NUM_PROBLEMS: usize = 5;
pub const DEFAULT_UNIVERSE_MAX_ID: ProblemId = 1699;

/// One layer of configuration as written in a TOML file
#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Directory holding the catalog and ledger files
    pub data_dir: Option<PathBuf>,
    /// Default problem sources for `--list`
    pub lists: Option<Vec<String>>,
    /// Default number of problems per session
    pub num_problems: Option<usize>,
    /// Highest id considered by the universe fallback
    pub universe_max_id: Option<ProblemId>,
    /// Categories that never act as skip lists
    pub bypass_skip: Option<Vec<String>>,
    /// Stop using a category as a skip list when it is named in `--list`
    pub bypass_matching_list: Option<bool>,
    pub log_format: Option<String>,
    /// Append structured events to `<data_dir>/events.jsonl`
    pub log_events: Option<bool>,
}

impl FileConfig {
    /// Load one config file.
    ///
    /// Returns:
    /// - `Ok(Some(config))` if file exists and parses successfully
    /// - `Ok(None)` if file does not exist
    /// - `Err(...)` if file exists but fails to parse (hard error)
    pub fn load(config_path: &Path) -> Result<Option<Self>> {
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        let config: FileConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;

        Ok(Some(config))
    }

    /// Fields set in `other` win over fields set in `self`.
    pub fn merge(self, other: FileConfig) -> FileConfig {
        FileConfig {
            data_dir: other.data_dir.or(self.data_dir),
            lists: other.lists.or(self.lists),
            num_problems: other.num_problems.or(self.num_problems),
            universe_max_id: other.universe_max_id.or(self.universe_max_id),
            bypass_skip: other.bypass_skip.or(self.bypass_skip),
            bypass_matching_list: other.bypass_matching_list.or(self.bypass_matching_list),
            log_format: other.log_format.or(self.log_format),
            log_events: other.log_events.or(self.log_events),
        }
    }
}

/// Path of the global config file, if a config directory exists
pub fn global_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(GLOBAL_CONFIG_DIR).join(GLOBAL_CONFIG_FILE))
}

/// Global config merged with the project config in `working_dir`.
pub fn load_layered(global: Option<&Path>, working_dir: &Path) -> Result<FileConfig> {
    let global = match global {
        Some(path) => FileConfig::load(path)?.unwrap_or_default(),
        None => FileConfig::default(),
    };
    let project = FileConfig::load(&working_dir.join(CONFIG_FILE_NAME))?.unwrap_or_default();
    Ok(global.merge(project))
}

/// Fully resolved settings with defaults applied
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub lists: Vec<String>,
    pub num_problems: usize,
    pub universe_max_id: ProblemId,
    pub bypass_skip: BTreeSet<Category>,
    pub bypass_matching_list: bool,
    pub log_format: LogFormat,
    pub log_events: bool,
}

impl Settings {
    pub fn resolve(config: FileConfig) -> Result<Self> {
        let bypass_skip = config
            .bypass_skip
            .unwrap_or_default()
            .iter()
            .map(|name| name.parse::<Category>())
            .collect::<std::result::Result<BTreeSet<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid bypass_skip entry: {}", e))?;

        let log_format = match config.log_format {
            Some(ref name) => name
                .parse::<LogFormat>()
                .map_err(|e| anyhow::anyhow!("Invalid log_format: {}", e))?,
            None => LogFormat::default(),
        };

        let universe_max_id = config.universe_max_id.unwrap_or(DEFAULT_UNIVERSE_MAX_ID);
        if universe_max_id == 0 {
            anyhow::bail!("universe_max_id must be a positive problem id");
        }

        Ok(Self {
            data_dir: config
                .data_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            lists: config
                .lists
                .unwrap_or_else(|| vec![DEFAULT_LIST.to_string()]),
            num_problems: config.num_problems.unwrap_or(DEFAULT_NUM_PROBLEMS),
            universe_max_id,
            bypass_skip,
            bypass_matching_list: config.bypass_matching_list.unwrap_or(true),
            log_format,
            log_events: config.log_events.unwrap_or(false),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_files_give_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load_layered(None, dir.path()).unwrap();
        assert_eq!(config, FileConfig::default());

        let settings = Settings::resolve(config).unwrap();
        assert_eq!(settings.data_dir, PathBuf::from("data"));
        assert_eq!(settings.lists, vec!["blind75"]);
        assert_eq!(settings.num_problems, 5);
        assert_eq!(settings.universe_max_id, 1699);
        assert!(settings.bypass_skip.is_empty());
        assert!(settings.bypass_matching_list);
        assert_eq!(settings.log_format, LogFormat::Pretty);
        assert!(!settings.log_events);
    }

    #[test]
    fn test_project_overrides_global_field_by_field() {
        let dir = TempDir::new().unwrap();
        let global = dir.path().join("global.toml");
        std::fs::write(
            &global,
            "num_problems = 3\nlists = [\"Google\"]\nlog_format = \"compact\"\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "num_problems = 8\nbypass_skip = [\"revisit\"]\n",
        )
        .unwrap();

        let settings = Settings::resolve(load_layered(Some(&global), dir.path()).unwrap()).unwrap();

        assert_eq!(settings.num_problems, 8);
        assert_eq!(settings.lists, vec!["Google"]);
        assert_eq!(settings.log_format, LogFormat::Compact);
        assert_eq!(settings.bypass_skip, BTreeSet::from([Category::Revisit]));
    }

    #[test]
    fn test_unknown_key_is_an_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "colour = \"blue\"\n").unwrap();

        let err = load_layered(None, dir.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let bad_category = FileConfig {
            bypass_skip: Some(vec!["someday".to_string()]),
            ..Default::default()
        };
        assert!(Settings::resolve(bad_category).is_err());

        let bad_format = FileConfig {
            log_format: Some("xml".to_string()),
            ..Default::default()
        };
        assert!(Settings::resolve(bad_format).is_err());

        let zero_universe = FileConfig {
            universe_max_id: Some(0),
            ..Default::default()
        };
        assert!(Settings::resolve(zero_universe).is_err());
    }
}
