use std::collections::BTreeSet;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use leetpick_core::{
    leading_id, Category, CompletionRecord, Ledger, LedgerError, Outcome, ProblemId, UserState,
};

use crate::error::StoreError;
use crate::history::LedgerHistory;

pub const COMPLETED_FILE: &str = "completed.csv";
pub const USER_FILE: &str = "user.json";

/// Ledger backed by `completed.csv` and `user.json` in the data directory.
pub struct FileLedger {
    data_dir: PathBuf,
    state: UserState,
    completed: BTreeSet<ProblemId>,
}

impl FileLedger {
    /// Open the ledger files in `data_dir`. `completed.csv` is created empty
    /// when it does not exist yet.
    pub fn open(data_dir: &Path) -> Result<Self, StoreError> {
        fs::create_dir_all(data_dir).map_err(|e| StoreError::io(data_dir, e))?;

        let csv_path = data_dir.join(COMPLETED_FILE);
        if !csv_path.exists() {
            File::create(&csv_path).map_err(|e| StoreError::io(&csv_path, e))?;
            info!("Created empty ledger at {}", csv_path.display());
        }

        let user_path = data_dir.join(USER_FILE);
        let state = if user_path.exists() {
            let content =
                fs::read_to_string(&user_path).map_err(|e| StoreError::io(&user_path, e))?;
            serde_json::from_str(&content).map_err(|source| StoreError::Json {
                path: user_path.clone(),
                source,
            })?
        } else {
            warn!(
                "No {} in {}, starting with empty lists",
                USER_FILE,
                data_dir.display()
            );
            UserState::default()
        };

        let mut ledger = Self {
            data_dir: data_dir.to_path_buf(),
            state,
            completed: BTreeSet::new(),
        };
        ledger.completed = ledger.read_completed_ids()?;
        Ok(ledger)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn completed_path(&self) -> PathBuf {
        self.data_dir.join(COMPLETED_FILE)
    }

    pub fn user_path(&self) -> PathBuf {
        self.data_dir.join(USER_FILE)
    }

    /// Every well-formed record in the ledger, oldest first.
    pub fn records(&self) -> Result<Vec<CompletionRecord>, StoreError> {
        let mut records = Vec::new();
        for line in self.lines()? {
            match CompletionRecord::parse_line(&line) {
                Some(record) => records.push(record),
                None => debug!("Skipping malformed ledger line: {}", line),
            }
        }
        Ok(records)
    }

    pub fn history(&self) -> Result<LedgerHistory, StoreError> {
        Ok(LedgerHistory::from_records(&self.records()?))
    }

    /// Record ids solved elsewhere as completed on `date`. Ids already in the
    /// ledger are left alone. Returns how many lines were added.
    pub fn import(&mut self, ids: &[ProblemId], date: NaiveDate) -> Result<usize, LedgerError> {
        let mut added = 0;
        for &id in ids {
            if id == 0 || self.completed.contains(&id) {
                continue;
            }
            let record = CompletionRecord {
                problem_id: id,
                outcome: Outcome::Yes,
                errors: 0,
                minutes: 0,
                date,
            };
            self.append(&record)?;
            added += 1;
        }
        info!(added, requested = ids.len(), "Imported completed problems");
        Ok(added)
    }

    /// Non-blank lines of `completed.csv`. Lines that are not valid UTF-8
    /// are dropped.
    fn lines(&self) -> Result<Vec<String>, StoreError> {
        let path = self.completed_path();
        let bytes = fs::read(&path).map_err(|e| StoreError::io(&path, e))?;
        let mut lines = Vec::new();
        for raw in bytes.split(|b| *b == b'\n') {
            match std::str::from_utf8(raw) {
                Ok(line) if line.trim().is_empty() => {}
                Ok(line) => lines.push(line.trim_end_matches('\r').to_string()),
                Err(_) => debug!(
                    "Skipping malformed ledger line: {}",
                    String::from_utf8_lossy(raw)
                ),
            }
        }
        Ok(lines)
    }

    fn read_completed_ids(&self) -> Result<BTreeSet<ProblemId>, StoreError> {
        let mut ids = BTreeSet::new();
        for line in self.lines()? {
            match leading_id(&line) {
                Some(id) => {
                    ids.insert(id);
                }
                None => debug!("Skipping malformed ledger line: {}", line),
            }
        }
        Ok(ids)
    }

    fn append(&mut self, record: &CompletionRecord) -> Result<(), LedgerError> {
        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(self.completed_path())?;

        let mut line = String::new();
        if !ends_with_newline(&mut file)? {
            line.push('\n');
        }
        line.push_str(&record.to_line());
        line.push('\n');
        file.write_all(line.as_bytes())?;

        self.completed.insert(record.problem_id);
        Ok(())
    }

    fn save_state(&self) -> Result<(), LedgerError> {
        let content = render_user_state(&self.state)?;
        let mut temp = NamedTempFile::new_in(&self.data_dir)?;
        temp.write_all(content.as_bytes())?;
        temp.flush()?;
        temp.persist(self.user_path()).map_err(|e| e.error)?;
        debug!("Saved {}", self.user_path().display());
        Ok(())
    }
}

impl Ledger for FileLedger {
    fn user_state(&self) -> &UserState {
        &self.state
    }

    fn completed_ids(&self) -> BTreeSet<ProblemId> {
        self.completed.clone()
    }

    fn record(&mut self, record: &CompletionRecord) -> Result<(), LedgerError> {
        self.append(record)
    }

    fn mark(&mut self, category: Category, id: ProblemId) -> Result<(), LedgerError> {
        self.state.push(category, id);
        self.save_state()
    }
}

/// Two-space pretty JSON with the items of top-level lists kept on one line.
pub fn render_user_state(state: &UserState) -> Result<String, serde_json::Error> {
    let pretty = serde_json::to_string_pretty(state)?;
    Ok(pretty.replace(",\n    ", ","))
}

/// Empty files count as ending with a newline.
fn ends_with_newline(file: &mut File) -> io::Result<bool> {
    let len = file.metadata()?.len();
    if len == 0 {
        return Ok(true);
    }
    file.seek(SeekFrom::Start(len - 1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_keeps_lists_on_one_line() {
        let state = UserState {
            hard: vec![3, 14, 15],
            faang: vec!["Google".to_string(), "Meta".to_string()],
            ..Default::default()
        };
        let rendered = render_user_state(&state).unwrap();
        assert!(rendered.contains("\"hard\": [\n    3,14,15\n  ]"));
        assert!(rendered.contains("\"Google\",\"Meta\""));
        assert!(rendered.contains("\"completed\": []"));
    }
}
