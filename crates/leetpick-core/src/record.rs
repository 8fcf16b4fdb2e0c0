use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::catalog::ProblemId;

/// Whether an attempt ended with an accepted solution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Yes,
    No,
}

impl Outcome {
    pub fn is_solved(&self) -> bool {
        matches!(self, Outcome::Yes)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Yes => "yes",
            Outcome::No => "no",
        }
    }
}

/// One line of the completion ledger:
/// `<id>,<yes|no>,<errors>,<minutes>,<YYYY-MM-DD>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRecord {
    pub problem_id: ProblemId,
    pub outcome: Outcome,
    pub errors: u32,
    pub minutes: u32,
    pub date: NaiveDate,
}

impl CompletionRecord {
    /// Attempt recorded by the `easy` command: solved, no errors, five minutes.
    pub fn easy(problem_id: ProblemId, date: NaiveDate) -> Self {
        Self {
            problem_id,
            outcome: Outcome::Yes,
            errors: 0,
            minutes: 5,
            date,
        }
    }

    pub fn to_line(&self) -> String {
        format!(
            "{},{},{},{},{}",
            self.problem_id,
            self.outcome.as_str(),
            self.errors,
            self.minutes,
            self.date.format("%Y-%m-%d")
        )
    }

    /// Parse a full ledger line. Returns `None` for anything malformed.
    pub fn parse_line(line: &str) -> Option<Self> {
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() != 5 {
            return None;
        }

        let problem_id = parse_id(fields[0])?;
        let outcome = match fields[1] {
            "yes" => Outcome::Yes,
            "no" => Outcome::No,
            _ => return None,
        };
        let errors = fields[2].parse().ok()?;
        let minutes = fields[3].parse().ok()?;
        let date = NaiveDate::parse_from_str(fields[4], "%Y-%m-%d").ok()?;

        Some(Self {
            problem_id,
            outcome,
            errors,
            minutes,
            date,
        })
    }
}

/// Problem id from the first field of a ledger line. Only the id has to be
/// well formed for the line to count towards the completed set.
pub fn leading_id(line: &str) -> Option<ProblemId> {
    line.split(',').next().and_then(|field| parse_id(field.trim()))
}

fn parse_id(field: &str) -> Option<ProblemId> {
    field.parse::<ProblemId>().ok().filter(|id| *id > 0)
}
