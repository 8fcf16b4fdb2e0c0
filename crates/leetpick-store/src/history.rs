use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use leetpick_core::{CompletionRecord, ProblemId};

const MOST_ATTEMPTED_LIMIT: usize = 10;

/// Number of attempts recorded on a given day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayCount {
    pub date: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemAttempts {
    pub problem_id: ProblemId,
    pub attempts: usize,
    pub solved: usize,
}

/// Aggregate statistics over the completion ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerHistory {
    pub total_attempts: usize,
    pub distinct_problems: usize,
    pub solved: usize,
    pub unsolved: usize,
    pub solve_rate: f64,
    pub avg_minutes: f64,
    pub attempts_over_time: Vec<DayCount>,
    pub most_attempted: Vec<ProblemAttempts>,
}

impl LedgerHistory {
    pub fn from_records(records: &[CompletionRecord]) -> Self {
        let total_attempts = records.len();
        if total_attempts == 0 {
            return Self {
                total_attempts: 0,
                distinct_problems: 0,
                solved: 0,
                unsolved: 0,
                solve_rate: 0.0,
                avg_minutes: 0.0,
                attempts_over_time: Vec::new(),
                most_attempted: Vec::new(),
            };
        }

        let solved = records.iter().filter(|r| r.outcome.is_solved()).count();
        let unsolved = total_attempts - solved;
        let solve_rate = solved as f64 / total_attempts as f64;
        let avg_minutes =
            records.iter().map(|r| r.minutes as f64).sum::<f64>() / total_attempts as f64;

        let mut day_counts: BTreeMap<String, usize> = BTreeMap::new();
        for r in records {
            *day_counts
                .entry(r.date.format("%Y-%m-%d").to_string())
                .or_insert(0) += 1;
        }
        let attempts_over_time = day_counts
            .into_iter()
            .map(|(date, count)| DayCount { date, count })
            .collect();

        let mut per_problem: HashMap<ProblemId, (usize, usize)> = HashMap::new();
        for r in records {
            let entry = per_problem.entry(r.problem_id).or_insert((0, 0));
            entry.0 += 1;
            if r.outcome.is_solved() {
                entry.1 += 1;
            }
        }
        let distinct_problems = per_problem.len();

        let mut most_attempted: Vec<ProblemAttempts> = per_problem
            .into_iter()
            .filter(|(_, (attempts, _))| *attempts > 1)
            .map(|(problem_id, (attempts, solved))| ProblemAttempts {
                problem_id,
                attempts,
                solved,
            })
            .collect();
        // Most attempts first, ties by id
        most_attempted.sort_by(|a, b| {
            b.attempts
                .cmp(&a.attempts)
                .then(a.problem_id.cmp(&b.problem_id))
        });
        most_attempted.truncate(MOST_ATTEMPTED_LIMIT);

        Self {
            total_attempts,
            distinct_problems,
            solved,
            unsolved,
            solve_rate,
            avg_minutes,
            attempts_over_time,
            most_attempted,
        }
    }
}
