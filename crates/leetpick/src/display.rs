use std::io::{self, BufRead, Write};

use colored::Colorize;

use leetpick_core::{Catalog, Console, Difficulty, Problem, ProblemId, SessionOutcome};

/// Console on stdin/stdout.
pub struct TerminalConsole<'a> {
    catalog: &'a Catalog,
    interest: Vec<String>,
    input: Box<dyn BufRead + 'a>,
}

impl<'a> TerminalConsole<'a> {
    pub fn new(catalog: &'a Catalog, interest: Vec<String>) -> Self {
        Self {
            catalog,
            interest,
            input: Box::new(io::stdin().lock()),
        }
    }
}

impl Console for TerminalConsole<'_> {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        println!("{}", prompt.dimmed());
        io::stdout().flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn notice(&mut self, message: &str) {
        println!("{}", message);
    }

    fn present(&mut self, label: &str, problem: &Problem) {
        println!();
        println!("{}", format!("{}:", label).bright_blue().bold());
        println!("{} {}", problem.id.to_string().bold(), problem.name);
        println!("{}", problem.link.dimmed());
    }

    fn info(&mut self, problem: &Problem) {
        print_info(self.catalog, &self.interest, problem.id);
    }
}

pub fn difficulty_phrase(difficulty: Difficulty) -> &'static str {
    match difficulty {
        Difficulty::Easy => "considered easy",
        Difficulty::Medium => "medium difficulty",
        Difficulty::Hard => "Hard",
    }
}

/// The two lines shown by `info`, or `None` for an unknown id.
pub fn render_info(catalog: &Catalog, interest: &[String], id: ProblemId) -> Option<[String; 2]> {
    let problem = catalog.get(id)?;
    let asked = catalog.companies_for(id);

    let matching: Vec<&str> = asked
        .iter()
        .filter(|company| interest.contains(company))
        .map(String::as_str)
        .collect();
    let shown: Vec<&str> = if matching.is_empty() {
        asked.iter().take(5).map(String::as_str).collect()
    } else {
        matching.clone()
    };

    Some([
        format!(
            "{} {} is {}: {} of submissions pass",
            id,
            problem.name,
            difficulty_phrase(problem.difficulty),
            problem.acceptance
        ),
        format!(
            "{} companies have asked this question including: {}",
            matching.len(),
            shown.join(", ")
        ),
    ])
}

pub fn print_info(catalog: &Catalog, interest: &[String], id: ProblemId) {
    match render_info(catalog, interest, id) {
        Some([summary, companies]) => {
            println!("{}", summary);
            println!("{}", companies);
        }
        None => println!("{}", format!("No problem with id {} in the catalog.", id).dimmed()),
    }
}

/// Ids in the same shape as a list literal: `[12, 45]`
pub fn format_id_list(ids: &[ProblemId]) -> String {
    let inner: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
    format!("[{}]", inner.join(", "))
}

pub fn print_outcome(outcome: &SessionOutcome) {
    match outcome {
        SessionOutcome::Completed {
            tally,
            total_duration_secs,
            ..
        } => {
            eprintln!();
            eprintln!("{}", "=== SESSION COMPLETE ===".bright_green().bold());
            eprintln!("Solved {} of {} attempted", tally.solved, tally.attempted);
            eprintln!("Duration: {}", format_duration(*total_duration_secs));
        }
        SessionOutcome::Quit {
            tally,
            total_duration_secs,
            ..
        } => {
            eprintln!();
            eprintln!("{}", "=== SESSION ENDED ===".bright_yellow().bold());
            eprintln!(
                "Stopped after {} attempt(s), {} solved",
                tally.attempted, tally.solved
            );
            eprintln!("Duration: {}", format_duration(*total_duration_secs));
        }
        SessionOutcome::Exhausted => {
            eprintln!();
            eprintln!("{}", "=== NOTHING TO PRACTICE ===".bright_red().bold());
            eprintln!("Every problem matching these lists is already done or skipped.");
        }
    }
}

pub fn format_duration(secs: f64) -> String {
    if secs < 60.0 {
        format!("{:.0}s", secs)
    } else {
        let mins = (secs / 60.0).floor() as u64;
        let remaining_secs = (secs % 60.0) as u64;
        format!("{}m {}s", mins, remaining_secs)
    }
}
