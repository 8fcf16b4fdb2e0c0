use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Subcommand;
use colored::Colorize;

use leetpick_core::Catalog;
use leetpick_store::{FileLedger, LedgerHistory};

use crate::display::format_duration;
use crate::sources::parse_ids;

#[derive(Subcommand, Debug)]
pub enum LedgerAction {
    /// Show statistics from the completion ledger
    History {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Record problems solved elsewhere as completed
    Import {
        /// Problem ids
        ids: Vec<u32>,

        /// File with comma or whitespace separated ids
        #[arg(long)]
        from: Option<PathBuf>,

        /// Completion date (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<String>,
    },
}

pub fn handle_ledger_command(
    action: LedgerAction,
    ledger: &mut FileLedger,
    catalog: &Catalog,
) -> Result<()> {
    match action {
        LedgerAction::History { json } => {
            let history = ledger.history()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&history)?);
            } else if history.total_attempts == 0 {
                println!("{}", "No attempts recorded yet.".dimmed());
            } else {
                print_history(&history, catalog);
            }
        }
        LedgerAction::Import { ids, from, date } => {
            let mut ids = ids;
            if let Some(path) = from {
                let content = std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                ids.extend(parse_ids(&content));
            }
            let date = match date {
                Some(s) => NaiveDate::parse_from_str(&s, "%Y-%m-%d")
                    .map_err(|e| anyhow::anyhow!("Invalid --date: {}", e))?,
                None => chrono::Local::now().date_naive(),
            };

            let added = ledger.import(&ids, date)?;
            println!(
                "{} Imported {} new problem(s), {} already recorded",
                "✓".bright_green(),
                added,
                ids.len() - added
            );
        }
    }

    Ok(())
}

fn print_history(history: &LedgerHistory, catalog: &Catalog) {
    println!("{}", "=== Practice History ===".bright_blue().bold());
    println!("{}  {}", "Attempts:".dimmed(), history.total_attempts);
    println!("{}  {}", "Problems:".dimmed(), history.distinct_problems);
    println!(
        "{}  {} solved, {} unsolved ({:.1}%)",
        "Results:".dimmed(),
        history.solved,
        history.unsolved,
        history.solve_rate * 100.0
    );
    println!(
        "{}  {}",
        "Avg Time:".dimmed(),
        format_duration(history.avg_minutes * 60.0)
    );

    if !history.attempts_over_time.is_empty() {
        println!();
        println!("{}", "Recent Days:".dimmed());
        let skip = history.attempts_over_time.len().saturating_sub(7);
        for day in history.attempts_over_time.iter().skip(skip) {
            println!("  {}  {}", day.date, "#".repeat(day.count.min(40)));
        }
    }

    if !history.most_attempted.is_empty() {
        println!();
        println!("{}", "Most Attempted:".dimmed());
        for p in &history.most_attempted {
            let name = catalog
                .get(p.problem_id)
                .map(|problem| problem.name.as_str())
                .unwrap_or("");
            println!(
                "  {:<6} {:<40} {} attempts, {} solved",
                p.problem_id, name, p.attempts, p.solved
            );
        }
    }
}
