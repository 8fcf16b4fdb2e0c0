//! Interactive practice session.
//!
//! The session walks an ordered sequence of problems. Each problem runs a
//! small state machine driven by console input; most commands either keep the
//! current problem, swap it for a fresh draw in place, or advance to the next
//! element of the sequence.

mod command;

pub use command::{Command, HELP_TEXT};

use chrono::{Local, NaiveDate};
use rand::RngCore;
use std::collections::BTreeSet;
use std::time::Instant;
use tracing::{debug, info};

use leetpick_logging::{LogEvent, Logger};

use crate::catalog::ProblemId;
use crate::clock::{Clock, Stopwatch};
use crate::console::Console;
use crate::error::SessionError;
use crate::fallback::{select_with_fallback, FallbackTier, InitialSelection};
use crate::ledger::Ledger;
use crate::outcome::{SessionOutcome, SessionTally};
use crate::record::CompletionRecord;
use crate::selector::{SelectionCriteria, Selector, SkipSet};
use crate::user_state::Category;

const COMPLETION_PROMPT: &str = "When completed, enter: y/n,[num_errs],[time]";
const PAUSE_PROMPT: &str = "Paused. Press Enter to continue the clock";
const BREAK_PROMPT: &str = "Paused. Press Enter to reset the clock and start the problem";

/// Result of handling one command on the current problem
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    /// Keep working on the same problem
    Stay,
    /// Swap the current problem for another one in place
    Replace(ProblemId),
    /// Move to the next problem in the sequence
    Advance,
    /// End the whole session
    Terminate,
}

/// Settings that stay fixed for the whole session
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Categories that should not act as skip lists
    pub bypass: BTreeSet<Category>,
    /// Upper bound of the id range used by the universe fallback tiers
    pub universe_max_id: ProblemId,
}

/// Drives one interactive practice session.
pub struct Session<'a> {
    selector: Selector<'a>,
    ledger: &'a mut dyn Ledger,
    console: &'a mut dyn Console,
    clock: &'a dyn Clock,
    rng: &'a mut dyn RngCore,
    logger: &'a Logger,
    config: SessionConfig,
    criteria: SelectionCriteria,
    pool: BTreeSet<ProblemId>,
    watch: Stopwatch,
    tally: SessionTally,
    started_at: Instant,
}

impl<'a> Session<'a> {
    pub fn new(
        selector: Selector<'a>,
        ledger: &'a mut dyn Ledger,
        console: &'a mut dyn Console,
        clock: &'a dyn Clock,
        rng: &'a mut dyn RngCore,
        logger: &'a Logger,
        config: SessionConfig,
    ) -> Self {
        let now = clock.now();
        Self {
            selector,
            ledger,
            console,
            clock,
            rng,
            logger,
            config,
            criteria: SelectionCriteria::default(),
            pool: BTreeSet::new(),
            watch: Stopwatch::start(now),
            tally: SessionTally::default(),
            started_at: now,
        }
    }

    /// Pick the session's problems (falling back to looser filters when
    /// needed) and run through them.
    pub fn start(
        mut self,
        candidates: &BTreeSet<ProblemId>,
        criteria: &SelectionCriteria,
    ) -> Result<SessionOutcome, SessionError> {
        self.logger.log(&LogEvent::SessionStarted {
            candidates: candidates.len(),
            requested: criteria.count,
            topics: criteria.include_topics.len(),
        });

        let skip = self.skip_set();
        let selection = select_with_fallback(
            &self.selector,
            candidates,
            criteria,
            &skip,
            self.config.universe_max_id,
            &mut *self.rng,
        );

        let Some(selection) = selection else {
            self.report_no_match(criteria);
            self.console
                .notice("No problems are left for these filters, even with every fallback.");
            self.logger.log(&LogEvent::SelectionExhausted {
                topics: criteria.include_topics.clone(),
                exclude_topics: criteria.exclude_topics.clone().unwrap_or_default(),
                difficulties: criteria.difficulties.iter().map(|d| d.to_string()).collect(),
            });
            return Ok(SessionOutcome::Exhausted);
        };

        if selection.tier != FallbackTier::Original {
            self.report_no_match(criteria);
            self.console.notice(&format!(
                "Using {} instead.",
                selection.tier.description()
            ));
            self.logger.log(&LogEvent::FallbackApplied {
                tier: selection.tier.to_string(),
                description: selection.tier.description().to_string(),
                problems: selection.problems.len(),
            });
        }

        self.run(selection)
    }

    /// Work through an already selected sequence.
    pub fn run(mut self, selection: InitialSelection) -> Result<SessionOutcome, SessionError> {
        let InitialSelection {
            tier,
            problems,
            pool,
            criteria,
        } = selection;
        self.pool = pool;
        self.criteria = criteria;

        self.console.notice(
            "Other valid inputs: info, easy, hard, skip, revisit, refresh, pause, break, help, quit",
        );

        let total = problems.len();
        for (index, first) in problems.into_iter().enumerate() {
            let label = sequence_label(index, total);
            let mut current = first;
            self.present(label, current);

            loop {
                let Some(input) = self.read(COMPLETION_PROMPT)? else {
                    return Ok(self.finish(tier, false));
                };

                let command = Command::parse(&input);
                debug!(problem_id = current, ?command, "Handling command");

                match self.handle(command, current)? {
                    Step::Stay => {}
                    Step::Replace(next) => {
                        current = next;
                        self.present(label, current);
                    }
                    Step::Advance => break,
                    Step::Terminate => return Ok(self.finish(tier, false)),
                }
            }
        }

        Ok(self.finish(tier, true))
    }

    fn handle(&mut self, command: Command, current: ProblemId) -> Result<Step, SessionError> {
        match command {
            Command::Quit => Ok(Step::Terminate),
            Command::Info => {
                match self.selector.catalog().get(current) {
                    Some(problem) => self.console.info(problem),
                    None => self
                        .console
                        .notice(&format!("No details available for {}", current)),
                }
                Ok(Step::Stay)
            }
            Command::Pause => {
                self.watch.pause(self.clock.now());
                if self.read(PAUSE_PROMPT)?.is_none() {
                    return Ok(Step::Terminate);
                }
                self.watch.resume(self.clock.now());
                Ok(Step::Stay)
            }
            Command::Break => {
                if self.read(BREAK_PROMPT)?.is_none() {
                    return Ok(Step::Terminate);
                }
                self.watch.reset(self.clock.now());
                Ok(Step::Stay)
            }
            Command::Easy => {
                let measured = self.watch.elapsed_minutes(self.clock.now());
                let record = CompletionRecord::easy(current, today());
                self.record(&record, measured)?;
                let criteria = self.criteria.clone();
                Ok(self.replace(current, &criteria, "easy"))
            }
            Command::Hard => {
                self.mark(Category::Hard, current)?;
                let criteria = self.criteria.clone().without_difficulty();
                Ok(self.replace(current, &criteria, "hard"))
            }
            Command::Skip => {
                let criteria = self.criteria.clone();
                Ok(self.replace(current, &criteria, "skip"))
            }
            Command::Mark { category, id } => {
                let id = id.unwrap_or(current);
                self.mark(category, id)?;
                self.console
                    .notice(&format!("Added {} to {}", id, category.name()));
                Ok(Step::Stay)
            }
            Command::Attempt {
                outcome,
                errors,
                minutes,
            } => {
                let measured = self.watch.elapsed_minutes(self.clock.now());
                let record = CompletionRecord {
                    problem_id: current,
                    outcome,
                    errors: errors.unwrap_or(0),
                    minutes: minutes.unwrap_or(measured),
                    date: today(),
                };
                self.record(&record, measured)?;
                self.console.notice(&format!("completed in {}min", measured));
                Ok(Step::Advance)
            }
            Command::Help => {
                self.console.notice(HELP_TEXT);
                Ok(Step::Stay)
            }
            Command::Invalid(_) => {
                self.console
                    .notice("Invalid input. Type help for more options");
                Ok(Step::Stay)
            }
        }
    }

    /// Draw one problem from the session pool to stand in for `current`.
    /// When nothing is left the session moves on to the next problem.
    fn replace(&mut self, current: ProblemId, criteria: &SelectionCriteria, reason: &str) -> Step {
        let skip = self.skip_set();
        let criteria = criteria.clone().with_count(1);
        let drawn = self
            .selector
            .select(&self.pool, &criteria, &skip, &mut *self.rng)
            .first()
            .copied();

        self.logger.log(&LogEvent::ProblemReplaced {
            problem_id: current,
            replacement: drawn,
            reason: reason.to_string(),
        });

        match drawn {
            Some(next) => {
                self.pool.remove(&next);
                Step::Replace(next)
            }
            None => {
                info!(problem_id = current, reason, "No replacement available");
                self.console
                    .notice("No other problem matches these filters. Moving on.");
                Step::Advance
            }
        }
    }

    fn present(&mut self, label: &str, id: ProblemId) {
        self.watch = Stopwatch::start(self.clock.now());
        self.tally.presented += 1;
        self.logger.log(&LogEvent::ProblemPresented {
            problem_id: id,
            label: label.to_string(),
        });

        match self.selector.catalog().get(id) {
            Some(problem) => self.console.present(label, problem),
            None => self.console.notice(&format!("{}:\n{}", label, id)),
        }
    }

    fn record(&mut self, record: &CompletionRecord, measured: u32) -> Result<(), SessionError> {
        self.ledger.record(record)?;
        self.logger.log(&LogEvent::AttemptRecorded {
            problem_id: record.problem_id,
            solved: record.outcome.is_solved(),
            errors: record.errors,
            minutes: record.minutes,
            measured_minutes: measured,
        });
        self.tally.attempted += 1;
        if record.outcome.is_solved() {
            self.tally.solved += 1;
        }
        Ok(())
    }

    fn mark(&mut self, category: Category, id: ProblemId) -> Result<(), SessionError> {
        self.ledger.mark(category, id)?;
        self.logger.log(&LogEvent::ProblemMarked {
            problem_id: id,
            category: category.name().to_string(),
        });
        Ok(())
    }

    fn read(&mut self, prompt: &str) -> Result<Option<String>, SessionError> {
        self.console.read_line(prompt).map_err(SessionError::Console)
    }

    fn skip_set(&self) -> SkipSet {
        SkipSet::build(
            self.ledger.user_state(),
            &self.ledger.completed_ids(),
            &self.config.bypass,
        )
    }

    fn report_no_match(&mut self, criteria: &SelectionCriteria) {
        let exclude = match criteria.exclude_topics {
            Some(ref topics) if !topics.is_empty() => topics.join(", "),
            _ => "none".to_string(),
        };
        let difficulty = if criteria.difficulties.is_empty() {
            "any".to_string()
        } else {
            criteria
                .difficulties
                .iter()
                .map(|d| d.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        };

        self.console
            .notice("No problems found matching all criteria:");
        self.console
            .notice(&format!("Topics: {}", criteria.include_topics.join(", ")));
        self.console
            .notice(&format!("Excluded topics: {}", exclude));
        self.console.notice(&format!("Difficulty: {}", difficulty));
    }

    fn finish(&mut self, tier: FallbackTier, completed: bool) -> SessionOutcome {
        let duration = self.clock.now().saturating_duration_since(self.started_at);
        let outcome = if completed {
            SessionOutcome::completed(tier, self.tally, duration)
        } else {
            SessionOutcome::quit(tier, self.tally, duration)
        };

        self.logger.log(&LogEvent::SessionEnded {
            status: outcome.status().to_string(),
            presented: self.tally.presented,
            attempted: self.tally.attempted,
            solved: self.tally.solved,
            duration_secs: duration.as_secs_f64(),
        });
        outcome
    }
}

fn sequence_label(index: usize, total: usize) -> &'static str {
    if index == 0 {
        "First problem"
    } else if index + 1 == total {
        "Last problem"
    } else {
        "Next up"
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
