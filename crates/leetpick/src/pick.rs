use std::collections::BTreeSet;

use anyhow::Result;
use colored::Colorize;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use leetpick_core::{
    Catalog, Category, Difficulty, Ledger, Problem, ProblemId, SelectionCriteria, Selector,
    Session, SessionConfig, SkipSet, SystemClock,
};
use leetpick_logging::{LogEvent, Logger};

use crate::config::Settings;
use crate::display::{self, TerminalConsole};
use crate::sources::{resolve_sources, ResolvedSources};

/// What the user asked to practice
#[derive(Debug, Clone, PartialEq)]
pub struct PickRequest {
    /// `None` means every topic
    pub topics: Option<Vec<String>>,
    pub exclude_topics: Vec<String>,
    pub difficulties: Vec<Difficulty>,
    pub lists: Vec<String>,
    pub count: usize,
    pub interactive: bool,
}

impl PickRequest {
    pub fn criteria(&self, catalog: &Catalog) -> SelectionCriteria {
        let criteria = match self.topics {
            Some(ref topics) => SelectionCriteria::new(topics.clone(), self.count),
            None => SelectionCriteria::new(Vec::new(), self.count).with_all_topics(catalog),
        };
        criteria
            .with_exclude_topics(self.exclude_topics.clone())
            .with_difficulties(self.difficulties.clone())
    }

    /// The equivalent command line
    pub fn command_line(&self) -> String {
        let mut parts = vec!["leetpick".to_string()];
        if let Some(ref topics) = self.topics {
            parts.push("-t".to_string());
            parts.extend(topics.iter().map(|t| quote(t)));
        }
        if !self.exclude_topics.is_empty() {
            parts.push("-e".to_string());
            parts.extend(self.exclude_topics.iter().map(|t| quote(t)));
        }
        if !self.difficulties.is_empty() {
            parts.push("-d".to_string());
            parts.extend(self.difficulties.iter().map(|d| d.to_string().to_lowercase()));
        }
        parts.push("-l".to_string());
        parts.extend(self.lists.iter().map(|l| quote(l)));
        parts.push("-k".to_string());
        parts.push(self.count.to_string());
        if self.interactive {
            parts.push("-i".to_string());
        }
        parts.join(" ")
    }
}

fn quote(arg: &str) -> String {
    if arg.contains(' ') {
        format!("\"{}\"", arg)
    } else {
        arg.to_string()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PickOptions {
    pub seed: Option<u64>,
    pub json: bool,
}

/// Everything a pick needs that stays fixed for the run
pub struct PickContext {
    pub catalog: Catalog,
    pub settings: Settings,
}

impl PickContext {
    pub fn new(catalog: Catalog, settings: Settings) -> Self {
        Self { catalog, settings }
    }

    /// Categories that should not act as skip lists for this pick
    pub fn bypass(&self, sources: &ResolvedSources) -> BTreeSet<Category> {
        let mut bypass = self.settings.bypass_skip.clone();
        if self.settings.bypass_matching_list {
            bypass.extend(sources.categories.iter().copied());
        }
        bypass
    }

    /// Run a pick and return the process exit code.
    pub fn run(
        &self,
        ledger: &mut dyn Ledger,
        logger: &Logger,
        request: &PickRequest,
        options: PickOptions,
    ) -> Result<i32> {
        let sources = resolve_sources(&request.lists, &self.catalog, ledger.user_state());
        for entry in &sources.unknown {
            eprintln!(
                "{} {} is not a company, list or file. Ignoring it.",
                "!".bright_yellow(),
                entry
            );
        }
        info!(
            candidates = sources.ids.len(),
            lists = ?request.lists,
            "Resolved problem sources"
        );

        let criteria = request.criteria(&self.catalog);
        let mut rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        if request.interactive {
            let interest = ledger.user_state().companies_of_interest();
            let mut console = TerminalConsole::new(&self.catalog, interest);
            let clock = SystemClock;
            let config = SessionConfig {
                bypass: self.bypass(&sources),
                universe_max_id: self.settings.universe_max_id,
            };

            let outcome = Session::new(
                Selector::new(&self.catalog),
                ledger,
                &mut console,
                &clock,
                &mut rng,
                logger,
                config,
            )
            .start(&sources.ids, &criteria)?;

            if options.json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                display::print_outcome(&outcome);
            }
            return Ok(outcome.exit_code());
        }

        let picked = self.select_once(&*ledger, &sources, &criteria, &mut rng);
        if options.json {
            let problems: Vec<&Problem> = picked
                .iter()
                .filter_map(|id| self.catalog.get(*id))
                .collect();
            println!("{}", serde_json::to_string_pretty(&problems)?);
        } else {
            println!("{}", display::format_id_list(&picked));
        }

        if picked.is_empty() {
            logger.log(&LogEvent::SelectionExhausted {
                topics: criteria.include_topics.clone(),
                exclude_topics: criteria.exclude_topics.clone().unwrap_or_default(),
                difficulties: criteria.difficulties.iter().map(|d| d.to_string()).collect(),
            });
            return Ok(2);
        }
        Ok(0)
    }

    /// One draw from the requested sources with the requested filters.
    pub fn select_once(
        &self,
        ledger: &dyn Ledger,
        sources: &ResolvedSources,
        criteria: &SelectionCriteria,
        rng: &mut StdRng,
    ) -> Vec<ProblemId> {
        let bypass = self.bypass(sources);
        let skip = SkipSet::build(ledger.user_state(), &ledger.completed_ids(), &bypass);
        Selector::new(&self.catalog).select(&sources.ids, criteria, &skip, rng)
    }
}
