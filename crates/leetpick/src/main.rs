use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use leetpick_core::{Category, Difficulty, Ledger, MemoryLedger};
use leetpick_logging::{init_tracing, LogFormat, Logger};
use leetpick_store::{load_catalog, FileLedger};

mod config;
mod display;
mod history;
mod menu;
mod pick;
mod sources;

use config::Settings;
use history::{handle_ledger_command, LedgerAction};
use pick::{PickContext, PickOptions, PickRequest};

const EVENTS_FILE: &str = "events.jsonl";

#[derive(Parser, Debug)]
#[command(
    name = "leetpick",
    about = "Pick practice problems and keep a record of every attempt",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Option<LedgerAction>,

    /// Work through the problems one at a time
    #[arg(short, long)]
    interactive: bool,

    /// Topics to pick from (default: all topics)
    #[arg(short = 't', long, num_args = 1..)]
    topic_list: Option<Vec<String>>,

    /// Topics to leave out
    #[arg(short = 'e', long, num_args = 1..)]
    exclude_topics: Vec<String>,

    /// Companies, user lists, files of ids, or "all" (default: blind75)
    #[arg(short = 'l', long, num_args = 1..)]
    list: Option<Vec<String>>,

    /// Only these difficulties
    #[arg(short = 'd', long, value_enum, num_args = 1..)]
    difficulty: Vec<DifficultyChoice>,

    /// Number of problems (default: 5)
    #[arg(short = 'k', long)]
    num_problems: Option<usize>,

    /// Show details for a problem id and exit
    #[arg(long)]
    info: Option<u32>,

    /// Build the command step by step
    #[arg(short = 'm', long)]
    help_menu: bool,

    /// Directory with the catalog and ledger files (default: ./data)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log output format
    #[arg(long, value_enum)]
    log_format: Option<LogFormatChoice>,

    /// Tracing level (RUST_LOG takes precedence)
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Categories that should not be skipped (completed, hard, revisit, refresh)
    #[arg(long, value_delimiter = ',')]
    bypass_skip: Vec<Category>,

    /// Seed for a reproducible pick
    #[arg(long)]
    seed: Option<u64>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    /// Run without writing to the ledger files
    #[arg(long)]
    dry_run: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DifficultyChoice {
    Easy,
    Medium,
    Hard,
}

impl From<DifficultyChoice> for Difficulty {
    fn from(choice: DifficultyChoice) -> Self {
        match choice {
            DifficultyChoice::Easy => Difficulty::Easy,
            DifficultyChoice::Medium => Difficulty::Medium,
            DifficultyChoice::Hard => Difficulty::Hard,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormatChoice {
    Pretty,
    Json,
    Compact,
}

impl From<LogFormatChoice> for LogFormat {
    fn from(choice: LogFormatChoice) -> Self {
        match choice {
            LogFormatChoice::Pretty => LogFormat::Pretty,
            LogFormatChoice::Json => LogFormat::Json,
            LogFormatChoice::Compact => LogFormat::Compact,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let working_dir = std::env::current_dir().context("Failed to get current directory")?;
    let file_config =
        config::load_layered(config::global_config_path().as_deref(), &working_dir)?;
    let settings = apply_cli_overrides(Settings::resolve(file_config)?, &cli);

    init_tracing(&cli.log_level, settings.log_format);

    let logger = if settings.log_events {
        let path = settings.data_dir.join(EVENTS_FILE);
        Logger::with_file(settings.log_format, &path)
            .with_context(|| format!("Failed to open event log {}", path.display()))?
    } else {
        Logger::new(settings.log_format)
    };

    let catalog = load_catalog(&settings.data_dir).with_context(|| {
        format!(
            "Failed to load the problem catalog from {}",
            settings.data_dir.display()
        )
    })?;
    let mut ledger = FileLedger::open(&settings.data_dir).with_context(|| {
        format!("Failed to open the ledger in {}", settings.data_dir.display())
    })?;

    if let Some(action) = cli.command {
        return handle_ledger_command(action, &mut ledger, &catalog);
    }

    if let Some(id) = cli.info {
        let interest = ledger.user_state().companies_of_interest();
        display::print_info(&catalog, &interest, id);
        return Ok(());
    }

    let request = if cli.help_menu {
        match menu::run_helper_menu(&catalog, &settings.lists, settings.num_problems)? {
            Some(request) => request,
            None => return Ok(()),
        }
    } else {
        PickRequest {
            topics: cli.topic_list.clone(),
            exclude_topics: cli.exclude_topics.clone(),
            difficulties: cli.difficulty.iter().map(|d| (*d).into()).collect(),
            lists: settings.lists.clone(),
            count: settings.num_problems,
            interactive: cli.interactive,
        }
    };

    let options = PickOptions {
        seed: cli.seed,
        json: cli.json,
    };
    let ctx = PickContext::new(catalog, settings);

    let code = if cli.dry_run {
        eprintln!("=== Dry Run ===");
        eprintln!("Attempts and marks are kept in memory only.");
        let mut memory = MemoryLedger::new(ledger.user_state().clone(), ledger.completed_ids());
        ctx.run(&mut memory, &logger, &request, options)?
    } else {
        ctx.run(&mut ledger, &logger, &request, options)?
    };

    // Exit with appropriate code
    std::process::exit(code);
}

fn apply_cli_overrides(mut settings: Settings, cli: &Cli) -> Settings {
    if let Some(ref dir) = cli.data_dir {
        settings.data_dir = dir.clone();
    }
    if let Some(ref lists) = cli.list {
        settings.lists = lists.clone();
    }
    if let Some(k) = cli.num_problems {
        settings.num_problems = k;
    }
    if let Some(format) = cli.log_format {
        settings.log_format = format.into();
    }
    settings.bypass_skip.extend(cli.bypass_skip.iter().copied());
    settings
}
