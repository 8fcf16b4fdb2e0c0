//! Guided builder for a pick command.

use anyhow::Result;
use colored::Colorize;
use dialoguer::{Confirm, Input, MultiSelect, Select};

use leetpick_core::{Catalog, Difficulty};

use crate::pick::PickRequest;

/// Walk the user through topics, difficulty, list, count and mode, print the
/// equivalent command, and return the request if they want to run it now.
pub fn run_helper_menu(
    catalog: &Catalog,
    default_lists: &[String],
    default_count: usize,
) -> Result<Option<PickRequest>> {
    eprintln!("{}", "leetpick helper menu".bold());
    eprintln!(
        "{}",
        "Builds a command step by step. Leave a selection empty to keep the default.".dimmed()
    );
    eprintln!();

    let topics = catalog.canonical_topics();

    let included = MultiSelect::new()
        .with_prompt("Topics to include (none selected = all topics)")
        .items(&topics)
        .interact()?;
    let included: Vec<String> = included.into_iter().map(|i| topics[i].clone()).collect();

    let excluded = MultiSelect::new()
        .with_prompt("Topics to exclude")
        .items(&topics)
        .interact()?;
    let excluded: Vec<String> = excluded.into_iter().map(|i| topics[i].clone()).collect();

    let difficulty_names: Vec<String> = Difficulty::ALL.iter().map(|d| d.to_string()).collect();
    let difficulties = MultiSelect::new()
        .with_prompt("Difficulty (none selected = any)")
        .items(&difficulty_names)
        .interact()?;
    let difficulties: Vec<Difficulty> = difficulties.into_iter().map(|i| Difficulty::ALL[i]).collect();

    let default_label = format!("{} (default)", default_lists.join(" "));
    let list_choice = Select::new()
        .with_prompt("Problem list")
        .items(&[default_label.as_str(), "all (every problem)", "Other (specify)"])
        .default(0)
        .interact()?;
    let lists = match list_choice {
        1 => vec!["all".to_string()],
        2 => {
            let custom: String = Input::new()
                .with_prompt("List names, companies or files (space separated)")
                .interact_text()?;
            let custom: Vec<String> = custom.split_whitespace().map(str::to_string).collect();
            if custom.is_empty() {
                default_lists.to_vec()
            } else {
                custom
            }
        }
        _ => default_lists.to_vec(),
    };

    let count: usize = Input::new()
        .with_prompt("How many problems?")
        .default(default_count)
        .interact_text()?;

    let interactive = Confirm::new()
        .with_prompt("Use interactive mode?")
        .default(false)
        .interact()?;

    let request = PickRequest {
        topics: if included.is_empty() {
            None
        } else {
            Some(included)
        },
        exclude_topics: excluded,
        difficulties,
        lists,
        count,
        interactive,
    };

    eprintln!();
    eprintln!("{}", "Command:".bold());
    eprintln!("  {}", request.command_line().bright_cyan());
    eprintln!();

    let execute = Confirm::new()
        .with_prompt("Run it now?")
        .default(true)
        .interact()?;

    if execute {
        Ok(Some(request))
    } else {
        eprintln!("{}", "Not run. Copy the command above to use it later.".dimmed());
        Ok(None)
    }
}
