use crate::catalog::ProblemId;
use crate::record::Outcome;
use crate::user_state::Category;

pub const HELP_TEXT: &str =
    "Available commands: info, easy, hard, quit, pause, break, skip, revisit [id], refresh [id], help\n\
     When completed, enter: y/n,[num_errs],[time]";

/// One line of interactive input, parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quit,
    Info,
    Pause,
    Break,
    Easy,
    Hard,
    Skip,
    /// `revisit [id]` or `refresh [id]`; `None` means the current problem
    Mark {
        category: Category,
        id: Option<ProblemId>,
    },
    /// `y`/`n` with optional `,<errors>,<minutes>`
    Attempt {
        outcome: Outcome,
        errors: Option<u32>,
        minutes: Option<u32>,
    },
    Help,
    Invalid(String),
}

impl Command {
    pub fn parse(input: &str) -> Self {
        let input = input.trim();

        if input.starts_with('q') {
            return Command::Quit;
        }

        match input {
            "info" => return Command::Info,
            "pause" => return Command::Pause,
            "break" => return Command::Break,
            "easy" => return Command::Easy,
            "hard" => return Command::Hard,
            "skip" => return Command::Skip,
            "help" => return Command::Help,
            _ => {}
        }

        if input.starts_with("revisit") {
            return Self::parse_mark(Category::Revisit, input);
        }
        if input.starts_with("refresh") {
            return Self::parse_mark(Category::Refresh, input);
        }

        if input.starts_with('y') || input.starts_with('n') {
            return Self::parse_attempt(input);
        }

        Command::Invalid(input.to_string())
    }

    fn parse_mark(category: Category, input: &str) -> Self {
        let mut parts = input.split_whitespace();
        let keyword = parts.next().unwrap_or_default();
        if keyword != category.name() {
            return Command::Invalid(input.to_string());
        }

        match (parts.next(), parts.next()) {
            (None, _) => Command::Mark { category, id: None },
            (Some(raw), None) => match raw.parse::<ProblemId>() {
                Ok(id) if id > 0 => Command::Mark {
                    category,
                    id: Some(id),
                },
                _ => Command::Invalid(input.to_string()),
            },
            (Some(_), Some(_)) => Command::Invalid(input.to_string()),
        }
    }

    fn parse_attempt(input: &str) -> Self {
        let fields: Vec<&str> = input.split(',').map(str::trim).collect();
        if fields.len() > 3 {
            return Command::Invalid(input.to_string());
        }

        let outcome = if fields[0].starts_with('y') {
            Outcome::Yes
        } else {
            Outcome::No
        };

        let optional = |index: usize| -> Result<Option<u32>, ()> {
            match fields.get(index) {
                None => Ok(None),
                Some(raw) if raw.is_empty() => Ok(None),
                Some(raw) => raw.parse::<u32>().map(Some).map_err(|_| ()),
            }
        };

        match (optional(1), optional(2)) {
            (Ok(errors), Ok(minutes)) => Command::Attempt {
                outcome,
                errors,
                minutes,
            },
            _ => Command::Invalid(input.to_string()),
        }
    }
}
