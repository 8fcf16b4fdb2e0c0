use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

/// Structured log events for a practice session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LogEvent {
    SessionStarted {
        candidates: usize,
        requested: usize,
        topics: usize,
    },
    /// The requested filters found nothing and a looser tier was used
    FallbackApplied {
        tier: String,
        description: String,
        problems: usize,
    },
    SelectionExhausted {
        topics: Vec<String>,
        exclude_topics: Vec<String>,
        difficulties: Vec<String>,
    },
    ProblemPresented {
        problem_id: u32,
        label: String,
    },
    ProblemReplaced {
        problem_id: u32,
        replacement: Option<u32>,
        reason: String,
    },
    AttemptRecorded {
        problem_id: u32,
        solved: bool,
        errors: u32,
        minutes: u32,
        measured_minutes: u32,
    },
    ProblemMarked {
        problem_id: u32,
        category: String,
    },
    SessionEnded {
        status: String,
        presented: usize,
        attempted: usize,
        solved: usize,
        duration_secs: f64,
    },
}

impl LogEvent {
    /// Add a timestamp to serialize with the event
    fn with_timestamp(&self) -> serde_json::Value {
        let mut value = serde_json::to_value(self).unwrap_or_default();
        if let Some(obj) = value.as_object_mut() {
            obj.insert(
                "timestamp".to_string(),
                serde_json::Value::String(chrono::Utc::now().to_rfc3339()),
            );
        }
        value
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable format with colors
    #[default]
    Pretty,
    /// JSON lines format for machine consumption
    Json,
    /// Compact single-line format
    Compact,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            "compact" => Ok(LogFormat::Compact),
            _ => Err(format!("Unknown log format: {}", s)),
        }
    }
}

/// Logger for leetpick events - handles both console output and file logging
pub struct Logger {
    format: LogFormat,
    file_writer: Option<Mutex<File>>,
}

impl Logger {
    pub fn new(format: LogFormat) -> Self {
        Self {
            format,
            file_writer: None,
        }
    }

    /// Create a logger with file output in addition to console
    pub fn with_file(format: LogFormat, log_path: &Path) -> std::io::Result<Self> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)?;

        Ok(Self {
            format,
            file_writer: Some(Mutex::new(file)),
        })
    }

    pub fn log(&self, event: &LogEvent) {
        // Log to file if configured (always JSON format for file)
        if let Some(ref writer) = self.file_writer {
            if let Ok(mut file) = writer.lock() {
                let json = event.with_timestamp();
                let _ = writeln!(file, "{}", json);
            }
        }

        match self.format {
            LogFormat::Json => self.log_json(event),
            LogFormat::Pretty => self.log_pretty(event),
            LogFormat::Compact => self.log_compact(event),
        }
    }

    fn log_json(&self, event: &LogEvent) {
        if let Ok(json) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{}", json);
        }
    }

    fn log_pretty(&self, event: &LogEvent) {
        if let Some(message) = Self::pretty_message(event) {
            let _ = writeln!(std::io::stderr(), "{}", message);
        }
    }

    fn pretty_message(event: &LogEvent) -> Option<String> {
        match event {
            LogEvent::ProblemMarked {
                problem_id,
                category,
            } => Some(format!(
                "  {} {} {}",
                "●".dimmed(),
                format!("Marked {} as", problem_id).dimmed(),
                category.bright_magenta()
            )),
            // Shown by the session console or the final outcome printing
            LogEvent::FallbackApplied { .. }
            | LogEvent::SelectionExhausted { .. }
            | LogEvent::SessionEnded { .. } => None,
            // The console already shows these to the user
            LogEvent::SessionStarted { .. }
            | LogEvent::ProblemPresented { .. }
            | LogEvent::ProblemReplaced { .. }
            | LogEvent::AttemptRecorded { .. } => None,
        }
    }

    fn log_compact(&self, event: &LogEvent) {
        let timestamp = chrono::Utc::now().format("%H:%M:%S");
        let _ = writeln!(
            std::io::stderr(),
            "[{}] {}",
            timestamp,
            Self::compact_message(event)
        );
    }

    fn compact_message(event: &LogEvent) -> String {
        match event {
            LogEvent::SessionStarted {
                candidates,
                requested,
                topics,
            } => format!(
                "session:start candidates={} k={} topics={}",
                candidates, requested, topics
            ),
            LogEvent::FallbackApplied { tier, problems, .. } => {
                format!("fallback:{} problems={}", tier, problems)
            }
            LogEvent::SelectionExhausted { .. } => "selection:exhausted".to_string(),
            LogEvent::ProblemPresented { problem_id, label } => {
                format!("problem:{} {}", problem_id, label)
            }
            LogEvent::ProblemReplaced {
                problem_id,
                replacement,
                reason,
            } => match replacement {
                Some(next) => format!("replace:{}->{} {}", problem_id, next, reason),
                None => format!("replace:{}->none {}", problem_id, reason),
            },
            LogEvent::AttemptRecorded {
                problem_id,
                solved,
                errors,
                minutes,
                ..
            } => format!(
                "attempt:{} {} errs={} {}min",
                problem_id,
                if *solved { "yes" } else { "no" },
                errors,
                minutes
            ),
            LogEvent::ProblemMarked {
                problem_id,
                category,
            } => format!("mark:{} {}", problem_id, category),
            LogEvent::SessionEnded {
                status,
                attempted,
                solved,
                duration_secs,
                ..
            } => format!(
                "session:{} attempted={} solved={} {:.1}s",
                status, attempted, solved, duration_secs
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_from_str() {
        assert_eq!("JSON".parse::<LogFormat>(), Ok(LogFormat::Json));
        assert_eq!("compact".parse::<LogFormat>(), Ok(LogFormat::Compact));
        assert!("verbose".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_event_json_is_tagged() {
        let event = LogEvent::AttemptRecorded {
            problem_id: 42,
            solved: true,
            errors: 1,
            minutes: 18,
            measured_minutes: 17,
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["event"], "attempt_recorded");
        assert_eq!(value["problem_id"], 42);
        assert!(event.with_timestamp()["timestamp"].is_string());
    }

    #[test]
    fn test_compact_messages() {
        let replaced = LogEvent::ProblemReplaced {
            problem_id: 3,
            replacement: None,
            reason: "skip".to_string(),
        };
        assert_eq!(Logger::compact_message(&replaced), "replace:3->none skip");

        let marked = LogEvent::ProblemMarked {
            problem_id: 8,
            category: "revisit".to_string(),
        };
        assert_eq!(Logger::compact_message(&marked), "mark:8 revisit");
    }

    #[test]
    fn test_pretty_skips_events_shown_elsewhere() {
        let ended = LogEvent::SessionEnded {
            status: "completed".to_string(),
            presented: 3,
            attempted: 3,
            solved: 2,
            duration_secs: 1800.0,
        };
        let fallback = LogEvent::FallbackApplied {
            tier: "universe".to_string(),
            description: "every problem id".to_string(),
            problems: 2,
        };
        let exhausted = LogEvent::SelectionExhausted {
            topics: vec!["Array".to_string()],
            exclude_topics: Vec::new(),
            difficulties: Vec::new(),
        };
        assert_eq!(Logger::pretty_message(&ended), None);
        assert_eq!(Logger::pretty_message(&fallback), None);
        assert_eq!(Logger::pretty_message(&exhausted), None);

        let marked = LogEvent::ProblemMarked {
            problem_id: 8,
            category: "revisit".to_string(),
        };
        let message = Logger::pretty_message(&marked).unwrap();
        assert!(message.contains("Marked 8 as"));
        assert!(message.contains("revisit"));
    }

    #[test]
    fn test_file_logging_appends_json_lines() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("logs").join("events.jsonl");

        let logger = Logger::with_file(LogFormat::Compact, &path).unwrap();
        logger.log(&LogEvent::ProblemPresented {
            problem_id: 1,
            label: "First problem".to_string(),
        });
        logger.log(&LogEvent::ProblemMarked {
            problem_id: 1,
            category: "hard".to_string(),
        });
        drop(logger);

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["event"], "problem_marked");
        assert_eq!(second["category"], "hard");
    }
}
