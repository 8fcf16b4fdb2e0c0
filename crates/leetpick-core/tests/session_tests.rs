use std::collections::{BTreeSet, VecDeque};
use std::io;
use std::time::Duration;

use leetpick_core::{
    Catalog, Category, Console, Difficulty, FallbackTier, ManualClock, MemoryLedger,
    Outcome, Problem, ProblemId, SelectionCriteria, Selector, Session, SessionConfig,
    SessionOutcome, HELP_TEXT,
};
use leetpick_logging::{LogFormat, Logger};
use rand::rngs::StdRng;
use rand::SeedableRng;

const MINUTE: Duration = Duration::from_secs(60);

/// Console that replays a fixed script. Each line advances the shared clock
/// by its delay before it is "typed".
struct ScriptedConsole {
    script: VecDeque<(Duration, String)>,
    clock: ManualClock,
    presented: Vec<(String, ProblemId)>,
    notices: Vec<String>,
    infos: Vec<ProblemId>,
}

impl ScriptedConsole {
    fn new(clock: ManualClock, script: &[(Duration, &str)]) -> Self {
        Self {
            script: script
                .iter()
                .map(|(delay, line)| (*delay, line.to_string()))
                .collect(),
            clock,
            presented: Vec::new(),
            notices: Vec::new(),
            infos: Vec::new(),
        }
    }

    fn presented_ids(&self) -> Vec<ProblemId> {
        self.presented.iter().map(|(_, id)| *id).collect()
    }

    fn saw_notice(&self, needle: &str) -> bool {
        self.notices.iter().any(|n| n.contains(needle))
    }
}

impl Console for ScriptedConsole {
    fn read_line(&mut self, _prompt: &str) -> io::Result<Option<String>> {
        match self.script.pop_front() {
            Some((delay, line)) => {
                self.clock.advance(delay);
                Ok(Some(line))
            }
            None => Ok(None),
        }
    }

    fn notice(&mut self, message: &str) {
        self.notices.push(message.to_string());
    }

    fn present(&mut self, label: &str, problem: &Problem) {
        self.presented.push((label.to_string(), problem.id));
    }

    fn info(&mut self, problem: &Problem) {
        self.infos.push(problem.id);
    }
}

/// Ids 1..=6. TopicA = {1, 3, 5}, TopicB = {2, 4, 6}.
/// Difficulties: 1 Easy, 2 Medium, 3 Hard, 4 Easy, 5 Medium, 6 Hard.
fn catalog() -> Catalog {
    let mut catalog = Catalog::default();
    for id in 1..=6u32 {
        catalog.problems.insert(
            id,
            Problem {
                id,
                name: format!("Problem {}", id),
                link: format!("https://leetcode.com/problems/problem-{}/", id),
                difficulty: Difficulty::ALL[((id - 1) % 3) as usize],
                acceptance: "48.1%".to_string(),
            },
        );
    }
    catalog
        .topics
        .insert("TopicA".to_string(), BTreeSet::from([1, 3, 5]));
    catalog
        .topics
        .insert("TopicB".to_string(), BTreeSet::from([2, 4, 6]));
    catalog
}

fn topic_a(count: usize) -> SelectionCriteria {
    SelectionCriteria::new(vec!["TopicA".to_string()], count)
}

fn run(
    catalog: &Catalog,
    ledger: &mut MemoryLedger,
    candidates: &[ProblemId],
    criteria: SelectionCriteria,
    script: &[(Duration, &str)],
) -> (SessionOutcome, ScriptedConsole) {
    let clock = ManualClock::new();
    let mut console = ScriptedConsole::new(clock.clone(), script);
    let mut rng = StdRng::seed_from_u64(2024);
    let logger = Logger::new(LogFormat::Compact);
    let candidates: BTreeSet<ProblemId> = candidates.iter().copied().collect();
    let config = SessionConfig {
        bypass: BTreeSet::new(),
        universe_max_id: 6,
    };

    let session = Session::new(
        Selector::new(catalog),
        ledger,
        &mut console,
        &clock,
        &mut rng,
        &logger,
        config,
    );
    let outcome = session.start(&candidates, &criteria).unwrap();
    (outcome, console)
}

#[test]
fn test_pause_excludes_paused_time() {
    let catalog = catalog();
    let mut ledger = MemoryLedger::default();

    let (outcome, _console) = run(
        &catalog,
        &mut ledger,
        &[1],
        topic_a(1),
        &[(MINUTE * 10, "pause"), (MINUTE * 30, ""), (MINUTE * 5, "y")],
    );

    assert!(matches!(outcome, SessionOutcome::Completed { .. }));
    assert_eq!(ledger.records.len(), 1);
    let record = &ledger.records[0];
    assert_eq!(record.problem_id, 1);
    assert_eq!(record.outcome, Outcome::Yes);
    assert_eq!(record.errors, 0);
    assert_eq!(record.minutes, 15);
}

#[test]
fn test_break_resets_the_timer() {
    let catalog = catalog();
    let mut ledger = MemoryLedger::default();

    run(
        &catalog,
        &mut ledger,
        &[1],
        topic_a(1),
        &[(MINUTE * 25, "break"), (MINUTE * 10, ""), (MINUTE * 4, "n")],
    );

    assert_eq!(ledger.records.len(), 1);
    assert_eq!(ledger.records[0].outcome, Outcome::No);
    assert_eq!(ledger.records[0].minutes, 4);
}

#[test]
fn test_easy_records_five_minutes_and_replaces() {
    let catalog = catalog();
    let mut ledger = MemoryLedger::default();

    let (outcome, console) = run(
        &catalog,
        &mut ledger,
        &[1, 3, 5],
        topic_a(1),
        &[(MINUTE * 20, "easy"), (MINUTE, "y,0,7")],
    );

    let presented = console.presented_ids();
    assert_eq!(presented.len(), 2);
    assert_ne!(presented[0], presented[1]);

    assert_eq!(ledger.records.len(), 2);
    assert_eq!(ledger.records[0].problem_id, presented[0]);
    assert_eq!(ledger.records[0].outcome, Outcome::Yes);
    assert_eq!(ledger.records[0].errors, 0);
    assert_eq!(ledger.records[0].minutes, 5);
    assert_eq!(ledger.records[1].problem_id, presented[1]);
    assert_eq!(ledger.records[1].minutes, 7);

    assert_eq!(outcome.tally().attempted, 2);
    assert_eq!(outcome.tally().solved, 2);
}

#[test]
fn test_replacements_never_repeat_within_a_session() {
    let catalog = catalog();
    let mut ledger = MemoryLedger::default();

    let (outcome, console) = run(
        &catalog,
        &mut ledger,
        &[1, 3, 5],
        topic_a(1),
        &[(MINUTE, "easy"), (MINUTE, "easy"), (MINUTE, "easy")],
    );

    let presented: BTreeSet<ProblemId> = console.presented_ids().into_iter().collect();
    assert_eq!(presented, BTreeSet::from([1, 3, 5]));
    assert_eq!(ledger.records.len(), 3);
    assert!(console.saw_notice("Moving on"));
    assert!(matches!(outcome, SessionOutcome::Completed { .. }));
}

#[test]
fn test_hard_marks_and_ignores_difficulty_for_replacement() {
    let catalog = catalog();
    let mut ledger = MemoryLedger::default();
    let criteria = topic_a(1).with_difficulties(vec![Difficulty::Easy]);

    let (outcome, console) = run(
        &catalog,
        &mut ledger,
        &[1, 3, 5],
        criteria,
        &[(MINUTE, "hard"), (MINUTE, "quit")],
    );

    let presented = console.presented_ids();
    assert_eq!(presented[0], 1);
    assert_eq!(presented.len(), 2);
    assert!(presented[1] == 3 || presented[1] == 5);
    assert_eq!(ledger.state.hard, vec![1]);
    assert!(ledger.records.is_empty());
    assert!(matches!(outcome, SessionOutcome::Quit { .. }));
}

#[test]
fn test_skip_without_replacement_moves_to_next_problem() {
    let catalog = catalog();
    let mut ledger = MemoryLedger::default();

    let (outcome, console) = run(
        &catalog,
        &mut ledger,
        &[1, 3],
        topic_a(2),
        &[(MINUTE, "skip"), (MINUTE, "y")],
    );

    assert_eq!(console.presented_ids().len(), 2);
    assert!(console.saw_notice("Moving on"));
    assert_eq!(ledger.records.len(), 1);
    assert_eq!(ledger.records[0].problem_id, console.presented_ids()[1]);
    assert!(matches!(outcome, SessionOutcome::Completed { .. }));
}

#[test]
fn test_skip_replaces_in_place() {
    let catalog = catalog();
    let mut ledger = MemoryLedger::default();

    let (_outcome, console) = run(
        &catalog,
        &mut ledger,
        &[1, 3, 5],
        topic_a(1),
        &[(MINUTE, "skip"), (MINUTE, "y")],
    );

    let presented = console.presented_ids();
    assert_eq!(presented.len(), 2);
    assert_ne!(presented[0], presented[1]);
    assert_eq!(ledger.records.len(), 1);
    assert_eq!(ledger.records[0].problem_id, presented[1]);
}

#[test]
fn test_revisit_and_refresh_stay_on_problem() {
    let catalog = catalog();
    let mut ledger = MemoryLedger::default();

    let (_outcome, console) = run(
        &catalog,
        &mut ledger,
        &[3],
        topic_a(1),
        &[
            (MINUTE, "revisit 42"),
            (MINUTE, "refresh"),
            (MINUTE, "n,3,20"),
        ],
    );

    assert_eq!(console.presented_ids(), vec![3]);
    assert_eq!(ledger.state.revisit, vec![42]);
    assert_eq!(ledger.state.refresh, vec![3]);
    assert_eq!(ledger.records.len(), 1);
    assert_eq!(ledger.records[0].outcome, Outcome::No);
    assert_eq!(ledger.records[0].errors, 3);
    assert_eq!(ledger.records[0].minutes, 20);
}

#[test]
fn test_info_help_and_invalid_input_change_nothing() {
    let catalog = catalog();
    let mut ledger = MemoryLedger::default();

    let (outcome, console) = run(
        &catalog,
        &mut ledger,
        &[5],
        topic_a(1),
        &[
            (MINUTE, "info"),
            (MINUTE, "help"),
            (MINUTE, "what now"),
            (MINUTE, "y"),
        ],
    );

    assert_eq!(console.infos, vec![5]);
    assert!(console.notices.iter().any(|n| n == HELP_TEXT));
    assert!(console.saw_notice("Invalid input"));
    assert_eq!(console.presented_ids(), vec![5]);
    assert_eq!(ledger.records.len(), 1);
    assert_eq!(ledger.records[0].minutes, 4);
    assert_eq!(outcome.tally().presented, 1);
}

#[test]
fn test_quit_and_end_of_input_terminate() {
    let catalog = catalog();

    let mut ledger = MemoryLedger::default();
    let (outcome, _) = run(&catalog, &mut ledger, &[1, 3, 5], topic_a(3), &[(MINUTE, "q")]);
    assert!(matches!(outcome, SessionOutcome::Quit { .. }));
    assert_eq!(outcome.exit_code(), 0);
    assert!(ledger.records.is_empty());

    let mut ledger = MemoryLedger::default();
    let (outcome, console) = run(&catalog, &mut ledger, &[1, 3, 5], topic_a(3), &[]);
    assert!(matches!(outcome, SessionOutcome::Quit { .. }));
    assert_eq!(console.presented_ids().len(), 1);
}

#[test]
fn test_sequence_advances_only_on_recorded_attempts() {
    let catalog = catalog();
    let mut ledger = MemoryLedger::default();

    let (outcome, console) = run(
        &catalog,
        &mut ledger,
        &[1, 3, 5],
        topic_a(3),
        &[
            (MINUTE, "y"),
            (MINUTE, "info"),
            (MINUTE, "n,2"),
            (MINUTE, "y,1,12"),
        ],
    );

    let labels: Vec<&str> = console.presented.iter().map(|(l, _)| l.as_str()).collect();
    assert_eq!(labels, vec!["First problem", "Next up", "Last problem"]);
    let distinct: BTreeSet<ProblemId> = console.presented_ids().into_iter().collect();
    assert_eq!(distinct.len(), 3);

    let tally = outcome.tally();
    assert_eq!(tally.attempted, 3);
    assert_eq!(tally.solved, 2);
    assert_eq!(ledger.records[1].errors, 2);
    assert_eq!(ledger.records[1].minutes, 2);
}

#[test]
fn test_fallback_to_universe_is_reported() {
    let catalog = catalog();
    let mut ledger = MemoryLedger::default();

    let (outcome, console) = run(
        &catalog,
        &mut ledger,
        &[2, 4],
        topic_a(1),
        &[(MINUTE, "quit")],
    );

    assert!(console.saw_notice("No problems found matching all criteria"));
    assert!(console.saw_notice("whole problem range"));
    match outcome {
        SessionOutcome::Quit { tier, .. } => assert_eq!(tier, FallbackTier::Universe),
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert!([1, 3, 5].contains(&console.presented_ids()[0]));
}

#[test]
fn test_everything_skipped_is_exhausted() {
    let catalog = catalog();
    let mut ledger = MemoryLedger::new(Default::default(), (1..=6).collect());
    ledger.state.hard.push(2);

    let (outcome, console) = run(&catalog, &mut ledger, &[1, 2, 3], topic_a(2), &[]);

    assert_eq!(outcome, SessionOutcome::Exhausted);
    assert_eq!(outcome.exit_code(), 2);
    assert!(console.presented.is_empty());
    assert!(console.saw_notice("No problems are left"));
}

#[test]
fn test_bypassed_category_can_be_practiced() {
    let catalog = catalog();
    let mut ledger = MemoryLedger::default();
    ledger.state.revisit = vec![1, 3, 5];

    let clock = ManualClock::new();
    let mut console = ScriptedConsole::new(clock.clone(), &[(MINUTE * 9, "y")]);
    let mut rng = StdRng::seed_from_u64(5);
    let logger = Logger::new(LogFormat::Compact);
    let config = SessionConfig {
        bypass: BTreeSet::from([Category::Revisit]),
        universe_max_id: 6,
    };
    let candidates = BTreeSet::from([1, 3, 5]);

    let outcome = Session::new(
        Selector::new(&catalog),
        &mut ledger,
        &mut console,
        &clock,
        &mut rng,
        &logger,
        config,
    )
    .start(&candidates, &topic_a(1))
    .unwrap();

    match outcome {
        SessionOutcome::Completed { tier, .. } => assert_eq!(tier, FallbackTier::Original),
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert_eq!(ledger.records[0].minutes, 9);
}
