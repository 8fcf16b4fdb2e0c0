use std::io;

use crate::catalog::Problem;

/// The interactive surface of a practice session.
pub trait Console {
    /// Show `prompt` and read one line of input. `Ok(None)` means input has
    /// ended and the session should stop.
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>>;

    /// Plain informational text
    fn notice(&mut self, message: &str);

    /// Announce the problem the user should work on next
    fn present(&mut self, label: &str, problem: &Problem);

    /// Detailed metadata for a problem
    fn info(&mut self, problem: &Problem);
}
