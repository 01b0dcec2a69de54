//! Confirmation for destructive commands
//!
//! Commands that overwrite the image ask a [`Confirm`] implementation before
//! touching anything, so they can run unattended (`--yes`) or under test
//! with scripted answers.

use std::io::{self, BufRead, Write};

/// Prompt shown before destructive operations
pub const PROMPT: &str = "Are you sure to do this? (y/N): ";

/// Something that can approve or reject a destructive operation
pub trait Confirm {
    /// Ask the question in `prompt`, returning true to go ahead
    fn confirm(&mut self, prompt: &str) -> io::Result<bool>;
}

/// Asks on stdin/stdout; only `y` or `Y` approves
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&mut self, prompt: &str) -> io::Result<bool> {
        let mut stdout = io::stdout();
        write!(stdout, "{}", prompt)?;
        stdout.flush()?;

        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;
        Ok(is_yes(&answer))
    }
}

/// Approves everything (`--yes`)
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&mut self, prompt: &str) -> io::Result<bool> {
        log::debug!("Auto-confirming: {}", prompt.trim_end());
        Ok(true)
    }
}

fn is_yes(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("y")
}
