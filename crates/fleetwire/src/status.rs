//! Progress output for workflow runs.

use owo_colors::OwoColorize;

use fleetwire_core::{Observer, Phase};

/// Prints one line per phase start and completion.
pub struct StatusObserver {
    quiet: bool,
}

impl StatusObserver {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl Observer for StatusObserver {
    fn phase(&self, phase: Phase) {
        if !self.quiet {
            println!("{} {phase}...", "→".dimmed());
        }
    }

    fn completed(&self, phase: Phase) {
        if !self.quiet {
            println!("{} {phase}", "✓".green());
        }
    }
}
