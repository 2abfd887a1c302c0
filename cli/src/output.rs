//! Terminal output for the CLI.
//!
//! Written paths go to stdout one per line so they can be piped; status
//! messages go to stderr with a styled prefix.

use std::fmt::Display;
use std::path::Path;

use console::{Term, style};

pub struct Output {
    out: Term,
    status: Term,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    pub fn new() -> Self {
        Self {
            out: Term::stdout(),
            status: Term::stderr(),
        }
    }

    /// Print a written file path, unstyled.
    pub fn path(&self, path: &Path) {
        drop(self.out.write_line(&path.display().to_string()));
    }

    /// Print a success message with a green checkmark.
    pub fn success(&self, message: impl Display) {
        drop(
            self.status
                .write_line(&format!("{} {}", style("✓").green().bold(), message)),
        );
    }

    /// Print an error message with a red X.
    pub fn error(&self, message: impl Display) {
        drop(
            self.status
                .write_line(&format!("{} {}", style("✗").red().bold(), message)),
        );
    }

    pub fn warning(&self, message: impl Display) {
        drop(
            self.status
                .write_line(&format!("{} {}", style("⚠").yellow().bold(), message)),
        );
    }
}
