//! Terminal styling helpers for the CLI

use owo_colors::OwoColorize;
use std::fmt::Display;

/// Color roles used by CLI output
pub trait Stylize {
    /// Completed, good news
    fn success(&self) -> String;
    /// Needs attention
    fn warn(&self) -> String;
    /// Secondary detail
    fn muted(&self) -> String;
    /// Branch names and counts
    fn accent(&self) -> String;
    /// Headings
    fn emphasis(&self) -> String;
}

impl<T: Display> Stylize for T {
    fn success(&self) -> String {
        self.green().to_string()
    }

    fn warn(&self) -> String {
        self.yellow().to_string()
    }

    fn muted(&self) -> String {
        self.dimmed().to_string()
    }

    fn accent(&self) -> String {
        self.cyan().to_string()
    }

    fn emphasis(&self) -> String {
        self.bold().to_string()
    }
}

/// Render a fatal error for stderr
pub fn fatal(message: &str) -> String {
    message.red().to_string()
}
