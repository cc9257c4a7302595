//! User-facing output and interactive prompts.
//!
//! This module provides:
//! - [`RecipeIO`], the IO sink every component writes through
//! - [`ConsoleIO`] for terminal usage (interactive or not)
//! - [`MockIO`] for tests
//! - [`Verbosity`] levels used to filter output
//!
//! # Example
//!
//! ```
//! use recipe_runner::ui::{MockIO, RecipeIO, Verbosity};
//!
//! let mut io = MockIO::new();
//! io.writeln("Running recipe \"demo\"");
//! io.write("details", true, Verbosity::Verbose);
//!
//! assert_eq!(io.lines(), vec!["Running recipe \"demo\"", "details"]);
//! ```

pub mod mock;
pub mod output;
pub mod terminal;
pub mod theme;

pub use mock::{MockIO, Written};
pub use output::Verbosity;
pub use terminal::ConsoleIO;
pub use theme::RecipeTheme;

use crate::error::Result;

/// Trait for all output and prompting.
///
/// Implementations decide how to render; callers only state the message,
/// whether it ends the line and the verbosity it belongs to.
pub trait RecipeIO {
    /// Check if answers can be read from a user.
    fn is_interactive(&self) -> bool;

    /// The configured verbosity of this sink.
    fn verbosity(&self) -> Verbosity;

    /// Write one message.
    fn write(&mut self, message: &str, newline: bool, verbosity: Verbosity);

    /// Write several messages, each on its own line.
    fn write_lines(&mut self, messages: &[String], newline: bool, verbosity: Verbosity);

    /// Ask for free-form text.
    fn ask(&mut self, question: &str, default: &str) -> Result<String>;

    /// Ask a yes/no question.
    fn ask_confirmation(&mut self, question: &str, default: bool) -> Result<bool>;

    /// Ask for text without echoing the answer.
    fn ask_with_hidden_response(&mut self, question: &str) -> Result<String>;

    /// Ask to pick one of `choices`; returns the chosen index.
    fn ask_choice(&mut self, question: &str, choices: &[String], default: usize) -> Result<usize>;

    /// Ask to pick any of `choices`; returns the chosen indexes in order.
    fn ask_multiselect_choice(
        &mut self,
        question: &str,
        choices: &[String],
        defaults: &[usize],
    ) -> Result<Vec<usize>>;

    /// Write a full line at normal verbosity.
    fn writeln(&mut self, message: &str) {
        self.write(message, true, Verbosity::Normal);
    }
}
