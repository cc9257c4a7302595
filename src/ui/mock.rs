//! Mock IO implementation for testing.
//!
//! `MockIO` implements the [`RecipeIO`] trait and captures all
//! interactions for later assertion. It can be configured with
//! pre-determined prompt answers.
//!
//! # Example
//!
//! ```
//! use recipe_runner::ui::{MockIO, RecipeIO};
//!
//! let mut io = MockIO::new();
//! io.queue_answer("myapp_dev");
//!
//! let answer = io.ask("Database name?", "app").unwrap();
//! assert_eq!(answer, "myapp_dev");
//! assert_eq!(io.questions(), ["Database name?"]);
//! ```

use std::collections::VecDeque;

use crate::error::Result;

use super::{RecipeIO, Verbosity};

/// One captured `write` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Written {
    /// The message as received.
    pub message: String,
    /// Whether the message ended the line.
    pub newline: bool,
    /// The verbosity it was written at.
    pub verbosity: Verbosity,
}

/// Mock IO implementation for testing.
///
/// Records every write (single messages and each message of a batch) and
/// every question asked. Prompts pop queued answers first and fall back to
/// the default answer.
#[derive(Debug, Default)]
pub struct MockIO {
    verbosity: Verbosity,
    interactive: bool,
    written: Vec<Written>,
    questions: Vec<String>,
    answers: VecDeque<String>,
}

impl MockIO {
    /// Create a new MockIO at normal verbosity.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new MockIO reporting a specific verbosity.
    pub fn with_verbosity(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            ..Default::default()
        }
    }

    /// Set whether this mock reports itself as interactive.
    pub fn set_interactive(&mut self, interactive: bool) {
        self.interactive = interactive;
    }

    /// Queue an answer for the next prompt, whatever its kind.
    ///
    /// Confirmations read `yes`/`y`/`true`/`1` as true; choices read an index;
    /// multiselects read comma-separated indexes.
    pub fn queue_answer(&mut self, answer: &str) {
        self.answers.push_back(answer.to_string());
    }

    /// All captured writes in order.
    pub fn written(&self) -> &[Written] {
        &self.written
    }

    /// All captured messages in order.
    pub fn lines(&self) -> Vec<&str> {
        self.written.iter().map(|w| w.message.as_str()).collect()
    }

    /// All questions asked in order.
    pub fn questions(&self) -> &[String] {
        &self.questions
    }

    /// Check if any message contains `text`.
    pub fn has_line(&self, text: &str) -> bool {
        self.written.iter().any(|w| w.message.contains(text))
    }

    /// Clear all captured interactions.
    pub fn clear(&mut self) {
        self.written.clear();
        self.questions.clear();
    }

    fn next_answer(&mut self, question: &str) -> Option<String> {
        self.questions.push(question.to_string());
        self.answers.pop_front()
    }
}

impl RecipeIO for MockIO {
    fn is_interactive(&self) -> bool {
        self.interactive
    }

    fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    fn write(&mut self, message: &str, newline: bool, verbosity: Verbosity) {
        self.written.push(Written {
            message: message.to_string(),
            newline,
            verbosity,
        });
    }

    fn write_lines(&mut self, messages: &[String], newline: bool, verbosity: Verbosity) {
        for message in messages {
            self.write(message, newline, verbosity);
        }
    }

    fn ask(&mut self, question: &str, default: &str) -> Result<String> {
        Ok(self
            .next_answer(question)
            .unwrap_or_else(|| default.to_string()))
    }

    fn ask_confirmation(&mut self, question: &str, default: bool) -> Result<bool> {
        Ok(self
            .next_answer(question)
            .map(|a| matches!(a.as_str(), "true" | "yes" | "y" | "1"))
            .unwrap_or(default))
    }

    fn ask_with_hidden_response(&mut self, question: &str) -> Result<String> {
        Ok(self.next_answer(question).unwrap_or_default())
    }

    fn ask_choice(&mut self, question: &str, _choices: &[String], default: usize) -> Result<usize> {
        Ok(self
            .next_answer(question)
            .and_then(|a| a.trim().parse().ok())
            .unwrap_or(default))
    }

    fn ask_multiselect_choice(
        &mut self,
        question: &str,
        _choices: &[String],
        defaults: &[usize],
    ) -> Result<Vec<usize>> {
        Ok(match self.next_answer(question) {
            Some(answer) => answer
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect(),
            None => defaults.to_vec(),
        })
    }
}
