//! Margin-aware IO sink for module output.
//!
//! Module output is indented under the action that produced it. Every
//! message that starts a line gets `<margin spaces>>` in front of it;
//! messages continuing a line are passed through untouched.

use crate::error::{RecipeRunnerError, Result};
use crate::ui::{RecipeIO, Verbosity};

/// Default number of spaces before module output.
pub const DEFAULT_MARGIN: usize = 5;

/// Character written after the margin.
pub const MARGIN_MARKER: char = '>';

/// A validated margin width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Margin(usize);

impl Margin {
    /// Validate a margin width.
    ///
    /// # Errors
    ///
    /// Returns `NegativeMargin` if `value` is below zero.
    pub fn new(value: i64) -> Result<Self> {
        usize::try_from(value)
            .map(Self)
            .map_err(|_| RecipeRunnerError::NegativeMargin { value })
    }

    /// Number of spaces.
    pub fn width(&self) -> usize {
        self.0
    }

    /// Text written before a message that starts a line.
    pub fn prefix(&self) -> String {
        format!("{}{}", " ".repeat(self.0), MARGIN_MARKER)
    }
}

impl Default for Margin {
    fn default() -> Self {
        Self(DEFAULT_MARGIN)
    }
}

/// [`RecipeIO`] wrapper that prefixes line starts with a margin.
///
/// The "at line start" flag follows the `newline` argument of the last
/// single-message write. Batches and prompts always begin a line.
pub struct MarginIO<'a> {
    inner: &'a mut dyn RecipeIO,
    prefix: String,
    at_line_start: bool,
}

impl<'a> MarginIO<'a> {
    /// Wrap `inner`, assuming the cursor is at the start of a line.
    pub fn new(inner: &'a mut dyn RecipeIO, margin: Margin) -> Self {
        Self::resume(inner, margin, true)
    }

    /// Wrap `inner` with line state carried over from an earlier wrapper.
    pub fn resume(inner: &'a mut dyn RecipeIO, margin: Margin, at_line_start: bool) -> Self {
        Self {
            inner,
            prefix: margin.prefix(),
            at_line_start,
        }
    }

    /// Whether the next message will be prefixed.
    pub fn at_line_start(&self) -> bool {
        self.at_line_start
    }

    fn format(&self, message: &str) -> String {
        if self.at_line_start {
            format!("{}{}", self.prefix, message)
        } else {
            message.to_string()
        }
    }
}

impl RecipeIO for MarginIO<'_> {
    fn is_interactive(&self) -> bool {
        self.inner.is_interactive()
    }

    fn verbosity(&self) -> Verbosity {
        self.inner.verbosity()
    }

    fn write(&mut self, message: &str, newline: bool, verbosity: Verbosity) {
        let formatted = self.format(message);
        self.at_line_start = newline;
        self.inner.write(&formatted, newline, verbosity);
    }

    fn write_lines(&mut self, messages: &[String], newline: bool, verbosity: Verbosity) {
        self.at_line_start = true;
        let formatted: Vec<String> = messages.iter().map(|m| self.format(m)).collect();
        self.inner.write_lines(&formatted, newline, verbosity);
    }

    fn ask(&mut self, question: &str, default: &str) -> Result<String> {
        self.at_line_start = true;
        let question = self.format(question);
        self.inner.ask(&question, default)
    }

    fn ask_confirmation(&mut self, question: &str, default: bool) -> Result<bool> {
        self.at_line_start = true;
        let question = self.format(question);
        self.inner.ask_confirmation(&question, default)
    }

    fn ask_with_hidden_response(&mut self, question: &str) -> Result<String> {
        self.at_line_start = true;
        let question = self.format(question);
        self.inner.ask_with_hidden_response(&question)
    }

    fn ask_choice(&mut self, question: &str, choices: &[String], default: usize) -> Result<usize> {
        self.at_line_start = true;
        let question = self.format(question);
        self.inner.ask_choice(&question, choices, default)
    }

    fn ask_multiselect_choice(
        &mut self,
        question: &str,
        choices: &[String],
        defaults: &[usize],
    ) -> Result<Vec<usize>> {
        self.at_line_start = true;
        let question = self.format(question);
        self.inner.ask_multiselect_choice(&question, choices, defaults)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockIO;

    fn margin(width: i64) -> Margin {
        Margin::new(width).unwrap()
    }

    #[test]
    fn negative_margin_is_rejected() {
        let err = Margin::new(-1).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Margin cannot be a negative value. Value found: -1."
        );
    }

    #[test]
    fn default_margin_is_five_spaces() {
        assert_eq!(Margin::default().width(), 5);
        assert_eq!(Margin::default().prefix(), "     >");
    }

    #[test]
    fn only_line_start_is_prefixed() {
        let mut inner = MockIO::new();
        {
            let mut io = MarginIO::new(&mut inner, margin(4));
            io.write("first", false, Verbosity::Normal);
            io.write("second", false, Verbosity::Normal);
        }
        assert_eq!(inner.lines(), vec!["    >first", "second"]);
    }

    #[test]
    fn newline_restores_prefix() {
        let mut inner = MockIO::new();
        {
            let mut io = MarginIO::new(&mut inner, margin(2));
            io.write("a", false, Verbosity::Normal);
            io.write("b", true, Verbosity::Normal);
            io.write("c", true, Verbosity::Verbose);
        }
        assert_eq!(inner.lines(), vec!["  >a", "b", "  >c"]);
        assert_eq!(inner.written()[2].verbosity, Verbosity::Verbose);
    }

    #[test]
    fn batch_prefixes_every_message() {
        let mut inner = MockIO::new();
        {
            let mut io = MarginIO::new(&mut inner, margin(1));
            io.write("open", false, Verbosity::Normal);
            io.write_lines(&["x".to_string(), "y".to_string()], true, Verbosity::Normal);
            assert!(io.at_line_start());
        }
        assert_eq!(inner.lines(), vec![" >open", " >x", " >y"]);
    }

    #[test]
    fn prompts_are_prefixed_and_answers_pass_through() {
        let mut inner = MockIO::new();
        inner.queue_answer("blue");
        inner.queue_answer("no");
        {
            let mut io = MarginIO::new(&mut inner, margin(0));
            io.write("pending", false, Verbosity::Normal);
            assert_eq!(io.ask("Color?", "red").unwrap(), "blue");
            assert!(!io.ask_confirmation("Sure?", true).unwrap());
        }
        assert_eq!(inner.questions(), [">Color?", ">Sure?"]);
    }

    #[test]
    fn resumed_state_is_honoured() {
        let mut inner = MockIO::new();
        {
            let mut io = MarginIO::resume(&mut inner, margin(3), false);
            io.write("tail", true, Verbosity::Normal);
        }
        assert_eq!(inner.lines(), vec!["tail"]);
    }
}
