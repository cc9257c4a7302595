//! Terminal IO sink.

use console::Term;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, MultiSelect, Password, Select};
use std::io::Write;

use crate::error::{RecipeRunnerError, Result};

use super::theme::{should_use_colors, RecipeTheme};
use super::{RecipeIO, Verbosity};

/// Convert dialoguer errors to RecipeRunnerError.
fn map_dialoguer_err(e: dialoguer::Error) -> RecipeRunnerError {
    RecipeRunnerError::Io(e.into())
}

/// IO sink backed by the process terminal.
///
/// Output below the configured verbosity is dropped. When the sink is not
/// interactive every prompt resolves to its default answer.
pub struct ConsoleIO {
    term: Term,
    theme: RecipeTheme,
    verbosity: Verbosity,
    interactive: bool,
}

impl ConsoleIO {
    /// Create a console sink writing to stdout.
    pub fn new(verbosity: Verbosity, interactive: bool) -> Self {
        let theme = if should_use_colors() {
            RecipeTheme::new()
        } else {
            RecipeTheme::plain()
        };
        let term = Term::stdout();
        let interactive = interactive && term.is_term();

        Self {
            term,
            theme,
            verbosity,
            interactive,
        }
    }

    /// Print an error regardless of verbosity.
    pub fn error(&mut self, msg: &str) {
        let line = self.theme.format_error(msg);
        writeln!(Term::stderr(), "{}", line).ok();
    }

    fn emit(&mut self, message: &str, newline: bool) {
        if newline {
            writeln!(self.term, "{}", message).ok();
        } else {
            write!(self.term, "{}", message).ok();
            self.term.flush().ok();
        }
    }

    fn prompt_theme(&self) -> ColorfulTheme {
        ColorfulTheme {
            prompt_style: self.theme.prompt.clone(),
            ..ColorfulTheme::default()
        }
    }
}

impl RecipeIO for ConsoleIO {
    fn is_interactive(&self) -> bool {
        self.interactive
    }

    fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    fn write(&mut self, message: &str, newline: bool, verbosity: Verbosity) {
        if self.verbosity.allows(verbosity) {
            self.emit(message, newline);
        }
    }

    fn write_lines(&mut self, messages: &[String], newline: bool, verbosity: Verbosity) {
        if !self.verbosity.allows(verbosity) {
            return;
        }
        let last = messages.len().saturating_sub(1);
        for (i, message) in messages.iter().enumerate() {
            self.emit(message, i < last || newline);
        }
    }

    fn ask(&mut self, question: &str, default: &str) -> Result<String> {
        if !self.interactive {
            return Ok(default.to_string());
        }

        let theme = self.prompt_theme();
        let mut input = Input::<String>::with_theme(&theme)
            .with_prompt(question)
            .allow_empty(true);
        if !default.is_empty() {
            input = input.default(default.to_string());
        }
        input.interact_on(&self.term).map_err(map_dialoguer_err)
    }

    fn ask_confirmation(&mut self, question: &str, default: bool) -> Result<bool> {
        if !self.interactive {
            return Ok(default);
        }

        Confirm::with_theme(&self.prompt_theme())
            .with_prompt(question)
            .default(default)
            .interact_on(&self.term)
            .map_err(map_dialoguer_err)
    }

    fn ask_with_hidden_response(&mut self, question: &str) -> Result<String> {
        if !self.interactive {
            return Err(RecipeRunnerError::PromptUnavailable {
                question: question.to_string(),
            });
        }

        Password::with_theme(&self.prompt_theme())
            .with_prompt(question)
            .allow_empty_password(true)
            .interact_on(&self.term)
            .map_err(map_dialoguer_err)
    }

    fn ask_choice(&mut self, question: &str, choices: &[String], default: usize) -> Result<usize> {
        if !self.interactive {
            return Ok(default);
        }

        Select::with_theme(&self.prompt_theme())
            .with_prompt(question)
            .items(choices)
            .default(default)
            .interact_on(&self.term)
            .map_err(map_dialoguer_err)
    }

    fn ask_multiselect_choice(
        &mut self,
        question: &str,
        choices: &[String],
        defaults: &[usize],
    ) -> Result<Vec<usize>> {
        if !self.interactive {
            return Ok(defaults.to_vec());
        }

        let checked: Vec<bool> = (0..choices.len()).map(|i| defaults.contains(&i)).collect();

        MultiSelect::with_theme(&self.prompt_theme())
            .with_prompt(question)
            .items(choices)
            .defaults(&checked)
            .interact_on(&self.term)
            .map_err(map_dialoguer_err)
    }
}
