//! Visual theme and styling.

use console::Style;

/// Styles used by the console sink.
#[derive(Debug, Clone)]
pub struct RecipeTheme {
    /// Style for error messages (red bold).
    pub error: Style,
    /// Style for prompts (bold).
    pub prompt: Style,
}

impl Default for RecipeTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl RecipeTheme {
    /// Create the default theme.
    pub fn new() -> Self {
        Self {
            error: Style::new().red().bold(),
            prompt: Style::new().bold(),
        }
    }

    /// Create a theme without colors (for non-TTY or --no-color).
    pub fn plain() -> Self {
        Self {
            error: Style::new(),
            prompt: Style::new(),
        }
    }

    /// Format an error message.
    pub fn format_error(&self, msg: &str) -> String {
        format!("{}", self.error.apply_to(msg))
    }
}

/// Check if colors should be used.
///
/// Respects `NO_COLOR` and whether stdout is a terminal.
pub fn should_use_colors() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    console::Term::stdout().is_term()
}
