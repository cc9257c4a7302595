//! Output verbosity levels.

use std::str::FromStr;

/// Output verbosity level.
///
/// Levels are ordered: a message written at some level is shown only when
/// the sink is configured at that level or a higher one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Verbosity {
    /// Show nothing but errors.
    Quiet,
    /// Show progress and status.
    #[default]
    Normal,
    /// Also show package manager and command output.
    Verbose,
    /// Extra detail.
    VeryVerbose,
    /// Everything.
    Debug,
}

impl FromStr for Verbosity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "quiet" => Ok(Self::Quiet),
            "normal" => Ok(Self::Normal),
            "verbose" => Ok(Self::Verbose),
            "very-verbose" | "very_verbose" => Ok(Self::VeryVerbose),
            "debug" => Ok(Self::Debug),
            _ => Err(format!("unknown verbosity: {}", s)),
        }
    }
}

impl Verbosity {
    /// Map CLI flags to a level: `-q` wins, otherwise each `-v` raises one step.
    pub fn from_flags(quiet: bool, verbose: u8) -> Self {
        if quiet {
            return Self::Quiet;
        }
        match verbose {
            0 => Self::Normal,
            1 => Self::Verbose,
            2 => Self::VeryVerbose,
            _ => Self::Debug,
        }
    }

    /// Check whether a message requested at `level` passes this configured level.
    pub fn allows(&self, level: Verbosity) -> bool {
        level <= *self
    }
}
