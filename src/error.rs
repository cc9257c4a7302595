//! Error types for Recipe Runner operations.
//!
//! This module defines [`RecipeRunnerError`], the primary error type used
//! throughout the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Validation errors are raised before any side effect takes place
//! - Environment errors carry the offending path or command
//! - Errors raised by the recipe engine pass through the instrumentation
//!   layer untouched
//! - Use `anyhow::Error` (via `RecipeRunnerError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for Recipe Runner operations.
#[derive(Debug, Error)]
pub enum RecipeRunnerError {
    /// Recipe filename does not end in `.yml`.
    #[error("Only YAML recipes are allowed: {filename}")]
    InvalidRecipeFilename { filename: String },

    /// A required string argument was empty.
    #[error("The param \"{field}\" must not be empty.")]
    EmptyArgument { field: String },

    /// The `rr.packages` extra value is not a map of name to constraint.
    #[error("Invalid value: extra value \"rr.packages\" {message}")]
    InvalidPackages { message: String },

    /// Module output margin configured with a negative width.
    #[error("Margin cannot be a negative value. Value found: {value}.")]
    NegativeMargin { value: i64 },

    /// Recipe document could not be parsed.
    #[error("Failed to parse recipe: {message}")]
    RecipeParse { message: String },

    /// An action definition is structurally invalid.
    #[error("Invalid action '{action}': {message}")]
    InvalidAction { action: String, message: String },

    /// A `${name}` reference has no matching variable.
    #[error("Undefined variable: {name}")]
    UndefinedVariable { name: String },

    /// A caller-supplied variable could not be parsed.
    #[error("Invalid variable '{input}': expected KEY=VALUE")]
    InvalidVariable { input: String },

    /// None of the package manager candidates could be found.
    #[error("Package manager not found (tried: {candidates})")]
    PackageManagerNotFound { candidates: String },

    /// External command failed.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// A file that must exist is missing.
    #[error("File \"{path}\" does not exist.")]
    FileNotFound { path: PathBuf },

    /// A file exists but could not be read.
    #[error("File \"{path}\" cannot be read: {message}")]
    FileUnreadable { path: PathBuf, message: String },

    /// Manifest or lock file is not valid JSON of the expected shape.
    #[error("Malformed JSON in {path}: {message}")]
    MalformedJson { path: PathBuf, message: String },

    /// The recipe environment lock could not be acquired.
    #[error("Cannot lock recipe environment {path}: {message}")]
    EnvironmentLock { path: PathBuf, message: String },

    /// A module identifier has no registered factory.
    #[error("Unknown module: {id}")]
    UnknownModule { id: String },

    /// No loaded module provides the requested method.
    #[error("No module provides the method \"{method}\"")]
    UnknownMethod { method: String },

    /// A module method received parameters of the wrong shape.
    #[error("Invalid parameters for \"{method}\": {message}")]
    InvalidParams { method: String, message: String },

    /// An action reported an error and the step does not ignore errors.
    #[error("Action '{action}' in step '{step}' failed: {message}")]
    ActionFailed {
        step: String,
        action: String,
        message: String,
    },

    /// An interactive answer was required but no terminal is available.
    #[error("Cannot ask \"{question}\" in non-interactive mode")]
    PromptUnavailable { question: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for Recipe Runner operations.
pub type Result<T> = std::result::Result<T, RecipeRunnerError>;
