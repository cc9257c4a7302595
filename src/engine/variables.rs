//! Named values available to a running recipe.

use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{RecipeRunnerError, Result};

/// Ordered map of variable name to JSON value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeVariables(BTreeMap<String, Value>);

impl RecipeVariables {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `KEY=VALUE` pairs as given on the command line.
    ///
    /// Values are kept as strings; the first `=` separates key and value.
    pub fn from_assignments<S: AsRef<str>>(assignments: &[S]) -> Result<Self> {
        let mut variables = Self::new();
        for assignment in assignments {
            let assignment = assignment.as_ref();
            let (key, value) = assignment.split_once('=').ok_or_else(|| {
                RecipeRunnerError::InvalidVariable {
                    input: assignment.to_string(),
                }
            })?;
            let key = key.trim();
            if key.is_empty() {
                return Err(RecipeRunnerError::InvalidVariable {
                    input: assignment.to_string(),
                });
            }
            variables.insert(key, Value::String(value.to_string()));
        }
        Ok(variables)
    }

    /// Set a variable, replacing any previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(name.into(), value.into());
    }

    /// Remove a variable.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.0.remove(name)
    }

    /// Value of a variable.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Value of a variable rendered as text.
    pub fn get_string(&self, name: &str) -> Option<String> {
        self.get(name).map(value_to_string)
    }

    /// Check if a variable is set.
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Number of variables.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if no variables are set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Copy every variable of `overrides` into this set; `overrides` wins.
    pub fn merge(&mut self, overrides: RecipeVariables) {
        self.0.extend(overrides.0);
    }

    /// This set with `overrides` merged on top.
    pub fn merged_with(mut self, overrides: RecipeVariables) -> Self {
        self.merge(overrides);
        self
    }
}

impl FromIterator<(String, Value)> for RecipeVariables {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Render a value the way it appears inside interpolated text.
///
/// Strings are inserted bare, `null` as nothing, everything else as JSON.
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Variables every run gets from the engine: `os_family`, `os`, `arch`
/// and `temp_dir`.
pub fn standard_variables() -> RecipeVariables {
    let mut variables = RecipeVariables::new();
    variables.insert("os_family", std::env::consts::FAMILY);
    variables.insert("os", std::env::consts::OS);
    variables.insert("arch", std::env::consts::ARCH);
    variables.insert("temp_dir", path_value(&std::env::temp_dir()));
    variables
}

/// A path as a string value.
pub fn path_value(path: &Path) -> Value {
    Value::String(path.display().to_string())
}
