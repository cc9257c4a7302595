//! Variable interpolation for action parameters.
//!
//! # Syntax
//!
//! - `${variable_name}` - replaced with the variable's value
//! - `$${escaped}` - produces literal `${escaped}` in output
//!
//! A string that consists of exactly one `${name}` evaluates to the raw
//! value, so lists and maps can be passed around unchanged:
//!
//! ```
//! use recipe_runner::engine::{interpolate_value, RecipeVariables};
//! use serde_json::json;
//!
//! let mut vars = RecipeVariables::new();
//! vars.insert("hosts", json!(["a", "b"]));
//! vars.insert("user", "deploy");
//!
//! assert_eq!(interpolate_value(&json!("${hosts}"), &vars).unwrap(), json!(["a", "b"]));
//! assert_eq!(interpolate_value(&json!("ssh ${user}@x"), &vars).unwrap(), json!("ssh deploy@x"));
//! ```

use serde_json::Value;

use crate::error::{RecipeRunnerError, Result};

use super::variables::{value_to_string, RecipeVariables};

/// A segment of an interpolated string.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Literal text
    Literal(String),
    /// Variable reference: ${name}
    Variable(String),
}

/// Parse a string containing `${var}` interpolations.
pub fn parse_interpolation(input: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut chars = input.chars().peekable();
    let mut current_literal = String::new();

    while let Some(c) = chars.next() {
        if c != '$' {
            current_literal.push(c);
            continue;
        }

        match chars.peek() {
            Some('$') => {
                chars.next();
                if chars.peek() == Some(&'{') {
                    // $${...} -> literal ${...}
                    chars.next();
                    current_literal.push_str("${");
                    for c in chars.by_ref() {
                        current_literal.push(c);
                        if c == '}' {
                            break;
                        }
                    }
                } else {
                    current_literal.push('$');
                }
            }
            Some('{') => {
                chars.next();

                if !current_literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut current_literal)));
                }

                let mut var_name = String::new();
                for c in chars.by_ref() {
                    if c == '}' {
                        break;
                    }
                    var_name.push(c);
                }

                segments.push(Segment::Variable(var_name.trim().to_string()));
            }
            _ => current_literal.push(c),
        }
    }

    if !current_literal.is_empty() {
        segments.push(Segment::Literal(current_literal));
    }

    segments
}

/// Check if a string contains any interpolation.
pub fn has_interpolation(input: &str) -> bool {
    parse_interpolation(input)
        .iter()
        .any(|seg| matches!(seg, Segment::Variable(_)))
}

/// Resolve a single string.
///
/// # Errors
///
/// Returns `UndefinedVariable` if a referenced variable is not set.
pub fn interpolate_str(input: &str, variables: &RecipeVariables) -> Result<Value> {
    let segments = parse_interpolation(input);

    if let [Segment::Variable(name)] = segments.as_slice() {
        return lookup(name, variables).cloned();
    }

    let mut result = String::new();
    for segment in segments {
        match segment {
            Segment::Literal(text) => result.push_str(&text),
            Segment::Variable(name) => result.push_str(&value_to_string(lookup(&name, variables)?)),
        }
    }

    Ok(Value::String(result))
}

/// Resolve every string inside `value`, recursing into lists and maps.
///
/// Map keys are left untouched.
pub fn interpolate_value(value: &Value, variables: &RecipeVariables) -> Result<Value> {
    match value {
        Value::String(s) => interpolate_str(s, variables),
        Value::Array(items) => items
            .iter()
            .map(|item| interpolate_value(item, variables))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        Value::Object(map) => {
            let mut resolved = serde_json::Map::with_capacity(map.len());
            for (key, item) in map {
                resolved.insert(key.clone(), interpolate_value(item, variables)?);
            }
            Ok(Value::Object(resolved))
        }
        other => Ok(other.clone()),
    }
}

fn lookup<'a>(name: &str, variables: &'a RecipeVariables) -> Result<&'a Value> {
    variables
        .get(name)
        .ok_or_else(|| RecipeRunnerError::UndefinedVariable {
            name: name.to_string(),
        })
}
