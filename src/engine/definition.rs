//! Recipe definitions parsed from YAML.
//!
//! ```yaml
//! name: hello
//! extra:
//!   rr:
//!     packages: { "vendor/pkg": "^1.0" }
//! steps:
//!   - name: greet
//!     actions:
//!       - name: say hello
//!         write: "Hello ${recipe_name}"
//! ```
//!
//! An action is a map with an optional set of reserved keys (`name`,
//! `foreach`, `register`, `ignore_errors`) and exactly one other key naming
//! the module method to call; that key's value holds the parameters.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{RecipeRunnerError, Result};

const RESERVED_ACTION_KEYS: [&str; 4] = ["name", "foreach", "register", "ignore_errors"];

/// A parsed recipe.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeDefinition {
    name: String,
    extra: Extra,
    steps: Vec<StepDefinition>,
}

/// Free-form metadata attached to a recipe.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extra(Map<String, Value>);

/// A named group of actions.
#[derive(Debug, Clone, PartialEq)]
pub struct StepDefinition {
    name: String,
    actions: Vec<ActionDefinition>,
}

/// One module method call.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionDefinition {
    name: String,
    method: String,
    params: Value,
    foreach: Option<Value>,
    register: Option<String>,
    ignore_errors: bool,
}

#[derive(Debug, Deserialize)]
struct RecipeDocument {
    name: Option<String>,
    #[serde(default)]
    extra: Option<Map<String, Value>>,
    #[serde(default)]
    steps: Option<Vec<StepDocument>>,
}

#[derive(Debug, Deserialize)]
struct StepDocument {
    name: Option<String>,
    #[serde(default)]
    actions: Option<Vec<Map<String, Value>>>,
}

impl RecipeDefinition {
    /// Parse a recipe from YAML text.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let document: RecipeDocument =
            serde_yaml::from_str(content).map_err(|e| RecipeRunnerError::RecipeParse {
                message: e.to_string(),
            })?;

        let name = required_name(document.name, "recipe")?;
        let steps = document
            .steps
            .unwrap_or_default()
            .into_iter()
            .map(StepDefinition::from_document)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            name,
            extra: Extra(document.extra.unwrap_or_default()),
            steps,
        })
    }

    /// Recipe name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Recipe metadata.
    pub fn extra(&self) -> &Extra {
        &self.extra
    }

    /// Steps in declaration order.
    pub fn steps(&self) -> &[StepDefinition] {
        &self.steps
    }
}

impl Extra {
    /// Look up a value by dotted path, e.g. `rr.packages`.
    pub fn get_dot(&self, path: &str) -> Option<&Value> {
        let mut parts = path.split('.');
        let first = parts.next()?;
        parts.try_fold(self.0.get(first)?, |value, key| value.as_object()?.get(key))
    }

    /// Check if no metadata is present.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl StepDefinition {
    fn from_document(document: StepDocument) -> Result<Self> {
        let name = required_name(document.name, "step")?;
        let actions = document
            .actions
            .unwrap_or_default()
            .into_iter()
            .map(ActionDefinition::from_map)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { name, actions })
    }

    /// Step name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Actions in declaration order.
    pub fn actions(&self) -> &[ActionDefinition] {
        &self.actions
    }
}

impl ActionDefinition {
    /// Build an action from its YAML map.
    pub fn from_map(mut map: Map<String, Value>) -> Result<Self> {
        let name = match map.remove("name") {
            Some(Value::String(name)) if !name.trim().is_empty() => name,
            _ => {
                return Err(RecipeRunnerError::RecipeParse {
                    message: "every action needs a non-empty \"name\"".to_string(),
                })
            }
        };
        let invalid = |message: String| RecipeRunnerError::InvalidAction {
            action: name.clone(),
            message,
        };

        let foreach = map.remove("foreach");
        let register = match map.remove("register") {
            None => None,
            Some(Value::String(var)) if !var.trim().is_empty() => Some(var),
            Some(_) => return Err(invalid("\"register\" must be a variable name".to_string())),
        };
        let ignore_errors = match map.remove("ignore_errors") {
            None => false,
            Some(Value::Bool(flag)) => flag,
            Some(_) => return Err(invalid("\"ignore_errors\" must be true or false".to_string())),
        };

        if map.len() != 1 {
            let found: Vec<&str> = map.keys().map(String::as_str).collect();
            return Err(invalid(format!(
                "expected exactly one method besides {:?}, found {:?}",
                RESERVED_ACTION_KEYS, found
            )));
        }

        let Some((method, params)) = map.into_iter().next() else {
            return Err(invalid("no method given".to_string()));
        };

        Ok(Self {
            name,
            method,
            params,
            foreach,
            register,
            ignore_errors,
        })
    }

    /// Action name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Module method to call.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Method parameters, before interpolation.
    pub fn params(&self) -> &Value {
        &self.params
    }

    /// Items to iterate over, before interpolation.
    pub fn foreach(&self) -> Option<&Value> {
        self.foreach.as_ref()
    }

    /// Variable that receives the method's output.
    pub fn register(&self) -> Option<&str> {
        self.register.as_deref()
    }

    /// Whether a failure of this action lets the step continue.
    pub fn ignore_errors(&self) -> bool {
        self.ignore_errors
    }
}

fn required_name(name: Option<String>, what: &str) -> Result<String> {
    match name {
        Some(name) if !name.trim().is_empty() => Ok(name),
        _ => Err(RecipeRunnerError::RecipeParse {
            message: format!("every {} needs a non-empty \"name\"", what),
        }),
    }
}
