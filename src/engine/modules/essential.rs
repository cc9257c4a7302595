//! Methods every recipe can use: `write`, `run`, `ask` and `confirm`.

use serde_json::{json, Value};

use crate::engine::module::{MethodContext, Module};
use crate::error::{RecipeRunnerError, Result};
use crate::shell::{self, CommandOptions};
use crate::ui::Verbosity;

const METHODS: [&str; 4] = ["write", "run", "ask", "confirm"];

/// The always-present module.
#[derive(Debug, Default)]
pub struct EssentialModule;

impl EssentialModule {
    /// Create the module.
    pub fn new() -> Self {
        Self
    }

    fn write(&self, params: &Value, ctx: &mut MethodContext<'_>) -> Result<Value> {
        let (message, newline) = match params {
            Value::Object(map) => (
                text_param("write", map.get("message"))?,
                map.get("newline").and_then(Value::as_bool).unwrap_or(true),
            ),
            other => (text_param("write", Some(other))?, true),
        };
        ctx.io.write(&message, newline, Verbosity::Normal);
        Ok(Value::Null)
    }

    fn run(&self, params: &Value, ctx: &mut MethodContext<'_>) -> Result<Value> {
        let (command, cwd) = match params {
            Value::Object(map) => (
                text_param("run", map.get("command"))?,
                map.get("cwd").and_then(Value::as_str).map(Into::into),
            ),
            other => (text_param("run", Some(other))?, None),
        };

        let options = CommandOptions {
            cwd,
            path_prepend: ctx.environment.bin_dirs.clone(),
            ..Default::default()
        };

        let io = &mut *ctx.io;
        let result = shell::execute_shell_streaming(&command, &options, |line| {
            io.write(line.text(), true, Verbosity::Normal);
        })?;

        if !result.success {
            return Err(RecipeRunnerError::CommandFailed {
                command,
                code: result.exit_code,
            });
        }

        Ok(json!({
            "exit_code": result.exit_code,
            "stdout": result.stdout,
            "stderr": result.stderr,
        }))
    }

    fn ask(&self, params: &Value, ctx: &mut MethodContext<'_>) -> Result<Value> {
        let (question, default) = match params {
            Value::Object(map) => (
                text_param("ask", map.get("question"))?,
                map.get("default")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
            ),
            other => (text_param("ask", Some(other))?, String::new()),
        };
        Ok(Value::String(ctx.io.ask(&question, &default)?))
    }

    fn confirm(&self, params: &Value, ctx: &mut MethodContext<'_>) -> Result<Value> {
        let (question, default) = match params {
            Value::Object(map) => (
                text_param("confirm", map.get("question"))?,
                map.get("default").and_then(Value::as_bool).unwrap_or(true),
            ),
            other => (text_param("confirm", Some(other))?, true),
        };
        Ok(Value::Bool(ctx.io.ask_confirmation(&question, default)?))
    }
}

impl Module for EssentialModule {
    fn name(&self) -> &str {
        "essential"
    }

    fn has_method(&self, method: &str) -> bool {
        METHODS.contains(&method)
    }

    fn call(&mut self, method: &str, params: &Value, ctx: &mut MethodContext<'_>) -> Result<Value> {
        match method {
            "write" => self.write(params, ctx),
            "run" => self.run(params, ctx),
            "ask" => self.ask(params, ctx),
            "confirm" => self.confirm(params, ctx),
            _ => Err(RecipeRunnerError::UnknownMethod {
                method: method.to_string(),
            }),
        }
    }
}

/// A required scalar parameter rendered as text.
pub(crate) fn text_param(method: &str, value: Option<&Value>) -> Result<String> {
    match value {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(v @ (Value::Number(_) | Value::Bool(_))) => Ok(v.to_string()),
        _ => Err(RecipeRunnerError::InvalidParams {
            method: method.to_string(),
            message: "expected a string".to_string(),
        }),
    }
}
