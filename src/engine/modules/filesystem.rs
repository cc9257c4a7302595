//! File and directory methods: `make_dir`, `write_file` and `remove`.
//!
//! Relative paths resolve against the `recipe_dir` variable when it is set.

use serde_json::Value;
use std::fs;
use std::path::PathBuf;

use crate::engine::module::{MethodContext, Module};
use crate::error::{RecipeRunnerError, Result};
use crate::ui::Verbosity;

use super::essential::text_param;

/// Filesystem module, registered as `recipe-runner/filesystem`.
#[derive(Debug, Default)]
pub struct FilesystemModule;

impl FilesystemModule {
    /// Factory for the module registry.
    pub fn boxed() -> Box<dyn Module> {
        Box::new(Self)
    }
}

impl Module for FilesystemModule {
    fn name(&self) -> &str {
        "filesystem"
    }

    fn has_method(&self, method: &str) -> bool {
        matches!(method, "make_dir" | "write_file" | "remove")
    }

    fn call(&mut self, method: &str, params: &Value, ctx: &mut MethodContext<'_>) -> Result<Value> {
        match method {
            "make_dir" => {
                let path = resolve(ctx, &text_param(method, path_of(params))?);
                fs::create_dir_all(&path)?;
                ctx.io.write(
                    &format!("Created {}", path.display()),
                    true,
                    Verbosity::Verbose,
                );
                Ok(Value::String(path.display().to_string()))
            }
            "write_file" => {
                let path = resolve(ctx, &text_param(method, path_of(params))?);
                let content = text_param(method, params.get("content"))?;
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(&path, content)?;
                ctx.io.write(
                    &format!("Wrote {}", path.display()),
                    true,
                    Verbosity::Verbose,
                );
                Ok(Value::String(path.display().to_string()))
            }
            "remove" => {
                let path = resolve(ctx, &text_param(method, path_of(params))?);
                let existed = if path.is_dir() {
                    fs::remove_dir_all(&path)?;
                    true
                } else if path.exists() {
                    fs::remove_file(&path)?;
                    true
                } else {
                    false
                };
                Ok(Value::Bool(existed))
            }
            _ => Err(RecipeRunnerError::UnknownMethod {
                method: method.to_string(),
            }),
        }
    }
}

/// `params` itself when it is a scalar, otherwise its `path` entry.
fn path_of(params: &Value) -> Option<&Value> {
    match params {
        Value::Object(map) => map.get("path"),
        other => Some(other),
    }
}

fn resolve(ctx: &MethodContext<'_>, path: &str) -> PathBuf {
    let path = PathBuf::from(path);
    if path.is_absolute() {
        return path;
    }
    match ctx.variables.get_string("recipe_dir") {
        Some(base) if !base.is_empty() => PathBuf::from(base).join(path),
        _ => path,
    }
}
