//! Engine and orchestration tests through the public API.

use recipe_runner::dependency::ActivatedEnvironment;
use recipe_runner::engine::{MethodContext, Module, ModuleRegistry, RecipeVariables};
use recipe_runner::error::Result;
use recipe_runner::instrument::Margin;
use recipe_runner::runner::{EngineRecipeRunnerManager, RecipeRunnerManager};
use recipe_runner::ui::{MockIO, Verbosity};
use recipe_runner::workspace::{OsFilesystem, WorkingDirectory};
use serde_json::{json, Value};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

/// Module shipped by an embedding application.
struct Counter {
    count: u64,
}

impl Module for Counter {
    fn name(&self) -> &str {
        "counter"
    }

    fn has_method(&self, method: &str) -> bool {
        method == "count"
    }

    fn call(
        &mut self,
        _method: &str,
        params: &Value,
        ctx: &mut MethodContext<'_>,
    ) -> Result<Value> {
        self.count += params.as_u64().unwrap_or(1);
        ctx.io
            .write(&format!("count is {}", self.count), true, Verbosity::Normal);
        Ok(json!(self.count))
    }
}

fn counter() -> Box<dyn Module> {
    Box::new(Counter { count: 0 })
}

const COUNTING_RECIPE: &str = r#"
name: counting
steps:
  - name: tally
    actions:
      - name: add
        foreach: [1, 2, 3]
        count: "${item}"
        register: totals
      - name: report
        write: "totals ${totals}"
"#;

fn setup(recipe: &str) -> (TempDir, WorkingDirectory) {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("counting.yml"), recipe).unwrap();
    let dir = WorkingDirectory::new(temp.path(), Arc::new(OsFilesystem)).unwrap();
    (temp, dir)
}

#[test]
fn registered_module_runs_with_instrumentation() {
    let (_temp, dir) = setup(COUNTING_RECIPE);
    let mut registry = ModuleRegistry::with_builtins();
    registry.register("acme/counter", counter);
    let manager = EngineRecipeRunnerManager::new(dir)
        .with_registry(registry)
        .with_margin(Margin::new(2).unwrap());
    let mut io = MockIO::new();

    let vars = manager
        .execute_recipe(
            "counting.yml",
            RecipeVariables::new(),
            &["acme/counter".to_string()],
            &ActivatedEnvironment::default(),
            &mut io,
        )
        .unwrap();

    assert_eq!(vars.get("totals"), Some(&json!([1, 3, 6])));
    assert_eq!(
        io.lines(),
        vec![
            "Running recipe \"counting\"",
            "",
            "- Running step \"tally\"",
            "  + Running action \"add\"",
            "  >count is 1",
            "  >count is 3",
            "  >count is 6",
            "    => OK (3 iterations)",
            "  + Running action \"report\"",
            "  >totals [1,3,6]",
            "    => OK (1 iteration)",
            "",
            "Execution finished.",
        ]
    );
}

#[test]
fn module_unknown_to_registry_is_rejected() {
    let (_temp, dir) = setup(COUNTING_RECIPE);
    let manager = EngineRecipeRunnerManager::new(dir);
    let mut io = MockIO::new();

    let err = manager
        .execute_recipe(
            "counting.yml",
            RecipeVariables::new(),
            &["acme/counter".to_string()],
            &ActivatedEnvironment::default(),
            &mut io,
        )
        .unwrap_err();

    assert_eq!(err.to_string(), "Unknown module: acme/counter");
}

#[test]
fn standard_variables_describe_the_host() {
    let (_temp, dir) = setup(COUNTING_RECIPE);
    let vars = EngineRecipeRunnerManager::new(dir).standard_variables();

    assert_eq!(vars.get_string("os").as_deref(), Some(std::env::consts::OS));
    assert_eq!(vars.get_string("arch").as_deref(), Some(std::env::consts::ARCH));
}
