//! Modules, their registry and method dispatch.
//!
//! A module is a named bundle of methods that actions call. Modules are
//! created from string identifiers through a [`ModuleRegistry`]; identifiers
//! come from the lock file of a recipe environment.

use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

use crate::dependency::ActivatedEnvironment;
use crate::error::{RecipeRunnerError, Result};
use crate::instrument::{Margin, MarginIO};
use crate::ui::RecipeIO;

use super::modules::{EssentialModule, FilesystemModule};
use super::variables::RecipeVariables;

/// Everything a module method can reach while it runs.
pub struct MethodContext<'a> {
    /// Output and prompts, already margin-prefixed.
    pub io: &'a mut dyn RecipeIO,

    /// Variables visible to the calling action.
    pub variables: &'a RecipeVariables,

    /// The activated dependency environment.
    pub environment: &'a ActivatedEnvironment,
}

/// A named set of methods callable from actions.
pub trait Module {
    /// Module name, for diagnostics.
    fn name(&self) -> &str;

    /// Check whether this module provides `method`.
    fn has_method(&self, method: &str) -> bool;

    /// Call `method` with interpolated `params`.
    fn call(&mut self, method: &str, params: &Value, ctx: &mut MethodContext<'_>) -> Result<Value>;
}

/// Creates a fresh module instance.
pub type ModuleFactory = fn() -> Box<dyn Module>;

/// Identifier of the built-in filesystem module.
pub const FILESYSTEM_MODULE_ID: &str = "recipe-runner/filesystem";

/// Maps module identifiers to factories.
#[derive(Clone)]
pub struct ModuleRegistry {
    factories: BTreeMap<String, ModuleFactory>,
}

impl fmt::Debug for ModuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleRegistry")
            .field("ids", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Default for ModuleRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl ModuleRegistry {
    /// A registry with no modules.
    pub fn empty() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// A registry with the built-in modules.
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        registry.register(FILESYSTEM_MODULE_ID, FilesystemModule::boxed);
        registry
    }

    /// Register a module factory, replacing any factory with the same id.
    pub fn register(&mut self, id: impl Into<String>, factory: ModuleFactory) {
        self.factories.insert(id.into(), factory);
    }

    /// Check whether `id` is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.factories.contains_key(id)
    }

    /// Registered identifiers in sorted order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Create the module registered under `id`.
    ///
    /// # Errors
    ///
    /// Returns `UnknownModule` if nothing is registered under `id`.
    pub fn instantiate(&self, id: &str) -> Result<Box<dyn Module>> {
        let factory = self
            .factories
            .get(id)
            .ok_or_else(|| RecipeRunnerError::UnknownModule { id: id.to_string() })?;
        tracing::debug!("Instantiating module '{}'", id);
        Ok(factory())
    }

    /// Create one module per identifier, in order.
    pub fn instantiate_all(&self, ids: &[String]) -> Result<Vec<Box<dyn Module>>> {
        ids.iter().map(|id| self.instantiate(id)).collect()
    }
}

/// Routes method calls to the module that provides them.
///
/// The essential module is always consulted first. Module output goes
/// through a margin sink whose line state persists across calls.
pub struct ModuleMethodExecutor {
    modules: Vec<Box<dyn Module>>,
    environment: ActivatedEnvironment,
    margin: Margin,
    at_line_start: bool,
}

impl ModuleMethodExecutor {
    /// Create an executor over the essential module plus `modules`.
    pub fn new(
        modules: Vec<Box<dyn Module>>,
        environment: ActivatedEnvironment,
        margin: Margin,
    ) -> Self {
        let mut all: Vec<Box<dyn Module>> = vec![Box::new(EssentialModule::new())];
        all.extend(modules);
        Self {
            modules: all,
            environment,
            margin,
            at_line_start: true,
        }
    }

    /// Names of the modules in dispatch order.
    pub fn module_names(&self) -> Vec<&str> {
        self.modules.iter().map(|m| m.name()).collect()
    }

    /// Call `method` on the first module providing it.
    ///
    /// # Errors
    ///
    /// Returns `UnknownMethod` if no module provides `method`, otherwise
    /// whatever the method returns.
    pub fn run_method(
        &mut self,
        method: &str,
        params: &Value,
        variables: &RecipeVariables,
        io: &mut dyn RecipeIO,
    ) -> Result<Value> {
        let module = self
            .modules
            .iter_mut()
            .find(|m| m.has_method(method))
            .ok_or_else(|| RecipeRunnerError::UnknownMethod {
                method: method.to_string(),
            })?;

        let mut margin_io = MarginIO::resume(io, self.margin, self.at_line_start);
        let mut ctx = MethodContext {
            io: &mut margin_io,
            variables,
            environment: &self.environment,
        };
        let result = module.call(method, params, &mut ctx);
        self.at_line_start = margin_io.at_line_start();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockIO;
    use serde_json::json;

    struct Greeter;

    impl Module for Greeter {
        fn name(&self) -> &str {
            "greeter"
        }

        fn has_method(&self, method: &str) -> bool {
            method == "greet"
        }

        fn call(
            &mut self,
            _method: &str,
            params: &Value,
            ctx: &mut MethodContext<'_>,
        ) -> Result<Value> {
            let who = params.as_str().unwrap_or("nobody");
            ctx.io.write("hello ", false, crate::ui::Verbosity::Normal);
            ctx.io.write(who, true, crate::ui::Verbosity::Normal);
            Ok(json!(format!("greeted {}", who)))
        }
    }

    fn greeter() -> Box<dyn Module> {
        Box::new(Greeter)
    }

    #[test]
    fn builtins_are_registered() {
        let registry = ModuleRegistry::with_builtins();
        assert!(registry.contains(FILESYSTEM_MODULE_ID));
        assert_eq!(
            registry.instantiate(FILESYSTEM_MODULE_ID).unwrap().name(),
            "filesystem"
        );
    }

    #[test]
    fn unknown_module_is_a_typed_error() {
        let registry = ModuleRegistry::with_builtins();
        let err = registry
            .instantiate_all(&["Vendor\\Missing".to_string()])
            .err()
            .unwrap();
        assert!(
            matches!(err, RecipeRunnerError::UnknownModule { ref id } if id == "Vendor\\Missing")
        );
    }

    #[test]
    fn registered_factories_are_instantiated_in_order() {
        let mut registry = ModuleRegistry::empty();
        registry.register("acme/greeter", greeter);

        let modules = registry
            .instantiate_all(&["acme/greeter".to_string(), "acme/greeter".to_string()])
            .unwrap();
        assert_eq!(modules.len(), 2);
        assert_eq!(registry.ids().collect::<Vec<_>>(), vec!["acme/greeter"]);
    }

    #[test]
    fn essential_module_comes_first() {
        let executor = ModuleMethodExecutor::new(
            vec![greeter()],
            ActivatedEnvironment::default(),
            Margin::default(),
        );
        assert_eq!(executor.module_names(), vec!["essential", "greeter"]);
    }

    #[test]
    fn dispatches_with_margin() {
        let mut executor = ModuleMethodExecutor::new(
            vec![greeter()],
            ActivatedEnvironment::default(),
            Margin::new(2).unwrap(),
        );
        let mut io = MockIO::new();

        let output = executor
            .run_method("greet", &json!("bob"), &RecipeVariables::new(), &mut io)
            .unwrap();

        assert_eq!(output, json!("greeted bob"));
        assert_eq!(io.lines(), vec!["  >hello ", "bob"]);
    }

    #[test]
    fn line_state_persists_between_calls() {
        let mut executor = ModuleMethodExecutor::new(
            Vec::new(),
            ActivatedEnvironment::default(),
            Margin::new(1).unwrap(),
        );
        let mut io = MockIO::new();
        let vars = RecipeVariables::new();

        executor
            .run_method("write", &json!({"message": "a", "newline": false}), &vars, &mut io)
            .unwrap();
        executor
            .run_method("write", &json!("b"), &vars, &mut io)
            .unwrap();

        assert_eq!(io.lines(), vec![" >a", "b"]);
    }

    #[test]
    fn unknown_method_is_an_error() {
        let mut executor = ModuleMethodExecutor::new(
            Vec::new(),
            ActivatedEnvironment::default(),
            Margin::default(),
        );
        let mut io = MockIO::new();

        let err = executor
            .run_method("fly", &Value::Null, &RecipeVariables::new(), &mut io)
            .unwrap_err();
        assert!(matches!(err, RecipeRunnerError::UnknownMethod { .. }));
    }
}
