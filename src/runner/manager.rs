//! Access to the recipe engine from the run orchestration.

use crate::dependency::{ActivatedEnvironment, DependencyManifest};
use crate::engine::{
    standard_variables, ModuleMethodExecutor, ModuleRegistry, RecipeDefinition, RecipeParser,
    RecipeVariables,
};
use crate::error::Result;
use crate::instrument::{instrumented_parser, Margin};
use crate::ui::RecipeIO;
use crate::workspace::WorkingDirectory;

/// Dotted path of the package list inside a recipe's `extra` block.
pub const PACKAGES_EXTRA_PATH: &str = "rr.packages";

/// What the orchestration needs from a recipe engine.
pub trait RecipeRunnerManager {
    /// Packages declared by the recipe; empty when none are declared.
    fn dependencies_from_recipe(&self, recipe_filename: &str) -> Result<DependencyManifest>;

    /// Run the recipe with `variables` and the modules named by `module_ids`.
    fn execute_recipe(
        &self,
        recipe_filename: &str,
        variables: RecipeVariables,
        module_ids: &[String],
        environment: &ActivatedEnvironment,
        io: &mut dyn RecipeIO,
    ) -> Result<RecipeVariables>;

    /// Variables the engine provides to every recipe.
    fn standard_variables(&self) -> RecipeVariables;
}

/// [`RecipeRunnerManager`] backed by the built-in engine.
///
/// Recipes are read through the working directory; execution goes through
/// the instrumented parser chain.
pub struct EngineRecipeRunnerManager {
    working_directory: WorkingDirectory,
    registry: ModuleRegistry,
    margin: Margin,
}

impl EngineRecipeRunnerManager {
    /// Create a manager with the built-in modules and the default margin.
    pub fn new(working_directory: WorkingDirectory) -> Self {
        Self {
            working_directory,
            registry: ModuleRegistry::with_builtins(),
            margin: Margin::default(),
        }
    }

    /// Use `registry` to instantiate modules.
    pub fn with_registry(mut self, registry: ModuleRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Indent module output by `margin`.
    pub fn with_margin(mut self, margin: Margin) -> Self {
        self.margin = margin;
        self
    }

    fn load_recipe(&self, recipe_filename: &str) -> Result<RecipeDefinition> {
        RecipeDefinition::from_yaml(&self.working_directory.read_file(recipe_filename)?)
    }
}

impl RecipeRunnerManager for EngineRecipeRunnerManager {
    fn dependencies_from_recipe(&self, recipe_filename: &str) -> Result<DependencyManifest> {
        let recipe = self.load_recipe(recipe_filename)?;
        match recipe.extra().get_dot(PACKAGES_EXTRA_PATH) {
            None => Ok(DependencyManifest::new()),
            Some(value) => DependencyManifest::from_value(value),
        }
    }

    fn execute_recipe(
        &self,
        recipe_filename: &str,
        variables: RecipeVariables,
        module_ids: &[String],
        environment: &ActivatedEnvironment,
        io: &mut dyn RecipeIO,
    ) -> Result<RecipeVariables> {
        let modules = self.registry.instantiate_all(module_ids)?;
        let recipe = self.load_recipe(recipe_filename)?;
        let executor = ModuleMethodExecutor::new(modules, environment.clone(), self.margin);

        instrumented_parser(executor).parse(&recipe, variables, io)
    }

    fn standard_variables(&self) -> RecipeVariables {
        standard_variables()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RecipeRunnerError;
    use crate::ui::MockIO;
    use crate::workspace::OsFilesystem;
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn manager_with(recipe: &str) -> (TempDir, EngineRecipeRunnerManager) {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("r.yml"), recipe).unwrap();
        let dir = WorkingDirectory::new(temp.path(), Arc::new(OsFilesystem)).unwrap();
        (temp, EngineRecipeRunnerManager::new(dir))
    }

    #[test]
    fn no_packages_yields_empty_manifest() {
        let (_temp, manager) = manager_with("name: r\n");
        assert!(manager.dependencies_from_recipe("r.yml").unwrap().is_empty());
    }

    #[test]
    fn packages_are_read_from_extra() {
        let (_temp, manager) =
            manager_with("name: r\nextra:\n  rr:\n    packages:\n      acme/tools: \"^2.0\"\n");
        let manifest = manager.dependencies_from_recipe("r.yml").unwrap();
        assert_eq!(manifest.get("acme/tools"), Some("^2.0"));
    }

    #[test]
    fn non_map_packages_are_rejected() {
        let (_temp, manager) =
            manager_with("name: r\nextra:\n  rr:\n    packages: [acme/tools]\n");
        let err = manager.dependencies_from_recipe("r.yml").unwrap_err();
        assert!(matches!(err, RecipeRunnerError::InvalidPackages { .. }));
        assert!(err.to_string().starts_with("Invalid value: extra value \"rr.packages\""));
    }

    #[test]
    fn missing_recipe_file_is_reported() {
        let (_temp, manager) = manager_with("name: r\n");
        let err = manager.dependencies_from_recipe("other.yml").unwrap_err();
        assert!(matches!(err, RecipeRunnerError::FileNotFound { .. }));
    }

    #[test]
    fn executes_with_instrumented_output() {
        let (_temp, manager) = manager_with(
            "name: r\nsteps:\n  - name: s\n    actions:\n      - name: a\n        write: \"hi ${who}\"\n",
        );
        let mut vars = RecipeVariables::new();
        vars.insert("who", "you");
        let mut io = MockIO::new();

        manager
            .execute_recipe("r.yml", vars, &[], &ActivatedEnvironment::default(), &mut io)
            .unwrap();

        assert!(io.has_line("Running recipe \"r\""));
        assert!(io.has_line("     >hi you"));
        assert!(io.has_line("Execution finished."));
    }

    #[test]
    fn unknown_module_fails_before_running() {
        let (_temp, manager) = manager_with("name: r\n");
        let mut io = MockIO::new();

        let err = manager
            .execute_recipe(
                "r.yml",
                RecipeVariables::new(),
                &["Acme\\Missing".to_string()],
                &ActivatedEnvironment::default(),
                &mut io,
            )
            .unwrap_err();

        assert!(matches!(err, RecipeRunnerError::UnknownModule { .. }));
        assert!(io.written().is_empty());
    }

    #[test]
    fn margin_is_configurable() {
        let (_temp, manager) = manager_with(
            "name: r\nsteps:\n  - name: s\n    actions:\n      - name: a\n        write: x\n",
        );
        let manager = manager.with_margin(Margin::new(1).unwrap());
        let mut io = MockIO::new();

        manager
            .execute_recipe(
                "r.yml",
                RecipeVariables::new(),
                &[],
                &ActivatedEnvironment::default(),
                &mut io,
            )
            .unwrap();

        assert!(io.lines().contains(&" >x"));
    }
}
