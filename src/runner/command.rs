//! The run orchestration: dependencies first, then the recipe.

use crate::dependency::{
    ActivatedEnvironment, DependencyEnvironment, DependencyManifest, EnvironmentLock,
};
use crate::engine::RecipeVariables;
use crate::error::Result;
use crate::ui::RecipeIO;

use super::manager::RecipeRunnerManager;
use super::name::RecipeNameExtractor;
use super::variables::CommonRecipeVariableGenerator;

/// Runs one recipe file end to end.
pub struct RunRecipeCommand<D, M> {
    dependency_manager: D,
    runner_manager: M,
    name_extractor: RecipeNameExtractor,
    variable_generator: CommonRecipeVariableGenerator,
}

impl<D: DependencyEnvironment, M: RecipeRunnerManager> RunRecipeCommand<D, M> {
    /// Create the command from its collaborators.
    pub fn new(
        dependency_manager: D,
        runner_manager: M,
        name_extractor: RecipeNameExtractor,
        variable_generator: CommonRecipeVariableGenerator,
    ) -> Self {
        Self {
            dependency_manager,
            runner_manager,
            name_extractor,
            variable_generator,
        }
    }

    /// Run `recipe_filename` with caller-supplied `variables`.
    ///
    /// A recipe without packages skips the dependency environment entirely.
    /// Otherwise the environment is locked for the rest of the run, updated
    /// when its manifest changed and activated before execution. Caller
    /// variables win over generated ones.
    pub fn execute(
        &mut self,
        recipe_filename: &str,
        variables: RecipeVariables,
        io: &mut dyn RecipeIO,
    ) -> Result<RecipeVariables> {
        let recipe_name = self
            .name_extractor
            .extract_name_from_filename(recipe_filename)?;
        let dependencies = self.runner_manager.dependencies_from_recipe(recipe_filename)?;

        let (_lock, module_ids, environment) = if dependencies.is_empty() {
            (EnvironmentLock::detached(), Vec::new(), ActivatedEnvironment::default())
        } else {
            self.prepare_environment(&recipe_name, &dependencies, io)?
        };

        let common = self
            .variable_generator
            .generate(&recipe_name, self.runner_manager.standard_variables())?;

        self.runner_manager.execute_recipe(
            recipe_filename,
            common.merged_with(variables),
            &module_ids,
            &environment,
            io,
        )
    }
}

impl<D: DependencyEnvironment, M> RunRecipeCommand<D, M> {
    fn prepare_environment(
        &mut self,
        recipe_name: &str,
        dependencies: &DependencyManifest,
        io: &mut dyn RecipeIO,
    ) -> Result<(EnvironmentLock, Vec<String>, ActivatedEnvironment)> {
        let lock = self.dependency_manager.lock(recipe_name, io)?;

        if self
            .dependency_manager
            .is_necessary_update(recipe_name, dependencies)?
        {
            self.dependency_manager
                .generate_manifest_file(recipe_name, dependencies)?;
            io.writeln("Resolving dependencies...");
            self.dependency_manager.update(recipe_name, io)?;
        } else {
            tracing::debug!("Dependencies of '{}' are up to date", recipe_name);
        }

        let module_ids = self
            .dependency_manager
            .module_class_names_installed(recipe_name)?;
        let environment = self.dependency_manager.activate(recipe_name)?;

        Ok((lock, module_ids, environment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RecipeRunnerError;
    use crate::runner::variables::FixedCurrentDirectory;
    use crate::ui::MockIO;
    use std::cell::RefCell;
    use std::path::PathBuf;
    use std::rc::Rc;

    type Calls = Rc<RefCell<Vec<String>>>;

    struct FakeDependencies {
        calls: Calls,
        needs_update: bool,
        modules: Vec<String>,
    }

    impl DependencyEnvironment for FakeDependencies {
        fn lock(&self, recipe_name: &str, _io: &mut dyn RecipeIO) -> Result<EnvironmentLock> {
            self.calls.borrow_mut().push(format!("lock {}", recipe_name));
            Ok(EnvironmentLock::detached())
        }

        fn is_necessary_update(&self, recipe_name: &str, _m: &DependencyManifest) -> Result<bool> {
            self.calls.borrow_mut().push(format!("check {}", recipe_name));
            Ok(self.needs_update)
        }

        fn generate_manifest_file(&self, recipe_name: &str, m: &DependencyManifest) -> Result<()> {
            self.calls
                .borrow_mut()
                .push(format!("generate {} {}", recipe_name, m.len()));
            Ok(())
        }

        fn update(&mut self, recipe_name: &str, _io: &mut dyn RecipeIO) -> Result<()> {
            self.calls.borrow_mut().push(format!("update {}", recipe_name));
            Ok(())
        }

        fn module_class_names_installed(&self, recipe_name: &str) -> Result<Vec<String>> {
            self.calls.borrow_mut().push(format!("modules {}", recipe_name));
            Ok(self.modules.clone())
        }

        fn activate(&self, recipe_name: &str) -> Result<ActivatedEnvironment> {
            self.calls.borrow_mut().push(format!("activate {}", recipe_name));
            Ok(ActivatedEnvironment {
                root: Some(PathBuf::from("/work/.rr").join(recipe_name)),
                bin_dirs: Vec::new(),
            })
        }
    }

    struct FakeRunner {
        calls: Calls,
        dependencies: DependencyManifest,
        seen: RefCell<Option<(RecipeVariables, Vec<String>, ActivatedEnvironment)>>,
    }

    impl RecipeRunnerManager for FakeRunner {
        fn dependencies_from_recipe(&self, recipe_filename: &str) -> Result<DependencyManifest> {
            self.calls
                .borrow_mut()
                .push(format!("dependencies {}", recipe_filename));
            Ok(self.dependencies.clone())
        }

        fn execute_recipe(
            &self,
            recipe_filename: &str,
            variables: RecipeVariables,
            module_ids: &[String],
            environment: &ActivatedEnvironment,
            _io: &mut dyn RecipeIO,
        ) -> Result<RecipeVariables> {
            self.calls
                .borrow_mut()
                .push(format!("execute {}", recipe_filename));
            *self.seen.borrow_mut() = Some((
                variables.clone(),
                module_ids.to_vec(),
                environment.clone(),
            ));
            Ok(variables)
        }

        fn standard_variables(&self) -> RecipeVariables {
            let mut vars = RecipeVariables::new();
            vars.insert("os", "testos");
            vars
        }
    }

    fn command(
        dependencies: &[(&str, &str)],
        needs_update: bool,
    ) -> (Calls, RunRecipeCommand<FakeDependencies, FakeRunner>) {
        let calls: Calls = Rc::default();
        let deps = FakeDependencies {
            calls: calls.clone(),
            needs_update,
            modules: vec!["Acme\\Module".to_string()],
        };
        let runner = FakeRunner {
            calls: calls.clone(),
            dependencies: DependencyManifest::from_pairs(dependencies.iter().copied()).unwrap(),
            seen: RefCell::new(None),
        };
        let generator = CommonRecipeVariableGenerator::new(
            "/work",
            Box::new(FixedCurrentDirectory(PathBuf::from("/cwd"))),
        );
        let cmd = RunRecipeCommand::new(deps, runner, RecipeNameExtractor::new(), generator);
        (calls, cmd)
    }

    #[test]
    fn recipe_without_packages_skips_dependencies() {
        let (calls, mut cmd) = command(&[], true);
        let mut io = MockIO::new();

        cmd.execute("hello.yml", RecipeVariables::new(), &mut io)
            .unwrap();

        assert_eq!(*calls.borrow(), vec!["dependencies hello.yml", "execute hello.yml"]);
        let seen = cmd.runner_manager.seen.borrow();
        let (_, modules, environment) = seen.as_ref().unwrap();
        assert!(modules.is_empty());
        assert_eq!(*environment, ActivatedEnvironment::default());
        assert!(io.written().is_empty());
    }

    #[test]
    fn stale_environment_is_regenerated_and_updated() {
        let (calls, mut cmd) = command(&[("acme/module", "^1.0")], true);
        let mut io = MockIO::new();

        cmd.execute("deploy.rr.yml", RecipeVariables::new(), &mut io)
            .unwrap();

        assert_eq!(
            *calls.borrow(),
            vec![
                "dependencies deploy.rr.yml",
                "lock deploy.rr",
                "check deploy.rr",
                "generate deploy.rr 1",
                "update deploy.rr",
                "modules deploy.rr",
                "activate deploy.rr",
                "execute deploy.rr.yml",
            ]
        );
        assert_eq!(io.lines(), vec!["Resolving dependencies..."]);

        let seen = cmd.runner_manager.seen.borrow();
        let (_, modules, environment) = seen.as_ref().unwrap();
        assert_eq!(modules, &vec!["Acme\\Module".to_string()]);
        assert_eq!(environment.root, Some(PathBuf::from("/work/.rr/deploy.rr")));
    }

    #[test]
    fn current_environment_is_not_updated() {
        let (calls, mut cmd) = command(&[("acme/module", "^1.0")], false);
        let mut io = MockIO::new();

        cmd.execute("deploy.yml", RecipeVariables::new(), &mut io)
            .unwrap();

        let calls = calls.borrow();
        assert!(!calls.iter().any(|c| c.starts_with("generate") || c.starts_with("update")));
        assert!(calls.contains(&"modules deploy".to_string()));
        assert!(calls.contains(&"activate deploy".to_string()));
        assert!(io.written().is_empty());
    }

    #[test]
    fn caller_variables_override_common_ones() {
        let (_calls, mut cmd) = command(&[], false);
        let mut caller = RecipeVariables::new();
        caller.insert("recipe_dir", "/custom");
        caller.insert("extra", "1");
        let mut io = MockIO::new();

        let vars = cmd.execute("site.yml", caller, &mut io).unwrap();

        assert_eq!(vars.get_string("recipe_dir").as_deref(), Some("/custom"));
        assert_eq!(vars.get_string("recipe_name").as_deref(), Some("site"));
        assert_eq!(vars.get_string("current_dir").as_deref(), Some("/cwd"));
        assert_eq!(vars.get_string("os").as_deref(), Some("testos"));
        assert_eq!(vars.get_string("extra").as_deref(), Some("1"));
    }

    #[test]
    fn invalid_filename_fails_before_anything_else() {
        let (calls, mut cmd) = command(&[("a/b", "1")], true);
        let mut io = MockIO::new();

        let err = cmd
            .execute("recipe.json", RecipeVariables::new(), &mut io)
            .unwrap_err();

        assert!(matches!(err, RecipeRunnerError::InvalidRecipeFilename { .. }));
        assert!(calls.borrow().is_empty());
    }
}
