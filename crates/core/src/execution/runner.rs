//! High-level task runner
//!
//! This module sequences the steps of each site task. Tasks call each other the
//! same way they depend on each other: `rebuild` and `dev` start with `clean`,
//! `publish` starts with a cleaning `build`.

use std::fmt;
use std::path::Path;

use crate::configs::site::SiteConfig;
use crate::execution::command::{Invocation, StepExecutor};
use crate::types::{SiteError, SiteResult};

/// Value of the mode environment variable handed to the generator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Development,
    Production,
}

impl Mode {
    pub fn from_debug(debug: bool) -> Self {
        if debug {
            Mode::Development
        } else {
            Mode::Production
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Development => "development",
            Mode::Production => "production",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters of the build task
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildOptions {
    /// Build in development mode instead of production
    pub debug: bool,
    /// Clean the output directory first
    pub clean: bool,
}

/// Runs site tasks against a step executor
pub struct TaskRunner<'a, E: StepExecutor> {
    config: &'a SiteConfig,
    executor: &'a mut E,
}

impl<'a, E: StepExecutor> TaskRunner<'a, E> {
    pub fn new(config: &'a SiteConfig, executor: &'a mut E) -> Self {
        Self { config, executor }
    }

    /// Delete and recreate the output directory. Nothing happens when it is missing.
    pub fn clean(&mut self) -> SiteResult<()> {
        let output_dir = self.config.output_dir.as_path();
        if !self.config.output_dir_below_root() {
            return Err(SiteError::Task(format!(
                "Refusing to clean '{}', it is not a directory below the site root",
                output_dir.display()
            )));
        }
        if !self.executor.dir_exists(output_dir) {
            tracing::debug!(path = %output_dir.display(), "output directory missing, nothing to clean");
            return Ok(());
        }

        self.executor.remove_dir_all(output_dir)?;
        self.executor.create_dir(output_dir)?;
        Ok(())
    }

    /// Run the generator once
    pub fn build(&mut self, options: BuildOptions) -> SiteResult<()> {
        if options.clean {
            self.clean()?;
        }

        let invocation = self
            .generator(Mode::from_debug(options.debug))
            .arg("-o")
            .arg(path_arg(&self.config.output_dir))
            .arg("-s")
            .arg(path_arg(&self.config.settings_file));
        self.executor.run(&invocation)
    }

    /// Clean, then build with default options
    pub fn rebuild(&mut self) -> SiteResult<()> {
        self.clean()?;
        self.build(BuildOptions::default())
    }

    /// Clean, then regenerate on every change until interrupted
    pub fn dev(&mut self) -> SiteResult<()> {
        self.clean()?;

        let mut invocation = self
            .generator(Mode::Development)
            .args(["-r", "--debug"]);
        // The settings file decides the output path unless it was configured here
        if !self.config.has_default_output_dir() {
            invocation = invocation
                .arg("-o")
                .arg(path_arg(&self.config.output_dir));
        }
        let invocation = invocation
            .arg("-s")
            .arg(path_arg(&self.config.settings_file));
        self.executor.run(&invocation)
    }

    /// Serve the output directory over HTTP until interrupted.
    ///
    /// `port` falls back to the configured default port.
    pub fn serve(&mut self, port: Option<u16>) -> SiteResult<()> {
        let output_dir = self.config.output_dir.as_path();
        if !self.executor.dir_exists(output_dir) {
            return Err(SiteError::Task(format!(
                "Output directory '{}' does not exist, run build first",
                output_dir.display()
            )));
        }

        let port = port.unwrap_or(self.config.serve.default_port);
        let invocation = Invocation::new(&self.config.serve.program)
            .args(self.config.serve.args.iter().cloned())
            .arg(port.to_string())
            .current_dir(output_dir);
        self.executor.run(&invocation)
    }

    /// Clean build, import the output onto the publish branch, push it
    pub fn publish(&mut self) -> SiteResult<()> {
        self.build(BuildOptions {
            debug: false,
            clean: true,
        })?;

        let publish = &self.config.publish;
        let import = Invocation::new(&publish.import_program)
            .arg(path_arg(&self.config.output_dir));
        self.executor.run(&import)?;

        let push = Invocation::new("git")
            .arg("push")
            .arg(&publish.repository)
            .arg(self.config.publish_refspec());
        self.executor.run(&push)
    }

    fn generator(&self, mode: Mode) -> Invocation {
        tracing::debug!(%mode, program = %self.config.generator.program, "generator invocation");
        Invocation::new(&self.config.generator.program)
            .env(&self.config.generator.mode_env_var, mode.as_str())
    }
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::execution::command::{DryRunExecutor, Step};

    /// Applies filesystem steps for real and records everything, processes included
    struct RecordingExecutor {
        root: PathBuf,
        steps: Vec<Step>,
        fail_program: Option<String>,
    }

    impl RecordingExecutor {
        fn new(root: &Path) -> Self {
            Self {
                root: root.to_path_buf(),
                steps: Vec::new(),
                fail_program: None,
            }
        }

        fn programs(&self) -> Vec<String> {
            self.steps
                .iter()
                .map(|step| match step {
                    Step::RemoveDir(_) => "rm".to_string(),
                    Step::CreateDir(_) => "mkdir".to_string(),
                    Step::Run(invocation) => invocation.program.clone(),
                })
                .collect()
        }

        fn invocations(&self) -> Vec<&Invocation> {
            self.steps
                .iter()
                .filter_map(|step| match step {
                    Step::Run(invocation) => Some(invocation),
                    _ => None,
                })
                .collect()
        }
    }

    impl StepExecutor for RecordingExecutor {
        fn remove_dir_all(&mut self, path: &Path) -> SiteResult<()> {
            self.steps.push(Step::RemoveDir(path.to_path_buf()));
            std::fs::remove_dir_all(self.root.join(path))?;
            Ok(())
        }

        fn create_dir(&mut self, path: &Path) -> SiteResult<()> {
            self.steps.push(Step::CreateDir(path.to_path_buf()));
            std::fs::create_dir(self.root.join(path))?;
            Ok(())
        }

        fn run(&mut self, invocation: &Invocation) -> SiteResult<()> {
            self.steps.push(Step::Run(invocation.clone()));
            if self.fail_program.as_deref() == Some(invocation.program.as_str()) {
                return Err(SiteError::CommandFailed {
                    command: invocation.to_string(),
                    code: Some(2),
                });
            }
            Ok(())
        }

        fn dir_exists(&self, path: &Path) -> bool {
            self.root.join(path).is_dir()
        }
    }

    fn site_with_stale_output() -> tempfile::TempDir {
        let temp_dir = tempfile::tempdir().unwrap();
        let output = temp_dir.path().join("output");
        std::fs::create_dir_all(output.join("posts")).unwrap();
        std::fs::write(output.join("index.html"), "stale").unwrap();
        std::fs::write(output.join("posts/old.html"), "stale").unwrap();
        temp_dir
    }

    fn is_empty_dir(path: &Path) -> bool {
        path.is_dir() && std::fs::read_dir(path).unwrap().next().is_none()
    }

    #[test]
    fn test_clean_empties_existing_output() {
        let site = site_with_stale_output();
        let config = SiteConfig::default();
        let mut executor = RecordingExecutor::new(site.path());

        TaskRunner::new(&config, &mut executor).clean().unwrap();

        assert!(is_empty_dir(&site.path().join("output")));
        assert_eq!(executor.programs(), vec!["rm", "mkdir"]);
    }

    #[test]
    fn test_clean_is_idempotent() {
        let site = site_with_stale_output();
        let config = SiteConfig::default();
        let mut executor = RecordingExecutor::new(site.path());

        let mut runner = TaskRunner::new(&config, &mut executor);
        runner.clean().unwrap();
        runner.clean().unwrap();

        assert!(is_empty_dir(&site.path().join("output")));
    }

    #[test]
    fn test_clean_without_output_is_noop() {
        let site = tempfile::tempdir().unwrap();
        let config = SiteConfig::default();
        let mut executor = RecordingExecutor::new(site.path());

        TaskRunner::new(&config, &mut executor).clean().unwrap();

        assert!(executor.steps.is_empty());
        assert!(!site.path().join("output").exists());
    }

    #[test]
    fn test_build_sets_mode_from_debug_flag() {
        let site = tempfile::tempdir().unwrap();
        let config = SiteConfig::default();
        let mut executor = RecordingExecutor::new(site.path());

        let mut runner = TaskRunner::new(&config, &mut executor);
        runner.build(BuildOptions::default()).unwrap();
        runner
            .build(BuildOptions {
                debug: true,
                clean: false,
            })
            .unwrap();

        let invocations = executor.invocations();
        assert_eq!(invocations[0].env_value("NODE_ENV"), Some("production"));
        assert_eq!(invocations[1].env_value("NODE_ENV"), Some("development"));
        assert_eq!(
            invocations[0].to_string(),
            "NODE_ENV=production pelican -o output -s pelicanconf.py"
        );
    }

    #[test]
    fn test_build_without_clean_keeps_existing_output() {
        let site = site_with_stale_output();
        let config = SiteConfig::default();
        let mut executor = RecordingExecutor::new(site.path());

        TaskRunner::new(&config, &mut executor)
            .build(BuildOptions::default())
            .unwrap();

        assert!(site.path().join("output/index.html").exists());
        assert_eq!(executor.programs(), vec!["pelican"]);
    }

    #[test]
    fn test_build_with_clean_cleans_first() {
        let site = site_with_stale_output();
        let config = SiteConfig::default();
        let mut executor = RecordingExecutor::new(site.path());

        TaskRunner::new(&config, &mut executor)
            .build(BuildOptions {
                debug: false,
                clean: true,
            })
            .unwrap();

        assert!(is_empty_dir(&site.path().join("output")));
        assert_eq!(executor.programs(), vec!["rm", "mkdir", "pelican"]);
    }

    #[test]
    fn test_rebuild_cleans_then_builds() {
        let site = site_with_stale_output();
        let config = SiteConfig::default();
        let mut executor = RecordingExecutor::new(site.path());

        TaskRunner::new(&config, &mut executor).rebuild().unwrap();

        assert_eq!(executor.programs(), vec!["rm", "mkdir", "pelican"]);
        assert_eq!(
            executor.invocations()[0].env_value("NODE_ENV"),
            Some("production")
        );
    }

    #[test]
    fn test_dev_watches_in_development_mode() {
        let site = site_with_stale_output();
        let config = SiteConfig::default();
        let mut executor = RecordingExecutor::new(site.path());

        TaskRunner::new(&config, &mut executor).dev().unwrap();

        assert_eq!(executor.programs(), vec!["rm", "mkdir", "pelican"]);
        let watch = executor.invocations()[0];
        assert_eq!(
            watch.to_string(),
            "NODE_ENV=development pelican -r --debug -s pelicanconf.py"
        );
    }

    #[test]
    fn test_dev_passes_configured_output_dir() {
        let site = tempfile::tempdir().unwrap();
        let config = crate::configs::site::parse_site_config("outputDir: public\n").unwrap();
        let mut executor = RecordingExecutor::new(site.path());

        TaskRunner::new(&config, &mut executor).dev().unwrap();

        assert_eq!(
            executor.invocations()[0].to_string(),
            "NODE_ENV=development pelican -r --debug -o public -s pelicanconf.py"
        );
    }

    #[test]
    fn test_clean_refuses_site_root_as_output() {
        let site = tempfile::tempdir().unwrap();
        std::fs::write(site.path().join("pelicanconf.py"), "AUTHOR = 'me'").unwrap();
        std::fs::create_dir(site.path().join("content")).unwrap();

        for root_alias in [".", "./"] {
            let config = SiteConfig {
                output_dir: PathBuf::from(root_alias),
                ..SiteConfig::default()
            };
            let mut executor = RecordingExecutor::new(site.path());

            let err = TaskRunner::new(&config, &mut executor)
                .rebuild()
                .unwrap_err();

            assert!(err.to_string().contains("Refusing to clean"));
            assert!(executor.steps.is_empty());
        }
        assert!(site.path().join("pelicanconf.py").exists());
        assert!(site.path().join("content").is_dir());
    }

    #[test]
    fn test_serve_uses_port_and_output_dir() {
        let site = site_with_stale_output();
        let config = SiteConfig::default();
        let mut executor = RecordingExecutor::new(site.path());

        let mut runner = TaskRunner::new(&config, &mut executor);
        runner.serve(None).unwrap();
        runner.serve(Some(8080)).unwrap();

        let invocations = executor.invocations();
        assert_eq!(
            invocations[0].to_string(),
            "cd output && python -m pelican.server 1234"
        );
        assert_eq!(invocations[1].args.last().map(String::as_str), Some("8080"));
        assert_eq!(invocations[1].current_dir, Some(PathBuf::from("output")));
    }

    #[test]
    fn test_serve_requires_output_dir() {
        let site = tempfile::tempdir().unwrap();
        let config = SiteConfig::default();
        let mut executor = RecordingExecutor::new(site.path());

        let err = TaskRunner::new(&config, &mut executor)
            .serve(None)
            .unwrap_err();

        assert!(err.to_string().contains("does not exist"));
        assert!(executor.steps.is_empty());
    }

    #[test]
    fn test_publish_clean_builds_then_imports_and_pushes() {
        let site = site_with_stale_output();
        let config = SiteConfig::default();
        let mut executor = RecordingExecutor::new(site.path());

        TaskRunner::new(&config, &mut executor).publish().unwrap();

        assert_eq!(
            executor.programs(),
            vec!["rm", "mkdir", "pelican", "ghp-import", "git"]
        );
        let invocations = executor.invocations();
        assert_eq!(invocations[0].env_value("NODE_ENV"), Some("production"));
        assert_eq!(invocations[1].to_string(), "ghp-import output");
        assert_eq!(
            invocations[2].to_string(),
            "git push https://github.com/sloria/sloria.github.io.git gh-pages:master"
        );
    }

    #[test]
    fn test_publish_aborts_when_build_fails() {
        let site = tempfile::tempdir().unwrap();
        let config = SiteConfig::default();
        let mut executor = RecordingExecutor::new(site.path());
        executor.fail_program = Some("pelican".to_string());

        let err = TaskRunner::new(&config, &mut executor)
            .publish()
            .unwrap_err();

        assert_eq!(err.exit_code(), 2);
        assert_eq!(executor.programs(), vec!["pelican"]);
    }

    #[test]
    fn test_custom_config_flows_into_commands() {
        let site = tempfile::tempdir().unwrap();
        let config = crate::configs::site::parse_site_config(
            "outputDir: public\nsettingsFile: publishconf.py\ngenerator:\n  modeEnvVar: SITE_ENV\npublish:\n  remoteBranch: main\n",
        )
        .unwrap();
        let mut executor = DryRunExecutor::new(site.path()).quiet();

        TaskRunner::new(&config, &mut executor).publish().unwrap();

        let lines: Vec<String> = executor.steps().iter().map(ToString::to_string).collect();
        assert_eq!(
            lines,
            vec![
                "SITE_ENV=production pelican -o public -s publishconf.py".to_string(),
                "ghp-import public".to_string(),
                "git push https://github.com/sloria/sloria.github.io.git gh-pages:main".to_string(),
            ]
        );
    }
}
