//! Step execution
//!
//! Every task boils down to a sequence of [`Step`]s: filesystem mutations on the
//! output directory and external process invocations. A [`StepExecutor`] carries
//! them out. [`ProcessExecutor`] does the real work, [`DryRunExecutor`] only
//! reports what would happen.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

use colored::*;

use crate::types::{SiteError, SiteResult};

/// A single external process invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    /// Extra environment variables, in the order they were added
    pub env: Vec<(String, String)>,
    /// Working directory. `None` means the site root.
    pub current_dir: Option<PathBuf>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: Vec::new(),
            current_dir: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    /// Value of an environment variable set on this invocation
    pub fn env_value(&self, key: &str) -> Option<&str> {
        self.env
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Renders the invocation as a shell line, e.g. `NODE_ENV=production pelican -o output`
impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(dir) = &self.current_dir {
            write!(f, "cd {} && ", dir.display())?;
        }
        for (key, value) in &self.env {
            write!(f, "{}={} ", key, value)?;
        }
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// One unit of work performed by a task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    RemoveDir(PathBuf),
    CreateDir(PathBuf),
    Run(Invocation),
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::RemoveDir(path) => write!(f, "rm -rf {}", path.display()),
            Step::CreateDir(path) => write!(f, "mkdir {}", path.display()),
            Step::Run(invocation) => fmt::Display::fmt(invocation, f),
        }
    }
}

/// Carries out the steps issued by the task runner.
///
/// Paths handed to the executor are relative to the site root.
pub trait StepExecutor {
    fn remove_dir_all(&mut self, path: &Path) -> SiteResult<()>;

    fn create_dir(&mut self, path: &Path) -> SiteResult<()>;

    /// Run an external process to completion. A non-zero exit is an error.
    fn run(&mut self, invocation: &Invocation) -> SiteResult<()>;

    /// Whether a directory exists, relative to the site root
    fn dir_exists(&self, path: &Path) -> bool;
}

/// Executor that touches the filesystem and spawns real processes
pub struct ProcessExecutor {
    site_root: PathBuf,
    echo: bool,
}

impl ProcessExecutor {
    pub fn new(site_root: impl Into<PathBuf>) -> Self {
        Self {
            site_root: site_root.into(),
            echo: true,
        }
    }

    /// Toggle printing each step before it runs
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    fn echo(&self, step: &Step) {
        if self.echo {
            println!("{}", step.to_string().bright_black());
        }
    }
}

impl StepExecutor for ProcessExecutor {
    fn remove_dir_all(&mut self, path: &Path) -> SiteResult<()> {
        self.echo(&Step::RemoveDir(path.to_path_buf()));
        tracing::debug!(path = %path.display(), "removing directory");
        std::fs::remove_dir_all(self.site_root.join(path))?;
        Ok(())
    }

    fn create_dir(&mut self, path: &Path) -> SiteResult<()> {
        self.echo(&Step::CreateDir(path.to_path_buf()));
        tracing::debug!(path = %path.display(), "creating directory");
        std::fs::create_dir(self.site_root.join(path))?;
        Ok(())
    }

    fn run(&mut self, invocation: &Invocation) -> SiteResult<()> {
        self.echo(&Step::Run(invocation.clone()));

        let working_dir = match &invocation.current_dir {
            Some(dir) => self.site_root.join(dir),
            None => self.site_root.clone(),
        };

        let mut command = Command::new(&invocation.program);
        command.args(&invocation.args).current_dir(&working_dir);
        for (key, value) in &invocation.env {
            command.env(key, value);
        }

        tracing::debug!(
            command = %invocation,
            cwd = %working_dir.display(),
            "spawning process"
        );

        // Blocks until the child exits, for dev and serve that is an interrupt
        let status = command.status().map_err(|source| SiteError::Spawn {
            command: invocation.to_string(),
            source,
        })?;

        if !status.success() {
            return Err(SiteError::CommandFailed {
                command: invocation.to_string(),
                code: status.code(),
            });
        }

        Ok(())
    }

    fn dir_exists(&self, path: &Path) -> bool {
        self.site_root.join(path).is_dir()
    }
}

/// Executor that prints and records steps without performing them
#[derive(Debug)]
pub struct DryRunExecutor {
    site_root: PathBuf,
    quiet: bool,
    steps: Vec<Step>,
}

impl DryRunExecutor {
    pub fn new(site_root: impl Into<PathBuf>) -> Self {
        Self {
            site_root: site_root.into(),
            quiet: false,
            steps: Vec::new(),
        }
    }

    /// Record only, print nothing
    pub fn quiet(mut self) -> Self {
        self.quiet = true;
        self
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    fn record(&mut self, step: Step) {
        if !self.quiet {
            println!("{} {}", "[dry-run]".yellow(), step);
        }
        self.steps.push(step);
    }
}

impl StepExecutor for DryRunExecutor {
    fn remove_dir_all(&mut self, path: &Path) -> SiteResult<()> {
        self.record(Step::RemoveDir(path.to_path_buf()));
        Ok(())
    }

    fn create_dir(&mut self, path: &Path) -> SiteResult<()> {
        self.record(Step::CreateDir(path.to_path_buf()));
        Ok(())
    }

    fn run(&mut self, invocation: &Invocation) -> SiteResult<()> {
        self.record(Step::Run(invocation.clone()));
        Ok(())
    }

    fn dir_exists(&self, path: &Path) -> bool {
        self.site_root.join(path).is_dir()
    }
}
