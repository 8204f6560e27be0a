//! Task table
//!
//! Maps task names to the [`TaskRunner`] operation that implements them.

use std::fmt;

use crate::configs::site::SiteConfig;
use crate::execution::command::StepExecutor;
use crate::execution::runner::{BuildOptions, TaskRunner};
use crate::types::SiteResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Task {
    Clean,
    Build,
    Rebuild,
    Dev,
    Serve,
    Publish,
}

impl Task {
    pub const ALL: [Task; 6] = [
        Task::Clean,
        Task::Build,
        Task::Rebuild,
        Task::Dev,
        Task::Serve,
        Task::Publish,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Task::Clean => "clean",
            Task::Build => "build",
            Task::Rebuild => "rebuild",
            Task::Dev => "dev",
            Task::Serve => "serve",
            Task::Publish => "publish",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Task::Clean => "Remove and recreate the output directory",
            Task::Build => "Generate the site once",
            Task::Rebuild => "Clean, then build",
            Task::Dev => "Clean, then regenerate on every change",
            Task::Serve => "Serve the output directory over HTTP",
            Task::Publish => "Clean build, import to the publish branch and push it",
        }
    }

    /// Tasks this one runs before its own steps
    pub fn dependencies(&self) -> &'static [Task] {
        match self {
            Task::Clean | Task::Serve => &[],
            Task::Build => &[Task::Clean],
            Task::Rebuild => &[Task::Clean, Task::Build],
            Task::Dev => &[Task::Clean],
            Task::Publish => &[Task::Build],
        }
    }

    /// Whether the task keeps running until interrupted
    pub fn is_long_running(&self) -> bool {
        matches!(self, Task::Dev | Task::Serve)
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A task together with its parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskRequest {
    Clean,
    Build(BuildOptions),
    Rebuild,
    Dev,
    Serve { port: Option<u16> },
    Publish,
}

impl TaskRequest {
    pub fn task(&self) -> Task {
        match self {
            TaskRequest::Clean => Task::Clean,
            TaskRequest::Build(_) => Task::Build,
            TaskRequest::Rebuild => Task::Rebuild,
            TaskRequest::Dev => Task::Dev,
            TaskRequest::Serve { .. } => Task::Serve,
            TaskRequest::Publish => Task::Publish,
        }
    }
}

/// Request for a task with default parameters
impl From<Task> for TaskRequest {
    fn from(task: Task) -> Self {
        match task {
            Task::Clean => TaskRequest::Clean,
            Task::Build => TaskRequest::Build(BuildOptions::default()),
            Task::Rebuild => TaskRequest::Rebuild,
            Task::Dev => TaskRequest::Dev,
            Task::Serve => TaskRequest::Serve { port: None },
            Task::Publish => TaskRequest::Publish,
        }
    }
}

/// Run a task request with the given executor
pub fn run_task<E: StepExecutor>(
    request: TaskRequest,
    config: &SiteConfig,
    executor: &mut E,
) -> SiteResult<()> {
    tracing::info!(task = %request.task(), "running task");
    let mut runner = TaskRunner::new(config, executor);
    match request {
        TaskRequest::Clean => runner.clean(),
        TaskRequest::Build(options) => runner.build(options),
        TaskRequest::Rebuild => runner.rebuild(),
        TaskRequest::Dev => runner.dev(),
        TaskRequest::Serve { port } => runner.serve(port),
        TaskRequest::Publish => runner.publish(),
    }
}
