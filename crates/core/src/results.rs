//! Result types for site manager operations

use crate::tasks::Task;

/// Information about a single task for listings
#[derive(Debug, Clone)]
pub struct TaskInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub dependencies: Vec<&'static str>,
    pub long_running: bool,
}

/// Result of listing the available tasks
#[derive(Debug)]
pub struct TaskListResult {
    pub tasks: Vec<TaskInfo>,
}

impl From<Task> for TaskInfo {
    fn from(task: Task) -> Self {
        Self {
            name: task.name(),
            description: task.description(),
            dependencies: task.dependencies().iter().map(Task::name).collect(),
            long_running: task.is_long_running(),
        }
    }
}
