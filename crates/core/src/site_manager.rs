//! High-level site management interface
//!
//! This module provides the [`SiteManager`] which serves as the primary interface
//! for the command line. It loads the site configuration once and runs tasks
//! against it.
//!
//! ## Example
//!
//! ```rust,no_run
//! use sitekit_core::execution::ProcessExecutor;
//! use sitekit_core::site_manager::{SiteManager, SiteManagerConfig};
//! use sitekit_core::tasks::Task;
//! use std::path::PathBuf;
//!
//! # fn example() -> sitekit_core::types::SiteResult<()> {
//! let manager = SiteManager::new(SiteManagerConfig {
//!     site_root: PathBuf::from("."),
//!     config_path: None,
//! })?;
//!
//! let mut executor = ProcessExecutor::new(manager.site_root());
//! manager.run_task(Task::Rebuild.into(), &mut executor)?;
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use crate::configs::site::{load_site_config, SiteConfig};
use crate::execution::command::StepExecutor;
use crate::results::{TaskInfo, TaskListResult};
use crate::tasks::{run_task, Task, TaskRequest};
use crate::types::{SiteError, SiteResult};

/// High-level manager that owns the site configuration
pub struct SiteManager {
    site_root: PathBuf,
    config: SiteConfig,
}

/// Configuration for initializing a site manager
pub struct SiteManagerConfig {
    pub site_root: PathBuf,
    /// Explicit config file, relative paths resolve against `site_root`
    pub config_path: Option<PathBuf>,
}

impl SiteManager {
    pub fn new(config: SiteManagerConfig) -> SiteResult<Self> {
        if !config.site_root.is_dir() {
            return Err(SiteError::Config(format!(
                "Site root {} is not a directory",
                config.site_root.display()
            )));
        }

        let site_config = load_site_config(&config.site_root, config.config_path.as_deref())?;

        Ok(Self {
            site_root: config.site_root,
            config: site_config,
        })
    }

    pub fn site_root(&self) -> &Path {
        &self.site_root
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn list_tasks(&self) -> TaskListResult {
        TaskListResult {
            tasks: Task::ALL.into_iter().map(TaskInfo::from).collect(),
        }
    }

    pub fn run_task<E: StepExecutor>(
        &self,
        request: TaskRequest,
        executor: &mut E,
    ) -> SiteResult<()> {
        run_task(request, &self.config, executor)
    }
}
