//! sitekit Core Library
//!
//! This is the core library for the sitekit task runner, a small wrapper around an
//! external static site generator. It provides the task definitions, their step
//! sequencing and the executors that run those steps.
//!
//! ## Architecture
//!
//! - [`site_manager`] - High-level interface used by the command line
//! - [`tasks`] - Task table mapping task names to runner operations
//! - [`execution`] - Task runner, steps and step executors
//! - [`configs`] - `sitekit.yml` parsing and defaults
//! - [`results`] - Result types for listings
//! - [`types`] - Common error types and type aliases
//!
//! ## Usage
//!
//! ```rust,no_run
//! use sitekit_core::execution::DryRunExecutor;
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
//! let mut executor = DryRunExecutor::new(manager.site_root());
//! manager.run_task(Task::Publish.into(), &mut executor)?;
//! # Ok(())
//! # }
//! ```

pub mod configs;
pub mod execution;
pub mod results;
pub mod site_manager;
pub mod tasks;
pub mod types;

// Re-export the main types for easier usage
pub use site_manager::{SiteManager, SiteManagerConfig};
pub use types::{SiteError, SiteResult};
