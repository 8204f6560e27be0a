//! Task execution module
//!
//! This module handles the actual execution of site tasks: the steps they issue
//! and the executors that carry those steps out.

pub mod command;
pub mod runner;

pub use command::{DryRunExecutor, Invocation, ProcessExecutor, Step, StepExecutor};
pub use runner::{BuildOptions, Mode, TaskRunner};
