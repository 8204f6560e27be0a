use anyhow::{Context, Result};
use colored::*;
use sitekit_core::execution::{DryRunExecutor, ProcessExecutor};
use sitekit_core::site_manager::SiteManager;
use sitekit_core::tasks::TaskRequest;

/// Notice printed before a foreground task takes over the terminal
fn foreground_notice(manager: &SiteManager, request: TaskRequest) -> Option<String> {
    match request {
        TaskRequest::Dev => Some("Watching for changes, press Ctrl-C to stop".to_string()),
        TaskRequest::Serve { port } => Some(format!(
            "Serving on http://localhost:{}, press Ctrl-C to stop",
            port.unwrap_or(manager.config().serve.default_port)
        )),
        _ => None,
    }
}

pub fn execute(manager: &SiteManager, request: TaskRequest, dry_run: bool) -> Result<()> {
    let task = request.task();
    println!("{} {}", "Running task".bold(), task.name().cyan());
    println!();

    if dry_run {
        let mut executor = DryRunExecutor::new(manager.site_root());
        manager
            .run_task(request, &mut executor)
            .with_context(|| format!("Failed to plan task '{}'", task))?;

        println!();
        println!(
            "{} {}",
            "✓".green().bold(),
            format!("{} step(s) planned, nothing was run", executor.steps().len()).green()
        );
        return Ok(());
    }

    if let Some(notice) = foreground_notice(manager, request) {
        println!("{}", notice.bright_black());
    }

    let mut executor = ProcessExecutor::new(manager.site_root());
    manager
        .run_task(request, &mut executor)
        .with_context(|| format!("Failed to run task '{}'", task))?;

    println!();
    println!(
        "{} {}",
        "✓".green().bold(),
        format!("Task '{}' completed successfully!", task).green().bold()
    );

    Ok(())
}
