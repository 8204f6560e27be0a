use anyhow::Result;
use colored::*;
use sitekit_core::site_manager::SiteManager;

pub fn execute(manager: &SiteManager) -> Result<()> {
    let result = manager.list_tasks();

    println!("{}", "Tasks".bold().underline());

    let width = result
        .tasks
        .iter()
        .map(|task| task.name.len())
        .max()
        .unwrap_or(0);

    for task in &result.tasks {
        let mut line = format!(
            "  {}  {}",
            format!("{:<width$}", task.name, width = width).cyan().bold(),
            task.description
        );
        if !task.dependencies.is_empty() {
            line.push_str(&format!(
                " {}",
                format!("(after {})", task.dependencies.join(", ")).dimmed()
            ));
        }
        if task.long_running {
            line.push_str(&format!(" {}", "[foreground]".yellow()));
        }
        println!("{}", line);
    }

    Ok(())
}
