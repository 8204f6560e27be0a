use anyhow::{Context, Result};
use colored::*;
use sitekit_core::configs::site::site_config_schema;
use sitekit_core::site_manager::SiteManager;

/// Print the configuration the tasks will run with
pub fn show(manager: &SiteManager) -> Result<()> {
    let yaml = serde_yaml::to_string(manager.config())
        .context("Failed to render site configuration")?;

    println!(
        "{} {}",
        "# site root:".dimmed(),
        manager.site_root().display().to_string().dimmed()
    );
    print!("{}", yaml);
    Ok(())
}

pub fn schema() -> Result<()> {
    let schema = site_config_schema().context("Failed to build config schema")?;
    println!("{}", schema);
    Ok(())
}
