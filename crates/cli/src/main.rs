use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use sitekit_core::execution::BuildOptions;
use sitekit_core::site_manager::{SiteManager, SiteManagerConfig};
use sitekit_core::tasks::TaskRequest;
use sitekit_core::SiteError;
use tracing_subscriber::EnvFilter;

mod commands;

/// sitekit - Task shortcuts for a Pelican static site
#[derive(Parser)]
#[command(name = "sitekit")]
#[command(about = "Build, serve and publish a static site")]
#[command(version)]
struct Cli {
    /// Path to the site root (defaults to current directory)
    #[arg(short, long, global = true, default_value = ".")]
    root: PathBuf,

    /// Config file to use instead of sitekit.yml in the site root
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Print the steps a task would perform without running them
    #[arg(long, global = true)]
    dry_run: bool,

    /// Enable debug logging (overridden by SITEKIT_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Remove and recreate the output directory
    Clean,
    /// Generate the site once
    Build {
        /// Build in development mode
        #[arg(long)]
        debug: bool,
        /// Clean the output directory first
        #[arg(long)]
        clean: bool,
    },
    /// Clean, then build
    Rebuild,
    /// Clean, then regenerate on every change
    Dev,
    /// Serve the output directory over HTTP
    Serve {
        /// Port to listen on (defaults to serve.defaultPort, 1234)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Clean build, import to the publish branch and push it
    Publish,
    /// List available tasks
    List,
    /// Print the resolved configuration
    Config,
    /// Print the JSON Schema of sitekit.yml
    Schema,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {:#}", "✗".red().bold(), err);
            ExitCode::from(exit_code(&err))
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let Cli {
        root,
        config,
        dry_run,
        command,
        ..
    } = cli;
    let load = || {
        SiteManager::new(SiteManagerConfig {
            site_root: root.clone(),
            config_path: config.clone(),
        })
        .context("Failed to load site")
    };
    let run_task = |request: TaskRequest| -> Result<()> {
        let manager = load()?;
        commands::run::execute(&manager, request, dry_run)
    };

    match command {
        Commands::Clean => run_task(TaskRequest::Clean),
        Commands::Build { debug, clean } => {
            run_task(TaskRequest::Build(BuildOptions { debug, clean }))
        }
        Commands::Rebuild => run_task(TaskRequest::Rebuild),
        Commands::Dev => run_task(TaskRequest::Dev),
        Commands::Serve { port } => run_task(TaskRequest::Serve { port }),
        Commands::Publish => run_task(TaskRequest::Publish),
        Commands::List => commands::list::execute(&load()?),
        Commands::Config => commands::config::show(&load()?),
        Commands::Schema => commands::config::schema(),
    }
}

/// Exit code of the failed external command when there is one
fn exit_code(err: &anyhow::Error) -> u8 {
    let code = err
        .chain()
        .find_map(|cause| cause.downcast_ref::<SiteError>())
        .map(SiteError::exit_code)
        .unwrap_or(1);
    u8::try_from(code).ok().filter(|c| *c != 0).unwrap_or(1)
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("SITEKIT_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
