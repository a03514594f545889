// ABOUTME: Entry point for the railyard CLI application.
// ABOUTME: Parses arguments, dispatches commands, and reports failure exactly once.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use railyard::config::{self, FileConfig, Settings};
use railyard::error::Result;
use railyard::output::{HostOutputs, Output, OutputMode};
use std::env;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins; otherwise --verbose picks debug.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("railyard=debug")
        } else {
            EnvFilter::new("warn")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let mode = if cli.json {
        OutputMode::Json
    } else if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::Normal
    };
    let host = HostOutputs::from_env();

    if let Err(e) = run(cli, &host, mode).await {
        Output::new(mode).error(&e.to_string());
        host.fail(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(cli: Cli, host: &HostOutputs, mode: OutputMode) -> Result<()> {
    let cwd = env::current_dir()?;
    match cli.command {
        Commands::Init { force } => {
            config::init_config(&cwd, force)?;
            Output::new(mode).success(&format!("Wrote {}", config::CONFIG_FILENAME));
            Ok(())
        }
        Commands::Promote(args) => {
            let file = match &args.config {
                Some(path) => FileConfig::load(path)?,
                None => FileConfig::discover(&cwd)?,
            };
            let settings = Settings::build(&args.inputs(), &file)?;
            commands::promote(settings, host, Output::new(mode)).await
        }
    }
}
