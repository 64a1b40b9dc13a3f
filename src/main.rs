// ABOUTME: Entry point for the v3push CLI application.
// ABOUTME: Parses arguments and dispatches to appropriate command handlers.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use std::env;
use tracing_subscriber::EnvFilter;
use v3push::error::Result;
use v3push::output::{Output, OutputMode};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(cli.verbose))
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
    let output = Output::new(mode);

    if let Err(e) = run(cli.command, output.clone()).await {
        output.error(&e.to_string());
        std::process::exit(1);
    }
}

/// Request logging is only visible with --verbose, and only for this crate.
fn log_filter(verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new("v3push=debug")
    } else {
        EnvFilter::new("warn")
    }
}

async fn run(command: Commands, output: Output) -> Result<()> {
    let cwd = env::current_dir()?;

    match command {
        Commands::Push(args) => commands::push(args, &cwd, output).await,
        Commands::Logs {
            app_name,
            space_guid,
        } => commands::logs(&app_name, space_guid, output).await,
        Commands::Init { force } => commands::init(&cwd, force, &output),
    }
}
