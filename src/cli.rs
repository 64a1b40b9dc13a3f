// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "v3push")]
#[command(about = "Push applications through the v3 build and staging lifecycle")]
#[command(version)]
pub struct Cli {
    /// Log every API request (method, path and body)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print the final result
    #[arg(long, global = true, conflicts_with = "json")]
    pub quiet: bool,

    /// Print JSON lines instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create, stage, route and start an application
    Push(PushArgs),

    /// Stream an application's logs until interrupted
    Logs {
        /// Application name
        app_name: String,

        /// Space GUID (defaults to the targeted space)
        #[arg(long)]
        space_guid: Option<String>,
    },

    /// Write a v3push.yml settings template
    Init {
        /// Overwrite an existing v3push.yml
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Args)]
pub struct PushArgs {
    /// Application name; also used as the route host
    pub app_name: String,

    /// Application directory or zip file to upload
    #[arg(short = 'p', long, default_value = ".")]
    pub path: PathBuf,

    /// Buildpack to stage with (repeatable, applied in order)
    #[arg(short = 'b', long = "buildpack", conflicts_with = "docker_image")]
    pub buildpacks: Vec<String>,

    /// Docker image to run instead of uploading bits
    #[arg(long)]
    pub docker_image: Option<String>,

    /// Space GUID (defaults to the targeted space)
    #[arg(long)]
    pub space_guid: Option<String>,

    /// Do not stream application logs while pushing
    #[arg(long)]
    pub no_logs: bool,
}
