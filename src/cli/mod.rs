//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod graph;
mod init;
mod targets;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use crate::build::{AssetFamily, BuildContext, BuildMode};
use crate::config::{
    default_config, find_config, load_config, merge_cli_overrides, project_root, CliOverrides,
};

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// Sitegraph - discover site entries and emit the build graph for a bundler
#[derive(Parser)]
#[command(name = "sitegraph")]
#[command(about = "Sitegraph - discover site entries and emit a build graph")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by commands that load a project.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ProjectArgs {
    /// Path to site.toml (default: search upward from the current directory)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override source directory
    #[arg(long)]
    pub src: Option<PathBuf>,

    /// Override output directory
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Build mode; defaults to the configured environment variable
    #[arg(short, long)]
    pub mode: Option<BuildMode>,

    /// Environment variable that selects the build mode (default: NODE_ENV)
    #[arg(long)]
    pub mode_env: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Discover entries and print the build graph as JSON
    Graph {
        #[command(flatten)]
        project: ProjectArgs,

        /// Write the graph to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Emit compact JSON
        #[arg(long)]
        compact: bool,

        /// Keep only matching artifacts (e.g. "template:index", "script", "*:about")
        #[arg(short, long)]
        filter: Vec<String>,
    },

    /// List discovered entries per asset family
    Targets {
        #[command(flatten)]
        project: ProjectArgs,

        /// Only list one family (template, stylesheet, script)
        #[arg(long)]
        family: Option<AssetFamily>,
    },

    /// Write a starter site.toml
    Init {
        /// Directory to initialize (default: current directory)
        path: Option<PathBuf>,

        /// Project name (default: directory name)
        #[arg(long)]
        name: Option<String>,
    },
}

/// Install the tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise `--verbose` selects debug output.
fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "sitegraph=debug" } else { "sitegraph=warn" })
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .try_init();
}

/// Load config, apply overrides, and create the build context.
pub(crate) fn load_context(args: &ProjectArgs) -> Result<BuildContext, String> {
    let (mut config, root) = match args.config.clone().or_else(find_config) {
        Some(config_path) => {
            let config = load_config(Some(&config_path)).map_err(|e| e.to_string())?;
            let root = project_root(&config_path)
                .filter(|p| !p.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .map_or_else(current_dir, Ok)?;
            (config, root)
        }
        None => (default_config(), current_dir()?),
    };
    let root = if root.is_relative() { current_dir()?.join(root) } else { root };

    let overrides = CliOverrides {
        out: args.out.clone(),
        src: args.src.clone(),
        mode_env: args.mode_env.clone(),
    };
    merge_cli_overrides(&mut config, &overrides);

    let context = BuildContext::new(config, root);
    Ok(match args.mode {
        Some(mode) => context.with_mode(mode),
        None => context,
    })
}

fn current_dir() -> Result<PathBuf, String> {
    std::env::current_dir().map_err(|e| format!("Cannot determine current directory: {}", e))
}

/// Parse arguments and run the selected command.
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Graph { project, output, compact, filter } => {
            graph::run_graph(&project, output.as_deref(), compact, filter)
        }
        Commands::Targets { project, family } => targets::run_targets(&project, family),
        Commands::Init { path, name } => init::run_init(path.as_deref(), name.as_deref()),
    }
}
