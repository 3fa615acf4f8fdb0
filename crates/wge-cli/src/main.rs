mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{
    config::ConfigSubcommand, graph::GraphSubcommand, profile::ProfileSubcommand,
    version::VersionSubcommand,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "wge",
    about = "GitOps console toolkit: resolve chart versions, edit profile selections, lay out reconciliation graphs",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .wge/)
    #[arg(long, global = true, env = "WGE_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve chart versions and ranges
    Version {
        #[command(subcommand)]
        subcommand: VersionSubcommand,
    },

    /// Inspect and edit a profiles file
    Profile {
        #[command(subcommand)]
        subcommand: ProfileSubcommand,
    },

    /// Lay out and navigate reconciliation graphs
    Graph {
        #[command(subcommand)]
        subcommand: GraphSubcommand,
    },

    /// Show or validate the console configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Version { subcommand } => cmd::version::run(subcommand, cli.json),
        Commands::Profile { subcommand } => cmd::profile::run(&root, subcommand, cli.json),
        Commands::Graph { subcommand } => cmd::graph::run(&root, subcommand, cli.json),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
