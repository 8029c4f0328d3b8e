use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "textnotice")]
#[command(about = "Generate license notices for the artifacts of a built product")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase logging verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file (default: ./textnotice.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve license obligations for root targets and render the notice
    Notice {
        /// Root target identifiers
        #[arg(required = true)]
        roots: Vec<String>,

        /// Graph manifest, or a directory of manifests
        #[arg(short, long)]
        graph: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long)]
        format: Option<OutputFormat>,

        /// Title line printed before the notices (text output only)
        #[arg(long)]
        title: Option<String>,

        /// Prefix to remove from install paths, repeatable (text output only)
        #[arg(long = "strip-prefix")]
        strip_prefix: Vec<String>,

        /// Directory license text paths are relative to (text output only)
        #[arg(long)]
        text_root: Option<PathBuf>,
    },
    /// Show or validate configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Validate configuration file
        #[arg(long)]
        validate: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
