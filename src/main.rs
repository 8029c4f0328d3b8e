use anyhow::Result;
use clap::Parser;
use std::io::IsTerminal;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::NoticeArgs;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Notice {
            roots,
            graph,
            output,
            format,
            title,
            strip_prefix,
            text_root,
        } => {
            let args = NoticeArgs {
                roots,
                graph,
                output,
                format,
                title,
                strip_prefix,
                text_root,
            };
            commands::handle_notice(args, cli.config.as_deref())
        }
        Commands::Config { show, validate } => {
            commands::handle_config(cli.config.as_deref(), show, validate, cli.quiet)
        }
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level_filter = if quiet {
        LevelFilter::ERROR
    } else {
        match verbose {
            0 => LevelFilter::INFO,
            1 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    };

    let env_filter = EnvFilter::builder()
        .with_default_directive(level_filter.into())
        .with_env_var("TEXTNOTICE_LOG")
        .from_env_lossy();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .without_time()
        .try_init();
}
