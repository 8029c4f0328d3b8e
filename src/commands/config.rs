use anyhow::{Context, Result};
use std::path::Path;
use textnotice::config::{load_config, load_config_file, Config};

pub fn load(config_path: Option<&Path>) -> Result<Config> {
    match config_path {
        Some(path) => load_config_file(path),
        None => load_config(),
    }
}

pub fn handle_config(config_path: Option<&Path>, show: bool, validate: bool, quiet: bool) -> Result<()> {
    if !show && !validate {
        anyhow::bail!("Use --show or --validate");
    }

    let config = load(config_path).context("Failed to load configuration")?;

    if show {
        println!("{}", serde_json::to_string_pretty(&config)?);
    }

    if validate && !quiet {
        println!("Configuration is valid");
    }

    Ok(())
}
