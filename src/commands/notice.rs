use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use crate::cli::OutputFormat;
use textnotice::graph::{GraphLoader, ManifestLoader};
use textnotice::output::{format_json_notice, format_text_notice, RenderOptions};
use textnotice::{notice_sections, LicenseTexts};

pub struct NoticeArgs {
    pub roots: Vec<String>,
    pub graph: PathBuf,
    pub output: Option<PathBuf>,
    pub format: Option<OutputFormat>,
    pub title: Option<String>,
    pub strip_prefix: Vec<String>,
    pub text_root: Option<PathBuf>,
}

pub fn handle_notice(args: NoticeArgs, config_path: Option<&Path>) -> Result<()> {
    let config = super::config::load(config_path)?;

    // CLI arguments override config values
    let format = args.format.unwrap_or_else(|| match config.format.as_deref() {
        Some("json") => OutputFormat::Json,
        _ => OutputFormat::Text,
    });

    if matches!(format, OutputFormat::Json)
        && (args.title.is_some() || !args.strip_prefix.is_empty() || args.text_root.is_some())
    {
        anyhow::bail!("--title, --strip-prefix and --text-root only apply to text output");
    }

    let graph = ManifestLoader::new(&args.graph).load_graph(&args.roots)?;
    let sections = notice_sections(&graph, &args.roots)
        .with_context(|| format!("Failed to resolve notices for {}", args.roots.join(", ")))?;

    let content = match format {
        OutputFormat::Json => format_json_notice(&args.roots, &sections)?,
        OutputFormat::Text => {
            let texts = match args.text_root.or(config.text_root) {
                Some(root) => LicenseTexts::load(&root, &sections)?,
                None => LicenseTexts::new(),
            };
            let strip_prefixes = if args.strip_prefix.is_empty() {
                config.strip_prefix.unwrap_or_default()
            } else {
                args.strip_prefix
            };
            let options = RenderOptions {
                title: args.title.or(config.title),
                strip_prefixes,
            };
            format_text_notice(&sections, &options, &texts)
        }
    };

    match &args.output {
        Some(path) => fs::write(path, &content)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => print!("{}", content),
    }

    debug!(
        roots = args.roots.len(),
        sections = sections.len(),
        "Generated notice"
    );
    Ok(())
}
