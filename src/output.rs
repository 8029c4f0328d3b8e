use serde::Serialize;

use crate::notice::{LicenseTexts, Section};

pub const HORIZONTAL_RULE: &str =
    "==============================================================================";

#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Printed once, before the first section.
    pub title: Option<String>,
    /// Leading path prefixes removed from rendered install paths.
    pub strip_prefixes: Vec<String>,
}

/// Render sections in the line-oriented notice format.
pub fn format_text_notice(sections: &[Section], options: &RenderOptions, texts: &LicenseTexts) -> String {
    let mut output = String::new();

    if let Some(title) = options.title.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        output.push_str(&format!("{}\n\n", title));
    }

    for section in sections {
        output.push_str(HORIZONTAL_RULE);
        output.push('\n');

        for block in &section.blocks {
            output.push_str(&format!("{} used by:\n", block.library));
            for install in &block.installs {
                output.push_str(&format!("  {}\n", strip_prefix(install, &options.strip_prefixes)));
            }
            output.push('\n');
        }

        output.push_str(section.notice.marker());
        output.push('\n');

        if let Some(text) = texts.get(&section.notice) {
            output.push_str(text);
            if !text.ends_with('\n') {
                output.push('\n');
            }
        }
        output.push('\n');
    }

    output
}

#[derive(Debug, Serialize)]
pub struct NoticeReport<'a> {
    pub roots: &'a [String],
    pub sections: &'a [Section],
}

pub fn format_json_notice(roots: &[String], sections: &[Section]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&NoticeReport { roots, sections })
}

fn strip_prefix<'a>(path: &'a str, prefixes: &[String]) -> &'a str {
    for prefix in prefixes {
        if prefix.is_empty() {
            continue;
        }
        if let Some(rest) = path.strip_prefix(prefix.as_str()) {
            let rest = rest.trim_start_matches('/');
            if !rest.is_empty() {
                return rest;
            }
        }
    }
    path
}
