pub mod config;
pub mod error;
pub mod graph;
pub mod notice;
pub mod output;
pub mod resolve;

// Re-export main types for easy access
pub use error::{NoticeError, Result};
pub use graph::{ArtifactKind, Category, Edge, Graph, LicenseCondition, LinkageKind, Target};
pub use notice::{group_sections, LibraryBlock, LicenseTexts, Section};
pub use output::{format_json_notice, format_text_notice, RenderOptions};
pub use resolve::{resolve_notices, NoticeKey, Resolution, ResolutionSet};

/// Resolve and group in one step.
pub fn notice_sections(graph: &Graph, roots: &[String]) -> Result<Vec<Section>> {
    let resolutions = resolve_notices(graph, roots)?;
    Ok(group_sections(&resolutions))
}
