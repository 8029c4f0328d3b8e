use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use anyhow::{Result, Context};
use tracing::{debug, warn};

use super::{Graph, Target, DEFAULT_OUTPUT_ROOT};

/// Supplies the graph the resolver walks. The core never touches raw metadata
/// formats; everything behind this trait is the loader's business.
pub trait GraphLoader {
    fn load_graph(&self, roots: &[String]) -> Result<Graph>;
}

/// One manifest file: an optional output root and a `[[target]]` array.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphManifest {
    pub output_root: Option<String>,
    #[serde(rename = "target", default)]
    pub targets: Vec<Target>,
}

/// Loads a graph from a TOML or JSON manifest, or from every manifest below a
/// directory.
#[derive(Debug, Clone)]
pub struct ManifestLoader {
    path: PathBuf,
}

impl ManifestLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse a single manifest file
    pub fn parse_manifest<P: AsRef<Path>>(path: P) -> Result<GraphManifest> {
        let path_ref = path.as_ref();

        if !path_ref.exists() {
            return Err(anyhow::anyhow!("Graph manifest not found: {}", path_ref.display()));
        }

        let content = std::fs::read_to_string(path_ref)
            .with_context(|| format!("Failed to read graph manifest: {}", path_ref.display()))?;

        if content.trim().is_empty() {
            return Err(anyhow::anyhow!("Graph manifest is empty: {}", path_ref.display()));
        }

        let is_json = path_ref.extension().map_or(false, |ext| ext == "json");
        let manifest: GraphManifest = if is_json {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse graph manifest as JSON: {}", path_ref.display()))?
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse graph manifest as TOML: {}", path_ref.display()))?
        };

        if manifest.targets.is_empty() {
            warn!("Graph manifest contains no targets: {}", path_ref.display());
        }

        Ok(manifest)
    }

    /// Manifest files below `dir`, sorted so the merged graph does not depend on
    /// directory iteration order.
    pub fn find_manifests(dir: &Path) -> Result<Vec<PathBuf>> {
        let base = glob::Pattern::escape(&dir.to_string_lossy());
        let mut found = Vec::new();

        for ext in ["toml", "json"] {
            let pattern = format!("{}/**/*.{}", base, ext);
            for entry in glob::glob(&pattern).with_context(|| format!("Invalid manifest pattern: {}", pattern))? {
                let path = entry.with_context(|| format!("Failed to scan {}", dir.display()))?;
                if path.is_file() {
                    found.push(path);
                }
            }
        }

        found.sort();
        Ok(found)
    }

    /// Merge manifests into one graph. Duplicate target ids are rejected.
    pub fn merge(manifests: Vec<(PathBuf, GraphManifest)>) -> Result<Graph> {
        let mut output_root: Option<String> = None;
        let mut seen = HashSet::new();
        let mut targets = Vec::new();

        for (path, manifest) in manifests {
            if let Some(root) = manifest.output_root {
                match &output_root {
                    Some(existing) if existing != &root => {
                        return Err(anyhow::anyhow!(
                            "Conflicting output_root in {}: '{}' (already '{}')",
                            path.display(), root, existing
                        ));
                    }
                    _ => output_root = Some(root),
                }
            }

            for target in manifest.targets {
                if target.id.trim().is_empty() {
                    warn!("Skipping target with empty id in {}", path.display());
                    continue;
                }
                if target.install_name.trim().is_empty() {
                    warn!("Skipping target '{}' with empty install_name", target.id);
                    continue;
                }
                if !seen.insert(target.id.clone()) {
                    return Err(anyhow::anyhow!(
                        "Duplicate target '{}' in {}", target.id, path.display()
                    ));
                }
                targets.push(target);
            }
        }

        let output_root = output_root.unwrap_or_else(|| DEFAULT_OUTPUT_ROOT.to_string());
        Ok(Graph::from_targets(output_root, targets))
    }
}

impl GraphLoader for ManifestLoader {
    fn load_graph(&self, roots: &[String]) -> Result<Graph> {
        let files = if self.path.is_dir() {
            let files = Self::find_manifests(&self.path)?;
            if files.is_empty() {
                return Err(anyhow::anyhow!("No graph manifests found under {}", self.path.display()));
            }
            files
        } else {
            vec![self.path.clone()]
        };

        let mut manifests = Vec::with_capacity(files.len());
        for file in files {
            let manifest = Self::parse_manifest(&file)?;
            manifests.push((file, manifest));
        }

        let graph = Self::merge(manifests)?;
        debug!(
            targets = graph.len(),
            roots = roots.len(),
            "Loaded graph from {}",
            self.path.display()
        );
        Ok(graph)
    }
}
