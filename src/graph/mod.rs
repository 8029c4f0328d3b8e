use serde::{Deserialize, Serialize};
use indexmap::IndexMap;
use std::fmt;

pub mod loader;

// Re-export from loader
pub use loader::{GraphLoader, ManifestLoader};

pub type TargetId = String;

pub const DEFAULT_OUTPUT_ROOT: &str = "out";

/// License obligation class of a declared condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    FirstParty,
    Notice,
    Reciprocal,
    Restricted,
    Proprietary,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::FirstParty,
        Category::Notice,
        Category::Reciprocal,
        Category::Restricted,
        Category::Proprietary,
    ];

    /// Marker line closing a rendered section of this category.
    pub fn marker(&self) -> &'static str {
        match self {
            Category::FirstParty => "&&&First Party License&&&",
            Category::Notice => "%%%Notice License%%%",
            Category::Reciprocal => "$$$Reciprocal License$$$",
            Category::Restricted => "###Restricted License###",
            Category::Proprietary => "@@@Proprietary License@@@",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::FirstParty => "first_party",
            Category::Notice => "notice",
            Category::Reciprocal => "reciprocal",
            Category::Restricted => "restricted",
            Category::Proprietary => "proprietary",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a dependent uses a dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkageKind {
    Static,
    Dynamic,
    Toolchain,
    Container,
    Runtime,
}

/// Container-like artifacts (apex, zip, filesystem image) nest their members'
/// install paths below their own; leaves do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Container,
    #[default]
    Leaf,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LicenseCondition {
    pub category: Category,
    /// Source-relative path of the license text, e.g. `external/libfoo/NOTICE`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Library name to report instead of the target's package.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub library: Option<String>,
}

impl LicenseCondition {
    pub fn new(category: Category) -> Self {
        Self { category, text: None, library: None }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_library(mut self, library: impl Into<String>) -> Self {
        self.library = Some(library.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub dependency: TargetId,
    pub linkage: LinkageKind,
    /// Segment the member takes inside its container, when it differs from
    /// the member's own install name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub install_as: Option<String>,
}

impl Edge {
    pub fn new(dependency: impl Into<TargetId>, linkage: LinkageKind) -> Self {
        Self { dependency: dependency.into(), linkage, install_as: None }
    }

    pub fn installed_as(mut self, segment: impl Into<String>) -> Self {
        self.install_as = Some(segment.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub id: TargetId,
    #[serde(default)]
    pub kind: ArtifactKind,
    pub install_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub install_dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
    #[serde(default)]
    pub conditions: Vec<LicenseCondition>,
    #[serde(default)]
    pub deps: Vec<Edge>,
}

impl Target {
    pub fn new(id: impl Into<TargetId>, kind: ArtifactKind, install_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            install_name: install_name.into(),
            install_dir: None,
            package: None,
            conditions: Vec::new(),
            deps: Vec::new(),
        }
    }

    pub fn in_dir(mut self, dir: impl Into<String>) -> Self {
        self.install_dir = Some(dir.into());
        self
    }

    pub fn package(mut self, package: impl Into<String>) -> Self {
        self.package = Some(package.into());
        self
    }

    pub fn condition(mut self, condition: LicenseCondition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn dep(mut self, edge: Edge) -> Self {
        self.deps.push(edge);
        self
    }

    pub fn is_container(&self) -> bool {
        self.kind == ArtifactKind::Container
    }
}

/// Read-only artifact graph. Targets keep their insertion order so that every
/// traversal over the graph is deterministic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Graph {
    output_root: String,
    targets: IndexMap<TargetId, Target>,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new(DEFAULT_OUTPUT_ROOT)
    }
}

impl Graph {
    pub fn new(output_root: impl Into<String>) -> Self {
        Self {
            output_root: output_root.into(),
            targets: IndexMap::new(),
        }
    }

    /// Build a graph from targets; a later target with a repeated id replaces
    /// the earlier one.
    pub fn from_targets(output_root: impl Into<String>, targets: impl IntoIterator<Item = Target>) -> Self {
        let mut graph = Self::new(output_root);
        for target in targets {
            graph.insert(target);
        }
        graph
    }

    pub fn insert(&mut self, target: Target) -> Option<Target> {
        self.targets.insert(target.id.clone(), target)
    }

    pub fn get(&self, id: &str) -> Option<&Target> {
        self.targets.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.targets.contains_key(id)
    }

    pub fn output_root(&self) -> &str {
        &self.output_root
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn targets(&self) -> impl Iterator<Item = &Target> {
        self.targets.values()
    }

    /// Copy of the graph with every declared condition removed.
    pub fn without_conditions(&self) -> Self {
        let mut graph = self.clone();
        for target in graph.targets.values_mut() {
            target.conditions.clear();
        }
        graph
    }
}
