use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::graph::{Category, LicenseCondition, TargetId};

pub mod library;
pub mod path;
pub mod resolver;

// Re-export main entry points
pub use library::library_name;
pub use path::{PathBuilder, PathStep};
pub use resolver::{resolve_notices, ConditionResolver};

/// Identity of one notice: its category plus the license text it points at.
/// Two conditions of the same category with different texts are different
/// notices and render as different sections.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NoticeKey {
    pub category: Category,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl NoticeKey {
    pub fn new(category: Category) -> Self {
        Self { category, text: None }
    }

    pub fn marker(&self) -> &'static str {
        self.category.marker()
    }
}

impl From<&LicenseCondition> for NoticeKey {
    fn from(condition: &LicenseCondition) -> Self {
        Self {
            category: condition.category,
            text: condition.text.clone(),
        }
    }
}

/// Evidence that the artifact installed at `install_path` ships with the
/// `notice` obligation, attributable to `library`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub notice: NoticeKey,
    pub library: String,
    pub install_path: String,
    /// Artifact installed at `install_path`.
    pub shipped: TargetId,
    /// Target that declared the condition.
    pub origin: TargetId,
}

impl Resolution {
    pub fn category(&self) -> Category {
        self.notice.category
    }
}

/// Resolutions in discovery order. Repeats of the same
/// (notice, library, install path) triple are dropped.
#[derive(Debug, Clone, Default)]
pub struct ResolutionSet {
    resolutions: Vec<Resolution>,
    seen: HashSet<(NoticeKey, String, String)>,
}

impl ResolutionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when an identical triple is already present.
    pub fn insert(&mut self, resolution: Resolution) -> bool {
        let key = (
            resolution.notice.clone(),
            resolution.library.clone(),
            resolution.install_path.clone(),
        );
        if !self.seen.insert(key) {
            return false;
        }
        self.resolutions.push(resolution);
        true
    }

    pub fn len(&self) -> usize {
        self.resolutions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolutions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Resolution> {
        self.resolutions.iter()
    }

    pub fn for_category(&self, category: Category) -> impl Iterator<Item = &Resolution> {
        self.resolutions.iter().filter(move |r| r.category() == category)
    }

    pub fn into_vec(self) -> Vec<Resolution> {
        self.resolutions
    }
}

impl<'a> IntoIterator for &'a ResolutionSet {
    type Item = &'a Resolution;
    type IntoIter = std::slice::Iter<'a, Resolution>;

    fn into_iter(self) -> Self::IntoIter {
        self.resolutions.iter()
    }
}

impl FromIterator<Resolution> for ResolutionSet {
    fn from_iter<I: IntoIterator<Item = Resolution>>(iter: I) -> Self {
        let mut set = Self::new();
        for resolution in iter {
            set.insert(resolution);
        }
        set
    }
}
