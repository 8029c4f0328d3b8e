use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashSet};
use tracing::debug;

use crate::graph::Category;
use crate::resolve::{NoticeKey, ResolutionSet};

pub mod text;

pub use text::LicenseTexts;

/// One originating library and the installed paths its notice covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryBlock {
    pub library: String,
    pub installs: Vec<String>,
}

/// Everything rendered under one notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub notice: NoticeKey,
    pub blocks: Vec<LibraryBlock>,
}

impl Section {
    pub fn category(&self) -> Category {
        self.notice.category
    }

    pub fn libraries(&self) -> impl Iterator<Item = &str> {
        self.blocks.iter().map(|b| b.library.as_str())
    }

    pub fn install_count(&self) -> usize {
        self.blocks.iter().map(|b| b.installs.len()).sum()
    }
}

/// Group resolutions into ordered sections.
///
/// Libraries are visited in name order; each library emits the notices it
/// takes part in that are not out yet, the ones covering most of its installs
/// first, then shorter notices, then by key. Blocks inside a section are
/// ordered by library name; installs keep discovery order.
pub fn group_sections(resolutions: &ResolutionSet) -> Vec<Section> {
    // notice -> library -> installs
    let mut index: IndexMap<&NoticeKey, IndexMap<&str, IndexSet<&str>>> = IndexMap::new();
    for resolution in resolutions {
        index
            .entry(&resolution.notice)
            .or_default()
            .entry(resolution.library.as_str())
            .or_default()
            .insert(resolution.install_path.as_str());
    }

    let libraries: BTreeSet<&str> = index
        .values()
        .flat_map(|libs| libs.keys().copied())
        .collect();

    let mut emitted: HashSet<&NoticeKey> = HashSet::new();
    let mut order: Vec<&NoticeKey> = Vec::with_capacity(index.len());

    for library in libraries {
        let mut pending: Vec<(&NoticeKey, usize)> = Vec::new();
        for (&notice, libs) in &index {
            if emitted.contains(notice) {
                continue;
            }
            if let Some(installs) = libs.get(library) {
                pending.push((notice, installs.len()));
            }
        }

        pending.sort_by(compare_pending);
        for (notice, _) in pending {
            emitted.insert(notice);
            order.push(notice);
        }
    }

    let sections: Vec<Section> = order
        .into_iter()
        .map(|notice| {
            let libs = &index[notice];
            let mut names: Vec<&str> = libs.keys().copied().collect();
            names.sort_unstable();

            let blocks = names
                .into_iter()
                .map(|name| LibraryBlock {
                    library: name.to_string(),
                    installs: libs[name].iter().map(|p| p.to_string()).collect(),
                })
                .collect();

            Section { notice: notice.clone(), blocks }
        })
        .collect();

    debug!(sections = sections.len(), "Grouped notices");
    sections
}

fn compare_pending(a: &(&NoticeKey, usize), b: &(&NoticeKey, usize)) -> Ordering {
    b.1.cmp(&a.1)
        .then_with(|| a.0.marker().len().cmp(&b.0.marker().len()))
        .then_with(|| a.0.cmp(b.0))
}
