use rayon::prelude::*;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

use super::Section;
use crate::error::{NoticeError, Result};
use crate::resolve::NoticeKey;

/// License text bodies keyed by their source-relative path.
#[derive(Debug, Clone, Default)]
pub struct LicenseTexts {
    texts: HashMap<String, String>,
}

impl LicenseTexts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, text: impl Into<String>) {
        self.texts.insert(key.into(), text.into());
    }

    pub fn get(&self, notice: &NoticeKey) -> Option<&str> {
        notice
            .text
            .as_deref()
            .and_then(|key| self.texts.get(key))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    /// Read the text of every section that names one, relative to `root`.
    pub fn load(root: &Path, sections: &[Section]) -> Result<Self> {
        let mut keys: Vec<&str> = sections
            .iter()
            .filter_map(|s| s.notice.text.as_deref())
            .collect();
        keys.sort_unstable();
        keys.dedup();

        let loaded = keys
            .par_iter()
            .map(|key| {
                let path = root.join(key);
                std::fs::read_to_string(&path)
                    .map(|text| (key.to_string(), text))
                    .map_err(|source| NoticeError::LicenseText { path, source })
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(texts = loaded.len(), "Loaded license texts from {}", root.display());
        Ok(Self {
            texts: loaded.into_iter().collect(),
        })
    }
}
