use crate::error::{DripError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// One deliverable unit of content: display text, a media attachment, and the
/// page the content came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub text: String,
    pub media_url: String,
    pub source_url: String,
}

/// The full content snapshot, keyed by item id.
///
/// Loaded fresh every run and read-only for its lifetime. The harvesting
/// pipeline that produces the snapshot is a separate program; this side only
/// cares that the file is a JSON map of id to item.
#[derive(Debug, Clone, Default)]
pub struct Library {
    items: BTreeMap<String, Item>,
}

impl Library {
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| DripError::load("content library", path, e))?;
        let items: BTreeMap<String, Item> =
            serde_json::from_str(&data).map_err(|e| DripError::load("content library", path, e))?;
        Ok(Self { items })
    }

    pub fn from_items(items: impl IntoIterator<Item = (String, Item)>) -> Self {
        Self {
            items: items.into_iter().collect(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&Item> {
        self.items.get(id)
    }

    pub fn ids(&self) -> Vec<String> {
        self.items.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
