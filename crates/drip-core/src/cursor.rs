use crate::error::{DripError, Result};
use crate::io;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Deserialize)]
struct CursorFile {
    #[serde(default = "default_version")]
    version: u32,
    #[serde(default)]
    cursors: BTreeMap<String, usize>,
    last_updated: DateTime<Utc>,
}

fn default_version() -> u32 {
    1
}

/// Per-recipient progress through the tour order.
///
/// All mutation is in-memory; `save` overwrites the whole file at once, so the
/// on-disk snapshot is either the previous run's state or this run's, never a
/// mix. If `save` is skipped or fails, everything advanced this run is
/// re-attempted next time.
#[derive(Debug)]
pub struct CursorStore {
    path: PathBuf,
    cursors: BTreeMap<String, usize>,
}

impl CursorStore {
    /// Open the store at `path`, creating and persisting an empty one when
    /// the file does not exist yet. Any other read or parse failure is an
    /// error — a corrupt file is not the same thing as a missing one.
    pub fn open(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(data) => {
                let file: CursorFile = serde_yaml::from_str(&data)
                    .map_err(|e| DripError::load("cursor file", path, e))?;
                Ok(Self {
                    path: path.to_path_buf(),
                    cursors: file.cursors,
                })
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let store = Self {
                    path: path.to_path_buf(),
                    cursors: BTreeMap::new(),
                };
                store.save()?;
                Ok(store)
            }
            Err(e) => Err(DripError::load("cursor file", path, e)),
        }
    }

    /// A recipient that has never been seen starts at position 0.
    pub fn get(&self, recipient: &str) -> usize {
        self.cursors.get(recipient).copied().unwrap_or(0)
    }

    /// Move `recipient` forward by exactly one item. No I/O happens here.
    pub fn advance(&mut self, recipient: &str) {
        *self.cursors.entry(recipient.to_string()).or_insert(0) += 1;
    }

    /// Overwrite the persisted file with the full current mapping.
    pub fn save(&self) -> Result<()> {
        let file = CursorFile {
            version: 1,
            cursors: self.cursors.clone(),
            last_updated: Utc::now(),
        };
        let data = serde_yaml::to_string(&file)
            .map_err(|e| DripError::persist("cursor file", &self.path, e))?;
        io::atomic_write(&self.path, data.as_bytes())
            .map_err(|e| DripError::persist("cursor file", &self.path, e))
    }

    /// Drop every stored position. Used when the tour order is rebuilt.
    pub fn reset(&mut self) {
        self.cursors.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.cursors.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn open_absent_file_establishes_empty_store() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cursors.yaml");
        let store = CursorStore::open(&path).unwrap();

        assert!(store.is_empty());
        // The file now exists so the next run loads instead of initializing.
        assert!(path.exists());
        let reopened = CursorStore::open(&path).unwrap();
        assert!(reopened.is_empty());
    }

    #[test]
    fn unseen_recipient_is_at_zero() {
        let dir = TempDir::new().unwrap();
        let store = CursorStore::open(&dir.path().join("cursors.yaml")).unwrap();
        assert_eq!(store.get("+15551234567"), 0);
    }

    #[test]
    fn advance_and_save_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cursors.yaml");

        let mut store = CursorStore::open(&path).unwrap();
        store.advance("+15551230001");
        store.advance("+15551230001");
        store.advance("+15551230002");
        store.save().unwrap();

        let reloaded = CursorStore::open(&path).unwrap();
        assert_eq!(reloaded.get("+15551230001"), 2);
        assert_eq!(reloaded.get("+15551230002"), 1);
        assert_eq!(reloaded.get("+15551230003"), 0);
    }

    #[test]
    fn advance_without_save_is_not_durable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cursors.yaml");

        let mut store = CursorStore::open(&path).unwrap();
        store.advance("+15551230001");
        drop(store);

        let reloaded = CursorStore::open(&path).unwrap();
        assert_eq!(reloaded.get("+15551230001"), 0);
    }

    #[test]
    fn corrupt_file_is_a_load_error_not_a_fresh_store() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cursors.yaml");
        std::fs::write(&path, "cursors: [this is not a map]").unwrap();

        let err = CursorStore::open(&path).unwrap_err();
        assert!(matches!(err, DripError::Load { .. }));
    }

    #[test]
    fn reset_clears_every_position() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cursors.yaml");

        let mut store = CursorStore::open(&path).unwrap();
        store.advance("+15551230001");
        store.advance("+15551230002");
        store.reset();
        store.save().unwrap();

        let reloaded = CursorStore::open(&path).unwrap();
        assert!(reloaded.is_empty());
    }
}
