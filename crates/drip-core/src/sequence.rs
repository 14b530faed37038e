use crate::error::{DripError, Result};
use crate::io;
use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The frozen tour order: every item id exactly once, in the order recipients
/// will receive them.
///
/// Randomness is consumed exactly once per deployment. The first call builds
/// and persists a permutation; every later call replays the persisted order
/// verbatim, even if the library has changed since. Deleting the file (what
/// `drip reshuffle` does) is the only way to get a new permutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sequence {
    #[serde(default = "default_version")]
    pub version: u32,
    pub created_at: DateTime<Utc>,
    pub order: Vec<String>,
}

fn default_version() -> u32 {
    1
}

impl Sequence {
    /// Load the persisted order, or build one from `ids` if the file is
    /// absent.
    ///
    /// An existing file wins unconditionally: `ids` is ignored and nothing is
    /// reconciled, so the order may drift out of sync with a library that has
    /// grown or shrunk. A file that exists but fails to parse is an error,
    /// never a reason to re-shuffle.
    pub fn get_or_create(ids: Vec<String>, path: &Path) -> Result<Self> {
        if path.exists() {
            return Self::load(path);
        }
        let sequence = Self::build(ids);
        sequence.save(path)?;
        Ok(sequence)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let data =
            std::fs::read_to_string(path).map_err(|e| DripError::load("tour order", path, e))?;
        serde_yaml::from_str(&data).map_err(|e| DripError::load("tour order", path, e))
    }

    fn build(mut ids: Vec<String>) -> Self {
        // Sort into a deterministic baseline before shuffling, so the only
        // source of variation between deployments is the shuffle itself.
        ids.sort();
        ids.shuffle(&mut rand::thread_rng());
        Self {
            version: 1,
            created_at: Utc::now(),
            order: ids,
        }
    }

    fn save(&self, path: &Path) -> Result<()> {
        let data =
            serde_yaml::to_string(self).map_err(|e| DripError::persist("tour order", path, e))?;
        io::atomic_write(path, data.as_bytes())
            .map_err(|e| DripError::persist("tour order", path, e))
    }

    /// Item id at `index`, or `None` once a cursor has walked past the end.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.order.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn ids(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("item-{i:03}")).collect()
    }

    #[test]
    fn first_build_is_a_permutation_of_the_ids() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("order.yaml");
        let sequence = Sequence::get_or_create(ids(20), &path).unwrap();

        let mut sorted = sequence.order.clone();
        sorted.sort();
        assert_eq!(sorted, ids(20));
        assert!(path.exists());
    }

    #[test]
    fn second_call_replays_the_persisted_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("order.yaml");
        let first = Sequence::get_or_create(ids(20), &path).unwrap();
        let second = Sequence::get_or_create(ids(20), &path).unwrap();
        assert_eq!(first.order, second.order);
    }

    #[test]
    fn existing_order_ignores_changed_ids() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("order.yaml");
        let first = Sequence::get_or_create(ids(5), &path).unwrap();

        // The library grew; the persisted order must win verbatim.
        let second = Sequence::get_or_create(ids(50), &path).unwrap();
        assert_eq!(first.order, second.order);
        assert_eq!(second.len(), 5);
    }

    #[test]
    fn deleting_the_file_yields_a_fresh_permutation() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("order.yaml");
        let first = Sequence::get_or_create(ids(100), &path).unwrap();

        std::fs::remove_file(&path).unwrap();
        let second = Sequence::get_or_create(ids(100), &path).unwrap();

        // Same id set, independently shuffled. With 100 items a repeat
        // ordering would mean the shuffle never ran.
        let mut sorted = second.order.clone();
        sorted.sort();
        assert_eq!(sorted, ids(100));
        assert_ne!(first.order, second.order);
    }

    #[test]
    fn corrupt_order_file_is_an_error_not_a_reshuffle() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("order.yaml");
        std::fs::write(&path, ": not valid yaml [").unwrap();

        let err = Sequence::get_or_create(ids(3), &path).unwrap_err();
        assert!(matches!(err, DripError::Load { .. }));
        // And the broken file is left alone for the operator to look at.
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            ": not valid yaml ["
        );
    }

    #[test]
    fn get_past_the_end_is_none() {
        let dir = TempDir::new().unwrap();
        let sequence = Sequence::get_or_create(ids(2), &dir.path().join("order.yaml")).unwrap();
        assert!(sequence.get(0).is_some());
        assert!(sequence.get(1).is_some());
        assert!(sequence.get(2).is_none());
    }
}
