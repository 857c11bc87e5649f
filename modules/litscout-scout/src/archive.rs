// Append-only archive of every classified item, merged across runs.
//
// Merge identity is (title, published date), not the canonical key: the
// same work re-observed under a different key (say, a DOI appearing after
// an arXiv preprint id) should not duplicate the ledger entry.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::{info, warn};

use litscout_common::ClassifiedItem;

use crate::seen::write_atomically;

#[derive(Debug, Default)]
pub struct Archive {
    items: Vec<ClassifiedItem>,
}

impl Archive {
    pub fn new(items: Vec<ClassifiedItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[ClassifiedItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Append items whose merge key is not already present. Existing
    /// entries are never overwritten or reordered. Returns how many were
    /// added.
    pub fn merge(&mut self, new_items: &[ClassifiedItem]) -> usize {
        let mut keys: HashSet<(String, Option<NaiveDate>)> = self
            .items
            .iter()
            .map(|i| (i.title.clone(), i.published))
            .collect();

        let mut added = 0;
        for item in new_items {
            if keys.insert((item.title.clone(), item.published)) {
                self.items.push(item.clone());
                added += 1;
            }
        }
        added
    }
}

pub struct ArchiveStore {
    path: PathBuf,
}

impl ArchiveStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing file is an empty archive; corrupt content degrades to empty
    /// with a warning, same policy as the seen store.
    pub fn load(&self) -> Archive {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %self.path.display(), "No archive file, starting empty");
                return Archive::default();
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to read archive, starting empty");
                return Archive::default();
            }
        };

        match serde_json::from_str::<Vec<ClassifiedItem>>(&content) {
            Ok(items) => {
                info!(items = items.len(), "Loaded archive");
                Archive::new(items)
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Corrupt archive, starting empty");
                Archive::default()
            }
        }
    }

    pub fn persist(&self, archive: &Archive) -> Result<()> {
        let json =
            serde_json::to_string_pretty(&archive.items).context("Failed to serialize archive")?;
        write_atomically(&self.path, &json)?;
        info!(items = archive.len(), path = %self.path.display(), "Persisted archive");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use litscout_common::{CanonicalKey, SourceKind, Tier};

    fn item(key: &str, title: &str, published: Option<NaiveDate>) -> ClassifiedItem {
        ClassifiedItem {
            key: CanonicalKey::new(key),
            title: title.into(),
            source: SourceKind::Arxiv,
            venue: None,
            published,
            tier: Tier::Primary,
            score: 8,
        }
    }

    fn date(d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(2026, 3, d)
    }

    #[test]
    fn merge_appends_only_new_merge_keys() {
        let mut archive = Archive::new(vec![item("arxiv:1", "Preprint", date(1))]);

        let added = archive.merge(&[
            // Same (title, date) under a fresh key: skipped.
            item("10.1/now-published", "Preprint", date(1)),
            // Same title, different date: distinct entry.
            item("10.1/v2", "Preprint", date(2)),
            item("10.1/new", "Brand new", date(1)),
        ]);

        assert_eq!(added, 2);
        assert_eq!(archive.len(), 3);
        // Original entry untouched and still first.
        assert_eq!(archive.items()[0].key, CanonicalKey::new("arxiv:1"));
    }

    #[test]
    fn merge_is_idempotent() {
        let items = vec![item("10.1/a", "A", date(1)), item("10.1/b", "B", None)];
        let mut archive = Archive::default();
        assert_eq!(archive.merge(&items), 2);
        assert_eq!(archive.merge(&items), 0);
        assert_eq!(archive.len(), 2);
    }

    #[test]
    fn persist_then_load_preserves_order_and_fields() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArchiveStore::new(dir.path().join("archive.json"));

        let mut archive = Archive::default();
        archive.merge(&[item("10.1/a", "A", date(1)), item("10.1/b", "B", date(2))]);
        store.persist(&archive).unwrap();

        let reloaded = store.load();
        assert_eq!(reloaded.items(), archive.items());
    }

    #[test]
    fn missing_and_corrupt_files_load_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArchiveStore::new(dir.path().join("archive.json"));
        assert!(store.load().is_empty());

        std::fs::write(store.path(), "[{\"broken\":").unwrap();
        assert!(store.load().is_empty());
    }
}
