// Durable seen-set: the at-most-once notification guarantee.
//
// A key is marked the moment its record is accepted for the digest, and the
// whole set is rewritten at the end of the run. Load failures degrade to an
// empty set: a lost state file means duplicate notifications, never a
// crashed monitor.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};

use litscout_common::CanonicalKey;

#[derive(Debug, Default)]
pub struct SeenSet {
    keys: HashSet<CanonicalKey>,
    dirty: bool,
}

impl SeenSet {
    pub fn contains(&self, key: &CanonicalKey) -> bool {
        self.keys.contains(key)
    }

    /// Insert-only. Returns true if the key was new.
    pub fn mark(&mut self, key: CanonicalKey) -> bool {
        let inserted = self.keys.insert(key);
        if inserted {
            self.dirty = true;
        }
        inserted
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

impl FromIterator<CanonicalKey> for SeenSet {
    fn from_iter<I: IntoIterator<Item = CanonicalKey>>(iter: I) -> Self {
        Self {
            keys: iter.into_iter().collect(),
            dirty: false,
        }
    }
}

pub struct SeenStore {
    path: PathBuf,
}

impl SeenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing file is a first run; unreadable or corrupt content is logged
    /// and treated as empty rather than aborting the run.
    pub fn load(&self) -> SeenSet {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %self.path.display(), "No seen file, starting empty");
                return SeenSet::default();
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to read seen file, starting empty");
                return SeenSet::default();
            }
        };

        match serde_json::from_str::<Vec<CanonicalKey>>(&content) {
            Ok(keys) => {
                let set: SeenSet = keys.into_iter().collect();
                info!(keys = set.len(), "Loaded seen set");
                set
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Corrupt seen file, starting empty");
                SeenSet::default()
            }
        }
    }

    /// Full rewrite via a temp file in the same directory, then rename, so
    /// a crash mid-write leaves the previous state intact.
    pub fn persist(&self, seen: &SeenSet) -> Result<()> {
        let mut keys: Vec<&CanonicalKey> = seen.keys.iter().collect();
        keys.sort();
        let json = serde_json::to_string_pretty(&keys).context("Failed to serialize seen set")?;
        write_atomically(&self.path, &json)?;
        info!(keys = keys.len(), path = %self.path.display(), "Persisted seen set");
        Ok(())
    }
}

pub(crate) fn write_atomically(path: &Path, content: &str) -> Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    std::fs::write(&tmp, content)
        .with_context(|| format!("Failed to write {}", tmp.display()))?;
    std::fs::rename(&tmp, path)
        .with_context(|| format!("Failed to move {} into place", tmp.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> CanonicalKey {
        CanonicalKey::new(s)
    }

    #[test]
    fn mark_is_insert_only_and_sets_dirty() {
        let mut seen = SeenSet::default();
        assert!(!seen.is_dirty());
        assert!(seen.mark(key("10.1/a")));
        assert!(!seen.mark(key("10.1/a")));
        assert!(seen.contains(&key("10.1/a")));
        assert_eq!(seen.len(), 1);
        assert!(seen.is_dirty());
    }

    #[test]
    fn loaded_set_starts_clean() {
        let seen: SeenSet = vec![key("a"), key("b")].into_iter().collect();
        assert_eq!(seen.len(), 2);
        assert!(!seen.is_dirty());
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = SeenStore::new(dir.path().join("seen.json"));
        assert!(store.load().is_empty());
    }

    #[test]
    fn corrupt_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seen.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(SeenStore::new(path).load().is_empty());
    }

    #[test]
    fn persist_then_load_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        let store = SeenStore::new(dir.path().join("seen.json"));

        let mut seen = store.load();
        seen.mark(key("10.1/abc"));
        seen.mark(key("arxiv:2403.01234v1"));
        store.persist(&seen).unwrap();

        let reloaded = store.load();
        assert_eq!(reloaded.len(), 2);
        assert!(reloaded.contains(&key("10.1/abc")));
        assert!(reloaded.contains(&key("arxiv:2403.01234v1")));
        assert!(!reloaded.is_dirty());
    }

    #[test]
    fn persist_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = SeenStore::new(dir.path().join("seen.json"));
        let mut seen = SeenSet::default();
        seen.mark(key("a"));
        store.persist(&seen).unwrap();

        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec!["seen.json"]);
    }

    #[test]
    fn serialized_form_is_a_plain_key_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seen.json");
        let store = SeenStore::new(&path);
        let mut seen = SeenSet::default();
        seen.mark(key("10.1/abc"));
        store.persist(&seen).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let parsed: Vec<String> = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed, vec!["10.1/abc"]);
    }
}
