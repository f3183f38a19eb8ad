//! Category-partitioned knowledge store.
//!
//! One JSON file per category under the store directory. Categories missing
//! on disk are materialized from the built-in defaults on load.

use super::defaults::{default_entries, KNOWN_CATEGORIES};
use super::entry::{CategoryFile, KnowledgeEntry};
use crate::error::KnowledgeError;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Result of a `load()` pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub categories: usize,
    pub entries: usize,
    /// Known categories written from defaults because no file existed
    pub materialized: Vec<String>,
    /// Files that could not be read or parsed
    pub failed: Vec<String>,
}

/// In-memory knowledge, keyed by category name.
///
/// Reads never mutate. `add_entry` takes `&mut self`, so a shared store
/// must sit behind a lock to be written from several threads.
#[derive(Debug, Clone)]
pub struct KnowledgeStore {
    dir: Option<PathBuf>,
    categories: BTreeMap<String, Vec<KnowledgeEntry>>,
}

impl KnowledgeStore {
    /// Store backed by `dir`. Nothing is read until `load()`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
            categories: BTreeMap::new(),
        }
    }

    /// Defaults only, no backing directory
    pub fn builtin() -> Self {
        let mut store = Self {
            dir: None,
            categories: BTreeMap::new(),
        };
        store.load();
        store
    }

    /// ~/.groot/knowledge_base
    pub fn default_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".groot")
            .join("knowledge_base")
    }

    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    /// Populate every known category plus any extra category files.
    ///
    /// Replaces whatever was in memory, so calling it twice on an unchanged
    /// directory yields the same state.
    pub fn load(&mut self) -> LoadSummary {
        self.categories.clear();
        let mut summary = LoadSummary::default();

        for &category in KNOWN_CATEGORIES {
            let entries = match self.read_category(category) {
                Ok(Some(entries)) => entries,
                Ok(None) => {
                    let entries = default_entries(category).unwrap_or_default();
                    if self.dir.is_some() {
                        match self.write_category(category, &entries) {
                            Ok(()) => summary.materialized.push(category.to_string()),
                            Err(e) => warn!("could not materialize {}: {}", category, e),
                        }
                    }
                    entries
                }
                Err(e) => {
                    warn!("skipping corrupt category file {}: {}", category, e);
                    summary.failed.push(category.to_string());
                    default_entries(category).unwrap_or_default()
                }
            };
            self.categories.insert(category.to_string(), entries);
        }

        for category in self.extra_category_names() {
            match self.read_category(&category) {
                Ok(Some(entries)) => {
                    debug!("loaded custom category {} ({} entries)", category, entries.len());
                    self.categories.insert(category, entries);
                }
                Ok(None) => {}
                Err(e) => {
                    warn!("skipping corrupt category file {}: {}", category, e);
                    summary.failed.push(category);
                }
            }
        }

        summary.categories = self.categories.len();
        summary.entries = self.entry_count();
        info!(
            "knowledge store loaded: {} categories, {} entries",
            summary.categories, summary.entries
        );
        summary
    }

    /// Entries of a category, empty when unknown
    pub fn category(&self, name: &str) -> &[KnowledgeEntry] {
        self.categories.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Loaded category names, sorted
    pub fn category_names(&self) -> Vec<&str> {
        self.categories.keys().map(String::as_str).collect()
    }

    pub fn entry_count(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }

    /// Append an entry and persist the whole category.
    ///
    /// The in-memory append is kept even when persisting fails, so a later
    /// search in this process can return an entry that is not on disk.
    pub fn add_entry(&mut self, category: &str, entry: KnowledgeEntry) -> Result<(), KnowledgeError> {
        let entries = self.categories.entry(category.to_string()).or_default();
        entries.push(entry);

        let result = validate_category_name(category).and_then(|()| {
            let entries = self.category(category);
            self.write_category(category, entries)
        });
        if let Err(e) = &result {
            warn!("entry added to {} in memory only: {}", category, e);
        }
        result
    }

    /// Write one category's current contents to disk
    pub fn save_category(&self, category: &str) -> Result<(), KnowledgeError> {
        validate_category_name(category)?;
        self.write_category(category, self.category(category))
    }

    fn category_path(&self, category: &str) -> Option<PathBuf> {
        self.dir.as_ref().map(|d| d.join(format!("{}.json", category)))
    }

    /// `Ok(None)` when there is no file to read
    fn read_category(&self, category: &str) -> Result<Option<Vec<KnowledgeEntry>>, String> {
        let Some(path) = self.category_path(category) else {
            return Ok(None);
        };
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(format!("{}: {}", path.display(), e)),
        };
        serde_json::from_str::<CategoryFile>(&content)
            .map(|file| Some(file.entries))
            .map_err(|e| format!("{}: {}", path.display(), e))
    }

    /// Write to `<category>.json.tmp` then rename over the real file
    fn write_category(&self, category: &str, entries: &[KnowledgeEntry]) -> Result<(), KnowledgeError> {
        let path = self.category_path(category).ok_or(KnowledgeError::NoBackingDir)?;
        let persist = |source: std::io::Error| KnowledgeError::Persist {
            category: category.to_string(),
            source,
        };

        let file = CategoryFile {
            entries: entries.to_vec(),
        };
        let json = serde_json::to_string_pretty(&file).map_err(|source| KnowledgeError::Encode {
            category: category.to_string(),
            source,
        })?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(persist)?;
        }
        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, json).map_err(persist)?;
        fs::rename(&temp_path, &path).map_err(persist)?;
        debug!("persisted {} ({} entries)", category, entries.len());
        Ok(())
    }

    /// Valid `*.json` stems in the directory that are not known categories
    fn extra_category_names(&self) -> Vec<String> {
        let Some(dir) = &self.dir else {
            return Vec::new();
        };
        let Ok(read_dir) = fs::read_dir(dir) else {
            return Vec::new();
        };

        let mut names: Vec<String> = read_dir
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .filter_map(|p| p.file_stem().and_then(|s| s.to_str()).map(str::to_string))
            .filter(|name| !KNOWN_CATEGORIES.contains(&name.as_str()))
            .filter(|name| validate_category_name(name).is_ok())
            .collect();
        names.sort();
        names
    }
}

/// Category names become file names: `[a-z0-9_-]+` only
pub fn validate_category_name(name: &str) -> Result<(), KnowledgeError> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(KnowledgeError::InvalidCategory(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_builtin_has_all_known_categories() {
        let store = KnowledgeStore::builtin();
        for category in KNOWN_CATEGORIES {
            assert!(!store.category(category).is_empty(), "{} empty", category);
        }
        assert!(store.category("nope").is_empty());
        assert!(store.dir().is_none());
    }

    #[test]
    fn test_builtin_add_entry_reports_failure_but_keeps_entry() {
        let mut store = KnowledgeStore::builtin();
        let before = store.category("pod_issues").len();
        let err = store
            .add_entry("pod_issues", KnowledgeEntry::new("Evicted"))
            .unwrap_err();
        assert_eq!(err.error_code(), "no_backing_dir");
        assert_eq!(store.category("pod_issues").len(), before + 1);
    }

    #[test]
    fn test_load_materializes_defaults() {
        let dir = tempdir().unwrap();
        let mut store = KnowledgeStore::new(dir.path());
        let summary = store.load();

        assert_eq!(summary.materialized.len(), KNOWN_CATEGORIES.len());
        assert!(summary.failed.is_empty());
        assert!(dir.path().join("pod_issues.json").exists());
        assert!(!dir.path().join("pod_issues.json.tmp").exists());

        // Second load reads the files back rather than rewriting them
        let again = store.load();
        assert!(again.materialized.is_empty());
        assert_eq!(again.entries, summary.entries);
    }

    #[test]
    fn test_corrupt_known_category_falls_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("storage_issues.json");
        fs::write(&path, "{ not json").unwrap();

        let mut store = KnowledgeStore::new(dir.path());
        let summary = store.load();

        assert_eq!(summary.failed, vec!["storage_issues".to_string()]);
        assert_eq!(store.category("storage_issues")[0].title, "PVC Stuck in Pending");
        assert_eq!(fs::read_to_string(&path).unwrap(), "{ not json");
    }

    #[test]
    fn test_custom_category_file_is_loaded() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("istio_issues.json"),
            r#"{"entries": [{"title": "Sidecar not injected", "tags": ["network"]}]}"#,
        )
        .unwrap();
        fs::write(dir.path().join("Bad Name.json"), "{}").unwrap();

        let mut store = KnowledgeStore::new(dir.path());
        store.load();

        assert_eq!(store.category("istio_issues")[0].title, "Sidecar not injected");
        assert!(store.category_names().contains(&"istio_issues"));
        assert!(!store.category_names().contains(&"Bad Name"));
    }

    #[test]
    fn test_invalid_category_name_keeps_memory_append() {
        let dir = tempdir().unwrap();
        let mut store = KnowledgeStore::new(dir.path());
        store.load();

        let err = store
            .add_entry("../escape", KnowledgeEntry::new("x"))
            .unwrap_err();
        assert!(matches!(err, KnowledgeError::InvalidCategory(_)));
        assert_eq!(store.category("../escape").len(), 1);
        assert!(!dir.path().parent().unwrap().join("escape.json").exists());
    }

    #[test]
    fn test_validate_category_name() {
        assert!(validate_category_name("pod_issues").is_ok());
        assert!(validate_category_name("k8s-extra").is_ok());
        assert!(validate_category_name("").is_err());
        assert!(validate_category_name("Pods").is_err());
        assert!(validate_category_name("a/b").is_err());
    }
}
