//! Tests for the persisted knowledge store.

use groot_shared::knowledge::*;
use groot_shared::{interpret, KnowledgeError};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_add_entry_survives_reload() {
    let dir = tempdir().unwrap();
    let mut store = KnowledgeStore::new(dir.path());
    store.load();

    let entry = KnowledgeEntry::new("Evicted Pods")
        .with_resource_types(&["pod"])
        .with_issue_types(&["crash"])
        .with_tags(&["crash", "eviction"]);
    store.add_entry("pod_issues", entry.clone()).unwrap();

    let mut reopened = KnowledgeStore::new(dir.path());
    reopened.load();
    assert_eq!(reopened.category("pod_issues").last(), Some(&entry));
    assert!(!dir.path().join("pod_issues.json.tmp").exists());
}

#[test]
fn test_new_category_is_created_lazily() {
    let dir = tempdir().unwrap();
    let mut store = KnowledgeStore::new(dir.path());
    store.load();
    assert!(store.category("helm_issues").is_empty());

    store
        .add_entry("helm_issues", KnowledgeEntry::new("Release stuck in pending-upgrade"))
        .unwrap();

    let mut reopened = KnowledgeStore::new(dir.path());
    let summary = reopened.load();
    assert!(reopened.category_names().contains(&"helm_issues"));
    assert_eq!(summary.categories, KNOWN_CATEGORIES.len() + 1);
}

#[test]
fn test_load_is_idempotent() {
    let dir = tempdir().unwrap();
    let mut store = KnowledgeStore::new(dir.path());
    let first = store.load();
    let titles: Vec<String> = store.category("networking_issues").iter().map(|e| e.title.clone()).collect();

    let second = store.load();
    let again: Vec<String> = store.category("networking_issues").iter().map(|e| e.title.clone()).collect();

    assert_eq!(first.entries, second.entries);
    assert_eq!(titles, again);
}

#[test]
fn test_persist_failure_keeps_memory_append() {
    let dir = tempdir().unwrap();
    // A regular file where the store directory should be
    let blocked = dir.path().join("kb");
    fs::write(&blocked, "not a directory").unwrap();

    let mut store = KnowledgeStore::new(&blocked);
    store.load();

    let err = store
        .add_entry(
            "security_issues",
            KnowledgeEntry::new("Token expired").with_tags(&["security"]),
        )
        .unwrap_err();
    assert!(matches!(err, KnowledgeError::Persist { .. }));
    assert_eq!(err.error_code(), "persist_failed");

    // Visible to search in this process even though it never reached disk
    let query = interpret("fix rbac permission problem");
    let titles: Vec<&str> = search(&store, &query).iter().map(|e| e.title.as_str()).collect();
    assert!(titles.contains(&"Token expired"));
}

#[test]
fn test_files_use_entries_wrapper() {
    let dir = tempdir().unwrap();
    let mut store = KnowledgeStore::new(dir.path());
    store.load();

    let raw = fs::read_to_string(dir.path().join("best_practices.json")).unwrap();
    let file: CategoryFile = serde_json::from_str(&raw).unwrap();
    assert_eq!(file.entries.len(), 2);

    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert!(json["entries"][0]["examples"][0]["body"].is_string());
    assert!(json["entries"][0].get("symptoms").is_none());
}
