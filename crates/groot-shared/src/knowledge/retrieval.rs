//! Query-driven retrieval over the knowledge store.
//!
//! Deterministic: the same store contents and query always give the same
//! ordered result.

use super::defaults::{
    provider_category, BEST_PRACTICES, DEPLOYMENT_ISSUES, NETWORKING_ISSUES, POD_ISSUES,
    SECURITY_ISSUES, STORAGE_ISSUES,
};
use super::entry::KnowledgeEntry;
use super::store::KnowledgeStore;
use crate::query::StructuredQuery;
use std::cmp::Reverse;

/// Upper bound on entries returned by `search`
pub const MAX_RESULTS: usize = 5;

/// Best practices are appended only when fewer hits than this were found
const BEST_PRACTICE_THRESHOLD: usize = 3;
const BEST_PRACTICE_FILL: usize = 2;

/// Keep entries whose tags intersect `filters`, or all when `filters` is empty
fn filtered<'a>(entries: &'a [KnowledgeEntry], filters: &[String]) -> Vec<&'a KnowledgeEntry> {
    entries
        .iter()
        .filter(|e| filters.is_empty() || e.tagged_with_any(filters))
        .collect()
}

/// Categories to draw from, in concatenation order
fn candidate_categories(query: &StructuredQuery) -> Vec<String> {
    let resources = &query.entities.resource_type;
    let issues = &query.entities.issue_type;
    let mut categories = Vec::new();

    if resources.is_empty() || query.has_resource_type("pod") {
        categories.push(POD_ISSUES.to_string());
    }
    if resources.is_empty() || query.has_resource_type("deployment") {
        categories.push(DEPLOYMENT_ISSUES.to_string());
    }
    if issues.is_empty() || query.has_issue("network") {
        categories.push(NETWORKING_ISSUES.to_string());
    }
    if issues.is_empty() || query.has_issue("storage") {
        categories.push(STORAGE_ISSUES.to_string());
    }
    if issues.is_empty() || query.has_issue("security") {
        categories.push(SECURITY_ISSUES.to_string());
    }
    for provider in &query.entities.cloud_provider {
        categories.push(provider_category(provider));
    }
    categories
}

/// Rank knowledge entries for a query, at most `MAX_RESULTS`
pub fn search<'a>(store: &'a KnowledgeStore, query: &StructuredQuery) -> Vec<&'a KnowledgeEntry> {
    let resources = &query.entities.resource_type;
    let issues = &query.entities.issue_type;

    let mut results: Vec<&KnowledgeEntry> = candidate_categories(query)
        .iter()
        .flat_map(|category| filtered(store.category(category), issues))
        .collect();

    if results.len() < BEST_PRACTICE_THRESHOLD {
        let fill = filtered(store.category(BEST_PRACTICES), resources);
        results.extend(fill.into_iter().take(BEST_PRACTICE_FILL));
    }

    if !resources.is_empty() && !issues.is_empty() {
        // sort_by_key is stable, ties keep concatenation order
        results.sort_by_key(|entry| {
            let res = entry.covers_resource_types(resources);
            let issue = entry.covers_issue_types(issues);
            Reverse((res && issue, res, issue))
        });
    }

    results.truncate(MAX_RESULTS);
    results
}

/// Best-practice records that apply to a resource type.
///
/// Entries with no `resource_types` apply to every type.
pub fn best_practices_for<'a>(store: &'a KnowledgeStore, resource_type: &str) -> Vec<&'a KnowledgeEntry> {
    store
        .category(BEST_PRACTICES)
        .iter()
        .filter(|e| e.is_best_practice())
        .filter(|e| e.resource_types.is_empty() || e.resource_types.iter().any(|r| r == resource_type))
        .collect()
}

impl KnowledgeStore {
    pub fn search(&self, query: &StructuredQuery) -> Vec<&KnowledgeEntry> {
        search(self, query)
    }
}
