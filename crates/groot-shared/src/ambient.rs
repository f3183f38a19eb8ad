//! Runtime facts about the cluster, supplied by the caller.
//!
//! Read-only to the core. Every field is optional; consumers fall back to
//! placeholders or defaults when a value is absent.

use crate::config::ClusterConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmbientContext {
    pub current_namespace: Option<String>,
    /// Namespaces known to exist in the cluster
    pub namespaces: Vec<String>,
    pub cluster_name: Option<String>,
    pub region: Option<String>,
    pub zone: Option<String>,
    pub project_id: Option<String>,
    pub resource_group: Option<String>,
    /// Issues already reported by a cluster collaborator
    pub issues: Vec<String>,
}

impl AmbientContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed cluster identifiers from the `[cluster]` config section
    pub fn from_config(cluster: &ClusterConfig) -> Self {
        Self {
            current_namespace: Some(cluster.default_namespace.clone()),
            cluster_name: cluster.cluster_name.clone(),
            region: cluster.region.clone(),
            zone: cluster.zone.clone(),
            project_id: cluster.project_id.clone(),
            resource_group: cluster.resource_group.clone(),
            ..Default::default()
        }
    }

    /// Read a JSON snapshot written by a cluster collaborator
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read context file: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse context file: {}", path.display()))
    }

    pub fn with_current_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.current_namespace = Some(namespace.into());
        self
    }

    pub fn with_namespaces(mut self, namespaces: Vec<String>) -> Self {
        self.namespaces = namespaces;
        self
    }

    /// Fill unset fields from `other`; values already present win
    pub fn merge_missing(mut self, other: AmbientContext) -> Self {
        fn fill(slot: &mut Option<String>, value: Option<String>) {
            if slot.is_none() {
                *slot = value;
            }
        }
        fill(&mut self.current_namespace, other.current_namespace);
        fill(&mut self.cluster_name, other.cluster_name);
        fill(&mut self.region, other.region);
        fill(&mut self.zone, other.zone);
        fill(&mut self.project_id, other.project_id);
        fill(&mut self.resource_group, other.resource_group);
        if self.namespaces.is_empty() {
            self.namespaces = other.namespaces;
        }
        if self.issues.is_empty() {
            self.issues = other.issues;
        }
        self
    }

    pub fn has_multiple_namespaces(&self) -> bool {
        self.namespaces.len() > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_from_file_accepts_partial_json() {
        let file = NamedTempFile::new().unwrap();
        fs::write(file.path(), r#"{"namespaces": ["default", "staging"], "region": "eu-west-1"}"#).unwrap();

        let ctx = AmbientContext::from_file(file.path()).unwrap();
        assert!(ctx.has_multiple_namespaces());
        assert_eq!(ctx.region.as_deref(), Some("eu-west-1"));
        assert!(ctx.current_namespace.is_none());
    }

    #[test]
    fn test_from_file_rejects_garbage() {
        let file = NamedTempFile::new().unwrap();
        fs::write(file.path(), "namespaces = 3").unwrap();
        assert!(AmbientContext::from_file(file.path()).is_err());
    }

    #[test]
    fn test_merge_missing_keeps_explicit_values() {
        let explicit = AmbientContext::new().with_current_namespace("staging");
        let seeded = AmbientContext {
            current_namespace: Some("default".into()),
            cluster_name: Some("prod-eks".into()),
            ..Default::default()
        };
        let merged = explicit.merge_missing(seeded);
        assert_eq!(merged.current_namespace.as_deref(), Some("staging"));
        assert_eq!(merged.cluster_name.as_deref(), Some("prod-eks"));
    }
}
